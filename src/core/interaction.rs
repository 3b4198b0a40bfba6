//! Platform-neutral interaction model.
//!
//! An [`Interaction`] is one inbound user action, converted from the host
//! platform's wire type at the bot boundary. It is immutable once built and is
//! shared as `Arc<Interaction>` between every subscriber that sees it.

use serde::{Deserialize, Serialize};

/// A user of the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Platform user id
    pub id: u64,
    /// Account name
    pub name: String,
}

/// A user acting inside a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The underlying user
    pub user: User,
    /// Guild the membership belongs to
    pub guild_id: u64,
    /// Guild-specific nickname, if set
    pub nick: Option<String>,
}

/// Location of a message on the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Channel holding the message
    pub channel_id: u64,
    /// The message itself
    pub message_id: u64,
}

/// Discriminant used by event subscribers to filter interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Slash command invocation
    Command,
    /// Message component (button, select menu, ...) press
    Component,
}

/// A typed option value as sent by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// Free text
    String(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// True/false
    Boolean(bool),
    /// Mentioned user id
    User(u64),
    /// Mentioned channel id
    Channel(u64),
    /// Mentioned role id
    Role(u64),
    /// Mentioned user or role id
    Mentionable(u64),
    /// Uploaded attachment id
    Attachment(u64),
}

/// A named option attached to a command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    /// Option name as declared in the command schema
    pub name: String,
    /// Sent value
    pub value: ParameterValue,
}

/// Payload of a command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Invoked command name, as typed by the platform (usually lowercase)
    pub name: String,
    /// Options supplied with the invocation
    pub options: Vec<CommandOption>,
}

/// Kind of component that produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Button
    Button,
    /// Any select menu
    Select,
    /// Anything else the platform may add
    Other,
}

/// Payload of a component press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPress {
    /// Identifier of the pressed component
    pub custom_id: String,
    /// What was pressed
    pub kind: ComponentKind,
    /// Message the component is attached to
    pub message: MessageRef,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Slash command invocation
    Command(CommandPayload),
    /// Component press
    Component(ComponentPress),
}

/// An inbound user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Platform interaction id
    pub id: u64,
    /// Continuation token used to respond to the interaction
    pub token: String,
    /// The invoking user, always present
    pub user: User,
    /// Guild membership of the invoking user; absent in direct messages
    pub member: Option<Member>,
    /// Channel the interaction happened in
    pub channel_id: u64,
    /// Guild the interaction happened in, if any
    pub guild_id: Option<u64>,
    /// What the user did
    pub payload: Payload,
}

impl Interaction {
    /// Returns the kind of this interaction.
    #[must_use]
    pub const fn kind(&self) -> InteractionKind {
        match self.payload {
            Payload::Command(_) => InteractionKind::Command,
            Payload::Component(_) => InteractionKind::Component,
        }
    }

    /// Command payload, if this is a command invocation.
    #[must_use]
    pub const fn command(&self) -> Option<&CommandPayload> {
        match &self.payload {
            Payload::Command(command) => Some(command),
            Payload::Component(_) => None,
        }
    }

    /// Component payload, if this is a component press.
    #[must_use]
    pub const fn component(&self) -> Option<&ComponentPress> {
        match &self.payload {
            Payload::Component(press) => Some(press),
            Payload::Command(_) => None,
        }
    }

    /// Id of the acting user.
    #[must_use]
    pub const fn actor_id(&self) -> u64 {
        self.user.id
    }
}

/// A single embed in an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Title line
    pub title: String,
    /// Body text
    pub description: Option<String>,
    /// Side bar colour
    pub color: Option<u32>,
}

impl Embed {
    /// Creates an embed with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the colour.
    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

/// Visual style of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonStyle {
    /// Blurple
    #[default]
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
}

/// Visual descriptor of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonDescriptor {
    /// Identifier echoed back in presses
    pub custom_id: String,
    /// Text on the button
    pub label: String,
    /// Colour scheme
    pub style: ButtonStyle,
    /// Whether presses are blocked client-side
    pub disabled: bool,
}

impl ButtonDescriptor {
    /// Creates an enabled primary button.
    #[must_use]
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style: ButtonStyle::Primary,
            disabled: false,
        }
    }

    /// Sets the style.
    #[must_use]
    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

/// Abstract outgoing message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Plain text content
    pub content: Option<String>,
    /// Embeds, rendered in order
    pub embeds: Vec<Embed>,
    /// A single row of buttons
    pub buttons: Vec<ButtonDescriptor>,
    /// Only visible to the invoking user
    pub ephemeral: bool,
}

impl Reply {
    /// A text-only reply.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A reply holding one embed.
    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    /// Marks the reply as visible to the invoking user only.
    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Replaces the button row.
    #[must_use]
    pub fn with_buttons(mut self, buttons: Vec<ButtonDescriptor>) -> Self {
        self.buttons = buttons;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{command_interaction, press_interaction};

    #[test]
    fn test_kind_follows_payload() {
        let command = command_interaction("ping", 1);
        assert_eq!(command.kind(), InteractionKind::Command);
        assert!(command.component().is_none());
        assert_eq!(command.command().map(|c| c.name.as_str()), Some("ping"));

        let message = MessageRef {
            channel_id: 10,
            message_id: 20,
        };
        let press = press_interaction("next", 1, message);
        assert_eq!(press.kind(), InteractionKind::Component);
        assert!(press.command().is_none());
        assert_eq!(press.component().map(|p| p.message), Some(message));
    }

    #[test]
    fn test_reply_builders() {
        let reply = Reply::text("Owner only.").ephemeral();
        assert_eq!(reply.content.as_deref(), Some("Owner only."));
        assert!(reply.ephemeral);
        assert!(reply.embeds.is_empty());

        let reply = Reply::embed(Embed::titled("Loading...").color(0x57_f287))
            .with_buttons(vec![ButtonDescriptor::new("next", "Next")]);
        assert_eq!(reply.embeds[0].color, Some(0x57_f287));
        assert_eq!(reply.buttons.len(), 1);
        assert!(!reply.buttons[0].disabled);
    }
}

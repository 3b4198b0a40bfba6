//! [`Platform`] over serenity's HTTP client.

use crate::{
    core::{
        command::{CommandDefinition, ParameterKind, ParameterSpec},
        interaction::{
            ButtonDescriptor, ButtonStyle, Embed, Interaction, InteractionKind, MessageRef, Reply,
        },
        platform::{Platform, RegistrationScope, RemoteCommand},
    },
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Buttons per action row allowed by Discord.
const BUTTONS_PER_ROW: usize = 5;

/// Talks to Discord through a shared [`serenity::Http`].
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<serenity::Http>,
}

impl std::fmt::Debug for SerenityPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityPlatform").finish_non_exhaustive()
    }
}

impl SerenityPlatform {
    /// Wraps the client's HTTP handle.
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

const fn button_style(style: ButtonStyle) -> serenity::ButtonStyle {
    match style {
        ButtonStyle::Primary => serenity::ButtonStyle::Primary,
        ButtonStyle::Secondary => serenity::ButtonStyle::Secondary,
        ButtonStyle::Success => serenity::ButtonStyle::Success,
        ButtonStyle::Danger => serenity::ButtonStyle::Danger,
    }
}

fn embed(embed: &Embed) -> serenity::CreateEmbed {
    let mut built = serenity::CreateEmbed::new().title(&embed.title);
    if let Some(description) = &embed.description {
        built = built.description(description);
    }
    if let Some(color) = embed.color {
        built = built.color(color);
    }
    built
}

fn action_rows(buttons: &[ButtonDescriptor]) -> Vec<serenity::CreateActionRow> {
    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            serenity::CreateActionRow::Buttons(
                row.iter()
                    .map(|button| {
                        serenity::CreateButton::new(&button.custom_id)
                            .label(&button.label)
                            .style(button_style(button.style))
                            .disabled(button.disabled)
                    })
                    .collect(),
            )
        })
        .collect()
}

const fn option_type(kind: ParameterKind) -> serenity::CommandOptionType {
    match kind {
        ParameterKind::String => serenity::CommandOptionType::String,
        ParameterKind::Integer => serenity::CommandOptionType::Integer,
        ParameterKind::Number => serenity::CommandOptionType::Number,
        ParameterKind::Boolean => serenity::CommandOptionType::Boolean,
        ParameterKind::User => serenity::CommandOptionType::User,
        ParameterKind::Channel => serenity::CommandOptionType::Channel,
        ParameterKind::Role => serenity::CommandOptionType::Role,
        ParameterKind::Mentionable => serenity::CommandOptionType::Mentionable,
        ParameterKind::Attachment => serenity::CommandOptionType::Attachment,
    }
}

fn command_option(spec: &ParameterSpec) -> serenity::CreateCommandOption {
    serenity::CreateCommandOption::new(
        option_type(spec.kind),
        spec.name.to_lowercase(),
        &spec.description,
    )
    .required(spec.required)
}

/// Discord only accepts lowercase chat command names; routing is
/// case-insensitive so the definition keeps its display casing.
fn create_command(definition: &CommandDefinition) -> serenity::CreateCommand {
    let mut command = serenity::CreateCommand::new(definition.name.to_lowercase())
        .description(&definition.description)
        .set_options(definition.parameters.iter().map(command_option).collect());
    if !definition.default_permission {
        command = command.default_member_permissions(serenity::Permissions::empty());
    }
    command
}

fn message_ref(message: &serenity::Message) -> MessageRef {
    MessageRef {
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn acknowledge(&self, interaction: &Interaction) -> Result<()> {
        let response = match interaction.kind() {
            InteractionKind::Command => serenity::CreateInteractionResponse::Defer(
                serenity::CreateInteractionResponseMessage::new(),
            ),
            InteractionKind::Component => serenity::CreateInteractionResponse::Acknowledge,
        };
        self.http
            .create_interaction_response(
                serenity::InteractionId::new(interaction.id),
                &interaction.token,
                &response,
                Vec::new(),
            )
            .await?;
        Ok(())
    }

    async fn respond_ephemeral(&self, interaction: &Interaction, content: &str) -> Result<()> {
        let response = serenity::CreateInteractionResponse::Message(
            serenity::CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        self.http
            .create_interaction_response(
                serenity::InteractionId::new(interaction.id),
                &interaction.token,
                &response,
                Vec::new(),
            )
            .await?;
        Ok(())
    }

    async fn send_follow_up(&self, interaction: &Interaction, reply: &Reply) -> Result<MessageRef> {
        let mut follow_up = serenity::CreateInteractionResponseFollowup::new()
            .embeds(reply.embeds.iter().map(embed).collect())
            .components(action_rows(&reply.buttons))
            .ephemeral(reply.ephemeral);
        if let Some(content) = &reply.content {
            follow_up = follow_up.content(content);
        }
        let message = self
            .http
            .create_followup_message(&interaction.token, &follow_up, Vec::new())
            .await?;
        Ok(message_ref(&message))
    }

    async fn edit_message(&self, message: &MessageRef, reply: &Reply) -> Result<()> {
        let mut edit = serenity::EditMessage::new()
            .embeds(reply.embeds.iter().map(embed).collect())
            .components(action_rows(&reply.buttons));
        if let Some(content) = &reply.content {
            edit = edit.content(content);
        }
        serenity::ChannelId::new(message.channel_id)
            .edit_message(self.http.as_ref(), serenity::MessageId::new(message.message_id), edit)
            .await?;
        Ok(())
    }

    async fn send_channel_message(&self, channel_id: u64, reply: &Reply) -> Result<MessageRef> {
        let mut create = serenity::CreateMessage::new()
            .embeds(reply.embeds.iter().map(embed).collect())
            .components(action_rows(&reply.buttons));
        if let Some(content) = &reply.content {
            create = create.content(content);
        }
        let message = serenity::ChannelId::new(channel_id)
            .send_message(self.http.as_ref(), create)
            .await?;
        Ok(message_ref(&message))
    }

    async fn register_command(
        &self,
        definition: &CommandDefinition,
        scope: RegistrationScope,
    ) -> Result<RemoteCommand> {
        let builder = create_command(definition);
        let command = match scope {
            RegistrationScope::Guild(guild_id) => {
                serenity::GuildId::new(guild_id)
                    .create_command(self.http.as_ref(), builder)
                    .await?
            }
            RegistrationScope::Global => {
                serenity::Command::create_global_command(self.http.as_ref(), builder).await?
            }
        };
        Ok(RemoteCommand {
            id: command.id.get(),
            name: definition.name.clone(),
            scope,
        })
    }

    async fn delete_command(&self, command: &RemoteCommand) -> Result<()> {
        let id = serenity::CommandId::new(command.id);
        match command.scope {
            RegistrationScope::Guild(guild_id) => {
                serenity::GuildId::new(guild_id)
                    .delete_command(self.http.as_ref(), id)
                    .await?;
            }
            RegistrationScope::Global => {
                serenity::Command::delete_global_command(self.http.as_ref(), id).await?;
            }
        }
        Ok(())
    }
}

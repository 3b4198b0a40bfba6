//! Conversion from serenity's gateway types into core [`Interaction`]s.

use crate::core::interaction::{
    CommandOption, CommandPayload, ComponentKind, ComponentPress, Interaction, Member,
    MessageRef, ParameterValue, Payload, User,
};
use poise::serenity_prelude as serenity;
use tracing::debug;

fn user(user: &serenity::User) -> User {
    User {
        id: user.id.get(),
        name: user.name.clone(),
    }
}

fn member(member: &serenity::Member) -> Member {
    Member {
        user: user(&member.user),
        guild_id: member.guild_id.get(),
        nick: member.nick.clone(),
    }
}

/// Maps one option value. Subcommands and autocomplete stubs have no flat
/// equivalent and are dropped.
pub fn option_value(value: &serenity::CommandDataOptionValue) -> Option<ParameterValue> {
    use serenity::CommandDataOptionValue as V;

    let value = match value {
        V::String(s) => ParameterValue::String(s.clone()),
        V::Integer(i) => ParameterValue::Integer(*i),
        V::Number(n) => ParameterValue::Number(*n),
        V::Boolean(b) => ParameterValue::Boolean(*b),
        V::User(id) => ParameterValue::User(id.get()),
        V::Channel(id) => ParameterValue::Channel(id.get()),
        V::Role(id) => ParameterValue::Role(id.get()),
        V::Mentionable(id) => ParameterValue::Mentionable(id.get()),
        V::Attachment(id) => ParameterValue::Attachment(id.get()),
        _ => return None,
    };
    Some(value)
}

/// Maps the kind of a pressed component.
pub const fn component_kind(kind: &serenity::ComponentInteractionDataKind) -> ComponentKind {
    use serenity::ComponentInteractionDataKind as K;

    match kind {
        K::Button => ComponentKind::Button,
        K::StringSelect { .. }
        | K::UserSelect { .. }
        | K::RoleSelect { .. }
        | K::MentionableSelect { .. }
        | K::ChannelSelect { .. } => ComponentKind::Select,
        _ => ComponentKind::Other,
    }
}

fn from_command(command: &serenity::CommandInteraction) -> Interaction {
    let options = command
        .data
        .options
        .iter()
        .filter_map(|option| {
            option_value(&option.value).map(|value| CommandOption {
                name: option.name.clone(),
                value,
            })
        })
        .collect();

    Interaction {
        id: command.id.get(),
        token: command.token.clone(),
        user: user(&command.user),
        member: command.member.as_deref().map(member),
        channel_id: command.channel_id.get(),
        guild_id: command.guild_id.map(serenity::GuildId::get),
        payload: Payload::Command(CommandPayload {
            name: command.data.name.clone(),
            options,
        }),
    }
}

fn from_component(component: &serenity::ComponentInteraction) -> Interaction {
    Interaction {
        id: component.id.get(),
        token: component.token.clone(),
        user: user(&component.user),
        member: component.member.as_ref().map(member),
        channel_id: component.channel_id.get(),
        guild_id: component.guild_id.map(serenity::GuildId::get),
        payload: Payload::Component(ComponentPress {
            custom_id: component.data.custom_id.clone(),
            kind: component_kind(&component.data.kind),
            message: MessageRef {
                channel_id: component.message.channel_id.get(),
                message_id: component.message.id.get(),
            },
        }),
    }
}

/// Converts a gateway interaction. Kinds the core does not route (autocomplete,
/// modals, pings) yield `None`.
pub fn to_core(interaction: &serenity::Interaction) -> Option<Interaction> {
    match interaction {
        serenity::Interaction::Command(command) => Some(from_command(command)),
        serenity::Interaction::Component(component) => Some(from_component(component)),
        other => {
            debug!("Ignoring {:?} interaction", other.kind());
            None
        }
    }
}

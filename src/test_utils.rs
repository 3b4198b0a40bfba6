//! Shared test utilities for slashkit.
//!
//! This module provides an in-memory database, a recording [`Platform`] and
//! builders for interactions with sensible defaults.

use crate::{
    core::{
        command::CommandDefinition,
        interaction::{
            CommandPayload, ComponentKind, ComponentPress, Interaction, Member, MessageRef,
            Payload, Reply, User,
        },
        platform::{Platform, RegistrationScope, RemoteCommand},
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn user(id: u64) -> User {
    User {
        id,
        name: format!("user{id}"),
    }
}

/// A command invocation by `user_id` in a direct message.
///
/// # Defaults
/// * `id`: 1
/// * `channel_id`: 100
/// * no options
pub fn command_interaction(name: &str, user_id: u64) -> Interaction {
    Interaction {
        id: 1,
        token: "command-token".to_string(),
        user: user(user_id),
        member: None,
        channel_id: 100,
        guild_id: None,
        payload: Payload::Command(CommandPayload {
            name: name.to_string(),
            options: Vec::new(),
        }),
    }
}

/// A button press by `user_id` on `message`.
///
/// # Defaults
/// * `id`: 2
/// * in a direct message
pub fn press_interaction(custom_id: &str, user_id: u64, message: MessageRef) -> Interaction {
    Interaction {
        id: 2,
        token: "press-token".to_string(),
        user: user(user_id),
        member: None,
        channel_id: message.channel_id,
        guild_id: None,
        payload: Payload::Component(ComponentPress {
            custom_id: custom_id.to_string(),
            kind: ComponentKind::Button,
            message,
        }),
    }
}

/// Moves an interaction into a guild, attaching a membership for its user.
pub fn in_guild(mut interaction: Interaction, guild_id: u64) -> Interaction {
    interaction.guild_id = Some(guild_id);
    interaction.member = Some(Member {
        user: interaction.user.clone(),
        guild_id,
        nick: None,
    });
    interaction
}

/// One call made against [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    /// `acknowledge`
    Acknowledge {
        /// Interaction id
        interaction: u64,
    },
    /// `respond_ephemeral`
    RespondEphemeral {
        /// Interaction id
        interaction: u64,
        /// Response text
        content: String,
    },
    /// `send_follow_up`
    FollowUp {
        /// Interaction id
        interaction: u64,
        /// Sent content
        reply: Reply,
    },
    /// `edit_message`
    Edit {
        /// Edited message
        message: MessageRef,
        /// New content
        reply: Reply,
    },
    /// `send_channel_message`
    ChannelMessage {
        /// Target channel
        channel_id: u64,
        /// Sent content
        reply: Reply,
    },
    /// `register_command`
    Register {
        /// Command name
        name: String,
        /// Scope
        scope: RegistrationScope,
    },
    /// `delete_command`
    Delete {
        /// Remote id
        id: u64,
        /// Command name
        name: String,
    },
}

/// [`Platform`] that records every call and answers immediately.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail_acknowledge: AtomicBool,
    fail_registration: Mutex<HashSet<String>>,
    next_id: AtomicU64,
}

impl RecordingPlatform {
    fn record(&self, call: PlatformCall) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn next_id(&self) -> u64 {
        1000 + self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Makes every subsequent `acknowledge` fail (or succeed again).
    pub fn fail_acknowledgements(&self, fail: bool) {
        self.fail_acknowledge.store(fail, Ordering::SeqCst);
    }

    /// Makes registration of `name` fail.
    pub fn fail_registration_of(&self, name: &str) {
        self.fail_registration
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string());
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of successful acknowledgements.
    pub fn acknowledgements(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::Acknowledge { .. }))
            .count()
    }

    /// Contents of every follow-up, in order.
    pub fn follow_ups(&self) -> Vec<Reply> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::FollowUp { reply, .. } => Some(reply),
                _ => None,
            })
            .collect()
    }

    /// Every message edit, in order.
    pub fn edits(&self) -> Vec<(MessageRef, Reply)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Edit { message, reply } => Some((message, reply)),
                _ => None,
            })
            .collect()
    }

    /// Text of every ephemeral initial response, in order.
    pub fn ephemeral_responses(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::RespondEphemeral { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Every channel message, in order.
    pub fn channel_messages(&self) -> Vec<(u64, Reply)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::ChannelMessage { channel_id, reply } => Some((channel_id, reply)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn acknowledge(&self, interaction: &Interaction) -> Result<()> {
        if self.fail_acknowledge.load(Ordering::SeqCst) {
            return Err(Error::Platform {
                message: "acknowledge timed out".to_string(),
            });
        }
        self.record(PlatformCall::Acknowledge {
            interaction: interaction.id,
        });
        Ok(())
    }

    async fn respond_ephemeral(&self, interaction: &Interaction, content: &str) -> Result<()> {
        self.record(PlatformCall::RespondEphemeral {
            interaction: interaction.id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn send_follow_up(&self, interaction: &Interaction, reply: &Reply) -> Result<MessageRef> {
        self.record(PlatformCall::FollowUp {
            interaction: interaction.id,
            reply: reply.clone(),
        });
        Ok(MessageRef {
            channel_id: interaction.channel_id,
            message_id: self.next_id(),
        })
    }

    async fn edit_message(&self, message: &MessageRef, reply: &Reply) -> Result<()> {
        self.record(PlatformCall::Edit {
            message: *message,
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn send_channel_message(&self, channel_id: u64, reply: &Reply) -> Result<MessageRef> {
        self.record(PlatformCall::ChannelMessage {
            channel_id,
            reply: reply.clone(),
        });
        Ok(MessageRef {
            channel_id,
            message_id: self.next_id(),
        })
    }

    async fn register_command(
        &self,
        definition: &CommandDefinition,
        scope: RegistrationScope,
    ) -> Result<RemoteCommand> {
        let failing = self
            .fail_registration
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(&definition.name);
        if failing {
            return Err(Error::Platform {
                message: format!("registration of {} rejected", definition.name),
            });
        }
        self.record(PlatformCall::Register {
            name: definition.name.clone(),
            scope,
        });
        Ok(RemoteCommand {
            id: self.next_id(),
            name: definition.name.clone(),
            scope,
        })
    }

    async fn delete_command(&self, command: &RemoteCommand) -> Result<()> {
        self.record(PlatformCall::Delete {
            id: command.id,
            name: command.name.clone(),
        });
        Ok(())
    }
}

/// A bot configuration with every built-in command enabled.
///
/// # Defaults
/// * `name`: `"Kopybot"`, `version`: `"1.0.0"`
/// * `logging_channel_id`: 500, `owner_id`: 1
/// * global registration
pub fn test_config() -> crate::config::bot::BotConfig {
    crate::config::bot::BotConfig {
        name: "Kopybot".to_string(),
        version: "1.0.0".to_string(),
        logging_channel_id: 500,
        experimental: false,
        dev_server_id: 0,
        owner_id: 1,
        auto_send_commands: true,
        stats_command: true,
        update_commands_command: true,
        green: None,
        red: None,
        default_color: Some(0x0034_98DB),
    }
}

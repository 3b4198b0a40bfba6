//! The host platform as seen by the routing core.
//!
//! Routers, menus and registration only talk to the chat platform through
//! [`Platform`]. The bot layer implements it over serenity's HTTP client and the
//! tests implement it with a recording mock.

use crate::{
    core::{
        command::CommandDefinition,
        interaction::{Interaction, MessageRef, Reply},
    },
    errors::Result,
};
use async_trait::async_trait;

/// Where a command is registered on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationScope {
    /// Visible in one guild only; updates propagate immediately
    Guild(u64),
    /// Visible everywhere the application is installed
    Global,
}

/// Handle to a command that exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    /// Platform-assigned command id
    pub id: u64,
    /// Command name as registered
    pub name: String,
    /// Scope it was registered in
    pub scope: RegistrationScope,
}

/// Calls the routing core needs from the host platform.
///
/// Every method is a suspension point; implementations must be safe to call
/// from many tasks at once.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Acknowledges an interaction. Must happen before any slow work.
    async fn acknowledge(&self, interaction: &Interaction) -> Result<()>;

    /// Sends the initial, ephemeral response to an unacknowledged interaction.
    async fn respond_ephemeral(&self, interaction: &Interaction, content: &str) -> Result<()>;

    /// Sends a follow-up message to an acknowledged interaction.
    async fn send_follow_up(&self, interaction: &Interaction, reply: &Reply) -> Result<MessageRef>;

    /// Replaces the content of an existing message.
    async fn edit_message(&self, message: &MessageRef, reply: &Reply) -> Result<()>;

    /// Posts a message to a channel outside of any interaction.
    async fn send_channel_message(&self, channel_id: u64, reply: &Reply) -> Result<MessageRef>;

    /// Creates (or overwrites) a command on the platform.
    async fn register_command(
        &self,
        definition: &CommandDefinition,
        scope: RegistrationScope,
    ) -> Result<RemoteCommand>;

    /// Deletes a previously registered command.
    async fn delete_command(&self, command: &RemoteCommand) -> Result<()>;
}

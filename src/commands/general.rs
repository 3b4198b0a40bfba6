//! General commands - simple commands that don't touch the database.

use crate::core::{command::CommandDefinition, interaction::Reply};

/// Responds with "Pong!" to test bot connectivity.
#[must_use]
pub fn ping() -> CommandDefinition {
    CommandDefinition::new("Ping", "Checks if the bot is responsive").run(|ctx| async move {
        ctx.follow_up(Reply::text("Pong!")).await?;
        Ok(())
    })
}

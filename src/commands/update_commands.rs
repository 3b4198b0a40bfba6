//! `UpdateCommands` - re-sends the command set to the platform. Owner only.

use crate::core::{
    command::CommandDefinition,
    interaction::Reply,
    registration::{Registrar, ensure_clean},
};
use tracing::{info, warn};

/// Shown to anyone but the owner.
pub const OWNER_ONLY: &str = "Owner only.";

/// Builds the `UpdateCommands` command. Hidden from members by default.
#[must_use]
pub fn update_commands(owner_id: u64, registrar: Registrar) -> CommandDefinition {
    CommandDefinition::new("UpdateCommands", "Resend commands to discord. OWNER ONLY.")
        .default_permission(false)
        .run(move |ctx| async move {
            if ctx.interaction.actor_id() != owner_id {
                warn!(
                    "User {} tried to update commands without permission",
                    ctx.interaction.actor_id()
                );
                ctx.follow_up(Reply::text(OWNER_ONLY).ephemeral()).await?;
                return Ok(());
            }

            let report = registrar.sync(ctx.platform.as_ref(), &ctx.registry).await;
            ensure_clean(&report)?;
            info!(
                "Re-registered {} commands, removed {}",
                report.registered.len(),
                report.removed.len()
            );
            let summary = format!(
                "Sent {} commands ({} removed).",
                report.registered.len(),
                report.removed.len()
            );
            ctx.follow_up(Reply::text(summary).ephemeral()).await?;
            Ok(())
        })
}

//! Command implementations shipped with slashkit.

/// General utility commands
pub mod general;

/// Usage statistics command
pub mod stats;

/// Owner-only command re-registration
pub mod update_commands;

use crate::{
    config::bot::BotConfig,
    core::{command::CommandDefinition, registration::Registrar, usage::UsageStore},
};
use std::sync::Arc;

/// The built-in commands enabled by `config`, followed by the general ones.
#[must_use]
pub fn builtin_commands(config: &Arc<BotConfig>, usage: &Arc<dyn UsageStore>) -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    if config.stats_command {
        commands.push(stats::stats(Arc::clone(config), Arc::clone(usage)));
    }
    if config.update_commands_command {
        commands.push(update_commands::update_commands(
            config.owner_id,
            Registrar::for_mode(config.experimental, config.dev_server_id),
        ));
    }
    commands.push(general::ping());
    commands
}

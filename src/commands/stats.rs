//! `Stats` - paginated usage statistics for every command.

use crate::{
    config::bot::BotConfig,
    core::{
        auth::AllowedActors,
        command::CommandDefinition,
        interaction::{Embed, Reply},
        paginator::{Paginator, PaginatorOptions},
        usage::{UsageStore, UsageSummary},
    },
};
use std::sync::Arc;
use std::time::Duration;

/// How long the stats pages stay interactive.
pub const STATS_INACTIVITY: Duration = Duration::from_secs(30);

/// One overview page followed by one page per command.
#[must_use]
pub fn stats_pages(config: &BotConfig, summary: &UsageSummary) -> Vec<Embed> {
    let color = config.default_color();
    let overview = Embed::titled(format!("About {}", config.name))
        .description(format!(
            "All time commands run: {}\nCommands run since last restart: {}",
            summary.all_time_total, summary.recent_total
        ))
        .color(color);

    std::iter::once(overview)
        .chain(summary.counters.iter().map(|counter| {
            Embed::titled(format!("About the command {}", counter.command_name))
                .description(format!(
                    "All time uses: {}\nUses since last restart: {}",
                    counter.all_time, counter.recent
                ))
                .color(color)
        }))
        .collect()
}

/// Builds the `Stats` command over `usage`.
#[must_use]
pub fn stats(config: Arc<BotConfig>, usage: Arc<dyn UsageStore>) -> CommandDefinition {
    CommandDefinition::new("Stats", "Bot statistics!").run(move |ctx| {
        let config = Arc::clone(&config);
        let usage = Arc::clone(&usage);
        async move {
            let message = ctx.follow_up(Reply::text("Loading...")).await?;
            let summary = UsageSummary::from_counters(usage.list_all().await?);

            Paginator::attach(
                Arc::clone(&ctx.platform),
                &ctx.events,
                message,
                stats_pages(&config, &summary),
                PaginatorOptions {
                    starting_page: 0,
                    allowed_actors: AllowedActors::only(ctx.interaction.actor_id()),
                    inactivity: STATS_INACTIVITY,
                },
            )
            .await?;
            Ok(())
        }
    })
}

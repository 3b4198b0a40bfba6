//! Bot layer - Discord-specific bootstrap and event plumbing
//!
//! This module connects the platform-neutral core to Discord: it converts
//! gateway interactions, implements [`Platform`] over serenity's HTTP client,
//! and wires the router into a poise framework that carries no native commands.

/// Gateway type conversion
pub mod convert;
/// Serenity-backed [`Platform`]
pub mod platform;

use crate::{
    commands,
    config::bot::BotConfig,
    core::{
        command::{CommandDefinition, CommandRegistry},
        events::{EventSource, Subscription},
        interaction::{Embed, Reply},
        platform::Platform,
        registration::Registrar,
        router::CommandRouter,
        usage::{DbUsageStore, UsageStore},
    },
    errors::{Error, Result},
};
use platform::SerenityPlatform;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Shared state owned by the running framework.
pub struct Data {
    /// Bot options
    pub config: Arc<BotConfig>,
    /// Where converted interactions are published
    pub events: EventSource,
    /// Host platform
    pub platform: Arc<dyn Platform>,
    /// The command router
    pub router: Arc<CommandRouter>,
    routing: Subscription,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("router", &self.router)
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}

/// Presence line shown under the bot's name.
#[must_use]
pub fn presence_text(config: &BotConfig, shard_id: u32) -> String {
    format!("Version {} | Shard {}", config.version, shard_id)
}

/// Posts an error embed to the logging channel. Failures are only logged.
pub async fn report_error(platform: &dyn Platform, config: &BotConfig, description: &str) {
    let embed = Embed::titled("Error")
        .description(description)
        .color(config.red());
    if let Err(e) = platform
        .send_channel_message(config.logging_channel_id, &Reply::embed(embed))
        .await
    {
        error!("Failed to report error to the logging channel: {}", e);
    }
}

/// Startup sequence run once the platform is reachable.
///
/// Zeroes the since-restart counters, builds the registry from the built-in
/// commands followed by `extra_commands`, starts routing, optionally registers
/// the commands and announces the bot in the logging channel. A failure is
/// reported in the logging channel before being returned.
#[instrument(skip_all, fields(bot = %config.name, version = %config.version))]
pub async fn bootstrap(
    config: Arc<BotConfig>,
    usage: Arc<dyn UsageStore>,
    platform: Arc<dyn Platform>,
    events: EventSource,
    extra_commands: Vec<CommandDefinition>,
) -> Result<Data> {
    match start(&config, usage, &platform, &events, extra_commands).await {
        Ok((router, routing)) => Ok(Data {
            config,
            events,
            platform,
            router,
            routing,
        }),
        Err(e) => {
            error!("Startup failed: {}", e);
            report_error(platform.as_ref(), &config, &format!("Startup failed: {e}")).await;
            Err(e)
        }
    }
}

async fn start(
    config: &Arc<BotConfig>,
    usage: Arc<dyn UsageStore>,
    platform: &Arc<dyn Platform>,
    events: &EventSource,
    extra_commands: Vec<CommandDefinition>,
) -> Result<(Arc<CommandRouter>, Subscription)> {
    let reset = usage.reset_all_recent().await?;
    info!("Reset recent usage of {} commands", reset);

    let mut definitions = commands::builtin_commands(config, &usage);
    definitions.extend(extra_commands);
    let registry = Arc::new(CommandRegistry::new(definitions)?);

    let router = Arc::new(CommandRouter::new(
        registry,
        Arc::clone(platform),
        usage,
        events.clone(),
    ));
    let routing = router.attach();

    if config.auto_send_commands {
        let report = Registrar::for_mode(config.experimental, config.dev_server_id)
            .sync(platform.as_ref(), router.registry())
            .await;
        info!("Sent {} commands", report.registered.len());
        if !report.failed.is_empty() {
            let failed = report.failed.join(", ");
            report_error(
                platform.as_ref(),
                config,
                &format!("Failed to send commands: {failed}"),
            )
            .await;
        }
    }

    let online = Embed::titled(format!(
        "{} Version {} is now online!",
        config.name, config.version
    ))
    .color(config.green());
    if let Err(e) = platform
        .send_channel_message(config.logging_channel_id, &Reply::embed(online))
        .await
    {
        warn!("Failed to announce startup: {}", e);
    }

    Ok((router, routing))
}

fn set_presence(ctx: &serenity::Context, config: &BotConfig) {
    ctx.set_presence(
        Some(serenity::ActivityData::watching(presence_text(
            config,
            ctx.shard_id.0,
        ))),
        serenity::OnlineStatus::Online,
    );
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is ready", data_about_bot.user.name);
            set_presence(ctx, &data.config);
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let Some(interaction) = convert::to_core(interaction) {
                let delivered = data.events.publish(interaction);
                debug!("Interaction delivered to {} subscribers", delivered);
            }
        }
        _ => {}
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error while handling {}: {:?}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves interactions until the client stops.
#[instrument(skip_all, fields(bot = %config.name))]
pub async fn run_bot(
    token: String,
    config: Arc<BotConfig>,
    database: DatabaseConnection,
    extra_commands: Vec<CommandDefinition>,
) -> Result<()> {
    let usage: Arc<dyn UsageStore> = Arc::new(DbUsageStore::new(database));
    let events = EventSource::new();
    let setup_config = Arc::clone(&config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: Vec::new(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                set_presence(ctx, &setup_config);
                let platform: Arc<dyn Platform> =
                    Arc::new(SerenityPlatform::new(Arc::clone(&ctx.http)));
                bootstrap(setup_config, usage, platform, events, extra_commands).await
            })
        })
        .build();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, serenity::GatewayIntents::GUILDS)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

//! Command router - the top-level demultiplexer for command interactions.
//!
//! For each command interaction the router finds the matching definition,
//! acknowledges, runs it, reports failures generically, and bumps the usage
//! counter. A failing command never affects the routing of any other.

use crate::core::{
    command::{CommandContext, CommandRegistry, Parameters},
    events::{EventSource, Subscription},
    interaction::{Interaction, InteractionKind, Reply},
    platform::Platform,
    usage::UsageStore,
};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Shown to the actor when a command body fails.
pub const COMMAND_FAILURE_NOTICE: &str = "There was an error executing your command!";

/// What happened to one routed interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Not a command interaction
    Ignored,
    /// No registered command has this name
    Unmatched,
    /// The platform rejected the acknowledgement; nothing ran
    AcknowledgeFailed,
    /// The command ran to completion
    Completed,
    /// The command (or its parameter validation) failed and the actor was notified
    Failed,
}

/// Routes command interactions to their definitions.
pub struct CommandRouter {
    registry: Arc<CommandRegistry>,
    platform: Arc<dyn Platform>,
    usage: Arc<dyn UsageStore>,
    events: EventSource,
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRouter")
            .field("commands", &self.registry.len())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl CommandRouter {
    /// Creates a router over a fixed command set.
    pub fn new(
        registry: Arc<CommandRegistry>,
        platform: Arc<dyn Platform>,
        usage: Arc<dyn UsageStore>,
        events: EventSource,
    ) -> Self {
        Self {
            registry,
            platform,
            usage,
            events,
        }
    }

    /// The command set this router serves.
    #[must_use]
    pub const fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Subscribes the router to command interactions on its event source.
    ///
    /// Every interaction is routed on its own task, so a slow command never
    /// holds up the next one. Routing stops when the returned handle is dropped.
    pub fn attach(self: &Arc<Self>) -> Subscription {
        let router = Arc::clone(self);
        self.events
            .subscribe(InteractionKind::Command, move |interaction| {
                let router = Arc::clone(&router);
                tokio::spawn(async move {
                    router.route(interaction).await;
                });
            })
    }

    /// Routes one interaction.
    #[instrument(skip_all, fields(interaction = interaction.id, user = interaction.user.id))]
    pub async fn route(&self, interaction: Arc<Interaction>) -> RouteOutcome {
        let Some(payload) = interaction.command() else {
            return RouteOutcome::Ignored;
        };

        let Some(definition) = self.registry.find(&payload.name) else {
            debug!("No command registered as `{}`", payload.name);
            return RouteOutcome::Unmatched;
        };

        if let Err(e) = self.platform.acknowledge(&interaction).await {
            error!("Failed to acknowledge `{}`: {}", definition.name, e);
            return RouteOutcome::AcknowledgeFailed;
        }

        let outcome = match Parameters::from_interaction(&definition.parameters, &interaction) {
            Ok(parameters) => {
                let ctx = CommandContext {
                    interaction: Arc::clone(&interaction),
                    parameters,
                    platform: Arc::clone(&self.platform),
                    events: self.events.clone(),
                    registry: Arc::clone(&self.registry),
                };
                match definition.invoke(ctx).await {
                    Ok(()) => RouteOutcome::Completed,
                    Err(e) => {
                        error!("Error in command `{}`: {:?}", definition.name, e);
                        RouteOutcome::Failed
                    }
                }
            }
            Err(e) => {
                warn!("Rejected parameters for `{}`: {}", definition.name, e);
                RouteOutcome::Failed
            }
        };

        if outcome == RouteOutcome::Failed {
            let notice = Reply::text(COMMAND_FAILURE_NOTICE).ephemeral();
            if let Err(e) = self.platform.send_follow_up(&interaction, &notice).await {
                error!("Failed to send error message: {}", e);
            }
        }

        self.record_use(&definition.name).await;
        outcome
    }

    async fn record_use(&self, name: &str) {
        let result = match self.usage.find_or_create(name).await {
            Ok(counter) => self.usage.increment(&counter).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("Failed to record usage of `{}`: {}", name, e);
        }
    }
}

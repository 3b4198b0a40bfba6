//! Publishing the command set to the platform.
//!
//! Commands go to a single development guild while experimenting (updates are
//! instant there) and globally otherwise. A command marked for removal is
//! registered and then deleted straight away, which clears any stale copy the
//! platform still holds.

use crate::{
    core::{
        command::CommandRegistry,
        platform::{Platform, RegistrationScope, RemoteCommand},
    },
    errors::Result,
};
use tracing::{error, info, instrument};

/// Result of one registration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Commands now live on the platform
    pub registered: Vec<RemoteCommand>,
    /// Commands registered and then deleted
    pub removed: Vec<String>,
    /// Commands whose registration or deletion failed
    pub failed: Vec<String>,
}

/// Registers a command set in one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registrar {
    scope: RegistrationScope,
}

impl Registrar {
    /// Registrar for an explicit scope.
    #[must_use]
    pub const fn new(scope: RegistrationScope) -> Self {
        Self { scope }
    }

    /// Guild scope when `experimental`, global otherwise.
    #[must_use]
    pub const fn for_mode(experimental: bool, dev_server_id: u64) -> Self {
        if experimental {
            Self::new(RegistrationScope::Guild(dev_server_id))
        } else {
            Self::new(RegistrationScope::Global)
        }
    }

    /// The scope commands are registered in.
    #[must_use]
    pub const fn scope(&self) -> RegistrationScope {
        self.scope
    }

    /// Registers every command; one failing command does not stop the rest.
    #[instrument(skip_all, fields(scope = ?self.scope, commands = registry.len()))]
    pub async fn sync(&self, platform: &dyn Platform, registry: &CommandRegistry) -> SyncReport {
        let mut report = SyncReport::default();

        for definition in registry.iter() {
            let remote = match platform.register_command(definition, self.scope).await {
                Ok(remote) => remote,
                Err(e) => {
                    error!("Failed to register command `{}`: {}", definition.name, e);
                    report.failed.push(definition.name.clone());
                    continue;
                }
            };
            info!("Command {} created with id {}", definition.name, remote.id);

            if definition.marked_for_removal {
                match platform.delete_command(&remote).await {
                    Ok(()) => {
                        info!("Command {} deleted", definition.name);
                        report.removed.push(definition.name.clone());
                    }
                    Err(e) => {
                        error!("Failed to delete command `{}`: {}", definition.name, e);
                        report.failed.push(definition.name.clone());
                    }
                }
            } else {
                report.registered.push(remote);
            }
        }

        report
    }
}

/// Convenience for callers that want a hard failure when anything went wrong.
pub fn ensure_clean(report: &SyncReport) -> Result<()> {
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(crate::errors::Error::Platform {
            message: format!("Failed to sync commands: {}", report.failed.join(", ")),
        })
    }
}

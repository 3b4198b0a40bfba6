//! Unified error type for slashkit.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors raised by
//! command or button handlers are caught at the router/menu boundary and never
//! reach the shared event loop.

use thiserror::Error;

/// All errors produced by slashkit.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A call to the host chat platform failed
    #[error("Platform call failed: {message}")]
    Platform {
        /// Description of the failed call
        message: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),

    /// Two commands in one registry share a name (case-insensitive)
    #[error("Duplicate command name: {name}")]
    DuplicateCommand {
        /// The clashing name as given by the second definition
        name: String,
    },

    /// An interaction carried parameters that do not fit the command's schema
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A command or button handler failed
    #[error("Handler error: {message}")]
    Handler {
        /// Failure detail, logged server-side only
        message: String,
    },

    /// Formatting into a string buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

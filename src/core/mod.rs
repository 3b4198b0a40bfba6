//! Core layer - interaction routing and menu lifecycle, independent of any chat library.
//!
//! Everything here talks to the host platform through [`platform::Platform`]
//! and receives interactions through [`events::EventSource`], so it can be
//! driven by the Discord bot layer or by tests alike.

/// Authorization gate
pub mod auth;
/// Command contract, parameter schema and command registry
pub mod command;
/// Subscription registry for the interaction stream
pub mod events;
/// Platform-neutral interaction and message model
pub mod interaction;
/// Menu lifecycle manager
pub mod menu;
/// Paginated embed menu
pub mod paginator;
/// Host platform collaborator interface
pub mod platform;
/// Command registration pipeline
pub mod registration;
/// Command router
pub mod router;
/// Usage counters
pub mod usage;

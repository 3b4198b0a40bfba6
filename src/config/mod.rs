/// Bot options loaded from config.toml
pub mod bot;

/// Database configuration and connection management
pub mod database;

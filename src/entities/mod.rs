//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod command_stats;

pub use command_stats::{
    Column as CommandStatsColumn, Entity as CommandStats, Model as CommandStatsModel,
};

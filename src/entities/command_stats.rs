//! Command stats entity - One usage counter per command name.
//!
//! `recent_uses` is zeroed at every process start, `all_time_uses` never is.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Usage counter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "command_stats")]
pub struct Model {
    /// Command name exactly as defined (e.g. `"Stats"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub command_name: String,
    /// Uses since the counter was created
    pub all_time_uses: i64,
    /// Uses since the last restart
    pub recent_uses: i64,
    /// When the counter was first created
    pub created_at: DateTime,
    /// When the counter was last touched
    pub updated_at: DateTime,
}

/// `CommandStats` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

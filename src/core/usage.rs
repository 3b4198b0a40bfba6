//! Command usage counters.
//!
//! Every routed command bumps its counter; the `recent` half is zeroed at
//! startup so it reads "uses since last restart". Usage tracking is
//! best-effort: callers log failures and carry on.

use crate::{
    entities::{CommandStats, command_stats},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};

/// A command's usage tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCounter {
    /// Command name, the counter key
    pub command_name: String,
    /// Uses since the counter was created
    pub all_time: i64,
    /// Uses since the last restart
    pub recent: i64,
}

impl From<command_stats::Model> for UsageCounter {
    fn from(model: command_stats::Model) -> Self {
        Self {
            command_name: model.command_name,
            all_time: model.all_time_uses,
            recent: model.recent_uses,
        }
    }
}

/// Persistence collaborator for usage counters.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Returns the counter for `name`, creating a zeroed one if needed. Idempotent.
    async fn find_or_create(&self, name: &str) -> Result<UsageCounter>;

    /// Adds one to both halves of the counter and returns the new values.
    async fn increment(&self, counter: &UsageCounter) -> Result<UsageCounter>;

    /// All counters, ordered by command name.
    async fn list_all(&self) -> Result<Vec<UsageCounter>>;

    /// Zeroes the recent half of one counter.
    async fn reset_recent(&self, counter: &UsageCounter) -> Result<UsageCounter>;

    /// Zeroes the recent half of every counter. Returns how many were touched.
    async fn reset_all_recent(&self) -> Result<u64> {
        let mut touched = 0;
        for counter in self.list_all().await? {
            self.reset_recent(&counter).await?;
            touched += 1;
        }
        Ok(touched)
    }
}

/// Totals across every counter, as shown by the stats command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSummary {
    /// Sum of all-time uses
    pub all_time_total: i64,
    /// Sum of uses since restart
    pub recent_total: i64,
    /// Individual counters
    pub counters: Vec<UsageCounter>,
}

impl UsageSummary {
    /// Sums up a set of counters.
    #[must_use]
    pub fn from_counters(counters: Vec<UsageCounter>) -> Self {
        Self {
            all_time_total: counters.iter().map(|c| c.all_time).sum(),
            recent_total: counters.iter().map(|c| c.recent).sum(),
            counters,
        }
    }
}

/// [`UsageStore`] backed by the `command_stats` table.
#[derive(Debug, Clone)]
pub struct DbUsageStore {
    db: DatabaseConnection,
}

impl DbUsageStore {
    /// Wraps a connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, name: &str) -> Result<UsageCounter> {
        CommandStats::find_by_id(name.to_string())
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                Error::Database(DbErr::RecordNotFound(format!(
                    "usage counter for `{name}`"
                )))
            })
    }
}

#[async_trait]
impl UsageStore for DbUsageStore {
    async fn find_or_create(&self, name: &str) -> Result<UsageCounter> {
        let now = Utc::now().naive_utc();
        let row = command_stats::ActiveModel {
            command_name: Set(name.to_string()),
            all_time_uses: Set(0),
            recent_uses: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Concurrent first uses race here; the loser's insert is a no-op
        CommandStats::insert(row)
            .on_conflict(
                OnConflict::column(command_stats::Column::CommandName)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.load(name).await
    }

    async fn increment(&self, counter: &UsageCounter) -> Result<UsageCounter> {
        // Single UPDATE so concurrent increments cannot lose each other
        let result = CommandStats::update_many()
            .col_expr(
                command_stats::Column::AllTimeUses,
                Expr::col(command_stats::Column::AllTimeUses).add(1),
            )
            .col_expr(
                command_stats::Column::RecentUses,
                Expr::col(command_stats::Column::RecentUses).add(1),
            )
            .col_expr(
                command_stats::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(command_stats::Column::CommandName.eq(counter.command_name.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::Database(DbErr::RecordNotFound(format!(
                "usage counter for `{}`",
                counter.command_name
            ))));
        }

        self.load(&counter.command_name).await
    }

    async fn list_all(&self) -> Result<Vec<UsageCounter>> {
        Ok(CommandStats::find()
            .order_by_asc(command_stats::Column::CommandName)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn reset_recent(&self, counter: &UsageCounter) -> Result<UsageCounter> {
        CommandStats::update_many()
            .col_expr(command_stats::Column::RecentUses, Expr::value(0_i64))
            .filter(command_stats::Column::CommandName.eq(counter.command_name.as_str()))
            .exec(&self.db)
            .await?;

        self.load(&counter.command_name).await
    }

    async fn reset_all_recent(&self) -> Result<u64> {
        let result = CommandStats::update_many()
            .col_expr(command_stats::Column::RecentUses, Expr::value(0_i64))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

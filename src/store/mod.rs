//! Repository traits shared by the Postgres and in-memory backends.

pub mod memory;
pub mod postgres;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    BoardMeeting, Deal, Executive, MonthlyIndicator, ReportToken, Startup,
};
use crate::period::Period;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StartupStore: Send + Sync {
    /// All startups ordered by name ascending.
    async fn list_startups(&self) -> StoreResult<Vec<Startup>>;
    async fn startup(&self, id: Uuid) -> StoreResult<Option<Startup>>;
    async fn insert_startup(&self, startup: &Startup) -> StoreResult<()>;
    async fn update_startup(&self, startup: &Startup) -> StoreResult<()>;
    /// Removes the startup with everything it owns. Returns false if absent.
    async fn delete_startup(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait IndicatorStore: Send + Sync {
    /// Newest period first.
    async fn indicators_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<MonthlyIndicator>>;
    async fn indicator(&self, id: Uuid) -> StoreResult<Option<MonthlyIndicator>>;
    async fn indicator_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<MonthlyIndicator>>;
    async fn indicator_exists(&self, startup_id: Uuid, period: Period) -> StoreResult<bool>;
    /// Fails with [`StoreError::Conflict`] when the period is already taken.
    async fn insert_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()>;
    /// Fails with [`StoreError::Conflict`] when the new period is already taken.
    async fn update_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()>;
    async fn delete_indicator(&self, id: Uuid) -> StoreResult<bool>;
    /// Most recent indicator per startup in one round trip. Startups without
    /// indicators are absent from the map.
    async fn latest_per_startup(
        &self,
        startup_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, MonthlyIndicator>>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Most recent meeting first.
    async fn meetings_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<BoardMeeting>>;
    async fn meeting(&self, id: Uuid) -> StoreResult<Option<BoardMeeting>>;
    async fn insert_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()>;
    async fn update_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()>;
    async fn delete_meeting(&self, id: Uuid) -> StoreResult<bool>;
    /// Ids among `startup_ids` with at least one meeting on or after `since`.
    async fn recent_meeting_startups(
        &self,
        startup_ids: &[Uuid],
        since: NaiveDate,
    ) -> StoreResult<HashSet<Uuid>>;
}

#[async_trait]
pub trait ExecutiveStore: Send + Sync {
    /// Ordered by name ascending.
    async fn executives_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<Executive>>;
    async fn executive(&self, id: Uuid) -> StoreResult<Option<Executive>>;
    async fn insert_executive(&self, executive: &Executive) -> StoreResult<()>;
    async fn update_executive(&self, executive: &Executive) -> StoreResult<()>;
    async fn delete_executive(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait DealStore: Send + Sync {
    /// Board order: column, then position, then newest first.
    async fn list_deals(&self) -> StoreResult<Vec<Deal>>;
    async fn deal(&self, id: Uuid) -> StoreResult<Option<Deal>>;
    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()>;
    async fn update_deal(&self, deal: &Deal) -> StoreResult<()>;
    async fn delete_deal(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ReportTokenStore: Send + Sync {
    async fn token_by_value(&self, token: Uuid) -> StoreResult<Option<ReportToken>>;
    async fn token_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<ReportToken>>;
    /// Newest period first.
    async fn tokens_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<ReportToken>>;
    async fn insert_token(&self, token: &ReportToken) -> StoreResult<()>;
}

/// Everything the services and the HTTP layer need from a backend.
#[async_trait]
pub trait Store:
    StartupStore + IndicatorStore + MeetingStore + ExecutiveStore + DealStore + ReportTokenStore
{
    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> StoreResult<()>;
}

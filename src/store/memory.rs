//! Process-local backend used by `serve --memory` and by the test suites.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    BoardMeeting, Deal, Executive, MonthlyIndicator, ReportToken, Startup,
};
use crate::monitoring;
use crate::period::Period;

use super::{
    DealStore, ExecutiveStore, IndicatorStore, MeetingStore, ReportTokenStore, StartupStore,
    Store, StoreError, StoreResult,
};

#[derive(Default)]
struct Tables {
    startups: HashMap<Uuid, Startup>,
    indicators: HashMap<Uuid, MonthlyIndicator>,
    meetings: HashMap<Uuid, BoardMeeting>,
    executives: HashMap<Uuid, Executive>,
    deals: HashMap<Uuid, Deal>,
    tokens: HashMap<Uuid, ReportToken>,
}

impl Tables {
    fn period_taken(&self, indicator: &MonthlyIndicator) -> bool {
        self.indicators.values().any(|existing| {
            existing.id != indicator.id
                && existing.startup_id == indicator.startup_id
                && existing.period() == indicator.period()
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn period_conflict(period: Period) -> StoreError {
    StoreError::Conflict(format!(
        "an indicator for {period} already exists for this startup"
    ))
}

#[async_trait]
impl StartupStore for MemoryStore {
    async fn list_startups(&self) -> StoreResult<Vec<Startup>> {
        let tables = self.tables.read().await;
        let mut startups: Vec<Startup> = tables.startups.values().cloned().collect();
        startups.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(startups)
    }

    async fn startup(&self, id: Uuid) -> StoreResult<Option<Startup>> {
        Ok(self.tables.read().await.startups.get(&id).cloned())
    }

    async fn insert_startup(&self, startup: &Startup) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.startups.insert(startup.id, startup.clone());
        Ok(())
    }

    async fn update_startup(&self, startup: &Startup) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(slot) = tables.startups.get_mut(&startup.id) {
            *slot = startup.clone();
        }
        Ok(())
    }

    async fn delete_startup(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.startups.remove(&id).is_none() {
            return Ok(false);
        }
        tables.indicators.retain(|_, row| row.startup_id != id);
        tables.meetings.retain(|_, row| row.startup_id != id);
        tables.executives.retain(|_, row| row.startup_id != id);
        tables.tokens.retain(|_, row| row.startup_id != id);
        Ok(true)
    }
}

#[async_trait]
impl IndicatorStore for MemoryStore {
    async fn indicators_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<MonthlyIndicator>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<MonthlyIndicator> = tables
            .indicators
            .values()
            .filter(|row| row.startup_id == startup_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.period().cmp(&a.period()));
        Ok(rows)
    }

    async fn indicator(&self, id: Uuid) -> StoreResult<Option<MonthlyIndicator>> {
        Ok(self.tables.read().await.indicators.get(&id).cloned())
    }

    async fn indicator_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<MonthlyIndicator>> {
        let tables = self.tables.read().await;
        Ok(tables
            .indicators
            .values()
            .find(|row| row.startup_id == startup_id && row.period() == period)
            .cloned())
    }

    async fn indicator_exists(&self, startup_id: Uuid, period: Period) -> StoreResult<bool> {
        Ok(self.indicator_for_period(startup_id, period).await?.is_some())
    }

    async fn insert_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.period_taken(indicator) {
            return Err(period_conflict(indicator.period()));
        }
        tables.indicators.insert(indicator.id, indicator.clone());
        Ok(())
    }

    async fn update_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.period_taken(indicator) {
            return Err(period_conflict(indicator.period()));
        }
        if let Some(slot) = tables.indicators.get_mut(&indicator.id) {
            *slot = indicator.clone();
        }
        Ok(())
    }

    async fn delete_indicator(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.indicators.remove(&id).is_some())
    }

    async fn latest_per_startup(
        &self,
        startup_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, MonthlyIndicator>> {
        if startup_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let wanted: HashSet<Uuid> = startup_ids.iter().copied().collect();
        let tables = self.tables.read().await;
        Ok(monitoring::latest_by_startup(
            tables
                .indicators
                .values()
                .filter(|row| wanted.contains(&row.startup_id)),
        ))
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn meetings_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<BoardMeeting>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BoardMeeting> = tables
            .meetings
            .values()
            .filter(|row| row.startup_id == startup_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.meeting_date.cmp(&a.meeting_date));
        Ok(rows)
    }

    async fn meeting(&self, id: Uuid) -> StoreResult<Option<BoardMeeting>> {
        Ok(self.tables.read().await.meetings.get(&id).cloned())
    }

    async fn insert_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.meetings.insert(meeting.id, meeting.clone());
        Ok(())
    }

    async fn update_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(slot) = tables.meetings.get_mut(&meeting.id) {
            *slot = meeting.clone();
        }
        Ok(())
    }

    async fn delete_meeting(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.meetings.remove(&id).is_some())
    }

    async fn recent_meeting_startups(
        &self,
        startup_ids: &[Uuid],
        since: NaiveDate,
    ) -> StoreResult<HashSet<Uuid>> {
        if startup_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let wanted: HashSet<Uuid> = startup_ids.iter().copied().collect();
        let tables = self.tables.read().await;
        Ok(tables
            .meetings
            .values()
            .filter(|row| row.meeting_date >= since && wanted.contains(&row.startup_id))
            .map(|row| row.startup_id)
            .collect())
    }
}

#[async_trait]
impl ExecutiveStore for MemoryStore {
    async fn executives_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<Executive>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Executive> = tables
            .executives
            .values()
            .filter(|row| row.startup_id == startup_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn executive(&self, id: Uuid) -> StoreResult<Option<Executive>> {
        Ok(self.tables.read().await.executives.get(&id).cloned())
    }

    async fn insert_executive(&self, executive: &Executive) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.executives.insert(executive.id, executive.clone());
        Ok(())
    }

    async fn update_executive(&self, executive: &Executive) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(slot) = tables.executives.get_mut(&executive.id) {
            *slot = executive.clone();
        }
        Ok(())
    }

    async fn delete_executive(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.executives.remove(&id).is_some())
    }
}

#[async_trait]
impl DealStore for MemoryStore {
    async fn list_deals(&self) -> StoreResult<Vec<Deal>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Deal> = tables.deals.values().cloned().collect();
        rows.sort_by(|a, b| {
            a.column
                .cmp(&b.column)
                .then(a.position.cmp(&b.position))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn deal(&self, id: Uuid) -> StoreResult<Option<Deal>> {
        Ok(self.tables.read().await.deals.get(&id).cloned())
    }

    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.deals.insert(deal.id, deal.clone());
        Ok(())
    }

    async fn update_deal(&self, deal: &Deal) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(slot) = tables.deals.get_mut(&deal.id) {
            *slot = deal.clone();
        }
        Ok(())
    }

    async fn delete_deal(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.deals.remove(&id).is_some())
    }
}

#[async_trait]
impl ReportTokenStore for MemoryStore {
    async fn token_by_value(&self, token: Uuid) -> StoreResult<Option<ReportToken>> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.values().find(|row| row.token == token).cloned())
    }

    async fn token_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<ReportToken>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .values()
            .find(|row| row.startup_id == startup_id && row.period() == period)
            .cloned())
    }

    async fn tokens_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<ReportToken>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ReportToken> = tables
            .tokens
            .values()
            .filter(|row| row.startup_id == startup_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.period().cmp(&a.period()));
        Ok(rows)
    }

    async fn insert_token(&self, token: &ReportToken) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let taken = tables.tokens.values().any(|row| {
            row.token == token.token
                || (row.startup_id == token.startup_id && row.period() == token.period())
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "a report token for {} already exists for this startup",
                token.period()
            )));
        }
        tables.tokens.insert(token.id, token.clone());
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    BoardMeeting, Deal, DealColumn, Executive, MonthlyIndicator, ReportToken, Startup,
    StartupStatus,
};
use crate::period::Period;

use super::{
    DealStore, ExecutiveStore, IndicatorStore, MeetingStore, ReportTokenStore, StartupStore,
    Store, StoreError, StoreResult,
};

const STARTUP_COLUMNS: &str = "id, name, site, logo_url, status, sector, investment_date, \
     notes, created_at, updated_at";

const INDICATOR_COLUMNS: &str = "id, startup_id, month, year, total_revenue, \
     recurring_revenue_pct, gross_margin_pct, cash_balance, headcount, ebitda_burn, \
     achievements, challenges, comments, created_at, updated_at";

const MEETING_COLUMNS: &str = "id, startup_id, meeting_date, participants, summary, \
     attention_points, next_steps, created_at, updated_at";

const EXECUTIVE_COLUMNS: &str =
    "id, startup_id, name, role, email, phone, linkedin, created_at, updated_at";

const DEAL_COLUMNS: &str = "id, company, sector, stage, founders, board_column::text AS board_column, \
     notes, next_step, internal_owner, position, created_at, updated_at";

const TOKEN_COLUMNS: &str = "id, token, startup_id, month, year, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns unique-constraint violations into [`StoreError::Conflict`].
fn conflict_on_unique(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Conflict(message()),
        _ => StoreError::Database(err),
    }
}

fn startup_from_row(row: &PgRow) -> StoreResult<Startup> {
    let status: String = row.try_get("status")?;
    Ok(Startup {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        site: row.try_get("site")?,
        logo_url: row.try_get("logo_url")?,
        status: status
            .parse::<StartupStatus>()
            .map_err(|err| StoreError::Corrupt(err.to_string()))?,
        sector: row.try_get("sector")?,
        investment_date: row.try_get("investment_date")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn indicator_from_row(row: &PgRow) -> StoreResult<MonthlyIndicator> {
    Ok(MonthlyIndicator {
        id: row.try_get("id")?,
        startup_id: row.try_get("startup_id")?,
        month: row.try_get("month")?,
        year: row.try_get("year")?,
        total_revenue: row.try_get("total_revenue")?,
        recurring_revenue_pct: row.try_get("recurring_revenue_pct")?,
        gross_margin_pct: row.try_get("gross_margin_pct")?,
        cash_balance: row.try_get("cash_balance")?,
        headcount: row.try_get("headcount")?,
        ebitda_burn: row.try_get("ebitda_burn")?,
        achievements: row.try_get("achievements")?,
        challenges: row.try_get("challenges")?,
        comments: row.try_get("comments")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn meeting_from_row(row: &PgRow) -> StoreResult<BoardMeeting> {
    Ok(BoardMeeting {
        id: row.try_get("id")?,
        startup_id: row.try_get("startup_id")?,
        meeting_date: row.try_get("meeting_date")?,
        participants: row.try_get("participants")?,
        summary: row.try_get("summary")?,
        attention_points: row.try_get("attention_points")?,
        next_steps: row.try_get("next_steps")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn executive_from_row(row: &PgRow) -> StoreResult<Executive> {
    Ok(Executive {
        id: row.try_get("id")?,
        startup_id: row.try_get("startup_id")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        linkedin: row.try_get("linkedin")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn deal_from_row(row: &PgRow) -> StoreResult<Deal> {
    let column: String = row.try_get("board_column")?;
    Ok(Deal {
        id: row.try_get("id")?,
        company: row.try_get("company")?,
        sector: row.try_get("sector")?,
        stage: row.try_get("stage")?,
        founders: row.try_get("founders")?,
        column: column
            .parse::<DealColumn>()
            .map_err(|err| StoreError::Corrupt(err.to_string()))?,
        notes: row.try_get("notes")?,
        next_step: row.try_get("next_step")?,
        internal_owner: row.try_get("internal_owner")?,
        position: row.try_get("position")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn token_from_row(row: &PgRow) -> StoreResult<ReportToken> {
    Ok(ReportToken {
        id: row.try_get("id")?,
        token: row.try_get("token")?,
        startup_id: row.try_get("startup_id")?,
        month: row.try_get("month")?,
        year: row.try_get("year")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl StartupStore for PgStore {
    async fn list_startups(&self) -> StoreResult<Vec<Startup>> {
        // Byte order, same as the in-memory backend.
        let rows = sqlx::query(&format!(
            "SELECT {STARTUP_COLUMNS} FROM portfolio.startups ORDER BY name COLLATE \"C\" ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(startup_from_row).collect()
    }

    async fn startup(&self, id: Uuid) -> StoreResult<Option<Startup>> {
        let row = sqlx::query(&format!(
            "SELECT {STARTUP_COLUMNS} FROM portfolio.startups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(startup_from_row).transpose()
    }

    async fn insert_startup(&self, startup: &Startup) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.startups
            (id, name, site, logo_url, status, sector, investment_date, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(startup.id)
        .bind(&startup.name)
        .bind(&startup.site)
        .bind(&startup.logo_url)
        .bind(startup.status.as_str())
        .bind(&startup.sector)
        .bind(startup.investment_date)
        .bind(&startup.notes)
        .bind(startup.created_at)
        .bind(startup.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_startup(&self, startup: &Startup) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE portfolio.startups
            SET name = $2, site = $3, logo_url = $4, status = $5, sector = $6,
                investment_date = $7, notes = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(startup.id)
        .bind(&startup.name)
        .bind(&startup.site)
        .bind(&startup.logo_url)
        .bind(startup.status.as_str())
        .bind(&startup.sector)
        .bind(startup.investment_date)
        .bind(&startup.notes)
        .bind(startup.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_startup(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio.startups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl IndicatorStore for PgStore {
    async fn indicators_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<MonthlyIndicator>> {
        let rows = sqlx::query(&format!(
            "SELECT {INDICATOR_COLUMNS} FROM portfolio.monthly_indicators \
             WHERE startup_id = $1 ORDER BY year DESC, month DESC"
        ))
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(indicator_from_row).collect()
    }

    async fn indicator(&self, id: Uuid) -> StoreResult<Option<MonthlyIndicator>> {
        let row = sqlx::query(&format!(
            "SELECT {INDICATOR_COLUMNS} FROM portfolio.monthly_indicators WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(indicator_from_row).transpose()
    }

    async fn indicator_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<MonthlyIndicator>> {
        let row = sqlx::query(&format!(
            "SELECT {INDICATOR_COLUMNS} FROM portfolio.monthly_indicators \
             WHERE startup_id = $1 AND month = $2 AND year = $3"
        ))
        .bind(startup_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(indicator_from_row).transpose()
    }

    async fn indicator_exists(&self, startup_id: Uuid, period: Period) -> StoreResult<bool> {
        let exists: bool = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM portfolio.monthly_indicators
                WHERE startup_id = $1 AND month = $2 AND year = $3
            ) AS found
            "#,
        )
        .bind(startup_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_one(&self.pool)
        .await?
        .try_get("found")?;
        Ok(exists)
    }

    async fn insert_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.monthly_indicators
            (id, startup_id, month, year, total_revenue, recurring_revenue_pct, gross_margin_pct,
             cash_balance, headcount, ebitda_burn, achievements, challenges, comments,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(indicator.id)
        .bind(indicator.startup_id)
        .bind(indicator.month)
        .bind(indicator.year)
        .bind(indicator.total_revenue)
        .bind(indicator.recurring_revenue_pct)
        .bind(indicator.gross_margin_pct)
        .bind(indicator.cash_balance)
        .bind(indicator.headcount)
        .bind(indicator.ebitda_burn)
        .bind(&indicator.achievements)
        .bind(&indicator.challenges)
        .bind(&indicator.comments)
        .bind(indicator.created_at)
        .bind(indicator.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            conflict_on_unique(err, || {
                format!(
                    "an indicator for {} already exists for this startup",
                    indicator.period()
                )
            })
        })?;
        Ok(())
    }

    async fn update_indicator(&self, indicator: &MonthlyIndicator) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE portfolio.monthly_indicators
            SET month = $2, year = $3, total_revenue = $4, recurring_revenue_pct = $5,
                gross_margin_pct = $6, cash_balance = $7, headcount = $8, ebitda_burn = $9,
                achievements = $10, challenges = $11, comments = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(indicator.id)
        .bind(indicator.month)
        .bind(indicator.year)
        .bind(indicator.total_revenue)
        .bind(indicator.recurring_revenue_pct)
        .bind(indicator.gross_margin_pct)
        .bind(indicator.cash_balance)
        .bind(indicator.headcount)
        .bind(indicator.ebitda_burn)
        .bind(&indicator.achievements)
        .bind(&indicator.challenges)
        .bind(&indicator.comments)
        .bind(indicator.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            conflict_on_unique(err, || {
                format!(
                    "an indicator for {} already exists for this startup",
                    indicator.period()
                )
            })
        })?;
        Ok(())
    }

    async fn delete_indicator(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio.monthly_indicators WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn latest_per_startup(
        &self,
        startup_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, MonthlyIndicator>> {
        if startup_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Group to the max period per startup, then join back for the full row.
        let rows = sqlx::query(
            r#"
            SELECT mi.id, mi.startup_id, mi.month, mi.year, mi.total_revenue,
                   mi.recurring_revenue_pct, mi.gross_margin_pct, mi.cash_balance,
                   mi.headcount, mi.ebitda_burn, mi.achievements, mi.challenges,
                   mi.comments, mi.created_at, mi.updated_at
            FROM portfolio.monthly_indicators mi
            JOIN (
                SELECT startup_id, MAX(year * 100 + month) AS max_period
                FROM portfolio.monthly_indicators
                WHERE startup_id = ANY($1)
                GROUP BY startup_id
            ) latest
              ON latest.startup_id = mi.startup_id
             AND mi.year * 100 + mi.month = latest.max_period
            "#,
        )
        .bind(startup_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut latest = HashMap::with_capacity(rows.len());
        for row in rows.iter() {
            let indicator = indicator_from_row(row)?;
            latest.insert(indicator.startup_id, indicator);
        }
        Ok(latest)
    }
}

#[async_trait]
impl MeetingStore for PgStore {
    async fn meetings_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<BoardMeeting>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEETING_COLUMNS} FROM portfolio.board_meetings \
             WHERE startup_id = $1 ORDER BY meeting_date DESC"
        ))
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(meeting_from_row).collect()
    }

    async fn meeting(&self, id: Uuid) -> StoreResult<Option<BoardMeeting>> {
        let row = sqlx::query(&format!(
            "SELECT {MEETING_COLUMNS} FROM portfolio.board_meetings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(meeting_from_row).transpose()
    }

    async fn insert_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.board_meetings
            (id, startup_id, meeting_date, participants, summary, attention_points, next_steps,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(meeting.id)
        .bind(meeting.startup_id)
        .bind(meeting.meeting_date)
        .bind(&meeting.participants)
        .bind(&meeting.summary)
        .bind(&meeting.attention_points)
        .bind(&meeting.next_steps)
        .bind(meeting.created_at)
        .bind(meeting.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_meeting(&self, meeting: &BoardMeeting) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE portfolio.board_meetings
            SET meeting_date = $2, participants = $3, summary = $4, attention_points = $5,
                next_steps = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(meeting.id)
        .bind(meeting.meeting_date)
        .bind(&meeting.participants)
        .bind(&meeting.summary)
        .bind(&meeting.attention_points)
        .bind(&meeting.next_steps)
        .bind(meeting.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_meeting(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio.board_meetings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn recent_meeting_startups(
        &self,
        startup_ids: &[Uuid],
        since: NaiveDate,
    ) -> StoreResult<HashSet<Uuid>> {
        if startup_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT DISTINCT startup_id
            FROM portfolio.board_meetings
            WHERE startup_id = ANY($1) AND meeting_date >= $2
            "#,
        )
        .bind(startup_ids)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut ids = HashSet::with_capacity(rows.len());
        for row in rows {
            ids.insert(row.try_get::<Uuid, _>("startup_id")?);
        }
        Ok(ids)
    }
}

#[async_trait]
impl ExecutiveStore for PgStore {
    async fn executives_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<Executive>> {
        let rows = sqlx::query(&format!(
            "SELECT {EXECUTIVE_COLUMNS} FROM portfolio.executives \
             WHERE startup_id = $1 ORDER BY name COLLATE \"C\" ASC"
        ))
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(executive_from_row).collect()
    }

    async fn executive(&self, id: Uuid) -> StoreResult<Option<Executive>> {
        let row = sqlx::query(&format!(
            "SELECT {EXECUTIVE_COLUMNS} FROM portfolio.executives WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(executive_from_row).transpose()
    }

    async fn insert_executive(&self, executive: &Executive) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.executives
            (id, startup_id, name, role, email, phone, linkedin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(executive.id)
        .bind(executive.startup_id)
        .bind(&executive.name)
        .bind(&executive.role)
        .bind(&executive.email)
        .bind(&executive.phone)
        .bind(&executive.linkedin)
        .bind(executive.created_at)
        .bind(executive.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_executive(&self, executive: &Executive) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE portfolio.executives
            SET name = $2, role = $3, email = $4, phone = $5, linkedin = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(executive.id)
        .bind(&executive.name)
        .bind(&executive.role)
        .bind(&executive.email)
        .bind(&executive.phone)
        .bind(&executive.linkedin)
        .bind(executive.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_executive(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio.executives WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DealStore for PgStore {
    async fn list_deals(&self) -> StoreResult<Vec<Deal>> {
        let rows = sqlx::query(&format!(
            "SELECT {DEAL_COLUMNS} FROM portfolio.deals \
             ORDER BY portfolio.deals.board_column, position, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(deal_from_row).collect()
    }

    async fn deal(&self, id: Uuid) -> StoreResult<Option<Deal>> {
        let row = sqlx::query(&format!(
            "SELECT {DEAL_COLUMNS} FROM portfolio.deals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(deal_from_row).transpose()
    }

    async fn insert_deal(&self, deal: &Deal) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.deals
            (id, company, sector, stage, founders, board_column, notes, next_step,
             internal_owner, position, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6::portfolio.deal_column, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(deal.id)
        .bind(&deal.company)
        .bind(&deal.sector)
        .bind(&deal.stage)
        .bind(&deal.founders)
        .bind(deal.column.as_str())
        .bind(&deal.notes)
        .bind(&deal.next_step)
        .bind(&deal.internal_owner)
        .bind(deal.position)
        .bind(deal.created_at)
        .bind(deal.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_deal(&self, deal: &Deal) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE portfolio.deals
            SET company = $2, sector = $3, stage = $4, founders = $5,
                board_column = $6::portfolio.deal_column, notes = $7, next_step = $8,
                internal_owner = $9, position = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(deal.id)
        .bind(&deal.company)
        .bind(&deal.sector)
        .bind(&deal.stage)
        .bind(&deal.founders)
        .bind(deal.column.as_str())
        .bind(&deal.notes)
        .bind(&deal.next_step)
        .bind(&deal.internal_owner)
        .bind(deal.position)
        .bind(deal.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_deal(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio.deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReportTokenStore for PgStore {
    async fn token_by_value(&self, token: Uuid) -> StoreResult<Option<ReportToken>> {
        let row = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM portfolio.report_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(token_from_row).transpose()
    }

    async fn token_for_period(
        &self,
        startup_id: Uuid,
        period: Period,
    ) -> StoreResult<Option<ReportToken>> {
        let row = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM portfolio.report_tokens \
             WHERE startup_id = $1 AND month = $2 AND year = $3"
        ))
        .bind(startup_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(token_from_row).transpose()
    }

    async fn tokens_for_startup(&self, startup_id: Uuid) -> StoreResult<Vec<ReportToken>> {
        let rows = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM portfolio.report_tokens \
             WHERE startup_id = $1 ORDER BY year DESC, month DESC"
        ))
        .bind(startup_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(token_from_row).collect()
    }

    async fn insert_token(&self, token: &ReportToken) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio.report_tokens (id, token, startup_id, month, year, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id)
        .bind(token.token)
        .bind(token.startup_id)
        .bind(token.month)
        .bind(token.year)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            conflict_on_unique(err, || {
                format!(
                    "a report token for {} already exists for this startup",
                    token.period()
                )
            })
        })?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Tokenized self-reporting: admins issue one link per startup and period,
//! founders open it without logging in and submit that period's numbers.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{MonthlyIndicator, ReportToken};
use crate::period::Period;
use crate::store::{Store, StoreError};

use super::startups;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenRequest {
    pub month: i32,
    pub year: i32,
}

/// Values a founder may see and resubmit through the public form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub total_revenue: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub ebitda_burn: Option<Decimal>,
    pub recurring_revenue_pct: Option<Decimal>,
    pub gross_margin_pct: Option<Decimal>,
    pub headcount: Option<i32>,
    pub achievements: Option<String>,
    pub challenges: Option<String>,
}

impl ReportSubmission {
    fn write_into(self, indicator: &mut MonthlyIndicator) {
        indicator.total_revenue = self.total_revenue;
        indicator.cash_balance = self.cash_balance;
        indicator.ebitda_burn = self.ebitda_burn;
        indicator.recurring_revenue_pct = self.recurring_revenue_pct;
        indicator.gross_margin_pct = self.gross_margin_pct;
        indicator.headcount = self.headcount;
        indicator.achievements = self.achievements;
        indicator.challenges = self.challenges;
    }
}

impl From<&MonthlyIndicator> for ReportSubmission {
    fn from(indicator: &MonthlyIndicator) -> Self {
        Self {
            total_revenue: indicator.total_revenue,
            cash_balance: indicator.cash_balance,
            ebitda_burn: indicator.ebitda_burn,
            recurring_revenue_pct: indicator.recurring_revenue_pct,
            gross_margin_pct: indicator.gross_margin_pct,
            headcount: indicator.headcount,
            achievements: indicator.achievements.clone(),
            challenges: indicator.challenges.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFormContext {
    pub startup_name: String,
    pub startup_logo_url: Option<String>,
    pub month: i32,
    pub year: i32,
    pub existing_indicator: Option<ReportSubmission>,
}

/// Returns the token for the period, creating it on first request.
pub async fn generate(
    store: &dyn Store,
    startup_id: Uuid,
    request: TokenRequest,
    today: NaiveDate,
) -> AppResult<ReportToken> {
    startups::ensure_exists(store, startup_id).await?;
    let period = Period::reportable(request.month, request.year, today)?;
    if let Some(existing) = store.token_for_period(startup_id, period).await? {
        return Ok(existing);
    }

    let token = ReportToken {
        id: Uuid::new_v4(),
        token: Uuid::new_v4(),
        startup_id,
        month: period.month,
        year: period.year,
        created_at: Utc::now(),
    };
    match store.insert_token(&token).await {
        Ok(()) => {
            info!(%startup_id, %period, "report token issued");
            Ok(token)
        }
        // Lost a race with a concurrent request for the same period.
        Err(StoreError::Conflict(message)) => store
            .token_for_period(startup_id, period)
            .await?
            .ok_or(AppError::Conflict(message)),
        Err(err) => Err(err.into()),
    }
}

pub async fn list(store: &dyn Store, startup_id: Uuid) -> AppResult<Vec<ReportToken>> {
    startups::ensure_exists(store, startup_id).await?;
    Ok(store.tokens_for_startup(startup_id).await?)
}

async fn redeem(store: &dyn Store, token: Uuid) -> AppResult<ReportToken> {
    store
        .token_by_value(token)
        .await?
        .ok_or_else(|| AppError::NotFound("invalid or expired token".to_string()))
}

pub async fn form_context(store: &dyn Store, token: Uuid) -> AppResult<ReportFormContext> {
    let report_token = redeem(store, token).await?;
    let startup = store
        .startup(report_token.startup_id)
        .await?
        .ok_or_else(|| AppError::not_found("startup", report_token.startup_id))?;
    let existing = store
        .indicator_for_period(report_token.startup_id, report_token.period())
        .await?;

    Ok(ReportFormContext {
        startup_name: startup.name,
        startup_logo_url: startup.logo_url,
        month: report_token.month,
        year: report_token.year,
        existing_indicator: existing.as_ref().map(ReportSubmission::from),
    })
}

/// Upserts the indicator of the token's period with the submitted values.
pub async fn submit(
    store: &dyn Store,
    token: Uuid,
    submission: ReportSubmission,
) -> AppResult<MonthlyIndicator> {
    let report_token = redeem(store, token).await?;
    let period = report_token.period();
    let now = Utc::now();

    if let Some(mut indicator) = store
        .indicator_for_period(report_token.startup_id, period)
        .await?
    {
        submission.write_into(&mut indicator);
        indicator.updated_at = now;
        store.update_indicator(&indicator).await?;
        info!(startup_id = %report_token.startup_id, %period, "report resubmitted");
        return Ok(indicator);
    }

    let mut indicator = MonthlyIndicator {
        id: Uuid::new_v4(),
        startup_id: report_token.startup_id,
        month: period.month,
        year: period.year,
        total_revenue: None,
        recurring_revenue_pct: None,
        gross_margin_pct: None,
        cash_balance: None,
        headcount: None,
        ebitda_burn: None,
        achievements: None,
        challenges: None,
        comments: None,
        created_at: now,
        updated_at: now,
    };
    submission.write_into(&mut indicator);
    store.insert_indicator(&indicator).await?;
    info!(startup_id = %report_token.startup_id, %period, "report submitted");
    Ok(indicator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StartupStatus;
    use crate::store::{IndicatorStore, MemoryStore, StartupStore};
    use crate::testing::startup;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    async fn seeded() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let acme = startup("Acme", StartupStatus::Healthy);
        store.insert_startup(&acme).await.unwrap();
        (store, acme.id)
    }

    #[tokio::test]
    async fn generate_is_idempotent_per_period() {
        let (store, id) = seeded().await;
        let request = TokenRequest { month: 1, year: 2026 };
        let first = generate(&store, id, request, today()).await.unwrap();
        let second = generate(&store, id, request, today()).await.unwrap();
        assert_eq!(first.token, second.token);
        assert_eq!(list(&store, id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn future_token_is_rejected() {
        let (store, id) = seeded().await;
        let request = TokenRequest { month: 4, year: 2026 };
        assert!(matches!(
            generate(&store, id, request, today()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (store, _) = seeded().await;
        assert!(matches!(
            form_context(&store, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            submit(&store, Uuid::new_v4(), ReportSubmission::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn submit_creates_then_overwrites_the_period() {
        let (store, id) = seeded().await;
        let token = generate(&store, id, TokenRequest { month: 2, year: 2026 }, today())
            .await
            .unwrap();

        let context = form_context(&store, token.token).await.unwrap();
        assert_eq!(context.startup_name, "Acme");
        assert_eq!(context.existing_indicator, None);

        let first = ReportSubmission {
            total_revenue: Some(Decimal::from_str("500.00").unwrap()),
            headcount: Some(4),
            ..Default::default()
        };
        let created = submit(&store, token.token, first).await.unwrap();

        let second = ReportSubmission {
            total_revenue: Some(Decimal::from_str("650.00").unwrap()),
            ..Default::default()
        };
        let updated = submit(&store, token.token, second).await.unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.headcount, None);
        let rows = store.indicators_for_startup(id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_revenue, Some(Decimal::from_str("650.00").unwrap()));

        let context = form_context(&store, token.token).await.unwrap();
        assert_eq!(
            context.existing_indicator.and_then(|data| data.total_revenue),
            Some(Decimal::from_str("650.00").unwrap())
        );
    }
}

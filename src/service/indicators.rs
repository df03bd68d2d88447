use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::MonthlyIndicator;
use crate::period::Period;
use crate::store::Store;

use super::startups;

#[derive(Debug, Clone, Deserialize)]
pub struct NewIndicator {
    pub month: i32,
    pub year: i32,
    pub total_revenue: Option<Decimal>,
    pub recurring_revenue_pct: Option<Decimal>,
    pub gross_margin_pct: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub headcount: Option<i32>,
    pub ebitda_burn: Option<Decimal>,
    pub achievements: Option<String>,
    pub challenges: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorPatch {
    pub month: Option<i32>,
    pub year: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub total_revenue: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub recurring_revenue_pct: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub gross_margin_pct: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub cash_balance: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub headcount: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub ebitda_burn: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub achievements: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub challenges: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub comments: Option<Option<String>>,
}

impl IndicatorPatch {
    fn apply(self, indicator: &mut MonthlyIndicator) {
        if let Some(month) = self.month {
            indicator.month = month;
        }
        if let Some(year) = self.year {
            indicator.year = year;
        }
        if let Some(value) = self.total_revenue {
            indicator.total_revenue = value;
        }
        if let Some(value) = self.recurring_revenue_pct {
            indicator.recurring_revenue_pct = value;
        }
        if let Some(value) = self.gross_margin_pct {
            indicator.gross_margin_pct = value;
        }
        if let Some(value) = self.cash_balance {
            indicator.cash_balance = value;
        }
        if let Some(value) = self.headcount {
            indicator.headcount = value;
        }
        if let Some(value) = self.ebitda_burn {
            indicator.ebitda_burn = value;
        }
        if let Some(value) = self.achievements {
            indicator.achievements = value;
        }
        if let Some(value) = self.challenges {
            indicator.challenges = value;
        }
        if let Some(value) = self.comments {
            indicator.comments = value;
        }
    }
}

pub async fn list(store: &dyn Store, startup_id: Uuid) -> AppResult<Vec<MonthlyIndicator>> {
    startups::ensure_exists(store, startup_id).await?;
    Ok(store.indicators_for_startup(startup_id).await?)
}

/// Indicator `id` as long as it belongs to `startup_id`.
pub async fn get(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<MonthlyIndicator> {
    startups::ensure_exists(store, startup_id).await?;
    store
        .indicator(id)
        .await?
        .filter(|indicator| indicator.startup_id == startup_id)
        .ok_or_else(|| AppError::not_found("indicator", id))
}

pub async fn create(
    store: &dyn Store,
    startup_id: Uuid,
    input: NewIndicator,
    today: NaiveDate,
) -> AppResult<MonthlyIndicator> {
    startups::ensure_exists(store, startup_id).await?;
    let period = Period::reportable(input.month, input.year, today)?;
    if store.indicator_exists(startup_id, period).await? {
        return Err(AppError::Conflict(format!(
            "an indicator for {period} already exists for this startup"
        )));
    }

    let now = Utc::now();
    let indicator = MonthlyIndicator {
        id: Uuid::new_v4(),
        startup_id,
        month: period.month,
        year: period.year,
        total_revenue: input.total_revenue,
        recurring_revenue_pct: input.recurring_revenue_pct,
        gross_margin_pct: input.gross_margin_pct,
        cash_balance: input.cash_balance,
        headcount: input.headcount,
        ebitda_burn: input.ebitda_burn,
        achievements: input.achievements,
        challenges: input.challenges,
        comments: input.comments,
        created_at: now,
        updated_at: now,
    };
    store.insert_indicator(&indicator).await?;
    info!(%startup_id, %period, "indicator recorded");
    Ok(indicator)
}

pub async fn update(
    store: &dyn Store,
    startup_id: Uuid,
    id: Uuid,
    patch: IndicatorPatch,
    today: NaiveDate,
) -> AppResult<MonthlyIndicator> {
    let mut indicator = get(store, startup_id, id).await?;
    Period::reportable(
        patch.month.unwrap_or(indicator.month),
        patch.year.unwrap_or(indicator.year),
        today,
    )?;
    patch.apply(&mut indicator);
    indicator.updated_at = Utc::now();
    store.update_indicator(&indicator).await?;
    Ok(indicator)
}

pub async fn delete(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<()> {
    let indicator = get(store, startup_id, id).await?;
    store.delete_indicator(indicator.id).await?;
    Ok(())
}

//! Portfolio monitoring: latest-indicator resolution and portfolio rollups.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::{
    HealthDistribution, MonthlyIndicator, PortfolioSummary, Startup, StartupMonitoringItem,
};
use crate::period::Period;
use crate::store::{Store, StoreResult};

/// A board meeting within this many days keeps a startup's routines up to date.
pub const MEETING_WINDOW_DAYS: i64 = 90;

/// Single pass keeping the most recent indicator seen for each startup.
pub fn latest_by_startup<'a, I>(indicators: I) -> HashMap<Uuid, MonthlyIndicator>
where
    I: IntoIterator<Item = &'a MonthlyIndicator>,
{
    let mut latest: HashMap<Uuid, &MonthlyIndicator> = HashMap::new();
    for indicator in indicators {
        latest
            .entry(indicator.startup_id)
            .and_modify(|best| {
                if indicator.period() > best.period() {
                    *best = indicator;
                }
            })
            .or_insert(indicator);
    }
    latest
        .into_iter()
        .map(|(startup_id, indicator)| (startup_id, indicator.clone()))
        .collect()
}

pub fn meeting_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(MEETING_WINDOW_DAYS)
}

/// `part / total` as a percentage rounded to one decimal, ties to even.
/// Callers guarantee `total > 0`.
fn coverage_pct(part: usize, total: usize) -> f64 {
    let pct = part as f64 / total as f64 * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

/// Builds the summary from already-fetched data. `startups` must be in display order.
pub fn assemble(
    startups: Vec<Startup>,
    latest: &HashMap<Uuid, MonthlyIndicator>,
    recent_meetings: &HashSet<Uuid>,
    today: NaiveDate,
) -> PortfolioSummary {
    let total = startups.len();
    if total == 0 {
        return PortfolioSummary {
            total_startups: 0,
            portfolio_revenue: Decimal::ZERO,
            portfolio_health: HealthDistribution::default(),
            monthly_report_pct: 0.0,
            routines_up_to_date_pct: 0.0,
            startups: Vec::new(),
        };
    }

    let mut health = HealthDistribution::default();
    for startup in startups.iter() {
        health.record(startup.status);
    }

    let portfolio_revenue: Decimal = latest
        .values()
        .filter_map(|indicator| indicator.total_revenue)
        .sum();

    let current = Period::containing(today);
    let reported = startups
        .iter()
        .filter(|startup| {
            latest
                .get(&startup.id)
                .is_some_and(|indicator| indicator.period() == current)
        })
        .count();

    let up_to_date = startups
        .iter()
        .filter(|startup| recent_meetings.contains(&startup.id))
        .count();

    let items = startups
        .into_iter()
        .map(|startup| {
            let snapshot = latest.get(&startup.id);
            StartupMonitoringItem {
                total_revenue: snapshot.and_then(|ind| ind.total_revenue),
                cash_balance: snapshot.and_then(|ind| ind.cash_balance),
                ebitda_burn: snapshot.and_then(|ind| ind.ebitda_burn),
                headcount: snapshot.and_then(|ind| ind.headcount),
                startup,
            }
        })
        .collect();

    PortfolioSummary {
        total_startups: total,
        portfolio_revenue,
        portfolio_health: health,
        monthly_report_pct: coverage_pct(reported, total),
        routines_up_to_date_pct: coverage_pct(up_to_date, total),
        startups: items,
    }
}

/// Recomputes the whole-portfolio summary from current storage contents.
#[instrument(skip(store))]
pub async fn portfolio_summary(store: &dyn Store, today: NaiveDate) -> StoreResult<PortfolioSummary> {
    let startups = store.list_startups().await?;
    if startups.is_empty() {
        return Ok(assemble(startups, &HashMap::new(), &HashSet::new(), today));
    }

    let ids: Vec<Uuid> = startups.iter().map(|startup| startup.id).collect();
    let (latest, recent_meetings) = tokio::try_join!(
        store.latest_per_startup(&ids),
        store.recent_meeting_startups(&ids, meeting_cutoff(today)),
    )?;
    debug!(
        startups = ids.len(),
        with_indicator = latest.len(),
        with_recent_meeting = recent_meetings.len(),
        "resolved monitoring inputs"
    );

    Ok(assemble(startups, &latest, &recent_meetings, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StartupStatus;
    use crate::store::{IndicatorStore, MeetingStore, MemoryStore, StartupStore};
    use crate::testing::{indicator, meeting, startup};
    use std::str::FromStr;

    fn feb_2026() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn latest_picks_greatest_period_across_years() {
        let id = Uuid::new_v4();
        let rows = vec![indicator(id, 12, 2025), indicator(id, 3, 2026), indicator(id, 1, 2026)];
        let latest = latest_by_startup(&rows);
        assert_eq!(latest[&id].period(), Period::new(3, 2026).unwrap());
    }

    #[test]
    fn startups_without_indicators_are_absent() {
        let with = Uuid::new_v4();
        let rows = vec![indicator(with, 1, 2026)];
        let latest = latest_by_startup(&rows);
        assert_eq!(latest.len(), 1);
        assert!(latest.contains_key(&with));
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(coverage_pct(1, 3), 33.3);
        assert_eq!(coverage_pct(2, 3), 66.7);
        assert_eq!(coverage_pct(3, 3), 100.0);
        assert_eq!(coverage_pct(0, 7), 0.0);
    }

    #[test]
    fn half_ties_round_to_even_digit() {
        assert_eq!(coverage_pct(1, 16), 6.2);
        assert_eq!(coverage_pct(5, 16), 31.2);
        assert_eq!(coverage_pct(3, 16), 18.8);
        assert_eq!(coverage_pct(1, 8), 12.5);
    }

    #[test]
    fn cutoff_is_ninety_days_back() {
        assert_eq!(
            meeting_cutoff(feb_2026()),
            NaiveDate::from_ymd_opt(2025, 11, 17).unwrap()
        );
    }

    #[tokio::test]
    async fn empty_portfolio_is_the_zero_summary() {
        let store = MemoryStore::new();
        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(summary.total_startups, 0);
        assert_eq!(summary.portfolio_revenue, Decimal::ZERO);
        assert_eq!(summary.portfolio_health, HealthDistribution::default());
        assert_eq!(summary.monthly_report_pct, 0.0);
        assert_eq!(summary.routines_up_to_date_pct, 0.0);
        assert!(summary.startups.is_empty());
    }

    #[tokio::test]
    async fn lone_startup_without_data_has_null_snapshot() {
        let store = MemoryStore::new();
        store
            .insert_startup(&startup("Acme", StartupStatus::Healthy))
            .await
            .unwrap();

        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(summary.total_startups, 1);
        let item = &summary.startups[0];
        assert_eq!(item.total_revenue, None);
        assert_eq!(item.cash_balance, None);
        assert_eq!(item.ebitda_burn, None);
        assert_eq!(item.headcount, None);
        assert_eq!(summary.monthly_report_pct, 0.0);
        assert_eq!(summary.routines_up_to_date_pct, 0.0);
    }

    #[tokio::test]
    async fn current_month_report_uses_latest_snapshot() {
        let store = MemoryStore::new();
        let acme = startup("Acme", StartupStatus::Healthy);
        store.insert_startup(&acme).await.unwrap();

        let mut january = indicator(acme.id, 1, 2026);
        january.total_revenue = Some(dec("1000.00"));
        january.headcount = Some(10);
        let mut february = indicator(acme.id, 2, 2026);
        february.total_revenue = Some(dec("1500.50"));
        february.cash_balance = Some(dec("20000"));
        february.ebitda_burn = Some(dec("-3200.25"));
        february.headcount = Some(12);
        store.insert_indicator(&january).await.unwrap();
        store.insert_indicator(&february).await.unwrap();

        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(summary.monthly_report_pct, 100.0);
        assert_eq!(summary.portfolio_revenue, dec("1500.50"));
        let item = &summary.startups[0];
        assert_eq!(item.total_revenue, Some(dec("1500.50")));
        assert_eq!(item.cash_balance, Some(dec("20000")));
        assert_eq!(item.ebitda_burn, Some(dec("-3200.25")));
        assert_eq!(item.headcount, Some(12));
    }

    #[tokio::test]
    async fn one_startup_per_health_bucket() {
        let store = MemoryStore::new();
        for (name, status) in [
            ("Alpha", StartupStatus::Healthy),
            ("Bravo", StartupStatus::Warning),
            ("Charlie", StartupStatus::Critical),
        ] {
            store.insert_startup(&startup(name, status)).await.unwrap();
        }

        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(
            summary.portfolio_health,
            HealthDistribution {
                healthy: 1,
                warning: 1,
                critical: 1
            }
        );
        assert_eq!(summary.portfolio_health.total(), summary.total_startups);
        assert_eq!(summary.portfolio_revenue, Decimal::ZERO);
        assert_eq!(summary.monthly_report_pct, 0.0);
        assert_eq!(summary.routines_up_to_date_pct, 0.0);
    }

    #[tokio::test]
    async fn revenue_is_exact_and_ignores_null_and_stale_rows() {
        let store = MemoryStore::new();
        let a = startup("A", StartupStatus::Healthy);
        let b = startup("B", StartupStatus::Healthy);
        let c = startup("C", StartupStatus::Warning);
        for s in [&a, &b, &c] {
            store.insert_startup(s).await.unwrap();
        }

        let mut a_old = indicator(a.id, 11, 2025);
        a_old.total_revenue = Some(dec("999999.99"));
        let mut a_new = indicator(a.id, 1, 2026);
        a_new.total_revenue = Some(dec("0.10"));
        let mut b_new = indicator(b.id, 2, 2026);
        b_new.total_revenue = Some(dec("0.20"));
        let c_new = indicator(c.id, 2, 2026);
        for row in [&a_old, &a_new, &b_new, &c_new] {
            store.insert_indicator(row).await.unwrap();
        }

        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(summary.portfolio_revenue, dec("0.30"));
        assert_eq!(summary.monthly_report_pct, 66.7);
    }

    #[tokio::test]
    async fn routines_count_each_startup_once_within_window() {
        let store = MemoryStore::new();
        let busy = startup("Busy", StartupStatus::Healthy);
        let stale = startup("Stale", StartupStatus::Healthy);
        let edge = startup("Edge", StartupStatus::Healthy);
        let none = startup("None", StartupStatus::Healthy);
        for s in [&busy, &stale, &edge, &none] {
            store.insert_startup(s).await.unwrap();
        }
        for day in [2, 9, 16] {
            store
                .insert_meeting(&meeting(busy.id, NaiveDate::from_ymd_opt(2026, 2, day).unwrap()))
                .await
                .unwrap();
        }
        store
            .insert_meeting(&meeting(stale.id, NaiveDate::from_ymd_opt(2025, 11, 16).unwrap()))
            .await
            .unwrap();
        store
            .insert_meeting(&meeting(edge.id, meeting_cutoff(feb_2026())))
            .await
            .unwrap();

        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        assert_eq!(summary.routines_up_to_date_pct, 50.0);
    }

    #[tokio::test]
    async fn items_follow_name_order() {
        let store = MemoryStore::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            store
                .insert_startup(&startup(name, StartupStatus::Healthy))
                .await
                .unwrap();
        }
        let summary = portfolio_summary(&store, feb_2026()).await.unwrap();
        let names: Vec<&str> = summary
            .startups
            .iter()
            .map(|item| item.startup.name.as_str())
            .collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
    }

    #[tokio::test]
    async fn repeated_calls_serialize_identically() {
        let store = MemoryStore::new();
        let acme = startup("Acme", StartupStatus::Warning);
        store.insert_startup(&acme).await.unwrap();
        let mut row = indicator(acme.id, 2, 2026);
        row.total_revenue = Some(dec("42.00"));
        store.insert_indicator(&row).await.unwrap();
        store
            .insert_meeting(&meeting(acme.id, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()))
            .await
            .unwrap();

        let first = serde_json::to_string(&portfolio_summary(&store, feb_2026()).await.unwrap())
            .unwrap();
        let second = serde_json::to_string(&portfolio_summary(&store, feb_2026()).await.unwrap())
            .unwrap();
        assert_eq!(first, second);
    }
}

use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{PortfolioSummary, StartupMonitoringItem};
use crate::monitoring::MEETING_WINDOW_DAYS;
use crate::period::Period;

fn money(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |amount| amount.to_string())
}

/// Startups ordered by cash balance, the ones without a snapshot last.
fn by_cash(items: &[StartupMonitoringItem]) -> Vec<&StartupMonitoringItem> {
    let mut sorted: Vec<&StartupMonitoringItem> = items.iter().collect();
    sorted.sort_by(|a, b| match (a.cash_balance, b.cash_balance) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.startup.name.cmp(&b.startup.name),
    });
    sorted
}

pub fn build_report(summary: &PortfolioSummary, today: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Portfolio Monitoring Report");
    let _ = writeln!(
        output,
        "Generated on {} for period {}",
        today,
        Period::containing(today)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Startups: {}", summary.total_startups);
    let _ = writeln!(output, "- Portfolio revenue: {}", summary.portfolio_revenue);
    let _ = writeln!(
        output,
        "- Reported this month: {:.1}%",
        summary.monthly_report_pct
    );
    let _ = writeln!(
        output,
        "- Board meeting in the last {} days: {:.1}%",
        MEETING_WINDOW_DAYS, summary.routines_up_to_date_pct
    );

    let health = summary.portfolio_health;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Health");
    let _ = writeln!(output, "- healthy: {}", health.healthy);
    let _ = writeln!(output, "- warning: {}", health.warning);
    let _ = writeln!(output, "- critical: {}", health.critical);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Startups");

    if summary.startups.is_empty() {
        let _ = writeln!(output, "No startups in the portfolio.");
    } else {
        for item in summary.startups.iter() {
            let headcount = item
                .headcount
                .map_or_else(|| "n/a".to_string(), |count| count.to_string());
            let _ = writeln!(
                output,
                "- {} ({}, {}) revenue {} cash {} burn {} headcount {}",
                item.startup.name,
                item.startup.sector,
                item.startup.status,
                money(item.total_revenue),
                money(item.cash_balance),
                money(item.ebitda_burn),
                headcount
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Lowest Cash");

    let lowest: Vec<&StartupMonitoringItem> = by_cash(&summary.startups)
        .into_iter()
        .filter(|item| item.cash_balance.is_some())
        .take(3)
        .collect();
    if lowest.is_empty() {
        let _ = writeln!(output, "No cash balances reported.");
    } else {
        for item in lowest {
            let _ = writeln!(
                output,
                "- {}: {}",
                item.startup.name,
                money(item.cash_balance)
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StartupStatus;
    use crate::monitoring;
    use crate::store::{IndicatorStore, MemoryStore, StartupStore};
    use crate::testing::{indicator, startup};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    #[tokio::test]
    async fn empty_portfolio_renders_placeholders() {
        let store = MemoryStore::new();
        let summary = monitoring::portfolio_summary(&store, today()).await.unwrap();
        let report = build_report(&summary, today());
        assert!(report.starts_with("# Portfolio Monitoring Report\n"));
        assert!(report.contains("period 02/2026"));
        assert!(report.contains("- Startups: 0"));
        assert!(report.contains("No startups in the portfolio."));
        assert!(report.contains("No cash balances reported."));
    }

    #[tokio::test]
    async fn lists_startups_and_lowest_cash_first() {
        let store = MemoryStore::new();
        let rich = startup("Rich", StartupStatus::Healthy);
        let poor = startup("Poor", StartupStatus::Critical);
        let blank = startup("Blank", StartupStatus::Warning);
        for s in [&rich, &poor, &blank] {
            store.insert_startup(s).await.unwrap();
        }
        let mut row = indicator(rich.id, 2, 2026);
        row.cash_balance = Some("90000.00".parse().unwrap());
        row.total_revenue = Some("1200.00".parse().unwrap());
        store.insert_indicator(&row).await.unwrap();
        let mut row = indicator(poor.id, 1, 2026);
        row.cash_balance = Some("1500.00".parse().unwrap());
        store.insert_indicator(&row).await.unwrap();

        let summary = monitoring::portfolio_summary(&store, today()).await.unwrap();
        let report = build_report(&summary, today());

        assert!(report.contains("- Reported this month: 33.3%"));
        assert!(report.contains("- Blank (Fintech, warning) revenue n/a cash n/a burn n/a headcount n/a"));
        let lowest = report.split("## Lowest Cash").nth(1).unwrap();
        assert_eq!(lowest.trim(), "- Poor: 1500.00\n- Rich: 90000.00");
    }
}

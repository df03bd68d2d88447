use std::collections::HashMap;
use std::io;
use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{BoardMeeting, MonthlyIndicator, Startup, StartupStatus};
use crate::period::Period;
use crate::store::{Store, StoreResult};

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

pub async fn init_db(pool: &PgPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

struct SeedStartup {
    name: &'static str,
    sector: &'static str,
    status: StartupStatus,
    invested: (i32, u32, u32),
    revenue: &'static str,
    cash: &'static str,
    burn: &'static str,
    headcount: i32,
    /// Days since the last board meeting, if any.
    last_meeting: Option<i64>,
}

fn seed_startups() -> Vec<SeedStartup> {
    vec![
        SeedStartup {
            name: "Aurora Logistics",
            sector: "Logistics",
            status: StartupStatus::Healthy,
            invested: (2023, 4, 12),
            revenue: "182500.00",
            cash: "1450000.00",
            burn: "-38000.00",
            headcount: 34,
            last_meeting: Some(21),
        },
        SeedStartup {
            name: "Brisa Health",
            sector: "Healthtech",
            status: StartupStatus::Warning,
            invested: (2024, 1, 8),
            revenue: "64300.50",
            cash: "410000.00",
            burn: "-72000.00",
            headcount: 18,
            last_meeting: Some(75),
        },
        SeedStartup {
            name: "Cobalto Pay",
            sector: "Fintech",
            status: StartupStatus::Critical,
            invested: (2022, 9, 30),
            revenue: "23900.00",
            cash: "95000.00",
            burn: "-51000.00",
            headcount: 11,
            last_meeting: Some(140),
        },
        SeedStartup {
            name: "Duna Agro",
            sector: "Agtech",
            status: StartupStatus::Healthy,
            invested: (2025, 2, 3),
            revenue: "41200.00",
            cash: "780000.00",
            burn: "4500.00",
            headcount: 9,
            last_meeting: None,
        },
    ]
}

fn dec(value: &str) -> anyhow::Result<Decimal> {
    value
        .parse::<Decimal>()
        .with_context(|| format!("invalid decimal {value}"))
}

/// Loads a small demo portfolio; startups already present by name are left alone.
#[instrument(skip(store))]
pub async fn seed(store: &dyn Store, today: NaiveDate) -> anyhow::Result<usize> {
    let existing: Vec<String> = store
        .list_startups()
        .await?
        .into_iter()
        .map(|startup| startup.name)
        .collect();
    let current = Period::containing(today);
    let previous = current.previous();
    let now = Utc::now();
    let mut inserted = 0usize;

    for entry in seed_startups() {
        if existing.iter().any(|name| name == entry.name) {
            continue;
        }
        let (year, month, day) = entry.invested;
        let startup = Startup {
            id: Uuid::new_v4(),
            name: entry.name.to_string(),
            site: None,
            logo_url: None,
            status: entry.status,
            sector: entry.sector.to_string(),
            investment_date: NaiveDate::from_ymd_opt(year, month, day)
                .context("invalid seed date")?,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_startup(&startup).await?;

        // Startups with a stale routine also lag on reporting.
        let reported = if entry.last_meeting.is_some_and(|days| days <= 90) {
            current
        } else {
            previous
        };
        let indicator = MonthlyIndicator {
            id: Uuid::new_v4(),
            startup_id: startup.id,
            month: reported.month,
            year: reported.year,
            total_revenue: Some(dec(entry.revenue)?),
            recurring_revenue_pct: None,
            gross_margin_pct: None,
            cash_balance: Some(dec(entry.cash)?),
            headcount: Some(entry.headcount),
            ebitda_burn: Some(dec(entry.burn)?),
            achievements: None,
            challenges: None,
            comments: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_indicator(&indicator).await?;

        if let Some(days) = entry.last_meeting {
            store
                .insert_meeting(&BoardMeeting {
                    id: Uuid::new_v4(),
                    startup_id: startup.id,
                    meeting_date: today - Duration::days(days),
                    participants: Some("Founders, board".to_string()),
                    summary: None,
                    attention_points: None,
                    next_steps: None,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        inserted += 1;
    }

    info!(inserted, "seed complete");
    Ok(inserted)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

#[derive(serde::Deserialize)]
struct CsvRow {
    startup_name: String,
    month: i32,
    year: i32,
    total_revenue: Option<Decimal>,
    recurring_revenue_pct: Option<Decimal>,
    gross_margin_pct: Option<Decimal>,
    cash_balance: Option<Decimal>,
    headcount: Option<i32>,
    ebitda_burn: Option<Decimal>,
    comments: Option<String>,
}

impl CsvRow {
    fn write_into(self, indicator: &mut MonthlyIndicator) {
        indicator.total_revenue = self.total_revenue;
        indicator.recurring_revenue_pct = self.recurring_revenue_pct;
        indicator.gross_margin_pct = self.gross_margin_pct;
        indicator.cash_balance = self.cash_balance;
        indicator.headcount = self.headcount;
        indicator.ebitda_burn = self.ebitda_burn;
        indicator.comments = self.comments;
    }
}

pub async fn import_csv(
    store: &dyn Store,
    csv_path: &Path,
    today: NaiveDate,
) -> anyhow::Result<ImportOutcome> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    import_reader(store, file, today).await
}

/// Upserts one indicator per row, matching startups by exact name.
pub async fn import_reader<R: io::Read>(
    store: &dyn Store,
    input: R,
    today: NaiveDate,
) -> anyhow::Result<ImportOutcome> {
    let by_name: HashMap<String, Uuid> = store
        .list_startups()
        .await?
        .into_iter()
        .map(|startup| (startup.name, startup.id))
        .collect();

    // Parse everything up front so a malformed file writes nothing.
    let mut reader = csv::Reader::from_reader(input);
    let rows = reader
        .deserialize::<CsvRow>()
        .collect::<Result<Vec<_>, _>>()
        .context("malformed indicator CSV")?;

    let mut outcome = ImportOutcome::default();
    for (line, row) in rows.into_iter().enumerate() {
        let Some(&startup_id) = by_name.get(&row.startup_name) else {
            warn!(line = line + 2, startup = %row.startup_name, "unknown startup, row skipped");
            outcome.skipped += 1;
            continue;
        };
        let period = match Period::reportable(row.month, row.year, today) {
            Ok(period) => period,
            Err(err) => {
                warn!(line = line + 2, error = %err, "invalid period, row skipped");
                outcome.skipped += 1;
                continue;
            }
        };

        let now = Utc::now();
        match store.indicator_for_period(startup_id, period).await? {
            Some(mut indicator) => {
                row.write_into(&mut indicator);
                indicator.updated_at = now;
                store.update_indicator(&indicator).await?;
                outcome.updated += 1;
            }
            None => {
                let mut indicator = MonthlyIndicator {
                    id: Uuid::new_v4(),
                    startup_id,
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
                row.write_into(&mut indicator);
                store.insert_indicator(&indicator).await?;
                outcome.inserted += 1;
            }
        }
    }

    info!(?outcome, "indicator import finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring;
    use crate::store::{IndicatorStore, MemoryStore, StartupStore};
    use crate::testing::startup;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    #[tokio::test]
    async fn seed_is_idempotent_by_name() {
        let store = MemoryStore::new();
        assert_eq!(seed(&store, today()).await.unwrap(), 4);
        assert_eq!(seed(&store, today()).await.unwrap(), 0);
        assert_eq!(store.list_startups().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn seeded_portfolio_has_partial_coverage() {
        let store = MemoryStore::new();
        seed(&store, today()).await.unwrap();
        let summary = monitoring::portfolio_summary(&store, today()).await.unwrap();
        assert_eq!(summary.total_startups, 4);
        assert_eq!(summary.monthly_report_pct, 50.0);
        assert_eq!(summary.routines_up_to_date_pct, 50.0);
        assert_eq!(summary.portfolio_health.healthy, 2);
    }

    #[tokio::test]
    async fn import_upserts_and_skips_bad_rows() {
        let store = MemoryStore::new();
        let acme = startup("Acme", StartupStatus::Healthy);
        store.insert_startup(&acme).await.unwrap();

        let csv = "\
startup_name,month,year,total_revenue,recurring_revenue_pct,gross_margin_pct,cash_balance,headcount,ebitda_burn,comments
Acme,1,2026,100.00,,,5000.00,3,-20.00,first
Acme,1,2026,120.00,,,4800.00,4,-25.00,restated
Acme,2,2026,130.00,,,,,,
Ghost,1,2026,1.00,,,,,,
Acme,13,2026,1.00,,,,,,
Acme,6,2026,1.00,,,,,,
";
        let outcome = import_reader(&store, csv.as_bytes(), today()).await.unwrap();
        assert_eq!(
            outcome,
            ImportOutcome {
                inserted: 2,
                updated: 1,
                skipped: 3
            }
        );

        let january = store
            .indicator_for_period(acme.id, Period::new(1, 2026).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(january.total_revenue, Some("120.00".parse().unwrap()));
        assert_eq!(january.headcount, Some(4));
        assert_eq!(january.comments.as_deref(), Some("restated"));
    }

    #[tokio::test]
    async fn malformed_csv_writes_nothing() {
        let store = MemoryStore::new();
        let acme = startup("Acme", StartupStatus::Healthy);
        store.insert_startup(&acme).await.unwrap();

        let csv = "startup_name,month,year\nAcme,1,2026\nAcme,not-a-month,2026\n";
        assert!(import_reader(&store, csv.as_bytes(), today()).await.is_err());
        assert!(store.indicators_for_startup(acme.id).await.unwrap().is_empty());
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

mod api;
mod config;
mod db;
mod error;
mod logging;
mod models;
mod monitoring;
mod period;
mod report;
mod service;
mod store;
#[cfg(test)]
mod testing;

use config::Settings;
use store::{MemoryStore, PgStore, Store};

#[derive(Parser)]
#[command(name = "portfolio-monitor")]
#[command(about = "Portfolio monitoring backend for venture investors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo portfolio
    Seed,
    /// Import monthly indicators from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the portfolio summary as JSON
    Summary,
    /// Generate a markdown portfolio report
    Report {
        #[arg(long, default_value = "portfolio-report.md")]
        out: PathBuf,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Keep data in memory instead of Postgres
        #[arg(long)]
        memory: bool,
    },
}

async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn Store>> {
    let pool = db::connect(
        settings.require_database_url()?,
        settings.db_max_connections,
    )
    .await?;
    Ok(Arc::new(PgStore::new(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load();
    let cli = Cli::parse();
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            let pool = db::connect(
                settings.require_database_url()?,
                settings.db_max_connections,
            )
            .await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let store = open_store(&settings).await?;
            let inserted = db::seed(store.as_ref(), today).await?;
            println!("Seeded {inserted} startups.");
        }
        Commands::Import { csv } => {
            let store = open_store(&settings).await?;
            let outcome = db::import_csv(store.as_ref(), &csv, today).await?;
            println!(
                "Imported {} from {}: {} inserted, {} updated, {} skipped.",
                outcome.inserted + outcome.updated,
                csv.display(),
                outcome.inserted,
                outcome.updated,
                outcome.skipped
            );
        }
        Commands::Summary => {
            let store = open_store(&settings).await?;
            let summary = monitoring::portfolio_summary(store.as_ref(), today).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Report { out } => {
            let store = open_store(&settings).await?;
            let summary = monitoring::portfolio_summary(store.as_ref(), today).await?;
            std::fs::write(&out, report::build_report(&summary, today))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Serve { host, port, memory } => {
            let store: Arc<dyn Store> = if memory {
                info!("using in-memory store; data is lost on exit");
                Arc::new(MemoryStore::new())
            } else {
                open_store(&settings).await?
            };
            api::serve(store, &settings.cors_origins, host, port).await?;
        }
    }

    Ok(())
}

//! Runtime configuration resolved from `.env` and the environment.

use std::env;

use anyhow::Context;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Postgres connection string; only Postgres-backed commands need it.
    pub database_url: Option<String>,
    /// Upper bound of the sqlx connection pool.
    pub db_max_connections: u32,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let cors_origins = parse_origins(env::var("CORS_ORIGINS").ok().as_deref());

        Self {
            database_url,
            db_max_connections,
            cors_origins,
        }
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a Postgres instance")
    }
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        vec![DEFAULT_CORS_ORIGIN.to_string()]
    } else {
        origins
    }
}

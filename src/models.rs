use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::Period;

/// Manually assigned health bucket of a portfolio company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupStatus {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl StartupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for StartupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartupStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "healthy" => Ok(Self::Healthy),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Kanban column of a deal in the pipeline, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealColumn {
    #[default]
    New,
    Talking,
    Analyzing,
    Committee,
    Invested,
    Archived,
}

impl DealColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Talking => "talking",
            Self::Analyzing => "analyzing",
            Self::Committee => "committee",
            Self::Invested => "invested",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for DealColumn {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "talking" => Ok(Self::Talking),
            "analyzing" => Ok(Self::Analyzing),
            "committee" => Ok(Self::Committee),
            "invested" => Ok(Self::Invested),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown variant `{0}`")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Startup {
    pub id: Uuid,
    pub name: String,
    pub site: Option<String>,
    pub logo_url: Option<String>,
    pub status: StartupStatus,
    pub sector: String,
    pub investment_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIndicator {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub total_revenue: Option<Decimal>,
    pub recurring_revenue_pct: Option<Decimal>,
    pub gross_margin_pct: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub headcount: Option<i32>,
    /// Signed; negative means net burn.
    pub ebitda_burn: Option<Decimal>,
    pub achievements: Option<String>,
    pub challenges: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyIndicator {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMeeting {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub meeting_date: NaiveDate,
    pub participants: Option<String>,
    pub summary: Option<String>,
    pub attention_points: Option<String>,
    pub next_steps: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executive {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: Uuid,
    pub company: String,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub founders: Option<String>,
    pub column: DealColumn,
    pub notes: Option<String>,
    pub next_step: Option<String>,
    pub internal_owner: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-off capability letting a founder report a single period without logging in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportToken {
    pub id: Uuid,
    pub token: Uuid,
    pub startup_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl ReportToken {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthDistribution {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl HealthDistribution {
    pub fn record(&mut self, status: StartupStatus) {
        match status {
            StartupStatus::Healthy => self.healthy += 1,
            StartupStatus::Warning => self.warning += 1,
            StartupStatus::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.warning + self.critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartupMonitoringItem {
    pub startup: Startup,
    pub total_revenue: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub ebitda_burn: Option<Decimal>,
    pub headcount: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_startups: usize,
    pub portfolio_revenue: Decimal,
    pub portfolio_health: HealthDistribution,
    pub monthly_report_pct: f64,
    pub routines_up_to_date_pct: f64,
    pub startups: Vec<StartupMonitoringItem>,
}

//! Row builders shared by the unit tests.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{BoardMeeting, MonthlyIndicator, Startup, StartupStatus};

pub fn startup(name: &str, status: StartupStatus) -> Startup {
    let now = Utc::now();
    Startup {
        id: Uuid::new_v4(),
        name: name.to_string(),
        site: None,
        logo_url: None,
        status,
        sector: "Fintech".to_string(),
        investment_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn indicator(startup_id: Uuid, month: i32, year: i32) -> MonthlyIndicator {
    let now = Utc::now();
    MonthlyIndicator {
        id: Uuid::new_v4(),
        startup_id,
        month,
        year,
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
    }
}

pub fn meeting(startup_id: Uuid, meeting_date: NaiveDate) -> BoardMeeting {
    let now = Utc::now();
    BoardMeeting {
        id: Uuid::new_v4(),
        startup_id,
        meeting_date,
        participants: None,
        summary: None,
        attention_points: None,
        next_steps: None,
        created_at: now,
        updated_at: now,
    }
}

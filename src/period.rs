use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// A reporting cycle. Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("month must be between 1 and 12, got {0}")]
    Month(i32),
    #[error("year must be between {MIN_YEAR} and {MAX_YEAR}, got {0}")]
    Year(i32),
    #[error("period {0} cannot be in the future")]
    Future(Period),
}

impl Period {
    pub fn new(month: i32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::Month(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::Year(year));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    /// Range-checked period that does not lie after the month of `today`.
    pub fn reportable(month: i32, year: i32, today: NaiveDate) -> Result<Self, PeriodError> {
        let period = Self::new(month, year)?;
        if period > Self::containing(today) {
            return Err(PeriodError::Future(period));
        }
        Ok(period)
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ordering_is_chronological() {
        let march_2026 = Period::new(3, 2026).unwrap();
        let december_2025 = Period::new(12, 2025).unwrap();
        assert!(march_2026 > december_2025);
        assert!(Period::new(2, 2026).unwrap() > Period::new(1, 2026).unwrap());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(Period::new(0, 2026), Err(PeriodError::Month(0)));
        assert_eq!(Period::new(13, 2026), Err(PeriodError::Month(13)));
        assert_eq!(Period::new(1, 1999), Err(PeriodError::Year(1999)));
        assert_eq!(Period::new(1, 2101), Err(PeriodError::Year(2101)));
    }

    #[test]
    fn current_month_is_reportable() {
        let today = date(2026, 2, 15);
        assert!(Period::reportable(2, 2026, today).is_ok());
        assert!(Period::reportable(12, 2025, today).is_ok());
    }

    #[test]
    fn future_periods_are_rejected() {
        let today = date(2026, 2, 15);
        assert!(matches!(
            Period::reportable(3, 2026, today),
            Err(PeriodError::Future(_))
        ));
        assert!(matches!(
            Period::reportable(1, 2027, today),
            Err(PeriodError::Future(_))
        ));
    }

    #[test]
    fn previous_wraps_across_years() {
        assert_eq!(Period::new(1, 2026).unwrap().previous(), Period::new(12, 2025).unwrap());
        assert_eq!(Period::new(7, 2026).unwrap().previous(), Period::new(6, 2026).unwrap());
    }

    #[test]
    fn displays_zero_padded_month() {
        assert_eq!(Period::new(3, 2026).unwrap().to_string(), "03/2026");
    }
}

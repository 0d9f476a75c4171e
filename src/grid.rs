//! Calendar day grid generation.
//!
//! Enumerates every day of the requested quarters and tags each with the
//! attributes the distributor matches on: month, weekday position within the
//! month, and the calendar adjustment factor.

use crate::calendar::CalendarClassifier;
use crate::error::{BudgetDistributionError, Result};
use crate::utils::{last_day_of_month, quarter_months, validate_quarter, weekday_position};
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::collections::BTreeMap;

/// One calendar day, pre-tagged for weight matching.
#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub month: u32,
    pub quarter: u8,
    /// Position of this weekday within the month, 1-6.
    pub weekday_position: u8,
    /// Calendar adjustment factor from [`CalendarClassifier::adjustment_factor`].
    pub adjustment_factor: f64,
}

/// Days of each requested quarter, keyed by quarter number, dates ascending.
pub type DayGrid = BTreeMap<u8, Vec<CalendarDay>>;

/// Builds the day grid for `year` covering `quarters`.
pub fn generate_day_grid(
    year: i32,
    quarters: &[u8],
    classifier: &CalendarClassifier,
) -> Result<DayGrid> {
    let mut grid: DayGrid = BTreeMap::new();
    for &quarter in quarters {
        validate_quarter(quarter)?;
        let (first_month, last_month) = quarter_months(quarter);
        let mut days = Vec::new();
        for month in first_month..=last_month {
            for day in 1..=last_day_of_month(year, month).day() {
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or(BudgetDistributionError::InvalidYear(year))?;
                days.push(CalendarDay {
                    date,
                    month,
                    quarter,
                    weekday_position: weekday_position(day),
                    adjustment_factor: classifier.adjustment_factor(date),
                });
            }
        }
        debug!("Quarter {} of {}: {} calendar days", quarter, year, days.len());
        grid.insert(quarter, days);
    }
    Ok(grid)
}

use crate::error::{BudgetDistributionError, Result};
use chrono::{Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// First and last calendar month of a quarter (1-based).
pub fn quarter_months(quarter: u8) -> (u32, u32) {
    let start = (quarter as u32 - 1) * 3 + 1;
    (start, start + 2)
}

pub fn quarter_of_month(month: u32) -> u8 {
    ((month - 1) / 3 + 1) as u8
}

/// Position of a day within its month counted in weekday cycles:
/// days 1-7 are position 1 (the first Sunday, first Monday, ...),
/// days 8-14 position 2, and so on up to 5 for days 29-31.
pub fn weekday_position(day_of_month: u32) -> u8 {
    ((day_of_month - 1) / 7 + 1) as u8
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_quarter(quarter: u8) -> Result<()> {
    if !(1..=4).contains(&quarter) {
        return Err(BudgetDistributionError::InvalidQuarter(quarter));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 12),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_quarter_months() {
        assert_eq!(quarter_months(1), (1, 3));
        assert_eq!(quarter_months(2), (4, 6));
        assert_eq!(quarter_months(3), (7, 9));
        assert_eq!(quarter_months(4), (10, 12));
    }

    #[test]
    fn test_quarter_of_month() {
        assert_eq!(quarter_of_month(1), 1);
        assert_eq!(quarter_of_month(3), 1);
        assert_eq!(quarter_of_month(4), 2);
        assert_eq!(quarter_of_month(12), 4);
    }

    #[test]
    fn test_weekday_position() {
        assert_eq!(weekday_position(1), 1);
        assert_eq!(weekday_position(7), 1);
        assert_eq!(weekday_position(8), 2);
        assert_eq!(weekday_position(14), 2);
        assert_eq!(weekday_position(15), 3);
        assert_eq!(weekday_position(28), 4);
        assert_eq!(weekday_position(29), 5);
        assert_eq!(weekday_position(31), 5);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(3000.123456), 3000.1235);
        assert_eq!(round4(0.00004), 0.0);
        assert_eq!(round4(-1.23455), -1.2346);
    }

    #[test]
    fn test_validate_quarter() {
        assert!(validate_quarter(1).is_ok());
        assert!(validate_quarter(4).is_ok());
        assert!(validate_quarter(0).is_err());
        assert!(validate_quarter(5).is_err());
    }
}

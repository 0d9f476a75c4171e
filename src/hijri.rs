//! Gregorian to Hijri (Umm al-Qura style) date conversion.
//!
//! The conversion is table-driven: an embedded month-length table anchored
//! at 1 Muharram 1443 AH (10 August 2021). Lunar month lengths are not
//! derivable from arithmetic alone, so the table carries the announced
//! month lengths per year; outside the covered range conversion fails and
//! callers are expected to fall back to Gregorian-only rules.

use crate::error::{BudgetDistributionError, Result};
use chrono::NaiveDate;

/// First Hijri year covered by the month-length table.
const TABLE_FIRST_YEAR: i32 = 1443;

/// Gregorian date of 1 Muharram of `TABLE_FIRST_YEAR`.
fn table_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 8, 10).unwrap()
}

/// Month lengths per Hijri year, 1443 AH through 1452 AH
/// (Gregorian August 2021 through April 2031).
const MONTH_LENGTHS: [[u8; 12]; 10] = [
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1443
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1444
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 30], // 1445
    [30, 29, 30, 29, 30, 29, 30, 30, 30, 29, 29, 30], // 1446
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 30], // 1447
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1448
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1449
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 30], // 1450
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1451
    [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29], // 1452
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Converts a Gregorian date to its Hijri equivalent.
///
/// Returns `HijriOutOfRange` for dates before or after the embedded table;
/// the calendar classifier treats that as a recoverable condition, not a
/// request failure.
pub fn to_hijri(date: NaiveDate) -> Result<HijriDate> {
    let mut remaining = (date - table_epoch()).num_days();
    if remaining < 0 {
        return Err(BudgetDistributionError::HijriOutOfRange(date));
    }

    for (year_idx, lengths) in MONTH_LENGTHS.iter().enumerate() {
        for (month_idx, &len) in lengths.iter().enumerate() {
            let len = i64::from(len);
            if remaining < len {
                return Ok(HijriDate {
                    year: TABLE_FIRST_YEAR + year_idx as i32,
                    month: month_idx as u32 + 1,
                    day: remaining as u32 + 1,
                });
            }
            remaining -= len;
        }
    }

    Err(BudgetDistributionError::HijriOutOfRange(date))
}

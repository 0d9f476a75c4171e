use crate::hijri::to_hijri;
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};

/// Numeric adjustment factor per day category. Defaults match the KSA
/// operational calendar: Friday/Saturday weekends, reduced activity during
/// Ramadan, minimal activity during the Eid periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarFactors {
    pub weekday: f64,
    pub friday: f64,
    pub saturday: f64,
    pub holiday: f64,
    pub ramadan: f64,
    pub eid_fitr: f64,
    pub eid_adha: f64,
}

impl Default for CalendarFactors {
    fn default() -> Self {
        Self {
            weekday: 1.0,
            friday: 0.5,
            saturday: 0.6,
            holiday: 0.5,
            ramadan: 0.7,
            eid_fitr: 0.3,
            eid_adha: 0.3,
        }
    }
}

impl CalendarFactors {
    /// A factor table where every day weighs the same. Useful for
    /// deterministic tests and for callers that want positional weights
    /// without calendar damping.
    pub fn uniform() -> Self {
        Self {
            weekday: 1.0,
            friday: 1.0,
            saturday: 1.0,
            holiday: 1.0,
            ramadan: 1.0,
            eid_fitr: 1.0,
            eid_adha: 1.0,
        }
    }
}

/// Immutable classifier configuration, injected at construction so that
/// alternative holiday sets and factor tables can be tested without
/// touching process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub factors: CalendarFactors,
    /// Fixed-Gregorian national holidays as (month, day).
    pub gregorian_holidays: Vec<(u32, u32)>,
    /// Hijri-calendar holidays as (month, day).
    pub hijri_holidays: Vec<(u32, u32)>,
    pub ramadan_month: u32,
    pub eid_fitr_month: u32,
    pub eid_fitr_days: (u32, u32),
    pub eid_adha_month: u32,
    pub eid_adha_days: (u32, u32),
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            factors: CalendarFactors::default(),
            // Saudi National Day and Founding Day.
            gregorian_holidays: vec![(9, 23), (2, 22)],
            // Islamic New Year.
            hijri_holidays: vec![(1, 1)],
            ramadan_month: 9,
            eid_fitr_month: 10,
            eid_fitr_days: (1, 4),
            eid_adha_month: 12,
            eid_adha_days: (9, 13),
        }
    }
}

/// The single category a calendar day falls into, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCategory {
    EidAlAdha,
    EidAlFitr,
    NationalHoliday,
    HijriHoliday,
    Ramadan,
    Friday,
    Saturday,
    Weekday,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarClassifier {
    config: CalendarConfig,
}

impl CalendarClassifier {
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Classifies a date into exactly one category.
    ///
    /// Priority: Eid al-Adha, Eid al-Fitr, fixed Gregorian holiday, Hijri
    /// holiday, Ramadan, then day-of-week. A failed Hijri conversion only
    /// disables the Hijri-based checks; the date still classifies by the
    /// remaining rules.
    pub fn classify(&self, date: NaiveDate) -> DayCategory {
        let hijri = match to_hijri(date) {
            Ok(h) => Some(h),
            Err(e) => {
                debug!("Hijri conversion unavailable for {}: {}", date, e);
                None
            }
        };

        if let Some(h) = hijri {
            let (adha_start, adha_end) = self.config.eid_adha_days;
            if h.month == self.config.eid_adha_month && (adha_start..=adha_end).contains(&h.day) {
                return DayCategory::EidAlAdha;
            }

            let (fitr_start, fitr_end) = self.config.eid_fitr_days;
            if h.month == self.config.eid_fitr_month && (fitr_start..=fitr_end).contains(&h.day) {
                return DayCategory::EidAlFitr;
            }
        }

        if self
            .config
            .gregorian_holidays
            .contains(&(date.month(), date.day()))
        {
            return DayCategory::NationalHoliday;
        }

        if let Some(h) = hijri {
            if self.config.hijri_holidays.contains(&(h.month, h.day)) {
                return DayCategory::HijriHoliday;
            }

            if h.month == self.config.ramadan_month {
                return DayCategory::Ramadan;
            }
        }

        match date.weekday() {
            Weekday::Fri => DayCategory::Friday,
            Weekday::Sat => DayCategory::Saturday,
            _ => DayCategory::Weekday,
        }
    }

    pub fn factor_for(&self, category: DayCategory) -> f64 {
        let f = &self.config.factors;
        match category {
            DayCategory::EidAlAdha => f.eid_adha,
            DayCategory::EidAlFitr => f.eid_fitr,
            DayCategory::NationalHoliday | DayCategory::HijriHoliday => f.holiday,
            DayCategory::Ramadan => f.ramadan,
            DayCategory::Friday => f.friday,
            DayCategory::Saturday => f.saturday,
            DayCategory::Weekday => f.weekday,
        }
    }

    /// Calendar-adjustment factor for a date.
    pub fn adjustment_factor(&self, date: NaiveDate) -> f64 {
        self.factor_for(self.classify(date))
    }
}

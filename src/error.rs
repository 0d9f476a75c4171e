use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetDistributionError {
    #[error("No budget rows found for year {year}, scenario {scenario}")]
    NoBudgetRows { year: i32, scenario: String },

    #[error("Invalid quarter {0}: must be between 1 and 4")]
    InvalidQuarter(u8),

    #[error("Invalid year {0}: must be a positive calendar year")]
    InvalidYear(i32),

    #[error("Date {0} is outside the supported Hijri conversion range")]
    HijriOutOfRange(NaiveDate),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BudgetDistributionError>;

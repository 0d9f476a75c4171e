use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named what-if budget variant, carried as a dimension on every input and
/// output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    MostLikely,
    BestCase,
    WorstCase,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::MostLikely
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MostLikely => "most_likely",
            Self::BestCase => "best_case",
            Self::WorstCase => "worst_case",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum StayType {
    #[serde(rename = "OP")]
    #[schemars(description = "Outpatient visits. Census and episodes are distributed daily.")]
    Op,

    #[serde(rename = "ER")]
    #[schemars(description = "Emergency visits. Census and episodes are distributed daily.")]
    Er,

    #[serde(rename = "Non-LTC")]
    #[schemars(description = "Acute inpatient stays. Revenue only at daily grain.")]
    NonLtc,

    #[serde(rename = "LTC")]
    #[schemars(
        description = "Long-term care stays. Budgeted without a speciality; the daily split assigns specialities from historical weights."
    )]
    Ltc,
}

impl StayType {
    /// Whether census and episodes are meaningful at daily grain for this
    /// stay type. For the others those fields are emitted as 0.
    pub fn has_daily_census(self) -> bool {
        matches!(self, Self::Op | Self::Er)
    }
}

/// One quarterly budget total, as read from the analytical store's budget
/// view. `speciality` is absent for LTC rows by convention; the matched
/// historical weights supply specialities on output instead.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BudgetRow {
    pub branch_id: u8,
    pub year: i32,
    #[schemars(description = "Quarter 1-4 this total covers.")]
    pub quarter: u8,
    pub care_type: String,
    pub stay_type: StayType,
    pub speciality: Option<String>,
    pub census: f64,
    pub episodes: f64,
    #[schemars(description = "Cost per episode. A rate, copied to daily records rather than distributed.")]
    pub cpe: f64,
    #[schemars(description = "Average length of stay. A rate, copied to daily records rather than distributed.")]
    pub alos: f64,
    pub revenue: f64,
}

/// One historical actuals bucket, pre-averaged upstream over a trailing
/// window, as read from the weight-basis view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActualRecord {
    pub branch_id: u8,
    #[schemars(description = "Calendar month 1-12.")]
    pub month: u32,
    #[schemars(description = "Weekday position within the month, 1-6 (1st Sunday, 2nd Sunday, ...).")]
    pub day_position: u8,
    pub care_type: String,
    pub stay_type: StayType,
    pub speciality: Option<String>,
    pub census: f64,
    pub revenue: f64,
}

/// Parameters of one distribution run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DistributionRequest {
    pub year: i32,

    #[serde(default)]
    #[schemars(description = "Quarters to distribute. Empty means the full year (all four).")]
    pub quarters: Vec<u8>,

    #[serde(default)]
    pub scenario: Scenario,

    #[serde(default)]
    #[schemars(description = "Restrict the run to a single branch.")]
    pub branch_id: Option<u8>,
}

impl DistributionRequest {
    /// Quarters to process, expanding the empty list to the full year.
    pub fn effective_quarters(&self) -> Vec<u8> {
        if self.quarters.is_empty() {
            vec![1, 2, 3, 4]
        } else {
            let mut quarters = self.quarters.clone();
            quarters.sort_unstable();
            quarters.dedup();
            quarters
        }
    }
}

/// Display name for a branch id, for the known branch network.
pub fn branch_name(branch_id: u8) -> Option<&'static str> {
    match branch_id {
        1 => Some("Riyadh"),
        2 => Some("Khamis"),
        3 => Some("Jazan"),
        4 => Some("Qassem"),
        5 => Some("Madinah"),
        6 => Some("Abha"),
        _ => None,
    }
}

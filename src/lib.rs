//! # Daily Budget Distributor
//!
//! A library for spreading quarterly budget totals into calendar-day values
//! while preserving the source totals.
//!
//! Hospital budgets are planned per quarter for each branch, care type, stay
//! type and speciality, but operational reporting compares actuals against
//! budget day by day. This crate bridges the two grains:
//!
//! 1. **Historical weights**: actuals are normalized into per-group weights
//!    keyed by month and weekday position, so the daily shape of past
//!    activity (busy second Sundays, quiet month ends) carries into the
//!    distributed budget.
//! 2. **Calendar adjustment**: every day is classified against the KSA
//!    operational calendar, including Hijri-derived periods such as Ramadan
//!    and the Eids, and damped by a per-category factor.
//! 3. **Normalized distribution**: for each budget row the damped weights
//!    are renormalized to sum to one, so whatever shape emerges, the
//!    quarter's revenue and census totals survive the split.
//!
//! ## Usage
//!
//! ```no_run
//! use daily_budget_distributor::{
//!     distribute_daily_budget, ActualRecord, BudgetRow, DistributionRequest, Scenario,
//! };
//!
//! let request = DistributionRequest {
//!     year: 2025,
//!     quarters: vec![1, 2],
//!     scenario: Scenario::MostLikely,
//!     branch_id: None,
//! };
//! let budget: Vec<BudgetRow> = load_budget();
//! let actuals: Vec<ActualRecord> = load_actuals();
//!
//! let outcome = distribute_daily_budget(&request, &budget, &actuals)?;
//! println!(
//!     "distributed {} rows into {} daily records, revenue {} -> {}",
//!     budget.len(),
//!     outcome.details.len(),
//!     outcome.source_totals.revenue,
//!     outcome.distributed_totals.revenue
//! );
//! # fn load_budget() -> Vec<BudgetRow> { vec![] }
//! # fn load_actuals() -> Vec<ActualRecord> { vec![] }
//! # Ok::<(), daily_budget_distributor::BudgetDistributionError>(())
//! ```

pub mod aggregate;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hijri;
pub mod schema;
pub mod utils;
pub mod weights;

pub use aggregate::{DailySummaryRecord, Totals};
pub use calendar::{CalendarClassifier, CalendarConfig, CalendarFactors, DayCategory};
pub use error::{BudgetDistributionError, Result};
pub use grid::{CalendarDay, DayGrid};
pub use hijri::HijriDate;
pub use schema::{
    branch_name, ActualRecord, BudgetRow, DistributionRequest, Scenario, StayType,
};
pub use weights::{WeightGroupKey, WeightRecord};

use chrono::NaiveDate;
use log::{debug, info};
use schemars::JsonSchema;
use serde::Serialize;

/// One distributed day at full grain, before summary aggregation.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DailyDetailRecord {
    pub branch_id: u8,
    pub date: NaiveDate,
    pub year: i32,
    pub quarter: u8,
    pub care_type: String,
    pub stay_type: StayType,
    pub speciality: Option<String>,
    pub scenario: Scenario,
    #[schemars(description = "Daily census share, 0 for inpatient stay types.")]
    pub census: f64,
    pub episodes: f64,
    pub cpe: f64,
    pub alos: f64,
    pub revenue: f64,
}

/// Everything a distribution run produces: the detail and summary record
/// sets plus the totals on both sides of the reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionOutcome {
    pub year: i32,
    pub quarters: Vec<u8>,
    pub scenario: Scenario,
    pub details: Vec<DailyDetailRecord>,
    pub summary: Vec<DailySummaryRecord>,
    pub source_totals: Totals,
    pub distributed_totals: Totals,
}

impl DistributionOutcome {
    /// Serializes the outcome to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The top-level entry point. Holds the calendar classifier so a custom
/// holiday configuration or factor table is applied consistently across
/// runs.
#[derive(Debug, Clone, Default)]
pub struct DailyBudgetProcessor {
    classifier: CalendarClassifier,
}

impl DailyBudgetProcessor {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            classifier: CalendarClassifier::new(config),
        }
    }

    /// Runs one distribution: filters the budget to the requested year,
    /// quarters and branch, builds weights from the actuals, generates the
    /// day grid and distributes.
    ///
    /// Returns [`BudgetDistributionError::NoBudgetRows`] when nothing
    /// matches the request, and [`BudgetDistributionError::InvalidQuarter`]
    /// for quarters outside 1-4.
    pub fn process(
        &self,
        request: &DistributionRequest,
        budget: &[BudgetRow],
        actuals: &[ActualRecord],
    ) -> Result<DistributionOutcome> {
        let quarters = request.effective_quarters();
        for &quarter in &quarters {
            utils::validate_quarter(quarter)?;
        }

        let rows: Vec<BudgetRow> = budget
            .iter()
            .filter(|row| {
                row.year == request.year
                    && quarters.contains(&row.quarter)
                    && request.branch_id.map_or(true, |b| row.branch_id == b)
            })
            .cloned()
            .collect();
        if rows.is_empty() {
            return Err(BudgetDistributionError::NoBudgetRows {
                year: request.year,
                scenario: request.scenario.to_string(),
            });
        }
        info!(
            "Distributing {} budget rows for {} quarters {:?} ({})",
            rows.len(),
            request.year,
            quarters,
            request.scenario
        );

        let relevant_actuals: Vec<ActualRecord> = actuals
            .iter()
            .filter(|a| request.branch_id.map_or(true, |b| a.branch_id == b))
            .cloned()
            .collect();
        let weights = weights::build_weights(&relevant_actuals);
        let grid = grid::generate_day_grid(request.year, &quarters, &self.classifier)?;

        let details = engine::distribute(&rows, &weights, &grid, request.scenario);
        let summary = aggregate::aggregate(&details);

        let source_totals = aggregate::budget_totals(&rows);
        let distributed_totals = aggregate::detail_totals(&details);
        debug!(
            "Revenue reconciliation: source {} distributed {}",
            source_totals.revenue, distributed_totals.revenue
        );

        Ok(DistributionOutcome {
            year: request.year,
            quarters,
            scenario: request.scenario,
            details,
            summary,
            source_totals,
            distributed_totals,
        })
    }
}

/// Convenience wrapper around [`DailyBudgetProcessor`] with the default KSA
/// calendar configuration.
pub fn distribute_daily_budget(
    request: &DistributionRequest,
    budget: &[BudgetRow],
    actuals: &[ActualRecord],
) -> Result<DistributionOutcome> {
    DailyBudgetProcessor::default().process(request, budget, actuals)
}

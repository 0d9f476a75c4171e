//! Historical weight construction.
//!
//! Turns the flat list of historical actuals into normalized weights: each
//! record's share of its group's total, where a group is one
//! (branch, care type, stay type, quarter). Revenue and census shares are
//! normalized independently, because their daily shapes differ.

use crate::schema::{ActualRecord, StayType};
use crate::utils::quarter_of_month;
use log::debug;
use std::collections::HashMap;

/// Grouping key for weight normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightGroupKey {
    pub branch_id: u8,
    pub care_type: String,
    pub stay_type: StayType,
    pub quarter: u8,
}

impl WeightGroupKey {
    fn for_record(record: &ActualRecord) -> Self {
        Self {
            branch_id: record.branch_id,
            care_type: record.care_type.clone(),
            stay_type: record.stay_type,
            quarter: quarter_of_month(record.month),
        }
    }
}

/// One historical bucket with its normalized share of the group totals.
#[derive(Debug, Clone)]
pub struct WeightRecord {
    pub branch_id: u8,
    pub month: u32,
    pub day_position: u8,
    pub care_type: String,
    pub stay_type: StayType,
    pub speciality: Option<String>,
    pub quarter: u8,
    pub census: f64,
    pub revenue: f64,
    pub group_total_revenue: f64,
    pub group_total_census: f64,
    /// This record's revenue as a fraction of the group's revenue.
    pub revenue_weight: f64,
    /// This record's census as a fraction of the group's census.
    pub census_weight: f64,
}

/// Builds one [`WeightRecord`] per historical bucket.
///
/// Weights within a group sum to 1.0 whenever the group total is positive.
/// A non-positive group total yields zero weights for the whole group; the
/// distributor then falls back to calendar-only spreading for budget rows
/// that would have matched it.
pub fn build_weights(actuals: &[ActualRecord]) -> Vec<WeightRecord> {
    let mut totals: HashMap<WeightGroupKey, (f64, f64)> = HashMap::new();
    for record in actuals {
        let entry = totals
            .entry(WeightGroupKey::for_record(record))
            .or_insert((0.0, 0.0));
        entry.0 += record.revenue;
        entry.1 += record.census;
    }

    let weights: Vec<WeightRecord> = actuals
        .iter()
        .map(|record| {
            let key = WeightGroupKey::for_record(record);
            let (total_revenue, total_census) = totals[&key];
            let revenue_weight = if total_revenue > 0.0 {
                record.revenue / total_revenue
            } else {
                0.0
            };
            let census_weight = if total_census > 0.0 {
                record.census / total_census
            } else {
                0.0
            };
            WeightRecord {
                branch_id: record.branch_id,
                month: record.month,
                day_position: record.day_position,
                care_type: record.care_type.clone(),
                stay_type: record.stay_type,
                speciality: record.speciality.clone(),
                quarter: key.quarter,
                census: record.census,
                revenue: record.revenue,
                group_total_revenue: total_revenue,
                group_total_census: total_census,
                revenue_weight,
                census_weight,
            }
        })
        .collect();

    debug!(
        "Built {} weight records across {} groups",
        weights.len(),
        totals.len()
    );
    weights
}

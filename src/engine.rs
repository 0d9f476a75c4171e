//! The distribution core.
//!
//! Spreads each quarterly budget row across the days of its quarter. Rows
//! with matching historical weights follow the historical weekday-position
//! shape damped by the calendar factors; rows without usable weights fall
//! back to calendar-only spreading. Either way the quarter total is
//! preserved because every path normalizes its weights to sum to 1.

use crate::grid::{CalendarDay, DayGrid};
use crate::schema::{BudgetRow, Scenario, StayType};
use crate::utils::round4;
use crate::weights::WeightRecord;
use crate::DailyDetailRecord;
use log::debug;

/// Distributes `budget` rows over `grid`, one output record per matched
/// (day, speciality) pair. Rows whose quarter is absent from the grid are
/// skipped.
pub fn distribute(
    budget: &[BudgetRow],
    weights: &[WeightRecord],
    grid: &DayGrid,
    scenario: Scenario,
) -> Vec<DailyDetailRecord> {
    let mut records = Vec::new();

    for row in budget {
        let days = match grid.get(&row.quarter) {
            Some(days) => days,
            None => {
                debug!(
                    "Skipping budget row for branch {} quarter {}: quarter not requested",
                    row.branch_id, row.quarter
                );
                continue;
            }
        };

        let relevant: Vec<&WeightRecord> = weights
            .iter()
            .filter(|w| {
                w.branch_id == row.branch_id
                    && w.care_type == row.care_type
                    && w.stay_type == row.stay_type
                    && w.quarter == row.quarter
                    && (row.stay_type == StayType::Ltc || w.speciality == row.speciality)
            })
            .collect();

        if relevant.is_empty() {
            spread_by_calendar(row, days, scenario, &mut records);
            continue;
        }

        // Pair each day with every weight matching its month and weekday
        // position, damping both weight kinds by the calendar factor.
        let mut matched: Vec<(&CalendarDay, &WeightRecord, f64, f64)> = Vec::new();
        for day in days {
            for weight in &relevant {
                if weight.month == day.month && weight.day_position == day.weekday_position {
                    matched.push((
                        day,
                        weight,
                        weight.revenue_weight * day.adjustment_factor,
                        weight.census_weight * day.adjustment_factor,
                    ));
                }
            }
        }

        let total_adjusted: f64 = matched.iter().map(|(_, _, w, _)| w).sum();
        let total_adjusted_census: f64 = matched.iter().map(|(_, _, _, w)| w).sum();

        if total_adjusted <= 0.0 {
            debug!(
                "Branch {} {} {:?} Q{}: historical weights degenerate, using calendar fallback",
                row.branch_id, row.care_type, row.stay_type, row.quarter
            );
            spread_by_calendar(row, days, scenario, &mut records);
            continue;
        }

        for (day, weight, adjusted, adjusted_census) in matched {
            let share = adjusted / total_adjusted;
            let census_share = if total_adjusted_census > 0.0 {
                adjusted_census / total_adjusted_census
            } else {
                share
            };
            let (census, episodes) = if row.stay_type.has_daily_census() {
                (
                    round4(row.census * census_share),
                    round4(row.episodes * census_share),
                )
            } else {
                (0.0, 0.0)
            };
            // LTC is budgeted without a speciality; the historical weight
            // record supplies one on output.
            let speciality = if row.stay_type == StayType::Ltc {
                weight.speciality.clone()
            } else {
                row.speciality.clone()
            };
            records.push(DailyDetailRecord {
                branch_id: row.branch_id,
                date: day.date,
                year: row.year,
                quarter: row.quarter,
                care_type: row.care_type.clone(),
                stay_type: row.stay_type,
                speciality,
                scenario,
                census,
                episodes,
                cpe: row.cpe,
                alos: row.alos,
                revenue: round4(row.revenue * share),
            });
        }
    }

    records
}

/// Calendar-only spreading: one record per day, each day's share proportional
/// to its adjustment factor. Used when a row has no usable historical
/// weights.
fn spread_by_calendar(
    row: &BudgetRow,
    days: &[CalendarDay],
    scenario: Scenario,
    records: &mut Vec<DailyDetailRecord>,
) {
    let total_factor: f64 = days.iter().map(|d| d.adjustment_factor).sum();
    for day in days {
        let share = if total_factor > 0.0 {
            day.adjustment_factor / total_factor
        } else {
            1.0 / days.len() as f64
        };
        let (census, episodes) = if row.stay_type.has_daily_census() {
            (round4(row.census * share), round4(row.episodes * share))
        } else {
            (0.0, 0.0)
        };
        records.push(DailyDetailRecord {
            branch_id: row.branch_id,
            date: day.date,
            year: row.year,
            quarter: row.quarter,
            care_type: row.care_type.clone(),
            stay_type: row.stay_type,
            speciality: row.speciality.clone(),
            scenario,
            census,
            episodes,
            cpe: row.cpe,
            alos: row.alos,
            revenue: round4(row.revenue * share),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarClassifier, CalendarConfig, CalendarFactors};
    use crate::grid::generate_day_grid;
    use crate::schema::ActualRecord;
    use crate::weights::build_weights;

    fn uniform_classifier() -> CalendarClassifier {
        CalendarClassifier::new(CalendarConfig {
            factors: CalendarFactors::uniform(),
            ..CalendarConfig::default()
        })
    }

    fn budget_row(stay_type: StayType, speciality: Option<&str>, revenue: f64) -> BudgetRow {
        BudgetRow {
            branch_id: 1,
            year: 2025,
            quarter: 3,
            care_type: "Elective".to_string(),
            stay_type,
            speciality: speciality.map(|s| s.to_string()),
            census: 900.0,
            episodes: 450.0,
            cpe: 1200.0,
            alos: 2.5,
            revenue,
        }
    }

    fn actual(
        month: u32,
        day_position: u8,
        stay_type: StayType,
        speciality: Option<&str>,
        census: f64,
        revenue: f64,
    ) -> ActualRecord {
        ActualRecord {
            branch_id: 1,
            month,
            day_position,
            care_type: "Elective".to_string(),
            stay_type,
            speciality: speciality.map(|s| s.to_string()),
            census,
            revenue,
        }
    }

    #[test]
    fn test_calendar_fallback_without_weights() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 9200.0)];
        let records = distribute(&rows, &[], &grid, Scenario::MostLikely);

        // Q3 has 92 days; uniform factors give an even split.
        assert_eq!(records.len(), 92);
        assert!((records[0].revenue - 100.0).abs() < 1e-9);
        let total: f64 = records.iter().map(|r| r.revenue).sum();
        assert!((total - 9200.0).abs() < 1e-3);
        assert_eq!(records[0].speciality.as_deref(), Some("Cardiology"));
    }

    #[test]
    fn test_positional_weights_shape_distribution() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let actuals = vec![
            actual(7, 1, StayType::Op, Some("Cardiology"), 10.0, 100.0),
            actual(7, 2, StayType::Op, Some("Cardiology"), 10.0, 100.0),
            actual(7, 3, StayType::Op, Some("Cardiology"), 10.0, 100.0),
        ];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 9000.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        // Weekday positions 1-3 cover July days 1 through 21, one weight
        // match per day.
        assert_eq!(records.len(), 21);
        for record in &records {
            assert_eq!(record.date.format("%m").to_string(), "07");
            assert!((record.revenue - round4(9000.0 / 21.0)).abs() < 1e-9);
        }
        let total: f64 = records.iter().map(|r| r.revenue).sum();
        assert!((total - 9000.0).abs() < 1e-3);
    }

    #[test]
    fn test_census_uses_its_own_weights() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        // Revenue concentrated on position 1, census on position 2.
        let actuals = vec![
            actual(7, 1, StayType::Op, Some("Cardiology"), 10.0, 90.0),
            actual(7, 2, StayType::Op, Some("Cardiology"), 90.0, 10.0),
        ];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 1000.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        // 7 days per position; each position-1 day carries 0.9/7 of revenue
        // but only 0.1/7 of census.
        let first = records
            .iter()
            .find(|r| r.date.format("%d").to_string() == "01")
            .unwrap();
        assert!((first.revenue - round4(1000.0 * 0.9 / 7.0)).abs() < 1e-9);
        assert!((first.census - round4(900.0 * 0.1 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_census_follows_revenue_when_census_history_is_empty() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        // Revenue history exists but census history is all zero, so the
        // census side inherits the revenue shape.
        let actuals = vec![
            actual(7, 1, StayType::Op, Some("Cardiology"), 0.0, 300.0),
            actual(7, 2, StayType::Op, Some("Cardiology"), 0.0, 100.0),
        ];
        let weights = build_weights(&actuals);
        let mut row = budget_row(StayType::Op, Some("Cardiology"), 1000.0);
        row.census = 840.0;
        row.episodes = 420.0;
        let records = distribute(&[row], &weights, &grid, Scenario::MostLikely);

        // 7 days per position; position-1 days carry 0.75/7 of both
        // revenue and census.
        assert_eq!(records.len(), 14);
        let first = records
            .iter()
            .find(|r| r.date.format("%d").to_string() == "01")
            .unwrap();
        assert!((first.revenue - round4(1000.0 * 0.75 / 7.0)).abs() < 1e-9);
        assert!((first.census - 90.0).abs() < 1e-9);
        assert!((first.episodes - 45.0).abs() < 1e-9);
        let census_total: f64 = records.iter().map(|r| r.census).sum();
        assert!((census_total - 840.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_weights_fall_back_to_calendar() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let actuals = vec![actual(7, 1, StayType::Op, Some("Cardiology"), 0.0, 0.0)];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 9200.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        assert_eq!(records.len(), 92);
        let total: f64 = records.iter().map(|r| r.revenue).sum();
        assert!((total - 9200.0).abs() < 1e-3);
    }

    #[test]
    fn test_ltc_takes_speciality_from_weights() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let actuals = vec![
            actual(7, 1, StayType::Ltc, Some("Geriatrics"), 10.0, 300.0),
            actual(7, 1, StayType::Ltc, Some("Rehabilitation"), 10.0, 100.0),
        ];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Ltc, None, 4000.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        // 7 position-1 days in July, two specialities each.
        assert_eq!(records.len(), 14);
        let geriatrics: f64 = records
            .iter()
            .filter(|r| r.speciality.as_deref() == Some("Geriatrics"))
            .map(|r| r.revenue)
            .sum();
        assert!((geriatrics - 3000.0).abs() < 1e-3);
        // LTC never carries daily census.
        assert!(records.iter().all(|r| r.census == 0.0 && r.episodes == 0.0));
        let total: f64 = records.iter().map(|r| r.revenue).sum();
        assert!((total - 4000.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_ltc_weights_filtered_by_speciality() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let actuals = vec![
            actual(7, 1, StayType::Op, Some("Cardiology"), 10.0, 100.0),
            actual(7, 2, StayType::Op, Some("Neurology"), 10.0, 900.0),
        ];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 700.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        // Only the Cardiology weight applies, so only position-1 July days.
        assert_eq!(records.len(), 7);
        assert!(records
            .iter()
            .all(|r| r.speciality.as_deref() == Some("Cardiology")));
        assert!((records[0].revenue - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_outside_grid_are_skipped() {
        let grid = generate_day_grid(2025, &[1], &uniform_classifier()).unwrap();
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 9000.0)];
        let records = distribute(&rows, &[], &grid, Scenario::MostLikely);
        assert!(records.is_empty());
    }

    #[test]
    fn test_rates_copied_verbatim() {
        let grid = generate_day_grid(2025, &[3], &uniform_classifier()).unwrap();
        let rows = vec![budget_row(StayType::NonLtc, Some("Surgery"), 5000.0)];
        let records = distribute(&rows, &[], &grid, Scenario::MostLikely);
        assert!(records.iter().all(|r| r.cpe == 1200.0 && r.alos == 2.5));
        // Non-LTC rows emit zero census at daily grain.
        assert!(records.iter().all(|r| r.census == 0.0));
    }

    #[test]
    fn test_calendar_factors_damp_weighted_days() {
        // Default factors: Fridays in July get half the share of weekdays
        // at the same weekday position.
        let classifier = CalendarClassifier::new(CalendarConfig::default());
        let grid = generate_day_grid(2025, &[3], &classifier).unwrap();
        let actuals = vec![
            // 2025-07-01 is a Tuesday and 2025-07-04 a Friday, both at
            // weekday position 1.
            actual(7, 1, StayType::Op, Some("Cardiology"), 10.0, 100.0),
        ];
        let weights = build_weights(&actuals);
        let rows = vec![budget_row(StayType::Op, Some("Cardiology"), 1000.0)];
        let records = distribute(&rows, &weights, &grid, Scenario::MostLikely);

        let tuesday = records
            .iter()
            .find(|r| r.date.format("%d").to_string() == "01")
            .unwrap();
        let friday = records
            .iter()
            .find(|r| r.date.format("%d").to_string() == "04")
            .unwrap();
        assert!((friday.revenue / tuesday.revenue - 0.5).abs() < 1e-6);
        let total: f64 = records.iter().map(|r| r.revenue).sum();
        assert!((total - 1000.0).abs() < 1e-3);
    }
}

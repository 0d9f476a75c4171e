//! Distributes a small two-branch budget and prints the reconciliation.
//!
//! Run with: cargo run --example daily_distribution_demo

use anyhow::Result;
use daily_budget_distributor::{
    branch_name, distribute_daily_budget, ActualRecord, BudgetRow, DistributionRequest, Scenario,
    StayType,
};

fn main() -> Result<()> {
    let budget = vec![
        BudgetRow {
            branch_id: 1,
            year: 2025,
            quarter: 1,
            care_type: "Elective".to_string(),
            stay_type: StayType::Op,
            speciality: Some("Cardiology".to_string()),
            census: 900.0,
            episodes: 450.0,
            cpe: 1500.0,
            alos: 0.0,
            revenue: 675_000.0,
        },
        BudgetRow {
            branch_id: 2,
            year: 2025,
            quarter: 1,
            care_type: "Elective".to_string(),
            stay_type: StayType::Ltc,
            speciality: None,
            census: 55.0,
            episodes: 0.0,
            cpe: 0.0,
            alos: 180.0,
            revenue: 1_240_000.0,
        },
    ];

    // Historical shape: branch 2 LTC split between two specialities, busier
    // at the start of each month.
    let mut actuals = Vec::new();
    for month in 1..=3 {
        for position in 1..=5u8 {
            for speciality in ["Geriatrics", "Rehabilitation"] {
                actuals.push(ActualRecord {
                    branch_id: 2,
                    month,
                    day_position: position,
                    care_type: "Elective".to_string(),
                    stay_type: StayType::Ltc,
                    speciality: Some(speciality.to_string()),
                    census: 10.0,
                    revenue: 600.0 - 100.0 * position as f64,
                });
            }
        }
    }

    let request = DistributionRequest {
        year: 2025,
        quarters: vec![1],
        scenario: Scenario::MostLikely,
        branch_id: None,
    };
    let outcome = distribute_daily_budget(&request, &budget, &actuals)?;

    println!(
        "Distributed {} budget rows into {} daily records ({} summarized)",
        budget.len(),
        outcome.details.len(),
        outcome.summary.len()
    );
    println!(
        "Revenue: {:.2} budgeted -> {:.2} distributed",
        outcome.source_totals.revenue, outcome.distributed_totals.revenue
    );
    println!(
        "Census:  {:.2} budgeted -> {:.2} distributed",
        outcome.source_totals.census, outcome.distributed_totals.census
    );

    println!("\nFirst week of branch summaries:");
    for summary in outcome.summary.iter().take(14) {
        println!(
            "  {} {:<8} {:<9} {:<14} revenue {:>10.4} census {:>8.4}",
            summary.date,
            branch_name(summary.branch_id).unwrap_or("?"),
            format!("{:?}", summary.stay_type),
            summary.speciality.as_deref().unwrap_or("-"),
            summary.revenue,
            summary.census
        );
    }

    Ok(())
}

//! Labor and material cost aggregation over a company's rate book.

use std::collections::HashMap;

use db::models::production_rate::RateWithMaterials;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utils::format::round_cents;

#[derive(Debug, Error)]
pub enum LaborError {
    #[error("unknown rate code: {0}")]
    UnknownRateCode(String),
}

/// In-memory lookup of a company's production rates, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    rates: HashMap<String, RateWithMaterials>,
}

impl RateBook {
    pub fn new(rates: Vec<RateWithMaterials>) -> Self {
        Self {
            rates: rates
                .into_iter()
                .map(|r| (r.rate.code.clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&RateWithMaterials> {
        self.rates.get(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// One task the estimator picked, with an optional hours override.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskSelection {
    pub code: String,
    pub hours_override: Option<f64>,
}

/// Cost of a single selected task.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskCost {
    pub code: String,
    pub label: String,
    pub hours: f64,
    pub labor: f64,
    pub material: f64,
    pub total: f64,
}

/// Aggregated labor/material totals across a selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct LaborTotals {
    pub tasks: Vec<TaskCost>,
    pub labor_total: f64,
    pub material_total: f64,
    pub grand_total: f64,
}

/// Cost out a selection of tasks against the rate book.
///
/// Effective hours per task is the override when present, else the rate's
/// standard hours. Material cost is included only when `include_materials`
/// is set. A code missing from the book is an error rather than a silent
/// zero contribution.
pub fn aggregate(
    book: &RateBook,
    selections: &[TaskSelection],
    include_materials: bool,
) -> Result<LaborTotals, LaborError> {
    let mut totals = LaborTotals::default();

    for selection in selections {
        let entry = book
            .get(&selection.code)
            .ok_or_else(|| LaborError::UnknownRateCode(selection.code.clone()))?;

        let hours = selection.hours_override.unwrap_or(entry.rate.standard_hours);
        let labor = hours * entry.rate.hourly_rate;
        let material = if include_materials {
            entry
                .materials
                .iter()
                .map(|m| m.quantity * m.unit_price)
                .sum()
        } else {
            0.0
        };

        totals.labor_total += labor;
        totals.material_total += material;
        totals.tasks.push(TaskCost {
            code: entry.rate.code.clone(),
            label: entry.rate.label.clone(),
            hours,
            labor: round_cents(labor),
            material: round_cents(material),
            total: round_cents(labor + material),
        });
    }

    totals.labor_total = round_cents(totals.labor_total);
    totals.material_total = round_cents(totals.material_total);
    totals.grand_total = round_cents(totals.labor_total + totals.material_total);
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::production_rate::{ProductionRate, RateMaterial};
    use uuid::Uuid;

    use super::*;

    fn rate(code: &str, standard_hours: f64, hourly_rate: f64, materials: &[(f64, f64)]) -> RateWithMaterials {
        let rate_id = Uuid::new_v4();
        RateWithMaterials {
            rate: ProductionRate {
                id: rate_id,
                company_id: Uuid::new_v4(),
                template_id: None,
                code: code.to_string(),
                label: format!("{code} task"),
                standard_hours,
                hourly_rate,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            materials: materials
                .iter()
                .map(|&(quantity, unit_price)| RateMaterial {
                    id: Uuid::new_v4(),
                    rate_id,
                    name: "material".to_string(),
                    quantity,
                    unit_price,
                })
                .collect(),
        }
    }

    fn select(code: &str, hours_override: Option<f64>) -> TaskSelection {
        TaskSelection {
            code: code.to_string(),
            hours_override,
        }
    }

    #[test]
    fn empty_selection_totals_zero() {
        let book = RateBook::new(vec![rate("WALL", 2.0, 60.0, &[])]);
        let totals = aggregate(&book, &[], true).expect("aggregate");
        assert!(totals.tasks.is_empty());
        assert_eq!(totals.labor_total, 0.0);
        assert_eq!(totals.material_total, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn override_beats_standard_hours() {
        let book = RateBook::new(vec![rate("WALL", 2.0, 60.0, &[])]);
        let totals = aggregate(&book, &[select("WALL", Some(3.5))], false).expect("aggregate");
        assert_eq!(totals.tasks[0].hours, 3.5);
        assert_eq!(totals.labor_total, 210.0);
    }

    #[test]
    fn standard_hours_used_without_override() {
        let book = RateBook::new(vec![rate("WALL", 2.0, 60.0, &[])]);
        let totals = aggregate(&book, &[select("WALL", None)], false).expect("aggregate");
        assert_eq!(totals.labor_total, 120.0);
    }

    #[test]
    fn materials_flag_gates_material_cost() {
        let book = RateBook::new(vec![rate("CEIL", 1.0, 50.0, &[(2.0, 35.0), (1.0, 12.5)])]);

        let with = aggregate(&book, &[select("CEIL", None)], true).expect("aggregate");
        assert_eq!(with.material_total, 82.5);
        assert_eq!(with.grand_total, 132.5);

        let without = aggregate(&book, &[select("CEIL", None)], false).expect("aggregate");
        assert_eq!(without.material_total, 0.0);
        assert_eq!(without.grand_total, 50.0);
    }

    #[test]
    fn unknown_code_is_an_error() {
        let book = RateBook::new(vec![rate("WALL", 2.0, 60.0, &[])]);
        let err = aggregate(&book, &[select("NOPE", None)], true).unwrap_err();
        assert!(matches!(err, LaborError::UnknownRateCode(code) if code == "NOPE"));
    }

    #[test]
    fn multiple_tasks_sum() {
        let book = RateBook::new(vec![
            rate("WALL", 2.0, 60.0, &[(1.0, 40.0)]),
            rate("TRIM", 1.5, 70.0, &[]),
        ]);
        let totals = aggregate(
            &book,
            &[select("WALL", None), select("TRIM", Some(2.0))],
            true,
        )
        .expect("aggregate");
        assert_eq!(totals.labor_total, 120.0 + 140.0);
        assert_eq!(totals.material_total, 40.0);
        assert_eq!(totals.grand_total, 300.0);
    }
}

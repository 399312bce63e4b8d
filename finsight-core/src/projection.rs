//! Naive next-period spending projection.
//!
//! Overall spending uses a first-order linear extrapolation (last period plus
//! the mean month-over-month delta). Per-category figures use the flat average
//! only. This is not a time-series model.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::{sum_by_period, sum_by_reporting_category, total};
use crate::error::{EngineError, Result};
use crate::finance::{Category, Transaction};
use crate::time::{Bucket, DateRange};

/// Predict the next period's total from historical per-period totals.
///
/// With fewer than two periods there is no trend, so the flat average is returned.
pub fn project_next_period(period_totals: &[f64]) -> Result<f64> {
    match period_totals {
        [] => Err(EngineError::DivisionUndefined {
            quantity: "number of observed periods",
        }),
        [only] => Ok(*only),
        [.., last] => Ok(last + average_delta(period_totals)),
    }
}

fn average_delta(period_totals: &[f64]) -> f64 {
    let deltas: Vec<f64> = period_totals.windows(2).map(|w| w[1] - w[0]).collect();
    deltas.iter().sum::<f64>() / deltas.len() as f64
}

/// Flat average per reporting category: `category total / periods observed`
pub fn project_by_category(
    expenses: &[Transaction],
    periods_observed: u32,
) -> Result<BTreeMap<Category, f64>> {
    if periods_observed == 0 {
        return Err(EngineError::DivisionUndefined {
            quantity: "number of observed periods",
        });
    }
    let periods = f64::from(periods_observed);
    Ok(sum_by_reporting_category(expenses, &DateRange::all())
        .into_iter()
        .map(|(c, amount)| (c, amount / periods))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub next_period: f64,
    /// Mean month-over-month change; `None` when fewer than two months exist
    pub average_delta: Option<f64>,
    pub per_category: BTreeMap<Category, f64>,
}

/// Next-month forecast from monthly expense buckets.
///
/// Fewer than two months of history falls back to `total / periods_observed`.
pub fn forecast(expenses: &[Transaction], periods_observed: u32) -> Result<Forecast> {
    let per_category = project_by_category(expenses, periods_observed)?;
    let monthly: Vec<f64> = sum_by_period(expenses, Bucket::Month)
        .into_iter()
        .map(|p| p.total)
        .collect();

    let (next_period, average_delta) = if monthly.len() >= 2 {
        (project_next_period(&monthly)?, Some(average_delta(&monthly)))
    } else {
        (total(expenses) / f64::from(periods_observed), None)
    };

    Ok(Forecast {
        next_period,
        average_delta,
        per_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn test_single_period_is_identity() {
        assert_eq!(project_next_period(&[250.0]).unwrap(), 250.0);
    }

    #[test]
    fn test_two_periods_extrapolate() {
        assert_eq!(project_next_period(&[100.0, 120.0]).unwrap(), 140.0);
    }

    #[test]
    fn test_average_of_deltas() {
        // deltas: +50, -20 → mean +15
        assert_eq!(project_next_period(&[100.0, 150.0, 130.0]).unwrap(), 145.0);
    }

    #[test]
    fn test_empty_history_is_division_undefined() {
        assert!(matches!(
            project_next_period(&[]),
            Err(EngineError::DivisionUndefined { .. })
        ));
        assert!(project_by_category(&[], 0).is_err());
    }

    #[test]
    fn test_per_category_uses_flat_average() {
        let txns = vec![
            Transaction::expense("u1", d(1, 3), 300.0, "Food", "groceries"),
            Transaction::expense("u1", d(3, 3), 600.0, "Food", "groceries"),
        ];
        let by_cat = project_by_category(&txns, 3).unwrap();
        assert_eq!(by_cat.get(&Category::Food), Some(&300.0));
    }

    #[test]
    fn test_forecast_trend_and_fallback() {
        let trend = vec![
            Transaction::expense("u1", d(1, 3), 100.0, "Food", "a"),
            Transaction::expense("u1", d(2, 3), 120.0, "Food", "b"),
        ];
        let f = forecast(&trend, 2).unwrap();
        assert_eq!(f.next_period, 140.0);
        assert_eq!(f.average_delta, Some(20.0));

        let single = vec![Transaction::expense("u1", d(1, 3), 90.0, "Food", "a")];
        let f = forecast(&single, 3).unwrap();
        assert!((f.next_period - 30.0).abs() < 1e-9);
        assert_eq!(f.average_delta, None);
    }
}

//! 50/30/20 budget recommender.
//!
//! Each partition's monthly spend is scaled by one adjustment factor
//! (`target / current`) so the partition total hits its share of income while
//! the mix inside the partition is preserved.
//!
//! Known gaps, kept visible on the result rather than hidden:
//! - categories outside needs/wants (Education, Other) get no recommendation
//!   and are listed in `unallocated`;
//! - a partition with zero current spend gets no lines and is listed in
//!   `skipped`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::total;
use crate::error::{EngineError, Result};
use crate::finance::{BudgetGroup, Category, Transaction};
use crate::projection::project_by_category;

pub const NEEDS_SHARE: f64 = 0.5;
pub const WANTS_SHARE: f64 = 0.3;
pub const SAVINGS_SHARE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: Category,
    pub recommended: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub monthly_income: f64,
    /// Needs first, then wants, then `Savings`
    pub lines: Vec<BudgetLine>,
    pub unallocated: Vec<Category>,
    pub skipped: Vec<BudgetGroup>,
}

impl BudgetAllocation {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.lines
            .iter()
            .find(|l| l.category == category)
            .map(|l| l.recommended)
    }

    pub fn group_total(&self, group: BudgetGroup) -> f64 {
        self.lines
            .iter()
            .filter(|l| l.category.group() == group)
            .map(|l| l.recommended)
            .sum()
    }
}

/// Budgeted vs actual monthly spend for one allocation line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusLine {
    pub category: Category,
    pub budgeted: f64,
    pub actual: f64,
    pub percentage_used: f64,
}

pub fn recommend(
    income: &[Transaction],
    expenses: &[Transaction],
    periods_observed: u32,
) -> Result<BudgetAllocation> {
    if periods_observed == 0 {
        return Err(EngineError::DivisionUndefined {
            quantity: "number of observed periods",
        });
    }
    let monthly_income = total(income) / f64::from(periods_observed);
    if monthly_income == 0.0 {
        return Err(EngineError::DivisionUndefined {
            quantity: "monthly income",
        });
    }

    let monthly = project_by_category(expenses, periods_observed)?;
    let mut lines = Vec::new();
    let mut skipped = Vec::new();

    for (group, members, share) in [
        (BudgetGroup::Needs, &Category::NEEDS[..], NEEDS_SHARE),
        (BudgetGroup::Wants, &Category::WANTS[..], WANTS_SHARE),
    ] {
        let target = monthly_income * share;
        let current: f64 = members.iter().filter_map(|c| monthly.get(c)).sum();
        if current <= 0.0 {
            warn!(?group, goal = target, "no current spend in group; emitting no recommendations");
            skipped.push(group);
            continue;
        }
        let factor = target / current;
        debug!(?group, current, goal = target, factor, "adjustment factor");
        for c in members {
            if let Some(spend) = monthly.get(c) {
                lines.push(BudgetLine {
                    category: *c,
                    recommended: spend * factor,
                });
            }
        }
    }

    lines.push(BudgetLine {
        category: Category::Savings,
        recommended: monthly_income * SAVINGS_SHARE,
    });

    let unallocated: Vec<Category> = monthly
        .keys()
        .copied()
        .filter(|c| c.group() == BudgetGroup::Unallocated)
        .collect();
    if !unallocated.is_empty() {
        debug!(?unallocated, "categories outside needs/wants left unbudgeted");
    }

    Ok(BudgetAllocation {
        monthly_income,
        lines,
        unallocated,
        skipped,
    })
}

/// Compare each allocation line against actual average monthly spend.
pub fn budget_status(
    allocation: &BudgetAllocation,
    expenses: &[Transaction],
    periods_observed: u32,
) -> Result<Vec<BudgetStatusLine>> {
    let monthly = project_by_category(expenses, periods_observed)?;
    Ok(allocation
        .lines
        .iter()
        .map(|line| {
            let actual = monthly.get(&line.category).copied().unwrap_or(0.0);
            let percentage_used = if line.recommended > 0.0 {
                actual / line.recommended * 100.0
            } else {
                0.0
            };
            BudgetStatusLine {
                category: line.category,
                budgeted: line.recommended,
                actual,
                percentage_used,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-6;

    fn d(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, 1).unwrap()
    }

    fn salary(m: u32, amount: f64) -> Transaction {
        Transaction::income("u1", d(m), amount, "Salary", "Monthly Salary")
    }

    fn spend(m: u32, amount: f64, cat: &str) -> Transaction {
        Transaction::expense("u1", d(m), amount, cat, cat)
    }

    #[test]
    fn test_housing_only_scenario() {
        let income = vec![salary(1, 3000.0), salary(2, 3000.0), salary(3, 3000.0)];
        let expenses = vec![spend(1, 1500.0, "Housing"), spend(2, 1500.0, "Housing"), spend(3, 1500.0, "Housing")];
        let budget = recommend(&income, &expenses, 3).unwrap();

        assert!((budget.monthly_income - 3000.0).abs() < EPS);
        assert!((budget.get(Category::Housing).unwrap() - 1500.0).abs() < EPS);
        assert!((budget.get(Category::Savings).unwrap() - 600.0).abs() < EPS);
        assert_eq!(budget.skipped, vec![BudgetGroup::Wants]);
    }

    #[test]
    fn test_partitions_hit_targets_and_keep_mix() {
        let income = vec![salary(1, 4000.0), salary(2, 4000.0)];
        let expenses = vec![
            spend(1, 1200.0, "Housing"),
            spend(1, 400.0, "Food"),
            spend(2, 1200.0, "Housing"),
            spend(2, 400.0, "Food"),
            spend(1, 100.0, "Entertainment"),
            spend(2, 300.0, "Travel"),
        ];
        let budget = recommend(&income, &expenses, 2).unwrap();

        assert!((budget.group_total(BudgetGroup::Needs) - 2000.0).abs() < EPS);
        assert!((budget.group_total(BudgetGroup::Wants) - 1200.0).abs() < EPS);
        // Housing:Food stays 3:1
        let ratio = budget.get(Category::Housing).unwrap() / budget.get(Category::Food).unwrap();
        assert!((ratio - 3.0).abs() < EPS);
        assert_eq!(budget.lines.last().unwrap().category, Category::Savings);
    }

    #[test]
    fn test_zero_income_is_division_undefined() {
        let expenses = vec![spend(1, 100.0, "Food")];
        let err = recommend(&[], &expenses, 3).unwrap_err();
        assert_eq!(
            err,
            EngineError::DivisionUndefined {
                quantity: "monthly income"
            }
        );
    }

    #[test]
    fn test_unallocated_categories_are_reported() {
        let income = vec![salary(1, 2000.0)];
        let expenses = vec![spend(1, 200.0, "Education"), spend(1, 50.0, "Crypto"), spend(1, 500.0, "Food")];
        let budget = recommend(&income, &expenses, 1).unwrap();
        assert_eq!(budget.unallocated, vec![Category::Education, Category::Other]);
        assert_eq!(budget.get(Category::Education), None);
    }

    #[test]
    fn test_budget_status_percentages() {
        let income = vec![salary(1, 3000.0)];
        let expenses = vec![spend(1, 1000.0, "Housing"), spend(1, 500.0, "Food")];
        let budget = recommend(&income, &expenses, 1).unwrap();
        let status = budget_status(&budget, &expenses, 1).unwrap();

        let housing = status.iter().find(|s| s.category == Category::Housing).unwrap();
        assert!((housing.budgeted - 1000.0).abs() < EPS);
        assert!((housing.percentage_used - 100.0).abs() < EPS);

        let savings = status.iter().find(|s| s.category == Category::Savings).unwrap();
        assert_eq!(savings.actual, 0.0);
        assert_eq!(savings.percentage_used, 0.0);
    }
}

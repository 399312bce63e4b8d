//! Report builder: assembles aggregator, projection and budget outputs into the
//! composite shapes handed to presentation layers. No new computation lives here.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{
    self, CashflowPeriod, CategoryShare, DailyTotal, LabelAggregate, MerchantTotal, PeriodTotal,
};
use crate::budget::BudgetAllocation;
use crate::finance::{Transaction, TransactionKind};
use crate::projection::Forecast;
use crate::store::{TransactionFilter, TransactionStore};
use crate::time::{Bucket, DateRange};

/// How many rows the list-shaped sections of a report carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_merchants: usize,
    pub recent_transactions: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_merchants: 5,
            recent_transactions: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_balance: f64,
    pub income: f64,
    pub expenses: f64,
    pub by_category: Vec<CategoryShare>,
    /// Weekly expense totals
    pub over_time: Vec<PeriodTotal>,
    /// Monthly income, expenses and savings
    pub income_vs_expense: Vec<CashflowPeriod>,
    pub top_merchants: Vec<MerchantTotal>,
    pub recent_transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub total_expenses: f64,
    pub by_category: Vec<LabelAggregate>,
    pub by_merchant: Vec<MerchantTotal>,
    pub daily: Vec<DailyTotal>,
    pub transaction_count: usize,
}

/// Filtered transactions with their total and per-label rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub transactions: Vec<Transaction>,
    pub total: f64,
    pub by_label: Vec<LabelAggregate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisExport {
    pub user_id: String,
    pub expenses: Vec<Transaction>,
    pub income: Vec<Transaction>,
    pub by_category: Vec<LabelAggregate>,
    pub top_merchants: Vec<MerchantTotal>,
    /// Absent when no period has been observed
    pub predicted: Option<Forecast>,
    /// Absent when there is no income to budget against
    pub budget: Option<BudgetAllocation>,
}

/// Everything in the dashboard is restricted to `range`.
pub fn dashboard(store: &TransactionStore, range: &DateRange, opts: &ReportOptions) -> DashboardSummary {
    let filter = TransactionFilter::new().with_range(*range);
    let expenses = store.filter(TransactionKind::Expense, &filter);
    let income = store.filter(TransactionKind::Income, &filter);

    let income_total = aggregate::total(&income);
    let expense_total = aggregate::total(&expenses);

    DashboardSummary {
        total_balance: income_total - expense_total,
        income: income_total,
        expenses: expense_total,
        by_category: aggregate::category_shares(&aggregate::sum_by_reporting_category(
            &expenses,
            &DateRange::all(),
        )),
        over_time: aggregate::sum_by_period(&expenses, Bucket::Week),
        income_vs_expense: aggregate::income_vs_expense(&income, &expenses, Bucket::Month),
        top_merchants: aggregate::top_merchants(&expenses, opts.top_merchants),
        recent_transactions: aggregate::newest_first(&expenses, opts.recent_transactions),
    }
}

/// Without explicit bounds the report's start/end fall back to the data's own span.
pub fn expense_report(expenses: &[Transaction], range: &DateRange) -> ExpenseReport {
    let rows: Vec<Transaction> = expenses
        .iter()
        .filter(|t| range.contains(t.date))
        .cloned()
        .collect();
    let first = rows.iter().map(|t| t.date).min();
    let last = rows.iter().map(|t| t.date).max();

    ExpenseReport {
        start: range.start().or(first),
        end: range.end().or(last),
        total_expenses: aggregate::total(&rows),
        by_category: aggregate::breakdown_by_category(&rows),
        by_merchant: aggregate::top_merchants(&rows, 10),
        daily: aggregate::sum_by_day(&rows),
        transaction_count: rows.len(),
    }
}

/// Expenses roll up by reporting category, income by source.
pub fn listing(kind: TransactionKind, transactions: Vec<Transaction>) -> Listing {
    let by_label = match kind {
        TransactionKind::Expense => aggregate::breakdown_by_category(&transactions),
        TransactionKind::Income => aggregate::breakdown_by_label(&transactions),
    };
    Listing {
        total: aggregate::total(&transactions),
        by_label,
        transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Category;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn store() -> TransactionStore {
        let mut s = TransactionStore::new();
        s.extend([
            Transaction::income("u1", d(1, 1), 3000.0, "Salary", "Monthly Salary"),
            Transaction::expense("u1", d(1, 2), 1000.0, "Housing", "Rent").with_merchant("Rental Co"),
            Transaction::expense("u1", d(1, 9), 80.0, "Food", "Groceries").with_merchant("Grocery Store"),
            Transaction::expense("u1", d(2, 14), 45.0, "Entertainment", "Movie").with_merchant("Cinema"),
            Transaction::income("u1", d(2, 1), 3000.0, "Salary", "Monthly Salary"),
        ])
        .unwrap();
        s
    }

    #[test]
    fn test_dashboard_totals_and_sections() {
        let s = store();
        let dash = dashboard(&s, &DateRange::all(), &ReportOptions::default());
        assert_eq!(dash.income, 6000.0);
        assert_eq!(dash.expenses, 1125.0);
        assert_eq!(dash.total_balance, 4875.0);
        assert_eq!(dash.income_vs_expense.len(), 2);
        assert_eq!(dash.top_merchants[0].merchant, "Rental Co");
        assert_eq!(dash.recent_transactions[0].description, "Movie");
        assert!(dash.by_category.iter().any(|c| c.category == Category::Housing));
    }

    #[test]
    fn test_dashboard_respects_range() {
        let s = store();
        let jan = DateRange::between(d(1, 1), d(1, 31)).unwrap();
        let dash = dashboard(&s, &jan, &ReportOptions::default());
        assert_eq!(dash.income, 3000.0);
        assert_eq!(dash.expenses, 1080.0);
        assert_eq!(dash.income_vs_expense.len(), 1);
    }

    #[test]
    fn test_expense_report_falls_back_to_data_span() {
        let s = store();
        let report = expense_report(s.expenses(), &DateRange::all());
        assert_eq!(report.start, Some(d(1, 2)));
        assert_eq!(report.end, Some(d(2, 14)));
        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.daily.len(), 3);

        let empty = expense_report(&[], &DateRange::all());
        assert_eq!(empty.start, None);
        assert_eq!(empty.total_expenses, 0.0);
    }

    #[test]
    fn test_listing_rollup() {
        let s = store();
        let l = listing(TransactionKind::Income, s.income().to_vec());
        assert_eq!(l.total, 6000.0);
        assert_eq!(l.by_label.len(), 1);
        assert_eq!(l.by_label[0].count, 2);
    }

    #[test]
    fn test_expense_report_groups_by_reporting_category() {
        let rows = vec![
            Transaction::expense("u1", d(3, 1), 20.0, "Food", "Groceries"),
            Transaction::expense("u1", d(3, 2), 15.0, "food", "Snacks"),
            Transaction::expense("u1", d(3, 3), 9.0, "Crypto", "Coins"),
        ];
        let report = expense_report(&rows, &DateRange::all());
        let labels: Vec<_> = report.by_category.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Food", "Other"]);
        assert_eq!(report.by_category[0].total, 35.0);

        let l = listing(TransactionKind::Expense, rows);
        assert_eq!(l.by_label.len(), 2);
        // records keep the label they were entered with
        assert_eq!(l.transactions[2].label, "Crypto");
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let s = store();
        let dash = dashboard(&s, &DateRange::all(), &ReportOptions::default());
        let json = serde_json::to_value(&dash).unwrap();
        assert!(json.get("totalBalance").is_some());
        assert!(json.get("recentTransactions").is_some());
    }
}

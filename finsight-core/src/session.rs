//! Per-user analysis session.
//!
//! A `Session` owns one user's `TransactionStore` together with the "today"
//! anchor used to resolve relative periods, and exposes every engine query the
//! hosting layer (CLI, assistant) needs. Sessions are created and torn down by
//! the host, usually through [`crate::registry::SessionRegistry`].

use chrono::NaiveDate;
use serde::Serialize;
use std::num::NonZeroU32;
use tracing::debug;

use crate::aggregate::{self, CashflowPeriod, CategoryShare, LabelAggregate, MerchantTotal, PeriodTotal};
use crate::budget::{self, BudgetAllocation, BudgetStatusLine};
use crate::error::{EngineError, Result};
use crate::finance::{Category, Transaction, TransactionKind};
use crate::projection::{self, Forecast};
use crate::report::{self, AnalysisExport, DashboardSummary, ExpenseReport, Listing, ReportOptions};
use crate::store::{TransactionFilter, TransactionStore};
use crate::time::{months_spanned, Bucket, DateRange, RelativePeriod};

/// Tunables a host passes in when opening a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Fixed divisor for monthly averages; derived from the data when `None`
    pub periods_observed: Option<NonZeroU32>,
    pub report: ReportOptions,
    /// Length of the default dashboard window, ending today
    pub dashboard_days: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            periods_observed: None,
            report: ReportOptions::default(),
            dashboard_days: 90,
        }
    }
}

/// Filters extracted from a free-text question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryFilters {
    pub kind: TransactionKind,
    pub period: Option<RelativePeriod>,
    /// Only applied to expenses; income is classified by source
    pub category: Option<Category>,
}

impl QueryFilters {
    pub fn expenses() -> Self {
        Self {
            kind: TransactionKind::Expense,
            period: None,
            category: None,
        }
    }

    pub fn income() -> Self {
        Self {
            kind: TransactionKind::Income,
            ..Self::expenses()
        }
    }

    pub fn in_period(mut self, period: Option<RelativePeriod>) -> Self {
        self.period = period;
        self
    }

    pub fn in_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub kind: TransactionKind,
    pub range: DateRange,
    pub total: f64,
    pub count: usize,
    /// Up to three labels by total, largest first
    pub top_labels: Vec<LabelAggregate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// Savings as a percentage of income
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
    today: NaiveDate,
    settings: SessionSettings,
    store: TransactionStore,
}

impl Session {
    pub fn new(user_id: impl Into<String>, today: NaiveDate, settings: SessionSettings) -> Self {
        Self {
            user_id: user_id.into(),
            today,
            settings,
            store: TransactionStore::new(),
        }
    }

    /// Open a session pre-filled with loaded transactions.
    pub fn load(
        user_id: impl Into<String>,
        today: NaiveDate,
        settings: SessionSettings,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> Result<Self> {
        let mut session = Self::new(user_id, today, settings);
        let transactions: Vec<Transaction> = transactions.into_iter().collect();
        for tx in &transactions {
            session.check_owner(tx)?;
        }
        let n = session.store.extend(transactions)?;
        debug!(user = %session.user_id, transactions = n, "session loaded");
        Ok(session)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Append a record owned by this session's user.
    pub fn add(&mut self, tx: Transaction) -> Result<()> {
        self.check_owner(&tx)?;
        self.store.add(tx)
    }

    fn check_owner(&self, tx: &Transaction) -> Result<()> {
        if tx.owner != self.user_id {
            return Err(EngineError::ForeignRecord {
                owner: tx.owner.clone(),
                user_id: self.user_id.clone(),
            });
        }
        Ok(())
    }

    /// Configured value, else the number of calendar months the data touches (at least 1).
    pub fn periods_observed(&self) -> u32 {
        match self.settings.periods_observed {
            Some(n) => n.get(),
            None => self
                .store
                .date_span()
                .map_or(1, |(first, last)| months_spanned(first, last).max(1)),
        }
    }

    pub fn default_range(&self) -> DateRange {
        DateRange::trailing_days(self.today, self.settings.dashboard_days)
    }

    pub fn dashboard(&self, range: Option<DateRange>) -> DashboardSummary {
        let range = range.unwrap_or_else(|| self.default_range());
        report::dashboard(&self.store, &range, &self.settings.report)
    }

    pub fn expenses(&self, filter: &TransactionFilter) -> Listing {
        report::listing(TransactionKind::Expense, self.store.filter(TransactionKind::Expense, filter))
    }

    pub fn income(&self, filter: &TransactionFilter) -> Listing {
        report::listing(TransactionKind::Income, self.store.filter(TransactionKind::Income, filter))
    }

    pub fn budget(&self) -> Result<BudgetAllocation> {
        budget::recommend(self.store.income(), self.store.expenses(), self.periods_observed())
    }

    pub fn budget_status(&self) -> Result<Vec<BudgetStatusLine>> {
        let allocation = self.budget()?;
        budget::budget_status(&allocation, self.store.expenses(), self.periods_observed())
    }

    pub fn expense_report(&self, range: &DateRange) -> ExpenseReport {
        report::expense_report(self.store.expenses(), range)
    }

    pub fn expenses_over_time(&self, bucket: Bucket) -> Vec<PeriodTotal> {
        aggregate::sum_by_period(self.store.expenses(), bucket)
    }

    pub fn income_vs_expense(&self, bucket: Bucket) -> Vec<CashflowPeriod> {
        aggregate::income_vs_expense(self.store.income(), self.store.expenses(), bucket)
    }

    pub fn top_merchants(&self, n: usize) -> Vec<MerchantTotal> {
        aggregate::top_merchants(self.store.expenses(), n)
    }

    pub fn category_breakdown(&self, range: &DateRange) -> Vec<CategoryShare> {
        aggregate::category_shares(&aggregate::sum_by_reporting_category(
            self.store.expenses(),
            range,
        ))
    }

    pub fn forecast(&self) -> Result<Forecast> {
        projection::forecast(self.store.expenses(), self.periods_observed())
    }

    /// Income, expenses and savings rate over `range`.
    ///
    /// Fails with `DivisionUndefined` when there is no income in range.
    pub fn savings(&self, range: &DateRange) -> Result<SavingsSummary> {
        let filter = TransactionFilter::new().with_range(*range);
        let income = aggregate::total(&self.store.filter(TransactionKind::Income, &filter));
        let expenses = aggregate::total(&self.store.filter(TransactionKind::Expense, &filter));
        if income == 0.0 {
            return Err(EngineError::DivisionUndefined {
                quantity: "total income",
            });
        }
        let savings = income - expenses;
        Ok(SavingsSummary {
            income,
            expenses,
            savings,
            rate: savings / income * 100.0,
        })
    }

    /// Answer a category/period scoped question with totals and the leading labels.
    pub fn query(&self, filters: &QueryFilters) -> QueryResult {
        let range = filters
            .period
            .map_or_else(DateRange::all, |p| p.resolve(self.today));
        let category = match filters.kind {
            TransactionKind::Expense => filters.category,
            TransactionKind::Income => None,
        };
        let rows: Vec<Transaction> = self
            .store
            .of_kind(filters.kind)
            .iter()
            .filter(|t| range.contains(t.date))
            .filter(|t| category.is_none_or(|c| t.category() == c))
            .cloned()
            .collect();

        let mut top_labels = match filters.kind {
            TransactionKind::Expense => aggregate::breakdown_by_category(&rows),
            TransactionKind::Income => aggregate::breakdown_by_label(&rows),
        };
        top_labels.sort_by(|a, b| b.total.total_cmp(&a.total));
        top_labels.truncate(3);

        QueryResult {
            kind: filters.kind,
            range,
            total: aggregate::total(&rows),
            count: rows.len(),
            top_labels,
        }
    }

    /// Snapshot of the session's data and derived analysis.
    ///
    /// Forecast and budget are omitted when they cannot be computed.
    pub fn export(&self) -> AnalysisExport {
        let predicted = self
            .forecast()
            .inspect_err(|e| debug!(error = %e, "forecast omitted from export"))
            .ok();
        let budget = self
            .budget()
            .inspect_err(|e| debug!(error = %e, "budget omitted from export"))
            .ok();
        AnalysisExport {
            user_id: self.user_id.clone(),
            expenses: self.store.expenses().to_vec(),
            income: self.store.income().to_vec(),
            by_category: aggregate::breakdown_by_category(self.store.expenses()),
            top_merchants: aggregate::top_merchants(
                self.store.expenses(),
                self.settings.report.top_merchants,
            ),
            predicted,
            budget,
        }
    }
}

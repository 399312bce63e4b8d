//! TransactionStore — one user's expenses and income, in insertion order.
//!
//! Append-only: there is no update or delete. Filtering always returns a new
//! Vec and never touches the stored records.

use chrono::NaiveDate;

use crate::aggregate::newest_first;
use crate::error::Result;
use crate::finance::{Transaction, TransactionKind};
use crate::time::DateRange;

/// Predicate over date range, label (category or source) and free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub range: DateRange,
    /// Matched case-insensitively against the category/source label
    pub label: Option<String>,
    /// Case-insensitive substring of description or merchant
    pub text: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.range.contains(tx.date) {
            return false;
        }
        if let Some(label) = &self.label {
            if !tx.label.trim().eq_ignore_ascii_case(label.trim()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_desc = tx.description.to_lowercase().contains(&needle);
            let in_merchant = tx
                .merchant
                .as_deref()
                .is_some_and(|m| m.to_lowercase().contains(&needle));
            if !in_desc && !in_merchant {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    expenses: Vec<Transaction>,
    income: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Category membership is not checked here.
    pub fn add(&mut self, tx: Transaction) -> Result<()> {
        tx.validate()?;
        match tx.kind {
            TransactionKind::Expense => self.expenses.push(tx),
            TransactionKind::Income => self.income.push(tx),
        }
        Ok(())
    }

    /// Append many records, stopping at the first invalid one.
    pub fn extend(&mut self, txns: impl IntoIterator<Item = Transaction>) -> Result<usize> {
        let mut n = 0;
        for tx in txns {
            self.add(tx)?;
            n += 1;
        }
        Ok(n)
    }

    pub fn expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    pub fn income(&self) -> &[Transaction] {
        &self.income
    }

    pub fn of_kind(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Expense => &self.expenses,
            TransactionKind::Income => &self.income,
        }
    }

    pub fn len(&self) -> usize {
        self.expenses.len() + self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.income.is_empty()
    }

    pub fn filter(&self, kind: TransactionKind, filter: &TransactionFilter) -> Vec<Transaction> {
        self.of_kind(kind)
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect()
    }

    /// Newest `n` expenses by date; among equal dates the later insertion comes first.
    pub fn recent_expenses(&self, n: usize) -> Vec<Transaction> {
        newest_first(&self.expenses, n)
    }

    /// Earliest and latest date across both expenses and income
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.expenses.iter().chain(self.income.iter()).map(|t| t.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

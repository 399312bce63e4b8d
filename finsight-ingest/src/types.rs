use chrono::NaiveDate;
use finsight_core::Transaction;
use serde::{Deserialize, Serialize};

/// One row of an expenses CSV: `date,amount,category,description,merchant`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub merchant: Option<String>,
}

/// One row of an income CSV: `date,amount,source,description`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    pub date: NaiveDate,
    pub amount: f64,
    pub source: String,
    #[serde(default)]
    pub description: String,
}

/// Validated transactions handed to a new session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTransactions {
    pub expenses: Vec<Transaction>,
    pub income: Vec<Transaction>,
}

impl LoadedTransactions {
    pub fn len(&self) -> usize {
        self.expenses.len() + self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.income.is_empty()
    }

    /// Expenses first, then income, each in load order
    pub fn into_transactions(self) -> impl Iterator<Item = Transaction> {
        self.expenses.into_iter().chain(self.income)
    }
}

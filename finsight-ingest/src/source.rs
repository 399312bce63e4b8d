//! Data sources a host can open sessions from.

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::fixtures::FixtureSource;
use crate::parsers::{load_expenses_csv, load_income_csv};
use crate::types::LoadedTransactions;

/// Supplies one user's validated transactions at session start.
pub trait TransactionSource {
    fn load(&self, user_id: &str) -> Result<LoadedTransactions>;
}

/// Ledger CSV files on disk. A side without a path loads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvSource {
    pub expenses: Option<PathBuf>,
    pub income: Option<PathBuf>,
}

impl TransactionSource for CsvSource {
    fn load(&self, user_id: &str) -> Result<LoadedTransactions> {
        let expenses = match &self.expenses {
            Some(path) => load_expenses_csv(path, user_id)?,
            None => Vec::new(),
        };
        let income = match &self.income {
            Some(path) => load_income_csv(path, user_id)?,
            None => Vec::new(),
        };
        info!(user = user_id, expenses = expenses.len(), income = income.len(), "loaded ledger csv");
        Ok(LoadedTransactions { expenses, income })
    }
}

impl TransactionSource for FixtureSource {
    fn load(&self, user_id: &str) -> Result<LoadedTransactions> {
        let loaded = self.generate(user_id);
        info!(user = user_id, days = self.days, transactions = loaded.len(), "generated fixture ledger");
        Ok(loaded)
    }
}

//! finsight-ingest: ledger CSV loading and deterministic fixture data behind a common source trait.

pub mod fixtures;
pub mod parsers;
pub mod source;
pub mod types;

pub use fixtures::FixtureSource;
pub use parsers::{load_expenses_csv, load_income_csv};
pub use source::{CsvSource, TransactionSource};
pub use types::{ExpenseRow, IncomeRow, LoadedTransactions};

pub mod ledger_csv;

pub use ledger_csv::{load_expenses_csv, load_expenses_from_reader, load_income_csv, load_income_from_reader};

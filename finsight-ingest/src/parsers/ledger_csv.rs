//! Ledger CSV loader for expense and income exports.
//!
//! Expected headers (order free, extra columns such as `user_id` ignored):
//!   expenses: date,amount,category,description,merchant
//!   income:   date,amount,source,description
//!
//! Dates are `YYYY-MM-DD`. Loading is all-or-nothing: the first malformed row
//! fails the whole file and the error names its 1-based row number.

use anyhow::{Context, Result, bail};
use finsight_core::Transaction;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::{ExpenseRow, IncomeRow};

fn read_rows<T, R>(reader: R) -> Result<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<T>().enumerate() {
        let row_no = i + 1;
        let row = result.with_context(|| format!("row {row_no}: malformed record"))?;
        rows.push((row_no, row));
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

pub fn load_expenses_from_reader<R: Read>(reader: R, owner: &str) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    for (row_no, row) in read_rows::<ExpenseRow, _>(reader)? {
        if row.category.is_empty() {
            bail!("row {row_no}: category is blank");
        }
        let mut tx = Transaction::expense(owner, row.date, row.amount, row.category, row.description);
        tx.merchant = row.merchant.filter(|m| !m.is_empty());
        tx.validate().with_context(|| format!("row {row_no}"))?;
        out.push(tx);
    }
    Ok(out)
}

pub fn load_income_from_reader<R: Read>(reader: R, owner: &str) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    for (row_no, row) in read_rows::<IncomeRow, _>(reader)? {
        if row.source.is_empty() {
            bail!("row {row_no}: source is blank");
        }
        let tx = Transaction::income(owner, row.date, row.amount, row.source, row.description);
        tx.validate().with_context(|| format!("row {row_no}"))?;
        out.push(tx);
    }
    Ok(out)
}

/// Load an expenses CSV, attributing every row to `owner`.
pub fn load_expenses_csv(path: impl AsRef<Path>, owner: &str) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let txns = load_expenses_from_reader(open(path)?, owner)
        .with_context(|| format!("loading expenses from {}", path.display()))?;
    debug!(path = %path.display(), rows = txns.len(), "expenses loaded");
    Ok(txns)
}

/// Load an income CSV, attributing every row to `owner`.
pub fn load_income_csv(path: impl AsRef<Path>, owner: &str) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let txns = load_income_from_reader(open(path)?, owner)
        .with_context(|| format!("loading income from {}", path.display()))?;
    debug!(path = %path.display(), rows = txns.len(), "income loaded");
    Ok(txns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parses_expense_rows() {
        let csv = "\
date,amount,category,description,merchant,user_id
2025-03-01,1500.00,Housing,Housing - Rental Co,Rental Co,someone-else
2025-03-04, 42.10 ,Food,Groceries,,someone-else
";
        let txns = load_expenses_from_reader(csv.as_bytes(), "user123").unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(txns[0].merchant.as_deref(), Some("Rental Co"));
        assert_eq!(txns[1].amount, 42.10);
        assert_eq!(txns[1].merchant, None);
        assert!(txns.iter().all(|t| t.owner == "user123"));
    }

    #[test]
    fn test_missing_merchant_column_is_allowed() {
        let csv = "date,amount,category,description\n2025-03-01,9.99,Shopping,Socks\n";
        let txns = load_expenses_from_reader(csv.as_bytes(), "u1").unwrap();
        assert_eq!(txns[0].merchant_or_unknown(), "Unknown");
    }

    #[test]
    fn test_parses_income_rows() {
        let csv = "date,amount,source,description\n2025-03-01,3000,Salary,Monthly Salary\n2025-03-12,250,Freelance,Income from Freelance\n";
        let txns = load_income_from_reader(csv.as_bytes(), "u1").unwrap();
        assert_eq!(txns.len(), 2);
        assert!(txns.iter().all(|t| t.is_income()));
        assert_eq!(txns[1].label, "Freelance");
    }

    #[test]
    fn test_bad_date_names_row() {
        let csv = "date,amount,category,description\n2025-03-01,5,Food,ok\n03/02/2025,5,Food,bad\n";
        let err = load_expenses_from_reader(csv.as_bytes(), "u1").unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = "date,amount,category,description\n2025-03-01,-5,Food,refund\n";
        let err = load_expenses_from_reader(csv.as_bytes(), "u1").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 1"));
        assert!(msg.contains("invalid amount"));
    }

    #[test]
    fn test_non_numeric_amount_and_blank_source_rejected() {
        let csv = "date,amount,category,description\n2025-03-01,twelve,Food,x\n";
        assert!(load_expenses_from_reader(csv.as_bytes(), "u1").is_err());

        let csv = "date,amount,source,description\n2025-03-01,10, ,x\n";
        let err = load_income_from_reader(csv.as_bytes(), "u1").unwrap_err();
        assert!(err.to_string().contains("source is blank"));
    }
}

//! Deterministic demo data.
//!
//! Produces a plausible household ledger over the `days` ending at `anchor`
//! (inclusive). The same inputs always yield the same transactions.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use finsight_core::Transaction;

use crate::types::LoadedTransactions;

/// Weekly discretionary spend, rotated by ISO week number
const WANTS_ROTATION: [(&str, &str, f64); 4] = [
    ("Entertainment", "Cinema", 45.0),
    ("Shopping", "Mall", 80.0),
    ("Personal Care", "Salon", 35.0),
    ("Travel", "Airline", 220.0),
];

const TRANSPORT: [&str; 3] = ["Gas Station", "Public Transit", "Uber"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSource {
    pub anchor: NaiveDate,
    pub days: u32,
}

impl FixtureSource {
    pub fn new(anchor: NaiveDate, days: u32) -> Self {
        Self { anchor, days }
    }

    fn dates(&self) -> impl Iterator<Item = (u32, NaiveDate)> + '_ {
        let start = self
            .anchor
            .checked_sub_days(Days::new(u64::from(self.days.saturating_sub(1))))
            .unwrap_or(self.anchor);
        (0..self.days).filter_map(move |i| {
            start
                .checked_add_days(Days::new(u64::from(i)))
                .map(|d| (i, d))
        })
    }

    pub fn generate(&self, owner: &str) -> LoadedTransactions {
        let mut expenses = Vec::new();
        let mut income = Vec::new();

        for (i, date) in self.dates() {
            let spend = |amount: f64, category: &str, merchant: &str| {
                Transaction::expense(owner, date, amount, category, format!("{category} - {merchant}"))
                    .with_merchant(merchant)
            };

            match date.day() {
                1 => {
                    expenses.push(spend(1500.0, "Housing", "Rental Co"));
                    income.push(Transaction::income(owner, date, 4000.0, "Salary", "Monthly Salary"));
                }
                5 => expenses.push(spend(140.0, "Utilities", "Electric Co")),
                8 => expenses.push(spend(65.0, "Utilities", "Internet Provider")),
                10 => expenses.push(spend(300.0, "Debt Payments", "Debt Payments Provider")),
                15 => expenses.push(spend(85.0, "Healthcare", "Healthcare Provider")),
                _ => {}
            }

            if i % 3 == 0 {
                let amount = 40.0 + f64::from(i % 7) * 6.5;
                let merchant = if i % 2 == 0 { "Grocery Store" } else { "Restaurant" };
                expenses.push(spend(amount, "Food", merchant));
            }
            if i % 2 == 1 {
                let amount = 12.0 + f64::from(i % 5) * 3.0;
                expenses.push(spend(amount, "Transportation", TRANSPORT[(i as usize / 2) % TRANSPORT.len()]));
            }
            if date.weekday() == Weekday::Sat {
                let (category, merchant, amount) =
                    WANTS_ROTATION[date.iso_week().week() as usize % WANTS_ROTATION.len()];
                expenses.push(spend(amount, category, merchant));
            }
            if i % 30 == 17 {
                expenses.push(spend(180.0, "Education", "Education Provider"));
            }
            if i % 45 == 22 {
                expenses.push(spend(25.0, "Other", "Other Provider"));
            }
            if i % 20 == 10 {
                income.push(Transaction::income(owner, date, 450.0, "Freelance", "Income from Freelance"));
            }
        }

        LoadedTransactions { expenses, income }
    }
}

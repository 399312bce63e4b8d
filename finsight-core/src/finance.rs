//! Transaction records and the fixed spending category set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, Result};

/// Spending categories, plus the synthetic `Savings` bucket used only in budgets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Healthcare,
    Shopping,
    Education,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Travel,
    #[serde(rename = "Debt Payments")]
    DebtPayments,
    Other,
    Savings,
}

/// Partition of the 50/30/20 heuristic a category belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BudgetGroup {
    Needs,
    Wants,
    /// Spending categories outside both partitions (Education, Other)
    Unallocated,
    Savings,
}

impl Category {
    /// Every category an expense may carry, in display order
    pub const SPENDING: [Category; 12] = [
        Category::Housing,
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Utilities,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::PersonalCare,
        Category::Travel,
        Category::DebtPayments,
        Category::Other,
    ];

    pub const NEEDS: [Category; 6] = [
        Category::Housing,
        Category::Food,
        Category::Transportation,
        Category::Utilities,
        Category::Healthcare,
        Category::DebtPayments,
    ];

    pub const WANTS: [Category; 4] = [
        Category::Entertainment,
        Category::Shopping,
        Category::PersonalCare,
        Category::Travel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Housing => "Housing",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::PersonalCare => "Personal Care",
            Category::Travel => "Travel",
            Category::DebtPayments => "Debt Payments",
            Category::Other => "Other",
            Category::Savings => "Savings",
        }
    }

    /// Case-insensitive lookup by display name. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Category> {
        let wanted = label.trim();
        Category::SPENDING
            .iter()
            .chain(std::iter::once(&Category::Savings))
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
    }

    pub fn group(&self) -> BudgetGroup {
        match self {
            Category::Housing
            | Category::Food
            | Category::Transportation
            | Category::Utilities
            | Category::Healthcare
            | Category::DebtPayments => BudgetGroup::Needs,
            Category::Entertainment
            | Category::Shopping
            | Category::PersonalCare
            | Category::Travel => BudgetGroup::Wants,
            Category::Education | Category::Other => BudgetGroup::Unallocated,
            Category::Savings => BudgetGroup::Savings,
        }
    }

    /// Static chart color for the category
    pub fn color(&self) -> &'static str {
        match self {
            Category::Housing => "#FF6384",
            Category::Food => "#36A2EB",
            Category::Transportation => "#FFCE56",
            Category::Entertainment => "#4BC0C0",
            Category::Utilities => "#9966FF",
            Category::Healthcare => "#FF9F40",
            Category::Shopping => "#C9CBCF",
            Category::Education => "#7CFC00",
            Category::PersonalCare => "#FF7F50",
            Category::Travel => "#00CED1",
            Category::DebtPayments => "#FF4500",
            Category::Other => "#808080",
            Category::Savings => "#32CD32",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

/// An expense or income record owned by one user.
///
/// Amounts are never negative: direction is carried by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount: f64,
    /// Category for expenses, source for income. Kept exactly as supplied.
    pub label: String,
    pub description: String,
    pub merchant: Option<String>,
    pub owner: String,
}

impl Transaction {
    pub fn expense(
        owner: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: TransactionKind::Expense,
            date,
            amount,
            label: category.into(),
            description: description.into(),
            merchant: None,
            owner: owner.into(),
        }
    }

    pub fn income(
        owner: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        source: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: TransactionKind::Income,
            date,
            amount,
            label: source.into(),
            description: description.into(),
            merchant: None,
            owner: owner.into(),
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Reporting category. Labels outside the fixed set report as `Other`.
    pub fn category(&self) -> Category {
        Category::parse(&self.label).unwrap_or(Category::Other)
    }

    pub fn merchant_or_unknown(&self) -> &str {
        self.merchant.as_deref().unwrap_or("Unknown")
    }

    /// Rejects amounts that are negative, NaN or infinite
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(EngineError::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::parse("personal care"), Some(Category::PersonalCare));
        assert_eq!(Category::parse(" DEBT PAYMENTS "), Some(Category::DebtPayments));
        assert_eq!(Category::parse("Savings"), Some(Category::Savings));
        assert_eq!(Category::parse("Crypto"), None);
    }

    #[test]
    fn test_unknown_label_reports_as_other_but_keeps_label() {
        let tx = Transaction::expense("u1", day(2), 12.0, "Crypto", "coins");
        assert_eq!(tx.category(), Category::Other);
        assert_eq!(tx.label, "Crypto");
        assert_eq!(Category::Other.color(), "#808080");
    }

    #[test]
    fn test_groups_cover_spending_set() {
        let needs = Category::SPENDING
            .iter()
            .filter(|c| c.group() == BudgetGroup::Needs)
            .count();
        let wants = Category::SPENDING
            .iter()
            .filter(|c| c.group() == BudgetGroup::Wants)
            .count();
        assert_eq!(needs, Category::NEEDS.len());
        assert_eq!(wants, Category::WANTS.len());
        assert_eq!(Category::Education.group(), BudgetGroup::Unallocated);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let ok = Transaction::income("u1", day(1), 3000.0, "Salary", "Monthly Salary");
        assert!(ok.validate().is_ok());

        let neg = Transaction::expense("u1", day(1), -5.0, "Food", "refund");
        assert!(matches!(neg.validate(), Err(EngineError::InvalidAmount { .. })));

        let nan = Transaction::expense("u1", day(1), f64::NAN, "Food", "bad");
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&Category::DebtPayments).unwrap();
        assert_eq!(json, "\"Debt Payments\"");
        assert_eq!(Category::PersonalCare.to_string(), "Personal Care");
    }
}

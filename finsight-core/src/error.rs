use chrono::NaiveDate;
use thiserror::Error;

/// Recoverable conditions reported by the analysis engine.
///
/// An empty filter result is not an error: aggregations return zeros or empty
/// collections. Unknown category labels are not an error either; they report
/// as `Other`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("division undefined: {quantity} is zero")]
    DivisionUndefined { quantity: &'static str },
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid amount {amount}: amounts must be finite and non-negative")]
    InvalidAmount { amount: f64 },
    #[error("unknown bucket size '{0}' (expected day, week or month)")]
    UnknownBucket(String),
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("no session for user '{user_id}'")]
    UnknownUser { user_id: String },
    #[error("record owned by '{owner}' cannot join the session of '{user_id}'")]
    ForeignRecord { owner: String, user_id: String },
}

impl EngineError {
    /// A ratio failed because there was no income to divide by.
    pub fn is_missing_income(&self) -> bool {
        matches!(
            self,
            EngineError::DivisionUndefined {
                quantity: "monthly income" | "total income"
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

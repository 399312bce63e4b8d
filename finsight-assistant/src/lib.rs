//! finsight-assistant: rule-based chat over a user's finance session.

pub mod intent_rules;
pub mod responder;

pub use intent_rules::{Intent, IntentRules, extract_time_period};
pub use responder::{Assistant, Role, Turn};

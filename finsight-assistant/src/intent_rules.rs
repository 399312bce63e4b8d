//! Deterministic intent rules for the finance assistant.
//!
//! Intents are tried in a fixed order and the first matching pattern wins, so
//! "what did I spend on my budget" is an expense question, not a budget one.
//! Patterns are word-bounded: "this month" must not read as a greeting.

use anyhow::Result;
use finsight_core::{Category, RelativePeriod};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Expense,
    Income,
    Budget,
    Savings,
    Investment,
    Debt,
    Category,
    Time,
    Comparison,
    Recommendation,
    Forecast,
    General,
}

/// Checked top to bottom
const INTENT_PATTERNS: [(Intent, &str); 12] = [
    (Intent::Greeting, r"\b(hello|hi|hey|greetings|howdy)\b"),
    (Intent::Expense, r"\b(expenses?|spending|spend|spent|costs?|paid)\b"),
    (Intent::Income, r"\b(income|earnings|salary|made|earned)\b"),
    (Intent::Budget, r"\b(budgets?|plan|allocation|allocate)\b"),
    (Intent::Savings, r"\b(savings?|save|saved)\b"),
    (Intent::Investment, r"\b(invest|investing|investments?|stocks?|bonds?|mutual funds?)\b"),
    (Intent::Debt, r"\b(debts?|loans?|credit cards?|mortgage|owe)\b"),
    (Intent::Category, r"\b(categor(y|ies)|types?|groups?)\b"),
    (Intent::Time, r"\b(months?|weeks?|years?|days?|period|time)\b"),
    (Intent::Comparison, r"\b(compare|comparison|versus|vs|difference)\b"),
    (Intent::Recommendation, r"\b(recommend|recommendations?|suggestions?|advice|tips?|help)\b"),
    (Intent::Forecast, r"\b(forecast|predict|prediction|projections?|future)\b"),
];

/// Phrases resolved against the session's "today", checked in this order
const PERIOD_PHRASES: [RelativePeriod; 6] = [
    RelativePeriod::ThisMonth,
    RelativePeriod::LastMonth,
    RelativePeriod::ThisYear,
    RelativePeriod::LastYear,
    RelativePeriod::ThisWeek,
    RelativePeriod::LastWeek,
];

pub struct IntentRules {
    intents: Vec<(Intent, Regex)>,
    categories: Vec<(Category, Regex)>,
    advice: Regex,
    budgeting: Regex,
    saving: Regex,
}

impl IntentRules {
    pub fn new() -> Result<Self> {
        let intents = INTENT_PATTERNS
            .iter()
            .map(|(intent, pat)| Ok((*intent, Regex::new(pat)?)))
            .collect::<Result<Vec<_>>>()?;
        let categories = Category::SPENDING
            .iter()
            .map(|c| {
                let pat = format!(r"\b{}\b", regex::escape(&c.name().to_lowercase()));
                Ok((*c, Regex::new(&pat)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            intents,
            categories,
            advice: Regex::new(r"\b(recommend\w*|suggest\w*|advice|tips?|help|how (can|do|should) i)\b")?,
            budgeting: Regex::new(r"\bbudget\w*")?,
            saving: Regex::new(r"\bsav(e|es|ed|ing|ings)\b")?,
        })
    }

    pub fn classify(&self, message: &str) -> Intent {
        let msg = message.to_lowercase();
        self.intents
            .iter()
            .find(|(_, re)| re.is_match(&msg))
            .map_or(Intent::General, |(intent, _)| *intent)
    }

    /// First category named in the message, in display order
    pub fn extract_category(&self, message: &str) -> Option<Category> {
        let msg = message.to_lowercase();
        self.categories
            .iter()
            .find(|(_, re)| re.is_match(&msg))
            .map(|(c, _)| *c)
    }

    /// The message asks what to do rather than what happened
    pub fn asks_for_advice(&self, message: &str) -> bool {
        self.advice.is_match(&message.to_lowercase())
    }

    pub fn mentions_budgeting(&self, message: &str) -> bool {
        self.budgeting.is_match(&message.to_lowercase())
    }

    pub fn mentions_saving(&self, message: &str) -> bool {
        self.saving.is_match(&message.to_lowercase())
    }
}

pub fn extract_time_period(message: &str) -> Option<RelativePeriod> {
    let msg = message.to_lowercase();
    PERIOD_PHRASES.into_iter().find(|p| msg.contains(p.phrase()))
}

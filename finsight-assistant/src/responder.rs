//! Template responses over a user's `Session`.
//!
//! Every number in a reply comes from an engine query; this module only picks
//! the template and formats amounts.

use anyhow::Result;
use finsight_core::projection::project_by_category;
use finsight_core::{
    BudgetGroup, Category, DateRange, QueryFilters, QueryResult, RelativePeriod, Session,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::debug;

use crate::intent_rules::{Intent, IntentRules, extract_time_period};

const GREETINGS: [&str; 3] = [
    "Hello! I'm your financial assistant. How can I help you today?",
    "Hi there! I'm here to help with your financial questions.",
    "Greetings! I can provide insights about your spending, budget, and financial goals. What would you like to know?",
];

const GENERAL: [&str; 3] = [
    "I can help you analyze your expenses, income, budget, and provide financial recommendations. What would you like to know?",
    "I'm your financial assistant. I can provide insights about your spending patterns, help with budgeting, or offer financial advice. How can I assist you today?",
    "You can ask me about your expenses by category, income sources, budget allocation, or request financial recommendations. What are you interested in?",
];

const NO_INCOME: &str = "I don't see any income recorded yet, so I can't work that out. Add your income and ask again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub message: String,
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn months(n: u32) -> String {
    if n == 1 { "month".to_string() } else { format!("{n} months") }
}

/// "A ($1.00), B ($2.00)"
fn label_list(result: &QueryResult) -> String {
    result
        .top_labels
        .iter()
        .map(|l| format!("{} ({})", l.label, money(l.total)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn a missing-income engine error into `None`; other errors propagate.
fn income_required<T>(result: finsight_core::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_missing_income() => {
            debug!(error = %e, "answer needs income");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Chat front end: classifies a message and answers from the user's session.
pub struct Assistant {
    rules: IntentRules,
    history: HashMap<String, Vec<Turn>>,
}

impl Assistant {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: IntentRules::new()?,
            history: HashMap::new(),
        })
    }

    pub fn history(&self, user_id: &str) -> &[Turn] {
        self.history.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn forget(&mut self, user_id: &str) {
        self.history.remove(user_id);
    }

    pub fn reply(&mut self, session: &Session, message: &str) -> Result<String> {
        let turn = self.history(session.user_id()).len() / 2;
        let intent = self.rules.classify(message);
        debug!(user = session.user_id(), ?intent, "classified message");

        let response = self.respond(session, intent, message, turn)?;

        let log = self.history.entry(session.user_id().to_string()).or_default();
        log.push(Turn {
            role: Role::User,
            message: message.to_string(),
        });
        log.push(Turn {
            role: Role::Assistant,
            message: response.clone(),
        });
        Ok(response)
    }

    fn respond(&self, session: &Session, intent: Intent, message: &str, turn: usize) -> Result<String> {
        match intent {
            Intent::Greeting => Ok(GREETINGS[turn % GREETINGS.len()].to_string()),
            Intent::Expense | Intent::Time => Ok(self.expenses(session, message)),
            Intent::Income => Ok(income(session, message)),
            Intent::Budget if self.rules.asks_for_advice(message) => budget_advice(session),
            Intent::Budget => self.budget(session, message),
            Intent::Savings if self.rules.asks_for_advice(message) => savings_advice(session),
            Intent::Savings => savings(session),
            Intent::Investment => Ok(investment()),
            Intent::Debt => Ok(debt(session)),
            Intent::Category => Ok(categories(session)),
            Intent::Comparison => Ok(comparison(session)),
            Intent::Recommendation if self.rules.mentions_budgeting(message) => budget_advice(session),
            Intent::Recommendation if self.rules.mentions_saving(message) => savings_advice(session),
            Intent::Recommendation => general_advice(session),
            Intent::Forecast => forecast(session),
            Intent::General => Ok(GENERAL[turn % GENERAL.len()].to_string()),
        }
    }

    fn expenses(&self, session: &Session, message: &str) -> String {
        let period = extract_time_period(message);
        let category = self.rules.extract_category(message);
        let result = session.query(&QueryFilters::expenses().in_period(period).in_category(category));

        match (category, period) {
            (Some(c), Some(p)) => format!(
                "Your {} expenses {} were {}.",
                c.name().to_lowercase(),
                p.phrase(),
                money(result.total)
            ),
            (Some(c), None) => format!(
                "Your total {} expenses are {}.",
                c.name().to_lowercase(),
                money(result.total)
            ),
            (None, Some(p)) => {
                let mut out = format!("Your total expenses {} were {}.", p.phrase(), money(result.total));
                if !result.top_labels.is_empty() {
                    let _ = write!(out, " Your top spending categories were: {}.", label_list(&result));
                }
                out
            }
            (None, None) => {
                let periods = session.periods_observed();
                let mut out = format!(
                    "Your total expenses over the last {} were {}, with a monthly average of {}.",
                    months(periods),
                    money(result.total),
                    money(result.total / f64::from(periods.max(1)))
                );
                if !result.top_labels.is_empty() {
                    let _ = write!(out, " Your top spending categories are: {}.", label_list(&result));
                }
                out
            }
        }
    }

    fn budget(&self, session: &Session, message: &str) -> Result<String> {
        let Some(status) = income_required(session.budget_status())? else {
            return Ok(NO_INCOME.to_string());
        };

        let line = self
            .rules
            .extract_category(message)
            .and_then(|c| status.iter().find(|s| s.category == c));
        if let Some(s) = line {
            let mut out = format!(
                "Your monthly budget for {} is {}. You're spending an average of {} per month ({:.1}% of your budget).",
                s.category,
                money(s.budgeted),
                money(s.actual),
                s.percentage_used
            );
            if s.percentage_used > 100.0 {
                out.push_str(" You've exceeded your budget for this category.");
            } else if s.percentage_used > 80.0 {
                out.push_str(" You're close to your budget limit for this category.");
            } else {
                let _ = write!(out, " You still have {} left in your budget each month.", money(s.budgeted - s.actual));
            }
            return Ok(out);
        }

        let periods = session.periods_observed();
        let total_budget: f64 = status.iter().map(|s| s.budgeted).sum();
        let spent: f64 = session.store().expenses().iter().map(|t| t.amount).sum();
        let monthly = spent / f64::from(periods);
        let mut out = format!(
            "Your total monthly budget is {}. You've spent {} over the last {} (average of {} per month, {:.1}% of your monthly budget).\n\nHere's your budget breakdown:\n",
            money(total_budget),
            money(spent),
            months(periods),
            money(monthly),
            if total_budget > 0.0 { monthly / total_budget * 100.0 } else { 0.0 }
        );
        for s in &status {
            let _ = writeln!(out, "- {}: {}", s.category, money(s.budgeted));
        }
        Ok(out)
    }
}

fn income(session: &Session, message: &str) -> String {
    let period = extract_time_period(message);
    let result = session.query(&QueryFilters::income().in_period(period));
    let mut out = match period {
        Some(p) => format!("Your total income {} was {}.", p.phrase(), money(result.total)),
        None => format!(
            "Your total income over the last {} was {}.",
            months(session.periods_observed()),
            money(result.total)
        ),
    };
    if !result.top_labels.is_empty() {
        let _ = write!(out, " Your main income sources are: {}.", label_list(&result));
    }
    out
}

fn savings(session: &Session) -> Result<String> {
    let Some(s) = income_required(session.savings(&DateRange::all()))? else {
        return Ok(NO_INCOME.to_string());
    };
    let mut out = format!(
        "Over the last {}, you've saved {}, which is {:.1}% of your income. ",
        months(session.periods_observed()),
        money(s.savings),
        s.rate
    );
    if s.rate < 10.0 {
        out.push_str("This is below the recommended savings rate of 20%. ");
        out.push_str("Consider reducing expenses in discretionary categories like Entertainment and Shopping.");
    } else if s.rate < 20.0 {
        out.push_str("This is a good start, but the recommended savings rate is 20%. ");
        out.push_str("You're on the right track!");
    } else {
        out.push_str("Great job! You're saving above the recommended rate of 20%. ");
        out.push_str("Consider investing some of your extra savings for long-term growth.");
    }
    Ok(out)
}

fn investment() -> String {
    [
        "Based on your financial profile, here are some investment recommendations:\n",
        "1. Emergency Fund: Ensure you have 3-6 months of expenses saved in a high-yield savings account.",
        "2. Retirement: Contribute to tax-advantaged accounts like 401(k) or IRA.",
        "3. Index Funds: Consider low-cost index funds for long-term growth.",
        "4. Diversification: Spread investments across different asset classes.\n",
        "For beginners, a simple portfolio might be:",
        "- 60% Total Stock Market Index Fund",
        "- 30% Total International Stock Index Fund",
        "- 10% Total Bond Market Index Fund\n",
        "Remember that investments involve risk, and it's important to consider your time horizon and risk tolerance.",
    ]
    .join("\n")
}

fn debt(session: &Session) -> String {
    let paid = session.query(&QueryFilters::expenses().in_category(Some(Category::DebtPayments)));
    let mut out = if paid.count == 0 {
        "I don't see any debt payments in your recent transactions. If you have debts, here are some strategies to manage them:\n\n".to_string()
    } else {
        format!(
            "You've spent {} on debt payments recently. Here are some strategies to manage your debt:\n\n",
            money(paid.total)
        )
    };
    out.push_str("1. Avalanche Method: Pay minimum on all debts, then put extra money toward the highest interest debt.\n");
    out.push_str("2. Snowball Method: Pay minimum on all debts, then put extra money toward the smallest debt for psychological wins.\n");
    out.push_str("3. Consolidation: Consider consolidating high-interest debts into a lower-interest loan.\n");
    out.push_str("4. Refinancing: Look into refinancing options for mortgages or student loans if rates have dropped.\n\n");
    out.push_str("The most efficient approach financially is usually the Avalanche Method, but the Snowball Method can be more motivating for some people.");
    out
}

fn categories(session: &Session) -> String {
    let mut shares = session.category_breakdown(&DateRange::all());
    if shares.is_empty() {
        return "You don't have any expenses recorded yet.".to_string();
    }
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    let mut out = "Here's how your spending breaks down by category:\n".to_string();
    for s in &shares {
        let _ = writeln!(out, "- {}: {} ({:.1}%)", s.category, money(s.amount), s.percentage);
    }
    out
}

fn comparison(session: &Session) -> String {
    let total_in = |p| session.query(&QueryFilters::expenses().in_period(Some(p))).total;
    let this_month = total_in(RelativePeriod::ThisMonth);
    let last_month = total_in(RelativePeriod::LastMonth);
    let diff = this_month - last_month;
    let direction = if diff > 0.0 { "up" } else if diff < 0.0 { "down" } else { "unchanged" };
    let mut out = format!(
        "You've spent {} this month compared with {} last month",
        money(this_month),
        money(last_month)
    );
    if diff == 0.0 {
        let _ = write!(out, " ({direction}).");
    } else {
        let _ = write!(out, " ({direction} {}).", money(diff.abs()));
    }
    out
}

fn forecast(session: &Session) -> Result<String> {
    let f = session.forecast()?;
    let mut out = match f.average_delta {
        Some(delta) => {
            let mut s = format!(
                "Based on your spending patterns, I project that next month's expenses will be around {}. ",
                money(f.next_period)
            );
            if delta > 0.0 {
                let _ = write!(s, "This is an increase of {} from your current monthly spending. ", money(delta));
                s.push_str("You might want to look for ways to reduce expenses.");
            } else if delta == 0.0 {
                s.push_str("That's unchanged from your current monthly spending.");
            } else {
                let _ = write!(s, "This is a decrease of {} from your current monthly spending. ", money(-delta));
                s.push_str("You're on the right track to reducing expenses!");
            }
            s
        }
        None => format!(
            "Based on your average monthly expenses of {}, I project similar spending next month if your habits remain consistent.",
            money(f.next_period)
        ),
    };
    out.push_str("\n\nCategory projections for next month:\n");
    for (category, amount) in &f.per_category {
        let _ = writeln!(out, "- {category}: {}", money(*amount));
    }
    Ok(out)
}

fn general_advice(session: &Session) -> Result<String> {
    let mut out = "Here are some general financial recommendations based on your data:\n\n".to_string();
    match income_required(session.savings(&DateRange::all()))? {
        Some(s) if s.rate < 20.0 => {
            let _ = writeln!(
                out,
                "1. Increase your savings rate: You're currently saving about {:.1}% of your income. Aim for at least 20%.",
                s.rate
            );
        }
        Some(_) => out.push_str("1. Great job on your savings rate! Consider investing more for long-term growth.\n"),
        None => out.push_str("1. Start recording your income so your savings rate can be tracked.\n"),
    }

    let top = session.query(&QueryFilters::expenses());
    out.push_str("2. Review your top spending categories:\n");
    for l in &top.top_labels {
        let pct = if top.total > 0.0 { l.total / top.total * 100.0 } else { 0.0 };
        let _ = writeln!(out, "   - {}: {} ({:.1}% of total)", l.label, money(l.total), pct);
    }
    out.push_str("3. Follow the 50/30/20 rule: 50% for needs, 30% for wants, and 20% for savings/debt.\n");
    out.push_str("4. Build an emergency fund of 3-6 months of expenses.\n");
    out.push_str("5. Regularly review and adjust your budget based on your goals.\n");
    Ok(out)
}

fn savings_advice(session: &Session) -> Result<String> {
    let Some(s) = income_required(session.savings(&DateRange::all()))? else {
        return Ok(NO_INCOME.to_string());
    };
    let mut out = format!("Your current savings rate is {:.1}% of your income. ", s.rate);
    if s.rate >= 20.0 {
        out.push_str("You're doing great with saving! Here are some recommendations to optimize your savings:\n\n");
        out.push_str("1. Make sure you have an emergency fund of 3-6 months of expenses.\n");
        out.push_str("2. Consider investing some of your savings for long-term growth.\n");
        out.push_str("3. Look into tax-advantaged accounts like IRAs or 401(k)s if you're not already using them.\n");
        out.push_str("4. Set specific savings goals for major purchases or life events.\n");
        out.push_str("5. Review your insurance coverage to ensure you're adequately protected.\n");
        return Ok(out);
    }

    let discretionary: f64 = Category::WANTS
        .iter()
        .map(|c| session.query(&QueryFilters::expenses().in_category(Some(*c))).total)
        .sum();
    out.push_str("Here are some recommendations to increase your savings:\n\n");
    let _ = writeln!(
        out,
        "1. Reduce discretionary spending: You've spent {} on entertainment, shopping, travel, and personal care. Consider cutting back in these areas.",
        money(discretionary)
    );
    if let Some(top) = session.query(&QueryFilters::expenses()).top_labels.first() {
        let _ = writeln!(
            out,
            "2. Review your {} expenses: This is your highest spending category at {}. Look for ways to reduce these costs.",
            top.label,
            money(top.total)
        );
    }
    out.push_str("3. Implement the 50/30/20 rule: Allocate 50% of income to needs, 30% to wants, and 20% to savings.\n");
    out.push_str("4. Set up automatic transfers to a savings account on payday.\n");
    out.push_str("5. Consider using a budgeting app to track expenses and identify areas to cut back.\n");
    Ok(out)
}

fn budget_advice(session: &Session) -> Result<String> {
    let Some(allocation) = income_required(session.budget())? else {
        return Ok(NO_INCOME.to_string());
    };
    let monthly = project_by_category(session.store().expenses(), session.periods_observed())?;
    let spend_in = |group: BudgetGroup| -> f64 {
        monthly
            .iter()
            .filter(|(c, _)| c.group() == group)
            .map(|(_, v)| v)
            .sum()
    };
    let income = allocation.monthly_income;
    let needs = spend_in(BudgetGroup::Needs);
    let wants = spend_in(BudgetGroup::Wants);

    let mut out = "Here are budget recommendations based on the 50/30/20 rule:\n".to_string();
    for (name, share, spent) in [("Needs", 0.5, needs), ("Wants", 0.3, wants)] {
        let target = income * share;
        let _ = writeln!(out, "\n{name} ({:.0}% of income):", share * 100.0);
        let _ = writeln!(out, "- Recommended: {} per month", money(target));
        let _ = writeln!(out, "- Current spending: {} per month", money(spent));
        if spent > target {
            let _ = writeln!(out, "- You're overspending on {} by {} per month", name.to_lowercase(), money(spent - target));
        } else {
            let _ = writeln!(
                out,
                "- You're within budget for {} ({} under budget)",
                name.to_lowercase(),
                money(target - spent)
            );
        }
    }

    let target = allocation.get(Category::Savings).unwrap_or(0.0);
    let actual = income - needs - wants;
    out.push_str("\nSavings (20% of income):\n");
    let _ = writeln!(out, "- Recommended: {} per month", money(target));
    let _ = writeln!(out, "- Current savings: {} per month", money(actual));
    if actual < target {
        let _ = writeln!(out, "- You're under your savings target by {} per month", money(target - actual));
    } else {
        let _ = writeln!(out, "- You're exceeding your savings target by {} per month", money(actual - target));
    }
    Ok(out)
}

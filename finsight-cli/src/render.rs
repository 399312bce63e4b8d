//! Plain-text and JSON rendering of engine reports.

use anyhow::Result;
use finsight_core::{
    BudgetAllocation, BudgetStatusLine, CashflowPeriod, CategoryShare, DashboardSummary, ExpenseReport,
    Forecast, Listing, MerchantTotal, PeriodTotal,
};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_dashboard(d: &DashboardSummary) {
    println!("# Dashboard\n");
    println!("Income:   ${:>12.2}", d.income);
    println!("Expenses: ${:>12.2}", d.expenses);
    println!("Balance:  ${:>12.2}\n", d.total_balance);

    println!("## By category");
    print_shares(&d.by_category);

    println!("\n## Income vs expenses (monthly)");
    print_cashflow(&d.income_vs_expense);

    println!("\n## Top merchants");
    print_merchants(&d.top_merchants);

    println!("\n## Recent transactions");
    for t in &d.recent_transactions {
        println!(
            "{}  {:<16} {:<24} ${:>10.2}",
            t.date,
            t.label,
            t.merchant_or_unknown(),
            t.amount
        );
    }
}

pub fn print_shares(shares: &[CategoryShare]) {
    for s in shares {
        println!("{:<16} ${:>10.2}  {:>5.1}%", s.category, s.amount, s.percentage);
    }
}

pub fn print_cashflow(rows: &[CashflowPeriod]) {
    println!("{:<12} {:>12} {:>12} {:>12}", "period", "income", "expenses", "savings");
    for r in rows {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            r.period_start.to_string(), r.income, r.expenses, r.savings
        );
    }
}

pub fn print_periods(rows: &[PeriodTotal]) {
    println!("{:<12} {:>12} {:>6}", "period", "total", "count");
    for r in rows {
        println!("{:<12} {:>12.2} {:>6}", r.period_start.to_string(), r.total, r.count);
    }
}

pub fn print_merchants(rows: &[MerchantTotal]) {
    for (i, m) in rows.iter().enumerate() {
        println!("{:>2}. {:<24} ${:>10.2}", i + 1, m.merchant, m.total);
    }
}

pub fn print_budget(allocation: &BudgetAllocation, status: &[BudgetStatusLine]) {
    println!("# Budget (50/30/20)\n");
    println!("Monthly income: ${:.2}\n", allocation.monthly_income);
    println!("{:<16} {:>12} {:>12} {:>8}", "category", "budgeted", "actual", "used");
    for s in status {
        println!(
            "{:<16} {:>12.2} {:>12.2} {:>7.1}%",
            s.category, s.budgeted, s.actual, s.percentage_used
        );
    }
    if !allocation.unallocated.is_empty() {
        let names: Vec<_> = allocation.unallocated.iter().map(|c| c.name()).collect();
        println!("\nNot covered by needs/wants: {}", names.join(", "));
    }
    for group in &allocation.skipped {
        println!("No {group:?} spending yet; that share has no per-category lines.");
    }
}

pub fn print_report(r: &ExpenseReport) {
    let bound = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    println!("# Expense report {} .. {}\n", bound(r.start), bound(r.end));
    println!("Total: ${:.2} across {} transactions\n", r.total_expenses, r.transaction_count);
    println!("## By category");
    for c in &r.by_category {
        println!("{:<16} ${:>10.2}  ({})", c.label, c.total, c.count);
    }
    println!("\n## By merchant");
    print_merchants(&r.by_merchant);
    println!("\n## Daily");
    for d in &r.daily {
        println!("{}  ${:>10.2}", d.date, d.total);
    }
}

pub fn print_listing(l: &Listing) {
    for t in &l.transactions {
        println!(
            "{}  {:<16} {:<32} ${:>10.2}",
            t.date, t.label, t.description, t.amount
        );
    }
    println!("\nTotal: ${:.2} ({} transactions)", l.total, l.transactions.len());
    for a in &l.by_label {
        println!("  {:<16} ${:>10.2}  ({})", a.label, a.total, a.count);
    }
}

pub fn print_forecast(f: &Forecast) {
    println!("Projected next month: ${:.2}", f.next_period);
    match f.average_delta {
        Some(delta) => println!("Average monthly change: {delta:+.2}"),
        None => println!("Fewer than two months of history; using the monthly average."),
    }
    println!("\n## Per category (monthly average)");
    for (c, v) in &f.per_category {
        println!("{:<16} ${:>10.2}", c, v);
    }
}

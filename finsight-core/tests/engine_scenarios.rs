use chrono::NaiveDate;
use finsight_core::aggregate::{income_vs_expense, sum_by_category, sum_by_period, top_merchants, total};
use finsight_core::budget::recommend;
use finsight_core::{
    BudgetGroup, Bucket, Category, DateRange, EngineError, QueryFilters, RelativePeriod, Session,
    SessionSettings, Transaction, TransactionFilter, TransactionKind, project_next_period,
};

const EPS: f64 = 1e-6;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn three_months() -> (Vec<Transaction>, Vec<Transaction>) {
    let income = (1..=3)
        .map(|m| Transaction::income("u1", d(2025, m, 1), 3000.0, "Salary", "Monthly Salary"))
        .collect();
    let expenses = vec![
        Transaction::expense("u1", d(2025, 1, 2), 1200.0, "Housing", "Rent").with_merchant("Rental Co"),
        Transaction::expense("u1", d(2025, 1, 8), 95.5, "Food", "Groceries").with_merchant("Grocery Store"),
        Transaction::expense("u1", d(2025, 1, 19), 60.0, "Entertainment", "Concert").with_merchant("Ticket Office"),
        Transaction::expense("u1", d(2025, 2, 2), 1200.0, "Housing", "Rent").with_merchant("Rental Co"),
        Transaction::expense("u1", d(2025, 2, 14), 110.25, "Food", "Dinner").with_merchant("Restaurant"),
        Transaction::expense("u1", d(2025, 2, 20), 240.0, "Travel", "Flight").with_merchant("Airline"),
        Transaction::expense("u1", d(2025, 3, 2), 1200.0, "Housing", "Rent").with_merchant("Rental Co"),
        Transaction::expense("u1", d(2025, 3, 5), 75.0, "Transportation", "Gas").with_merchant("Gas Station"),
        Transaction::expense("u1", d(2025, 3, 11), 300.0, "Education", "Course").with_merchant("Online Course"),
    ];
    (income, expenses)
}

#[test]
fn category_sums_conserve_the_total_in_range() {
    let (_, expenses) = three_months();
    for range in [
        DateRange::all(),
        DateRange::between(d(2025, 1, 8), d(2025, 2, 14)).unwrap(),
        DateRange::new(Some(d(2025, 3, 1)), None).unwrap(),
    ] {
        let in_range: Vec<Transaction> = expenses.iter().filter(|t| range.contains(t.date)).cloned().collect();
        let by_cat = sum_by_category(&expenses, &range);
        assert!(approx(by_cat.values().sum::<f64>(), total(&in_range)));
    }
}

#[test]
fn cashflow_series_covers_every_bucket_in_the_combined_span() {
    let income = vec![Transaction::income("u1", d(2024, 11, 30), 500.0, "Freelance", "Gig")];
    let expenses = vec![Transaction::expense("u1", d(2025, 2, 1), 20.0, "Food", "Lunch")];
    let monthly = income_vs_expense(&income, &expenses, Bucket::Month);
    assert_eq!(monthly.len(), 4);
    assert!(monthly[1..3].iter().all(|p| p.income == 0.0 && p.expenses == 0.0));

    // 2024-11-30 is a Saturday; its week starts 2024-11-25
    let weekly = income_vs_expense(&income, &expenses, Bucket::Week);
    assert_eq!(weekly.first().unwrap().period_start, d(2024, 11, 25));
    assert_eq!(weekly.len(), 10);
}

#[test]
fn needs_and_wants_hit_their_targets() {
    let (income, expenses) = three_months();
    let budget = recommend(&income, &expenses, 3).unwrap();
    assert!(approx(budget.group_total(BudgetGroup::Needs), 3000.0 * 0.5));
    assert!(approx(budget.group_total(BudgetGroup::Wants), 3000.0 * 0.3));
    assert!(approx(budget.get(Category::Savings).unwrap(), 600.0));
    assert_eq!(budget.unallocated, vec![Category::Education]);
    assert!(budget.skipped.is_empty());
}

#[test]
fn housing_only_history_keeps_housing_at_its_share() {
    let income: Vec<_> = (1..=3)
        .map(|m| Transaction::income("u1", d(2025, m, 1), 3000.0, "Salary", "Monthly Salary"))
        .collect();
    let expenses: Vec<_> = (1..=3)
        .map(|m| Transaction::expense("u1", d(2025, m, 3), 1500.0, "Housing", "Rent"))
        .collect();
    let budget = recommend(&income, &expenses, 3).unwrap();
    assert!(approx(budget.get(Category::Housing).unwrap(), 1500.0));
    assert!(approx(budget.get(Category::Savings).unwrap(), 600.0));
}

#[test]
fn projection_identity_and_linear_step() {
    assert_eq!(project_next_period(&[420.0]).unwrap(), 420.0);
    assert_eq!(project_next_period(&[100.0, 120.0]).unwrap(), 140.0);
}

#[test]
fn zero_income_budget_is_an_error_not_nan() {
    let (_, expenses) = three_months();
    assert!(matches!(
        recommend(&[], &expenses, 3),
        Err(EngineError::DivisionUndefined { .. })
    ));
}

#[test]
fn inverted_range_is_distinct_from_empty_range() {
    assert!(matches!(
        DateRange::between(d(2025, 5, 2), d(2025, 5, 1)),
        Err(EngineError::InvalidDateRange { .. })
    ));
    let (_, expenses) = three_months();
    let empty = DateRange::between(d(2030, 1, 1), d(2030, 1, 31)).unwrap();
    assert!(sum_by_category(&expenses, &empty).is_empty());
}

#[test]
fn aggregations_are_repeatable() {
    let (income, expenses) = three_months();
    assert_eq!(sum_by_period(&expenses, Bucket::Day), sum_by_period(&expenses, Bucket::Day));
    assert_eq!(
        income_vs_expense(&income, &expenses, Bucket::Week),
        income_vs_expense(&income, &expenses, Bucket::Week)
    );
    assert_eq!(top_merchants(&expenses, 3), top_merchants(&expenses, 3));
}

#[test]
fn session_answers_dashboard_budget_and_queries() {
    let (income, expenses) = three_months();
    let session = Session::load(
        "u1",
        d(2025, 3, 20),
        SessionSettings::default(),
        income.into_iter().chain(expenses),
    )
    .unwrap();

    assert_eq!(session.periods_observed(), 3);

    let dash = session.dashboard(None);
    assert!(approx(dash.total_balance, dash.income - dash.expenses));
    assert_eq!(dash.top_merchants[0].merchant, "Rental Co");
    assert!(dash.recent_transactions.len() <= 10);

    let status = session.budget_status().unwrap();
    let housing = status.iter().find(|s| s.category == Category::Housing).unwrap();
    assert!(approx(housing.actual, 1200.0));

    let housing_last_month = session.query(
        &QueryFilters::expenses()
            .in_period(Some(RelativePeriod::LastMonth))
            .in_category(Some(Category::Housing)),
    );
    assert!(approx(housing_last_month.total, 1200.0));

    let food = session.expenses(&TransactionFilter::new().with_label("food"));
    assert_eq!(food.transactions.len(), 2);
    assert_eq!(session.store().of_kind(TransactionKind::Income).len(), 3);
}

//! Aggregator: groups transactions by category, source, merchant or calendar
//! bucket and sums them. Every report is derived from these functions.
//!
//! Results are recomputed on each call; nothing here caches or mutates input.
//! An empty input yields zeros or empty collections, never an error.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::finance::{Category, Transaction};
use crate::time::{Bucket, DateRange};

/// Total and count for one calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub period_start: NaiveDate,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowPeriod {
    pub period_start: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: f64,
}

/// Per-label rollup, the `byCategory` / `bySource` shape of transaction listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAggregate {
    pub label: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

pub fn total(txns: &[Transaction]) -> f64 {
    txns.iter().map(|t| t.amount).sum()
}

/// Sum per label (category for expenses, source for income) inside `range`.
///
/// Labels with no transactions in range are absent, not zero.
pub fn sum_by_category(txns: &[Transaction], range: &DateRange) -> BTreeMap<String, f64> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for t in txns.iter().filter(|t| range.contains(t.date)) {
        *out.entry(t.label.clone()).or_insert(0.0) += t.amount;
    }
    out
}

/// Like [`sum_by_category`] but keyed by reporting category, folding unknown labels into `Other`.
pub fn sum_by_reporting_category(txns: &[Transaction], range: &DateRange) -> BTreeMap<Category, f64> {
    let mut out: BTreeMap<Category, f64> = BTreeMap::new();
    for t in txns.iter().filter(|t| range.contains(t.date)) {
        *out.entry(t.category()).or_insert(0.0) += t.amount;
    }
    out
}

/// One entry per bucket from the earliest to the latest transaction,
/// zero-filled where nothing happened.
pub fn sum_by_period(txns: &[Transaction], bucket: Bucket) -> Vec<PeriodTotal> {
    let Some((first, last)) = date_bounds(txns.iter()) else {
        return Vec::new();
    };
    let sums = bucket_sums(txns, bucket);
    bucket
        .span(first, last)
        .into_iter()
        .map(|start| {
            let (total, count) = sums.get(&start).copied().unwrap_or((0.0, 0));
            PeriodTotal {
                period_start: start,
                total,
                count,
            }
        })
        .collect()
}

/// Income, expenses and savings per bucket.
///
/// Both sides are bucketed independently over the combined date span, so a
/// bucket with only income (or only expenses) still appears.
pub fn income_vs_expense(
    income: &[Transaction],
    expenses: &[Transaction],
    bucket: Bucket,
) -> Vec<CashflowPeriod> {
    let Some((first, last)) = date_bounds(income.iter().chain(expenses.iter())) else {
        return Vec::new();
    };
    let inc = bucket_sums(income, bucket);
    let exp = bucket_sums(expenses, bucket);
    bucket
        .span(first, last)
        .into_iter()
        .map(|start| {
            let income = inc.get(&start).map_or(0.0, |(s, _)| *s);
            let expenses = exp.get(&start).map_or(0.0, |(s, _)| *s);
            CashflowPeriod {
                period_start: start,
                income,
                expenses,
                savings: income - expenses,
            }
        })
        .collect()
}

/// Merchants by total spend, descending. Ties keep first-seen order.
///
/// Expenses without a merchant are left out of the ranking.
pub fn top_merchants(txns: &[Transaction], n: usize) -> Vec<MerchantTotal> {
    let mut order: Vec<MerchantTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for t in txns {
        let Some(name) = t.merchant.as_deref() else {
            continue;
        };
        match index.get(name) {
            Some(&i) => order[i].total += t.amount,
            None => {
                index.insert(name, order.len());
                order.push(MerchantTotal {
                    merchant: name.to_string(),
                    total: t.amount,
                });
            }
        }
    }
    // sort_by is stable
    order.sort_by(|a, b| b.total.total_cmp(&a.total));
    order.truncate(n);
    order
}

/// Total and count per reporting category, in category order.
///
/// Labels that differ only in case share a row; unknown labels count as `Other`.
pub fn breakdown_by_category(txns: &[Transaction]) -> Vec<LabelAggregate> {
    let mut map: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
    for t in txns {
        let e = map.entry(t.category()).or_insert((0.0, 0));
        e.0 += t.amount;
        e.1 += 1;
    }
    map.into_iter()
        .map(|(category, (total, count))| LabelAggregate {
            label: category.name().to_string(),
            total,
            count,
        })
        .collect()
}

/// Total and count per raw label, sorted by label. Used for income sources.
pub fn breakdown_by_label(txns: &[Transaction]) -> Vec<LabelAggregate> {
    let mut map: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for t in txns {
        let e = map.entry(t.label.as_str()).or_insert((0.0, 0));
        e.0 += t.amount;
        e.1 += 1;
    }
    map.into_iter()
        .map(|(label, (total, count))| LabelAggregate {
            label: label.to_string(),
            total,
            count,
        })
        .collect()
}

/// Newest `n` transactions by date; among equal dates the later insertion comes first.
pub fn newest_first(txns: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut idx: Vec<usize> = (0..txns.len()).collect();
    idx.sort_by(|&a, &b| txns[b].date.cmp(&txns[a].date).then(b.cmp(&a)));
    idx.into_iter().take(n).map(|i| txns[i].clone()).collect()
}

/// Daily totals for days that have activity, ascending
pub fn sum_by_day(txns: &[Transaction]) -> Vec<DailyTotal> {
    let mut map: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in txns {
        *map.entry(t.date).or_insert(0.0) += t.amount;
    }
    map.into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

/// Percentage of the grand total per category. A zero total gives zero percentages.
pub fn category_shares(by_category: &BTreeMap<Category, f64>) -> Vec<CategoryShare> {
    let grand: f64 = by_category.values().sum();
    by_category
        .iter()
        .map(|(&category, &amount)| CategoryShare {
            category,
            amount,
            percentage: if grand > 0.0 { amount / grand * 100.0 } else { 0.0 },
            color: category.color(),
        })
        .collect()
}

fn date_bounds<'a>(mut txns: impl Iterator<Item = &'a Transaction>) -> Option<(NaiveDate, NaiveDate)> {
    let first = txns.next()?.date;
    Some(txns.fold((first, first), |(lo, hi), t| (lo.min(t.date), hi.max(t.date))))
}

fn bucket_sums(txns: &[Transaction], bucket: Bucket) -> HashMap<NaiveDate, (f64, usize)> {
    let mut sums: HashMap<NaiveDate, (f64, usize)> = HashMap::new();
    for t in txns {
        let e = sums.entry(bucket.start_of(t.date)).or_insert((0.0, 0));
        e.0 += t.amount;
        e.1 += 1;
    }
    sums
}

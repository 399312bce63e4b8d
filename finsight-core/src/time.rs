//! Calendar utilities: inclusive date ranges, day/week/month buckets,
//! relative periods ("last month") and timezone-aware "today".

use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Inclusive date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Wire shape of a range before the `start <= end` check
#[derive(Deserialize)]
struct RawDateRange {
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = EngineError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Fails fast when `start > end` so callers can tell a bad request from an empty result.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(EngineError::InvalidDateRange { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    /// Unbounded on both sides
    pub fn all() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// The `days`-long window ending at (and including) `end`
    pub fn trailing_days(end: NaiveDate, days: u64) -> Self {
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Fixed-width calendar interval used to group transactions over time.
///
/// Weeks start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    Week,
    Month,
}

impl Bucket {
    /// First day of the bucket containing `date`
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Week => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Bucket::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the bucket after the one starting at `start`
    pub fn next_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Bucket::Day => start.checked_add_days(Days::new(1)),
            Bucket::Week => start.checked_add_days(Days::new(7)),
            Bucket::Month => first_of_next_month(start),
        }
    }

    /// Every bucket start from the bucket holding `first` to the one holding `last`.
    pub fn span(&self, first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
        let end = self.start_of(last);
        let mut cur = self.start_of(first);
        let mut out = Vec::new();
        while cur <= end {
            out.push(cur);
            match self.next_start(cur) {
                Some(next) => cur = next,
                None => break,
            }
        }
        out
    }
}

impl FromStr for Bucket {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Bucket::Day),
            "w" | "week" | "weekly" => Ok(Bucket::Week),
            "m" | "month" | "monthly" => Ok(Bucket::Month),
            other => Err(EngineError::UnknownBucket(other.to_string())),
        }
    }
}

/// Periods a user can name in conversation, relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativePeriod {
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

impl RelativePeriod {
    pub fn phrase(&self) -> &'static str {
        match self {
            RelativePeriod::ThisWeek => "this week",
            RelativePeriod::LastWeek => "last week",
            RelativePeriod::ThisMonth => "this month",
            RelativePeriod::LastMonth => "last month",
            RelativePeriod::ThisYear => "this year",
            RelativePeriod::LastYear => "last year",
        }
    }

    /// Inclusive calendar range this period covers when `today` is the anchor.
    ///
    /// "This week" runs from Monday to today; months and years are whole.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let (start, end) = match self {
            RelativePeriod::ThisWeek => (Bucket::Week.start_of(today), today),
            RelativePeriod::LastWeek => {
                let monday = Bucket::Week.start_of(today);
                let start = monday.checked_sub_days(Days::new(7)).unwrap_or(monday);
                let end = monday.pred_opt().unwrap_or(monday);
                (start, end)
            }
            RelativePeriod::ThisMonth => month_bounds(today),
            RelativePeriod::LastMonth => {
                let first = Bucket::Month.start_of(today);
                month_bounds(first.pred_opt().unwrap_or(first))
            }
            RelativePeriod::ThisYear => year_bounds(today.year()).unwrap_or((today, today)),
            RelativePeriod::LastYear => year_bounds(today.year() - 1).unwrap_or((today, today)),
        };
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
}

fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = Bucket::Month.start_of(date);
    let last = first_of_next_month(first)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    (first, last)
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Number of calendar months touched by `[first, last]`, counting both ends.
pub fn months_spanned(first: NaiveDate, last: NaiveDate) -> u32 {
    if last < first {
        return 0;
    }
    let a = first.year() * 12 + first.month0() as i32;
    let b = last.year() * 12 + last.month0() as i32;
    (b - a + 1) as u32
}

/// Current calendar date in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(tz.to_string()))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

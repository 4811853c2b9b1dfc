//! Income and expense totals grouped by calendar month.

use crate::error::{Error, ErrorType};
use crate::model::{Amount, Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
    }

    /// The short display label, e.g. `Jun 2024`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Month abbreviations accepted when parsing a label. The Spanish forms come first, then the
/// English forms that differ from them.
const MONTH_ABBREVIATIONS: &[(&str, u32)] = &[
    ("ene", 1),
    ("feb", 2),
    ("mar", 3),
    ("abr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dic", 12),
    ("jan", 1),
    ("apr", 4),
    ("aug", 8),
    ("dec", 12),
];

fn month_from_abbreviation(s: &str) -> Option<u32> {
    let s = s.trim_end_matches('.').to_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == s)
        .map(|(_, month)| *month)
}

impl FromStr for MonthKey {
    type Err = Error;

    /// Accepts `YYYY-MM` or a label such as `jun 2024`, `Jun. 2024` or `dic 2023`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::msg(ErrorType::Input, format!("Invalid month '{s}'"));

        let (year, month) = if let Some((name, year)) = s.split_once(char::is_whitespace) {
            let month = month_from_abbreviation(name).ok_or_else(invalid)?;
            (year.trim(), month)
        } else if let Some((year, month)) = s.split_once('-') {
            let month = month.parse::<u32>().map_err(|_| invalid())?;
            (year, month)
        } else {
            return Err(invalid());
        };

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

/// Income and expense totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub key: MonthKey,
    pub label: String,
    pub income: Amount,
    pub expense: Amount,
}

impl MonthBucket {
    fn new(key: MonthKey) -> Self {
        Self {
            key,
            label: key.label(),
            income: Amount::ZERO,
            expense: Amount::ZERO,
        }
    }

    pub fn net(&self) -> Amount {
        self.income - self.expense
    }
}

/// Groups `transactions` by the month of their date. Only months that contain at least one
/// transaction get a bucket, and the buckets are in chronological order.
pub fn monthly_totals<'a, I>(transactions: I) -> Vec<MonthBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();
    for t in transactions {
        let key = MonthKey::of(t.date.date());
        let bucket = buckets.entry(key).or_insert_with(|| MonthBucket::new(key));
        match t.kind {
            TransactionType::Income => bucket.income += t.amount,
            TransactionType::Expense => bucket.expense += t.amount,
        }
    }
    buckets.into_values().collect()
}

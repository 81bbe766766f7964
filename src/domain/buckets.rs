//! Rolling per-day aggregates backing the velocity ledger.
//!
//! A bucket holds the raw accepted amounts for one account on one calendar
//! date. Buckets are created lazily, amounts are append-only, and nothing
//! is ever evicted, so a bucket's count and sum never decrease for the
//! lifetime of the process.

use crate::domain::calendar;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Accepted load amounts for one account on one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucket {
    amounts: Vec<Decimal>,
}

impl DayBucket {
    /// Number of accepted loads recorded on this date.
    pub fn count(&self) -> usize {
        self.amounts.len()
    }

    /// Sum of raw amounts. Stored amounts are never themselves weighted.
    pub fn raw_total(&self) -> Decimal {
        self.amounts.iter().sum()
    }

    /// Amounts in arrival order.
    pub fn amounts(&self) -> &[Decimal] {
        &self.amounts
    }

    fn append(&mut self, amount: Decimal) {
        self.amounts.push(amount);
    }
}

/// Per-account history of day buckets.
///
/// Absent dates answer zero everywhere; recording an amount creates the
/// bucket on first use.
#[derive(Debug, Clone, Default)]
pub struct AccountHistory {
    days: BTreeMap<NaiveDate, DayBucket>,
}

impl AccountHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of accepted loads on `date`.
    pub fn daily_count(&self, date: NaiveDate) -> usize {
        self.days.get(&date).map_or(0, DayBucket::count)
    }

    /// Sum of raw amounts accepted on `date`.
    pub fn daily_raw_total(&self, date: NaiveDate) -> Decimal {
        self.days.get(&date).map_or(Decimal::ZERO, DayBucket::raw_total)
    }

    /// Raw total for `date` scaled by that weekday's multiplier.
    pub fn daily_weighted_total(&self, date: NaiveDate) -> Decimal {
        self.daily_raw_total(date) * Decimal::from(calendar::weekday_multiplier(date))
    }

    /// Weighted totals summed over the Monday-through-Sunday week holding
    /// `date`. Each constituent date contributes under its own weekday
    /// multiplier, so only the Monday slot is doubled.
    pub fn weekly_weighted_total(&self, date: NaiveDate) -> Decimal {
        calendar::week_of(date)
            .iter()
            .map(|day| self.daily_weighted_total(*day))
            .sum()
    }

    /// Append an accepted amount to the bucket for `date`.
    pub fn record(&mut self, date: NaiveDate, amount: Decimal) {
        self.days.entry(date).or_default().append(amount);
    }

    /// The bucket for `date`, if any load was accepted on it.
    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    /// Number of dates with at least one accepted load.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

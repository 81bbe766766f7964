//! Calendar arithmetic for the daily and weekly aggregation windows.
//!
//! Weeks run Monday through Sunday. Monday carries a double weight when
//! totals are aggregated; every other weekday counts once. The weight is
//! applied at aggregation time only, never to stored amounts.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Weight applied to a day's raw total when computing weighted aggregates.
pub fn weekday_multiplier(date: NaiveDate) -> u32 {
    match date.weekday() {
        Weekday::Mon => 2,
        _ => 1,
    }
}

/// The seven dates of the Monday-through-Sunday week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
    std::array::from_fn(|offset| monday + Days::new(offset as u64))
}

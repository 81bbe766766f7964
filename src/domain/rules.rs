//! The ordered velocity rule set.
//!
//! Rules are checked in a fixed order and evaluation stops at the first
//! violation. Limits are fixed constants; there is exactly one
//! implementation of each rule, shared by every transport.
//!
//! The daily and weekly caps compare the *weighted* existing total against
//! the limit after adding the candidate's raw, unweighted amount. The
//! candidate's own weekday multiplier is deliberately not applied; this
//! asymmetry is long-standing observed behavior and is kept as-is.

use crate::domain::load::Load;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// Smallest accepted load amount.
pub const MIN_AMOUNT: Decimal = dec!(0.01);
/// Largest accepted load amount.
pub const MAX_AMOUNT: Decimal = dec!(5000.00);
/// Amount ceiling for prime-identified loads.
pub const PRIME_MAX_AMOUNT: Decimal = dec!(9999.00);
/// Accepted loads per customer per day.
pub const LOADS_PER_DAY: usize = 3;
/// Prime-identified loads accepted per day across all customers.
pub const PRIMES_PER_DAY: usize = 1;
/// Weighted daily amount cap per customer.
pub const DAILY_AMOUNT: Decimal = dec!(5000.00);
/// Weighted weekly amount cap per customer.
pub const WEEKLY_AMOUNT: Decimal = dec!(20000.00);

/// A velocity rule a candidate load can violate.
///
/// Variant order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    MinAmount,
    MaxAmount,
    PrimeMaxAmount,
    LoadsPerDay,
    PrimesPerDay,
    DailyAmount,
    WeeklyAmount,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rule::MinAmount => "min-amount",
            Rule::MaxAmount => "max-amount",
            Rule::PrimeMaxAmount => "prime-max-amount",
            Rule::LoadsPerDay => "loads-per-day",
            Rule::PrimesPerDay => "primes-per-day",
            Rule::DailyAmount => "daily-amount",
            Rule::WeeklyAmount => "weekly-amount",
        })
    }
}

/// Outcome of evaluating a candidate against the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Admit the load.
    Accept,
    /// Refuse the load, naming the first violated rule.
    Reject(Rule),
}

impl Decision {
    /// Check if this decision is Accept.
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }

    /// The violated rule, if the candidate was rejected.
    pub fn violation(&self) -> Option<Rule> {
        match self {
            Decision::Accept => None,
            Decision::Reject(rule) => Some(*rule),
        }
    }
}

/// Read-only ledger aggregates relevant to one candidate load.
///
/// Implementations answer for the candidate's own customer and calendar
/// date; the prime count covers the shared cross-customer account.
pub trait VelocityView {
    /// Accepted loads for the candidate's customer on the candidate's date.
    fn daily_count(&self) -> usize;

    /// Prime-identified loads already accepted on the candidate's date,
    /// from any customer.
    fn prime_daily_count(&self) -> usize;

    /// Weighted total already accepted for the customer on the date.
    fn daily_weighted_total(&self) -> Decimal;

    /// Weighted total across the Monday-through-Sunday week of the date.
    fn weekly_weighted_total(&self) -> Decimal;
}

/// Evaluate `candidate` against the ordered rule set.
///
/// Performs no mutation; the view is a snapshot and accepting a candidate
/// commits nothing by itself.
pub fn evaluate(candidate: &Load, view: &impl VelocityView) -> Decision {
    if candidate.amount < MIN_AMOUNT {
        return Decision::Reject(Rule::MinAmount);
    }
    if candidate.amount > MAX_AMOUNT {
        return Decision::Reject(Rule::MaxAmount);
    }
    if candidate.is_prime && candidate.amount > PRIME_MAX_AMOUNT {
        return Decision::Reject(Rule::PrimeMaxAmount);
    }
    if view.daily_count() >= LOADS_PER_DAY {
        return Decision::Reject(Rule::LoadsPerDay);
    }
    if candidate.is_prime && view.prime_daily_count() >= PRIMES_PER_DAY {
        return Decision::Reject(Rule::PrimesPerDay);
    }
    if view.daily_weighted_total() + candidate.amount > DAILY_AMOUNT {
        return Decision::Reject(Rule::DailyAmount);
    }
    if view.weekly_weighted_total() + candidate.amount > WEEKLY_AMOUNT {
        return Decision::Reject(Rule::WeeklyAmount);
    }
    Decision::Accept
}

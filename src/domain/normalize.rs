//! Normalization of raw load requests into typed [`Load`] values.
//!
//! The upstream feeds are loose about field types: ids arrive as JSON
//! strings or numbers, amounts as strings with an optional currency sigil,
//! timestamps with or without a `Z` suffix. Normalization pins all of that
//! down before any rule runs. Pure functions throughout; nothing here
//! touches the ledger.

use crate::domain::load::Load;
use crate::domain::primes;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A load exactly as it arrives on the wire, before field coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLoad {
    pub id: RawField,
    pub customer_id: RawField,
    pub load_amount: String,
    pub time: String,
}

/// Wire fields that may arrive either as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Number(n) => write!(f, "{n}"),
            RawField::Text(text) => f.write_str(text),
        }
    }
}

/// Failure to coerce a raw request field into its required type.
///
/// Surfaced to the caller as a request-level failure; a malformed request
/// never reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    /// `id` is not an integer.
    Id(String),
    /// `customer_id` is not an integer.
    CustomerId(String),
    /// `load_amount` is not a decimal amount.
    Amount(String),
    /// `time` is not an ISO-8601 date-time.
    Timestamp(String),
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedInput::Id(raw) => write!(f, "load id {raw:?} is not an integer"),
            MalformedInput::CustomerId(raw) => {
                write!(f, "customer id {raw:?} is not an integer")
            }
            MalformedInput::Amount(raw) => {
                write!(f, "load amount {raw:?} is not a decimal amount")
            }
            MalformedInput::Timestamp(raw) => {
                write!(f, "time {raw:?} is not an ISO-8601 date-time")
            }
        }
    }
}

impl std::error::Error for MalformedInput {}

/// Parse and validate a raw request into an immutable [`Load`].
///
/// - ids must be integer-valued (numeric or string form);
/// - the amount keeps whatever follows the last `$` sigil and is quantized
///   to exactly 2 fraction digits (banker's rounding);
/// - timestamps accept an explicit offset or `Z`; bare date-times are taken
///   as UTC;
/// - primality of the parsed id is computed and attached.
pub fn normalize(raw: &RawLoad) -> Result<Load, MalformedInput> {
    let id = parse_integer(&raw.id).ok_or_else(|| MalformedInput::Id(raw.id.to_string()))?;
    let customer_id = parse_integer(&raw.customer_id)
        .ok_or_else(|| MalformedInput::CustomerId(raw.customer_id.to_string()))?;
    let amount = parse_amount(&raw.load_amount)
        .ok_or_else(|| MalformedInput::Amount(raw.load_amount.clone()))?;
    let timestamp =
        parse_timestamp(&raw.time).ok_or_else(|| MalformedInput::Timestamp(raw.time.clone()))?;

    Ok(Load {
        id,
        customer_id,
        amount,
        timestamp,
        is_prime: primes::is_prime(id),
    })
}

fn parse_integer(field: &RawField) -> Option<i64> {
    match field {
        RawField::Number(n) => Some(*n),
        RawField::Text(text) => text.trim().parse().ok(),
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    // Keep the text after the last currency sigil; "$100.00" and "100.00"
    // both parse.
    let digits = raw.rsplit('$').next().unwrap_or(raw);
    Decimal::from_str(digits.trim())
        .ok()
        .map(|amount| amount.round_dp(2))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    // Bare date-times carry no offset and are taken as UTC.
    NaiveDateTime::from_str(raw).ok().map(|naive| naive.and_utc())
}

//! The load entity and the keys addressing ledger accounts.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Key addressing one velocity account in the ledger.
///
/// Real customers are keyed by their numeric id. A single reserved key
/// aggregates prime-identified loads across *all* customers; keeping it a
/// distinct variant means it can never collide with a customer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerKey {
    /// A customer's own velocity account.
    Customer(i64),
    /// The reserved cross-customer account for prime-identified loads.
    Prime,
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKey::Customer(id) => write!(f, "{id}"),
            CustomerKey::Prime => f.write_str("prime"),
        }
    }
}

/// One funds top-up request, normalized and ready for admission.
///
/// Immutable once constructed. `is_prime` is derived from `id` during
/// normalization and carried with the load so every consumer sees the same
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Load {
    /// Request-scoped identifier; uniqueness is not enforced here.
    pub id: i64,
    /// Owning customer.
    pub customer_id: i64,
    /// Monetary amount, quantized to 2 fraction digits, never negative
    /// once past the minimum-amount rule.
    pub amount: Decimal,
    /// Instant the load applies to, UTC.
    pub timestamp: DateTime<Utc>,
    /// Whether `id` is prime.
    pub is_prime: bool,
}

impl Load {
    /// Ledger key for this load's customer account.
    pub fn customer_key(&self) -> CustomerKey {
        CustomerKey::Customer(self.customer_id)
    }

    /// Calendar date (UTC) the load lands on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

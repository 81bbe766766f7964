//! Domain layer - pure business logic with no shared state.
//!
//! This layer holds the core concepts and invariants of the admission
//! engine:
//! - The load entity and ledger keys
//! - Normalization of raw wire requests
//! - Identifier primality
//! - Calendar windows and weekday weighting
//! - Day buckets and their daily/weekly aggregation math
//! - The ordered velocity rule set
//!
//! Everything here is pure and easily testable.

pub mod buckets;
pub mod calendar;
pub mod load;
pub mod normalize;
pub mod primes;
pub mod rules;

//! # velocity-gate
//!
//! Velocity-limit admission for customer fund loads.
//!
//! This crate decides, per incoming load (funds top-up) request, whether to
//! accept it, based on per-customer and cross-customer velocity limits
//! evaluated over rolling daily and weekly windows. Accepted loads are
//! committed to an in-memory ledger of per-day aggregates; rejected loads
//! leave no trace.
//!
//! ## Quick Start
//!
//! ```rust
//! use velocity_gate::{in_memory_gate, RawField, RawLoad};
//!
//! let gate = in_memory_gate();
//!
//! let response = gate
//!     .process(&RawLoad {
//!         id: RawField::Number(15887),
//!         customer_id: RawField::Number(528),
//!         load_amount: "$3318.47".to_string(),
//!         time: "2000-01-01T00:00:00Z".to_string(),
//!     })
//!     .unwrap();
//!
//! assert!(response.accepted);
//! ```
//!
//! Batch streams go through the NDJSON transport, one request per line in,
//! one response per decided line out, in input order:
//!
//! ```rust
//! use velocity_gate::{in_memory_gate, process_stream};
//!
//! let gate = in_memory_gate();
//! let input = r#"{"id":"1","customer_id":"100","load_amount":"$100.00","time":"2025-07-08T00:00:00Z"}"#;
//! let mut output = Vec::new();
//!
//! let summary = process_stream(&gate, input.as_bytes(), &mut output).unwrap();
//! assert_eq!(summary.accepted, 1);
//! ```
//!
//! ## The Rule Set
//!
//! Rules run in a fixed order and evaluation stops at the first violation:
//!
//! | # | Rule | Rejects when |
//! |---|------|--------------|
//! | 1 | MinAmount | amount < 0.01 |
//! | 2 | MaxAmount | amount > 5000.00 |
//! | 3 | PrimeMaxAmount | id is prime and amount > 9999.00 |
//! | 4 | LoadsPerDay | customer already has 3 accepted loads that day |
//! | 5 | PrimesPerDay | any customer already loaded a prime id that day |
//! | 6 | DailyAmount | weighted daily total + amount > 5000.00 |
//! | 7 | WeeklyAmount | weighted weekly total + amount > 20000.00 |
//!
//! A load is classified "prime" by the primality of its *identifier*, not
//! any monetary property. Prime loads are additionally tracked in a single
//! reserved account shared by all customers, which is what rule 5 counts.
//!
//! ## Weekday Weighting
//!
//! Amounts recorded on a Monday count double in the daily and weekly
//! totals; every other weekday counts once. The weight applies at
//! aggregation time only; stored amounts stay raw. The candidate's own
//! amount is added to the weighted total unweighted, whatever its weekday.
//! That asymmetry is long-standing observed behavior and is kept as-is.
//!
//! Weeks run Monday through Sunday, so a Monday deposit keeps its double
//! weight for the whole week that follows it.
//!
//! ## Concurrency
//!
//! [`LoadGate::process`] is safe to call from any number of threads. Rule
//! evaluation and the commit of an accepted load run under one admission
//! scope that locks the candidate's customer account (and the shared prime
//! account for prime candidates) for the whole check-then-commit sequence,
//! so two concurrent requests can never jointly overrun a limit. See
//! [`application::ledger`] for the locking discipline.
//!
//! ## Errors
//!
//! Requests whose fields cannot be coerced fail with
//! [`GateError::Malformed`] before any ledger interaction; that failure is
//! deliberately distinct from an `accepted: false` response, which is
//! reserved for rule rejections. Internal ledger faults surface as
//! [`GateError::Storage`] and never leave a commit half-applied.
//!
//! ## Memory
//!
//! The ledger grows with the number of distinct `(account, date)` pairs it
//! has accepted loads for and nothing is ever evicted. The reference
//! behavior defines no retention policy, so this crate does not invent
//! one; long-lived deployments should expect growth proportional to
//! accepted traffic.
//!
//! ## Features
//!
//! - `service`: the optional Rocket HTTP transport and the
//!   `velocity-gate-server` binary. The core and the batch transport have
//!   no async runtime at all.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    load::{CustomerKey, Load},
    normalize::{normalize, MalformedInput, RawField, RawLoad},
    primes::is_prime,
    rules::{evaluate, Decision, Rule, VelocityView},
};

pub use application::{
    gate::{GateError, LoadGate, LoadResponse},
    ledger::{AdmissionScope, StorageFault, VelocityLedger},
    metrics::{GateMetrics, MetricsSnapshot},
    ports::Storage,
};

pub use infrastructure::{
    batch::{process_file, process_stream, BatchError, BatchSummary},
    storage::{in_memory_gate, InMemoryGate, ShardedStorage},
};

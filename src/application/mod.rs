//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and owns the runtime state:
//! - Velocity ledger (rolling per-account aggregates)
//! - Load gate (admission decisions and commits)
//! - Gate metrics (admission outcome counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod ports;

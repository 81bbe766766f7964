//! Admission orchestration: normalize, evaluate, commit, respond.
//!
//! The gate ties the pieces together. Rule evaluation and the commit of an
//! accepted load run under one admission scope, so the check and the write
//! form a single logical transaction against the ledger.

use crate::application::ledger::{StorageFault, VelocityLedger};
use crate::application::metrics::GateMetrics;
use crate::application::ports::Storage;
use crate::domain::buckets::AccountHistory;
use crate::domain::load::{CustomerKey, Load};
use crate::domain::normalize::{self, MalformedInput, RawLoad};
use crate::domain::rules::{self, Decision};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Response record for one processed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadResponse {
    pub id: i64,
    pub customer_id: i64,
    pub accepted: bool,
}

/// Request-level failure: the load never reached a rule decision.
///
/// Kept distinct from `accepted: false`, which is reserved for rule
/// rejections.
#[derive(Debug)]
pub enum GateError {
    /// A field could not be coerced; the ledger was not consulted.
    Malformed(MalformedInput),
    /// The ledger's admission machinery failed mid-request.
    Storage(StorageFault),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Malformed(error) => write!(f, "malformed load request: {error}"),
            GateError::Storage(fault) => write!(f, "admission storage failure: {fault}"),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Malformed(error) => Some(error),
            GateError::Storage(fault) => Some(fault),
        }
    }
}

impl From<MalformedInput> for GateError {
    fn from(error: MalformedInput) -> Self {
        GateError::Malformed(error)
    }
}

impl From<StorageFault> for GateError {
    fn from(fault: StorageFault) -> Self {
        GateError::Storage(fault)
    }
}

/// Decides candidate loads and commits accepted ones to the ledger.
#[derive(Debug)]
pub struct LoadGate<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    ledger: VelocityLedger<S>,
    metrics: GateMetrics,
}

impl<S> Clone for LoadGate<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S> LoadGate<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    /// Create a gate over `ledger`.
    pub fn new(ledger: VelocityLedger<S>) -> Self {
        Self {
            ledger,
            metrics: GateMetrics::new(),
        }
    }

    /// Admit or reject one raw load request.
    ///
    /// Malformed requests fail without touching the ledger. Accepted loads
    /// are committed before the response is produced; the check and the
    /// commit run under the same admission scope, so two concurrent
    /// requests can never jointly overrun a limit.
    pub fn process(&self, raw: &RawLoad) -> Result<LoadResponse, GateError> {
        let load = match normalize::normalize(raw) {
            Ok(load) => load,
            Err(error) => {
                self.metrics.record_malformed();
                warn!(%error, "refused malformed load request");
                return Err(GateError::Malformed(error));
            }
        };
        let decision = self.decide(&load)?;
        Ok(LoadResponse {
            id: load.id,
            customer_id: load.customer_id,
            accepted: decision.is_accept(),
        })
    }

    /// Admit or reject an already-normalized load.
    pub fn decide(&self, load: &Load) -> Result<Decision, StorageFault> {
        let decision = self.ledger.with_admission(load, |scope| {
            let decision = rules::evaluate(load, scope);
            if decision.is_accept() {
                scope.commit(load);
            }
            decision
        })?;

        match decision.violation() {
            None => {
                self.metrics.record_accepted();
                debug!(load.id, load.customer_id, "load accepted");
            }
            Some(rule) => {
                self.metrics.record_rejected();
                debug!(load.id, load.customer_id, %rule, "load rejected");
            }
        }
        Ok(decision)
    }

    /// The ledger this gate commits to.
    pub fn ledger(&self) -> &VelocityLedger<S> {
        &self.ledger
    }

    /// Admission outcome counters.
    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }
}

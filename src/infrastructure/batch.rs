//! Batch transport: newline-delimited JSON in, newline-delimited JSON out.
//!
//! Each input line is one load request, processed in file order; each
//! decided load produces one response line, in the same order. Lines the
//! transport cannot decode, and requests with uncoercible fields, are
//! logged and skipped without touching the ledger; only I/O and storage
//! failures abort a run.

use crate::application::gate::{GateError, LoadGate};
use crate::application::ledger::StorageFault;
use crate::application::ports::Storage;
use crate::domain::buckets::AccountHistory;
use crate::domain::load::CustomerKey;
use crate::domain::normalize::RawLoad;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Failure that aborts a batch run.
#[derive(Debug)]
pub enum BatchError {
    /// Reading the input or writing the output failed.
    Io(io::Error),
    /// The ledger's admission machinery failed mid-run.
    Storage(StorageFault),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Io(error) => write!(f, "batch stream failure: {error}"),
            BatchError::Storage(fault) => write!(f, "batch storage failure: {fault}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io(error) => Some(error),
            BatchError::Storage(fault) => Some(fault),
        }
    }
}

impl From<io::Error> for BatchError {
    fn from(error: io::Error) -> Self {
        BatchError::Io(error)
    }
}

impl From<StorageFault> for BatchError {
    fn from(fault: StorageFault) -> Self {
        BatchError::Storage(fault)
    }
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Loads accepted and committed.
    pub accepted: u64,
    /// Loads refused by a velocity rule.
    pub rejected: u64,
    /// Lines skipped before reaching a decision.
    pub skipped: u64,
}

impl BatchSummary {
    /// Loads that reached a rule decision.
    pub fn decided(&self) -> u64 {
        self.accepted + self.rejected
    }
}

/// Process a stream of load requests through `gate`.
///
/// Reads one JSON load per input line and writes one JSON response per
/// decided load, preserving input order. Returns the outcome counts once
/// the input is exhausted.
pub fn process_stream<S>(
    gate: &LoadGate<S>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<BatchSummary, BatchError>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    let mut summary = BatchSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawLoad = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(line = index + 1, %error, "skipped undecodable batch line");
                summary.skipped += 1;
                continue;
            }
        };

        match gate.process(&raw) {
            Ok(response) => {
                let encoded = serde_json::to_string(&response).map_err(io::Error::from)?;
                writeln!(output, "{encoded}")?;
                if response.accepted {
                    summary.accepted += 1;
                } else {
                    summary.rejected += 1;
                }
            }
            // The gate already logged the malformed field.
            Err(GateError::Malformed(_)) => summary.skipped += 1,
            Err(GateError::Storage(fault)) => return Err(fault.into()),
        }
    }

    output.flush()?;
    Ok(summary)
}

/// Process the load requests in `input` and write responses to `output`.
pub fn process_file<S>(
    gate: &LoadGate<S>,
    input: &Path,
    output: &Path,
) -> Result<BatchSummary, BatchError>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    process_stream(gate, reader, writer)
}

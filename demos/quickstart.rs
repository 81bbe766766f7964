//! Basic example demonstrating load admission over a small batch.
//!
//! This example feeds a handful of NDJSON load requests through the gate
//! and prints the response for each, then the outcome counters.

use tracing_subscriber::EnvFilter;
use velocity_gate::{in_memory_gate, process_stream};

fn main() {
    // Decision logging goes to stderr; raise to debug to see each verdict.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let gate = in_memory_gate();

    // 2025-07-08 is a Tuesday; ids 2 and 11 are prime.
    let input = concat!(
        r#"{"id":"1","customer_id":"100","load_amount":"$3000.00","time":"2025-07-08T09:00:00Z"}"#,
        "\n",
        r#"{"id":"4","customer_id":"100","load_amount":"$2500.00","time":"2025-07-08T10:00:00Z"}"#,
        "\n",
        r#"{"id":"2","customer_id":"100","load_amount":"$100.00","time":"2025-07-08T11:00:00Z"}"#,
        "\n",
        r#"{"id":"11","customer_id":"200","load_amount":"$100.00","time":"2025-07-08T12:00:00Z"}"#,
        "\n",
        r#"{"id":"6","customer_id":"200","load_amount":"$5000.00","time":"2025-07-08T13:00:00Z"}"#,
        "\n",
    );

    println!("=== Load Admission Example ===\n");
    println!("Feeding 5 loads for 2 customers on one Tuesday:\n");

    let mut output = Vec::new();
    let summary = process_stream(&gate, input.as_bytes(), &mut output)
        .expect("in-memory batch cannot hit I/O failures");

    for (request, response) in input.lines().zip(String::from_utf8(output).unwrap().lines()) {
        println!("  {request}");
        println!("    -> {response}");
    }

    println!("\nWhat happened:");
    println!("  load 1: 3000.00 fits every limit");
    println!("  load 4: 3000 + 2500 breaches the 5000 daily cap");
    println!("  load 2: prime id, first prime of the day, accepted");
    println!("  load 11: prime id, but the day's prime slot is taken");
    println!("  load 6: a different customer has its own daily cap");

    println!(
        "\nSummary: {} accepted, {} rejected, {} skipped",
        summary.accepted, summary.rejected, summary.skipped
    );

    let metrics = gate.metrics().snapshot();
    println!(
        "Gate metrics agree: {} decisions, {:.0}% acceptance",
        metrics.total_decisions(),
        metrics.acceptance_rate() * 100.0
    );
}

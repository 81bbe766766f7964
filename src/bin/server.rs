//! Service entry point: one POST endpoint deciding one load per call.

use tracing_subscriber::EnvFilter;
use velocity_gate::in_memory_gate;
use velocity_gate::infrastructure::service;

#[rocket::launch]
fn rocket() -> _ {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    service::rocket(in_memory_gate())
}

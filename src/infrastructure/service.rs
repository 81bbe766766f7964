//! HTTP transport: a single POST endpoint deciding one load per call.
//!
//! Rocket rejects non-POST methods and bodies that are not valid JSON
//! before the handler runs; the handler only distinguishes field-level
//! malformed requests (400) from storage faults (500).

use crate::application::gate::{GateError, LoadResponse};
use crate::domain::normalize::RawLoad;
use crate::infrastructure::storage::InMemoryGate;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{post, routes, Build, Rocket, State};
use serde_json::{json, Value};

#[post("/load", data = "<raw>")]
fn admit(
    gate: &State<InMemoryGate>,
    raw: Json<RawLoad>,
) -> Result<Json<LoadResponse>, Custom<Json<Value>>> {
    match gate.process(&raw) {
        Ok(response) => Ok(Json(response)),
        Err(error @ GateError::Malformed(_)) => Err(Custom(
            Status::BadRequest,
            Json(json!({ "error": error.to_string() })),
        )),
        Err(error @ GateError::Storage(_)) => Err(Custom(
            Status::InternalServerError,
            Json(json!({ "error": error.to_string() })),
        )),
    }
}

/// A Rocket serving the load endpoint over `gate`.
pub fn rocket(gate: InMemoryGate) -> Rocket<Build> {
    rocket::build().manage(gate).mount("/", routes![admit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::in_memory_gate;
    use rocket::local::blocking::Client;

    fn client() -> Client {
        Client::tracked(rocket(in_memory_gate())).unwrap()
    }

    #[test]
    fn test_accepted_load_round_trips() {
        let client = client();
        let response = client
            .post("/load")
            .body(r#"{"id":"15887","customer_id":"528","load_amount":"$3318.47","time":"2000-01-01T00:00:00Z"}"#)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.into_string().unwrap(),
            r#"{"id":15887,"customer_id":528,"accepted":true}"#
        );
    }

    #[test]
    fn test_rule_rejection_is_still_ok() {
        let client = client();
        let response = client
            .post("/load")
            .body(r#"{"id":"4","customer_id":"1","load_amount":"$6000.00","time":"2025-07-08T00:00:00Z"}"#)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        assert!(response.into_string().unwrap().contains("\"accepted\":false"));
    }

    #[test]
    fn test_malformed_field_is_bad_request() {
        let client = client();
        let response = client
            .post("/load")
            .body(r#"{"id":"four","customer_id":"1","load_amount":"$1.00","time":"2025-07-08T00:00:00Z"}"#)
            .dispatch();

        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn test_state_persists_across_calls() {
        let client = client();
        let first = client
            .post("/load")
            .body(r#"{"id":"1","customer_id":"9","load_amount":"$3000.00","time":"2025-07-08T00:00:00Z"}"#)
            .dispatch();
        assert!(first.into_string().unwrap().contains("\"accepted\":true"));

        // 3000 + 2500 breaches the daily cap.
        let second = client
            .post("/load")
            .body(r#"{"id":"4","customer_id":"9","load_amount":"$2500.00","time":"2025-07-08T01:00:00Z"}"#)
            .dispatch();
        assert!(second.into_string().unwrap().contains("\"accepted\":false"));
    }

    #[test]
    fn test_get_is_not_routed() {
        let client = client();
        let response = client.get("/load").dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }
}

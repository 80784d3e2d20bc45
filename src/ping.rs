//! Built-in health-check endpoint and its JSON envelope.
//!
//! `GET /ping` answers with the fixed payload:
//!
//! ```json
//! {"message":"Success","data":{"value":"pong"},"timestamp":1755907200}
//! ```
//!
//! Register it per route group:
//!
//! ```rust
//! use middleman::{Router, ping};
//! use middleman::ping::EncodePolicy;
//!
//! let api = Router::new().get("/ping", ping::ping(EncodePolicy::Respond500));
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// What to do when response-body serialization fails.
///
/// An encoder failure on a type we constructed is a programming error, so
/// the aggressive option exists; the caller chooses it explicitly rather
/// than inheriting an unconditional crash.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodePolicy {
    /// Log and terminate the process.
    Abort,
    /// Log and answer `500 Internal Server Error`.
    Respond500,
}

/// The service's JSON response envelope.
#[derive(Serialize)]
pub struct Envelope {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    timestamp: u64,
}

impl Envelope {
    /// A data-less envelope stamped with the current Unix time.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            timestamp: unix_now(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serializes into a `200 OK` JSON response, deferring to `policy` when
    /// encoding fails.
    pub fn into_response(self, policy: EncodePolicy) -> Response {
        match serde_json::to_vec(&self) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("response encoding failed: {e}");
                match policy {
                    EncodePolicy::Abort => std::process::exit(1),
                    EncodePolicy::Respond500 => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Builds the ping handler. Unconditionally successful.
pub fn ping(policy: EncodePolicy) -> impl Handler {
    move |_req: Request| async move {
        Envelope::new("Success")
            .with_data(serde_json::json!({ "value": "pong" }))
            .into_response(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[tokio::test]
    async fn ping_answers_the_fixed_payload() {
        let before = unix_now();
        let handler = ping(EncodePolicy::Respond500).into_boxed_handler();

        let res = handler.call(Request::new(Method::GET, "/ping")).await;
        let after = unix_now();

        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["message"], "Success");
        assert_eq!(body["data"]["value"], "pong");

        let ts = body["timestamp"].as_u64().unwrap();
        assert!(ts >= before && ts <= after, "timestamp {ts} outside [{before}, {after}]");
    }

    #[test]
    fn envelope_omits_absent_data() {
        let json = serde_json::to_value(Envelope::new("Success")).unwrap();
        assert_eq!(json["message"], "Success");
        assert!(json.get("data").is_none());
    }
}

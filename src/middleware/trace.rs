//! Request tracing middleware.
//!
//! Per-request record of method, path, status, and latency, emitted through
//! [`tracing`]. The status is read from the [`Response`](crate::Response)
//! the inner handler actually produced — never assumed. Emitting a record is best-effort: a
//! missing or failing subscriber never affects the request.

use std::time::Instant;

use tracing::{debug, info};

use crate::middleware::{Middleware, Next, from_fn};
use crate::request::Request;

/// Builds the tracing middleware.
///
/// Placed at position 0 of a chain it observes total latency, inner
/// middleware included.
pub fn trace() -> Middleware {
    from_fn(|req: Request, next: Next| async move {
        let method = req.method().clone();
        let path = req.path().to_owned();
        debug!(%method, %path, "request received");

        let start = Instant::now();
        let res = next.run(req).await;

        info!(
            %method,
            %path,
            status = res.status_code().as_u16(),
            latency_us = start.elapsed().as_micros() as u64,
            "request served"
        );
        res
    })
}

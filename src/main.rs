//! Service entry point.
//!
//! Wires the versioned API groups and serves on `:8080`. Both `/v1` and
//! `/v2` expose the same routes behind their own tracing chain; the binding
//! lives in one validated [`Groups`] table, so nothing is built and then
//! silently dropped.

use middleman::ping::{self, EncodePolicy};
use middleman::{Groups, Router, Server, middleware};
use tracing::error;

fn api() -> Router {
    // Encoder failures on the envelope are treated as unrecoverable.
    Router::new().get("/ping", ping::ping(EncodePolicy::Abort))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let groups = Groups::builder()
        .mount("/v1", vec![middleware::trace()], api())
        .mount("/v2", vec![middleware::trace()], api())
        .build()
        .unwrap_or_else(|e| {
            error!("invalid route groups: {e}");
            std::process::exit(1);
        });

    if let Err(e) = Server::bind("0.0.0.0:8080").serve(groups).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}

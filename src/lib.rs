//! # middleman
//!
//! A minimal HTTP service built around one idea: middleware as plain
//! handler-to-handler composition.
//!
//! ## The model
//!
//! Everything that serves a request is a [`Handler`] — an
//! `async fn(Request) -> impl IntoResponse`, type-erased into a
//! [`BoxedHandler`]. A middleware is a function from handler to handler;
//! [`middleware::chain`] reduces an ordered sequence of them into one.
//! Position 0 wraps outermost: first to see the request, last to see control
//! return, so it observes total latency.
//!
//! Versioned route groups bind a path prefix, a middleware chain, and a
//! [`Router`] into one validated dispatch table ([`Groups`]) constructed
//! once at startup. Routing itself is delegated to [`matchit`]; the
//! interesting part — and the part this crate exists for — is how the layers
//! compose around it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use middleman::{Groups, Router, Server, middleware, ping};
//! use middleman::ping::EncodePolicy;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = || Router::new().get("/ping", ping::ping(EncodePolicy::Respond500));
//!
//!     let groups = Groups::builder()
//!         .mount("/v1", vec![middleware::trace()], api())
//!         .mount("/v2", vec![middleware::trace()], api())
//!         .build()
//!         .expect("route groups");
//!
//!     Server::bind("0.0.0.0:8080").serve(groups).await.unwrap();
//! }
//! ```

mod error;
mod group;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod ping;

pub use error::Error;
pub use group::{Groups, GroupsBuilder};
pub use handler::{BoxedHandler, ErasedHandler, Handler};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;

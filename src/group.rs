//! Route groups: explicit prefix → middleware-chain → router bindings.
//!
//! A [`Groups`] value is the server's dispatch table, built once at startup.
//! Each mounted group owns a path prefix (`/v1`, `/v2`, ...), a middleware
//! chain, and a [`Router`]; building composes the chain around a
//! prefix-stripping dispatcher so every group ends up as exactly one
//! [`BoxedHandler`]. Nothing is overwritten or shadowed after construction —
//! every mounted group is served.
//!
//! ```rust
//! use middleman::{Groups, Request, Router, middleware};
//!
//! # async fn pong(_req: Request) -> &'static str { "pong" }
//! let groups = Groups::builder()
//!     .mount("/v1", vec![middleware::trace()], Router::new().get("/ping", pong))
//!     .mount("/v2", vec![], Router::new().get("/ping", pong))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

use http::StatusCode;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::{Middleware, chain};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// An immutable set of composed route groups, keyed by path prefix.
pub struct Groups {
    // Sorted longest-prefix-first so dispatch takes the most specific group.
    entries: Vec<(String, BoxedHandler)>,
}

impl std::fmt::Debug for Groups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groups")
            .field("prefixes", &self.entries.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .finish()
    }
}

impl Groups {
    pub fn builder() -> GroupsBuilder {
        GroupsBuilder { entries: Vec::new() }
    }

    /// Routes one request to the group whose prefix matches its path.
    ///
    /// A prefix matches on a path-segment boundary only: `/v1` matches
    /// `/v1/ping` and `/v1`, never `/v1x/ping`. No matching group yields 404.
    pub async fn dispatch(&self, req: Request) -> Response {
        let matched = self
            .entries
            .iter()
            .find(|(prefix, _)| prefix_matches(prefix, req.path()));
        match matched {
            Some((_, handler)) => handler.call(req).await,
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Accumulates group bindings; [`GroupsBuilder::build`] validates them.
pub struct GroupsBuilder {
    entries: Vec<(String, Vec<Middleware>, Router)>,
}

impl GroupsBuilder {
    /// Binds `router` under `prefix`, wrapped by `middlewares` in sequence
    /// order (position 0 outermost). The chain sees the original request
    /// path; the prefix is stripped only for route lookup.
    pub fn mount(mut self, prefix: &str, middlewares: Vec<Middleware>, router: Router) -> Self {
        self.entries.push((prefix.to_owned(), middlewares, router));
        self
    }

    /// Composes every group into its final handler.
    ///
    /// # Errors
    ///
    /// Rejects a prefix that is empty, lacks a leading `/`, carries a
    /// trailing `/`, or duplicates an earlier mount.
    pub fn build(self) -> Result<Groups, Error> {
        let mut entries: Vec<(String, BoxedHandler)> = Vec::with_capacity(self.entries.len());
        for (prefix, middlewares, router) in self.entries {
            if prefix.len() < 2 || !prefix.starts_with('/') || prefix.ends_with('/') {
                return Err(Error::Group(format!("invalid prefix `{prefix}`")));
            }
            if entries.iter().any(|(p, _)| *p == prefix) {
                return Err(Error::Group(format!("duplicate prefix `{prefix}`")));
            }
            let terminal: BoxedHandler = Arc::new(Mounted { prefix: prefix.clone(), router });
            let composed = chain(middlewares)(terminal);
            entries.push((prefix, composed));
        }
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Groups { entries })
    }
}

/// Terminal handler of a group: strips the mount prefix, then looks the
/// remainder up in the group's router.
struct Mounted {
    prefix: String,
    router: Router,
}

impl ErasedHandler for Mounted {
    fn call(&self, mut req: Request) -> BoxFuture {
        let found = {
            let sub = req.path().strip_prefix(self.prefix.as_str()).unwrap_or(req.path());
            let sub = if sub.is_empty() { "/" } else { sub };
            self.router.lookup(req.method(), sub)
        };
        match found {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(req)
            }
            None => Box::pin(async { Response::status(StatusCode::NOT_FOUND) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Next, from_fn};
    use http::Method;
    use std::sync::Mutex;

    fn pong_router(body: &'static str) -> Router {
        Router::new().get("/ping", move |_req: Request| async move { Response::text(body) })
    }

    #[tokio::test]
    async fn build_rejects_duplicate_prefixes() {
        let err = Groups::builder()
            .mount("/v1", vec![], pong_router("a"))
            .mount("/v1", vec![], pong_router("b"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Group(_)));
    }

    #[tokio::test]
    async fn build_rejects_malformed_prefixes() {
        for bad in ["", "/", "v1", "/v1/"] {
            let err = Groups::builder()
                .mount(bad, vec![], pong_router("a"))
                .build()
                .unwrap_err();
            assert!(matches!(err, Error::Group(_)), "prefix `{bad}` accepted");
        }
    }

    #[tokio::test]
    async fn dispatch_strips_prefix_and_serves_every_group() {
        let groups = Groups::builder()
            .mount("/v1", vec![], pong_router("pong-v1"))
            .mount("/v2", vec![], pong_router("pong-v2"))
            .build()
            .unwrap();

        let v1 = groups.dispatch(Request::new(Method::GET, "/v1/ping")).await;
        assert_eq!(v1.body(), b"pong-v1");

        let v2 = groups.dispatch(Request::new(Method::GET, "/v2/ping")).await;
        assert_eq!(v2.body(), b"pong-v2");
    }

    #[tokio::test]
    async fn dispatch_requires_a_segment_boundary() {
        let groups = Groups::builder()
            .mount("/v1", vec![], pong_router("pong"))
            .build()
            .unwrap();

        let res = groups.dispatch(Request::new(Method::GET, "/v1x/ping")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

        let res = groups.dispatch(Request::new(Method::GET, "/v3/ping")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dispatch_prefers_the_longest_prefix() {
        let groups = Groups::builder()
            .mount("/v1", vec![], pong_router("outer"))
            .mount("/v1/admin", vec![], pong_router("admin"))
            .build()
            .unwrap();

        let res = groups
            .dispatch(Request::new(Method::GET, "/v1/admin/ping"))
            .await;
        assert_eq!(res.body(), b"admin");

        let res = groups.dispatch(Request::new(Method::GET, "/v1/ping")).await;
        assert_eq!(res.body(), b"outer");
    }

    #[tokio::test]
    async fn middleware_observes_the_unstripped_path() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let spy = {
            let seen = Arc::clone(&seen);
            from_fn(move |req: Request, next: Next| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(req.path().to_owned());
                    next.run(req).await
                }
            })
        };

        let groups = Groups::builder()
            .mount("/v1", vec![spy], pong_router("pong"))
            .build()
            .unwrap();

        groups.dispatch(Request::new(Method::GET, "/v1/ping")).await;
        assert_eq!(*seen.lock().unwrap(), vec!["/v1/ping"]);
    }

    #[tokio::test]
    async fn unknown_route_inside_a_group_is_not_found() {
        let groups = Groups::builder()
            .mount("/v1", vec![], pong_router("pong"))
            .build()
            .unwrap();

        let res = groups.dispatch(Request::new(Method::GET, "/v1/nope")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }
}

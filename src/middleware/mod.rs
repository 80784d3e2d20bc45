//! Middleware layer.
//!
//! A middleware is a transform from handler to handler: it receives the next
//! [`BoxedHandler`] in line and returns a new one that runs pre/post behavior
//! around it. Middleware is stateless across requests; anything it needs is
//! captured at construction time.
//!
//! Two composition forms are provided:
//!
//! - [`chain`] reduces an ordered sequence of middleware into a single
//!   middleware. Position 0 becomes the outermost wrapper — the first to see
//!   the request and the last to see control return, so it observes total
//!   latency including every inner layer.
//! - [`chain_each`] pairs a middleware sequence with a handler sequence
//!   index-for-index and returns only the first wrapped handler. See its
//!   docs for why you almost certainly want [`Groups`](crate::Groups)
//!   instead.
//!
//! Write middleware with [`from_fn`]:
//!
//! ```rust
//! use middleman::middleware::{from_fn, Middleware, Next};
//! use middleman::Request;
//!
//! fn request_id() -> Middleware {
//!     from_fn(|req: Request, next: Next| async move {
//!         // pre-processing here
//!         let res = next.run(req).await;
//!         // post-processing here
//!         res
//!     })
//! }
//! ```

mod trace;

pub use trace::trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::response::Response;

/// A handler-to-handler transform.
///
/// Applying a middleware has no request-visible side effects; behavior runs
/// only when the resulting handler is later invoked.
pub type Middleware = Box<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static>;

/// The remainder of the chain, handed to a [`from_fn`] middleware.
///
/// Call [`Next::run`] to delegate inward; skip it to short-circuit.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    pub async fn run(self, req: Request) -> Response {
        self.inner.call(req).await
    }
}

/// Builds a [`Middleware`] from an async function of `(Request, Next)`.
pub fn from_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(Request, Next) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Box::new(move |next: BoxedHandler| {
        Arc::new(FromFn { f: f.clone(), next }) as BoxedHandler
    })
}

struct FromFn<F> {
    f: F,
    next: BoxedHandler,
}

impl<F, Fut> ErasedHandler for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let next = Next { inner: Arc::clone(&self.next) };
        Box::pin((self.f)(req, next))
    }
}

/// Reduces an ordered middleware sequence into one middleware.
///
/// `chain([m0, m1, ..., mn-1])` applied to `h` yields
/// `m0(m1(...mn-1(h)))`: the sequence is walked in reverse, wrapping the
/// accumulator from the terminal handler outward, so position 0 ends up
/// outermost. An empty sequence is the identity — the handler comes back
/// unchanged. Construction never fails.
pub fn chain(middlewares: Vec<Middleware>) -> Middleware {
    Box::new(move |mut next: BoxedHandler| {
        for m in middlewares.iter().rev() {
            next = m(next);
        }
        next
    })
}

/// Pairs middleware and handlers index-for-index, wrapping `handlers[i]`
/// with `middlewares[i]` from the highest index down to 0, and returns
/// **only the wrapped handler at index 0**. Every other wrapped handler is
/// computed and then discarded.
///
/// This reduction cannot dispatch between handler groups — it keeps exactly
/// one. It is retained for its regression coverage; new wiring should bind
/// each group to its own chain with [`Groups`](crate::Groups).
///
/// Handlers beyond `middlewares.len()` are left untouched: their wrap step
/// never runs.
///
/// # Panics
///
/// Panics if `middlewares` outnumbers `handlers`, or if both sequences are
/// empty. Length mismatches are construction bugs and are never silently
/// truncated.
pub fn chain_each(middlewares: Vec<Middleware>, mut handlers: Vec<BoxedHandler>) -> BoxedHandler {
    let mut idx = 0;
    for i in (0..middlewares.len()).rev() {
        idx = i;
        handlers[i] = (middlewares[i])(Arc::clone(&handlers[i]));
    }
    Arc::clone(&handlers[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use http::Method;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Middleware that tags the call-order log on the way in and out.
    fn tag(log: Log, name: &'static str) -> Middleware {
        from_fn(move |req: Request, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{name}:enter"));
                let res = next.run(req).await;
                log.lock().unwrap().push(format!("{name}:exit"));
                res
            }
        })
    }

    /// Middleware whose *application* (not invocation) is the side effect.
    fn wrap_recorder(log: Log, name: &'static str) -> Middleware {
        Box::new(move |next| {
            log.lock().unwrap().push(format!("wrap:{name}"));
            next
        })
    }

    fn terminal(log: Log, body: &'static str) -> BoxedHandler {
        (move |_req: Request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("handler:{body}"));
                Response::text(body)
            }
        })
        .into_boxed_handler()
    }

    fn req() -> Request {
        Request::new(Method::GET, "/")
    }

    #[tokio::test]
    async fn chain_nests_in_sequence_order() {
        let log: Log = Arc::default();
        let composed = chain(vec![tag(Arc::clone(&log), "a"), tag(Arc::clone(&log), "b")]);
        let handler = composed(terminal(Arc::clone(&log), "h"));

        handler.call(req()).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:enter", "b:enter", "handler:h", "b:exit", "a:exit"],
        );
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let log: Log = Arc::default();
        let handler = terminal(Arc::clone(&log), "h");

        let direct = handler.call(req()).await;
        let chained = chain(Vec::new())(Arc::clone(&handler)).call(req()).await;

        assert_eq!(direct.body(), chained.body());
        assert_eq!(direct.status_code(), chained.status_code());
    }

    #[tokio::test]
    async fn chain_each_keeps_only_the_first_wrapped_handler() {
        let log: Log = Arc::default();
        let result = chain_each(
            vec![tag(Arc::clone(&log), "a"), tag(Arc::clone(&log), "b")],
            vec![
                terminal(Arc::clone(&log), "h0"),
                terminal(Arc::clone(&log), "h1"),
            ],
        );

        let res = result.call(req()).await;

        // Only a(h0) survives; b(h1) was built and thrown away.
        assert_eq!(res.body(), b"h0");
        let log = log.lock().unwrap();
        assert!(log.contains(&"a:enter".to_owned()));
        assert!(!log.contains(&"b:enter".to_owned()));
        assert!(!log.contains(&"handler:h1".to_owned()));
    }

    #[tokio::test]
    async fn chain_each_never_wraps_extra_handlers() {
        let log: Log = Arc::default();
        let result = chain_each(
            vec![wrap_recorder(Arc::clone(&log), "m0")],
            vec![
                terminal(Arc::clone(&log), "h0"),
                terminal(Arc::clone(&log), "h1"),
            ],
        );

        let res = result.call(req()).await;

        assert_eq!(res.body(), b"h0");
        assert_eq!(*log.lock().unwrap(), vec!["wrap:m0", "handler:h0"]);
    }

    #[test]
    #[should_panic]
    fn chain_each_panics_when_middlewares_outnumber_handlers() {
        let log: Log = Arc::default();
        chain_each(
            vec![tag(Arc::clone(&log), "a"), tag(Arc::clone(&log), "b")],
            vec![terminal(log, "h0")],
        );
    }
}

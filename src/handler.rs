//! Handler trait and type erasure.
//!
//! The router and the middleware layer both need to hold handlers of
//! *different* concrete types behind one interface. The bridge is a trait
//! object: any `async fn(Request) -> impl IntoResponse` becomes a
//! [`BoxedHandler`] (`Arc<dyn ErasedHandler>`) via the sealed [`Handler`]
//! trait's blanket impl.
//!
//! `BoxedHandler` is the currency of the whole crate: routers store them,
//! middleware wraps them, the server calls them. Per request the cost is one
//! `Arc` clone and one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to a [`Response`].
///
/// Pinned because the runtime polls it in place; `Send + 'static` so tokio
/// may migrate it across worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Dispatch interface shared by every stored handler.
///
/// You interact with this only through [`BoxedHandler`]; middleware
/// implementations receive and return `BoxedHandler`s without ever naming a
/// concrete handler type.
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A shared, type-erased handler.
///
/// `Arc` rather than `Box` so the same handler can serve any number of
/// in-flight requests concurrently. Handlers are immutable once constructed.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid handler.
///
/// You never implement this yourself; it is automatically satisfied for any
/// `async fn name(req: Request) -> impl IntoResponse`. The trait is sealed so
/// the blanket impl below is the only way in.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Covers named `async fn` items, closures returning futures, and any struct
/// implementing `Fn(Request)`.
impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype holding the concrete handler, bridging it to the trait-object
/// world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

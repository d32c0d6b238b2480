//! Per-request context and the handler abstraction.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::request::request_id;
use crate::routing::Router;

/// Everything a handler gets to see about the request it serves.
pub struct Context {
    request: Request<Body>,
    request_id: String,
}

impl Context {
    pub fn new(request: Request<Body>) -> Self {
        let request_id = request_id(&request);
        Self {
            request,
            request_id,
        }
    }

    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn into_request(self) -> Request<Body> {
        self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Value of `x-request-id`, generated if the request arrived without one.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

/// Something that can answer a routed request.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, Response> {
        Box::pin((self)(ctx))
    }
}

/// Shared, type-erased handler as stored in the route table.
pub type BoxedHandler = Arc<dyn Handler>;

/// The router the HTTP server dispatches through.
pub type RouteTable = Router<BoxedHandler>;

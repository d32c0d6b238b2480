//! Built-in handlers: static responses and the not-found reply.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::RouteConfig;
use crate::http::context::{BoxedHandler, Context, RouteTable};
use crate::routing::RouteError;

/// Body sent for requests no route handles.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Reply for a lookup miss, including paths that only exist as a prefix.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// A fixed response served for every request on its route.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    status: StatusCode,
    content_type: HeaderValue,
    body: Bytes,
}

impl StaticResponse {
    pub fn new(status: StatusCode, content_type: HeaderValue, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Build from a route entry, falling back to `200` and plain text for
    /// fields that did not pass validation.
    pub fn from_config(route: &RouteConfig) -> Self {
        let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
        let content_type = HeaderValue::from_str(&route.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain; charset=utf-8"));
        Self::new(status, content_type, route.body.clone())
    }

    pub fn respond(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, self.content_type.clone());
        response
    }

    pub fn into_handler(self) -> BoxedHandler {
        let this = Arc::new(self);
        Arc::new(move |_ctx: Context| {
            let this = Arc::clone(&this);
            async move { this.respond() }
        })
    }
}

/// Build a route table answering each configured route with its static response.
pub fn build_route_table(routes: &[RouteConfig]) -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new();
    table.add_routes(static_handlers(routes))?;
    Ok(table)
}

/// `(method, path, handler)` triples for a batch of route entries.
pub fn static_handlers(
    routes: &[RouteConfig],
) -> impl Iterator<Item = (&str, &str, BoxedHandler)> {
    routes.iter().map(|route| {
        (
            route.method.as_str(),
            route.path.as_str(),
            StaticResponse::from_config(route).into_handler(),
        )
    })
}

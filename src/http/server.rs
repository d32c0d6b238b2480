//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Collect routes while the server is being built
//! - Freeze the route table and share it with every request task
//! - Create the Axum app with one catch-all dispatch handler
//! - Wire up middleware (tracing, metrics, timeout, request ID)
//! - Swap in replacement route tables while serving
//! - Map lookup misses to 404

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{RouteConfig, ServerConfig};
use crate::http::context::{BoxedHandler, Context, Handler, RouteTable};
use crate::http::handlers::{build_route_table, not_found, static_handlers};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics::{self, Outcome};
use crate::routing::RouteError;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ArcSwap<RouteTable>>,
}

/// HTTP server dispatching every request through a route table.
///
/// Routes are added through `&mut self` before the server starts. Starting
/// it consumes the server and freezes the table; from then on the table is
/// only ever replaced whole, never mutated.
pub struct HttpServer {
    config: ServerConfig,
    table: RouteTable,
}

impl HttpServer {
    /// Create a server with an empty route table.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            table: RouteTable::new(),
        }
    }

    /// Create a server serving the static routes declared in `config`.
    pub fn from_config(config: ServerConfig) -> Result<Self, RouteError> {
        let table = build_route_table(&config.routes)?;
        Ok(Self { config, table })
    }

    /// Register `handler` for `method` and `path`.
    pub fn add_route(&mut self, method: &str, path: &str, handler: impl Handler) -> Result<(), RouteError> {
        self.add_boxed_route(method, path, Arc::new(handler))
    }

    pub fn add_boxed_route(&mut self, method: &str, path: &str, handler: BoxedHandler) -> Result<(), RouteError> {
        self.table.add_route(method, path, handler)
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> Result<(), RouteError> {
        self.add_route("GET", path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> Result<(), RouteError> {
        self.add_route("POST", path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> Result<(), RouteError> {
        self.add_route("PUT", path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> Result<(), RouteError> {
        self.add_route("DELETE", path, handler)
    }

    /// Register a static response for each route entry.
    ///
    /// The batch is atomic: if any entry is rejected, none are registered.
    pub fn add_static_routes(&mut self, routes: &[RouteConfig]) -> Result<(), RouteError> {
        self.table.add_routes(static_handlers(routes))
    }

    /// The routes registered so far.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn freeze(self) -> (ServerConfig, Arc<ArcSwap<RouteTable>>) {
        metrics::record_route_count(self.table.len());
        (self.config, Arc::new(ArcSwap::from_pointee(self.table)))
    }

    /// Freeze the table and return the Axum app without binding a socket.
    pub fn into_service(self) -> Router {
        let (config, table) = self.freeze();
        build_app(&config, AppState { table })
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// Every table received on `table_updates` replaces the active one
    /// atomically; requests already in flight finish on the table they
    /// started with.
    pub async fn run(
        self,
        listener: TcpListener,
        mut table_updates: mpsc::UnboundedReceiver<RouteTable>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let (config, table) = self.freeze();
        tracing::info!(
            address = %addr,
            routes = table.load().len(),
            "HTTP server starting"
        );

        let active = Arc::clone(&table);
        let reloader = tokio::spawn(async move {
            while let Some(next) = table_updates.recv().await {
                let routes = next.len();
                active.store(Arc::new(next));
                metrics::record_route_count(routes);
                tracing::info!(routes, "Route table replaced");
            }
        });

        let app = build_app(&config, AppState { table });
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum app with all middleware layers.
///
/// Metrics sit outside the timeout so requests it cuts off are still counted.
#[allow(deprecated)]
fn build_app(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(middleware::from_fn(track_metrics))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

/// Record every response, using the outcome dispatch left in its extensions.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;
    let outcome = response
        .extensions()
        .get::<Outcome>()
        .copied()
        .unwrap_or(Outcome::Unfinished);
    metrics::record_request(method.as_str(), response.status().as_u16(), outcome, start);
    response
}

/// Look the request up in the active table and invoke its handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();
    let ctx = Context::new(request);

    let (handler, outcome) = {
        let table = state.table.load();
        match table.find_route(&method, &path) {
            Some(node) => match node.handler() {
                Some(handler) => (Some(Arc::clone(handler)), Outcome::Matched),
                None => (None, Outcome::Prefix),
            },
            None => (None, Outcome::Miss),
        }
    };

    let mut response = match handler {
        Some(handler) => handler.call(ctx).await,
        None => {
            tracing::debug!(
                request_id = %ctx.request_id(),
                method = %method,
                path = %path,
                outcome = outcome.as_str(),
                "No route matched"
            );
            not_found()
        }
    };

    response.extensions_mut().insert(outcome);
    response
}

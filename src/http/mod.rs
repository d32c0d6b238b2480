//! HTTP dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → server.rs dispatch (route table lookup)
//!     → context.rs (Context handed to the matched Handler)
//!     → handlers.rs (static responses, 404 on miss)
//!     → Send to client
//! ```

pub mod context;
pub mod handlers;
pub mod request;
pub mod server;

pub use context::{BoxedHandler, Context, Handler, RouteTable};
pub use handlers::{build_route_table, not_found, StaticResponse};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;

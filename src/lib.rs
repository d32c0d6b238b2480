//! Per-method route trie with single-segment wildcards, and an HTTP
//! dispatcher built on it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Node, RouteError, Router};

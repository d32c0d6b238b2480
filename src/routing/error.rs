//! Route registration errors.
//!
//! Every variant describes a mistake in how routes were declared. They are
//! only produced while the table is being built; lookups never fail.

use thiserror::Error;

/// Reasons a route cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route path is empty")]
    EmptyPath,

    #[error("route path must begin with '/': {path}")]
    MissingLeadingSlash { path: String },

    #[error("route path must not end with '/': {path}")]
    TrailingSlash { path: String },

    /// Produced by `//a/b` or `/a//b`.
    #[error("route path contains an empty segment: {path}")]
    EmptySegment { path: String },

    #[error("route conflict: {method} {path} is already registered")]
    RouteConflict { method: String, path: String },
}

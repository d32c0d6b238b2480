//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse, status codes exist)
//! - Detect malformed and conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Routes are checked by registering them into a throwaway router, so the
//!   file is held to exactly the rules the server applies at startup

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::{RouteError, Router};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {address:?}")]
    BindAddress { address: String },

    #[error("invalid metrics address {address:?}")]
    MetricsAddress { address: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("routes[{index}]: invalid method {method:?}")]
    Method { index: usize, method: String },

    #[error("routes[{index}]: invalid status code {status}")]
    Status { index: usize, status: u16 },

    #[error("routes[{index}]: invalid content type {content_type:?}")]
    ContentType { index: usize, content_type: String },

    #[error("routes[{index}]: {source}")]
    Route { index: usize, source: RouteError },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            address: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress {
            address: config.observability.metrics_address.clone(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut trial = Router::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.method.is_empty() || Method::from_bytes(route.method.as_bytes()).is_err() {
            errors.push(ValidationError::Method {
                index,
                method: route.method.clone(),
            });
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::Status {
                index,
                status: route.status,
            });
        }
        if HeaderValue::from_str(&route.content_type).is_err() {
            errors.push(ValidationError::ContentType {
                index,
                content_type: route.content_type.clone(),
            });
        }
        if let Err(source) = trial.add_route(&route.method, &route.path, ()) {
            errors.push(ValidationError::Route { index, source });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

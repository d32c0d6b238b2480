//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, path, handler)
//!     → router.rs (validate path, pick the method's tree)
//!     → node.rs (find-or-create one node per segment)
//!     → attach handler, or RouteConflict
//!
//! Request Lookup (per request):
//!     (method, path)
//!     → router.rs (pick the method's tree)
//!     → node.rs (literal child, else wildcard child, per segment)
//!     → Return: node (endpoint or bare prefix) or no match
//! ```
//!
//! # Design Decisions
//! - Routes are built first, then frozen and shared read-only
//! - No regex and no parameter capture: `*` matches exactly one segment
//! - Deterministic: literal before wildcard, no backtracking

pub mod error;
pub mod node;
pub mod router;

pub use error::RouteError;
pub use node::Node;
pub use router::Router;

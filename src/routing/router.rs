//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep one independent route tree per HTTP method
//! - Validate route paths and detect duplicate registrations
//! - Walk a method's tree segment by segment to find a request's node
//!
//! # Design Decisions
//! - Build-then-freeze: registration needs `&mut self`, lookup only `&self`,
//!   so a finished router can be shared behind an `Arc` without locks
//! - Method strings are opaque keys (case-sensitive, not normalized)
//! - Per segment, a literal child beats the wildcard and the choice is final.
//!   With `/a/*` and `/a/b/c` registered, `/a/b/x` is a miss: `b` commits to
//!   the literal branch and the wildcard is never revisited.

use std::collections::{HashMap, HashSet};

use crate::routing::error::RouteError;
use crate::routing::node::{Node, ROOT};

/// A forest of route trees, one per HTTP method.
#[derive(Debug)]
pub struct Router<H> {
    trees: HashMap<String, Node<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// The path is fully validated before the tree is touched, so a rejected
    /// route leaves the router exactly as it was.
    pub fn add_route(&mut self, method: &str, path: &str, handler: H) -> Result<(), RouteError> {
        let segments = split_route_path(path)?;

        let mut node = self
            .trees
            .entry(method.to_string())
            .or_insert_with(Node::root);
        for segment in segments {
            node = node.child_or_create(segment);
        }

        node.set_handler(handler).map_err(|_| RouteError::RouteConflict {
            method: method.to_string(),
            path: path.to_string(),
        })?;

        tracing::debug!(method = %method, path = %path, "Route registered");
        Ok(())
    }

    /// Register a batch of routes, all or nothing.
    ///
    /// Every path is validated and checked for conflicts, against the
    /// existing table and within the batch, before anything is inserted.
    pub fn add_routes<'a, I>(&mut self, routes: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, H)>,
    {
        let routes: Vec<_> = routes.into_iter().collect();

        let mut seen = HashSet::new();
        for &(method, path, _) in &routes {
            split_route_path(path)?;
            if self.contains_route(method, path) || !seen.insert((method, path)) {
                return Err(RouteError::RouteConflict {
                    method: method.to_string(),
                    path: path.to_string(),
                });
            }
        }

        for (method, path, handler) in routes {
            self.add_route(method, path, handler)?;
        }
        Ok(())
    }

    /// Whether a handler is registered for exactly this route pattern.
    ///
    /// Unlike [`Router::find_route`], `*` only matches the wildcard node
    /// itself: `contains_route("GET", "/a/b")` is false when only `/a/*`
    /// is registered.
    pub fn contains_route(&self, method: &str, path: &str) -> bool {
        let Ok(segments) = split_route_path(path) else {
            return false;
        };
        let Some(root) = self.trees.get(method) else {
            return false;
        };
        segments
            .into_iter()
            .try_fold(root, |node, segment| node.child_exact(segment))
            .is_some_and(Node::is_endpoint)
    }

    /// Shortcut for `add_route("GET", path, handler)`.
    pub fn get(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("GET", path, handler)
    }

    /// Shortcut for `add_route("POST", path, handler)`.
    pub fn post(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("POST", path, handler)
    }

    /// Shortcut for `add_route("PUT", path, handler)`.
    pub fn put(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("PUT", path, handler)
    }

    /// Shortcut for `add_route("DELETE", path, handler)`.
    pub fn delete(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("DELETE", path, handler)
    }

    /// Walk the tree for `method` along the segments of `path`.
    ///
    /// `Some(node)` means the path exists structurally. The node may still
    /// have no handler when it is only a prefix of longer routes; callers
    /// must treat that the same as `None`. [`Router::lookup`] does this.
    pub fn find_route(&self, method: &str, path: &str) -> Option<&Node<H>> {
        let root = self.trees.get(method)?;
        if path == ROOT {
            return Some(root);
        }

        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        trimmed
            .split('/')
            .try_fold(root, |node, segment| node.child_of(segment))
    }

    /// The handler registered for `method` and `path`, if any.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&H> {
        self.find_route(method, path).and_then(Node::handler)
    }

    /// Every registered route as `(method, path)`, sorted.
    pub fn routes(&self) -> Vec<(String, String)> {
        let mut routes = Vec::new();
        for (method, root) in &self.trees {
            let mut paths = Vec::new();
            root.collect_paths("", &mut paths);
            routes.extend(paths.into_iter().map(|p| (method.clone(), p)));
        }
        routes.sort();
        routes
    }

    /// Methods that have a tree, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.trees.values().map(Node::endpoint_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a route path and split it into segments (empty for `/`).
fn split_route_path(path: &str) -> Result<Vec<&str>, RouteError> {
    if path.is_empty() {
        return Err(RouteError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash {
            path: path.to_string(),
        });
    }
    if path == ROOT {
        return Ok(Vec::new());
    }
    if path.ends_with('/') {
        return Err(RouteError::TrailingSlash {
            path: path.to_string(),
        });
    }

    let segments: Vec<&str> = path[1..].split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(RouteError::EmptySegment {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

//! A single vertex of a method's route tree.
//!
//! # Responsibilities
//! - Own one path segment and, optionally, the handler for the route ending here
//! - Own the literal children (keyed by segment text) and one wildcard child
//! - Resolve one segment per step during lookup
//!
//! # Design Decisions
//! - Each node exclusively owns its children: the tree has no shared nodes
//! - Literal children always win over the wildcard child
//! - A choice made for one segment is final (no backtracking)

use std::collections::HashMap;

/// Segment text that registers a wildcard child.
pub const WILDCARD: &str = "*";

/// Segment stored on the root node of every method tree.
pub const ROOT: &str = "/";

/// One path segment in a route tree.
#[derive(Debug)]
pub struct Node<H> {
    segment: String,
    handler: Option<H>,
    children: HashMap<String, Node<H>>,
    wildcard_child: Option<Box<Node<H>>>,
}

impl<H> Node<H> {
    pub(crate) fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            handler: None,
            children: HashMap::new(),
            wildcard_child: None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::new(ROOT)
    }

    /// The segment text this node represents (`"/"` for a root, `"*"` for a wildcard).
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The handler registered for the route ending at this node, if any.
    ///
    /// A node reached by lookup may be a bare prefix of longer routes, in
    /// which case this is `None` and the request should be treated as a miss.
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Whether a route terminates at this node.
    pub fn is_endpoint(&self) -> bool {
        self.handler.is_some()
    }

    /// Literal children keyed by their segment text.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node<H>)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn wildcard_child(&self) -> Option<&Node<H>> {
        self.wildcard_child.as_deref()
    }

    /// Attach a handler. Hands the handler back if one is already present.
    pub(crate) fn set_handler(&mut self, handler: H) -> Result<(), H> {
        if self.handler.is_some() {
            return Err(handler);
        }
        self.handler = Some(handler);
        Ok(())
    }

    /// Find the child for `segment`, creating it if it does not exist yet.
    ///
    /// `"*"` addresses the wildcard child; anything else is a literal child.
    pub(crate) fn child_or_create(&mut self, segment: &str) -> &mut Node<H> {
        if segment == WILDCARD {
            return self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Node::new(WILDCARD)));
        }
        self.children
            .entry(segment.to_string())
            .or_insert_with(|| Node::new(segment))
    }

    /// Match one request segment: the literal child if present, otherwise
    /// the wildcard child.
    pub(crate) fn child_of(&self, segment: &str) -> Option<&Node<H>> {
        self.children
            .get(segment)
            .or_else(|| self.wildcard_child.as_deref())
    }

    /// Follow `segment` structurally: `"*"` means the wildcard child itself,
    /// not a fallback.
    pub(crate) fn child_exact(&self, segment: &str) -> Option<&Node<H>> {
        if segment == WILDCARD {
            return self.wildcard_child.as_deref();
        }
        self.children.get(segment)
    }

    /// Number of endpoints at or below this node.
    pub(crate) fn endpoint_count(&self) -> usize {
        usize::from(self.is_endpoint())
            + self.children.values().map(Node::endpoint_count).sum::<usize>()
            + self.wildcard_child.as_ref().map_or(0, |w| w.endpoint_count())
    }

    /// Append the full path of every endpoint at or below this node.
    ///
    /// `prefix` is the path leading to this node, without a trailing slash
    /// (empty for a root).
    pub(crate) fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        if self.is_endpoint() {
            out.push(if prefix.is_empty() {
                ROOT.to_string()
            } else {
                prefix.to_string()
            });
        }
        for (segment, child) in &self.children {
            child.collect_paths(&format!("{}/{}", prefix, segment), out);
        }
        if let Some(wildcard) = &self.wildcard_child {
            wildcard.collect_paths(&format!("{}/{}", prefix, WILDCARD), out);
        }
    }
}

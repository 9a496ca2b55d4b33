//! Cycle protection for graph walks.
//!
//! [`CycleGuard`] records every complex node the walker has descended into.
//! The guard is monotonic: once a node is visited it is skipped for the rest
//! of the run, so self-referential and mutually-referential graphs terminate
//! and no physical node is walked twice.
//!
//! Node identity is pluggable through [`NodeIdentity`]. The default,
//! [`ByAddress`], identifies nodes by memory address and type, so two distinct
//! values that compare equal are still distinct nodes.

use indexmap::IndexSet;
use std::any::TypeId;
use std::sync::Arc;

use crate::inspect::Inspect;

/// The identity under which a node is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// A node identified by where it lives and what it is.
    Address { address: usize, type_id: TypeId },
    /// A node identified by its content.
    Content(String),
}

/// Decides which nodes count as the same node for cycle purposes.
pub trait NodeIdentity: Send + Sync {
    /// Returns the key for `node`, or None if it should never be tracked.
    fn key(&self, node: &dyn Inspect) -> Option<NodeKey>;
}

/// Reference identity: memory address plus concrete type.
///
/// The type is part of the key because a struct and its first field can
/// share an address. Zero-sized values have no meaningful address and are
/// not tracked.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByAddress;

impl NodeIdentity for ByAddress {
    fn key(&self, node: &dyn Inspect) -> Option<NodeKey> {
        if std::mem::size_of_val(node) == 0 {
            return None;
        }
        Some(NodeKey::Address {
            address: node as *const _ as *const () as usize,
            type_id: node.as_any().type_id(),
        })
    }
}

/// Identity-keyed visited set scoped to one validation run.
///
/// # Example
///
/// ```rust
/// use autopsy::CycleGuard;
///
/// let nodes = vec![vec![1u8], vec![1u8]];
/// let mut guard = CycleGuard::new();
///
/// assert!(!guard.enter(&nodes[0]));
/// assert!(guard.enter(&nodes[0]));
/// // equal by value, but a different node
/// assert!(!guard.enter(&nodes[1]));
/// ```
#[derive(Clone)]
pub struct CycleGuard {
    identity: Arc<dyn NodeIdentity>,
    visited: IndexSet<NodeKey>,
}

impl CycleGuard {
    /// Creates a guard using reference identity.
    pub fn new() -> Self {
        Self::with_identity(Arc::new(ByAddress))
    }

    /// Creates a guard using a custom identity.
    pub fn with_identity(identity: Arc<dyn NodeIdentity>) -> Self {
        Self {
            identity,
            visited: IndexSet::new(),
        }
    }

    /// Records `node`, returning true if it had already been visited.
    ///
    /// Callers only pass complex nodes; scalars never enter the guard.
    pub fn enter(&mut self, node: &dyn Inspect) -> bool {
        match self.identity.key(node) {
            Some(key) => !self.visited.insert(key),
            None => false,
        }
    }

    /// Returns true if `node` has been visited.
    pub fn contains(&self, node: &dyn Inspect) -> bool {
        self.identity
            .key(node)
            .is_some_and(|key| self.visited.contains(&key))
    }

    /// Returns the number of visited nodes.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if no node has been visited.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Returns the visited keys in visiting order.
    pub fn visited(&self) -> impl Iterator<Item = &NodeKey> {
        self.visited.iter()
    }
}

impl Default for CycleGuard {
    fn default() -> Self {
        Self::new()
    }
}

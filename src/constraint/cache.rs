//! Constraint instance cache.

use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::{Constraint, ConstraintKind};
use crate::error::EngineError;

/// Type alias for the instance storage map.
type InstanceMap = Arc<RwLock<HashMap<TypeId, Arc<dyn Constraint>>>>;

/// A thread-safe cache holding one constraint instance per kind.
///
/// Constraints are stateless, so a single instance can serve every value of a
/// run and every run sharing the cache. Clones share the same storage.
///
/// # Thread Safety
///
/// The cache uses `Arc<RwLock<...>>`:
/// - Lookups of already-built kinds take a read lock and run concurrently
/// - First-time construction is serialized on the write lock; if two threads
///   race on the same kind, the first inserted instance wins
///
/// # Example
///
/// ```rust
/// use autopsy::{ConstraintCache, NotNull};
///
/// let cache = ConstraintCache::new();
/// let first = cache.resolve(NotNull::KIND).unwrap();
/// let second = cache.resolve(NotNull::KIND).unwrap();
///
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ConstraintCache {
    instances: InstanceMap,
}

impl ConstraintCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            instances: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached instance for `kind`, building it on first request.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Instantiation` if the kind cannot be built.
    pub fn resolve(&self, kind: ConstraintKind) -> Result<Arc<dyn Constraint>, EngineError> {
        let id = kind.id();
        if let Some(instance) = self.instances.read().get(&id) {
            return Ok(Arc::clone(instance));
        }

        let built = kind.instantiate()?;
        trace!(kind = kind.name(), "constraint instantiated");

        let mut instances = self.instances.write();
        Ok(Arc::clone(instances.entry(id).or_insert(built)))
    }

    /// Returns true if an instance of `kind` has been built.
    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.instances.read().contains_key(&kind.id())
    }

    /// Returns the number of cached instances.
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    /// Drops every cached instance.
    pub fn clear(&self) {
        self.instances.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{NotEmpty, NotNull};
    use std::thread;

    #[test]
    fn test_resolve_memoizes_per_kind() {
        let cache = ConstraintCache::new();
        assert!(cache.is_empty());

        let a = cache.resolve(NotNull::KIND).unwrap();
        let b = cache.resolve(NotNull::KIND).unwrap();
        let c = cache.resolve(NotEmpty::KIND).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(NotNull::KIND));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ConstraintCache::new();
        let clone = cache.clone();
        clone.resolve(NotNull::KIND).unwrap();
        assert!(cache.contains(NotNull::KIND));

        cache.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_concurrent_resolution_yields_one_instance() {
        let cache = ConstraintCache::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.resolve(NotNull::KIND).unwrap())
            })
            .collect();

        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }
}

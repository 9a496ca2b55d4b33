//! The validation entry point.

use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

use crate::constraint::ConstraintCache;
use crate::context::ValidationContext;
use crate::error::EngineError;
use crate::guard::{ByAddress, CycleGuard, NodeIdentity};
use crate::inspect::{resolve_shape, Inspect};
use crate::path::{AccessPath, DEFAULT_ROOT};
use crate::result::ValidationResult;
use crate::walker;

/// Default maximum traversal depth.
///
/// Every complex node between the root and the value being visited counts as
/// one level, containers included, so a linked list of 300 nodes needs more
/// than this. Raise it with [`Validator::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configured validation engine.
///
/// A validator is cheap to clone and safe to share between threads. Every
/// call to [`validate`](Validator::validate) is an independent run with a
/// fresh cycle guard and error list; the constraint cache is shared by all
/// runs of the validator and of its clones.
///
/// # Example
///
/// ```rust
/// use autopsy::{Inspect, Member, NotNull, Shape, Validator};
///
/// struct Order {
///     id: Option<u64>,
/// }
///
/// impl Inspect for Order {
///     fn shape(&self) -> Shape<'_> {
///         Shape::object(vec![Member::new("id", &self.id).constraint(NotNull::KIND)])
///     }
/// }
///
/// let validator = Validator::new().root_name("order").max_depth(32);
/// let result = validator.validate(&Order { id: None }).unwrap();
///
/// assert_eq!(result.errors()[0].path.to_string(), "order.id");
/// ```
#[derive(Clone)]
pub struct Validator {
    root_name: String,
    max_depth: usize,
    identity: Arc<dyn NodeIdentity>,
    cache: ConstraintCache,
}

impl Validator {
    /// Creates a validator with reference identity, a fresh cache and the
    /// default root name and depth limit.
    pub fn new() -> Self {
        Self {
            root_name: DEFAULT_ROOT.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            identity: Arc::new(ByAddress),
            cache: ConstraintCache::new(),
        }
    }

    /// Sets the name the root renders as in paths.
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Sets the maximum traversal depth.
    ///
    /// Depth counts complex nodes on the current path, not accessors, so a
    /// struct member holding a `Vec` of structs costs two levels. Exceeding
    /// the limit aborts the run with `EngineError::DepthExceeded`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets how the cycle guard identifies nodes.
    pub fn identity<I: NodeIdentity + 'static>(mut self, identity: I) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Uses `cache` for constraint instances, sharing it with its other owners.
    pub fn with_cache(mut self, cache: ConstraintCache) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the constraint cache.
    pub fn cache(&self) -> &ConstraintCache {
        &self.cache
    }

    /// Creates a fresh context for driving constraints by hand.
    pub fn context(&self) -> ValidationContext {
        ValidationContext::new(
            self.cache.clone(),
            CycleGuard::with_identity(Arc::clone(&self.identity)),
            self.root_name.clone(),
            self.max_depth,
        )
    }

    /// Validates the graph reachable from `instance`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NullRoot` if `instance` is absent, or any engine
    /// fault raised while walking. Constraint violations are not errors; they
    /// are collected into the returned result.
    pub fn validate(&self, instance: &dyn Inspect) -> Result<ValidationResult, EngineError> {
        let (root, shape) = resolve_shape(instance);
        if shape.is_absent() {
            return Err(EngineError::NullRoot);
        }

        debug!(root = root.type_name(), "validation started");
        let mut ctx = self.context();
        let path = AccessPath::named_root(self.root_name.clone());
        walker::walk(&mut ctx, root, &path, &[])?;

        let errors = ctx.into_errors();
        debug!(
            root = root.type_name(),
            errors = errors.len(),
            "validation finished"
        );
        Ok(ValidationResult::new(errors))
    }

    /// Validates every instance in parallel, returning results in input order.
    pub fn validate_batch<T>(&self, instances: &[T]) -> Vec<Result<ValidationResult, EngineError>>
    where
        T: Inspect + Sync,
    {
        instances
            .par_iter()
            .map(|instance| self.validate(instance))
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates `instance` with a default [`Validator`].
pub fn validate(instance: &dyn Inspect) -> Result<ValidationResult, EngineError> {
    Validator::new().validate(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::NotNull;
    use crate::inspect::{Member, Shape};

    struct Node {
        name: Option<String>,
        children: Vec<Node>,
    }

    impl Inspect for Node {
        fn shape(&self) -> Shape<'_> {
            Shape::object(vec![
                Member::new("name", &self.name).constraint(NotNull::KIND),
                Member::new("children", &self.children),
            ])
        }
    }

    fn chain(depth: usize) -> Node {
        let mut node = Node {
            name: Some("leaf".to_string()),
            children: Vec::new(),
        };
        for _ in 0..depth {
            node = Node {
                name: Some("inner".to_string()),
                children: vec![node],
            };
        }
        node
    }

    #[test]
    fn test_absent_root_is_a_fault() {
        assert_eq!(validate(&None::<Node>).unwrap_err(), EngineError::NullRoot);
    }

    #[test]
    fn test_custom_root_name() {
        let node = Node {
            name: None,
            children: Vec::new(),
        };
        let result = Validator::new().root_name("tree").validate(&node).unwrap();
        assert_eq!(result.errors()[0].path.to_string(), "tree.name");
    }

    #[test]
    fn test_depth_limit() {
        let validator = Validator::new().max_depth(8);
        assert!(validator.validate(&chain(2)).unwrap().is_valid());
        assert!(matches!(
            validator.validate(&chain(10)),
            Err(EngineError::DepthExceeded { max_depth: 8, .. })
        ));
    }

    #[test]
    fn test_runs_share_the_cache() {
        let validator = Validator::new();
        validator.validate(&chain(1)).unwrap();
        assert!(validator.cache().contains(NotNull::KIND));
        assert!(validator.clone().cache().contains(NotNull::KIND));
    }

    #[test]
    fn test_runs_are_independent() {
        let validator = Validator::new();
        let node = Node {
            name: None,
            children: Vec::new(),
        };
        let first = validator.validate(&node).unwrap();
        let second = validator.validate(&node).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }
}

//! Mutable state threaded through one validation run.
//!
//! This module provides the [`ValidationContext`] type that carries the
//! constraint cache, the cycle guard, the accumulated errors and depth
//! tracking. Constraints receive the context by mutable reference and use it
//! to report violations or to validate nested values.

use std::sync::Arc;

use crate::constraint::{Constraint, ConstraintCache, ConstraintKind};
use crate::error::{EngineError, ErrorDetails, ValidationError};
use crate::guard::CycleGuard;
use crate::inspect::Inspect;
use crate::path::AccessPath;
use crate::walker;

/// Validation context for one run.
///
/// A context is created by [`Validator::context`](crate::Validator::context)
/// or internally by [`Validator::validate`](crate::Validator::validate).
/// Nested validations started by composite constraints reuse the same
/// context, sharing its cycle guard and constraint cache with the enclosing
/// run.
pub struct ValidationContext {
    cache: ConstraintCache,
    guard: CycleGuard,
    errors: Vec<ValidationError>,
    root_name: String,
    current: Option<ConstraintKind>,
    depth: usize,
    max_depth: usize,
}

impl ValidationContext {
    pub(crate) fn new(
        cache: ConstraintCache,
        guard: CycleGuard,
        root_name: String,
        max_depth: usize,
    ) -> Self {
        Self {
            cache,
            guard,
            errors: Vec::new(),
            root_name,
            current: None,
            depth: 0,
            max_depth,
        }
    }

    /// Returns the instance for `kind`, building it on first request.
    pub fn resolve_constraint(
        &self,
        kind: ConstraintKind,
    ) -> Result<Arc<dyn Constraint>, EngineError> {
        self.cache.resolve(kind)
    }

    /// Appends an error; `None` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::BlankDetails` if the error's details are blank.
    pub fn add_error(&mut self, error: Option<ValidationError>) -> Result<(), EngineError> {
        let Some(error) = error else {
            return Ok(());
        };
        if !error.details.is_complete() {
            return Err(EngineError::BlankDetails {
                kind: error.constraint_kind(),
                path: error.path.to_string(),
            });
        }

        self.errors.push(error);
        Ok(())
    }

    /// Reports a violation at `path`, attributed to the executing constraint.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::BlankDetails` if the details are blank, and
    /// `EngineError::Unattributed` when no constraint is executing.
    pub fn report(&mut self, path: &AccessPath, details: ErrorDetails) -> Result<(), EngineError> {
        let Some(kind) = self.current else {
            return Err(EngineError::Unattributed {
                path: path.to_string(),
            });
        };
        self.add_error(Some(ValidationError::new(kind, path.clone(), details)))
    }

    /// Re-runs the engine on `value`, which sits at `path` in the outer graph.
    ///
    /// The nested run shares this context's cycle guard, constraint cache and
    /// depth budget. It walks from `path` itself, so its errors, their
    /// descriptions and any fault it raises all name locations from the outer
    /// root.
    pub fn validate_nested(
        &mut self,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        let outer_kind = self.current.take();
        let outcome = walker::walk(self, value, path, &[]);
        self.current = outer_kind;
        outcome
    }

    /// Validates member `member` of `owner`, where `owner` sits at `path`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownMember` if `owner` exposes no such member.
    pub fn validate_member(
        &mut self,
        path: &AccessPath,
        owner: &dyn Inspect,
        member: &str,
    ) -> Result<(), EngineError> {
        let relative = AccessPath::named_root(self.root_name.clone()).member(member);
        let value = relative
            .evaluate(owner)
            .ok_or_else(|| EngineError::UnknownMember {
                path: path.to_string(),
                member: member.to_string(),
            })?;
        self.validate_nested(&path.compose(&relative), value)
    }

    /// Returns the errors accumulated so far.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the cycle guard.
    pub fn guard(&self) -> &CycleGuard {
        &self.guard
    }

    /// Returns the current traversal depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the maximum allowed traversal depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Executes the constraint of `kind` against `value`.
    pub(crate) fn run(
        &mut self,
        kind: ConstraintKind,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        let constraint = self.resolve_constraint(kind)?;
        let previous = self.current.replace(kind);
        let outcome = constraint.validate(self, path, value);
        self.current = previous;
        outcome
    }

    /// Records `node` in the cycle guard, returning true if already visited.
    pub(crate) fn enter(&mut self, node: &dyn Inspect) -> bool {
        self.guard.enter(node)
    }

    pub(crate) fn descend(&mut self, path: &AccessPath) -> Result<(), EngineError> {
        if self.depth >= self.max_depth {
            return Err(EngineError::DepthExceeded {
                max_depth: self.max_depth,
                path: path.to_string(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::NotNull;

    fn context(max_depth: usize) -> ValidationContext {
        ValidationContext::new(
            ConstraintCache::new(),
            CycleGuard::new(),
            "instance".to_string(),
            max_depth,
        )
    }

    #[test]
    fn test_add_error_ignores_none() {
        let mut ctx = context(8);
        ctx.add_error(None).unwrap();
        assert!(ctx.errors().is_empty());

        ctx.add_error(Some(ValidationError::new(
            NotNull::KIND,
            AccessPath::root(),
            ErrorDetails::new("text", "description"),
        )))
        .unwrap();
        assert_eq!(ctx.errors().len(), 1);
    }

    #[test]
    fn test_add_error_rejects_blank_details() {
        let mut ctx = context(8);
        let err = ctx
            .add_error(Some(ValidationError::new(
                NotNull::KIND,
                AccessPath::root().member("x"),
                ErrorDetails::new("", " "),
            )))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::BlankDetails {
                kind: "NotNull",
                path: "instance.x".to_string(),
            }
        );
        assert!(ctx.errors().is_empty());
    }

    #[test]
    fn test_report_outside_constraint_is_a_fault() {
        let mut ctx = context(8);
        let err = ctx
            .report(&AccessPath::root(), ErrorDetails::new("text", "description"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Unattributed { .. }));
    }

    #[test]
    fn test_depth_tracking() {
        let mut ctx = context(2);
        let path = AccessPath::root();
        ctx.descend(&path).unwrap();
        ctx.descend(&path).unwrap();
        assert_eq!(ctx.depth(), 2);
        assert!(matches!(
            ctx.descend(&path),
            Err(EngineError::DepthExceeded { max_depth: 2, .. })
        ));
        ctx.ascend();
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn test_run_caches_constraint() {
        let mut ctx = context(8);
        ctx.run(NotNull::KIND, &AccessPath::root(), &Some(1u8))
            .unwrap();
        assert!(ctx.errors().is_empty());
        assert!(ctx.cache.contains(NotNull::KIND));
    }
}

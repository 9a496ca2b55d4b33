//! Validation error types.
//!
//! This module provides [`ValidationError`] for a single constraint violation
//! and [`ValidationErrors`] for a non-empty collection of them.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::constraint::ConstraintKind;
use crate::path::AccessPath;

/// User-facing text and diagnostic description of a violation.
///
/// Both fields must be non-blank; the engine rejects blank details with
/// [`EngineError::BlankDetails`](crate::EngineError::BlankDetails).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorDetails {
    /// Short text suitable for end users.
    pub text: String,
    /// Longer description for diagnostics.
    pub description: String,
}

impl ErrorDetails {
    /// Creates details from a short text and a longer description.
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }

    /// Returns true if both text and description contain non-whitespace.
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// A single constraint violation.
///
/// Carries the kind of the failed constraint, the full access path from the
/// validation root to the offending value, and the error details.
///
/// # Example
///
/// ```rust
/// use autopsy::{AccessPath, ErrorDetails, NotNull, ValidationError};
///
/// let error = ValidationError::new(
///     NotNull::KIND,
///     AccessPath::root().member("email"),
///     ErrorDetails::new("Value is required", "email must not be null"),
/// );
///
/// assert_eq!(error.constraint_kind(), "NotNull");
/// assert_eq!(error.to_string(), "instance.email: Value is required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The constraint that failed.
    pub kind: ConstraintKind,
    /// The path to the value that failed.
    pub path: AccessPath,
    /// What went wrong.
    pub details: ErrorDetails,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ConstraintKind, path: AccessPath, details: ErrorDetails) -> Self {
        Self {
            kind,
            path,
            details,
        }
    }

    /// Returns the short name of the failed constraint kind.
    pub fn constraint_kind(&self) -> &'static str {
        self.kind.name()
    }

    /// Re-expresses this error relative to `outer`.
    ///
    /// Useful when errors gathered against a detached value are merged into a
    /// report whose root places that value at `outer`.
    pub fn rebased(self, outer: &AccessPath) -> Self {
        Self {
            path: outer.compose(&self.path),
            ..self
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.details.text)
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of validation errors.
///
/// `ValidationErrors` wraps a `NonEmptyVec<ValidationError>` so it can serve
/// as the failure side of a `stillwater::Validation`. It implements
/// `Semigroup`, so errors from independent runs can be combined:
///
/// ```rust
/// use autopsy::{AccessPath, ErrorDetails, NotNull, ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let error = |name: &str| {
///     ValidationError::new(
///         NotNull::KIND,
///         AccessPath::root().member(name),
///         ErrorDetails::new("Value is required", format!("{} must not be null", name)),
///     )
/// };
///
/// let combined = ValidationErrors::single(error("name"))
///     .combine(ValidationErrors::single(error("email")));
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a vec, or None if the vec is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all errors whose rendered path equals `path`.
    pub fn at_path(&self, path: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.path.to_string() == path).collect()
    }

    /// Returns all errors raised by the named constraint kind.
    pub fn with_kind(&self, kind: &str) -> Vec<&ValidationError> {
        self.0
            .iter()
            .filter(|e| e.constraint_kind() == kind)
            .collect()
    }

    /// Returns the first error.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{NotEmpty, NotNull};

    fn error(kind: ConstraintKind, member: &str) -> ValidationError {
        ValidationError::new(
            kind,
            AccessPath::root().member(member),
            ErrorDetails::new("failed", format!("{} failed", member)),
        )
    }

    #[test]
    fn test_details_completeness() {
        assert!(ErrorDetails::new("text", "description").is_complete());
        assert!(!ErrorDetails::new("  ", "description").is_complete());
        assert!(!ErrorDetails::new("text", "").is_complete());
    }

    #[test]
    fn test_rebased_prefixes_outer_path() {
        let nested = ValidationError::new(
            NotNull::KIND,
            AccessPath::root().member("value"),
            ErrorDetails::new("Value is required", "value must not be null"),
        );
        let outer = AccessPath::root().member("entries").index(2);

        let rebased = nested.rebased(&outer);
        assert_eq!(rebased.path.to_string(), "instance.entries[2].value");
        assert_eq!(rebased.constraint_kind(), "NotNull");
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
        let errors = ValidationErrors::from_vec(vec![error(NotNull::KIND, "a")]).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_filters() {
        let errors = ValidationErrors::single(error(NotNull::KIND, "a"))
            .combine(ValidationErrors::single(error(NotEmpty::KIND, "a")))
            .combine(ValidationErrors::single(error(NotNull::KIND, "b")));

        assert_eq!(errors.at_path("instance.a").len(), 2);
        assert_eq!(errors.with_kind("NotNull").len(), 2);
        assert_eq!(errors.with_kind("NotEmpty").len(), 1);
        assert_eq!(errors.first().path.to_string(), "instance.a");
    }

    #[test]
    fn test_display_lists_every_error() {
        let errors = ValidationErrors::single(error(NotNull::KIND, "name"))
            .combine(ValidationErrors::single(error(NotNull::KIND, "email")));
        let display = errors.to_string();

        assert!(display.contains("2 error(s)"));
        assert!(display.contains("1. instance.name: failed"));
        assert!(display.contains("2. instance.email: failed"));
    }

    #[test]
    fn test_semigroup_associativity() {
        let e1 = ValidationErrors::single(error(NotNull::KIND, "1"));
        let e2 = ValidationErrors::single(error(NotNull::KIND, "2"));
        let e3 = ValidationErrors::single(error(NotNull::KIND, "3"));

        let left = e1.clone().combine(e2.clone()).combine(e3.clone());
        let right = e1.combine(e2.combine(e3));
        assert_eq!(left, right);
    }
}

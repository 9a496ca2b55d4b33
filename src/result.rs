//! Outcome of a validation run.

use serde_json::{json, Value};
use std::fmt::Write;
use std::sync::OnceLock;
use stillwater::Validation;

use crate::error::{ValidationError, ValidationErrors};

/// Immutable snapshot of a finished validation run.
///
/// A result is valid iff it holds no errors. The aggregate failure message is
/// rendered on first request and memoized.
///
/// # Example
///
/// ```rust
/// use autopsy::{validate, Inspect, Member, NotNull, Shape};
///
/// struct Account {
///     owner: Option<String>,
/// }
///
/// impl Inspect for Account {
///     fn shape(&self) -> Shape<'_> {
///         Shape::object(vec![Member::new("owner", &self.owner).constraint(NotNull::KIND)])
///     }
/// }
///
/// let result = validate(&Account { owner: None }).unwrap();
/// assert!(!result.is_valid());
/// assert_eq!(
///     result.failure_message(),
///     Some("[1/1] [instance.owner] Value is required")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    failure_message: OnceLock<Option<String>>,
}

impl ValidationResult {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self {
            errors,
            failure_message: OnceLock::new(),
        }
    }

    /// Returns true if no constraint was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the violations in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns every violation as one line of `[index/total] [path] text`,
    /// or None if the result is valid.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message
            .get_or_init(|| render_failure_message(&self.errors))
            .as_deref()
    }

    /// Converts into a `Validation`, failing with every violation.
    pub fn into_validation(self) -> Validation<(), ValidationErrors> {
        match ValidationErrors::from_vec(self.errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }

    /// Converts into a `Result`, failing with every violation.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        self.into_validation().into_result()
    }

    /// Consumes the result, returning its violations.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Renders a machine-readable report.
    ///
    /// ```json
    /// {
    ///   "valid": false,
    ///   "errors": [
    ///     {
    ///       "path": "instance.owner",
    ///       "constraint": "NotNull",
    ///       "text": "Value is required",
    ///       "description": "'instance.owner' must not be null"
    ///     }
    ///   ]
    /// }
    /// ```
    pub fn to_json(&self) -> Value {
        let errors: Vec<Value> = self
            .errors
            .iter()
            .map(|error| {
                json!({
                    "path": error.path.to_string(),
                    "constraint": error.constraint_kind(),
                    "text": error.details.text,
                    "description": error.details.description,
                })
            })
            .collect();

        json!({
            "valid": self.is_valid(),
            "errors": errors,
        })
    }
}

impl PartialEq for ValidationResult {
    fn eq(&self, other: &Self) -> bool {
        self.errors == other.errors
    }
}

fn render_failure_message(errors: &[ValidationError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }

    let total = errors.len();
    let mut message = String::new();
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            message.push('\n');
        }
        let _ = write!(
            message,
            "[{}/{}] [{}] {}",
            i + 1,
            total,
            error.path,
            error.details.text
        );
    }
    Some(message)
}

//! A small catalogue of ready-made constraints.

use regex::Regex;

#[cfg(feature = "chrono")]
use chrono::{DateTime, FixedOffset, Local};

use super::{BuildConstraint, Constraint, ConstraintKind};
use crate::context::ValidationContext;
use crate::error::{EngineError, ErrorDetails};
use crate::inspect::{resolve_shape, Inspect, Member, Shape};
use crate::path::AccessPath;

/// Requires a value to be present.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotNull;

impl NotNull {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<NotNull>();
}

impl Constraint for NotNull {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        if !resolve_shape(value).1.is_absent() {
            return Ok(());
        }
        ctx.report(
            path,
            ErrorDetails::new(
                "Value is required",
                format!("'{}' must not be null", path),
            ),
        )
    }
}

/// Legacy name for [`NotNull`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Required {
    canonical: NotNull,
}

impl Required {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<Required>();
}

impl Constraint for Required {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        self.canonical.validate(ctx, path, value)
    }
}

/// Requires text or a container to hold at least one character or item.
///
/// Absent values pass; combine with [`NotNull`] to require presence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotEmpty;

impl NotEmpty {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<NotEmpty>();
}

impl Constraint for NotEmpty {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        let (node, shape) = resolve_shape(value);
        let empty = match shape {
            Shape::Absent => return Ok(()),
            Shape::Text(text) => text.is_empty(),
            Shape::Complex(complex) => match complex.into_items() {
                Some(mut items) => items.next().is_none(),
                None => return Err(incompatible("NotEmpty", "text or container", node, path)),
            },
            Shape::Leaf | Shape::Forward(_) => {
                return Err(incompatible("NotEmpty", "text or container", node, path))
            }
        };

        if !empty {
            return Ok(());
        }
        ctx.report(
            path,
            ErrorDetails::new(
                "Value must not be empty",
                format!("'{}' is empty but at least one element is required", path),
            ),
        )
    }
}

/// Requires text to be an identifier: a letter or underscore followed by
/// letters, digits or underscores.
#[derive(Debug, Clone)]
pub struct Identifier {
    pattern: Regex,
}

impl Identifier {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::fallible::<Identifier>();
}

impl BuildConstraint for Identifier {
    fn build() -> Result<Self, String> {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map(|pattern| Self { pattern })
            .map_err(|e| e.to_string())
    }
}

impl Constraint for Identifier {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        let (node, shape) = resolve_shape(value);
        let text = match shape {
            Shape::Absent => return Ok(()),
            Shape::Text(text) => text,
            _ => return Err(incompatible("Identifier", "text", node, path)),
        };

        if self.pattern.is_match(text) {
            return Ok(());
        }
        ctx.report(
            path,
            ErrorDetails::new(
                "Value must be an identifier",
                format!(
                    "'{}' holds {:?}, which does not match {}",
                    path,
                    text,
                    self.pattern.as_str()
                ),
            ),
        )
    }
}

/// Requires a timestamp to be in UTC.
///
/// Accepts `DateTime<chrono::Utc>` as is and checks the offset of
/// `DateTime<FixedOffset>` and `DateTime<Local>` values. Absent values pass.
#[cfg(feature = "chrono")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Utc;

#[cfg(feature = "chrono")]
impl Utc {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<Utc>();
}

#[cfg(feature = "chrono")]
impl Constraint for Utc {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        let (node, shape) = resolve_shape(value);
        if shape.is_absent() {
            return Ok(());
        }

        let any = node.as_any();
        let (offset, rendered) = if any.is::<DateTime<chrono::Utc>>() {
            return Ok(());
        } else if let Some(fixed) = any.downcast_ref::<DateTime<FixedOffset>>() {
            (fixed.offset().local_minus_utc(), fixed.to_rfc3339())
        } else if let Some(local) = any.downcast_ref::<DateTime<Local>>() {
            (local.offset().local_minus_utc(), local.to_rfc3339())
        } else {
            return Err(incompatible("Utc", "chrono::DateTime<Tz>", node, path));
        };

        if offset == 0 {
            return Ok(());
        }
        ctx.report(
            path,
            ErrorDetails::new(
                "Date must be in UTC",
                format!("'{}' is {}, expected offset +00:00", path, rendered),
            ),
        )
    }
}

/// Legacy name for [`Utc`].
#[cfg(feature = "chrono")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UtcDateTime {
    canonical: Utc,
}

#[cfg(feature = "chrono")]
impl UtcDateTime {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<UtcDateTime>();
}

#[cfg(feature = "chrono")]
impl Constraint for UtcDateTime {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        self.canonical.validate(ctx, path, value)
    }
}

/// A key/value pair.
///
/// Exposes `key` and `value` as members without constraints of their own;
/// annotate the pair with [`ValidPair`] to validate both sides as nested
/// graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

impl<K, V> Pair<K, V> {
    /// Creates a new pair.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Inspect, V: Inspect> Inspect for Pair<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::object(vec![
            Member::new("key", &self.key),
            Member::new("value", &self.value),
        ])
    }
}

/// Validates both sides of a key/value pair as nested graphs.
///
/// Errors found inside the key or value are reported at their full path from
/// the outer root, e.g. `instance.entries[3].value.email`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidPair;

impl ValidPair {
    /// The kind handle used in annotations.
    pub const KIND: ConstraintKind = ConstraintKind::of::<ValidPair>();
}

impl Constraint for ValidPair {
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError> {
        if resolve_shape(value).1.is_absent() {
            return Ok(());
        }
        ctx.validate_member(path, value, "key")?;
        ctx.validate_member(path, value, "value")
    }
}

fn incompatible(
    constraint: &'static str,
    expected: &'static str,
    node: &dyn Inspect,
    path: &AccessPath,
) -> EngineError {
    EngineError::IncompatibleType {
        constraint,
        expected,
        found: node.type_name(),
        path: path.to_string(),
    }
}

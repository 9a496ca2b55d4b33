//! Constraint contracts and constraint kinds.
//!
//! A constraint is a stateless rule that inspects one value and reports zero
//! or more violations through the [`ValidationContext`]. Constraints come in
//! two flavours:
//!
//! - [`Constraint`]: the untyped contract, receiving any [`Inspect`] value.
//! - [`TypedConstraint`]: declares the concrete type it validates. The engine
//!   performs one checked downcast and fails with
//!   [`EngineError::IncompatibleType`] when the annotated value has another
//!   type. Absent values are skipped; pair typed constraints with
//!   [`NotNull`] to require presence.
//!
//! Annotations refer to constraints through [`ConstraintKind`] handles. A
//! kind knows how to build its constraint, and one instance per kind is cached
//! and reused for a whole run.

mod builtin;
mod cache;

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::context::ValidationContext;
use crate::error::EngineError;
use crate::inspect::{resolve_shape, Inspect};
use crate::path::AccessPath;

pub use builtin::{Identifier, NotEmpty, NotNull, Pair, Required, ValidPair};
#[cfg(feature = "chrono")]
pub use builtin::{Utc, UtcDateTime};
pub use cache::ConstraintCache;

/// The untyped constraint contract.
///
/// Implementations must be re-entrant and free of side effects other than
/// reporting through `ctx`; one instance serves every value of a run and may
/// be shared between threads.
pub trait Constraint: Send + Sync + 'static {
    /// Validates `value`, found at `path`, reporting violations to `ctx`.
    fn validate(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &dyn Inspect,
    ) -> Result<(), EngineError>;
}

/// A constraint over values of one concrete type.
pub trait TypedConstraint: Send + Sync + 'static {
    /// The type this constraint validates.
    type Target: Any;

    /// Validates a value already known to be of the target type.
    fn validate_typed(
        &self,
        ctx: &mut ValidationContext,
        path: &AccessPath,
        value: &Self::Target,
    ) -> Result<(), EngineError>;
}

/// Adapts a [`TypedConstraint`] to the untyped contract.
pub struct Typed<C>(pub C);

impl<C: TypedConstraint> Constraint for Typed<C> {
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

        match node.as_any().downcast_ref::<C::Target>() {
            Some(typed) => self.0.validate_typed(ctx, path, typed),
            None => Err(EngineError::IncompatibleType {
                constraint: short_name(type_name::<C>()),
                expected: type_name::<C::Target>(),
                found: node.type_name(),
                path: path.to_string(),
            }),
        }
    }
}

/// A constraint whose construction can fail.
pub trait BuildConstraint: Constraint + Sized {
    /// Builds the constraint, or explains why it cannot be built.
    fn build() -> Result<Self, String>;
}

type Builder = fn() -> Result<Arc<dyn Constraint>, EngineError>;

/// Identifies a constraint kind and knows how to build it.
///
/// Kinds are plain `Copy` data and can be created in `const` context, so
/// constraints usually expose theirs as an associated constant:
///
/// ```rust
/// use autopsy::{AccessPath, Constraint, ConstraintKind, EngineError, Inspect, ValidationContext};
///
/// #[derive(Default)]
/// struct AlwaysValid;
///
/// impl AlwaysValid {
///     const KIND: ConstraintKind = ConstraintKind::of::<AlwaysValid>();
/// }
///
/// impl Constraint for AlwaysValid {
///     fn validate(
///         &self,
///         _ctx: &mut ValidationContext,
///         _path: &AccessPath,
///         _value: &dyn Inspect,
///     ) -> Result<(), EngineError> {
///         Ok(())
///     }
/// }
///
/// assert_eq!(AlwaysValid::KIND.name(), "AlwaysValid");
/// ```
#[derive(Clone, Copy)]
pub struct ConstraintKind {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    build: Builder,
}

impl ConstraintKind {
    /// The kind of an untyped, default-constructible constraint.
    pub const fn of<C: Constraint + Default>() -> Self {
        Self {
            type_id: TypeId::of::<C>,
            type_name: type_name::<C>,
            build: build_default::<C>,
        }
    }

    /// The kind of a typed, default-constructible constraint.
    pub const fn typed<C: TypedConstraint + Default>() -> Self {
        Self {
            type_id: TypeId::of::<C>,
            type_name: type_name::<C>,
            build: build_typed::<C>,
        }
    }

    /// The kind of a constraint with fallible construction.
    pub const fn fallible<C: BuildConstraint>() -> Self {
        Self {
            type_id: TypeId::of::<C>,
            type_name: type_name::<C>,
            build: build_fallible::<C>,
        }
    }

    /// Returns the identity of this kind.
    pub fn id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns the short name of this kind, e.g. `NotNull`.
    pub fn name(&self) -> &'static str {
        short_name((self.type_name)())
    }

    /// Returns the fully qualified type name of this kind.
    pub fn full_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Builds a fresh constraint instance.
    pub fn instantiate(&self) -> Result<Arc<dyn Constraint>, EngineError> {
        (self.build)()
    }
}

impl PartialEq for ConstraintKind {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ConstraintKind {}

impl Hash for ConstraintKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstraintKind").field(&self.name()).finish()
    }
}

fn build_default<C: Constraint + Default>() -> Result<Arc<dyn Constraint>, EngineError> {
    Ok(Arc::new(C::default()))
}

fn build_typed<C: TypedConstraint + Default>() -> Result<Arc<dyn Constraint>, EngineError> {
    Ok(Arc::new(Typed(C::default())))
}

fn build_fallible<C: BuildConstraint>() -> Result<Arc<dyn Constraint>, EngineError> {
    match C::build() {
        Ok(constraint) => Ok(Arc::new(constraint)),
        Err(reason) => Err(EngineError::Instantiation {
            kind: short_name(type_name::<C>()),
            reason,
        }),
    }
}

/// Strips the module path and generic arguments from a type name.
pub(crate) fn short_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

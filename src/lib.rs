//! # Autopsy
//!
//! A recursive object-graph validation engine that walks an entire graph and
//! reports ALL constraint violations, each located by its full access path
//! from the root (e.g. `instance.orders[2].customer.email`).
//!
//! ## Overview
//!
//! Model types describe themselves through [`Inspect`], listing the members
//! the engine should see and the constraint kinds attached to each. The
//! [`Validator`] walks the graph depth-first, executes every attached
//! constraint, descends into members and container items, and guards against
//! cycles so self-referential graphs terminate.
//!
//! Two kinds of failure are kept apart:
//!
//! - Constraint violations are data. They are accumulated into a
//!   [`ValidationResult`] and never stop the walk.
//! - Engine faults ([`EngineError`]) mean the annotations do not fit the data,
//!   e.g. a typed constraint attached to a value of another type. They abort
//!   the run.
//!
//! ## Core Types
//!
//! - [`AccessPath`]: how a value is reached from the root
//! - [`Inspect`] / [`Shape`] / [`Member`]: the walkable view of a value
//! - [`Constraint`] / [`TypedConstraint`] / [`ConstraintKind`]: validation rules
//! - [`ValidationContext`]: per-run state handed to constraints
//! - [`CycleGuard`]: identity-keyed visited set
//! - [`Validator`] / [`ValidationResult`]: the entry point and its outcome
//!
//! ## Example
//!
//! ```rust
//! use autopsy::{validate, Inspect, Member, NotEmpty, NotNull, Shape};
//!
//! struct Customer {
//!     email: Option<String>,
//! }
//!
//! struct Order {
//!     customer: Customer,
//!     lines: Vec<String>,
//! }
//!
//! impl Inspect for Customer {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::object(vec![Member::new("email", &self.email).constraint(NotNull::KIND)])
//!     }
//! }
//!
//! impl Inspect for Order {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::object(vec![
//!             Member::new("customer", &self.customer),
//!             Member::new("lines", &self.lines)
//!                 .constraint(NotEmpty::KIND)
//!                 .item_constraint(NotEmpty::KIND),
//!         ])
//!     }
//! }
//!
//! let order = Order {
//!     customer: Customer { email: None },
//!     lines: vec!["widget".to_string(), String::new()],
//! };
//!
//! let result = validate(&order).unwrap();
//! assert_eq!(result.len(), 2);
//! assert_eq!(
//!     result.failure_message(),
//!     Some(
//!         "[1/2] [instance.customer.email] Value is required\n\
//!          [2/2] [instance.lines[1]] Value must not be empty"
//!     )
//! );
//! ```

pub mod constraint;
pub mod context;
pub mod error;
pub mod guard;
pub mod inspect;
pub mod path;
pub mod result;
pub mod validator;
pub mod walker;

pub use constraint::{
    BuildConstraint, Constraint, ConstraintCache, ConstraintKind, Identifier, NotEmpty, NotNull,
    Pair, Required, Typed, TypedConstraint, ValidPair,
};
#[cfg(feature = "chrono")]
pub use constraint::{Utc, UtcDateTime};
pub use context::ValidationContext;
pub use error::{EngineError, ErrorDetails, ValidationError, ValidationErrors};
pub use guard::{ByAddress, CycleGuard, NodeIdentity, NodeKey};
pub use inspect::{resolve, resolve_shape, AsAny, Complex, Inspect, Items, Member, Shape};
pub use path::{AccessPath, Accessor, DEFAULT_ROOT};
pub use result::ValidationResult;
pub use validator::{validate, Validator, DEFAULT_MAX_DEPTH};
pub use walker::{enumerate, Descriptor, Origin};

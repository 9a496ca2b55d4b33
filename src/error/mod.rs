//! Error types.
//!
//! Two categories are kept strictly apart:
//! - [`ValidationError`]: a value failed a constraint's rule. These are data,
//!   accumulated into a result, and never abort a run.
//! - [`EngineError`]: the annotation setup itself is wrong (absent root,
//!   constraint that cannot be built, value of the wrong type for a typed
//!   constraint, runaway depth). These abort the run immediately.

mod engine_error;
mod validation_error;

pub use engine_error::EngineError;
pub use validation_error::{ErrorDetails, ValidationError, ValidationErrors};

//! Faults raised by the engine itself.

/// A configuration or programming error that aborts a validation run.
///
/// Engine errors are never added to a result's error list; they signal that
/// the constraint annotations do not fit the data they are attached to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The root handed to the validator was absent.
    #[error("cannot validate an absent root instance")]
    NullRoot,

    /// A constraint kind failed to construct.
    #[error("constraint '{kind}' could not be instantiated: {reason}")]
    Instantiation { kind: &'static str, reason: String },

    /// A typed constraint received a value of another type.
    #[error("constraint '{constraint}' expects '{expected}' but '{path}' holds '{found}'")]
    IncompatibleType {
        constraint: &'static str,
        expected: &'static str,
        found: &'static str,
        path: String,
    },

    /// A constraint reported an error with blank text or description.
    #[error("constraint '{kind}' reported an error at '{path}' with blank details")]
    BlankDetails { kind: &'static str, path: String },

    /// An error was reported while no constraint was executing.
    #[error("error reported at '{path}' outside of a constraint")]
    Unattributed { path: String },

    /// The walk went deeper than the configured maximum.
    #[error("maximum traversal depth {max_depth} exceeded at '{path}'")]
    DepthExceeded { max_depth: usize, path: String },

    /// A composite constraint named a member the value does not expose.
    #[error("'{path}' has no member named '{member}'")]
    UnknownMember { path: String, member: String },

    /// A constraint failed for reasons of its own.
    #[error("constraint '{kind}' failed: {message}")]
    Constraint { kind: &'static str, message: String },
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<EngineError>();
    assert_sync::<EngineError>();
};

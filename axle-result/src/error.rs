use thiserror::Error;

/// Unified error type for all axle operations.
///
/// Every failure a batch, builder, bridge, or expression evaluation can hit is
/// a variant here. Errors propagate with `?`; the component that raises one is
/// responsible for releasing any partially constructed device state before the
/// error leaves its scope, which the ownership model enforces mechanically.
///
/// `Error` is `Send + Sync`, so failures can cross the task boundaries of a
/// caller that evaluates independent batches concurrently.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow failure during buffer allocation, growth, casting, or kernel
    /// evaluation.
    ///
    /// The device engine's buffers and kernels surface their failures through
    /// this variant. Allocation failures are fatal to the current batch; any
    /// retry policy belongs to the caller, not to this stack.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A logical type has no device counterpart.
    ///
    /// Raised eagerly at schema-mapping time. This is a configuration-level
    /// failure: the planner routed an operator to the device path that should
    /// have stayed on the host path. It never indicates bad row data.
    #[error("{0} is not supported for device execution")]
    UnsupportedType(String),

    /// An access pattern the device representation cannot serve at all.
    ///
    /// Nested, binary, and decimal row access fall in this category. Always
    /// fatal, never retried; failing fast here is preferable to silently
    /// returning wrong data.
    #[error("not supported on device columns: {0}")]
    Unsupported(String),

    /// A table's row count exceeds what a batch can represent.
    ///
    /// Batches are bounded to a 32-bit row count even though the underlying
    /// table reports a wider one. Signals a sizing error upstream.
    #[error("cannot build a batch over {0} rows")]
    RowCountOverflow(u64),

    /// An expression node's evaluated child had the wrong vector/scalar shape.
    ///
    /// Indicates a malformed expression tree, e.g. a unary node whose child
    /// evaluated to a scalar when its kernel operates on columns.
    #[error("expression shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Invalid user input or API parameter.
    ///
    /// Out-of-range column indexes, mismatched column lengths, appends of the
    /// wrong type into a builder, and similar argument problems.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// Should never occur during normal operation.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an [`Error::UnsupportedType`] for a logical type.
    #[inline]
    pub fn unsupported_type<T: std::fmt::Display>(ty: T) -> Self {
        Error::UnsupportedType(ty.to_string())
    }
}

//! Error infrastructure for cultivation-core.
//!
//! Two families of errors are raised here:
//!
//! - [`SpiritRootError`] from the spirit root engine. The engine never
//!   substitutes a default for malformed input, so callers see exactly why a
//!   root text was rejected.
//! - [`ValidationError`] from applying a field patch to a record.
//!
//! Engine errors are classified by [`ErrorKind`] so that outer layers can map
//! them to user-facing messages without matching on every variant.

/// Classification of a core error.
///
/// - **Format**: the input text could not be split into its parts at all
/// - **Domain**: the input parsed, but a value lies outside the configured
///   vocabulary or range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Domain,
}

/// Errors raised by the spirit root engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SpiritRootError {
    /// No `-` or `_` separator in the root text.
    #[error("invalid root text '{text}': must contain '-' or '_'")]
    Format { text: String },

    #[error("unknown spirit root attribute '{symbol}'")]
    UnknownAttribute { symbol: char },

    #[error("unknown spirit root tier '{tier}'")]
    UnknownTier { tier: String },

    /// Attribute substring is empty or longer than the vocabulary allows.
    #[error("spirit root must have between 1 and {max} attributes, found {count}")]
    AttributeCount { count: usize, max: usize },

    /// Target value for constrained generation must be strictly positive.
    #[error("target value must be positive, got {target}")]
    InvalidTarget { target: u64 },

    /// No canonical root lies within the tolerance band of the target.
    #[error("no spirit root has a value within {tolerance} of {target}")]
    TargetUnreachable { target: u64, tolerance: f64 },

    #[error("no spirit root near {target} found after {attempts} attempts")]
    AttemptsExhausted { target: u64, attempts: u32 },
}

impl SpiritRootError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::UnknownAttribute { .. }
            | Self::UnknownTier { .. }
            | Self::AttributeCount { .. }
            | Self::InvalidTarget { .. }
            | Self::TargetUnreachable { .. }
            | Self::AttemptsExhausted { .. } => ErrorKind::Domain,
        }
    }
}

/// Errors raised while applying a field patch to a record.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' expects {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },

    #[error("field 'root' is not a legal spirit root: '{root}'")]
    IllegalRoot { root: String },
}

//! Error type shared by the evolutionary engine.

/// Errors raised by network, population and snapshot operations.
///
/// Every operation is all-or-nothing: when an error is returned, the
/// population and its networks are left exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum NeatError {
    /// An observation vector or a parent network has the wrong shape.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Size the receiver was built with.
        expected: usize,
        /// Size that was supplied.
        actual: usize,
    },
    /// An episode report does not carry one entry per member.
    #[error("episode report has {actual} entries, population has {expected}")]
    LengthMismatch {
        /// Population size.
        expected: usize,
        /// Number of results supplied.
        actual: usize,
    },
    /// An episode report carries a NaN or infinite score.
    #[error("agent {agent} reported a non-finite score {score}")]
    NonFiniteScore {
        /// Index of the offending result.
        agent: usize,
        /// The score as reported.
        score: f32,
    },
    /// A configuration field is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Reading or writing a snapshot or config file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A snapshot or config file is not valid JSON for the expected type.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, NeatError>;

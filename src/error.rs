//! Errors raised when constructing ops or calling an algorithm outside its
//! preconditions.
//!
//! Every failure is synchronous and local: nothing here is retried or
//! recovered from internally.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by op construction or a violated precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The op type is not one of `insert`, `retain` or `delete`.
    #[error("invalid op type `{0}`")]
    InvalidType(String),

    /// A wire record must carry exactly one of `insert`, `retain`, `delete`.
    #[error("op record must have exactly one of `insert`, `retain` or `delete`")]
    AmbiguousType,

    /// A retain or delete was given something other than a non-negative integer.
    #[error("{kind} requires a non-negative integer, got {value}")]
    InvalidLength { kind: &'static str, value: String },

    /// Attributes must be a flat map of scalar values.
    #[error("invalid attributes: {0}")]
    InvalidAttributes(String),

    /// An insert value must be text or a single-key embed object.
    #[error("invalid embed: {0}")]
    InvalidEmbed(String),

    /// Embeds are atomic; only the whole-unit slice `(0, 1)` is legal.
    #[error("cannot subdivide an embed insert (start {start}, len {len})")]
    EmbedSlice { start: usize, len: usize },

    /// The operation is only defined on insert-only deltas.
    #[error("{operation} is only defined on documents (insert-only deltas)")]
    NotDocument { operation: &'static str },
}

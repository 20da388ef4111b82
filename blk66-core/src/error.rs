//! Error types for the blk66 helpers.
//!
//! The block encoders and the DIC step never fail: numeric input is masked.
//! Errors only arise at the edges, when parsing user input or reading a
//! block back into protocol fields.

use thiserror::Error;

/// The canonical error type for blk66.
#[derive(Debug, Error)]
pub enum Blk66Error {
    // ── Decoding Errors ──────────────────────────────────────────
    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    /// A block did not carry the discriminator bytes of the requested kind.
    #[error("block mismatch: {0}")]
    BlockMismatch(&'static str),

    // ── Input Errors ─────────────────────────────────────────────
    /// A string could not be parsed as a hex byte.
    #[error("invalid byte: {0:?}")]
    InvalidByte(String),

    /// A byte list had the wrong number of entries.
    #[error("invalid block length: expected {expected}, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },

    /// An animation speed multiplier was zero, negative or not finite.
    #[error("invalid speed multiplier: {0}")]
    InvalidSpeed(f64),

    /// A name did not match any known variant.
    #[error("unknown {type_name}: {value:?}")]
    UnknownName {
        type_name: &'static str,
        value: String,
    },

    // ── I/O Errors ───────────────────────────────────────────────
    /// The terminal or filesystem reported an error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

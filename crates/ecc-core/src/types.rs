//! Core types shared by every code in the crate
//!
//! Bits are carried as `u8` values that are either 0 or 1. Nothing here packs
//! bits into words: the inputs are short, interactively entered strings, and
//! the diagnostics handed to a presentation layer are per-bit anyway.
//!
//! ## Errors vs. classifications
//!
//! Channel errors are *data*. A corrected bit, an uncorrectable double error
//! or a flipped overall-parity bit all come back inside the decode result.
//! [`EccError`] is reserved for contract violations at construction
//! boundaries (a malformed generator, a wrong block length for the fixed
//! (7,4) code, and so on).

/// A single bit, always 0 or 1.
pub type Bit = u8;

/// An ordered sequence of bits.
pub type BitVector = Vec<Bit>;

/// Result type for coding operations
pub type EccResult<T> = Result<T, EccError>;

/// Errors raised when a code or configuration is constructed incorrectly
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EccError {
    #[error("Invalid register length v={0}. Must be at least 1")]
    InvalidRegisterLength(usize),

    #[error("Register length v={v} exceeds the maximum of {max}")]
    RegisterTooLong { v: usize, max: usize },

    #[error("Encoder needs at least one generator")]
    NoGenerators,

    #[error("Generator '{0}' has no taps")]
    EmptyGenerator(String),

    #[error("Generator '{id}' taps index {tap}, but the delay line only has {len} cells")]
    TapOutOfRange { id: String, tap: usize, len: usize },

    #[error("Invalid generator string '{0}': expected only '0' and '1'")]
    InvalidGeneratorString(String),

    #[error("Invalid data length {0}. Must be at least 1")]
    InvalidDataLength(usize),

    #[error("Block length mismatch: expected {expected}, got {actual}")]
    BlockLength { expected: usize, actual: usize },

    #[error("Trellis exhausted at step {step}: no state is reachable")]
    TrellisExhausted { step: usize },
}

/// XOR-reduce a run of bits.
#[inline]
pub(crate) fn parity(bits: &[Bit]) -> Bit {
    bits.iter().fold(0, |acc, &b| acc ^ (b & 1))
}

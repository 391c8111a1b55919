//! Bit String Utilities
//!
//! Glue between user-entered text and the coders:
//!
//! - [`sanitize`]: drop every character that is not '0' or '1'
//! - [`to_bits`]: sanitize, then turn the characters into bits
//! - [`pad`]: zero-pad a bit vector up to a block multiple
//!
//! None of these fail. Malformed text just sanitizes down to fewer bits.
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::bits::{pad, to_bits};
//!
//! let bits = to_bits("1 0-1x1 1");
//! assert_eq!(bits, vec![1, 0, 1, 1, 1]);
//!
//! let padded = pad(&bits, 4);
//! assert_eq!(padded.bits, vec![1, 0, 1, 1, 1, 0, 0, 0]);
//! assert_eq!(padded.pad, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Bit, BitVector};

/// A bit vector right-padded with zeros, plus how many zeros were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedBits {
    pub bits: BitVector,
    /// Number of synthetic zero bits appended
    pub pad: usize,
}

/// Strip every character that is not '0' or '1'.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| matches!(c, '0' | '1')).collect()
}

/// Parse text into bits, ignoring anything that is not '0' or '1'.
pub fn to_bits(text: &str) -> BitVector {
    text.chars()
        .filter_map(|c| match c {
            '0' => Some(0),
            '1' => Some(1),
            _ => None,
        })
        .collect()
}

/// Render bits as a string of '0'/'1' characters.
pub fn bits_to_string(bits: &[Bit]) -> String {
    bits.iter().map(|&b| if b & 1 == 1 { '1' } else { '0' }).collect()
}

/// Right-pad `bits` with zeros so the length is a multiple of `multiple`.
///
/// `multiple == 0` leaves the input unchanged with `pad = 0`.
pub fn pad(bits: &[Bit], multiple: usize) -> PaddedBits {
    if multiple == 0 {
        return PaddedBits {
            bits: bits.to_vec(),
            pad: 0,
        };
    }
    let pad = (multiple - bits.len() % multiple) % multiple;
    let mut padded = Vec::with_capacity(bits.len() + pad);
    padded.extend_from_slice(bits);
    padded.resize(bits.len() + pad, 0);
    PaddedBits { bits: padded, pad }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_noise() {
        assert_eq!(sanitize("10 2a01\n1"), "10011");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("abc"), "");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for text in ["", "0101", "1 1 0", "x9y0z1", "１0１"] {
            let once = sanitize(text);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_to_bits_and_back() {
        let bits = to_bits(" 1011-0 ");
        assert_eq!(bits, vec![1, 0, 1, 1, 0]);
        assert_eq!(bits_to_string(&bits), "10110");
    }

    #[test]
    fn test_pad_lengths() {
        let bits = vec![1u8; 5];
        for m in 1..=9usize {
            let padded = pad(&bits, m);
            assert_eq!(padded.bits.len() % m, 0, "multiple {}", m);
            assert_eq!(padded.pad, (m - bits.len() % m) % m);
            assert_eq!(&padded.bits[..5], &bits[..]);
            assert!(padded.bits[5..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_pad_exact_multiple() {
        let padded = pad(&[1, 0, 1, 1], 4);
        assert_eq!(padded.pad, 0);
        assert_eq!(padded.bits, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_pad_zero_multiple_is_noop() {
        let padded = pad(&[1, 0, 1], 0);
        assert_eq!(padded.bits, vec![1, 0, 1]);
        assert_eq!(padded.pad, 0);
    }
}

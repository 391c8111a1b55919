//! Textbook Hamming(7,4)
//!
//! A fixed-size specialization of [`crate::hamming`] written out with the
//! classic parity equations, for demos that want the (7,4) code exactly as it
//! appears in the literature:
//!
//! ```text
//! p1 = d1 ⊕ d2 ⊕ d4
//! p2 = d1 ⊕ d3 ⊕ d4
//! p4 = d2 ⊕ d3 ⊕ d4
//! word = p1 p2 d1 p4 d2 d3 d4
//! ```
//!
//! Unlike the parameterized engine, these entry points validate block sizes
//! and return [`EccError::BlockLength`] for anything that is not 4 data bits,
//! 7 code bits, or 8 SECDED bits. The SECDED result also has a smaller shape:
//! a status and a syndrome, without a separate parity-error flag.

use serde::{Deserialize, Serialize};

use crate::hamming::{HammingDecoded, SecdedStatus};
use crate::types::{parity, Bit, BitVector, EccError, EccResult};

pub const DATA_BITS: usize = 4;
pub const CODE_BITS: usize = 7;
pub const SECDED_BITS: usize = 8;

/// Parity-check rows as bitmasks over positions 1..=7 (bit i = position i+1).
const CHECK_MASKS: [(usize, u8); 3] = [(1, 0b101_0101), (2, 0b110_0110), (4, 0b111_1000)];

/// Result of a textbook SECDED decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hamming74SecdedDecoded {
    pub data_bits: BitVector,
    pub status: SecdedStatus,
    pub syndrome: usize,
}

fn check_len(bits: &[Bit], expected: usize) -> EccResult<()> {
    if bits.len() != expected {
        return Err(EccError::BlockLength {
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}

fn pack(word: &[Bit]) -> u8 {
    word.iter()
        .enumerate()
        .fold(0u8, |acc, (i, &b)| acc | ((b & 1) << i))
}

fn syndrome_of(word: &[Bit]) -> usize {
    let packed = pack(word);
    CHECK_MASKS
        .iter()
        .filter(|(_, mask)| (packed & mask).count_ones() % 2 == 1)
        .map(|(p, _)| p)
        .sum()
}

fn data_of(word: &[Bit]) -> BitVector {
    vec![word[2], word[4], word[5], word[6]]
}

/// Encode exactly 4 data bits into a 7-bit word.
pub fn hamming74_encode(data: &[Bit]) -> EccResult<BitVector> {
    check_len(data, DATA_BITS)?;
    let (d1, d2, d3, d4) = (data[0] & 1, data[1] & 1, data[2] & 1, data[3] & 1);
    let p1 = d1 ^ d2 ^ d4;
    let p2 = d1 ^ d3 ^ d4;
    let p4 = d2 ^ d3 ^ d4;
    Ok(vec![p1, p2, d1, p4, d2, d3, d4])
}

/// Decode a 7-bit word, correcting one flipped bit.
pub fn hamming74_decode(block: &[Bit]) -> EccResult<HammingDecoded> {
    check_len(block, CODE_BITS)?;
    let mut word: BitVector = block.iter().map(|&b| b & 1).collect();
    let syndrome = syndrome_of(&word);
    let corrected_index = if syndrome != 0 {
        word[syndrome - 1] ^= 1;
        Some(syndrome)
    } else {
        None
    };
    Ok(HammingDecoded {
        data_bits: data_of(&word),
        syndrome,
        corrected_index,
    })
}

/// Encode 4 data bits into an 8-bit SECDED word.
pub fn hamming74_secded_encode(data: &[Bit]) -> EccResult<BitVector> {
    let mut word = hamming74_encode(data)?;
    let overall = parity(&word);
    word.push(overall);
    Ok(word)
}

/// Decode an 8-bit SECDED word.
pub fn hamming74_secded_decode(block: &[Bit]) -> EccResult<Hamming74SecdedDecoded> {
    check_len(block, SECDED_BITS)?;
    let mut word: BitVector = block[..CODE_BITS].iter().map(|&b| b & 1).collect();
    let syndrome = syndrome_of(&word);
    let parity_error = parity(block) != 0;

    let status = match (syndrome, parity_error) {
        (0, false) => SecdedStatus::NoError,
        (0, true) => SecdedStatus::OverallParityError,
        (s, true) => {
            word[s - 1] ^= 1;
            SecdedStatus::Corrected { position: s }
        }
        (_, false) => SecdedStatus::DoubleError,
    };

    Ok(Hamming74SecdedDecoded {
        data_bits: data_of(&word),
        status,
        syndrome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamming::{hamming_decode, hamming_encode, secded_decode};

    fn nibble(v: u8) -> BitVector {
        (0..4).map(|i| (v >> (3 - i)) & 1).collect()
    }

    #[test]
    fn test_matches_parameterized_engine() {
        for v in 0..16u8 {
            let data = nibble(v);
            assert_eq!(hamming74_encode(&data).unwrap(), hamming_encode(&data));
        }
    }

    #[test]
    fn test_single_error_correction() {
        for v in 0..16u8 {
            let data = nibble(v);
            let word = hamming74_encode(&data).unwrap();
            for pos in 1..=CODE_BITS {
                let mut corrupted = word.clone();
                corrupted[pos - 1] ^= 1;
                let fixed = hamming74_decode(&corrupted).unwrap();
                assert_eq!(fixed.corrected_index, Some(pos));
                assert_eq!(fixed.data_bits, data);
                assert_eq!(fixed, hamming_decode(&corrupted));
            }
        }
    }

    #[test]
    fn test_secded_agrees_with_engine() {
        let data = vec![0, 1, 1, 0];
        let word = hamming74_secded_encode(&data).unwrap();
        for i in 0..SECDED_BITS {
            for j in i..SECDED_BITS {
                let mut corrupted = word.clone();
                corrupted[i] ^= 1;
                if j != i {
                    corrupted[j] ^= 1;
                }
                let fixed = hamming74_secded_decode(&corrupted).unwrap();
                let general = secded_decode(&corrupted);
                assert_eq!(fixed.status, general.status);
                assert_eq!(fixed.syndrome, general.syndrome);
                assert_eq!(fixed.data_bits, general.data_bits);
            }
        }
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        assert_eq!(
            hamming74_encode(&[1, 0, 1]),
            Err(EccError::BlockLength {
                expected: 4,
                actual: 3
            })
        );
        assert!(hamming74_decode(&[0; 8]).is_err());
        assert!(hamming74_secded_decode(&[0; 7]).is_err());
        assert!(hamming74_secded_encode(&[1; 5]).is_err());
    }
}

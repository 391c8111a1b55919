//! Hamming and SECDED Block Codes
//!
//! Parameterized Hamming single-error-correcting codes for any number of
//! data bits, plus the SECDED extension (one extra overall parity bit) that
//! also detects double errors.
//!
//! ## Layout
//!
//! Positions are 1-indexed. Parity bits sit at the powers of two, data bits
//! fill every other position in ascending order. With 4 data bits:
//!
//! ```text
//! position: 1  2  3  4  5  6  7
//! role:     p1 p2 d0 p4 d1 d2 d3
//! ```
//!
//! Parity bit `p` covers every position `q` with `q & p != 0`, so the
//! positions whose parity checks fail sum to the index of a single flipped
//! bit (the *syndrome*).
//!
//! ## SECDED classification
//!
//! | syndrome | overall parity | meaning                                 |
//! |----------|----------------|-----------------------------------------|
//! | 0        | ok             | no error                                |
//! | 0        | wrong          | only the appended parity bit flipped    |
//! | ≠ 0      | wrong          | single error at `syndrome`, corrected   |
//! | ≠ 0      | ok             | double error, detected, not corrected   |
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::hamming::{hamming_decode, hamming_encode};
//!
//! let mut code = hamming_encode(&[1, 0, 1, 1]);
//! code[4] ^= 1; // flip position 5
//!
//! let decoded = hamming_decode(&code);
//! assert_eq!(decoded.corrected_index, Some(5));
//! assert_eq!(decoded.data_bits, vec![1, 0, 1, 1]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{parity, Bit, BitVector};

/// Smallest `r` with `2^r >= data_length + r + 1`.
pub fn parity_count(data_length: usize) -> usize {
    let mut r = 0usize;
    while (1usize << r) < data_length + r + 1 {
        r += 1;
    }
    r
}

/// 1-indexed parity positions (powers of two) up to `total_length`.
pub fn parity_positions(total_length: usize) -> Vec<usize> {
    (1..=total_length).filter(|p| p.is_power_of_two()).collect()
}

/// 1-indexed data positions (everything that is not a power of two).
pub fn data_positions(total_length: usize) -> Vec<usize> {
    (1..=total_length).filter(|p| !p.is_power_of_two()).collect()
}

/// Position layout of a Hamming code word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HammingLayout {
    pub data_length: usize,
    pub parity_count: usize,
    pub total_length: usize,
    pub parity_positions: Vec<usize>,
    pub data_positions: Vec<usize>,
}

impl HammingLayout {
    /// Build the layout carrying `data_length` data bits.
    pub fn new(data_length: usize) -> Self {
        Self::for_code_length(data_length + parity_count(data_length))
    }

    /// Build the layout for a received word of `total_length` bits.
    pub fn for_code_length(total_length: usize) -> Self {
        let parity_positions = parity_positions(total_length);
        let data_positions = data_positions(total_length);
        Self {
            data_length: data_positions.len(),
            parity_count: parity_positions.len(),
            total_length,
            parity_positions,
            data_positions,
        }
    }

    /// Place data bits into a zeroed code word. Missing trailing bits are 0.
    fn place_data(&self, data: &[Bit]) -> BitVector {
        let mut code = vec![0u8; self.total_length];
        for (i, &pos) in self.data_positions.iter().enumerate() {
            code[pos - 1] = data.get(i).copied().unwrap_or(0) & 1;
        }
        code
    }

    fn extract_data(&self, code: &[Bit]) -> BitVector {
        self.data_positions
            .iter()
            .map(|&pos| code.get(pos - 1).copied().unwrap_or(0))
            .collect()
    }

    /// Sum of the parity positions whose group (including the parity bit
    /// itself) has odd weight.
    pub fn syndrome(&self, code: &[Bit]) -> usize {
        self.parity_positions
            .iter()
            .filter(|&&p| {
                let group_parity = (1..=self.total_length)
                    .filter(|q| q & p != 0)
                    .fold(0u8, |acc, q| acc ^ code.get(q - 1).copied().unwrap_or(0));
                group_parity != 0
            })
            .sum()
    }

    /// Encode data bits into a code word of `total_length` bits.
    pub fn encode(&self, data: &[Bit]) -> BitVector {
        let mut code = self.place_data(data);
        // Parity positions are still zero here, so each group only sees data bits.
        for &p in &self.parity_positions {
            let group_parity = (1..=self.total_length)
                .filter(|&q| q & p != 0 && q != p)
                .fold(0u8, |acc, q| acc ^ code[q - 1]);
            code[p - 1] = group_parity;
        }
        code
    }

    /// Decode a code word, correcting a single flipped bit.
    pub fn decode(&self, block: &[Bit]) -> HammingDecoded {
        let mut code: BitVector = (0..self.total_length)
            .map(|i| block.get(i).copied().unwrap_or(0) & 1)
            .collect();
        let syndrome = self.syndrome(&code);

        let corrected_index = if syndrome > 0 && syndrome <= self.total_length {
            code[syndrome - 1] ^= 1;
            debug!(position = syndrome, "hamming: corrected single-bit error");
            Some(syndrome)
        } else {
            None
        };

        HammingDecoded {
            data_bits: self.extract_data(&code),
            syndrome,
            corrected_index,
        }
    }

    /// Encode and append an overall parity bit (SECDED).
    pub fn secded_encode(&self, data: &[Bit]) -> BitVector {
        let mut code = self.encode(data);
        let overall = parity(&code);
        code.push(overall);
        code
    }

    /// Decode a SECDED block of `total_length + 1` bits.
    ///
    /// The last bit is the overall parity, everything before it is the core
    /// Hamming word.
    pub fn secded_decode(&self, block: &[Bit]) -> SecdedDecoded {
        let mut core: BitVector = (0..self.total_length)
            .map(|i| block.get(i).copied().unwrap_or(0) & 1)
            .collect();
        let overall_bit = block.get(self.total_length).copied().unwrap_or(0) & 1;

        let syndrome = self.syndrome(&core);
        let parity_error = parity(&core) ^ overall_bit != 0;

        let status = match (syndrome, parity_error) {
            (0, false) => SecdedStatus::NoError,
            (0, true) => SecdedStatus::OverallParityError,
            (s, true) => {
                // Out-of-range positions are reported but leave the core as is.
                if let Some(bit) = core.get_mut(s - 1) {
                    *bit ^= 1;
                }
                SecdedStatus::Corrected { position: s }
            }
            (_, false) => SecdedStatus::DoubleError,
        };
        debug!(syndrome, parity_error, status = ?status, "secded: classified block");

        SecdedDecoded {
            data_bits: self.extract_data(&core),
            status,
            syndrome,
            parity_error,
        }
    }
}

/// Result of a Hamming decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HammingDecoded {
    pub data_bits: BitVector,
    pub syndrome: usize,
    /// 1-indexed position that was flipped back, if any
    pub corrected_index: Option<usize>,
}

/// Outcome of a SECDED decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecdedStatus {
    NoError,
    /// Only the appended overall parity bit is wrong; the data is intact
    OverallParityError,
    /// One bit of the core word was wrong and has been flipped back
    Corrected { position: usize },
    /// Two bits are wrong. Detected, not correctable, data not trusted
    DoubleError,
}

/// Display severity of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl SecdedStatus {
    pub fn severity(&self) -> Severity {
        match self {
            SecdedStatus::NoError | SecdedStatus::Corrected { .. } => Severity::Ok,
            SecdedStatus::OverallParityError => Severity::Warning,
            SecdedStatus::DoubleError => Severity::Error,
        }
    }

    /// True if the returned data bits can be trusted.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SecdedStatus::DoubleError)
    }
}

impl std::fmt::Display for SecdedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecdedStatus::NoError => write!(f, "no error detected"),
            SecdedStatus::OverallParityError => write!(f, "overall parity bit in error"),
            SecdedStatus::Corrected { position } => {
                write!(f, "single-bit error corrected at position {}", position)
            }
            SecdedStatus::DoubleError => write!(f, "double-bit error detected (uncorrectable)"),
        }
    }
}

/// Result of a SECDED decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecdedDecoded {
    pub data_bits: BitVector,
    pub status: SecdedStatus,
    pub syndrome: usize,
    pub parity_error: bool,
}

/// Hamming-encode `data`, sizing the code from its length.
pub fn hamming_encode(data: &[Bit]) -> BitVector {
    HammingLayout::new(data.len()).encode(data)
}

/// Decode a Hamming word, sizing the layout from the block length.
pub fn hamming_decode(block: &[Bit]) -> HammingDecoded {
    HammingLayout::for_code_length(block.len()).decode(block)
}

/// SECDED-encode `data`, sizing the code from its length.
pub fn secded_encode(data: &[Bit]) -> BitVector {
    HammingLayout::new(data.len()).secded_encode(data)
}

/// Decode a SECDED block, sizing the layout from `block.len() - 1`.
pub fn secded_decode(block: &[Bit]) -> SecdedDecoded {
    HammingLayout::for_code_length(block.len().saturating_sub(1)).secded_decode(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(len: usize) -> BitVector {
        (0..len).map(|i| ((i * 7 + 3) % 5 % 2) as u8).collect()
    }

    #[test]
    fn test_layout_7_4() {
        let layout = HammingLayout::new(4);
        assert_eq!(layout.parity_count, 3);
        assert_eq!(layout.total_length, 7);
        assert_eq!(layout.parity_positions, vec![1, 2, 4]);
        assert_eq!(layout.data_positions, vec![3, 5, 6, 7]);
    }

    #[test]
    fn test_layout_invariants() {
        for k in 1..=26usize {
            let layout = HammingLayout::new(k);
            assert_eq!(layout.total_length - layout.parity_count, k);
            assert_eq!(layout.data_length, k);
            assert!(1usize << layout.parity_count >= k + layout.parity_count + 1);
            if layout.parity_count > 0 {
                let r = layout.parity_count - 1;
                assert!((1usize << r) < k + r + 1, "r not minimal for k={}", k);
            }
            for &p in &layout.parity_positions {
                assert!(p.is_power_of_two() && p <= layout.total_length);
            }
            assert_eq!(layout.parity_positions.len(), layout.parity_count);
        }
    }

    #[test]
    fn test_parity_count_known_values() {
        assert_eq!(parity_count(1), 2);
        assert_eq!(parity_count(4), 3);
        assert_eq!(parity_count(11), 4);
        assert_eq!(parity_count(26), 5);
        assert_eq!(parity_count(57), 6);
    }

    #[test]
    fn test_encode_textbook_vector() {
        // d = 1011 → p1 = d0^d1^d3 = 0, p2 = d0^d2^d3 = 1, p4 = d1^d2^d3 = 0
        assert_eq!(hamming_encode(&[1, 0, 1, 1]), vec![0, 1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_roundtrip_clean() {
        for k in 1..=26usize {
            let data = sample_data(k);
            let decoded = hamming_decode(&hamming_encode(&data));
            assert_eq!(decoded.data_bits, data);
            assert_eq!(decoded.syndrome, 0);
            assert_eq!(decoded.corrected_index, None);
        }
    }

    #[test]
    fn test_single_error_scenario() {
        let mut code = hamming_encode(&[1, 0, 1, 1]);
        code[4] ^= 1;
        let decoded = hamming_decode(&code);
        assert_eq!(decoded.syndrome, 5);
        assert_eq!(decoded.corrected_index, Some(5));
        assert_eq!(decoded.data_bits, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_corrects_every_single_flip() {
        for k in 1..=26usize {
            let data = sample_data(k);
            let code = hamming_encode(&data);
            for pos in 1..=code.len() {
                let mut corrupted = code.clone();
                corrupted[pos - 1] ^= 1;
                let decoded = hamming_decode(&corrupted);
                assert_eq!(decoded.corrected_index, Some(pos), "k={} pos={}", k, pos);
                assert_eq!(decoded.data_bits, data, "k={} pos={}", k, pos);
            }
        }
    }

    #[test]
    fn test_layout_encode_pads_missing_data() {
        let layout = HammingLayout::new(4);
        assert_eq!(layout.encode(&[1, 0]), layout.encode(&[1, 0, 0, 0]));
    }

    #[test]
    fn test_secded_roundtrip_clean() {
        let data = vec![1, 0, 1, 1];
        let block = secded_encode(&data);
        assert_eq!(block.len(), 8);
        assert_eq!(parity(&block), 0);

        let decoded = secded_decode(&block);
        assert_eq!(decoded.status, SecdedStatus::NoError);
        assert_eq!(decoded.syndrome, 0);
        assert!(!decoded.parity_error);
        assert_eq!(decoded.data_bits, data);
    }

    #[test]
    fn test_secded_corrects_all_single_flips() {
        for k in [1usize, 4, 8, 11, 16] {
            let data = sample_data(k);
            let block = secded_encode(&data);
            let core_len = block.len() - 1;
            for i in 0..block.len() {
                let mut corrupted = block.clone();
                corrupted[i] ^= 1;
                let decoded = secded_decode(&corrupted);
                if i == core_len {
                    assert_eq!(decoded.status, SecdedStatus::OverallParityError);
                } else {
                    assert_eq!(decoded.status, SecdedStatus::Corrected { position: i + 1 });
                }
                assert!(decoded.parity_error);
                assert_eq!(decoded.data_bits, data, "k={} flip={}", k, i);
            }
        }
    }

    #[test]
    fn test_secded_detects_all_double_flips() {
        for k in [1usize, 4, 8, 11, 16] {
            let block = secded_encode(&sample_data(k));
            for i in 0..block.len() {
                for j in (i + 1)..block.len() {
                    let mut corrupted = block.clone();
                    corrupted[i] ^= 1;
                    corrupted[j] ^= 1;
                    let decoded = secded_decode(&corrupted);
                    assert_eq!(
                        decoded.status,
                        SecdedStatus::DoubleError,
                        "k={} flips=({}, {})",
                        k,
                        i,
                        j
                    );
                    assert!(!decoded.parity_error);
                    assert!(!decoded.status.is_recoverable());
                }
            }
        }
    }

    #[test]
    fn test_secded_double_error_leaves_core_untouched() {
        let data = vec![1, 1, 0, 1];
        let mut block = secded_encode(&data);
        block[2] ^= 1; // data position 3
        block[5] ^= 1; // data position 6
        let decoded = secded_decode(&block);
        assert_eq!(decoded.status, SecdedStatus::DoubleError);
        assert_eq!(decoded.data_bits, vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_secded_syndrome_past_core() {
        // Three parity flips in a (5,2) core sum to syndrome 7.
        let mut block = secded_encode(&[1, 0]);
        assert_eq!(block.len(), 6);
        block[0] ^= 1;
        block[1] ^= 1;
        block[3] ^= 1;
        let decoded = secded_decode(&block);
        assert_eq!(decoded.syndrome, 7);
        assert!(decoded.parity_error);
        assert_eq!(decoded.status, SecdedStatus::Corrected { position: 7 });
        assert_eq!(decoded.data_bits, vec![1, 0]);
    }

    #[test]
    fn test_status_severity() {
        assert_eq!(SecdedStatus::NoError.severity(), Severity::Ok);
        assert_eq!(SecdedStatus::Corrected { position: 3 }.severity(), Severity::Ok);
        assert_eq!(SecdedStatus::OverallParityError.severity(), Severity::Warning);
        assert_eq!(SecdedStatus::DoubleError.severity(), Severity::Error);
        assert!(format!("{}", SecdedStatus::Corrected { position: 3 }).contains("position 3"));
    }

    #[test]
    fn test_decode_short_block_defaults_to_zero() {
        let layout = HammingLayout::new(4);
        let decoded = layout.decode(&[]);
        assert_eq!(decoded.data_bits, vec![0, 0, 0, 0]);
        assert_eq!(decoded.corrected_index, None);
    }

    #[test]
    fn test_result_serializes() {
        let decoded = secded_decode(&secded_encode(&[1, 0, 1, 1]));
        let json = serde_json::to_string(&decoded).unwrap();
        assert!(json.contains("\"kind\":\"no_error\""));
    }
}

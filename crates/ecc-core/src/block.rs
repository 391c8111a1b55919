//! Block Code Framing
//!
//! A trait over the block codes in this crate plus a framer that chops an
//! arbitrary message into code-sized blocks, zero-padding the last one.
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::block::{BlockFramer, SecdedCode};
//!
//! let framer = BlockFramer::new(Box::new(SecdedCode::new(4)));
//! let framed = framer.encode_text("1011 01");
//! assert_eq!(framed.pad, 2);
//! assert_eq!(framed.codewords.len(), 2);
//!
//! let mut stream = framed.flatten();
//! stream[3] ^= 1;
//! let decoded = framer.decode(&stream, framed.pad);
//! assert_eq!(decoded.data_bits, vec![1, 0, 1, 1, 0, 1]);
//! assert_eq!(decoded.corrected_blocks(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits::{pad, to_bits};
use crate::hamming::{HammingDecoded, HammingLayout, SecdedDecoded, SecdedStatus};
use crate::types::{Bit, BitVector};

/// Common interface of a fixed-size block code.
pub trait BlockCode: Send + Sync {
    /// Code name, e.g. "Hamming(7,4)".
    fn name(&self) -> String;
    /// Data bits per block.
    fn data_length(&self) -> usize;
    /// Transmitted bits per block.
    fn code_length(&self) -> usize;
    /// Encode one block of data bits.
    fn encode_block(&self, data: &[Bit]) -> BitVector;
    /// Decode one received block.
    fn decode_block(&self, block: &[Bit]) -> BlockDecoded;

    /// Code rate k/n.
    fn rate(&self) -> f64 {
        if self.code_length() == 0 {
            return 0.0;
        }
        self.data_length() as f64 / self.code_length() as f64
    }
}

/// Per-block decode diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum BlockDecoded {
    Hamming(HammingDecoded),
    Secded(SecdedDecoded),
}

impl BlockDecoded {
    pub fn data_bits(&self) -> &[Bit] {
        match self {
            BlockDecoded::Hamming(d) => &d.data_bits,
            BlockDecoded::Secded(d) => &d.data_bits,
        }
    }

    pub fn syndrome(&self) -> usize {
        match self {
            BlockDecoded::Hamming(d) => d.syndrome,
            BlockDecoded::Secded(d) => d.syndrome,
        }
    }

    /// 1-indexed position corrected in this block, if any.
    pub fn corrected_index(&self) -> Option<usize> {
        match self {
            BlockDecoded::Hamming(d) => d.corrected_index,
            BlockDecoded::Secded(d) => match d.status {
                SecdedStatus::Corrected { position } => Some(position),
                _ => None,
            },
        }
    }

    /// False only for a SECDED block flagged as a double error.
    pub fn is_trusted(&self) -> bool {
        match self {
            BlockDecoded::Hamming(_) => true,
            BlockDecoded::Secded(d) => d.status.is_recoverable(),
        }
    }
}

/// Parameterized Hamming code as a [`BlockCode`].
#[derive(Debug, Clone)]
pub struct HammingCode {
    layout: HammingLayout,
}

impl HammingCode {
    pub fn new(data_length: usize) -> Self {
        Self {
            layout: HammingLayout::new(data_length),
        }
    }

    pub fn layout(&self) -> &HammingLayout {
        &self.layout
    }
}

impl BlockCode for HammingCode {
    fn name(&self) -> String {
        format!("Hamming({},{})", self.layout.total_length, self.layout.data_length)
    }

    fn data_length(&self) -> usize {
        self.layout.data_length
    }

    fn code_length(&self) -> usize {
        self.layout.total_length
    }

    fn encode_block(&self, data: &[Bit]) -> BitVector {
        self.layout.encode(data)
    }

    fn decode_block(&self, block: &[Bit]) -> BlockDecoded {
        BlockDecoded::Hamming(self.layout.decode(block))
    }
}

/// Hamming code extended with an overall parity bit.
#[derive(Debug, Clone)]
pub struct SecdedCode {
    layout: HammingLayout,
}

impl SecdedCode {
    pub fn new(data_length: usize) -> Self {
        Self {
            layout: HammingLayout::new(data_length),
        }
    }

    pub fn layout(&self) -> &HammingLayout {
        &self.layout
    }
}

impl BlockCode for SecdedCode {
    fn name(&self) -> String {
        format!(
            "SECDED({},{})",
            self.layout.total_length + 1,
            self.layout.data_length
        )
    }

    fn data_length(&self) -> usize {
        self.layout.data_length
    }

    fn code_length(&self) -> usize {
        self.layout.total_length + 1
    }

    fn encode_block(&self, data: &[Bit]) -> BitVector {
        self.layout.secded_encode(data)
    }

    fn decode_block(&self, block: &[Bit]) -> BlockDecoded {
        BlockDecoded::Secded(self.layout.secded_decode(block))
    }
}

/// Encoded message: one code word per block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramedEncoding {
    pub codewords: Vec<BitVector>,
    /// Zero bits appended to fill the last block
    pub pad: usize,
}

impl FramedEncoding {
    /// Concatenate the code words into one transmit stream.
    pub fn flatten(&self) -> BitVector {
        self.codewords.concat()
    }
}

/// Decoded message with per-block diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramedDecoding {
    pub blocks: Vec<BlockDecoded>,
    /// Recovered data with the padding removed
    pub data_bits: BitVector,
    /// Received bits past the last whole block, not decoded
    pub ignored_bits: usize,
}

impl FramedDecoding {
    pub fn corrected_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.corrected_index().is_some())
            .count()
    }

    pub fn untrusted_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_trusted()).count()
    }
}

/// Splits messages into blocks for a [`BlockCode`].
pub struct BlockFramer {
    code: Box<dyn BlockCode>,
}

impl BlockFramer {
    pub fn new(code: Box<dyn BlockCode>) -> Self {
        Self { code }
    }

    /// Get a reference to the underlying code.
    pub fn code(&self) -> &dyn BlockCode {
        &*self.code
    }

    /// Sanitize `text` and encode it.
    pub fn encode_text(&self, text: &str) -> FramedEncoding {
        self.encode(&to_bits(text))
    }

    /// Pad `data` to a whole number of blocks and encode each block.
    pub fn encode(&self, data: &[Bit]) -> FramedEncoding {
        let k = self.code.data_length();
        if k == 0 {
            return FramedEncoding {
                codewords: Vec::new(),
                pad: 0,
            };
        }
        let padded = pad(data, k);
        let codewords = padded
            .bits
            .chunks(k)
            .map(|chunk| self.code.encode_block(chunk))
            .collect();
        FramedEncoding {
            codewords,
            pad: padded.pad,
        }
    }

    /// Decode a received stream, dropping `pad` trailing data bits.
    ///
    /// A trailing partial block is ignored and counted in `ignored_bits`.
    pub fn decode(&self, received: &[Bit], pad: usize) -> FramedDecoding {
        let n = self.code.code_length();
        if n == 0 {
            return FramedDecoding {
                blocks: Vec::new(),
                data_bits: Vec::new(),
                ignored_bits: received.len(),
            };
        }

        let blocks: Vec<BlockDecoded> = received
            .chunks_exact(n)
            .map(|block| self.code.decode_block(block))
            .collect();
        let ignored_bits = received.len() % n;

        let mut data_bits: BitVector = blocks
            .iter()
            .flat_map(|b| b.data_bits().iter().copied())
            .collect();
        data_bits.truncate(data_bits.len().saturating_sub(pad));

        debug!(
            code = %self.code.name(),
            blocks = blocks.len(),
            ignored_bits,
            "block framer: decoded message"
        );

        FramedDecoding {
            blocks,
            data_bits,
            ignored_bits,
        }
    }
}

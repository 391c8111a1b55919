//! # Error-Control Coding Core
//!
//! Classic error-control codes over bit vectors, built for inspection as much
//! as for throughput: every decoder reports what it found (syndromes, the
//! corrected position, the full Viterbi lattice), not just the decoded bits.
//!
//! ## Overview
//!
//! - **Bits**: sanitize text into `0`/`1` strings, pad to block multiples
//! - **Hamming**: parameterized single-error-correcting codes for any data length
//! - **SECDED**: Hamming plus an overall parity bit, with four-way classification
//! - **Convolutional**: rate-1/n encoder with a per-step simulation trace
//! - **Trellis**: the encoder's state-transition graph
//! - **Viterbi**: hard-decision maximum-likelihood decoding with traceback
//!
//! ## Signal Flow
//!
//! ```text
//! Block:         Text → Sanitize → Pad → Hamming/SECDED Encode → Channel → Decode → Data
//! Convolutional: Bits → Encoder (+ v flush zeros) → Channel → Viterbi → Bits
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::prelude::*;
//!
//! // Hamming(7,4): flip position 5 and let the decoder find it
//! let mut block = hamming_encode(&[1, 0, 1, 1]);
//! block[4] ^= 1;
//! let decoded = hamming_decode(&block);
//! assert_eq!(decoded.corrected_index, Some(5));
//! assert_eq!(decoded.data_bits, vec![1, 0, 1, 1]);
//!
//! // Rate-1/2, K=3 convolutional code through the Viterbi decoder
//! let config = EncoderConfig::textbook_k3();
//! let mut received = ConvolutionalEncoder::new(config.clone()).encode(&[1, 0, 1, 1]);
//! received[3] ^= 1;
//! let result = run_viterbi(&received, &config).unwrap();
//! assert_eq!(result.decoded_bits, vec![1, 0, 1, 1]);
//! ```

pub mod bits;
pub mod block;
pub mod config;
pub mod convolutional;
pub mod hamming;
pub mod hamming74;
pub mod locale;
pub mod logging;
pub mod trellis;
pub mod types;
pub mod viterbi;

pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bits::{pad, sanitize, to_bits, PaddedBits};
    pub use crate::block::{BlockCode, BlockDecoded, BlockFramer, HammingCode, SecdedCode};
    pub use crate::config::{ConfigError, EccConfig};
    pub use crate::convolutional::{
        simulate_encoding, ConvolutionalEncoder, EncoderConfig, Generator, SimulationStep,
    };
    pub use crate::hamming::{
        hamming_decode, hamming_encode, secded_decode, secded_encode, HammingLayout,
        SecdedStatus,
    };
    pub use crate::locale::{status_message, Locale};
    pub use crate::trellis::Trellis;
    pub use crate::types::{Bit, BitVector, EccError, EccResult};
    pub use crate::viterbi::{run_viterbi, PathMetric, ViterbiDecoder, ViterbiResult};
}

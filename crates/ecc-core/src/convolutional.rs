//! Convolutional Encoder
//!
//! Rate-1/n convolutional encoding with a shift register of `v` cells and
//! one generator per output bit. A generator is a set of *taps*: indices
//! into the delay line `[current bit, r0, r1, ..., r(v-1)]`, where `r0` holds
//! the most recent past input. Each output bit is the XOR of the tapped
//! cells.
//!
//! ```text
//!  input ──┬──► [r0] ──► [r1]          v = 2
//!          │      │        │
//!   tap 0 ─┘ tap 1┘  tap 2 ┘
//!
//!  g0 = {0,1,2} → out0 = u ⊕ r0 ⊕ r1
//!  g1 = {0,2}   → out1 = u ⊕ r1
//! ```
//!
//! Every encoding is followed by `v` zero *flush* bits, which drive the
//! register back to the all-zero state so the trellis terminates there.
//!
//! ## Standard Codes
//!
//! - **Textbook K=3, Rate 1/2**: taps "111"/"101" (octal 7, 5)
//! - **GSM K=5, Rate 1/2**: taps "10011"/"11011" (octal 23, 33)
//! - **NASA K=7, Rate 1/2**: taps "1111001"/"1011011" (octal 171, 133)
//!
//! The binary strings are read left to right as tap 0 (current bit) to tap v.
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::convolutional::{ConvolutionalEncoder, EncoderConfig};
//!
//! let encoder = ConvolutionalEncoder::new(EncoderConfig::textbook_k3());
//! let encoded = encoder.encode(&[1, 0, 1, 1]);
//! // 4 data bits + 2 flush bits, 2 output bits each
//! assert_eq!(encoded.len(), 12);
//! assert_eq!(&encoded[..4], &[1, 1, 1, 0]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::types::{Bit, BitVector, EccError, EccResult};

/// Longest register `EncoderConfig::new` accepts (2^16 trellis states).
pub const MAX_REGISTER_LENGTH: usize = 16;

/// XOR of the delay-line cells `[input_bit, registers...]` selected by `taps`.
///
/// Taps that fall past the end of the delay line contribute nothing.
pub fn calculate_output(input_bit: Bit, registers: &[Bit], taps: &[usize]) -> Bit {
    taps.iter().fold(0, |acc, &tap| {
        let cell = match tap {
            0 => Some(input_bit),
            i => registers.get(i - 1).copied(),
        };
        acc ^ (cell.unwrap_or(0) & 1)
    })
}

/// Integer state of a register, MSB-first (`registers[0]` is the MSB).
pub fn registers_to_state(registers: &[Bit]) -> usize {
    registers
        .iter()
        .fold(0usize, |acc, &b| (acc << 1) | (b & 1) as usize)
}

/// One generator: the delay-line taps XORed into one output bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub id: String,
    pub taps: Vec<usize>,
}

impl Generator {
    pub fn new(id: impl Into<String>, taps: Vec<usize>) -> Self {
        Self {
            id: id.into(),
            taps,
        }
    }

    /// Parse a tap string such as "101": character i set means tap i.
    pub fn from_binary(id: impl Into<String>, binary: &str) -> EccResult<Self> {
        let binary = binary.trim();
        if binary.is_empty() || binary.chars().any(|c| c != '0' && c != '1') {
            return Err(EccError::InvalidGeneratorString(binary.to_string()));
        }
        let taps: Vec<usize> = binary
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == '1')
            .map(|(i, _)| i)
            .collect();
        let id = id.into();
        if taps.is_empty() {
            return Err(EccError::EmptyGenerator(id));
        }
        Ok(Self { id, taps })
    }

    /// Render the taps as a `v + 1` character string, tap 0 first.
    pub fn binary_string(&self, v: usize) -> String {
        (0..=v)
            .map(|i| if self.taps.contains(&i) { '1' } else { '0' })
            .collect()
    }

    /// Output bit for the given input and register contents.
    pub fn output(&self, input_bit: Bit, registers: &[Bit]) -> Bit {
        calculate_output(input_bit, registers, &self.taps)
    }
}

/// Immutable rate-1/n encoder configuration.
///
/// `k` is always 1: one input bit per step. `n` is the generator count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderConfig {
    v: usize,
    generators: Vec<Generator>,
}

impl EncoderConfig {
    /// Validate and build a configuration.
    pub fn new(v: usize, generators: Vec<Generator>) -> EccResult<Self> {
        if v < 1 {
            return Err(EccError::InvalidRegisterLength(v));
        }
        if v > MAX_REGISTER_LENGTH {
            return Err(EccError::RegisterTooLong {
                v,
                max: MAX_REGISTER_LENGTH,
            });
        }
        if generators.is_empty() {
            return Err(EccError::NoGenerators);
        }
        for g in &generators {
            if g.taps.is_empty() {
                return Err(EccError::EmptyGenerator(g.id.clone()));
            }
            if let Some(&tap) = g.taps.iter().find(|&&t| t > v) {
                return Err(EccError::TapOutOfRange {
                    id: g.id.clone(),
                    tap,
                    len: v + 1,
                });
            }
        }
        Ok(Self { v, generators })
    }

    /// Build from binary tap strings, naming generators g0, g1, ...
    pub fn from_binary(v: usize, generators: &[&str]) -> EccResult<Self> {
        let generators = generators
            .iter()
            .enumerate()
            .map(|(i, s)| Generator::from_binary(format!("g{}", i), s))
            .collect::<EccResult<Vec<_>>>()?;
        Self::new(v, generators)
    }

    fn preset(v: usize, taps: &[&[usize]]) -> Self {
        Self {
            v,
            generators: taps
                .iter()
                .enumerate()
                .map(|(i, t)| Generator::new(format!("g{}", i), t.to_vec()))
                .collect(),
        }
    }

    /// Rate 1/2, v=2 code with taps {0,1,2} and {0,2} (octal 7, 5).
    pub fn textbook_k3() -> Self {
        Self::preset(2, &[&[0, 1, 2], &[0, 2]])
    }

    /// GSM rate 1/2, v=4 (octal 23, 33).
    pub fn gsm_k5() -> Self {
        Self::preset(4, &[&[0, 3, 4], &[0, 1, 3, 4]])
    }

    /// NASA/CCSDS rate 1/2, v=6 (octal 171, 133).
    pub fn nasa_k7() -> Self {
        Self::preset(6, &[&[0, 1, 2, 3, 6], &[0, 2, 3, 5, 6]])
    }

    /// Input bits per step (always 1).
    pub fn k(&self) -> usize {
        1
    }

    /// Output bits per step.
    pub fn n(&self) -> usize {
        self.generators.len()
    }

    /// Register length.
    pub fn v(&self) -> usize {
        self.v
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Number of trellis states (2^v).
    pub fn num_states(&self) -> usize {
        1 << self.v
    }

    /// Code rate as a fraction (1/n).
    pub fn rate(&self) -> f64 {
        1.0 / self.n() as f64
    }

    /// Output bits for one step, one per generator.
    pub fn outputs(&self, input_bit: Bit, registers: &[Bit]) -> BitVector {
        self.generators
            .iter()
            .map(|g| g.output(input_bit, registers))
            .collect()
    }
}

impl fmt::Display for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conv(k=1, n={}, v={}, generators={:?})",
            self.n(),
            self.v,
            self.generators
                .iter()
                .map(|g| g.binary_string(self.v))
                .collect::<Vec<_>>()
        )
    }
}

/// Trace of one encoder step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub step_index: usize,
    pub input_bit: Bit,
    pub register_state_before: BitVector,
    pub register_state_after: BitVector,
    pub encoded_bits: BitVector,
}

impl SimulationStep {
    /// Trellis state index before this step.
    pub fn state_before(&self) -> usize {
        registers_to_state(&self.register_state_before)
    }

    /// Trellis state index after this step.
    pub fn state_after(&self) -> usize {
        registers_to_state(&self.register_state_after)
    }

    /// True for the zero bits appended to terminate the trellis.
    pub fn is_flush(&self, data_len: usize) -> bool {
        self.step_index >= data_len
    }
}

/// Shift-register convolutional encoder.
#[derive(Debug, Clone)]
pub struct ConvolutionalEncoder {
    config: EncoderConfig,
}

impl ConvolutionalEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode `input` plus `v` flush bits, recording every step.
    pub fn simulate(&self, input: &[Bit]) -> Vec<SimulationStep> {
        let v = self.config.v;
        let mut registers: BitVector = vec![0; v];
        let mut steps = Vec::with_capacity(input.len() + v);

        let flushed = input.iter().map(|&b| b & 1).chain(std::iter::repeat(0).take(v));
        for (step_index, input_bit) in flushed.enumerate() {
            let encoded_bits = self.config.outputs(input_bit, &registers);

            let mut after = Vec::with_capacity(v);
            after.push(input_bit);
            after.extend_from_slice(&registers[..v - 1]);

            steps.push(SimulationStep {
                step_index,
                input_bit,
                register_state_before: std::mem::replace(&mut registers, after.clone()),
                register_state_after: after,
                encoded_bits,
            });
        }

        debug!(
            data_bits = input.len(),
            steps = steps.len(),
            "convolutional: encoded with flush"
        );
        steps
    }

    /// Encode `input` plus flush bits into one output stream.
    pub fn encode(&self, input: &[Bit]) -> BitVector {
        self.simulate(input)
            .into_iter()
            .flat_map(|step| step.encoded_bits)
            .collect()
    }
}

/// Encode `input` under `config`, returning the per-step trace.
pub fn simulate_encoding(input: &[Bit], config: &EncoderConfig) -> Vec<SimulationStep> {
    ConvolutionalEncoder::new(config.clone()).simulate(input)
}

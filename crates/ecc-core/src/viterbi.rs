//! Viterbi Decoder
//!
//! Hard-decision maximum-likelihood decoding over the trellis of a
//! rate-1/n convolutional code:
//! 1. Branch metric: Hamming distance between an edge's output and the
//!    received n-bit symbol
//! 2. Path metric update (add-compare-select), keeping every layer so the
//!    whole search can be displayed afterwards
//! 3. Termination at the best final state, preferring state 0 on a tie
//! 4. Traceback through the survivors, then removal of the `v` flush bits
//!
//! ## Tie-breaking
//!
//! Both choices are fixed so that results are reproducible bit for bit:
//!
//! - A destination keeps the first predecessor (in ascending source-state
//!   order) that achieves the smallest metric. Later equal candidates lose.
//! - If state 0 shares the minimum final metric it is chosen, since the
//!   encoder always flushes back to state 0.
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::convolutional::{ConvolutionalEncoder, EncoderConfig};
//! use ecc_core::viterbi::ViterbiDecoder;
//!
//! let config = EncoderConfig::textbook_k3();
//! let mut stream = ConvolutionalEncoder::new(config.clone()).encode(&[1, 0, 1, 1]);
//! stream[3] ^= 1;
//!
//! let result = ViterbiDecoder::new(config).decode(&stream).unwrap();
//! assert_eq!(result.decoded_bits, vec![1, 0, 1, 1]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::convolutional::EncoderConfig;
use crate::trellis::Trellis;
use crate::types::{Bit, BitVector, EccError, EccResult};

/// Accumulated path metric. `Unreachable` orders after every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMetric {
    Finite(u32),
    Unreachable,
}

impl PathMetric {
    pub fn is_reachable(&self) -> bool {
        matches!(self, PathMetric::Finite(_))
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            PathMetric::Finite(m) => Some(*m),
            PathMetric::Unreachable => None,
        }
    }
}

impl fmt::Display for PathMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMetric::Finite(m) => write!(f, "{}", m),
            PathMetric::Unreachable => write!(f, "∞"),
        }
    }
}

/// Metric and survivor of one state at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrellisNode {
    pub step: usize,
    pub state_index: usize,
    pub metric: PathMetric,
    pub survivor_prev_state: Option<usize>,
}

/// Complete decode output, including every layer for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViterbiResult {
    /// `layers[t][state]`, t = 0..=num_steps
    pub layers: Vec<Vec<TrellisNode>>,
    /// States visited from step 0 to the termination state
    pub survivor_path: Vec<usize>,
    /// Recovered input, flush bits removed
    pub decoded_bits: BitVector,
}

impl ViterbiResult {
    /// Number of trellis steps processed.
    pub fn num_steps(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    /// Path metric at the termination state: the number of received bits
    /// that disagree with the chosen code sequence.
    pub fn final_metric(&self) -> PathMetric {
        match (self.layers.last(), self.survivor_path.last()) {
            (Some(layer), Some(&state)) => layer[state].metric,
            _ => PathMetric::Unreachable,
        }
    }
}

/// Position-wise Hamming distance; the shorter side is padded with zeros.
pub fn hamming_distance(a: &[Bit], b: &[Bit]) -> u32 {
    let len = a.len().max(b.len());
    (0..len)
        .filter(|&i| a.get(i).copied().unwrap_or(0) != b.get(i).copied().unwrap_or(0))
        .count() as u32
}

/// State with the smallest final metric, forced to 0 when state 0 ties.
fn select_end_state(layer: &[TrellisNode]) -> usize {
    let mut best = PathMetric::Unreachable;
    let mut end_state = 0;
    for node in layer {
        if node.metric < best {
            best = node.metric;
            end_state = node.state_index;
        }
    }
    if layer.first().map(|n| n.metric) == Some(best) {
        end_state = 0;
    }
    end_state
}

/// Viterbi decoder for one encoder configuration.
///
/// The trellis is built once here and reused by every `decode` call.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    config: EncoderConfig,
    trellis: Trellis,
}

impl ViterbiDecoder {
    pub fn new(config: EncoderConfig) -> Self {
        let trellis = Trellis::build(&config);
        Self { config, trellis }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn trellis(&self) -> &Trellis {
        &self.trellis
    }

    /// Decode a received stream.
    ///
    /// `len / n` whole symbols are processed; trailing bits that do not
    /// fill a symbol are ignored.
    ///
    /// # Errors
    /// [`EccError::TrellisExhausted`] if a layer ends up with no reachable
    /// state. State 0 always reaches itself on input 0, so this signals a
    /// broken trellis rather than bad input.
    pub fn decode(&self, received: &[Bit]) -> EccResult<ViterbiResult> {
        let n = self.config.n();
        let v = self.config.v();
        let num_states = self.trellis.num_states();
        let num_steps = received.len() / n;

        let mut layers: Vec<Vec<TrellisNode>> = Vec::with_capacity(num_steps + 1);
        layers.push(
            (0..num_states)
                .map(|s| TrellisNode {
                    step: 0,
                    state_index: s,
                    metric: if s == 0 {
                        PathMetric::Finite(0)
                    } else {
                        PathMetric::Unreachable
                    },
                    survivor_prev_state: None,
                })
                .collect(),
        );

        for (t, symbol) in (1..=num_steps).zip(received.chunks_exact(n)) {
            let prev_layer = &layers[t - 1];
            let layer: Vec<TrellisNode> = (0..num_states)
                .map(|state| {
                    let mut metric = PathMetric::Unreachable;
                    let mut survivor = None;
                    for edge in self.trellis.edges_into(state) {
                        let PathMetric::Finite(prev) = prev_layer[edge.from_state].metric else {
                            continue;
                        };
                        let candidate =
                            PathMetric::Finite(prev + hamming_distance(&edge.output_bits, symbol));
                        if candidate < metric {
                            metric = candidate;
                            survivor = Some(edge.from_state);
                        }
                    }
                    TrellisNode {
                        step: t,
                        state_index: state,
                        metric,
                        survivor_prev_state: survivor,
                    }
                })
                .collect();

            let best = layer.iter().map(|node| node.metric).min();
            if !best.is_some_and(|m| m.is_reachable()) {
                return Err(EccError::TrellisExhausted { step: t });
            }
            trace!(step = t, best = ?best, "viterbi: layer complete");
            layers.push(layer);
        }

        let end_state = layers
            .last()
            .map(|layer| select_end_state(layer))
            .unwrap_or(0);

        let mut survivor_path = Vec::with_capacity(num_steps + 1);
        let mut decoded_bits = Vec::with_capacity(num_steps);
        survivor_path.push(end_state);
        let mut current = end_state;
        for t in (1..=num_steps).rev() {
            let prev = layers[t][current]
                .survivor_prev_state
                .ok_or(EccError::TrellisExhausted { step: t })?;
            let edge = self
                .trellis
                .edge_between(prev, current)
                .ok_or(EccError::TrellisExhausted { step: t })?;
            decoded_bits.push(edge.input_bit);
            survivor_path.push(prev);
            current = prev;
        }
        survivor_path.reverse();
        decoded_bits.reverse();
        decoded_bits.truncate(decoded_bits.len().saturating_sub(v));

        let result = ViterbiResult {
            layers,
            survivor_path,
            decoded_bits,
        };
        debug!(
            steps = num_steps,
            end_state,
            metric = %result.final_metric(),
            ignored_bits = received.len() % n,
            "viterbi: traceback complete"
        );
        Ok(result)
    }
}

/// Decode `received` under `config`, building the trellis on the fly.
pub fn run_viterbi(received: &[Bit], config: &EncoderConfig) -> EccResult<ViterbiResult> {
    ViterbiDecoder::new(config.clone()).decode(received)
}

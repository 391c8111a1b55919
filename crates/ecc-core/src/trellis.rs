//! Trellis Builder
//!
//! The state-transition graph of a rate-1/n convolutional encoder. A state
//! is the register contents read as an integer, MSB first, so `r0` (the most
//! recent input) is the top bit. Feeding bit `u` moves state `s` to
//!
//! ```text
//! next = (s >> 1) | (u << (v - 1))
//! ```
//!
//! which is the same shift the encoder performs. Each state has exactly two
//! outgoing edges, one per input bit.
//!
//! ## Example
//!
//! ```rust
//! use ecc_core::convolutional::EncoderConfig;
//! use ecc_core::trellis::Trellis;
//!
//! let trellis = Trellis::build(&EncoderConfig::textbook_k3());
//! assert_eq!(trellis.num_states(), 4);
//!
//! let edge = trellis.edge(2, 1);
//! assert_eq!(edge.to_state, 3);
//! assert_eq!(edge.output_bits, vec![0, 1]);
//! ```

use serde::{Deserialize, Serialize};

use crate::convolutional::EncoderConfig;
use crate::types::{Bit, BitVector};

/// MSB-first binary expansion of `num` over `length` bits.
pub fn num_to_bits(num: usize, length: usize) -> BitVector {
    (0..length)
        .rev()
        .map(|i| ((num >> i) & 1) as Bit)
        .collect()
}

/// One state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrellisEdge {
    pub from_state: usize,
    pub to_state: usize,
    pub output_bits: BitVector,
    pub input_bit: Bit,
}

/// Full transition table: `edges[state][input_bit]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trellis {
    v: usize,
    n: usize,
    edges: Vec<[TrellisEdge; 2]>,
    /// `(from_state, input_bit)` of every edge entering a state, ascending by source
    incoming: Vec<Vec<(usize, Bit)>>,
}

impl Trellis {
    /// Build the trellis for `config`.
    pub fn build(config: &EncoderConfig) -> Self {
        let v = config.v();
        let edges: Vec<[TrellisEdge; 2]> = (0..config.num_states())
            .map(|state| {
                let registers = num_to_bits(state, v);
                let edge = |input_bit: Bit| TrellisEdge {
                    from_state: state,
                    to_state: (state >> 1) | ((input_bit as usize) << (v - 1)),
                    output_bits: config.outputs(input_bit, &registers),
                    input_bit,
                };
                [edge(0), edge(1)]
            })
            .collect();

        let mut incoming = vec![Vec::with_capacity(2); edges.len()];
        for edge in edges.iter().flat_map(|pair| pair.iter()) {
            incoming[edge.to_state].push((edge.from_state, edge.input_bit));
        }

        Self {
            v,
            n: config.n(),
            edges,
            incoming,
        }
    }

    pub fn num_states(&self) -> usize {
        self.edges.len()
    }

    /// Register length.
    pub fn v(&self) -> usize {
        self.v
    }

    /// Output bits per edge.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Both edges leaving `state`, indexed by input bit.
    pub fn edges_from(&self, state: usize) -> &[TrellisEdge; 2] {
        &self.edges[state]
    }

    /// The edge leaving `state` on `input_bit`.
    pub fn edge(&self, state: usize, input_bit: Bit) -> &TrellisEdge {
        &self.edges[state][(input_bit & 1) as usize]
    }

    /// First edge from `from` to `to`, if the transition exists.
    pub fn edge_between(&self, from: usize, to: usize) -> Option<&TrellisEdge> {
        self.edges
            .get(from)?
            .iter()
            .find(|e| e.to_state == to)
    }

    /// Edges entering `state`, in ascending order of source state.
    pub fn edges_into(&self, state: usize) -> impl Iterator<Item = &TrellisEdge> + '_ {
        self.incoming[state]
            .iter()
            .map(move |&(from, input_bit)| self.edge(from, input_bit))
    }

    /// Iterate over every edge, state by state.
    pub fn iter(&self) -> impl Iterator<Item = &TrellisEdge> {
        self.edges.iter().flat_map(|pair| pair.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolutional::{registers_to_state, simulate_encoding};

    #[test]
    fn test_num_to_bits() {
        assert_eq!(num_to_bits(0b10, 2), vec![1, 0]);
        assert_eq!(num_to_bits(5, 4), vec![0, 1, 0, 1]);
        assert_eq!(num_to_bits(0, 0), Vec::<Bit>::new());
        for s in 0..64 {
            assert_eq!(registers_to_state(&num_to_bits(s, 6)), s);
        }
    }

    #[test]
    fn test_textbook_table() {
        let trellis = Trellis::build(&EncoderConfig::textbook_k3());
        let expected = [
            // (from, input, to, output)
            (0, 0, 0, [0, 0]),
            (0, 1, 2, [1, 1]),
            (1, 0, 0, [1, 1]),
            (1, 1, 2, [0, 0]),
            (2, 0, 1, [1, 0]),
            (2, 1, 3, [0, 1]),
            (3, 0, 1, [0, 1]),
            (3, 1, 3, [1, 0]),
        ];
        for (from, input, to, output) in expected {
            let edge = trellis.edge(from, input);
            assert_eq!(edge.from_state, from);
            assert_eq!(edge.input_bit, input);
            assert_eq!(edge.to_state, to, "edge {}/{}", from, input);
            assert_eq!(edge.output_bits, output.to_vec(), "edge {}/{}", from, input);
        }
    }

    #[test]
    fn test_two_edges_per_state() {
        let config = EncoderConfig::nasa_k7();
        let trellis = Trellis::build(&config);
        assert_eq!(trellis.num_states(), 64);
        assert_eq!(trellis.iter().count(), 128);
        for state in 0..trellis.num_states() {
            let [e0, e1] = trellis.edges_from(state);
            assert_eq!((e0.input_bit, e1.input_bit), (0, 1));
            assert_ne!(e0.to_state, e1.to_state);
            assert_eq!(e0.output_bits.len(), config.n());
        }
    }

    #[test]
    fn test_every_state_has_two_predecessors() {
        let trellis = Trellis::build(&EncoderConfig::gsm_k5());
        let mut incoming = vec![0usize; trellis.num_states()];
        for edge in trellis.iter() {
            incoming[edge.to_state] += 1;
        }
        assert!(incoming.iter().all(|&c| c == 2));
    }

    #[test]
    fn test_matches_encoder_trace() {
        let config = EncoderConfig::gsm_k5();
        let trellis = Trellis::build(&config);
        for step in simulate_encoding(&[1, 0, 0, 1, 1, 1, 0, 1], &config) {
            let edge = trellis.edge(step.state_before(), step.input_bit);
            assert_eq!(edge.to_state, step.state_after());
            assert_eq!(edge.output_bits, step.encoded_bits);
        }
    }

    #[test]
    fn test_edges_into_ascending() {
        let trellis = Trellis::build(&EncoderConfig::textbook_k3());
        let into_two: Vec<(usize, Bit)> = trellis
            .edges_into(2)
            .map(|e| (e.from_state, e.input_bit))
            .collect();
        assert_eq!(into_two, vec![(0, 1), (1, 1)]);
        for state in 0..trellis.num_states() {
            assert!(trellis.edges_into(state).all(|e| e.to_state == state));
        }
    }

    #[test]
    fn test_edge_between() {
        let trellis = Trellis::build(&EncoderConfig::textbook_k3());
        assert_eq!(trellis.edge_between(1, 2).map(|e| e.input_bit), Some(1));
        assert!(trellis.edge_between(0, 1).is_none());
        assert!(trellis.edge_between(9, 0).is_none());
    }
}

// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Phase Weight Matrix
// ─────────────────────────────────────────────────────────────────────
//! N×N symmetric Hebbian weights, flattened row-major, zero diagonal.
//!
//!   learn   W[i][j] = W[j][i] = min(W + η, W_max)   i ≠ j, both active
//!   recall  out_i   = Σ_j W[i][j]·p_j > θ
//!   decay   W[i][j] = max(W - δ, 0)                 W > 0
//!
//! Patterns are bit-vectors, bit i = unit i.

use serde::{Deserialize, Serialize};

use phin_types::MemoryConfig;

/// Bits of the first `n` units.
pub fn pattern_mask(n: usize) -> u16 {
    if n >= 16 {
        u16::MAX
    } else {
        (1u16 << n) - 1
    }
}

fn bit(pattern: u16, i: usize) -> bool {
    (pattern >> i) & 1 == 1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWeightMatrix {
    n: usize,
    w: Vec<i16>, // flattened N×N, row-major
}

impl PhaseWeightMatrix {
    /// `n` is clamped to `1..=MemoryConfig::MAX_UNITS`.
    pub fn new(n: usize) -> Self {
        let n = n.clamp(1, MemoryConfig::MAX_UNITS);
        Self {
            n,
            w: vec![0; n * n],
        }
    }

    pub fn units(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> i16 {
        if i < self.n && j < self.n {
            self.w[i * self.n + j]
        } else {
            0
        }
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.w
    }

    /// Rows as nested vectors, for reports.
    pub fn rows(&self) -> Vec<Vec<i16>> {
        self.w.chunks(self.n).map(<[i16]>::to_vec).collect()
    }

    /// Hebbian update for every co-active pair. Returns the number of
    /// weights that changed.
    pub fn learn(&mut self, pattern: u16, rate: i16, max: i16) -> usize {
        let n = self.n;
        let mut changed = 0;
        for i in 0..n {
            if !bit(pattern, i) {
                continue;
            }
            for j in (i + 1)..n {
                if !bit(pattern, j) {
                    continue;
                }
                let next = self.w[i * n + j].saturating_add(rate).min(max);
                if next != self.w[i * n + j] {
                    changed += 2;
                }
                self.w[i * n + j] = next;
                self.w[j * n + i] = next;
            }
        }
        changed
    }

    /// Per-unit accumulators Σ_j W[i][j]·p_j.
    pub fn accumulate(&self, pattern: u16) -> Vec<i32> {
        let n = self.n;
        (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| bit(pattern, j))
                    .map(|j| self.w[i * n + j] as i32)
                    .sum::<i32>()
            })
            .collect()
    }

    /// Units whose accumulator exceeds `threshold`.
    pub fn recall(&self, pattern: u16, threshold: i32) -> u16 {
        self.accumulate(pattern)
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a > threshold)
            .fold(0u16, |acc, (i, _)| acc | (1 << i))
    }

    /// Decrement every positive weight, flooring at zero.
    pub fn decay(&mut self, rate: i16) {
        for w in self.w.iter_mut().filter(|w| **w > 0) {
            *w = w.saturating_sub(rate).max(0);
        }
    }

    pub fn clear(&mut self) {
        self.w.iter_mut().for_each(|w| *w = 0);
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.n;
        (0..n).all(|i| {
            self.w[i * n + i] == 0 && (0..i).all(|j| self.w[i * n + j] == self.w[j * n + i])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // units 1, 3, 4 active
    const PATTERN: u16 = 0b01_1010;
    const CUE: u16 = 0b00_0010;

    #[test]
    fn test_mask() {
        assert_eq!(pattern_mask(6), 0b11_1111);
        assert_eq!(pattern_mask(16), u16::MAX);
    }

    #[test]
    fn test_learn_is_symmetric_with_zero_diagonal() {
        let mut m = PhaseWeightMatrix::new(6);
        assert_eq!(m.learn(PATTERN, 1, 15), 6);
        assert!(m.is_symmetric());
        assert_eq!(m.get(1, 3), 1);
        assert_eq!(m.get(4, 3), 1);
        assert_eq!(m.get(1, 1), 0);
        assert_eq!(m.get(0, 1), 0);
    }

    #[test]
    fn test_learn_saturates() {
        let mut m = PhaseWeightMatrix::new(6);
        for _ in 0..40 {
            m.learn(PATTERN, 1, 15);
        }
        assert_eq!(m.get(1, 4), 15);
        assert_eq!(m.learn(PATTERN, 1, 15), 0);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_recall_completes_pattern() {
        let mut m = PhaseWeightMatrix::new(6);
        for _ in 0..5 {
            m.learn(PATTERN, 1, 15);
        }
        assert_eq!(m.accumulate(CUE), vec![0, 0, 0, 5, 5, 0]);
        let out = m.recall(CUE, 2);
        assert_eq!(out, 0b01_1000);
        let matching = 6 - (out ^ PATTERN).count_ones();
        assert!(matching >= 4, "matching={matching}");
    }

    #[test]
    fn test_recall_below_threshold_is_empty() {
        let mut m = PhaseWeightMatrix::new(6);
        m.learn(PATTERN, 1, 15);
        assert_eq!(m.recall(CUE, 2), 0);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut m = PhaseWeightMatrix::new(6);
        m.learn(PATTERN, 2, 15);
        m.decay(1);
        assert_eq!(m.get(1, 3), 1);
        m.decay(5);
        assert_eq!(m.get(1, 3), 0);
        assert!(m.as_slice().iter().all(|&w| w == 0));
    }

    #[test]
    fn test_out_of_range_bits_ignored() {
        let mut m = PhaseWeightMatrix::new(3);
        m.learn(0b1111_0000, 1, 15);
        assert!(m.as_slice().iter().all(|&w| w == 0));
        assert_eq!(m.get(5, 5), 0);
    }

    #[test]
    fn test_rows_and_clear() {
        let mut m = PhaseWeightMatrix::new(4);
        m.learn(0b0011, 3, 15);
        assert_eq!(m.rows()[0], vec![0, 3, 0, 0]);
        m.clear();
        assert!(m.rows().iter().flatten().all(|&w| w == 0));
    }
}

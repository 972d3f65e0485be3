//! Transition-probability engine for the ant constructor.
//!
//! The probability of disconnecting node `i` combines the pheromone intensity
//! and the degree heuristic, each weighted by a control exponent:
//!
//! ```text
//! P(i) = (degree(i)^beta * pheromone(i)^alpha) / sum over non-tabu u
//! ```
//!
//! The powered terms depend only on the trail and the degrees, so they are
//! computed once per iteration and reused for every selection step of every
//! ant; the tabu-dependent denominator and cumulative distribution are cheap
//! per-step work on top.

// ============================================================================
// Exponent shortcuts
// ============================================================================

/// Tolerance for recognizing special exponent values.
const EXPONENT_TOLERANCE: f64 = 1e-9;

/// Largest integer exponent unrolled into repeated multiplication. The
/// calibrator keeps alpha and beta within `[0.1, 5.0]`.
const MAX_UNROLLED_EXPONENT: f64 = 5.0;

/// Raises `base` to `exponent`, short-circuiting the common cases.
///
/// Exponents within `1e-9` of 0, 1, a small positive integer, 1/2 or 1/3 are
/// rewritten as constant, identity, repeated multiplication, `sqrt` and `cbrt`
/// respectively; everything else falls back to [`f64::powf`]. The selection
/// loop calls this for every node, so avoiding the general `powf` dominates
/// the per-iteration setup time.
#[inline]
pub fn apply_exponent(base: f64, exponent: f64) -> f64 {
    if exponent.abs() < EXPONENT_TOLERANCE {
        return 1.0;
    }
    if (exponent - 1.0).abs() < EXPONENT_TOLERANCE {
        return base;
    }
    let rounded = exponent.round();
    if (exponent - rounded).abs() < EXPONENT_TOLERANCE
        && rounded > 0.0
        && rounded <= MAX_UNROLLED_EXPONENT
    {
        let mut power = 1.0;
        for _ in 0..rounded as u32 {
            power *= base;
        }
        return power;
    }
    if (exponent - 0.5).abs() < EXPONENT_TOLERANCE {
        return base.sqrt();
    }
    if (exponent - 1.0 / 3.0).abs() < EXPONENT_TOLERANCE {
        return base.cbrt();
    }
    base.powf(exponent)
}

// ============================================================================
// Precomputed weights
// ============================================================================

/// Powered pheromone and degree terms, refreshed once per iteration.
#[derive(Clone, Debug)]
pub struct TransitionWeights {
    pheromone_pow: Vec<f64>,
    degree_pow: Vec<f64>,
}

impl TransitionWeights {
    /// Creates empty weight buffers for `n` nodes.
    pub fn new(n: usize) -> Self {
        Self {
            pheromone_pow: vec![0.0; n],
            degree_pow: vec![0.0; n],
        }
    }

    /// Recomputes `pheromone^alpha` and `degree^beta` for every node.
    pub fn prepare(&mut self, pheromone: &[f64], degrees: &[usize], alpha: f64, beta: f64) {
        debug_assert_eq!(pheromone.len(), degrees.len());
        for i in 0..pheromone.len() {
            self.pheromone_pow[i] = apply_exponent(pheromone[i], alpha);
            self.degree_pow[i] = apply_exponent(degrees[i] as f64, beta);
        }
    }

    /// Sum of the combined weights over all non-tabu nodes: the denominator
    /// of the selection probability.
    pub fn denominator(&self, tabu: &[bool]) -> f64 {
        let mut sum = 0.0;
        for (i, &blocked) in tabu.iter().enumerate() {
            if !blocked {
                sum += self.degree_pow[i] * self.pheromone_pow[i];
            }
        }
        sum
    }

    /// Fills the per-node probabilities and their running cumulative sum.
    ///
    /// Tabu nodes get probability zero. A zero denominator (every non-tabu
    /// node has zero weight) yields the all-zero distribution, so any
    /// positive threshold resolves to no node and the constructor's forced
    /// fallback engages, identically for both selection strategies. If the
    /// final cumulative mass is positive but off 1.0 by more than `1e-6`
    /// (floating-point drift), the whole cumulative vector is renormalized
    /// so the distribution stays valid for threshold selection.
    pub fn fill_cumulative(&self, tabu: &[bool], probability: &mut [f64], cumulative: &mut [f64]) {
        let denominator = self.denominator(tabu);
        if denominator == 0.0 {
            probability.fill(0.0);
            cumulative.fill(0.0);
            return;
        }
        let mut total = 0.0;
        for (i, &blocked) in tabu.iter().enumerate() {
            let p = if blocked {
                0.0
            } else {
                (self.degree_pow[i] * self.pheromone_pow[i]) / denominator
            };
            probability[i] = p;
            total += p;
            cumulative[i] = total;
        }
        if total > 0.0 && (total - 1.0).abs() > 1e-6 {
            for c in cumulative.iter_mut() {
                *c /= total;
            }
        }
    }
}

// ============================================================================
// Threshold selection
// ============================================================================

/// Cutoff between linear scan and binary search when resolving a threshold.
/// For short cumulative vectors the scan's constants win.
const LINEAR_SCAN_MAX: usize = 25;

/// Finds the first index whose cumulative probability reaches `threshold`.
///
/// Returns `None` when no entry does (the threshold overshoots a degenerate
/// distribution); the constructor then falls back to a forced selection. Both
/// strategies return the same index on sorted input.
#[inline]
pub fn select_by_threshold(cumulative: &[f64], threshold: f64) -> Option<usize> {
    let n = cumulative.len();
    if n == 0 {
        return None;
    }
    if n <= LINEAR_SCAN_MAX {
        for (i, &c) in cumulative.iter().enumerate() {
            if threshold <= c {
                return Some(i);
            }
        }
        return None;
    }
    let i = cumulative.partition_point(|&c| c < threshold);
    if i < n {
        Some(i)
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    #[test]
    fn exponent_shortcuts_match_powf() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        let exponents = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 0.5, 1.0 / 3.0, 2.7, 4.99];
        for _ in 0..500 {
            let base: f64 = rng.random::<f64>() * 10.0;
            for &e in &exponents {
                let fast = apply_exponent(base, e);
                let slow = base.powf(e);
                assert!(
                    (fast - slow).abs() <= 1e-9 * slow.abs().max(1.0),
                    "base {base} exponent {e}: {fast} vs {slow}"
                );
            }
        }
    }

    #[test]
    fn exponent_zero_is_one_even_for_zero_base() {
        assert_eq!(apply_exponent(0.0, 0.0), 1.0);
        assert_eq!(apply_exponent(0.0, 1e-10), 1.0);
    }

    #[test]
    fn exponent_near_integer_within_tolerance_is_unrolled() {
        let v = apply_exponent(2.0, 3.0 + 5e-10);
        assert_eq!(v, 8.0);
    }

    #[test]
    fn large_integer_exponent_uses_general_path() {
        let v = apply_exponent(2.0, 6.0);
        assert!((v - 64.0).abs() < 1e-9);
    }

    fn uniform_weights(n: usize) -> TransitionWeights {
        let mut w = TransitionWeights::new(n);
        let pheromone = vec![1.0; n];
        let degrees = vec![2usize; n];
        w.prepare(&pheromone, &degrees, 1.0, 1.0);
        w
    }

    #[test]
    fn cumulative_mass_reaches_one() {
        let n = 8;
        let w = uniform_weights(n);
        let tabu = vec![false; n];
        let mut probability = vec![0.0; n];
        let mut cumulative = vec![0.0; n];
        w.fill_cumulative(&tabu, &mut probability, &mut cumulative);
        assert!((cumulative[n - 1] - 1.0).abs() <= 1e-6);
        for i in 1..n {
            assert!(cumulative[i] >= cumulative[i - 1]);
        }
    }

    #[test]
    fn tabu_nodes_get_zero_probability() {
        let n = 6;
        let w = uniform_weights(n);
        let tabu = vec![false, true, false, true, false, false];
        let mut probability = vec![0.0; n];
        let mut cumulative = vec![0.0; n];
        w.fill_cumulative(&tabu, &mut probability, &mut cumulative);
        assert_eq!(probability[1], 0.0);
        assert_eq!(probability[3], 0.0);
        let expected = 1.0 / 4.0;
        assert!((probability[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn renormalization_restores_unit_mass() {
        // Skewed trail levels under alpha = 2.7 accumulate enough drift that
        // the raw cumulative total can miss 1.0; after fill the final entry
        // must still land within the tolerance.
        let n = 30;
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        let pheromone: Vec<f64> = (0..n).map(|_| rng.random::<f64>() * 100.0).collect();
        let degrees: Vec<usize> = (0..n).map(|_| rng.random_range(1..50)).collect();
        let mut w = TransitionWeights::new(n);
        w.prepare(&pheromone, &degrees, 2.7, 1.3);
        let tabu = vec![false; n];
        let mut probability = vec![0.0; n];
        let mut cumulative = vec![0.0; n];
        w.fill_cumulative(&tabu, &mut probability, &mut cumulative);
        assert!((cumulative[n - 1] - 1.0).abs() <= 1e-6);
    }

    #[test]
    fn selection_strategies_agree() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        for n in [5usize, 25, 26, 100] {
            let mut cumulative: Vec<f64> = Vec::with_capacity(n);
            let mut acc = 0.0;
            for _ in 0..n {
                acc += rng.random::<f64>() / n as f64;
                cumulative.push(acc);
            }
            let total = cumulative[n - 1];
            for c in &mut cumulative {
                *c /= total;
            }
            for _ in 0..200 {
                let threshold: f64 = rng.random();
                let linear = cumulative
                    .iter()
                    .position(|&c| threshold <= c);
                let chosen = select_by_threshold(&cumulative, threshold);
                assert_eq!(chosen, linear, "n={n} threshold={threshold}");
            }
        }
    }

    #[test]
    fn zero_denominator_yields_all_zero_distribution() {
        // Degree-0 nodes under beta = 2 zero out every weight. The fill must
        // then produce clean zeros, not divisions of 0 by 0, on both sides
        // of the linear/binary selection cutoff.
        for n in [6usize, 30] {
            let mut w = TransitionWeights::new(n);
            let pheromone = vec![1.0; n];
            let degrees = vec![0usize; n];
            w.prepare(&pheromone, &degrees, 1.0, 2.0);
            let tabu = vec![false; n];
            let mut probability = vec![f64::NAN; n];
            let mut cumulative = vec![f64::NAN; n];
            w.fill_cumulative(&tabu, &mut probability, &mut cumulative);
            assert!(probability.iter().all(|&p| p == 0.0), "n={n}");
            assert!(cumulative.iter().all(|&c| c == 0.0), "n={n}");
        }
    }

    #[test]
    fn degenerate_distribution_forces_fallback_for_both_strategies() {
        // With an all-zero cumulative vector, every positive threshold must
        // select nothing regardless of whether the linear scan or the binary
        // search resolves it.
        for n in [6usize, 30] {
            let cumulative = vec![0.0; n];
            assert_eq!(select_by_threshold(&cumulative, 0.5), None, "n={n}");
            assert_eq!(select_by_threshold(&cumulative, 1e-12), None, "n={n}");
            // A zero threshold trivially reaches the first entry; both
            // strategies agree on that too.
            assert_eq!(select_by_threshold(&cumulative, 0.0), Some(0), "n={n}");
        }
    }

    #[test]
    fn overshooting_threshold_selects_nothing() {
        let cumulative = vec![0.2, 0.5, 0.9];
        assert_eq!(select_by_threshold(&cumulative, 0.95), None);
        let long: Vec<f64> = (0..40).map(|i| f64::from(i) / 80.0).collect();
        assert_eq!(select_by_threshold(&long, 0.99), None);
    }

    #[test]
    fn empty_cumulative_selects_nothing() {
        assert_eq!(select_by_threshold(&[], 0.5), None);
    }

    #[test]
    fn threshold_zero_selects_first_entry() {
        let cumulative = vec![0.25, 0.5, 0.75, 1.0];
        assert_eq!(select_by_threshold(&cumulative, 0.0), Some(0));
    }
}

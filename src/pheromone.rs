//! Pheromone trail maintenance: evaporation and quality-proportional deposits.

// ============================================================================
// Trail
// ============================================================================

/// Per-node pheromone intensities.
///
/// Every node starts at the neutral level 1.0. Each iteration first attenuates
/// all trails by a retention factor derived from the evaporation parameter,
/// then reinforces the nodes chosen as separators by the ants, inversely
/// proportional to the solution cost.
#[derive(Clone, Debug)]
pub struct PheromoneTrail {
    levels: Vec<f64>,
}

impl PheromoneTrail {
    /// Creates a trail for `n` nodes, all at the baseline intensity 1.0.
    pub fn new(n: usize) -> Self {
        Self {
            levels: vec![1.0; n],
        }
    }

    /// Current intensity of every node.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Attenuates every trail by the retention factor `|1 - rho|`.
    ///
    /// The absolute value tolerates `rho` outside `[0, 1]` (the calibrator may
    /// probe such values): the factor stays non-negative and so do the trails.
    pub fn evaporate(&mut self, rho: f64) {
        let factor = (1.0 - rho).abs();
        for level in &mut self.levels {
            *level *= factor;
        }
    }

    /// Reinforces every separator node of `solution` by `1 / cost`.
    ///
    /// Zero-cost solutions deposit nothing: an empty separator carries no
    /// routing information and would otherwise divide by zero.
    pub fn deposit(&mut self, solution: &[bool], cost: f64) {
        if cost == 0.0 {
            return;
        }
        let reinforcement = 1.0 / cost;
        for (level, &separator) in self.levels.iter_mut().zip(solution) {
            if separator {
                *level += reinforcement;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trail_is_uniform_baseline() {
        let trail = PheromoneTrail::new(5);
        assert_eq!(trail.levels(), &[1.0; 5]);
    }

    #[test]
    fn evaporation_applies_retention_factor() {
        let mut trail = PheromoneTrail::new(3);
        trail.evaporate(0.25);
        for &level in trail.levels() {
            assert!((level - 0.75).abs() < 1e-12);
        }
    }

    #[test]
    fn evaporation_tolerates_out_of_range_rho() {
        let mut high = PheromoneTrail::new(2);
        high.evaporate(1.5); // retention |1 - 1.5| = 0.5
        assert!((high.levels()[0] - 0.5).abs() < 1e-12);

        let mut negative = PheromoneTrail::new(2);
        negative.evaporate(-0.5); // retention |1 + 0.5| = 1.5
        assert!((negative.levels()[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn trails_stay_non_negative_under_repeated_updates() {
        let mut trail = PheromoneTrail::new(4);
        for round in 0..100 {
            trail.evaporate(0.9);
            let solution = [round % 2 == 0, true, false, true];
            trail.deposit(&solution, 3.0);
            for &level in trail.levels() {
                assert!(level >= 0.0);
            }
        }
    }

    #[test]
    fn deposit_targets_only_separator_nodes() {
        let mut trail = PheromoneTrail::new(4);
        trail.deposit(&[true, false, true, false], 2.0);
        assert!((trail.levels()[0] - 1.5).abs() < 1e-12);
        assert!((trail.levels()[1] - 1.0).abs() < 1e-12);
        assert!((trail.levels()[2] - 1.5).abs() < 1e-12);
        assert!((trail.levels()[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_cost_solutions_deposit_nothing() {
        let mut trail = PheromoneTrail::new(3);
        trail.deposit(&[true, true, true], 0.0);
        assert_eq!(trail.levels(), &[1.0; 3]);
    }

    #[test]
    fn full_evaporation_zeroes_the_trail() {
        let mut trail = PheromoneTrail::new(3);
        trail.evaporate(1.0);
        assert_eq!(trail.levels(), &[0.0; 3]);
    }
}

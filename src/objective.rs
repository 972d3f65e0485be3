//! Cost function for separator solutions and run-wide cost statistics.

use crate::components::PartitionSizes;

/// Minimum share (percent) of non-separator nodes that the two largest
/// components must cover for a solution to be feasible.
pub const REQUIRED_COVERAGE: f64 = 70.0;

// ============================================================================
// Scoring
// ============================================================================

/// Scores a partition of an `n`-node network.
///
/// Feasible solutions cost their separator cardinality `|S|`, so minimization
/// favors small separators. Any infeasible outcome costs `n + |S|`, which is
/// strictly worse than every feasible cost.
///
/// An empty principal component is penalized by substituting `n + |S|` for
/// its size *before* the coverage ratio is taken, which inflates the ratio
/// and keeps single-component partitions feasible when the survivors hang
/// together. Coverage is `(|A| + |B|) / (n - |S|) * 100`; when no nodes
/// survive at all the ratio is undefined and the solution is scored straight
/// into the infeasible branch.
pub fn score(n: usize, parts: &PartitionSizes) -> f64 {
    let penalty = (n + parts.separator) as f64;
    let mut a = parts.largest as f64;
    let mut b = parts.second as f64;
    if b == 0.0 {
        b = penalty;
    }
    if a == 0.0 {
        a = penalty;
    }

    let valid = (n - parts.separator) as f64;
    if valid == 0.0 {
        return penalty;
    }

    let coverage = (a + b) / valid * 100.0;
    if coverage >= REQUIRED_COVERAGE {
        parts.separator as f64
    } else {
        penalty
    }
}

// ============================================================================
// Run statistics
// ============================================================================

/// Tracks the best (minimum) and worst (maximum) cost seen during a run.
#[derive(Clone, Copy, Debug)]
pub struct CostTracker {
    /// Minimum cost observed so far.
    pub best: f64,
    /// Maximum cost observed so far.
    pub worst: f64,
}

impl CostTracker {
    /// Creates a tracker that any observation will improve.
    pub fn new() -> Self {
        Self {
            best: f64::INFINITY,
            worst: f64::NEG_INFINITY,
        }
    }

    /// Folds one cost into the statistics. Strict comparisons: the first
    /// solution reaching a value keeps the record.
    pub fn observe(&mut self, cost: f64) {
        if cost < self.best {
            self.best = cost;
        }
        if cost > self.worst {
            self.worst = cost;
        }
    }
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

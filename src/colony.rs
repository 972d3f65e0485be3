//! Ant agents, solution construction, and the colony iteration driver.

use crate::components::partition_sizes;
use crate::graph::Graph;
use crate::objective::{score, CostTracker};
use crate::pheromone::PheromoneTrail;
use crate::trans::{select_by_threshold, TransitionWeights};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use std::io::Write;

// ============================================================================
// Configuration
// ============================================================================

/// Control parameters for one Ant System run.
#[derive(Clone, Debug)]
pub struct ColonyConfig {
    /// Number of colony iterations.
    pub iterations: usize,
    /// Pheromone evaporation parameter; retention is `|1 - rho|`.
    pub rho: f64,
    /// Exponent weighting the pheromone term.
    pub alpha: f64,
    /// Exponent weighting the degree heuristic.
    pub beta: f64,
    /// Number of ants per iteration.
    pub ants: usize,
    /// Optional deterministic base seed.
    pub seed: Option<u64>,
    /// Optional path for a per-iteration TSV log (iteration, best, worst).
    pub log_path: Option<String>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            rho: 0.5,
            alpha: 1.0,
            beta: 2.0,
            ants: 20,
            seed: None,
            log_path: None,
        }
    }
}

impl ColonyConfig {
    /// Checks the structural parameters a run cannot start without.
    ///
    /// `rho`, `alpha` and `beta` are deliberately unconstrained: the
    /// calibrator probes values there and the core tolerates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the iteration or ant count is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.ants == 0 {
            return Err(ConfigError::NoAnts);
        }
        Ok(())
    }
}

/// Errors for structurally invalid colony configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The iteration count is zero.
    NoIterations,
    /// The ant count is zero.
    NoAnts,
    /// The independent-run count is zero.
    NoRuns,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoIterations => write!(f, "iteration count must be at least 1"),
            ConfigError::NoAnts => write!(f, "ant count must be at least 1"),
            ConfigError::NoRuns => write!(f, "run count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Ants
// ============================================================================

/// One artificial agent and its per-iteration working state.
#[derive(Clone, Debug)]
pub struct Ant {
    /// Nodes already decided during construction (no reconsideration).
    pub tabu: Vec<bool>,
    /// The constructed solution: `true` marks a separator node.
    pub solution: Vec<bool>,
    /// Per-node selection probabilities, kept as reusable scratch.
    pub probability: Vec<f64>,
    /// Objective cost of the constructed solution.
    pub cost: f64,
}

impl Ant {
    fn new(n: usize) -> Self {
        Self {
            tabu: vec![false; n],
            solution: vec![false; n],
            probability: vec![0.0; n],
            cost: 0.0,
        }
    }

    fn reset(&mut self) {
        self.tabu.fill(false);
        self.solution.fill(false);
        self.probability.fill(0.0);
        self.cost = 0.0;
    }
}

/// Builds one complete solution for `ant`.
///
/// Each step refreshes the cumulative selection distribution over the
/// not-yet-decided nodes, draws a threshold and resolves it to a node. When
/// the threshold resolves to nothing (degenerate distribution), a forced
/// index counting down from `n - 1` keeps the construction moving; the forced
/// walk visits every index at most once, so completion is guaranteed. Each
/// newly decided node gets a uniformly random connect/disconnect bit.
///
/// Progress is tracked by a decided-node counter, making the completion check
/// O(1) instead of a tabu rescan.
fn construct_solution<R: Rng>(
    ant: &mut Ant,
    weights: &TransitionWeights,
    cumulative: &mut [f64],
    rng: &mut R,
) {
    let n = ant.tabu.len();
    let mut forced = n;
    let mut decided = 0usize;

    while decided < n {
        weights.fill_cumulative(&ant.tabu, &mut ant.probability, cumulative);
        let threshold: f64 = rng.random();
        let chosen = match select_by_threshold(cumulative, threshold) {
            Some(node) => node,
            None => {
                forced -= 1;
                forced
            }
        };
        if !ant.tabu[chosen] {
            ant.solution[chosen] = rng.random_bool(0.5);
            ant.tabu[chosen] = true;
            decided += 1;
        }
    }
    debug_assert!(ant.tabu.iter().all(|&t| t));
}

// ============================================================================
// Run driver
// ============================================================================

/// Result of a colony run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Minimum cost observed across all ants and iterations.
    pub best_cost: f64,
    /// Maximum cost observed across all ants and iterations.
    pub worst_cost: f64,
    /// The solution achieving `best_cost` (`true` marks a separator node).
    pub best_solution: Vec<bool>,
}

/// Runs the Ant System on `graph` with the given configuration.
///
/// Each iteration constructs one solution per ant, scores them all, and only
/// then updates the pheromone trail: evaporation first, then an inverse-cost
/// deposit per scored ant. The powered probability terms are refreshed once
/// per iteration since the trail is stable within one.
///
/// # Errors
///
/// Returns [`ConfigError`] if the configuration fails validation.
pub fn run_colony(graph: &Graph, cfg: &ColonyConfig) -> Result<RunOutcome, ConfigError> {
    cfg.validate()?;

    let n = graph.node_count();
    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(splitmix64(base_seed));

    let mut trail = PheromoneTrail::new(n);
    let mut weights = TransitionWeights::new(n);
    let mut cumulative = vec![0.0; n];
    let mut ants: Vec<Ant> = (0..cfg.ants).map(|_| Ant::new(n)).collect();

    let mut log_file = cfg.log_path.as_ref().and_then(|path| {
        let file = std::fs::File::create(path).ok();
        if let Some(mut f) = file {
            let _ = writeln!(f, "iteration\tbest\tworst");
            Some(f)
        } else {
            None
        }
    });

    let mut tracker = CostTracker::new();
    let mut best_solution = vec![false; n];

    for iteration in 0..cfg.iterations {
        weights.prepare(trail.levels(), graph.degrees(), cfg.alpha, cfg.beta);

        let mut iteration_stats = CostTracker::new();
        for ant in &mut ants {
            ant.reset();
            construct_solution(ant, &weights, &mut cumulative, &mut rng);
            let parts = partition_sizes(graph, &ant.solution);
            ant.cost = score(n, &parts);
            iteration_stats.observe(ant.cost);
            if ant.cost < tracker.best {
                best_solution.copy_from_slice(&ant.solution);
            }
            tracker.observe(ant.cost);
        }

        trail.evaporate(cfg.rho);
        for ant in &ants {
            trail.deposit(&ant.solution, ant.cost);
        }

        if let Some(f) = log_file.as_mut() {
            let _ = writeln!(
                f,
                "{iteration}\t{}\t{}",
                iteration_stats.best, iteration_stats.worst
            );
        }
    }

    Ok(RunOutcome {
        best_cost: tracker.best,
        worst_cost: tracker.worst,
        best_solution,
    })
}

/// Runs `runs` independent colonies in parallel and keeps the best outcome.
///
/// Every run gets its own RNG stream derived from the base seed and the run
/// index; the runs share nothing mutable. The reported worst cost is the
/// maximum over all runs.
///
/// # Errors
///
/// Returns [`ConfigError`] if the configuration fails validation, and
/// [`ConfigError::NoRuns`] when `runs` is zero.
pub fn run_many(graph: &Graph, cfg: &ColonyConfig, runs: usize) -> Result<RunOutcome, ConfigError> {
    cfg.validate()?;
    if runs == 0 {
        return Err(ConfigError::NoRuns);
    }
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    let outcomes: Vec<RunOutcome> = (0..runs)
        .into_par_iter()
        .map(|run_id| {
            let mut run_cfg = cfg.clone();
            run_cfg.seed = Some(base_seed ^ run_id as u64);
            run_cfg.log_path = cfg
                .log_path
                .as_ref()
                .map(|path| format!("{path}.run{run_id}"));
            run_colony(graph, &run_cfg)
        })
        .collect::<Result<_, _>>()?;

    let mut combined = outcomes[0].clone();
    for outcome in &outcomes[1..] {
        if outcome.best_cost < combined.best_cost {
            combined.best_cost = outcome.best_cost;
            combined.best_solution = outcome.best_solution.clone();
        }
        if outcome.worst_cost > combined.worst_cost {
            combined.worst_cost = outcome.worst_cost;
        }
    }
    Ok(combined)
}

/// SplitMix64 mixer for deriving independent RNG streams from a base seed.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================

//! Differential Evolution calibrator for the Ant System control parameters.
//!
//! The calibrator treats a full colony run as a black-box fitness evaluation
//! of the parameter vector `(iterations, rho, alpha, beta, ants)` and runs a
//! classic DE/rand/1/bin loop over a small population. Anything that can map
//! a parameter vector to a cost plugs in through the [`Fitness`] trait; the
//! bundled [`ColonyFitness`] evaluates in-process against a shared graph.
//!
//! Long calibrations survive interruption through explicit plain-text
//! checkpoints: the state is written before every member evaluation and at
//! every generation end, and [`DifferentialEvolution::resume`] picks the run
//! back up mid-generation. The RNG stream is not part of the checkpoint, so a
//! resumed run continues with fresh draws.

use crate::colony::{run_colony, splitmix64, ColonyConfig};
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

// ============================================================================
// Parameter vectors
// ============================================================================

/// Number of calibrated genes.
pub const PARAM_COUNT: usize = 5;

/// Inclusive search ranges per gene, in vector order:
/// iterations, rho, alpha, beta, ants.
pub const PARAM_RANGES: [(f64, f64); PARAM_COUNT] = [
    (1.0, 100.0),
    (0.01, 0.99),
    (0.1, 5.0),
    (0.1, 5.0),
    (1.0, 100.0),
];

/// One candidate parameterization of the Ant System.
///
/// Genes are kept as floats even for the integral counts; they are rounded
/// at the point of use so the DE arithmetic stays continuous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamVector {
    /// Raw gene values, ordered as in [`PARAM_RANGES`].
    pub genes: [f64; PARAM_COUNT],
}

impl ParamVector {
    /// Colony iteration count encoded by this vector.
    pub fn iterations(&self) -> usize {
        (self.genes[0].round().max(1.0)) as usize
    }

    /// Evaporation parameter.
    pub fn rho(&self) -> f64 {
        self.genes[1]
    }

    /// Pheromone exponent.
    pub fn alpha(&self) -> f64 {
        self.genes[2]
    }

    /// Degree exponent.
    pub fn beta(&self) -> f64 {
        self.genes[3]
    }

    /// Ant count encoded by this vector.
    pub fn ants(&self) -> usize {
        (self.genes[4].round().max(1.0)) as usize
    }

    /// Expands the vector into a runnable colony configuration.
    pub fn to_colony_config(&self, seed: Option<u64>) -> ColonyConfig {
        ColonyConfig {
            iterations: self.iterations(),
            rho: self.rho(),
            alpha: self.alpha(),
            beta: self.beta(),
            ants: self.ants(),
            seed,
            log_path: None,
        }
    }
}

fn random_vector<R: Rng>(rng: &mut R) -> ParamVector {
    let mut genes = [0.0; PARAM_COUNT];
    for (gene, &(lo, hi)) in genes.iter_mut().zip(&PARAM_RANGES) {
        *gene = lo + rng.random::<f64>() * (hi - lo);
    }
    ParamVector { genes }
}

/// Pulls an out-of-range gene back into `[lo, hi]`.
///
/// Values past the upper bound are reflected off it once; values below the
/// lower bound are set onto it.
#[inline]
pub fn clamp_reflect(x: f64, lo: f64, hi: f64) -> f64 {
    if x > hi {
        hi - (x - hi)
    } else if x < lo {
        lo
    } else {
        x
    }
}

// ============================================================================
// Fitness seam
// ============================================================================

/// Fitness reported when an evaluation cannot be carried out.
pub const FAILED_FITNESS: f64 = 1e9;

/// Maps a parameter vector to a cost to be minimized.
///
/// Implementations must be pure with respect to their inputs so that
/// re-evaluating an incumbent is meaningful and checkpointed runs are
/// reproducible.
pub trait Fitness {
    /// Evaluates `params`, returning the cost to minimize.
    fn evaluate(&self, params: &ParamVector) -> f64;
}

/// Fitness backed by an in-process colony run on a fixed graph.
///
/// The run seed is derived deterministically from the base seed and the gene
/// values, so identical vectors always evaluate identically while distinct
/// vectors get independent RNG streams.
#[derive(Clone, Copy, Debug)]
pub struct ColonyFitness<'a> {
    graph: &'a Graph,
    base_seed: u64,
}

impl<'a> ColonyFitness<'a> {
    /// Creates a colony-backed fitness over `graph`.
    pub fn new(graph: &'a Graph, base_seed: u64) -> Self {
        Self { graph, base_seed }
    }
}

impl Fitness for ColonyFitness<'_> {
    fn evaluate(&self, params: &ParamVector) -> f64 {
        let mut seed = self.base_seed;
        for gene in params.genes {
            seed = splitmix64(seed ^ gene.to_bits());
        }
        let cfg = params.to_colony_config(Some(seed));
        match run_colony(self.graph, &cfg) {
            Ok(outcome) => outcome.best_cost,
            Err(_) => FAILED_FITNESS,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Control parameters for the DE loop.
#[derive(Clone, Debug)]
pub struct DeConfig {
    /// Population size (at least 4, so donors stay distinct).
    pub population: usize,
    /// Number of generations.
    pub generations: usize,
    /// Differential weight F applied to the donor difference.
    pub differential_weight: f64,
    /// Per-gene crossover rate CR.
    pub crossover_rate: f64,
    /// Optional deterministic seed.
    pub seed: Option<u64>,
    /// Optional checkpoint file path; `None` disables checkpointing.
    pub checkpoint_path: Option<String>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population: 10,
            generations: 50,
            differential_weight: 0.5,
            crossover_rate: 0.5,
            seed: None,
            checkpoint_path: None,
        }
    }
}

impl DeConfig {
    /// Checks the structural parameters the loop cannot start without.
    ///
    /// # Errors
    ///
    /// Returns [`DeError`] if the population is below 4 or no generations are
    /// requested.
    pub fn validate(&self) -> Result<(), DeError> {
        if self.population < 4 {
            return Err(DeError::PopulationTooSmall);
        }
        if self.generations == 0 {
            return Err(DeError::NoGenerations);
        }
        Ok(())
    }
}

/// Errors from configuring, checkpointing, or resuming the calibrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeError {
    /// Fewer than 4 members: the rand/1 mutation needs three distinct donors.
    PopulationTooSmall,
    /// Zero generations requested.
    NoGenerations,
    /// Underlying I/O failure.
    Io(String),
    /// A checkpoint file that did not parse.
    MalformedCheckpoint {
        /// 1-based line number.
        line: usize,
    },
}

impl fmt::Display for DeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeError::PopulationTooSmall => {
                write!(f, "population must hold at least 4 members")
            }
            DeError::NoGenerations => write!(f, "generation count must be at least 1"),
            DeError::Io(msg) => write!(f, "I/O error: {msg}"),
            DeError::MalformedCheckpoint { line } => {
                write!(f, "checkpoint line {line} is malformed")
            }
        }
    }
}

impl std::error::Error for DeError {}

// ============================================================================
// The DE loop
// ============================================================================

/// DE/rand/1/bin optimizer state.
#[derive(Debug)]
pub struct DifferentialEvolution {
    cfg: DeConfig,
    population: Vec<ParamVector>,
    best: ParamVector,
    best_fitness: f64,
    generation: usize,
    member: usize,
    rng: SmallRng,
}

impl DifferentialEvolution {
    /// Creates a fresh calibrator with a random initial population.
    ///
    /// # Errors
    ///
    /// Returns [`DeError`] if the configuration fails validation.
    pub fn new(cfg: DeConfig) -> Result<Self, DeError> {
        cfg.validate()?;
        let mut rng = SmallRng::seed_from_u64(splitmix64(cfg.seed.unwrap_or_else(rand::random)));
        let population: Vec<ParamVector> =
            (0..cfg.population).map(|_| random_vector(&mut rng)).collect();
        let best = population[0];
        Ok(Self {
            cfg,
            population,
            best,
            best_fitness: f64::INFINITY,
            generation: 0,
            member: 0,
            rng,
        })
    }

    /// Restores a calibrator from the checkpoint at `path`.
    ///
    /// The population size recorded in the file takes precedence over
    /// `cfg.population`. The RNG is freshly seeded from `cfg.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`DeError`] on invalid configuration, I/O failure, or a
    /// checkpoint that does not parse.
    pub fn resume(cfg: DeConfig, path: impl AsRef<Path>) -> Result<Self, DeError> {
        cfg.validate()?;
        let snapshot = Checkpoint::load(path)?;
        if snapshot.population.len() < 4 {
            return Err(DeError::PopulationTooSmall);
        }
        let rng = SmallRng::seed_from_u64(splitmix64(cfg.seed.unwrap_or_else(rand::random)));
        Ok(Self {
            cfg,
            population: snapshot.population,
            best: snapshot.best,
            best_fitness: snapshot.best_fitness,
            generation: snapshot.generation,
            member: snapshot.member,
            rng,
        })
    }

    /// Generation the loop will evaluate next.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best parameter vector and fitness found so far.
    pub fn best(&self) -> (ParamVector, f64) {
        (self.best, self.best_fitness)
    }

    /// Runs (or continues) the calibration until the configured generation
    /// count is reached, returning the best vector and its fitness.
    ///
    /// Per member, the trial and the incumbent are both evaluated (in
    /// parallel) and the cheaper of the two survives; ties go to the trial,
    /// which keeps the population moving across plateaus.
    pub fn run<F: Fitness + Sync>(&mut self, fitness: &F) -> (ParamVector, f64) {
        while self.generation < self.cfg.generations {
            while self.member < self.population.len() {
                self.save_checkpoint();
                self.advance_member(fitness);
            }
            self.member = 0;
            self.generation += 1;
            self.save_checkpoint();
        }
        (self.best, self.best_fitness)
    }

    fn advance_member<F: Fitness + Sync>(&mut self, fitness: &F) {
        let i = self.member;
        let (a, b, c) = self.pick_donors(i);
        let forced_gene = self.rng.random_range(0..PARAM_COUNT);

        let mut trial = self.population[i];
        for k in 0..PARAM_COUNT {
            if self.rng.random::<f64>() < self.cfg.crossover_rate || k == forced_gene {
                let mutated = self.population[a].genes[k]
                    + self.cfg.differential_weight
                        * (self.population[b].genes[k] - self.population[c].genes[k]);
                let (lo, hi) = PARAM_RANGES[k];
                trial.genes[k] = clamp_reflect(mutated, lo, hi);
            }
        }

        let incumbent = self.population[i];
        let (trial_fitness, incumbent_fitness) = rayon::join(
            || fitness.evaluate(&trial),
            || fitness.evaluate(&incumbent),
        );

        let (winner, winner_fitness) = if trial_fitness <= incumbent_fitness {
            (trial, trial_fitness)
        } else {
            (incumbent, incumbent_fitness)
        };
        self.population[i] = winner;
        if winner_fitness < self.best_fitness {
            self.best = winner;
            self.best_fitness = winner_fitness;
        }
        self.member += 1;
    }

    /// Three distinct member indices, all different from `i`.
    fn pick_donors(&mut self, i: usize) -> (usize, usize, usize) {
        let np = self.population.len();
        let mut a = self.rng.random_range(0..np);
        while a == i {
            a = self.rng.random_range(0..np);
        }
        let mut b = self.rng.random_range(0..np);
        while b == i || b == a {
            b = self.rng.random_range(0..np);
        }
        let mut c = self.rng.random_range(0..np);
        while c == i || c == a || c == b {
            c = self.rng.random_range(0..np);
        }
        (a, b, c)
    }

    fn save_checkpoint(&self) {
        if let Some(path) = &self.cfg.checkpoint_path {
            if let Err(e) = self.write_checkpoint(path) {
                eprintln!("warning: failed to write checkpoint {path}: {e}");
            }
        }
    }

    fn write_checkpoint(&self, path: &str) -> io::Result<()> {
        let mut f = File::create(path)?;
        writeln!(f, "generation {}", self.generation)?;
        writeln!(f, "member {}", self.member)?;
        writeln!(f, "best_fitness {}", self.best_fitness)?;
        write_vector(&mut f, "best", &self.best)?;
        writeln!(f, "population {}", self.population.len())?;
        for member in &self.population {
            write_vector(&mut f, "row", member)?;
        }
        Ok(())
    }
}

fn write_vector(f: &mut File, tag: &str, v: &ParamVector) -> io::Result<()> {
    write!(f, "{tag}")?;
    for gene in v.genes {
        write!(f, " {gene}")?;
    }
    writeln!(f)
}

// ============================================================================
// Checkpoint parsing
// ============================================================================

struct Checkpoint {
    generation: usize,
    member: usize,
    best_fitness: f64,
    best: ParamVector,
    population: Vec<ParamVector>,
}

impl Checkpoint {
    fn load(path: impl AsRef<Path>) -> Result<Self, DeError> {
        let file = File::open(path).map_err(|e| DeError::Io(e.to_string()))?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line.map_err(|e| DeError::Io(e.to_string()))?);
        }

        let generation = parse_tagged(&lines, 0, "generation")?;
        let member = parse_tagged(&lines, 1, "member")?;
        let best_fitness = parse_tagged(&lines, 2, "best_fitness")?;
        let best = parse_vector(&lines, 3, "best")?;
        let population_len: usize = parse_tagged(&lines, 4, "population")?;
        let mut population = Vec::with_capacity(population_len);
        for row in 0..population_len {
            population.push(parse_vector(&lines, 5 + row, "row")?);
        }
        Ok(Self {
            generation,
            member,
            best_fitness,
            best,
            population,
        })
    }
}

fn parse_tagged<T: std::str::FromStr>(
    lines: &[String],
    index: usize,
    tag: &str,
) -> Result<T, DeError> {
    let malformed = DeError::MalformedCheckpoint { line: index + 1 };
    let line = lines.get(index).ok_or_else(|| malformed.clone())?;
    let value = line
        .strip_prefix(tag)
        .map(str::trim)
        .ok_or_else(|| malformed.clone())?;
    value.parse().map_err(|_| malformed)
}

fn parse_vector(lines: &[String], index: usize, tag: &str) -> Result<ParamVector, DeError> {
    let malformed = DeError::MalformedCheckpoint { line: index + 1 };
    let line = lines.get(index).ok_or_else(|| malformed.clone())?;
    let rest = line
        .strip_prefix(tag)
        .ok_or_else(|| malformed.clone())?;
    let mut genes = [0.0; PARAM_COUNT];
    let mut fields = rest.split_whitespace();
    for gene in &mut genes {
        *gene = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| malformed.clone())?;
    }
    Ok(ParamVector { genes })
}

// ============================================================================
// Tests
// ============================================================================

//! # Ant System Separator Search
//!
//! A Rust library for analyzing the structural robustness of complex networks.
//!
//! This crate provides:
//! - A graph store supporting both **adjacency matrix** and **adjacency list**
//!   representations behind a single type.
//! - An **Ant System** metaheuristic that searches for a minimal-cardinality
//!   node separator: a set of nodes whose removal splits the network while the
//!   two largest surviving components still cover at least 70% of the
//!   remaining nodes.
//! - A **Differential Evolution** calibrator that tunes the Ant System's
//!   control parameters, treating each full run as a black-box fitness
//!   evaluation, with plain-text checkpoint/resume.
//!
//! ## Quick Start
//!
//! ```
//! use antsep::colony::{run_colony, ColonyConfig};
//! use antsep::graph::{Graph, Representation};
//!
//! // A 4-cycle: 0-1-2-3-0
//! let edges = [(0, 1), (1, 2), (2, 3), (3, 0)];
//! let graph = Graph::from_edges(4, &edges, Representation::List).unwrap();
//!
//! let cfg = ColonyConfig {
//!     iterations: 20,
//!     ants: 10,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let outcome = run_colony(&graph, &cfg).unwrap();
//! assert!(outcome.best_cost <= 8.0);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Matrix/list graph store with degree tracking.
//! - [`instance`]: Edge-list instance file loader.
//! - [`pheromone`]: Pheromone trail with evaporation and quality deposits.
//! - [`trans`]: Transition-probability engine with cumulative selection.
//! - [`components`]: Connected-component analysis of a separated network.
//! - [`objective`]: Coverage-constrained cost function and run statistics.
//! - [`colony`]: Ant agents, solution construction, and the iteration driver.
//! - [`calibrate`]: Differential Evolution parameter calibrator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::float_cmp)] // Exact sentinel comparisons are intentional

pub mod calibrate;
pub mod colony;
pub mod components;
pub mod graph;
pub mod instance;
pub mod objective;
pub mod pheromone;
pub mod trans;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::calibrate::{DeConfig, DifferentialEvolution, Fitness, ParamVector};
    pub use crate::colony::{run_colony, run_many, ColonyConfig, RunOutcome};
    pub use crate::components::{partition_sizes, PartitionSizes};
    pub use crate::graph::{Graph, Representation};
    pub use crate::instance::load_instance;
    pub use crate::objective::score;
}

use antsep::calibrate::{ColonyFitness, DeConfig, DifferentialEvolution};
use antsep::colony::{run_colony, run_many, ColonyConfig};
use antsep::graph::Representation;
use antsep::instance::load_instance;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("run") => run_mode(&args[2..]),
        Some("calibrate") => calibrate_mode(&args[2..]),
        Some("--help" | "-h") => usage_and_exit(0),
        _ => usage_and_exit(2),
    }
}

fn run_mode(args: &[String]) {
    let mut cfg = ColonyConfig::default();
    let mut instance: Option<String> = None;
    let mut representation = Representation::List;
    let mut runs = 1usize;
    let mut quiet = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--instance" => {
                instance = Some(take_value(args, i).to_string());
                i += 2;
            }
            "--matrix" => {
                representation = Representation::Matrix;
                i += 1;
            }
            "--list" => {
                representation = Representation::List;
                i += 1;
            }
            "--iterations" => {
                cfg.iterations = parse_value(args, i);
                i += 2;
            }
            "--rho" => {
                cfg.rho = parse_value(args, i);
                i += 2;
            }
            "--alpha" => {
                cfg.alpha = parse_value(args, i);
                i += 2;
            }
            "--beta" => {
                cfg.beta = parse_value(args, i);
                i += 2;
            }
            "--ants" => {
                cfg.ants = parse_value(args, i);
                i += 2;
            }
            "--seed" => {
                cfg.seed = Some(parse_value(args, i));
                i += 2;
            }
            "--log" => {
                cfg.log_path = Some(take_value(args, i).to_string());
                i += 2;
            }
            "--runs" => {
                runs = parse_value(args, i);
                i += 2;
            }
            "--quiet" => {
                quiet = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    // Reject structurally invalid parameters before any work starts.
    if let Err(e) = cfg.validate() {
        eprintln!("Invalid parameters: {e}");
        std::process::exit(2);
    }
    if runs == 0 {
        eprintln!("Invalid parameters: run count must be at least 1");
        std::process::exit(2);
    }

    let path = instance.unwrap_or_else(|| usage_and_exit(2));
    let graph = match load_instance(&path, representation) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to load instance {path}: {e}");
            std::process::exit(1);
        }
    };

    let outcome = if runs == 1 {
        run_colony(&graph, &cfg)
    } else {
        run_many(&graph, &cfg, runs)
    };
    let outcome = match outcome {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid parameters: {e}");
            std::process::exit(2);
        }
    };

    if quiet {
        // Bare round-trip cost only, for machine consumption.
        println!("{}", outcome.best_cost);
        return;
    }

    let separator: Vec<usize> = outcome
        .best_solution
        .iter()
        .enumerate()
        .filter_map(|(node, &s)| if s { Some(node) } else { None })
        .collect();
    println!("Nodes: {} | Runs: {runs} | Ants: {} | Iterations: {}", graph.node_count(), cfg.ants, cfg.iterations);
    println!("Best cost:  {}", outcome.best_cost);
    println!("Worst cost: {}", outcome.worst_cost);
    println!("Separator ({} nodes): {separator:?}", separator.len());
}

fn calibrate_mode(args: &[String]) {
    let mut cfg = DeConfig::default();
    let mut instance: Option<String> = None;
    let mut representation = Representation::List;
    let mut resume = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--instance" => {
                instance = Some(take_value(args, i).to_string());
                i += 2;
            }
            "--matrix" => {
                representation = Representation::Matrix;
                i += 1;
            }
            "--list" => {
                representation = Representation::List;
                i += 1;
            }
            "--generations" => {
                cfg.generations = parse_value(args, i);
                i += 2;
            }
            "--population" => {
                cfg.population = parse_value(args, i);
                i += 2;
            }
            "--seed" => {
                cfg.seed = Some(parse_value(args, i));
                i += 2;
            }
            "--checkpoint" => {
                cfg.checkpoint_path = Some(take_value(args, i).to_string());
                i += 2;
            }
            "--resume" => {
                resume = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    let path = instance.unwrap_or_else(|| usage_and_exit(2));
    let graph = match load_instance(&path, representation) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to load instance {path}: {e}");
            std::process::exit(1);
        }
    };

    let base_seed = cfg.seed.unwrap_or(0);
    let fitness = ColonyFitness::new(&graph, base_seed);

    let mut de = if resume {
        let checkpoint = cfg.checkpoint_path.clone().unwrap_or_else(|| {
            eprintln!("--resume requires --checkpoint PATH");
            std::process::exit(2);
        });
        match DifferentialEvolution::resume(cfg, &checkpoint) {
            Ok(de) => {
                println!("Resumed calibration at generation {}", de.generation());
                de
            }
            Err(e) => {
                eprintln!("Failed to resume from {checkpoint}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        match DifferentialEvolution::new(cfg) {
            Ok(de) => de,
            Err(e) => {
                eprintln!("Invalid parameters: {e}");
                std::process::exit(2);
            }
        }
    };

    let (best, fitness_value) = de.run(&fitness);
    println!("Best fitness: {fitness_value}");
    println!(
        "Best parameters: iterations={} rho={:.4} alpha={:.4} beta={:.4} ants={}",
        best.iterations(),
        best.rho(),
        best.alpha(),
        best.beta(),
        best.ants()
    );
}

fn take_value(args: &[String], i: usize) -> &str {
    args.get(i + 1).map_or_else(|| usage_and_exit(2), String::as_str)
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize) -> T {
    take_value(args, i).parse().unwrap_or_else(|_| usage_and_exit(2))
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  antsep run --instance PATH [--matrix|--list] [--iterations T] [--rho R] [--alpha A] [--beta B]\n             [--ants M] [--seed SEED] [--runs N] [--log PATH] [--quiet]\n  antsep calibrate --instance PATH [--matrix|--list] [--generations G] [--population NP] [--seed SEED]\n                   [--checkpoint PATH] [--resume]\n\nModes:\n  run         Search for a minimal node separator with the Ant System\n  calibrate   Tune the Ant System parameters with Differential Evolution\n\nOptions (run):\n  --instance PATH   Edge-list instance file ('%' header with node/edge counts)\n  --matrix/--list   Adjacency representation (default: list)\n  --iterations T    Colony iterations, at least 1 (default: 50)\n  --rho R           Evaporation parameter (default: 0.5)\n  --alpha A         Pheromone exponent (default: 1.0)\n  --beta B          Degree exponent (default: 2.0)\n  --ants M          Ants per iteration, at least 1 (default: 20)\n  --seed SEED       Deterministic base seed (optional)\n  --runs N          Independent parallel runs, best outcome wins (default: 1)\n  --log PATH        Per-iteration TSV log (iteration, best, worst)\n  --quiet           Print only the final best cost\n\nOptions (calibrate):\n  --generations G   DE generations (default: 50)\n  --population NP   DE population size, at least 4 (default: 10)\n  --checkpoint PATH Plain-text checkpoint file, written as the run advances\n  --resume          Restore state from --checkpoint and continue\n"
    );
    std::process::exit(code)
}

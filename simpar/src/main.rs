use simpar::{simulate, bench_step_curve};
use simpar::{Engine, Reaggregation, RunConfig, RunParameters};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use std::path::PathBuf;

/// Grid-approximated gravitational particle simulation on the unit torus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random generator seed
    #[arg(
        value_parser = clap::value_parser!(i64).range(1..),
        required_unless_present_any = ["config", "bench"]
    )]
    seed: Option<i64>,

    /// Grid side length (cells per axis)
    #[arg(
        value_parser = clap::value_parser!(i64).range(1..),
        required_unless_present_any = ["config", "bench"]
    )]
    grid_side: Option<i64>,

    /// Number of particles
    #[arg(
        value_parser = clap::value_parser!(i64).range(1..),
        required_unless_present_any = ["config", "bench"]
    )]
    particles: Option<i64>,

    /// Number of time steps
    #[arg(
        value_parser = clap::value_parser!(i64).range(1..),
        required_unless_present_any = ["config", "bench"]
    )]
    iterations: Option<i64>,

    /// Read the run from a YAML file instead of positional arguments
    #[arg(short, long, conflicts_with_all = ["seed", "bench"])]
    config: Option<PathBuf>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    threads: Option<u16>,

    /// How cell centers are rebuilt at the end of each step
    #[arg(long, value_enum)]
    reaggregation: Option<Reaggregation>,

    /// Print a step-time curve instead of running one simulation
    #[arg(long, conflicts_with = "seed")]
    bench: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// load here to keep main clean
fn load_run(args: &Args) -> Result<(RunParameters, Engine)> {
    let (parameters, mut engine) = match &args.config {
        Some(path) => RunConfig::from_yaml_file(path)
            .and_then(RunConfig::into_parts)
            .with_context(|| format!("failed to load run file {}", path.display()))?,
        None => {
            // clap guarantees all four are present and positive here
            let positional = (args.seed, args.grid_side, args.particles, args.iterations);
            let (Some(seed), Some(grid_side), Some(particles), Some(iterations)) = positional else {
                anyhow::bail!("expected <SEED> <GRID_SIDE> <PARTICLES> <ITERATIONS>");
            };
            (RunParameters::new(seed, grid_side, particles, iterations)?, Engine::default())
        }
    };

    // command line flags win over the run file
    if let Some(t) = args.threads {
        engine.threads = Some(usize::from(t));
    }
    if let Some(r) = args.reaggregation {
        engine.reaggregation = r;
    }
    Ok((parameters, engine))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if args.bench {
        bench_step_curve()?;
        return Ok(());
    }

    let (parameters, engine) = load_run(&args)?;
    let report = simulate(parameters, engine)?;

    println!("{report}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(argv)
    }

    #[test]
    fn positional_run_parses() {
        let args = parse(&["simpar", "1", "10", "100", "1", "-vvv"]).unwrap();
        let positional = (args.seed, args.grid_side, args.particles, args.iterations);
        assert_eq!(positional, (Some(1), Some(10), Some(100), Some(1)));
        assert_eq!(args.verbose, 3);

        let (parameters, engine) = load_run(&args).unwrap();
        assert_eq!(parameters, RunParameters::new(1, 10, 100, 1).unwrap());
        assert_eq!(engine, Engine::default());
    }

    #[test]
    fn rejects_zero_grid_side() {
        assert!(parse(&["simpar", "1", "0", "100", "1"]).is_err());
    }

    #[test]
    fn rejects_negative_values() {
        assert!(parse(&["simpar", "1", "10", "-3", "1"]).is_err());
        assert!(parse(&["simpar", "1", "10", "100", "--", "-3"]).is_err());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse(&["simpar", "1", "10", "1x", "1"]).is_err());
        assert!(parse(&["simpar", "1.5", "10", "100", "1"]).is_err());
    }

    #[test]
    fn rejects_missing_positionals() {
        assert!(parse(&["simpar", "1", "10", "100"]).is_err());
        assert!(parse(&["simpar"]).is_err());
    }

    #[test]
    fn config_needs_no_positionals() {
        let args = parse(&["simpar", "--config", "f.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("f.yaml")));
        assert!(args.seed.is_none() && args.iterations.is_none());
    }

    #[test]
    fn bench_and_config_reject_positionals() {
        assert!(parse(&["simpar", "--bench"]).unwrap().bench);
        assert!(parse(&["simpar", "--bench", "1", "10", "100", "1"]).is_err());
        assert!(parse(&["simpar", "--config", "f.yaml", "1", "10", "100", "1"]).is_err());
    }

    #[test]
    fn flags_override_the_default_engine() {
        let argv = ["simpar", "2", "4", "50", "3", "--threads", "2", "--reaggregation", "running"];
        let args = parse(&argv).unwrap();
        let (_, engine) = load_run(&args).unwrap();
        assert_eq!(engine.threads, Some(2));
        assert_eq!(engine.reaggregation, Reaggregation::Running);
        assert!(parse(&["simpar", "2", "4", "50", "3", "--threads", "0"]).is_err());
    }
}

mod sweep;

use std::time::Instant;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use policycache::cache::Reference;
use policycache::config::CacheConfig;
use policycache::io::{open_trace, read_config};
use policycache::report::full_report;
use policycache::simulator::Simulator;
use policycache::trace::{parse_references, parse_trace};
use crate::sweep::{render_table, run_sweep, Dimension};

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative cache simulator with configurable write policies"))]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs a trace through a single cache and prints its statistics
    Run {
        trace: String,

        /// JSON cache configuration. Without it, the trace must start with the two header lines
        #[arg(short, long)]
        config: Option<String>,

        #[arg(short, long)]
        json: bool,

        #[arg(short, long)]
        performance: bool,
    },
    /// Runs a trace through one cache per value of a parameter
    Sweep {
        trace: String,

        #[arg(short, long)]
        config: Option<String>,

        #[arg(long, value_enum)]
        dimension: Dimension,

        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<u64>,
    },
}

fn load(trace: &str, config: Option<&str>) -> Result<(CacheConfig, Vec<Reference>), String> {
    let reader = open_trace(trace)?;
    match config {
        Some(path) => Ok((read_config(path)?, parse_references(reader)?)),
        None => {
            let trace = parse_trace(reader)?;
            Ok((trace.config, trace.references))
        }
    }
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.debug { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .init();
    #[cfg(debug_assertions)]
    log::debug!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");

    match args.command {
        Command::Run { trace, config, json, performance } => {
            let (config, references) = load(&trace, config.as_deref())?;
            log::debug!("Parsed input configuration: {config:?}");
            let mut simulator = Simulator::new(&config).map_err(|e| format!("Invalid cache configuration: {e}"))?;
            simulator.simulate(&references);
            let result = simulator.finish();
            if json {
                println!("{}", serde_json::to_string_pretty(&result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
            } else {
                print!("{}", full_report(&result.settings, &result.instruction, &result.data));
            }
            if result.skipped > 0 {
                eprintln!("Skipped {} references with malformed addresses", result.skipped);
            }
            if performance {
                let end = Instant::now();
                let simulation_time = simulator.get_execution_time();
                let total_time = end - start;
                println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
                println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
            }
        }
        Command::Sweep { trace, config, dimension, values } => {
            let (config, references) = load(&trace, config.as_deref())?;
            log::debug!("Sweeping {dimension:?} over {values:?} from {config:?}");
            let rows = run_sweep(&config, dimension, &values, &references)?;
            print!("{}", render_table(dimension, &rows));
        }
    }
    Ok(())
}

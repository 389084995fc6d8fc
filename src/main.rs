//! The benchmark driver.
//!
//! Usage: `tree_bench [config.json] [key=value ...]`, e.g.
//! `tree_bench tree=splay sizes=1000,2000 repetitions=5 workers=8`.
//! Overrides are applied on top of the configuration file, or of the defaults.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use log::{error, info};
use simplelog::*;

use instrumented_trees::bench::report::*;
use instrumented_trees::bench::*;
use instrumented_trees::{BenchError, BenchResult};

fn initialize_logging(log_file: Option<&Path>) -> BenchResult<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)
        .map_err(|err| BenchError::Config(format!("can't install the logger: {}", err)))
}

fn run() -> BenchResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = BenchConfig::from_args(&args)?;
    initialize_logging(config.log_file.as_deref())?;

    let start = Instant::now();
    let results = run_benchmark(config.tree, &config.sizes, config.repetitions, config.workers)?;
    info!("{} tasks done in {:.1?}", results.len(), start.elapsed());

    // a failed save loses that file only; the measurements are still summarized below
    let full_path = config.full_results_path();
    match save_full_results(&results, &full_path) {
        Ok(()) => info!("full results saved to {}", full_path.display()),
        Err(err) => error!("can't save the full results to {}: {}", full_path.display(), err),
    }
    let averaged_path = config.averaged_results_path();
    let averaged = create_averaged_results(&results, &config.sizes);
    match save_averaged_results(&averaged, &averaged_path) {
        Ok(()) => info!("averaged results saved to {}", averaged_path.display()),
        Err(err) => error!(
            "can't save the averaged results to {}: {}",
            averaged_path.display(),
            err
        ),
    }

    info!("summary:\n{}", summary_table(&results));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("tree_bench: {}", err);
        std::process::exit(1);
    }
}

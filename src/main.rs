//! Command-line harness: filter one image file and report the compute time.
//!
//! ```text
//! diamond-filter <input> <output> <filter_size> <exec_mode>
//! ```

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{anyhow, Context};
use log::{info, warn};

use diamond_filter::io::{load_gray, save_gray};
use diamond_filter::{ExecMode, FilterSpec};

const USAGE: &str = "Usage: diamond-filter <input> <output> <filter_size> <exec_mode>

  filter_size  positive odd integer, no larger than the image
  exec_mode    --cpu | --sequential   run on the calling thread
               --gpu | --parallel     run on the rayon worker pool

Set DIAMOND_FILTER_THREADS to size the parallel worker pool.";

const THREADS_ENV: &str = "DIAMOND_FILTER_THREADS";

/// Error paired with the process exit code it maps to.
struct Failure {
    code: u8,
    error: anyhow::Error,
}

impl Failure {
    fn with_code(code: u8) -> impl FnOnce(anyhow::Error) -> Failure {
        move |error| Failure { code, error }
    }
}

fn threads_from_env() -> Option<usize> {
    let raw = std::env::var(THREADS_ENV).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!("ignoring {THREADS_ENV}={raw:?}: expected a positive integer");
            None
        }
    }
}

fn run(args: &[String]) -> Result<(), Failure> {
    let [input, output, size, mode] = args else {
        println!("{USAGE}");
        return Err(Failure {
            code: 1,
            error: anyhow!("expected 4 arguments, got {}", args.len()),
        });
    };

    let image = load_gray(input)
        .with_context(|| format!("loading {input}"))
        .map_err(Failure::with_code(2))?;

    let spec = size
        .trim()
        .parse::<i64>()
        .map_err(|e| anyhow!("invalid filter size {size:?}: {e}"))
        .and_then(|n| FilterSpec::from_signed(n).map_err(Into::into))
        .map_err(Failure::with_code(3))?;

    let mode = mode
        .parse::<ExecMode>()
        .map_err(anyhow::Error::from)
        .map_err(Failure::with_code(4))?;

    spec.validate_for(&image)
        .map_err(anyhow::Error::from)
        .map_err(Failure::with_code(3))?;

    let executor = mode
        .executor(threads_from_env())
        .map_err(anyhow::Error::from)
        .map_err(Failure::with_code(6))?;

    let start = Instant::now();
    let result = executor
        .compute(&image, &spec)
        .context("filter pass failed")
        .map_err(Failure::with_code(6))?;
    let elapsed = start.elapsed();

    println!("Elapsed time: {} ms", elapsed.as_millis());
    info!(
        "{} filter size {} on {}x{} -> {}x{} in {:?}",
        executor.name(),
        spec.size(),
        image.rows(),
        image.cols(),
        result.rows(),
        result.cols(),
        elapsed
    );

    save_gray(&result, output)
        .with_context(|| format!("saving {output}"))
        .map_err(Failure::with_code(5))?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure { code, error }) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(code)
        }
    }
}

//! Execution strategies for the diamond filter.
//!
//! Both strategies evaluate [`window_average`] at every output coordinate and
//! produce bit-identical results; they differ only in scheduling.
//!
//! - [`SequentialExecutor`] walks the output region row-major on the calling thread.
//! - [`ParallelExecutor`] hands every output pixel to rayon as an independent
//!   task. Tasks read the shared input and write disjoint output slots, so no
//!   locking is involved. The result is returned only after every task has
//!   finished; a panicking task propagates to the caller instead of leaving a
//!   partially filled buffer.

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::diamond::{window_average, FilterSpec};
use crate::error::{FilterError, Result};
use crate::gray::GrayImage;

/// Capability shared by the execution strategies.
pub trait Executor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Filter a raw view. Returns an empty array when `spec` does not fit.
    fn filter(&self, input: ArrayView2<u8>, spec: &FilterSpec) -> Result<Array2<u8>>;

    /// Filter `image`, producing an `(rows - size + 1) x (cols - size + 1)` image.
    fn compute(&self, image: &GrayImage, spec: &FilterSpec) -> Result<GrayImage> {
        spec.validate_for(image)?;
        debug!(
            "{} executor: {}x{} input, filter size {}",
            self.name(),
            image.rows(),
            image.cols(),
            spec.size()
        );
        let output = self.filter(image.view(), spec)?;
        GrayImage::from_array(output)
    }
}

/// Allocate a zeroed output buffer, reporting allocation failure instead of aborting.
fn alloc_output(len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| FilterError::Allocation { bytes: len })?;
    out.resize(len, 0);
    Ok(out)
}

fn output_dims(input: &ArrayView2<u8>, spec: &FilterSpec) -> (usize, usize) {
    let (rows, cols) = input.dim();
    let out_rows = spec.out_rows(rows);
    let out_cols = spec.out_cols(cols);
    if out_rows == 0 || out_cols == 0 {
        (0, 0)
    } else {
        (out_rows, out_cols)
    }
}

fn into_output(out: Vec<u8>, out_rows: usize, out_cols: usize) -> Result<Array2<u8>> {
    let len = out.len();
    Array2::from_shape_vec((out_rows, out_cols), out).map_err(|_| FilterError::BufferLength {
        expected: out_rows * out_cols,
        actual: len,
    })
}

/// Single-threaded row-major filter pass.
pub fn compute_sequential(input: ArrayView2<u8>, spec: &FilterSpec) -> Result<Array2<u8>> {
    let (out_rows, out_cols) = output_dims(&input, spec);
    let mut out = alloc_output(out_rows * out_cols)?;

    for i in 0..out_rows {
        for j in 0..out_cols {
            out[i * out_cols + j] = window_average(input, spec, i, j);
        }
    }

    into_output(out, out_rows, out_cols)
}

/// Data-parallel filter pass on the current rayon pool.
///
/// Output rows are split into disjoint chunks and every pixel inside a row is
/// its own task; only coordinates inside the output region are dispatched.
pub fn compute_parallel(input: ArrayView2<u8>, spec: &FilterSpec) -> Result<Array2<u8>> {
    let (out_rows, out_cols) = output_dims(&input, spec);
    let mut out = alloc_output(out_rows * out_cols)?;

    if out_cols > 0 {
        out.par_chunks_mut(out_cols)
            .enumerate()
            .for_each(|(i, row)| {
                row.par_iter_mut().enumerate().for_each(|(j, px)| {
                    *px = window_average(input, spec, i, j);
                });
            });
    }

    into_output(out, out_rows, out_cols)
}

// ============================================================================
// Sequential
// ============================================================================

/// Reference strategy: every output pixel on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn filter(&self, input: ArrayView2<u8>, spec: &FilterSpec) -> Result<Array2<u8>> {
        compute_sequential(input, spec)
    }
}

// ============================================================================
// Parallel
// ============================================================================

/// Data-parallel strategy backed by rayon.
///
/// Uses the global rayon pool unless built with [`ParallelExecutor::with_threads`].
#[derive(Debug, Default)]
pub struct ParallelExecutor {
    pool: Option<ThreadPool>,
}

impl ParallelExecutor {
    /// Executor running on a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("diamond-filter-{i}"))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    /// Number of workers tasks are spread over.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl Executor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn filter(&self, input: ArrayView2<u8>, spec: &FilterSpec) -> Result<Array2<u8>> {
        debug!("dispatching on {} worker(s)", self.threads());
        match &self.pool {
            Some(pool) => pool.install(|| compute_parallel(input, spec)),
            None => compute_parallel(input, spec),
        }
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Which executor the harness runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecMode {
    Sequential,
    #[default]
    Parallel,
}

impl ExecMode {
    /// Executor for this mode; `threads` only applies to [`ExecMode::Parallel`].
    pub fn executor(self, threads: Option<usize>) -> Result<Box<dyn Executor>> {
        let executor: Box<dyn Executor> = match (self, threads) {
            (ExecMode::Sequential, _) => Box::new(SequentialExecutor),
            (ExecMode::Parallel, Some(n)) => Box::new(ParallelExecutor::with_threads(n)?),
            (ExecMode::Parallel, None) => Box::new(ParallelExecutor::default()),
        };
        Ok(executor)
    }
}

impl FromStr for ExecMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches("--") {
            "cpu" | "seq" | "sequential" => Ok(ExecMode::Sequential),
            "gpu" | "par" | "parallel" => Ok(ExecMode::Parallel),
            _ => Err(FilterError::InvalidExecMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Sequential => f.write_str("sequential"),
            ExecMode::Parallel => f.write_str("parallel"),
        }
    }
}

/// Build the spec for `image` and run the executor selected by `mode`.
pub fn apply_diamond_filter(image: &GrayImage, size: usize, mode: ExecMode) -> Result<GrayImage> {
    let spec = FilterSpec::for_image(size, image.rows(), image.cols())?;
    mode.executor(None)?.compute(image, &spec)
}

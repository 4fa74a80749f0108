//! Error type shared by the filter core, the I/O helpers and the bindings.

use thiserror::Error;

/// Errors reported by diamond filter operations.
///
/// Configuration problems are detected when a [`FilterSpec`](crate::FilterSpec)
/// is built or checked against an image, never in the middle of a filter pass.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Filter size must be a positive odd integer.
    #[error("invalid filter size {0}: must be a positive odd integer")]
    InvalidFilterSize(i64),

    /// The filter window does not fit inside the image.
    #[error("filter size {size} does not fit a {rows}x{cols} image")]
    FilterTooLarge { size: usize, rows: usize, cols: usize },

    /// Image has a zero dimension.
    #[error("image must have at least one row and one column")]
    EmptyImage,

    /// Pixel buffer length does not match `rows * cols`.
    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// Output buffer could not be allocated.
    #[error("failed to allocate {bytes} byte output buffer")]
    Allocation { bytes: usize },

    /// Dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Image decoding or encoding failed.
    #[error("image I/O failed: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem error while reading or writing an image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Exec mode string not recognised.
    #[error("invalid exec mode {0:?}")]
    InvalidExecMode(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

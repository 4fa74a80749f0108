//! Diamond Filter
//!
//! Manhattan-distance ("diamond") averaging filter for 8-bit grayscale
//! images, with a sequential reference executor and a rayon data-parallel
//! executor that produce bit-identical output. Python bindings via PyO3 and
//! WASM bindings for JavaScript are available behind features.
//!
//! ## Image Format
//! Images are single-channel `u8`, stored row-major as `(rows, cols)`.
//!
//! ## Output Region
//! Only positions where the whole window fits are computed, so the output of
//! a size `n` filter on a `rows x cols` image is
//! `(rows - n + 1) x (cols - n + 1)`. No padding or edge extrapolation.
//!
//! ## Example
//! ```
//! use diamond_filter::{FilterSpec, GrayImage, Executor, ParallelExecutor};
//!
//! let image = GrayImage::filled(5, 5, 100).unwrap();
//! let spec = FilterSpec::for_image(3, image.rows(), image.cols()).unwrap();
//! let out = ParallelExecutor::default().compute(&image, &spec).unwrap();
//! assert_eq!((out.rows(), out.cols()), (3, 3));
//! assert!(out.as_slice().iter().all(|&v| v == 100));
//! ```

pub mod error;
pub mod filters;
pub mod gray;
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::FilterError;
pub use filters::diamond::{window_average, FilterSpec};
pub use filters::executor::{
    apply_diamond_filter, compute_parallel, compute_sequential, ExecMode, Executor,
    ParallelExecutor, SequentialExecutor,
};
pub use gray::GrayImage;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::diamond::FilterSpec;
    use crate::filters::executor::ExecMode;
    use crate::gray::GrayImage;

    fn to_py_err(err: FilterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Apply the diamond averaging filter to a 2D u8 grayscale array.
    ///
    /// # Arguments
    /// * `image` - Grayscale image (height, width)
    /// * `size` - Positive odd filter size, no larger than either dimension
    /// * `parallel` - Run on the rayon pool (default) or on the calling thread
    ///
    /// # Returns
    /// Filtered image of shape (height - size + 1, width - size + 1)
    #[pyfunction]
    #[pyo3(signature = (image, size, parallel=true))]
    pub fn diamond_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        size: usize,
        parallel: bool,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = GrayImage::from_array(image.as_array().to_owned()).map_err(to_py_err)?;
        let spec = FilterSpec::for_image(size, input.rows(), input.cols()).map_err(to_py_err)?;
        let mode = if parallel {
            ExecMode::Parallel
        } else {
            ExecMode::Sequential
        };

        // The filter never touches Python objects
        let result = py
            .allow_threads(|| mode.executor(None)?.compute(&input, &spec))
            .map_err(to_py_err)?;
        Ok(result.into_array().into_pyarray(py))
    }

    /// Diamond filter Rust extension module
    #[pymodule]
    pub fn diamond_filter_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(diamond_filter, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::diamond_filter_rust;

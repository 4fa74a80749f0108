//! Owned 8-bit grayscale image.
//!
//! Samples are stored row-major in an `ndarray::Array2<u8>` of shape
//! `(rows, cols)`, so sample `(r, c)` sits at flat offset `r * cols + c`.

use ndarray::{Array2, ArrayView2};

use crate::error::{FilterError, Result};

/// Grayscale image consumed read-only by the filter executors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    data: Array2<u8>,
}

impl GrayImage {
    /// Build an image from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(FilterError::EmptyImage);
        }
        let expected = sample_count(rows, cols, data.len())?;
        if data.len() != expected {
            return Err(FilterError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        let data = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            FilterError::BufferLength {
                expected,
                actual: expected,
            }
        })?;
        Ok(Self { data })
    }

    /// Wrap an existing array, copying it into standard layout if needed.
    pub fn from_array(data: Array2<u8>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(FilterError::EmptyImage);
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Image with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, value: u8) -> Result<Self> {
        let len = sample_count(rows, cols, 0)?;
        Self::from_vec(rows, cols, vec![value; len])
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Sample at `(r, c)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.data[[r, c]]
    }

    /// Flat row-major samples.
    pub fn as_slice(&self) -> &[u8] {
        // Standard layout is enforced by every constructor.
        self.data.as_slice().unwrap_or_default()
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        let len = self.data.len();
        let (mut raw, offset) = self.data.into_raw_vec_and_offset();
        raw.drain(..offset.unwrap_or(0));
        raw.truncate(len);
        raw
    }
}

/// `rows * cols`, reporting overflow as a buffer that can never match.
fn sample_count(rows: usize, cols: usize, actual: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(FilterError::BufferLength {
        expected: usize::MAX,
        actual,
    })
}

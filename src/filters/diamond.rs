//! Diamond (Manhattan distance) window definition.
//!
//! A [`FilterSpec`] fixes the filter size and derives everything the
//! executors need: the half-width, the valid output region and the mask
//! predicate. [`window_average`] is the per-pixel kernel both executors run.
//!
//! ## Window
//!
//! For output pixel `(i, j)` the candidate input coordinates are rows
//! `i..=i + size` and columns `j..j + size`. A candidate `(r, c)` is kept
//! when `|j - (c - half)| + |i - (r - half)| <= half`. The last candidate
//! row lies at distance `half + 1` from the mask origin and is therefore
//! never kept; the mask is tested before the sample is read so that row is
//! never dereferenced.

use std::ops::{Range, RangeInclusive};

use log::debug;
use ndarray::ArrayView2;

use crate::error::{FilterError, Result};
use crate::gray::GrayImage;

/// Immutable filter configuration: odd size and derived half-width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    size: usize,
    half: usize,
}

impl FilterSpec {
    /// Create a spec for a positive odd `size`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidFilterSize(
                i64::try_from(size).unwrap_or(i64::MAX),
            ));
        }
        Ok(Self {
            size,
            half: size / 2,
        })
    }

    /// Create a spec from a signed size as typed on a command line.
    pub fn from_signed(size: i64) -> Result<Self> {
        let size = usize::try_from(size).map_err(|_| FilterError::InvalidFilterSize(size))?;
        Self::new(size)
    }

    /// Create a spec and check that it fits a `rows x cols` image.
    pub fn for_image(size: usize, rows: usize, cols: usize) -> Result<Self> {
        let spec = Self::new(size)?;
        spec.check_bounds(rows, cols)?;
        Ok(spec)
    }

    /// Fail unless the output region for `rows x cols` is non-empty.
    pub fn check_bounds(&self, rows: usize, cols: usize) -> Result<()> {
        if self.size > rows || self.size > cols {
            return Err(FilterError::FilterTooLarge {
                size: self.size,
                rows,
                cols,
            });
        }
        debug!(
            "diamond spec size={} half={} ({} samples) fits {}x{} -> {}x{}",
            self.size,
            self.half,
            self.mask_len(),
            rows,
            cols,
            self.out_rows(rows),
            self.out_cols(cols)
        );
        Ok(())
    }

    pub fn validate_for(&self, image: &GrayImage) -> Result<()> {
        self.check_bounds(image.rows(), image.cols())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Maximum L1 distance kept by the mask.
    #[inline]
    pub fn half(&self) -> usize {
        self.half
    }

    /// Output rows for an input with `rows` rows; zero when the filter does not fit.
    #[inline]
    pub fn out_rows(&self, rows: usize) -> usize {
        (rows + 1).saturating_sub(self.size)
    }

    /// Output columns for an input with `cols` columns; zero when the filter does not fit.
    #[inline]
    pub fn out_cols(&self, cols: usize) -> usize {
        (cols + 1).saturating_sub(self.size)
    }

    /// Candidate input rows for output row `i` (upper bound inclusive).
    #[inline]
    pub fn candidate_rows(&self, i: usize) -> RangeInclusive<usize> {
        i..=i + self.size
    }

    /// Candidate input columns for output column `j` (upper bound exclusive).
    #[inline]
    pub fn candidate_cols(&self, j: usize) -> Range<usize> {
        j..j + self.size
    }

    /// Diamond mask: is input `(r, c)` part of the window of output `(i, j)`?
    #[inline]
    pub fn includes(&self, i: usize, j: usize, r: usize, c: usize) -> bool {
        // |j - (c - half)| + |i - (r - half)| without signed arithmetic
        let dx = (j + self.half).abs_diff(c);
        let dy = (i + self.half).abs_diff(r);
        dx + dy <= self.half
    }

    /// Number of samples averaged per output pixel: `2h^2 + 2h + 1`.
    pub fn mask_len(&self) -> usize {
        2 * self.half * self.half + 2 * self.half + 1
    }
}

/// Truncating mean of the diamond window for output pixel `(i, j)`.
///
/// `(i, j)` must lie inside the output region of `input` for `spec`.
#[inline]
pub fn window_average(input: ArrayView2<u8>, spec: &FilterSpec, i: usize, j: usize) -> u8 {
    let mut sum = 0u32;
    let mut count = 0u32;

    for r in spec.candidate_rows(i) {
        for c in spec.candidate_cols(j) {
            if spec.includes(i, j, r, c) {
                sum += input[[r, c]] as u32;
                count += 1;
            }
        }
    }

    // count >= 1: the mask origin (i + half, j + half) is always kept
    (sum / count) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_spec_half() {
        assert_eq!(FilterSpec::new(1).unwrap().half(), 0);
        assert_eq!(FilterSpec::new(3).unwrap().half(), 1);
        assert_eq!(FilterSpec::new(7).unwrap().half(), 3);
    }

    #[test]
    fn test_spec_rejects_zero_and_even() {
        assert!(matches!(
            FilterSpec::new(0),
            Err(FilterError::InvalidFilterSize(0))
        ));
        assert!(matches!(
            FilterSpec::new(4),
            Err(FilterError::InvalidFilterSize(4))
        ));
        assert!(matches!(
            FilterSpec::from_signed(-3),
            Err(FilterError::InvalidFilterSize(-3))
        ));
    }

    #[test]
    fn test_huge_even_size_reported_positive() {
        let size = usize::MAX - 1;
        let expected = i64::try_from(size).unwrap_or(i64::MAX);
        assert!(matches!(
            FilterSpec::new(size),
            Err(FilterError::InvalidFilterSize(n)) if n == expected && n > 0
        ));
    }

    #[test]
    fn test_spec_rejects_oversized() {
        let err = FilterSpec::for_image(5, 4, 10).unwrap_err();
        assert!(matches!(
            err,
            FilterError::FilterTooLarge {
                size: 5,
                rows: 4,
                cols: 10
            }
        ));
        assert!(FilterSpec::for_image(5, 5, 5).is_ok());
    }

    #[test]
    fn test_output_bounds() {
        let spec = FilterSpec::new(3).unwrap();
        assert_eq!(spec.out_rows(5), 3);
        assert_eq!(spec.out_cols(8), 6);
        // Saturates instead of underflowing
        assert_eq!(spec.out_rows(1), 0);
    }

    #[test]
    fn test_mask_size_three_is_plus_shape() {
        let spec = FilterSpec::new(3).unwrap();
        let mut kept = Vec::new();
        for r in spec.candidate_rows(0) {
            for c in spec.candidate_cols(0) {
                if spec.includes(0, 0, r, c) {
                    kept.push((r, c));
                }
            }
        }
        assert_eq!(kept, vec![(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_mask_len_matches_enumeration() {
        for size in [1usize, 3, 5, 7, 9] {
            let spec = FilterSpec::new(size).unwrap();
            let kept = spec
                .candidate_rows(2)
                .flat_map(|r| spec.candidate_cols(4).map(move |c| (r, c)))
                .filter(|&(r, c)| spec.includes(2, 4, r, c))
                .count();
            assert_eq!(kept, spec.mask_len(), "size {size}");
        }
    }

    #[test]
    fn test_extra_candidate_row_never_kept() {
        let spec = FilterSpec::new(5).unwrap();
        let last = *spec.candidate_rows(3).end();
        for c in spec.candidate_cols(2) {
            assert!(!spec.includes(3, 2, last, c));
        }
    }

    #[test]
    fn test_window_average_centre_spike() {
        let input = Array2::from_shape_vec((3, 3), vec![0u8, 0, 0, 0, 9, 0, 0, 0, 0]).unwrap();
        let spec = FilterSpec::new(3).unwrap();
        // 9 / 5 samples
        assert_eq!(window_average(input.view(), &spec, 0, 0), 1);
    }

    #[test]
    fn test_window_average_ignores_corners() {
        let input =
            Array2::from_shape_vec((3, 3), vec![255u8, 10, 255, 10, 10, 10, 255, 10, 255]).unwrap();
        let spec = FilterSpec::new(3).unwrap();
        assert_eq!(window_average(input.view(), &spec, 0, 0), 10);
    }

    #[test]
    fn test_window_average_last_row_in_bounds() {
        // Output row 1 reaches candidate row 4, one past the image
        let input = Array2::from_elem((4, 3), 50u8);
        let spec = FilterSpec::new(3).unwrap();
        assert_eq!(spec.out_rows(4), 2);
        assert_eq!(window_average(input.view(), &spec, 1, 0), 50);
    }
}

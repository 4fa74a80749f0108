//! WebAssembly exports for the diamond filter.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::filters::diamond::FilterSpec;
use crate::filters::executor::ExecMode;
use crate::gray::GrayImage;

/// Apply the diamond averaging filter to a grayscale image.
///
/// # Arguments
/// * `data` - Flat array of gray bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `size` - Positive odd filter size
/// * `parallel` - Use the data-parallel executor
///
/// # Returns
/// Flat array of `(height - size + 1) * (width - size + 1)` gray bytes
#[wasm_bindgen]
pub fn diamond_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    size: usize,
    parallel: bool,
) -> Result<Vec<u8>, JsValue> {
    let to_js = |e: crate::FilterError| JsValue::from_str(&e.to_string());

    let input = GrayImage::from_vec(height, width, data.to_vec()).map_err(to_js)?;
    let spec = FilterSpec::for_image(size, height, width).map_err(to_js)?;
    let mode = if parallel {
        ExecMode::Parallel
    } else {
        ExecMode::Sequential
    };

    let result = mode
        .executor(None)
        .and_then(|executor| executor.compute(&input, &spec))
        .map_err(to_js)?;
    Ok(result.into_vec())
}

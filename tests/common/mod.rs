//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use diamond_filter::GrayImage;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random image (LCG), seeded per test.
pub fn noise_image(rows: usize, cols: usize, seed: u32) -> GrayImage {
    let mut state = seed;
    let data = (0..rows * cols)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    GrayImage::from_vec(rows, cols, data).unwrap()
}

/// Horizontal ramp: sample (r, c) = (r * 7 + c * 13) mod 256.
pub fn ramp_image(rows: usize, cols: usize) -> GrayImage {
    let data = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| ((r * 7 + c * 13) % 256) as u8))
        .collect();
    GrayImage::from_vec(rows, cols, data).unwrap()
}

/// Unique path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("diamond_filter_it_{}_{name}", std::process::id()))
}

//! Filter modules.
//!
//! ## Diamond averaging filter
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`diamond`] | `FilterSpec`, diamond mask and the per-pixel window kernel |
//! | [`executor`] | `Executor` trait with sequential and rayon-parallel strategies |
//!
//! ## Architecture
//!
//! - **Single kernel** - Both executors call the same `window_average`
//! - **Valid region only** - No padding; output shrinks by `size - 1` per axis
//! - **Integer math** - `u32` accumulation and truncating division, so
//!   executors agree bit for bit
//! - **Thread-safe** - Input is shared read-only, each task owns one output slot

pub mod diamond;
pub mod executor;

//! Runtime vector lane width detection.
//!
//! Path storage packs W simulated paths into one vector lane so the
//! evolution loops vectorise across paths. W is a property of the machine
//! the process is running on, not of the build, so it is detected once at
//! runtime and every piece of index arithmetic in the engine is
//! parameterised by it.

use std::sync::OnceLock;

static LANE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Returns the number of `f64` values processed per vector lane.
///
/// Detected once per process and cached:
///
/// - x86_64: 8 with AVX-512, 4 with AVX, otherwise 2 (SSE2 baseline)
/// - aarch64: 2 (128-bit NEON)
/// - other targets: 2
///
/// This is also the minimum path count granularity: every block's path
/// count, and the total path count, must be a multiple of this value.
///
/// # Examples
///
/// ```
/// use simkit_engine::lanes::lane_width;
///
/// let w = lane_width();
/// assert!(w.is_power_of_two());
/// assert!(w >= 2);
/// ```
#[inline]
pub fn lane_width() -> usize {
    *LANE_WIDTH.get_or_init(detect_lane_width)
}

#[cfg(target_arch = "x86_64")]
fn detect_lane_width() -> usize {
    if is_x86_feature_detected!("avx512f") {
        8
    } else if is_x86_feature_detected!("avx") {
        4
    } else {
        2
    }
}

#[cfg(target_arch = "aarch64")]
fn detect_lane_width() -> usize {
    2
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_lane_width() -> usize {
    2
}

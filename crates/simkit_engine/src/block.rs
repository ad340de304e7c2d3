//! Vector-lane-aligned path storage.
//!
//! [`PathBlock`] owns a fixed grid of partially-simulated values for
//! (paths × factors × steps). Paths are packed W at a time into vector
//! lanes, so the buffer is indexed `[factor][step][path-group][lane]` and
//! every slot holds exactly one value per path.
//!
//! The same slot is used twice per simulation: a shock source writes the
//! random normal variate for (factor, step, path) into it, then the
//! owning process overwrites it in place with the simulated level. This
//! single-buffer reuse keeps each process a pure in-place transform with
//! no second allocation.
//!
//! # Memory Layout
//!
//! ```text
//! offset(factor, step, group) = ((factor * steps + step) * groups + group) * W
//! ```
//!
//! so one factor's data is contiguous, one step within a factor is
//! contiguous, and one lane is W adjacent `f64`s ready for vector loads.

use crate::error::EngineError;
use crate::lanes::lane_width;

/// Fixed-size, vector-aligned grid of simulated values.
///
/// Exclusively owned by its [`BlockSet`](crate::block_set::BlockSet);
/// storage is released exactly once, either explicitly via
/// [`release`](Self::release) or on drop.
///
/// # Invariants
///
/// - `paths % lane_width() == 0`
/// - buffer holds `factors × steps × paths` values, grouped into
///   `factors × steps × (paths / W)` lanes
///
/// # Examples
///
/// ```
/// use simkit_engine::block::PathBlock;
/// use simkit_engine::lanes::lane_width;
///
/// let w = lane_width();
/// let mut block = PathBlock::new(4 * w, 2, 3).unwrap();
///
/// // Write one lane in place.
/// for v in block.lane_mut(1, 2, 0) {
///     *v = 100.0;
/// }
/// assert_eq!(block.lane(1, 2, 0)[0], 100.0);
/// ```
#[derive(Debug)]
pub struct PathBlock {
    paths: usize,
    factors: usize,
    steps: usize,
    width: usize,
    groups: usize,
    buffer: Vec<f64>,
    released: bool,
}

impl PathBlock {
    /// Allocates a zero-initialised block for `paths` paths.
    ///
    /// # Errors
    ///
    /// `EngineError::Alignment` if `paths` is zero or not a multiple of
    /// the detected lane width. Nothing is allocated on failure.
    pub fn new(paths: usize, factors: usize, steps: usize) -> Result<Self, EngineError> {
        let width = lane_width();
        if paths == 0 || paths % width != 0 {
            return Err(EngineError::Alignment { paths, width });
        }
        let groups = paths / width;
        Ok(Self {
            paths,
            factors,
            steps,
            width,
            groups,
            buffer: vec![0.0; factors * steps * paths],
            released: false,
        })
    }

    /// Number of paths stored in this block.
    #[inline]
    pub fn paths(&self) -> usize {
        self.paths
    }

    /// Number of simulated factors.
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Number of time steps (including the anchor step 0).
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Vector lane width this block was built with.
    #[inline]
    pub fn lane_width(&self) -> usize {
        self.width
    }

    /// Number of W-wide path groups (`paths / W`).
    #[inline]
    pub fn path_groups(&self) -> usize {
        self.groups
    }

    /// Whether storage has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Flat buffer offset of the lane for (factor, step, path group).
    ///
    /// Width-parametric: callers must never hard-code W.
    #[inline]
    pub fn offset(&self, factor: usize, step: usize, group: usize) -> usize {
        debug_assert!(factor < self.factors);
        debug_assert!(step < self.steps);
        debug_assert!(group < self.groups);
        ((factor * self.steps + step) * self.groups + group) * self.width
    }

    /// The W-wide lane for (factor, step, path group).
    #[inline]
    pub fn lane(&self, factor: usize, step: usize, group: usize) -> &[f64] {
        let offset = self.offset(factor, step, group);
        &self.buffer[offset..offset + self.width]
    }

    /// Mutable W-wide lane for (factor, step, path group).
    ///
    /// Holds the pre-loaded shock before a process runs and the simulated
    /// level afterwards.
    #[inline]
    pub fn lane_mut(&mut self, factor: usize, step: usize, group: usize) -> &mut [f64] {
        let offset = self.offset(factor, step, group);
        &mut self.buffer[offset..offset + self.width]
    }

    /// The contiguous `steps × paths` plane for one factor.
    #[inline]
    pub fn factor_plane(&self, factor: usize) -> &[f64] {
        let plane = self.steps * self.paths;
        &self.buffer[factor * plane..(factor + 1) * plane]
    }

    /// Mutable plane for one factor, used by shock sources to bulk-fill
    /// variates.
    #[inline]
    pub fn factor_plane_mut(&mut self, factor: usize) -> &mut [f64] {
        let plane = self.steps * self.paths;
        &mut self.buffer[factor * plane..(factor + 1) * plane]
    }

    /// The whole storage buffer, for bulk shock filling.
    #[inline]
    pub fn storage_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    /// Convenience scalar read for (factor, step, path).
    #[inline]
    pub fn value(&self, factor: usize, step: usize, path: usize) -> f64 {
        debug_assert!(path < self.paths);
        let group = path / self.width;
        let slot = path % self.width;
        self.buffer[self.offset(factor, step, group) + slot]
    }

    /// Releases the storage buffer.
    ///
    /// Idempotent: the first call frees the buffer, repeat calls are
    /// no-ops. Also runs on drop, so every exit path releases exactly
    /// once.
    pub fn release(&mut self) {
        if !self.released {
            self.buffer = Vec::new();
            self.released = true;
        }
    }
}

impl Drop for PathBlock {
    fn drop(&mut self) {
        self.release();
    }
}

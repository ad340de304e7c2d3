//! Partitioning of the full path count into vector-aligned blocks.
//!
//! [`BlockSet`] splits the requested number of paths into roughly
//! `blocks-per-thread × hardware-parallelism` [`PathBlock`]s (two per
//! thread by default), each still a multiple of the lane width. The
//! oversupply gives the scheduler enough granularity for load balancing
//! while keeping per-block overhead low.

use crate::block::PathBlock;
use crate::error::EngineError;
use crate::lanes::lane_width;

/// Owning partition of the full path count into [`PathBlock`]s.
///
/// Factors and steps are uniform across blocks and fixed at construction;
/// block path counts sum to the requested total. Created once per run
/// after the feature freeze, disposed once at run end (or by RAII on any
/// error path), cascading to every block.
///
/// # Examples
///
/// ```
/// use simkit_engine::block_set::BlockSet;
/// use simkit_engine::lanes::lane_width;
///
/// let w = lane_width();
/// let set = BlockSet::new(64 * w, 2, 10).unwrap();
///
/// let total: usize = set.iter().map(|b| b.paths()).sum();
/// assert_eq!(total, 64 * w);
/// ```
#[derive(Debug)]
pub struct BlockSet {
    blocks: Vec<PathBlock>,
    n_paths: usize,
    factors: usize,
    steps: usize,
}

impl BlockSet {
    /// Partitions `n_paths` into blocks sized for the current machine.
    ///
    /// Targets `2 × available parallelism` blocks, clamped to the number
    /// of whole path groups available.
    ///
    /// # Errors
    ///
    /// `EngineError::Alignment` if `n_paths` is zero or not a multiple of
    /// [`lane_width`]. No partial state is created on failure.
    pub fn new(n_paths: usize, factors: usize, steps: usize) -> Result<Self, EngineError> {
        let target = 2 * num_cpus::get().max(1);
        Self::with_target_blocks(n_paths, factors, steps, target)
    }

    /// Partitions `n_paths` into at most `target_blocks` blocks.
    ///
    /// Exposed for tests and callers that manage their own scheduling;
    /// production code should prefer [`new`](Self::new).
    pub fn with_target_blocks(
        n_paths: usize,
        factors: usize,
        steps: usize,
        target_blocks: usize,
    ) -> Result<Self, EngineError> {
        let width = lane_width();
        if n_paths == 0 || n_paths % width != 0 {
            return Err(EngineError::Alignment {
                paths: n_paths,
                width,
            });
        }

        let groups = n_paths / width;
        let n_blocks = target_blocks.max(1).min(groups);
        let base = groups / n_blocks;
        let remainder = groups % n_blocks;

        let mut blocks = Vec::with_capacity(n_blocks);
        for i in 0..n_blocks {
            let block_groups = base + usize::from(i < remainder);
            blocks.push(PathBlock::new(block_groups * width, factors, steps)?);
        }

        Ok(Self {
            blocks,
            n_paths,
            factors,
            steps,
        })
    }

    /// Total number of paths across all blocks.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of simulated factors (uniform across blocks).
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Number of time steps (uniform across blocks).
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of blocks in the partition.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the set holds no blocks (only after release).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Forward iteration over the blocks.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PathBlock> {
        self.blocks.iter()
    }

    /// Mutable forward iteration over the blocks.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PathBlock> {
        self.blocks.iter_mut()
    }

    /// Mutable slice of blocks, the unit of parallel dispatch.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [PathBlock] {
        &mut self.blocks
    }

    /// Scalar read of the simulated level for a global path index.
    ///
    /// Walks the partition to find the owning block. Returns `None` when
    /// `path`, `factor` or `step` is out of range. Intended for consumers
    /// and tests; hot loops should iterate blocks directly.
    pub fn value(&self, factor: usize, step: usize, path: usize) -> Option<f64> {
        if factor >= self.factors || step >= self.steps {
            return None;
        }
        let mut offset = 0;
        for block in &self.blocks {
            if path < offset + block.paths() {
                return Some(block.value(factor, step, path - offset));
            }
            offset += block.paths();
        }
        None
    }

    /// Releases every block and clears internal state.
    ///
    /// Idempotent: repeat calls are no-ops. Also runs on drop.
    pub fn release(&mut self) {
        for block in &mut self.blocks {
            block.release();
        }
        self.blocks.clear();
    }
}

impl Drop for BlockSet {
    fn drop(&mut self) {
        self.release();
    }
}

impl<'a> IntoIterator for &'a BlockSet {
    type Item = &'a PathBlock;
    type IntoIter = std::slice::Iter<'a, PathBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

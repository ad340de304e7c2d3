//! Shock pre-fill for path blocks.
//!
//! The engine does not own random number generation: variates are written
//! into each block's factor slots by a caller-supplied [`ShockSource`]
//! before any process evolves the block. The same slots are then
//! overwritten in place with simulated levels.
//!
//! Per-block seeding keyed by block index makes the fill independent of
//! dispatch order, which is what keeps parallel and sequential runs
//! bit-identical.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::block::PathBlock;
use crate::error::EngineError;

/// Writes random variates into a block before simulation.
///
/// `block_index` is the block's position in the
/// [`BlockSet`](crate::block_set::BlockSet); implementations must derive
/// their randomness from it (not from call order) so that results do not
/// depend on scheduling.
pub trait ShockSource: Send + Sync {
    /// Fills every (factor, step, path) slot of the block with a variate.
    fn fill(&self, block_index: usize, block: &mut PathBlock) -> Result<(), EngineError>;
}

/// Standard normal shocks from a seeded PRNG.
///
/// Each block draws from its own child generator seeded by mixing the run
/// seed with the block index, so a block's variates are a pure function
/// of `(seed, block_index)`.
///
/// # Examples
///
/// ```
/// use simkit_engine::block::PathBlock;
/// use simkit_engine::lanes::lane_width;
/// use simkit_engine::shocks::{NormalShocks, ShockSource};
///
/// let source = NormalShocks::new(42);
/// let mut block = PathBlock::new(lane_width(), 1, 4).unwrap();
/// source.fill(0, &mut block).unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NormalShocks {
    seed: u64,
}

impl NormalShocks {
    /// Creates a source with the given run seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// The run seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn block_seed(&self, block_index: usize) -> u64 {
        splitmix64(self.seed ^ splitmix64(block_index as u64))
    }
}

impl ShockSource for NormalShocks {
    fn fill(&self, block_index: usize, block: &mut PathBlock) -> Result<(), EngineError> {
        let mut rng = StdRng::seed_from_u64(self.block_seed(block_index));
        for slot in block.storage_mut() {
            *slot = StandardNormal.sample(&mut rng);
        }
        Ok(())
    }
}

/// All-zero shocks: the simulation reduces to its deterministic drift.
///
/// Used to verify that the drift term alone reproduces the forward curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroShocks;

impl ShockSource for ZeroShocks {
    fn fill(&self, _block_index: usize, block: &mut PathBlock) -> Result<(), EngineError> {
        block.storage_mut().fill(0.0);
        Ok(())
    }
}

/// SplitMix64 finaliser, used to decorrelate per-block child seeds.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

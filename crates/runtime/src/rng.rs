//! Default reward randomness.

use std::ops::Range;

use game_core::RewardRng;
use rand::Rng;

/// Draws rewards from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRewardRng;

impl RewardRng for ThreadRewardRng {
    fn sample(&mut self, range: Range<u64>) -> u64 {
        if range.is_empty() {
            return range.start;
        }
        rand::thread_rng().gen_range(range)
    }
}

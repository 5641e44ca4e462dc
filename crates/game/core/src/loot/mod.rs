//! Loot point classification and reward sampling.
//!
//! Rewards are drawn from the range of the point's tier. The random source is
//! injected through [`RewardRng`] so the rules stay deterministic under test.
mod rng;

pub use rng::{PcgRng, RewardRng};

use crate::config::LootTable;

/// Reward tier of a loot point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LootTier {
    Standard,
    High,
}

impl LootTier {
    /// Classifies a point id against the high-tier threshold.
    ///
    /// Only the leading (optionally signed) decimal digits count, so `"72b"`
    /// is point 72. Ids without a numeric prefix fall into the standard tier.
    pub fn classify(point_id: &str, high_tier_threshold: i64) -> Self {
        match leading_integer(point_id) {
            Some(id) if id >= high_tier_threshold => LootTier::High,
            _ => LootTier::Standard,
        }
    }

    /// Recovers the tier from a paid-out amount.
    pub fn of_reward(amount: u64, table: &LootTable) -> Option<Self> {
        if table.high.contains(&amount) {
            Some(LootTier::High)
        } else if table.standard.contains(&amount) {
            Some(LootTier::Standard)
        } else {
            None
        }
    }
}

/// Draws a reward for `point_id` from the matching tier range.
pub fn roll_reward(table: &LootTable, point_id: &str, rng: &mut dyn RewardRng) -> u64 {
    rng.sample(table.range(table.tier(point_id)))
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate on absurdly long ids; they are far past any threshold either way.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

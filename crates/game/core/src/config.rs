use core::ops::Range;

use crate::loot::LootTier;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub loot: LootTable,
}

/// Reward ranges per loot tier.
///
/// The two ranges never overlap, so the tier of a payout can always be read
/// back from the amount alone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTable {
    /// Point ids at or above this value pay out from the high tier.
    pub high_tier_threshold: i64,
    pub standard: Range<u64>,
    pub high: Range<u64>,
}

impl LootTable {
    pub const DEFAULT_HIGH_TIER_THRESHOLD: i64 = 61;
    pub const DEFAULT_STANDARD: Range<u64> = 10_000..30_000;
    pub const DEFAULT_HIGH: Range<u64> = 200_000..350_000;

    pub fn new() -> Self {
        Self {
            high_tier_threshold: Self::DEFAULT_HIGH_TIER_THRESHOLD,
            standard: Self::DEFAULT_STANDARD,
            high: Self::DEFAULT_HIGH,
        }
    }

    pub fn with_high_tier_threshold(mut self, threshold: i64) -> Self {
        self.high_tier_threshold = threshold;
        self
    }

    pub fn range(&self, tier: LootTier) -> Range<u64> {
        match tier {
            LootTier::Standard => self.standard.clone(),
            LootTier::High => self.high.clone(),
        }
    }

    /// Classifies a loot point using this table's threshold.
    pub fn tier(&self, point_id: &str) -> LootTier {
        LootTier::classify(point_id, self.high_tier_threshold)
    }
}

impl Default for LootTable {
    fn default() -> Self {
        Self::new()
    }
}

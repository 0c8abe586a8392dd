//! Scan tiers and per-rarity discovery chances.
//!
//! Three scan tiers (quick, deep, full) trade energy and cooldown for a
//! higher per-rarity discovery probability. Chances increase monotonically
//! across tiers and reach 100% at the full tier for every rarity.

use serde::{Deserialize, Serialize};

/// Item/pattern rarity bracket. Resources map their tier 1–5 onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];
}

/// A scan depth. Deeper scans cost more energy, cool down longer, and
/// discover rarer patterns more reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanTier {
    Quick,
    Deep,
    Full,
}

impl ScanTier {
    pub const ALL: [ScanTier; 3] = [ScanTier::Quick, ScanTier::Deep, ScanTier::Full];

    pub fn energy_cost(&self) -> u32 {
        match self {
            ScanTier::Quick => 0,
            ScanTier::Deep => 10,
            ScanTier::Full => 50,
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        match self {
            ScanTier::Quick => 500,
            ScanTier::Deep => 1000,
            ScanTier::Full => 2000,
        }
    }

    /// Whether a failed roll at this tier reveals the pattern's hint text.
    pub fn reveals_hints(&self) -> bool {
        !matches!(self, ScanTier::Quick)
    }

    /// Base discovery probability for a pattern of the given rarity.
    pub fn base_chance(&self, rarity: Rarity) -> f32 {
        match self {
            ScanTier::Quick => match rarity {
                Rarity::Common => 0.50,
                Rarity::Uncommon => 0.30,
                Rarity::Rare => 0.15,
                Rarity::Epic => 0.05,
                Rarity::Legendary => 0.02,
            },
            ScanTier::Deep => match rarity {
                Rarity::Common => 0.80,
                Rarity::Uncommon => 0.60,
                Rarity::Rare => 0.40,
                Rarity::Epic => 0.20,
                Rarity::Legendary => 0.10,
            },
            ScanTier::Full => 1.0,
        }
    }
}

/// Effective discovery chance: `base × (1 + scan_power × 0.01)`, capped at 1.
pub fn discovery_chance(tier: ScanTier, rarity: Rarity, scan_power: u32) -> f32 {
    (tier.base_chance(rarity) * (1.0 + scan_power as f32 * 0.01)).min(1.0)
}

//! Enemy templates and instance scaling.
//!
//! Templates are the immutable source; [`Enemy`] instances are produced by
//! scaling base stats by `1 + 0.05 × (level − base_level)` and carry a
//! fresh identity. An instance is owned by the encounter that spawned it
//! and discarded when its combat session ends.

use gridfall_logic::encounter::level_multiplier;
use serde::{Deserialize, Serialize};

/// Broad movement/attack disposition, consumed by the combat AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Closes distance and attacks on contact.
    Aggressive,
    /// Holds position until the player comes adjacent.
    Territorial,
}

/// Ability tags that let an enemy apply a status on a successful hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityTag {
    /// 25% chance to poison (strength 2, 3 turns).
    Venom,
    /// 15% chance to crack the player's guard, leaving them vulnerable
    /// (strength 15%, 2 turns).
    Stagger,
    /// 20% chance to weaken attack power (strength 20%, 2 turns).
    Corrode,
}

/// One entry of an enemy's loot table. Rolled independently on victory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootEntry {
    pub item_id: &'static str,
    /// Independent drop probability, 0.0–1.0.
    pub chance: f32,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

/// Immutable enemy definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    /// Strength bracket 1–4.
    pub tier: u8,
    /// Level the base stats are authored at.
    pub base_level: u32,
    pub base_health: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_xp_reward: u32,
    pub behavior: Behavior,
    pub abilities: &'static [AbilityTag],
    pub loot: &'static [LootEntry],
}

/// A live enemy instance, scaled from its template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique within the spawning encounter.
    pub id: u32,
    pub template_id: String,
    pub name: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub xp_reward: u32,
    pub behavior: Behavior,
}

impl EnemyTemplate {
    /// Scale this template into a live instance at `level`.
    pub fn instantiate(&self, id: u32, level: u32) -> Enemy {
        let mult = level_multiplier(self.base_level, level);
        let scale = |stat: u32| ((stat as f32 * mult).floor() as u32).max(1);
        let health = scale(self.base_health);
        Enemy {
            id,
            template_id: self.id.to_string(),
            name: self.name.to_string(),
            level,
            health,
            max_health: health,
            attack: scale(self.base_attack),
            defense: scale(self.base_defense),
            xp_reward: scale(self.base_xp_reward),
            behavior: self.behavior,
        }
    }
}

const ENEMIES: &[EnemyTemplate] = &[
    EnemyTemplate {
        id: "data-drone",
        name: "Data Drone",
        tier: 1,
        base_level: 1,
        base_health: 30,
        base_attack: 5,
        base_defense: 2,
        base_xp_reward: 10,
        behavior: Behavior::Aggressive,
        abilities: &[],
        loot: &[LootEntry {
            item_id: "scrap-alloy",
            chance: 0.5,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
    EnemyTemplate {
        id: "scrap-crawler",
        name: "Scrap Crawler",
        tier: 1,
        base_level: 1,
        base_health: 40,
        base_attack: 4,
        base_defense: 4,
        base_xp_reward: 12,
        behavior: Behavior::Territorial,
        abilities: &[],
        loot: &[
            LootEntry {
                item_id: "bio-gel",
                chance: 0.6,
                min_quantity: 1,
                max_quantity: 3,
            },
            LootEntry {
                item_id: "scrap-alloy",
                chance: 0.3,
                min_quantity: 1,
                max_quantity: 1,
            },
        ],
    },
    EnemyTemplate {
        id: "rust-stalker",
        name: "Rust Stalker",
        tier: 2,
        base_level: 15,
        base_health: 70,
        base_attack: 10,
        base_defense: 5,
        base_xp_reward: 25,
        behavior: Behavior::Aggressive,
        abilities: &[AbilityTag::Venom],
        loot: &[LootEntry {
            item_id: "circuit-shard",
            chance: 0.45,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
    EnemyTemplate {
        id: "signal-wraith",
        name: "Signal Wraith",
        tier: 2,
        base_level: 15,
        base_health: 55,
        base_attack: 14,
        base_defense: 3,
        base_xp_reward: 28,
        behavior: Behavior::Aggressive,
        abilities: &[AbilityTag::Corrode],
        loot: &[LootEntry {
            item_id: "circuit-shard",
            chance: 0.55,
            min_quantity: 1,
            max_quantity: 3,
        }],
    },
    EnemyTemplate {
        id: "core-sentinel",
        name: "Core Sentinel",
        tier: 3,
        base_level: 35,
        base_health: 140,
        base_attack: 18,
        base_defense: 12,
        base_xp_reward: 60,
        behavior: Behavior::Territorial,
        abilities: &[AbilityTag::Stagger],
        loot: &[LootEntry {
            item_id: "flux-crystal",
            chance: 0.4,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
    EnemyTemplate {
        id: "void-manta",
        name: "Void Manta",
        tier: 3,
        base_level: 35,
        base_health: 110,
        base_attack: 24,
        base_defense: 8,
        base_xp_reward: 65,
        behavior: Behavior::Aggressive,
        abilities: &[AbilityTag::Venom],
        loot: &[LootEntry {
            item_id: "flux-crystal",
            chance: 0.5,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
    EnemyTemplate {
        id: "nexus-guardian",
        name: "Nexus Guardian",
        tier: 4,
        base_level: 55,
        base_health: 260,
        base_attack: 32,
        base_defense: 18,
        base_xp_reward: 140,
        behavior: Behavior::Territorial,
        abilities: &[AbilityTag::Stagger, AbilityTag::Corrode],
        loot: &[LootEntry {
            item_id: "void-essence",
            chance: 0.5,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
    EnemyTemplate {
        id: "grid-reaper",
        name: "Grid Reaper",
        tier: 4,
        base_level: 55,
        base_health: 220,
        base_attack: 40,
        base_defense: 12,
        base_xp_reward: 150,
        behavior: Behavior::Aggressive,
        abilities: &[AbilityTag::Venom, AbilityTag::Corrode],
        loot: &[LootEntry {
            item_id: "void-essence",
            chance: 0.6,
            min_quantity: 1,
            max_quantity: 2,
        }],
    },
];

/// The rare boss that can override normal tier selection in the deep rows.
static BOSS: EnemyTemplate = EnemyTemplate {
    id: "archon-prime",
    name: "Archon Prime",
    tier: 4,
    base_level: 60,
    base_health: 500,
    base_attack: 50,
    base_defense: 25,
    base_xp_reward: 400,
    behavior: Behavior::Aggressive,
    abilities: &[AbilityTag::Stagger, AbilityTag::Venom],
    loot: &[
        LootEntry {
            item_id: "prime-core",
            chance: 1.0,
            min_quantity: 1,
            max_quantity: 1,
        },
        LootEntry {
            item_id: "void-essence",
            chance: 0.8,
            min_quantity: 2,
            max_quantity: 4,
        },
    ],
};

/// Look up a template by id, the boss included. Fails closed on unknown
/// ids.
pub fn enemy_template(id: &str) -> Option<&'static EnemyTemplate> {
    ENEMIES
        .iter()
        .chain(std::iter::once(&BOSS))
        .find(|t| t.id == id)
}

/// All templates in a tier (1–4), in definition order.
pub fn templates_in_tier(tier: u8) -> Vec<&'static EnemyTemplate> {
    ENEMIES.iter().filter(|t| t.tier == tier).collect()
}

/// The boss template.
pub fn boss_template() -> &'static EnemyTemplate {
    &BOSS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_drone_at_base_level() {
        let t = enemy_template("data-drone").unwrap();
        let e = t.instantiate(0, 1);
        assert_eq!(e.health, 30, "level multiplier is 1.0 at base level");
        assert_eq!(e.max_health, 30);
        assert_eq!(e.xp_reward, 10);
    }

    #[test]
    fn scaling_above_base() {
        let t = enemy_template("data-drone").unwrap();
        let e = t.instantiate(0, 11);
        // mult = 1 + 0.05 × 10 = 1.5
        assert_eq!(e.health, 45);
        assert_eq!(e.attack, 7);
    }

    #[test]
    fn unknown_id_fails_closed() {
        assert!(enemy_template("no-such-enemy").is_none());
    }

    #[test]
    fn boss_resolves_by_id() {
        let t = enemy_template("archon-prime").unwrap();
        assert_eq!(t.base_health, 500);
        assert!(t
            .loot
            .iter()
            .any(|l| l.item_id == "prime-core" && (l.chance - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn every_tier_populated() {
        for tier in 1..=4 {
            assert!(!templates_in_tier(tier).is_empty(), "tier {tier}");
        }
    }

    #[test]
    fn loot_probabilities_valid() {
        for t in ENEMIES.iter().chain(std::iter::once(&BOSS)) {
            for entry in t.loot {
                assert!(entry.chance > 0.0 && entry.chance <= 1.0);
                assert!(entry.min_quantity <= entry.max_quantity);
            }
        }
    }
}

//! XP curve, level resolution, stat growth, and energy regeneration.
//!
//! Levels follow `xp_for_level(n) = floor(100 × (n-1)^1.5)` up to a hard
//! ceiling of level 100. Each level crossed grants fixed stat deltas,
//! tripled on milestone levels, and refills health and energy to the new
//! maximum (a deliberate design choice, not merely a capacity increase).

use serde::{Deserialize, Serialize};

/// Hard level ceiling; levels above this are not defined.
pub const MAX_LEVEL: u32 = 100;

/// Levels at which per-level stat gains are tripled.
pub const MILESTONE_LEVELS: [u32; 5] = [10, 25, 50, 75, 100];

/// Per-level stat gains.
pub const GAIN_ENERGY: u32 = 2;
pub const GAIN_HEALTH: u32 = 5;
pub const GAIN_ATTACK: u32 = 1;
pub const GAIN_DEFENSE: u32 = 1;
pub const GAIN_SCAN_POWER: u32 = 1;

/// Multiplier applied to the per-level gains on milestone levels.
pub const MILESTONE_MULTIPLIER: u32 = 3;

/// Delay after an energy-spending action before regeneration starts.
pub const REGEN_DELAY_MS: u64 = 2000;

/// Default energy regeneration rate, points per second.
pub const REGEN_RATE_PER_SEC: f32 = 1.0;

/// Energy cost threshold to attempt an escape from combat.
pub const ESCAPE_ENERGY_COST: u32 = 25;

/// The player's progression and combat statistics.
///
/// Invariants: `0 ≤ health ≤ max_health`, `0 ≤ energy ≤ max_energy`, and
/// `experience < experience_to_next_level` immediately after any level
/// resolution (below the ceiling). Constructed once at session start and
/// mutated only by progression and combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    /// XP accumulated toward the next level (remainder, not lifetime total).
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub energy: u32,
    pub max_energy: u32,
    pub health: u32,
    pub max_health: u32,
    pub attack_power: u32,
    pub defense: u32,
    /// Critical hit probability, 0.0–1.0.
    pub crit_chance: f32,
    /// Critical damage multiplier, ≥ 1.0.
    pub crit_damage: f32,
    pub scan_power: u32,
    pub total_moves: u64,
    pub total_distance: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStats {
    /// Fresh level-1 stats.
    pub fn new() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next_level: xp_for_level(2),
            energy: 100,
            max_energy: 100,
            health: 100,
            max_health: 100,
            attack_power: 10,
            defense: 5,
            crit_chance: 0.05,
            crit_damage: 1.5,
            scan_power: 1,
            total_moves: 0,
            total_distance: 0,
        }
    }

    /// Spend `amount` energy, failing without mutation if short.
    pub fn spend_energy(&mut self, amount: u32) -> bool {
        if self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Apply `amount` damage, clamping health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Heal, clamping at max health.
    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// XP required to advance *into* level `n`: `floor(100 × (n-1)^1.5)`,
/// zero for level 1. Monotonically increasing for n ≥ 2.
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    (100.0 * f64::from(level - 1).powf(1.5)).floor() as u64
}

/// Lifetime XP needed to have reached level `n` from level 1.
pub fn total_xp_for_level(level: u32) -> u64 {
    (2..=level.min(MAX_LEVEL)).map(xp_for_level).sum()
}

/// A resolved level position on the XP curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    /// XP remaining after consuming every completed level.
    pub current_xp: u64,
    /// XP needed for the next level; zero at the ceiling.
    pub xp_for_next_level: u64,
}

/// Walk the curve from level 1, consuming `xp_for_level(level + 1)` each
/// step. Idempotent: the same total always resolves to the same result.
pub fn level_from_total_xp(total: u64) -> LevelInfo {
    let mut level = 1;
    let mut remaining = total;
    while level < MAX_LEVEL {
        let needed = xp_for_level(level + 1);
        if remaining < needed {
            return LevelInfo {
                level,
                current_xp: remaining,
                xp_for_next_level: needed,
            };
        }
        remaining -= needed;
        level += 1;
    }
    LevelInfo {
        level: MAX_LEVEL,
        current_xp: remaining,
        xp_for_next_level: 0,
    }
}

/// Outcome of [`add_xp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpResult {
    pub leveled_up: bool,
    pub new_level: u32,
    pub levels_gained: u32,
}

/// Grant XP and resolve any level-ups.
///
/// Each level crossed grants the fixed per-level deltas (tripled on
/// milestone levels), and health/energy are refilled to the new maximum
/// on every gained level.
pub fn add_xp(stats: &mut PlayerStats, gained: u64) -> LevelUpResult {
    let total = total_xp_for_level(stats.level) + stats.experience + gained;
    let info = level_from_total_xp(total);

    let old_level = stats.level;
    for crossed in (old_level + 1)..=info.level {
        let mult = if MILESTONE_LEVELS.contains(&crossed) {
            MILESTONE_MULTIPLIER
        } else {
            1
        };
        stats.max_energy += GAIN_ENERGY * mult;
        stats.max_health += GAIN_HEALTH * mult;
        stats.attack_power += GAIN_ATTACK * mult;
        stats.defense += GAIN_DEFENSE * mult;
        stats.scan_power += GAIN_SCAN_POWER * mult;
    }

    stats.level = info.level;
    stats.experience = info.current_xp;
    stats.experience_to_next_level = info.xp_for_next_level;

    if info.level > old_level {
        stats.health = stats.max_health;
        stats.energy = stats.max_energy;
    }

    LevelUpResult {
        leveled_up: info.level > old_level,
        new_level: info.level,
        levels_gained: info.level - old_level,
    }
}

/// Energy regained after `since_use_ms` without spending energy:
/// `floor(max(0, elapsed − regen delay) × rate)`. The caller clamps to max
/// via [`apply_energy_regen`].
pub fn energy_regen(since_use_ms: u64, rate_per_sec: f32) -> u32 {
    let effective_ms = since_use_ms.saturating_sub(REGEN_DELAY_MS);
    ((effective_ms as f64 / 1000.0) * f64::from(rate_per_sec)).floor() as u32
}

/// Apply regeneration to `stats`, clamped to `max_energy`. Returns the
/// amount actually restored.
pub fn apply_energy_regen(stats: &mut PlayerStats, since_use_ms: u64, rate_per_sec: f32) -> u32 {
    let regen = energy_regen(since_use_ms, rate_per_sec);
    let restored = regen.min(stats.max_energy - stats.energy);
    stats.energy += restored;
    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_known_values() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100);
        assert_eq!(xp_for_level(3), 282); // floor(100 × 2^1.5)
    }

    #[test]
    fn curve_monotonic() {
        for n in 1..MAX_LEVEL {
            assert!(
                xp_for_level(n + 1) > xp_for_level(n) || n == 1,
                "curve must increase at level {n}"
            );
        }
    }

    #[test]
    fn level_resolution_round_trip() {
        for n in [1, 2, 10, 37, 99, 100] {
            let info = level_from_total_xp(total_xp_for_level(n));
            assert_eq!(info.level, n);
            assert_eq!(info.current_xp, 0);
        }
    }

    #[test]
    fn level_resolution_idempotent() {
        let a = level_from_total_xp(12_345);
        let b = level_from_total_xp(12_345);
        assert_eq!(a, b);
    }

    #[test]
    fn level_capped_at_100() {
        let info = level_from_total_xp(u64::MAX / 2);
        assert_eq!(info.level, MAX_LEVEL);
        assert_eq!(info.xp_for_next_level, 0);
    }

    #[test]
    fn add_xp_single_level() {
        let mut stats = PlayerStats::new();
        stats.health = 40;
        stats.energy = 10;
        let result = add_xp(&mut stats, 100);
        assert!(result.leveled_up);
        assert_eq!(result.new_level, 2);
        assert_eq!(stats.max_health, 105);
        assert_eq!(stats.max_energy, 102);
        assert_eq!(stats.attack_power, 11);
        // Full refill on level gain
        assert_eq!(stats.health, stats.max_health);
        assert_eq!(stats.energy, stats.max_energy);
        assert!(stats.experience < stats.experience_to_next_level);
    }

    #[test]
    fn add_xp_no_level() {
        let mut stats = PlayerStats::new();
        stats.health = 40;
        let result = add_xp(&mut stats, 50);
        assert!(!result.leveled_up);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.experience, 50);
        assert_eq!(stats.health, 40, "no refill without a level gain");
    }

    #[test]
    fn milestone_gains_tripled() {
        let mut stats = PlayerStats::new();
        stats.level = 9;
        stats.experience = 0;
        stats.experience_to_next_level = xp_for_level(10);
        // Place the lifetime total at exactly level 9, then push over 10.
        let base_attack = stats.attack_power;
        add_xp(&mut stats, xp_for_level(10));
        assert_eq!(stats.level, 10);
        assert_eq!(stats.attack_power, base_attack + GAIN_ATTACK * MILESTONE_MULTIPLIER);
    }

    #[test]
    fn regen_respects_delay() {
        assert_eq!(energy_regen(1999, 1.0), 0);
        assert_eq!(energy_regen(2000, 1.0), 0);
        assert_eq!(energy_regen(5000, 1.0), 3);
    }

    #[test]
    fn regen_clamped_to_max() {
        let mut stats = PlayerStats::new();
        stats.energy = 95;
        let restored = apply_energy_regen(&mut stats, 60_000, 1.0);
        assert_eq!(restored, 5);
        assert_eq!(stats.energy, stats.max_energy);
    }

    #[test]
    fn energy_always_in_range() {
        let mut stats = PlayerStats::new();
        for i in 0..200u32 {
            if i % 3 == 0 {
                stats.spend_energy(7);
            } else {
                apply_energy_regen(&mut stats, u64::from(i) * 500, 1.0);
            }
            assert!(stats.energy <= stats.max_energy);
        }
    }
}

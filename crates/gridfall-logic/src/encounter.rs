//! Encounter probabilities, enemy tier bands, and group sizing.
//!
//! The map's row axis is partitioned into four contiguous tier bands; a
//! rare boss override is rolled independently before normal tier selection
//! in the deepest rows. All probabilities here are pure tables; the engine
//! crate performs the actual draws.

use crate::grid::MAP_SIZE;

/// Rows at which the zone hand-off raises the encounter rate.
pub const TRANSITION_ROWS: [i32; 3] = [32, 64, 96];

/// Group sizing: chance of a second enemy, then of a third.
pub const EXTRA_ENEMY_CHANCE: f32 = 0.30;
pub const SECOND_EXTRA_ENEMY_CHANCE: f32 = 0.10;
/// Hard cap on encounter group size.
pub const MAX_GROUP_SIZE: u32 = 4;

/// Enemy tier (1–4) for a map row: a fixed partition of the row axis into
/// four contiguous bands of 32 rows each.
pub fn tier_for_row(row: i32) -> u8 {
    match row.clamp(0, MAP_SIZE - 1) {
        0..=31 => 1,
        32..=63 => 2,
        64..=95 => 3,
        _ => 4,
    }
}

/// Independent chance that a boss overrides tier selection entirely.
pub fn boss_chance(row: i32) -> f32 {
    if row >= 120 {
        0.25
    } else if row >= 110 {
        0.15
    } else {
        0.0
    }
}

/// Per-move encounter probability. Zero when the zone has no enemies.
pub fn encounter_chance(row: i32, zone_has_enemies: bool) -> f32 {
    if !zone_has_enemies {
        return 0.0;
    }
    if TRANSITION_ROWS.contains(&row) {
        0.18
    } else if row >= 120 {
        0.20
    } else if row >= 96 {
        0.15
    } else if row < 32 {
        0.08
    } else {
        0.12
    }
}

/// Enemy level for a row given a pre-drawn jitter in [-2, 2]:
/// `clamp(1, 100, floor(row/10) × 5 + jitter)`.
pub fn enemy_level_for_row(row: i32, jitter: i32) -> u32 {
    ((row / 10) * 5 + jitter).clamp(1, 100) as u32
}

/// Group size from two pre-drawn uniform rolls in [0, 1): one enemy, +1 at
/// 30%, +1 more at 10%, capped at [`MAX_GROUP_SIZE`].
pub fn group_size(roll_one: f32, roll_two: f32) -> u32 {
    let mut size = 1;
    if roll_one < EXTRA_ENEMY_CHANCE {
        size += 1;
    }
    if roll_two < SECOND_EXTRA_ENEMY_CHANCE {
        size += 1;
    }
    size.min(MAX_GROUP_SIZE)
}

/// Stat multiplier for an enemy instance at `level` scaled from a template
/// authored at `base_level`: `1 + 0.05 × (level − base_level)`.
pub fn level_multiplier(base_level: u32, level: u32) -> f32 {
    1.0 + 0.05 * (level as f32 - base_level as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bands_cover_map() {
        assert_eq!(tier_for_row(0), 1);
        assert_eq!(tier_for_row(31), 1);
        assert_eq!(tier_for_row(32), 2);
        assert_eq!(tier_for_row(95), 3);
        assert_eq!(tier_for_row(96), 4);
        assert_eq!(tier_for_row(127), 4);
    }

    #[test]
    fn boss_chance_bands() {
        assert_eq!(boss_chance(100), 0.0);
        assert!((boss_chance(110) - 0.15).abs() < f32::EPSILON);
        assert!((boss_chance(120) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn tutorial_band_rate() {
        assert!((encounter_chance(15, true) - 0.08).abs() < f32::EPSILON);
    }

    #[test]
    fn transition_rows_spike() {
        for row in TRANSITION_ROWS {
            assert!((encounter_chance(row, true) - 0.18).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn deep_and_final_bands() {
        assert!((encounter_chance(100, true) - 0.15).abs() < f32::EPSILON);
        assert!((encounter_chance(125, true) - 0.20).abs() < f32::EPSILON);
        assert!((encounter_chance(50, true) - 0.12).abs() < f32::EPSILON);
    }

    #[test]
    fn no_enemies_no_encounters() {
        assert_eq!(encounter_chance(125, false), 0.0);
    }

    #[test]
    fn enemy_level_clamped() {
        assert_eq!(enemy_level_for_row(0, -2), 1);
        assert_eq!(enemy_level_for_row(40, 0), 20);
        assert_eq!(enemy_level_for_row(41, 2), 22);
        assert_eq!(enemy_level_for_row(127, 2), 62);
    }

    #[test]
    fn group_size_rolls() {
        assert_eq!(group_size(0.9, 0.9), 1);
        assert_eq!(group_size(0.1, 0.9), 2);
        assert_eq!(group_size(0.1, 0.05), 3);
        assert!(group_size(0.0, 0.0) <= MAX_GROUP_SIZE);
    }

    #[test]
    fn level_multiplier_identity_at_base() {
        assert!((level_multiplier(1, 1) - 1.0).abs() < f32::EPSILON);
        assert!((level_multiplier(10, 20) - 1.5).abs() < f32::EPSILON);
    }
}

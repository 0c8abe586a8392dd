//! Hit checks and the damage formula.
//!
//! A single formula is used for every damage source:
//!
//! `dmg = (base + attack × mult) × crit × (1 + vuln/100) × (1 − def/(def+50))`
//!
//! floored and never below 1. The `def/(def+50)` term is a deliberate
//! diminishing-returns curve, so defense never reaches 100% reduction.

use serde::{Deserialize, Serialize};

/// Base damage of the default basic attack.
pub const BASIC_ATTACK_BASE: u32 = 10;

/// Accuracy of the default basic attack; with zero evasion this hits
/// deterministically.
pub const BASIC_ATTACK_ACCURACY: u32 = 100;

/// Outcome of a resolved damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    pub amount: u32,
    pub critical: bool,
}

/// Hit check: chance is `(accuracy − evasion) / 100`, clamped to [0, 1].
/// `roll` is a uniform draw in [0, 1); accuracy 100 vs evasion 0 always hits.
pub fn check_hit(accuracy: u32, target_evasion: u32, roll: f32) -> bool {
    let chance = (accuracy.saturating_sub(target_evasion) as f32 / 100.0).clamp(0.0, 1.0);
    roll < chance
}

/// The damage formula. `vulnerable_bonus` is a percentage damage increase
/// (25.0 = +25%). Floored, minimum 1 regardless of defense magnitude.
pub fn calculate_damage(
    base: u32,
    attack_power: u32,
    multiplier: f32,
    target_defense: u32,
    critical: bool,
    crit_damage: f32,
    vulnerable_bonus: f32,
) -> u32 {
    let raw = base as f32 + attack_power as f32 * multiplier;
    let crit_mult = if critical { crit_damage } else { 1.0 };
    let vuln_mult = 1.0 + vulnerable_bonus / 100.0;
    let def = target_defense as f32;
    let mitigation = 1.0 - def / (def + 50.0);
    ((raw * crit_mult * vuln_mult * mitigation).floor() as u32).max(1)
}

/// Roll a [`DamageResult`] given a pre-drawn crit roll in [0, 1).
pub fn roll_damage(
    base: u32,
    attack_power: u32,
    multiplier: f32,
    target_defense: u32,
    crit_chance: f32,
    crit_damage: f32,
    vulnerable_bonus: f32,
    crit_roll: f32,
) -> DamageResult {
    let critical = crit_roll < crit_chance;
    DamageResult {
        amount: calculate_damage(
            base,
            attack_power,
            multiplier,
            target_defense,
            critical,
            crit_damage,
            vulnerable_bonus,
        ),
        critical,
    }
}

/// Enemy attack damage against the player:
/// `max(1, attack − effective_defense / 2)`, where effective defense is
/// boosted 1.5× while defending. Defending then halves the result, and an
/// active shield halves it again; the reductions compose multiplicatively
/// in that order.
pub fn enemy_attack_damage(
    enemy_attack: u32,
    player_defense: u32,
    defending: bool,
    shielded: bool,
) -> u32 {
    let effective_defense = if defending {
        player_defense as f32 * 1.5
    } else {
        player_defense as f32
    };
    let mut dmg = (enemy_attack as f32 - effective_defense / 2.0).max(1.0);
    if defending {
        dmg *= 0.5;
    }
    if shielded {
        dmg *= 0.5;
    }
    (dmg.floor() as u32).max(1)
}

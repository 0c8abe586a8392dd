//! The scan/discovery system.
//!
//! Scanning a map cell may discover the pattern hidden there, gated by a
//! per-rarity probability that grows with scan tier and scan power. Known
//! patterns are never re-rolled; a failed roll reveals the pattern's hint
//! only at tiers that surface hints.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::patterns::pattern_at;
use crate::error::ActionError;
use gridfall_logic::grid::Position;
use gridfall_logic::progression::PlayerStats;
use gridfall_logic::scan::{discovery_chance, ScanTier};

/// What a completed scan found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScanOutcome {
    /// No pattern exists at the scanned position.
    NothingFound,
    /// The pattern here was discovered before; no re-roll.
    AlreadyKnown { pattern_id: String },
    Discovered { pattern_id: String },
    /// The roll failed; hint present only when the tier reveals hints.
    Missed { hint: Option<String> },
}

/// Per-session scan bookkeeping: discovered patterns and tier cooldowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanState {
    pub known_patterns: HashSet<String>,
    /// Timestamp of the last scan per tier, session ms.
    pub last_scan_ms: HashMap<ScanTier, u64>,
}

impl ScanState {
    pub fn is_known(&self, pattern_id: &str) -> bool {
        self.known_patterns.contains(pattern_id)
    }
}

/// Perform a scan at `pos` with the given effective scan power (base plus
/// equipment). Spends the tier's energy on any outcome other than an error;
/// cooldown and energy gates are checked first.
pub fn perform_scan(
    state: &mut ScanState,
    stats: &mut PlayerStats,
    scan_power: u32,
    tier: ScanTier,
    pos: Position,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<ScanOutcome, ActionError> {
    if let Some(last) = state.last_scan_ms.get(&tier) {
        let elapsed = now_ms.saturating_sub(*last);
        if elapsed < tier.cooldown_ms() {
            return Err(ActionError::OnCooldown {
                remaining_ms: tier.cooldown_ms() - elapsed,
            });
        }
    }
    if stats.energy < tier.energy_cost() {
        return Err(ActionError::InsufficientEnergy {
            required: tier.energy_cost(),
            available: stats.energy,
        });
    }

    stats.spend_energy(tier.energy_cost());
    state.last_scan_ms.insert(tier, now_ms);

    let Some(pattern) = pattern_at(pos) else {
        return Ok(ScanOutcome::NothingFound);
    };
    if state.is_known(pattern.id) {
        return Ok(ScanOutcome::AlreadyKnown {
            pattern_id: pattern.id.to_string(),
        });
    }

    let chance = discovery_chance(tier, pattern.rarity, scan_power);
    if rng.gen::<f32>() <= chance {
        state.known_patterns.insert(pattern.id.to_string());
        Ok(ScanOutcome::Discovered {
            pattern_id: pattern.id.to_string(),
        })
    } else {
        let hint = tier
            .reveals_hints()
            .then(|| pattern.hint.to_string());
        Ok(ScanOutcome::Missed { hint })
    }
}

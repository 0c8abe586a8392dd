//! Timed status effects.
//!
//! A status is `{kind, remaining turns, strength}` attached to a combatant.
//! Durations are decremented exactly once per enemy phase, during
//! housekeeping, and entries are removed at zero. Reapplying a status of a
//! type already present appends another entry rather than refreshing or
//! stacking it; only the first entry of a kind is consulted for strength.

use serde::{Deserialize, Serialize};

/// The six status effect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Damage over time; strength = damage per turn.
    Poison,
    /// Skips the affected combatant's actions.
    Stunned,
    /// Incoming damage increased by strength percent.
    Vulnerable,
    /// Incoming damage halved while active.
    Shielded,
    /// Outgoing damage increased by strength percent.
    Buffed,
    /// Outgoing damage reduced by strength percent.
    Weakened,
}

/// One active status entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Remaining duration in enemy-phase cycles.
    pub remaining_turns: u32,
    pub strength: f32,
}

/// The status list carried by one combatant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusList {
    pub effects: Vec<StatusEffect>,
}

impl StatusList {
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Strength of the first entry of `kind`, or zero. Later duplicate
    /// entries extend nothing; they expire independently.
    pub fn strength_of(&self, kind: StatusKind) -> f32 {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.strength)
            .unwrap_or(0.0)
    }

    /// Append an effect. Same-type reapplication appends a second entry.
    pub fn apply(&mut self, kind: StatusKind, duration: u32, strength: f32) {
        if duration == 0 {
            return;
        }
        self.effects.push(StatusEffect {
            kind,
            remaining_turns: duration,
            strength,
        });
    }

    /// Decrement every entry by one turn, dropping the expired. Returns the
    /// total poison damage that ticked.
    pub fn tick(&mut self) -> u32 {
        let poison: f32 = self
            .effects
            .iter()
            .filter(|e| e.kind == StatusKind::Poison)
            .map(|e| e.strength)
            .sum();
        for e in &mut self.effects {
            e.remaining_turns -= 1;
        }
        self.effects.retain(|e| e.remaining_turns > 0);
        poison.floor() as u32
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_and_expire() {
        let mut list = StatusList::default();
        list.apply(StatusKind::Vulnerable, 2, 25.0);
        assert!(list.has(StatusKind::Vulnerable));
        list.tick();
        assert!(list.has(StatusKind::Vulnerable));
        list.tick();
        assert!(!list.has(StatusKind::Vulnerable));
    }

    #[test]
    fn reapplication_appends_not_refreshes() {
        let mut list = StatusList::default();
        list.apply(StatusKind::Vulnerable, 1, 25.0);
        list.apply(StatusKind::Vulnerable, 3, 40.0);
        assert_eq!(list.effects.len(), 2);
        // First entry wins for strength until it expires.
        assert!((list.strength_of(StatusKind::Vulnerable) - 25.0).abs() < f32::EPSILON);
        list.tick();
        assert_eq!(list.effects.len(), 1);
        assert!((list.strength_of(StatusKind::Vulnerable) - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn poison_ticks_total() {
        let mut list = StatusList::default();
        list.apply(StatusKind::Poison, 3, 2.0);
        list.apply(StatusKind::Poison, 2, 3.0);
        assert_eq!(list.tick(), 5);
        assert_eq!(list.tick(), 5);
        assert_eq!(list.tick(), 2);
        assert_eq!(list.tick(), 0);
    }

    #[test]
    fn zero_duration_is_a_no_op() {
        let mut list = StatusList::default();
        list.apply(StatusKind::Stunned, 0, 0.0);
        assert!(list.effects.is_empty());
    }

    #[test]
    fn different_kinds_coexist() {
        let mut list = StatusList::default();
        list.apply(StatusKind::Poison, 2, 2.0);
        list.apply(StatusKind::Shielded, 2, 50.0);
        assert!(list.has(StatusKind::Poison));
        assert!(list.has(StatusKind::Shielded));
    }
}

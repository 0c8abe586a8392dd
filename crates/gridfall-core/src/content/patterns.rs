//! Scan patterns.
//!
//! Hidden signatures embedded at fixed map cells, discoverable through the
//! scan system. Each carries a rarity (which sets the discovery odds per
//! scan tier) and a hint revealed by deeper scans on a failed roll.

use gridfall_logic::grid::Position;
use gridfall_logic::scan::Rarity;

/// A discoverable pattern at a fixed map position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPattern {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    /// Shown on a failed roll when the scan tier reveals hints.
    pub hint: &'static str,
    pub row: i32,
    pub col: i32,
}

impl ScanPattern {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

const PATTERNS: &[ScanPattern] = &[
    ScanPattern {
        id: "helix-glyph",
        name: "Helix Glyph",
        rarity: Rarity::Common,
        hint: "A faint double spiral repeats beneath the topsoil.",
        row: 12,
        col: 40,
    },
    ScanPattern {
        id: "lattice-echo",
        name: "Lattice Echo",
        rarity: Rarity::Common,
        hint: "Something geometric answers the ping, twice.",
        row: 25,
        col: 101,
    },
    ScanPattern {
        id: "drift-sigil",
        name: "Drift Sigil",
        rarity: Rarity::Uncommon,
        hint: "The return signal arrives before it should.",
        row: 47,
        col: 18,
    },
    ScanPattern {
        id: "hollow-chord",
        name: "Hollow Chord",
        rarity: Rarity::Uncommon,
        hint: "Three resonant cavities, evenly spaced.",
        row: 58,
        col: 77,
    },
    ScanPattern {
        id: "fracture-map",
        name: "Fracture Map",
        rarity: Rarity::Rare,
        hint: "Stress lines converge on a single buried point.",
        row: 71,
        col: 55,
    },
    ScanPattern {
        id: "umbral-key",
        name: "Umbral Key",
        rarity: Rarity::Rare,
        hint: "A cold spot the scan cannot fully resolve.",
        row: 89,
        col: 12,
    },
    ScanPattern {
        id: "silent-array",
        name: "Silent Array",
        rarity: Rarity::Epic,
        hint: "Rows of identical voids, all listening.",
        row: 104,
        col: 91,
    },
    ScanPattern {
        id: "prime-signature",
        name: "Prime Signature",
        rarity: Rarity::Legendary,
        hint: "The pattern rewrites itself between pings.",
        row: 124,
        col: 64,
    },
];

/// All patterns, in map order.
pub fn all_patterns() -> &'static [ScanPattern] {
    PATTERNS
}

/// The pattern embedded at `pos`, if any.
pub fn pattern_at(pos: Position) -> Option<&'static ScanPattern> {
    PATTERNS.iter().find(|p| p.row == pos.row && p.col == pos.col)
}

/// Look up a pattern by id. Fails closed on unknown ids.
pub fn pattern(id: &str) -> Option<&'static ScanPattern> {
    PATTERNS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_unique_and_in_bounds() {
        for (i, a) in PATTERNS.iter().enumerate() {
            assert!(a.position().in_map_bounds(), "{}", a.id);
            for b in &PATTERNS[i + 1..] {
                assert!(a.position() != b.position(), "{} and {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn lookup_by_position() {
        let p = pattern_at(Position::new(12, 40)).unwrap();
        assert_eq!(p.id, "helix-glyph");
        assert!(pattern_at(Position::new(0, 0)).is_none());
    }

    #[test]
    fn hints_nonempty() {
        for p in PATTERNS {
            assert!(!p.hint.is_empty(), "{}", p.id);
        }
    }
}

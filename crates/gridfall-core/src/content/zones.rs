//! Zone definitions.
//!
//! A zone is a contiguous row-band of the 128-row map with its own entry
//! level, enemy eligibility, and resource spawn configuration. Bands tile
//! the full row axis with no gaps or overlap.

/// Per-zone resource spawn configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    /// Resource type pool; drawn uniformly per node.
    pub resources: &'static [&'static str],
    /// Nodes per 100 cells of zone area.
    pub density: f32,
    /// Minimum Manhattan distance between nodes placed in this zone.
    pub min_distance: u32,
}

/// A contiguous row-band of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    /// First row of the band (inclusive).
    pub row_start: i32,
    /// One past the last row of the band.
    pub row_end: i32,
    /// Recommended player level to enter.
    pub entry_level: u32,
    pub has_enemies: bool,
    pub spawn: SpawnConfig,
}

impl Zone {
    pub fn contains_row(&self, row: i32) -> bool {
        row >= self.row_start && row < self.row_end
    }

    /// Cell count of the band (rows × full column range).
    pub fn area(&self) -> u32 {
        ((self.row_end - self.row_start) * 128) as u32
    }
}

const ZONES: &[Zone] = &[
    Zone {
        id: "landing-fields",
        name: "Landing Fields",
        row_start: 0,
        row_end: 32,
        entry_level: 1,
        has_enemies: true,
        spawn: SpawnConfig {
            resources: &["bio-gel", "scrap-alloy"],
            density: 1.2,
            min_distance: 3,
        },
    },
    Zone {
        id: "rust-flats",
        name: "Rust Flats",
        row_start: 32,
        row_end: 64,
        entry_level: 5,
        has_enemies: true,
        spawn: SpawnConfig {
            resources: &["bio-gel", "scrap-alloy", "circuit-shard"],
            density: 1.0,
            min_distance: 4,
        },
    },
    Zone {
        id: "signal-wastes",
        name: "Signal Wastes",
        row_start: 64,
        row_end: 96,
        entry_level: 15,
        has_enemies: true,
        spawn: SpawnConfig {
            resources: &["circuit-shard", "flux-crystal"],
            density: 0.8,
            min_distance: 5,
        },
    },
    Zone {
        id: "deep-grid",
        name: "Deep Grid",
        row_start: 96,
        row_end: 120,
        entry_level: 30,
        has_enemies: true,
        spawn: SpawnConfig {
            resources: &["flux-crystal", "void-essence"],
            density: 0.6,
            min_distance: 6,
        },
    },
    Zone {
        id: "nexus",
        name: "The Nexus",
        row_start: 120,
        row_end: 128,
        entry_level: 50,
        has_enemies: true,
        spawn: SpawnConfig {
            resources: &["void-essence", "prime-core"],
            density: 0.5,
            min_distance: 6,
        },
    },
];

/// All zones, in row order.
pub fn all_zones() -> &'static [Zone] {
    ZONES
}

/// The zone containing `row`, if the row is on the map.
pub fn zone_for_row(row: i32) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.contains_row(row))
}

/// Look up a zone by id. Fails closed on unknown ids.
pub fn zone(id: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.id == id)
}

//! Resource definitions.
//!
//! Static per-type data for harvestable resources: tier, energy cost, yield
//! range, respawn time, optional required tool, eligible zones, and rarity.
//! Placed instances ([`crate::worldgen::ResourceNode`]) reference these by id.

use gridfall_logic::scan::Rarity;

/// Static definition of a harvestable resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    pub id: &'static str,
    pub name: &'static str,
    /// Strength/rarity bracket 1–5.
    pub tier: u8,
    /// Energy spent per harvest.
    pub energy_cost: u32,
    pub base_yield: u32,
    pub max_yield: u32,
    /// Time after depletion before the node cycles back to available.
    pub respawn_ms: u64,
    /// Crafted tool id that must be equipped or carried to harvest.
    pub required_tool: Option<&'static str>,
    /// Zones this resource may spawn in.
    pub zones: &'static [&'static str],
    pub rarity: Rarity,
}

const RESOURCES: &[ResourceDefinition] = &[
    ResourceDefinition {
        id: "bio-gel",
        name: "Bio Gel",
        tier: 1,
        energy_cost: 5,
        base_yield: 2,
        max_yield: 5,
        respawn_ms: 60_000,
        required_tool: None,
        zones: &["landing-fields", "rust-flats"],
        rarity: Rarity::Common,
    },
    ResourceDefinition {
        id: "scrap-alloy",
        name: "Scrap Alloy",
        tier: 1,
        energy_cost: 5,
        base_yield: 2,
        max_yield: 6,
        respawn_ms: 90_000,
        required_tool: None,
        zones: &["landing-fields", "rust-flats"],
        rarity: Rarity::Common,
    },
    ResourceDefinition {
        id: "circuit-shard",
        name: "Circuit Shard",
        tier: 2,
        energy_cost: 8,
        base_yield: 1,
        max_yield: 4,
        respawn_ms: 120_000,
        required_tool: None,
        zones: &["rust-flats", "signal-wastes"],
        rarity: Rarity::Uncommon,
    },
    ResourceDefinition {
        id: "flux-crystal",
        name: "Flux Crystal",
        tier: 3,
        energy_cost: 12,
        base_yield: 1,
        max_yield: 3,
        respawn_ms: 180_000,
        required_tool: Some("plasma-cutter"),
        zones: &["signal-wastes", "deep-grid"],
        rarity: Rarity::Rare,
    },
    ResourceDefinition {
        id: "void-essence",
        name: "Void Essence",
        tier: 4,
        energy_cost: 18,
        base_yield: 1,
        max_yield: 2,
        respawn_ms: 300_000,
        required_tool: Some("plasma-cutter"),
        zones: &["deep-grid", "nexus"],
        rarity: Rarity::Epic,
    },
    ResourceDefinition {
        id: "prime-core",
        name: "Prime Core",
        tier: 5,
        energy_cost: 25,
        base_yield: 1,
        max_yield: 2,
        respawn_ms: 600_000,
        required_tool: Some("quantum-extractor"),
        zones: &["nexus"],
        rarity: Rarity::Legendary,
    },
];

/// Look up a resource definition by id. Fails closed on unknown ids.
pub fn resource_definition(id: &str) -> Option<&'static ResourceDefinition> {
    RESOURCES.iter().find(|r| r.id == id)
}

/// All resource definitions, in tier order.
pub fn all_resources() -> &'static [ResourceDefinition] {
    RESOURCES
}

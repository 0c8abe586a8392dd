//! Procedural world population: resource node placement and encounter
//! generation.
//!
//! Node placement is randomized within a deterministic shape: each zone's
//! spawn config fixes the node count and spacing, and a position that fails
//! all 50 placement attempts is skipped silently. Under a fixed seed the
//! generated world is reproducible, including the skips. Do not replace
//! the retry budget with a guaranteed-success algorithm, as that changes
//! observable node counts.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::enemies::{boss_template, templates_in_tier, Enemy};
use crate::content::zones::{all_zones, Zone};
use gridfall_logic::encounter::{
    boss_chance, encounter_chance, enemy_level_for_row, group_size, tier_for_row,
};
use gridfall_logic::grid::{Position, MAP_SIZE};

/// Attempts per node before placement is abandoned for that node.
pub const PLACEMENT_ATTEMPTS: u32 = 50;

/// A placed, harvestable resource instance. Nodes are created once at
/// world-generation time and cycled (depleted → respawned) forever after,
/// never destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Globally unique across the generated world.
    pub id: u32,
    pub resource_id: String,
    pub position: Position,
    pub quantity: u32,
    pub max_quantity: u32,
    /// Timestamp of the harvest that depleted the node, in session ms.
    pub last_harvested_ms: u64,
    pub depleted: bool,
}

/// Place resource nodes for every zone per its spawn config.
///
/// For each node: a type drawn uniformly from the zone pool, then up to
/// [`PLACEMENT_ATTEMPTS`] random (row, col) draws within the zone's row
/// band and the full column range, accepting the first position whose
/// Manhattan distance to every node already placed in that zone is at
/// least `min_distance`.
pub fn generate_resource_nodes(rng: &mut impl Rng) -> Vec<ResourceNode> {
    let mut nodes = Vec::new();
    let mut next_id = 0u32;
    for zone in all_zones() {
        let before = nodes.len();
        place_zone_nodes(zone, rng, &mut next_id, &mut nodes);
        debug!(
            "zone {}: placed {} resource nodes",
            zone.id,
            nodes.len() - before
        );
    }
    nodes
}

fn place_zone_nodes(
    zone: &Zone,
    rng: &mut impl Rng,
    next_id: &mut u32,
    nodes: &mut Vec<ResourceNode>,
) {
    let config = &zone.spawn;
    if config.resources.is_empty() {
        return;
    }
    let node_count = (zone.area() as f32 / 100.0 * config.density).floor() as u32;
    let zone_start = nodes.len();

    for _ in 0..node_count {
        let resource_id = config.resources[rng.gen_range(0..config.resources.len())];
        let Some(def) = crate::content::resources::resource_definition(resource_id) else {
            continue;
        };

        let mut placed = None;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidate = Position::new(
                rng.gen_range(zone.row_start..zone.row_end),
                rng.gen_range(0..MAP_SIZE),
            );
            let spaced = nodes[zone_start..]
                .iter()
                .all(|n| n.position.manhattan(&candidate) >= config.min_distance);
            if spaced {
                placed = Some(candidate);
                break;
            }
        }
        // All attempts failed: skip this node silently, no guaranteed count.
        let Some(position) = placed else { continue };

        let quantity = rng.gen_range(def.base_yield..=def.max_yield);
        nodes.push(ResourceNode {
            id: *next_id,
            resource_id: resource_id.to_string(),
            position,
            quantity,
            max_quantity: def.max_yield,
            last_harvested_ms: 0,
            depleted: false,
        });
        *next_id += 1;
    }
}

/// Cycle depleted nodes back to available once their respawn time has
/// elapsed, redrawing quantity within [base, max]. A no-op on nodes that
/// are already fresh.
pub fn update_resource_nodes(nodes: &mut [ResourceNode], now_ms: u64, rng: &mut impl Rng) {
    for node in nodes.iter_mut() {
        if !node.depleted {
            continue;
        }
        let Some(def) = crate::content::resources::resource_definition(&node.resource_id) else {
            continue;
        };
        if now_ms.saturating_sub(node.last_harvested_ms) >= def.respawn_ms {
            node.quantity = rng.gen_range(def.base_yield..=def.max_yield);
            node.depleted = false;
        }
    }
}

/// Per-move Bernoulli encounter trial. Always false in enemy-free zones.
pub fn check_encounter(rng: &mut impl Rng, row: i32, zone_has_enemies: bool) -> bool {
    let chance = encounter_chance(row, zone_has_enemies);
    chance > 0.0 && rng.gen::<f32>() < chance
}

/// Generate an encounter group for a map row.
///
/// The boss override is rolled first, independently of tier selection;
/// otherwise the enemy type is drawn uniformly from the row's tier and the
/// group is sized 1–4. Every enemy's level is rolled separately.
pub fn generate_encounter(rng: &mut impl Rng, row: i32) -> Vec<Enemy> {
    let chance = boss_chance(row);
    if chance > 0.0 && rng.gen::<f32>() < chance {
        let template = boss_template();
        let level = enemy_level_for_row(row, rng.gen_range(-2..=2));
        debug!("boss encounter at row {row}");
        return vec![template.instantiate(0, level)];
    }

    let tier = tier_for_row(row);
    let pool = templates_in_tier(tier);
    if pool.is_empty() {
        return Vec::new();
    }

    let size = group_size(rng.gen::<f32>(), rng.gen::<f32>());
    let mut enemies = Vec::with_capacity(size as usize);
    for id in 0..size {
        let template = pool[rng.gen_range(0..pool.len())];
        let level = enemy_level_for_row(row, rng.gen_range(-2..=2));
        enemies.push(template.instantiate(id, level));
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generation_reproducible_under_seed() {
        let a = generate_resource_nodes(&mut StdRng::seed_from_u64(7));
        let b = generate_resource_nodes(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn node_ids_globally_unique() {
        let nodes = generate_resource_nodes(&mut StdRng::seed_from_u64(1));
        let mut ids: Vec<u32> = nodes.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), nodes.len());
    }

    #[test]
    fn nodes_respect_zone_bands_and_spacing() {
        let nodes = generate_resource_nodes(&mut StdRng::seed_from_u64(3));
        for zone in all_zones() {
            let in_zone: Vec<_> = nodes
                .iter()
                .filter(|n| zone.contains_row(n.position.row))
                .filter(|n| zone.spawn.resources.contains(&n.resource_id.as_str()))
                .collect();
            for (i, a) in in_zone.iter().enumerate() {
                assert!(a.position.in_map_bounds());
                for b in &in_zone[i + 1..] {
                    assert!(
                        a.position.manhattan(&b.position) >= zone.spawn.min_distance,
                        "nodes {} and {} too close in {}",
                        a.id,
                        b.id,
                        zone.id
                    );
                }
            }
        }
    }

    #[test]
    fn respawn_is_idempotent_on_fresh_nodes() {
        let mut nodes = generate_resource_nodes(&mut StdRng::seed_from_u64(5));
        let snapshot = nodes.clone();
        update_resource_nodes(&mut nodes, 1_000_000, &mut StdRng::seed_from_u64(9));
        assert_eq!(nodes, snapshot, "fresh node set must be untouched");
    }

    #[test]
    fn depleted_node_respawns_after_timer() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut nodes = vec![ResourceNode {
            id: 0,
            resource_id: "bio-gel".into(),
            position: Position::new(5, 5),
            quantity: 0,
            max_quantity: 5,
            last_harvested_ms: 1000,
            depleted: true,
        }];
        // Before the timer elapses: still depleted.
        update_resource_nodes(&mut nodes, 30_000, &mut rng);
        assert!(nodes[0].depleted);
        // After 60s respawn time: cycled back with a redrawn quantity.
        update_resource_nodes(&mut nodes, 61_001, &mut rng);
        assert!(!nodes[0].depleted);
        assert!(nodes[0].quantity >= 2 && nodes[0].quantity <= 5);
    }

    #[test]
    fn tutorial_band_encounter_rate() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 100_000;
        let hits = (0..trials)
            .filter(|_| check_encounter(&mut rng, 15, true))
            .count();
        let rate = hits as f64 / trials as f64;
        assert!(
            (rate - 0.08).abs() < 0.005,
            "observed {rate}, expected ~0.08"
        );
    }

    #[test]
    fn no_encounters_without_enemies() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!((0..10_000).all(|_| !check_encounter(&mut rng, 125, false)));
    }

    #[test]
    fn encounter_group_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        for row in [0, 40, 80, 105, 127] {
            for _ in 0..200 {
                let group = generate_encounter(&mut rng, row);
                assert!(!group.is_empty());
                assert!(group.len() <= 4);
                for e in &group {
                    assert!(e.level >= 1 && e.level <= 100);
                    assert!(e.health >= 1);
                }
            }
        }
    }

    #[test]
    fn shallow_rows_never_boss() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..2000 {
            let group = generate_encounter(&mut rng, 50);
            assert!(group.iter().all(|e| e.template_id != "archon-prime"));
        }
    }
}

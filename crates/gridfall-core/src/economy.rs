//! Gathering and crafting economy.
//!
//! Requirement checks return structured [`ActionError`]s in a fixed order
//! so the UI can surface the most relevant reason; execution functions
//! apply the state diff (energy, inventory, node quantity) and report what
//! happened.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::recipes::{crafted_item, recipe, Recipe};
use crate::content::resources::{resource_definition, ResourceDefinition};
use crate::error::{ActionError, MaterialShortfall};
use crate::player::{Equipment, Inventory, ItemRef};
use crate::worldgen::ResourceNode;
use gridfall_logic::gathering::{calculate_yield, VARIANCE_MAX, VARIANCE_MIN};
use gridfall_logic::progression::PlayerStats;

/// Result of a successful harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatherResult {
    pub resource_id: String,
    pub amount: u32,
    pub node_depleted: bool,
    pub xp_awarded: u64,
    pub energy_spent: u32,
}

/// Result of a successful craft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftResult {
    pub recipe_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub xp_awarded: u64,
    pub energy_spent: u32,
    /// Craft duration, surfaced for UI pacing; the craft itself completes
    /// synchronously.
    pub craft_time_ms: u64,
}

/// Whether the tool a resource requires is equipped or carried.
fn has_tool(tool_id: &str, equipment: &Equipment, inventory: &Inventory) -> bool {
    equipment.tool.as_deref() == Some(tool_id) || inventory.count(tool_id) > 0
}

/// Check harvest requirements in user-facing order: depleted first, then
/// energy, then tool.
pub fn check_gather_requirements(
    node: &ResourceNode,
    def: &ResourceDefinition,
    stats: &PlayerStats,
    equipment: &Equipment,
    inventory: &Inventory,
    now_ms: u64,
) -> Result<(), ActionError> {
    if node.quantity == 0 || node.depleted {
        let elapsed = now_ms.saturating_sub(node.last_harvested_ms);
        if elapsed < def.respawn_ms {
            return Err(ActionError::ResourceDepleted {
                respawn_in_ms: def.respawn_ms - elapsed,
            });
        }
    }
    if stats.energy < def.energy_cost {
        return Err(ActionError::InsufficientEnergy {
            required: def.energy_cost,
            available: stats.energy,
        });
    }
    if let Some(tool_id) = def.required_tool {
        if !has_tool(tool_id, equipment, inventory) {
            return Err(ActionError::MissingTool {
                tool_id: tool_id.to_string(),
            });
        }
    }
    Ok(())
}

/// Harvest a node: spend energy, roll yield, decrement quantity, and flip
/// the depletion flag when the node runs dry. The yield never exceeds the
/// node's remaining quantity. A depleted node whose respawn window has
/// elapsed cycles back first, quantity redrawn, whether or not a world
/// tick ran in between.
pub fn gather_resource(
    node: &mut ResourceNode,
    stats: &mut PlayerStats,
    equipment: &Equipment,
    inventory: &mut Inventory,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<GatherResult, ActionError> {
    let def = resource_definition(&node.resource_id)
        .ok_or_else(|| ActionError::UnknownId(node.resource_id.clone()))?;
    if (node.depleted || node.quantity == 0)
        && now_ms.saturating_sub(node.last_harvested_ms) >= def.respawn_ms
    {
        node.quantity = rng.gen_range(def.base_yield..=def.max_yield);
        node.depleted = false;
    }
    check_gather_requirements(node, def, stats, equipment, inventory, now_ms)?;

    stats.spend_energy(def.energy_cost);

    let variance = rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX);
    let rolled = calculate_yield(
        def.base_yield,
        def.max_yield,
        stats.level,
        stats.scan_power,
        equipment.tool_power().filter(|p| *p > 0),
        variance,
    );
    let amount = rolled.min(node.quantity);
    node.quantity -= amount;

    let node_depleted = node.quantity == 0;
    if node_depleted {
        node.depleted = true;
        node.last_harvested_ms = now_ms;
    }

    inventory.add(ItemRef::Resource(def.id.to_string()), amount);
    let xp = u64::from(def.tier) * 2;

    Ok(GatherResult {
        resource_id: def.id.to_string(),
        amount,
        node_depleted,
        xp_awarded: xp,
        energy_spent: def.energy_cost,
    })
}

/// Check crafting requirements: level, energy, then every ingredient
/// against an id → count map built once.
pub fn check_craft_requirements(
    recipe: &Recipe,
    stats: &PlayerStats,
    inventory: &Inventory,
) -> Result<(), ActionError> {
    if stats.level < recipe.level_required {
        return Err(ActionError::InsufficientLevel {
            required: recipe.level_required,
            current: stats.level,
        });
    }
    if stats.energy < recipe.energy_cost {
        return Err(ActionError::InsufficientEnergy {
            required: recipe.energy_cost,
            available: stats.energy,
        });
    }
    let counts = inventory.count_map();
    let missing: Vec<MaterialShortfall> = recipe
        .ingredients
        .iter()
        .filter_map(|ing| {
            let available = counts.get(ing.item_id).copied().unwrap_or(0);
            (available < ing.quantity).then(|| MaterialShortfall {
                item_id: ing.item_id.to_string(),
                required: ing.quantity,
                available,
            })
        })
        .collect();
    if !missing.is_empty() {
        return Err(ActionError::MissingMaterials {
            recipe_id: recipe.id.to_string(),
            missing,
        });
    }
    Ok(())
}

/// Execute a recipe: consume materials and energy, synthesize the output
/// from its static definition, and award XP
/// (`level_required × 5 + craft_time_ms / 1000`).
pub fn craft_recipe(
    recipe_id: &str,
    stats: &mut PlayerStats,
    inventory: &mut Inventory,
) -> Result<CraftResult, ActionError> {
    let recipe = recipe(recipe_id).ok_or_else(|| ActionError::UnknownId(recipe_id.to_string()))?;
    check_craft_requirements(recipe, stats, inventory)?;

    for ing in recipe.ingredients {
        // Checked above; a failed removal here would mean a torn check.
        inventory.remove(ing.item_id, ing.quantity);
    }
    stats.spend_energy(recipe.energy_cost);

    let output = crafted_item(recipe.output_id)
        .ok_or_else(|| ActionError::UnknownId(recipe.output_id.to_string()))?;
    inventory.add(ItemRef::Crafted(output.id.to_string()), recipe.output_quantity);

    let xp = u64::from(recipe.level_required) * 5 + recipe.craft_time_ms / 1000;

    Ok(CraftResult {
        recipe_id: recipe.id.to_string(),
        item_id: output.id.to_string(),
        quantity: recipe.output_quantity,
        xp_awarded: xp,
        energy_spent: recipe.energy_cost,
        craft_time_ms: recipe.craft_time_ms,
    })
}

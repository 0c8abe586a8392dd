//! Recipes and crafted item definitions.
//!
//! A recipe lists ingredient (item id, quantity) pairs, an output, and
//! level/energy requirements; the crafted item is the static definition of
//! that output. The recipe category → equip slot mapping is the fixed
//! lookup in [`RecipeCategory::equip_slot`].

use gridfall_logic::scan::Rarity;
use serde::{Deserialize, Serialize};

/// What kind of item a recipe produces; determines its equip slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeCategory {
    Weapon,
    Armor,
    Tool,
    Consumable,
}

/// Where a crafted item can be equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Tool,
}

impl RecipeCategory {
    /// Fixed category → slot mapping; consumables are not equippable.
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self {
            RecipeCategory::Weapon => Some(EquipSlot::Weapon),
            RecipeCategory::Armor => Some(EquipSlot::Armor),
            RecipeCategory::Tool => Some(EquipSlot::Tool),
            RecipeCategory::Consumable => None,
        }
    }
}

/// Passive stat bonuses granted by an equipped crafted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBonuses {
    pub attack_power: u32,
    pub defense: u32,
    pub max_health: u32,
    pub max_energy: u32,
    pub scan_power: u32,
    /// Harvest bonus for tools; 10% yield per point.
    pub tool_power: u32,
}

/// Static definition of a craftable output item.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftedItem {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    pub category: RecipeCategory,
    pub stackable: bool,
    pub max_stack: u32,
    pub bonuses: StatBonuses,
}

/// One ingredient requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    pub item_id: &'static str,
    pub quantity: u32,
}

/// A crafting recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: &'static str,
    pub output_id: &'static str,
    pub output_quantity: u32,
    pub ingredients: &'static [Ingredient],
    pub level_required: u32,
    pub energy_cost: u32,
    pub craft_time_ms: u64,
}

const NO_BONUSES: StatBonuses = StatBonuses {
    attack_power: 0,
    defense: 0,
    max_health: 0,
    max_energy: 0,
    scan_power: 0,
    tool_power: 0,
};

const CRAFTED_ITEMS: &[CraftedItem] = &[
    CraftedItem {
        id: "health-gel",
        name: "Health Gel",
        rarity: Rarity::Common,
        category: RecipeCategory::Consumable,
        stackable: true,
        max_stack: 10,
        bonuses: NO_BONUSES,
    },
    CraftedItem {
        id: "circuit-blade",
        name: "Circuit Blade",
        rarity: Rarity::Uncommon,
        category: RecipeCategory::Weapon,
        stackable: false,
        max_stack: 1,
        bonuses: StatBonuses {
            attack_power: 5,
            defense: 0,
            max_health: 0,
            max_energy: 0,
            scan_power: 0,
            tool_power: 0,
        },
    },
    CraftedItem {
        id: "aegis-plate",
        name: "Aegis Plate",
        rarity: Rarity::Rare,
        category: RecipeCategory::Armor,
        stackable: false,
        max_stack: 1,
        bonuses: StatBonuses {
            attack_power: 0,
            defense: 4,
            max_health: 10,
            max_energy: 0,
            scan_power: 0,
            tool_power: 0,
        },
    },
    CraftedItem {
        id: "plasma-cutter",
        name: "Plasma Cutter",
        rarity: Rarity::Uncommon,
        category: RecipeCategory::Tool,
        stackable: false,
        max_stack: 1,
        bonuses: StatBonuses {
            attack_power: 0,
            defense: 0,
            max_health: 0,
            max_energy: 0,
            scan_power: 0,
            tool_power: 2,
        },
    },
    CraftedItem {
        id: "quantum-extractor",
        name: "Quantum Extractor",
        rarity: Rarity::Epic,
        category: RecipeCategory::Tool,
        stackable: false,
        max_stack: 1,
        bonuses: StatBonuses {
            attack_power: 0,
            defense: 0,
            max_health: 0,
            max_energy: 0,
            scan_power: 2,
            tool_power: 5,
        },
    },
];

const RECIPES: &[Recipe] = &[
    Recipe {
        id: "recipe-health-gel",
        output_id: "health-gel",
        output_quantity: 2,
        ingredients: &[Ingredient {
            item_id: "bio-gel",
            quantity: 3,
        }],
        level_required: 1,
        energy_cost: 5,
        craft_time_ms: 2000,
    },
    Recipe {
        id: "recipe-circuit-blade",
        output_id: "circuit-blade",
        output_quantity: 1,
        ingredients: &[
            Ingredient {
                item_id: "scrap-alloy",
                quantity: 4,
            },
            Ingredient {
                item_id: "circuit-shard",
                quantity: 2,
            },
        ],
        level_required: 3,
        energy_cost: 10,
        craft_time_ms: 5000,
    },
    Recipe {
        id: "recipe-plasma-cutter",
        output_id: "plasma-cutter",
        output_quantity: 1,
        ingredients: &[
            Ingredient {
                item_id: "scrap-alloy",
                quantity: 5,
            },
            Ingredient {
                item_id: "circuit-shard",
                quantity: 3,
            },
        ],
        level_required: 5,
        energy_cost: 12,
        craft_time_ms: 6000,
    },
    Recipe {
        id: "recipe-aegis-plate",
        output_id: "aegis-plate",
        output_quantity: 1,
        ingredients: &[
            Ingredient {
                item_id: "scrap-alloy",
                quantity: 6,
            },
            Ingredient {
                item_id: "flux-crystal",
                quantity: 1,
            },
        ],
        level_required: 8,
        energy_cost: 15,
        craft_time_ms: 8000,
    },
    Recipe {
        id: "recipe-quantum-extractor",
        output_id: "quantum-extractor",
        output_quantity: 1,
        ingredients: &[
            Ingredient {
                item_id: "flux-crystal",
                quantity: 4,
            },
            Ingredient {
                item_id: "void-essence",
                quantity: 2,
            },
        ],
        level_required: 15,
        energy_cost: 25,
        craft_time_ms: 12_000,
    },
];

/// Look up a crafted item definition by id. Fails closed on unknown ids.
pub fn crafted_item(id: &str) -> Option<&'static CraftedItem> {
    CRAFTED_ITEMS.iter().find(|c| c.id == id)
}

/// Look up a recipe by id. Fails closed on unknown ids.
pub fn recipe(id: &str) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.id == id)
}

/// All recipes, in unlock order.
pub fn all_recipes() -> &'static [Recipe] {
    RECIPES
}

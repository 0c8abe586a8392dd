//! Inventory, item identity, and equipment.
//!
//! Resources and crafted items share one string-id namespace at the UI and
//! persistence boundary. Internally ids are resolved once into a tagged
//! [`ItemRef`] so the deeper systems never repeat the
//! try-resource-then-try-crafted lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::content::recipes::{crafted_item, EquipSlot, StatBonuses};
use crate::content::resources::resource_definition;
use gridfall_logic::progression::PlayerStats;

/// Resolved item identity: a resource type or a crafted item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    Resource(String),
    Crafted(String),
}

impl ItemRef {
    /// Resolve a raw string id at the boundary: resources first, then
    /// crafted items. Unknown ids fail closed.
    pub fn resolve(id: &str) -> Option<ItemRef> {
        if resource_definition(id).is_some() {
            Some(ItemRef::Resource(id.to_string()))
        } else if crafted_item(id).is_some() {
            Some(ItemRef::Crafted(id.to_string()))
        } else {
            None
        }
    }

    /// The underlying string id.
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Resource(id) | ItemRef::Crafted(id) => id,
        }
    }
}

/// One inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemRef,
    pub quantity: u32,
}

/// The player's inventory. Stackable items merge into one stack; resources
/// always stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total quantity held of the given item id.
    pub fn count(&self, item_id: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.item.id() == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Build an id → count map in one pass, for requirement checks.
    pub fn count_map(&self) -> HashMap<&str, u32> {
        let mut map = HashMap::new();
        for stack in &self.stacks {
            *map.entry(stack.item.id()).or_insert(0) += stack.quantity;
        }
        map
    }

    /// Add items, merging into an existing stack where the item stacks.
    pub fn add(&mut self, item: ItemRef, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let stackable = match &item {
            ItemRef::Resource(_) => true,
            ItemRef::Crafted(id) => crafted_item(id).map(|c| c.stackable).unwrap_or(false),
        };
        if stackable {
            if let Some(stack) = self.stacks.iter_mut().find(|s| s.item == item) {
                stack.quantity += quantity;
                return;
            }
        }
        self.stacks.push(ItemStack { item, quantity });
    }

    /// Remove `quantity` of `item_id` across stacks. Fails without mutation
    /// if the inventory holds fewer than requested.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        if self.count(item_id) < quantity {
            return false;
        }
        let mut remaining = quantity;
        for stack in self.stacks.iter_mut().filter(|s| s.item.id() == item_id) {
            let take = stack.quantity.min(remaining);
            stack.quantity -= take;
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }
        self.stacks.retain(|s| s.quantity > 0);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

/// Currently equipped crafted items, by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub tool: Option<String>,
}

impl Equipment {
    pub fn in_slot(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_deref(),
            EquipSlot::Armor => self.armor.as_deref(),
            EquipSlot::Tool => self.tool.as_deref(),
        }
    }

    /// Equip a crafted item into its category slot, returning the id it
    /// displaced. Unknown or unequippable ids fail closed.
    pub fn equip(&mut self, item_id: &str) -> Option<Option<String>> {
        let item = crafted_item(item_id)?;
        let slot = item.category.equip_slot()?;
        let target = match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Tool => &mut self.tool,
        };
        Some(target.replace(item_id.to_string()))
    }

    /// Sum of bonuses across every equipped item.
    pub fn total_bonuses(&self) -> StatBonuses {
        let mut total = StatBonuses::default();
        for id in [&self.weapon, &self.armor, &self.tool].into_iter().flatten() {
            if let Some(item) = crafted_item(id) {
                total.attack_power += item.bonuses.attack_power;
                total.defense += item.bonuses.defense;
                total.max_health += item.bonuses.max_health;
                total.max_energy += item.bonuses.max_energy;
                total.scan_power += item.bonuses.scan_power;
                total.tool_power += item.bonuses.tool_power;
            }
        }
        total
    }

    /// Tool power of the equipped tool, if any.
    pub fn tool_power(&self) -> Option<u32> {
        self.tool
            .as_deref()
            .and_then(crafted_item)
            .map(|c| c.bonuses.tool_power)
    }
}

/// Base stats combined with equipment bonuses, used by combat and
/// gathering. A throwaway view, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub attack_power: u32,
    pub defense: u32,
    pub scan_power: u32,
    pub crit_chance: f32,
    pub crit_damage: f32,
}

impl EffectiveStats {
    pub fn of(stats: &PlayerStats, equipment: &Equipment) -> Self {
        let bonus = equipment.total_bonuses();
        Self {
            attack_power: stats.attack_power + bonus.attack_power,
            defense: stats.defense + bonus.defense,
            scan_power: stats.scan_power + bonus.scan_power,
            crit_chance: stats.crit_chance,
            crit_damage: stats.crit_damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tries_resources_then_crafted() {
        assert_eq!(
            ItemRef::resolve("bio-gel"),
            Some(ItemRef::Resource("bio-gel".into()))
        );
        assert_eq!(
            ItemRef::resolve("circuit-blade"),
            Some(ItemRef::Crafted("circuit-blade".into()))
        );
        assert_eq!(ItemRef::resolve("mystery-box"), None);
    }

    #[test]
    fn add_merges_stackable() {
        let mut inv = Inventory::new();
        inv.add(ItemRef::Resource("bio-gel".into()), 3);
        inv.add(ItemRef::Resource("bio-gel".into()), 2);
        assert_eq!(inv.stacks.len(), 1);
        assert_eq!(inv.count("bio-gel"), 5);
    }

    #[test]
    fn unstackable_items_keep_separate_stacks() {
        let mut inv = Inventory::new();
        inv.add(ItemRef::Crafted("circuit-blade".into()), 1);
        inv.add(ItemRef::Crafted("circuit-blade".into()), 1);
        assert_eq!(inv.stacks.len(), 2);
        assert_eq!(inv.count("circuit-blade"), 2);
    }

    #[test]
    fn remove_spans_stacks() {
        let mut inv = Inventory::new();
        inv.add(ItemRef::Crafted("circuit-blade".into()), 1);
        inv.add(ItemRef::Crafted("circuit-blade".into()), 1);
        assert!(inv.remove("circuit-blade", 2));
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_insufficient_is_a_no_op() {
        let mut inv = Inventory::new();
        inv.add(ItemRef::Resource("bio-gel".into()), 1);
        assert!(!inv.remove("bio-gel", 2));
        assert_eq!(inv.count("bio-gel"), 1);
    }

    #[test]
    fn equip_routes_to_slot_and_displaces() {
        let mut eq = Equipment::default();
        assert_eq!(eq.equip("plasma-cutter"), Some(None));
        assert_eq!(
            eq.equip("quantum-extractor"),
            Some(Some("plasma-cutter".to_string()))
        );
        assert_eq!(eq.tool_power(), Some(5));
        // Consumables have no slot
        assert_eq!(eq.equip("health-gel"), None);
    }

    #[test]
    fn effective_stats_add_bonuses() {
        let stats = PlayerStats::new();
        let mut eq = Equipment::default();
        eq.equip("circuit-blade");
        eq.equip("aegis-plate");
        let eff = EffectiveStats::of(&stats, &eq);
        assert_eq!(eff.attack_power, stats.attack_power + 5);
        assert_eq!(eff.defense, stats.defense + 4);
    }
}

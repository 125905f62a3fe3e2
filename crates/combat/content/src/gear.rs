//! Gear and potion catalogs, loaded from embedded RON.

use combat_core::{GearOracle, ItemDefinition, ItemId, PotionDefinition, PotionId, Rarity};
use serde::Deserialize;

use crate::LoadResult;

/// RON file structure for the equipment catalog.
#[derive(Debug, Deserialize)]
struct GearFile {
    items: Vec<ItemDefinition>,
}

/// RON file structure for the potion catalog.
#[derive(Debug, Deserialize)]
struct PotionFile {
    potions: Vec<PotionDefinition>,
}

/// Registry of every item and potion definition, in catalog order.
///
/// Catalog order matters: loot rolls index into the rarity pools this
/// registry returns, so reordering the data files changes which item a
/// given seed produces.
#[derive(Debug, Clone)]
pub struct GearCatalog {
    items: Vec<ItemDefinition>,
    potions: Vec<PotionDefinition>,
}

impl GearCatalog {
    /// Load both catalogs from the embedded data files.
    pub fn load() -> LoadResult<Self> {
        let gear: GearFile = ron::from_str(include_str!("../data/gear.ron"))
            .map_err(|e| anyhow::anyhow!("failed to parse gear.ron: {e}"))?;
        let potions: PotionFile = ron::from_str(include_str!("../data/potions.ron"))
            .map_err(|e| anyhow::anyhow!("failed to parse potions.ron: {e}"))?;

        for (i, item) in gear.items.iter().enumerate() {
            if item.allowed_jobs.is_empty() {
                anyhow::bail!("item {} ({}) allows no jobs", item.id, item.name);
            }
            if gear.items[..i].iter().any(|other| other.id == item.id) {
                anyhow::bail!("duplicate item id {}", item.id);
            }
        }

        Ok(Self {
            items: gear.items,
            potions: potions.potions,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.potions.is_empty()
    }
}

impl GearOracle for GearCatalog {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    fn items_of_rarity(&self, rarity: Rarity) -> Vec<&ItemDefinition> {
        self.items.iter().filter(|i| i.rarity == rarity).collect()
    }

    fn potion(&self, id: PotionId) -> Option<&PotionDefinition> {
        self.potions.iter().find(|p| p.id == id)
    }

    fn potions_up_to(&self, rarity: Rarity) -> Vec<&PotionDefinition> {
        self.potions.iter().filter(|p| p.rarity <= rarity).collect()
    }
}

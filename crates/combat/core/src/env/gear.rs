//! Gear oracle: the equipment and potion catalogs.

use crate::items::{ItemDefinition, ItemId, PotionDefinition, PotionId, Rarity};

/// Read-only view over item and potion definitions.
///
/// The loot roller asks for the pool of a rolled rarity and picks from
/// it deterministically; pools are returned in stable catalog order.
pub trait GearOracle {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;

    /// Every item of the given rarity, in stable catalog order.
    fn items_of_rarity(&self, rarity: Rarity) -> Vec<&ItemDefinition>;

    fn potion(&self, id: PotionId) -> Option<&PotionDefinition>;

    /// Every potion whose rarity is at or below the given ceiling, in
    /// stable catalog order. Depth gates the ceiling.
    fn potions_up_to(&self, rarity: Rarity) -> Vec<&PotionDefinition>;
}

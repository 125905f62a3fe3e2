//! Equipment and consumable definitions.
//!
//! Item catalogs live outside the core (see [`crate::env::GearOracle`]);
//! what combat carries around is the [`Loadout`]: a bounded snapshot of the
//! pieces a character actually has equipped, with their enhancement levels.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::party::Job;
use crate::sets::SetId;
use crate::stats::StatBlock;

/// Identifier for an item definition in the gear catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Equipment slot.
///
/// Shield is Fighter-only; Offhand replaces it for the other jobs; Relic
/// is Mage-only. Ring is the only slot worn twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Weapon,
    Shield,
    Armor,
    Helmet,
    Gloves,
    Boots,
    Necklace,
    Ring,
    Relic,
    Offhand,
}

impl Slot {
    /// How many pieces of this slot a single character can wear.
    pub fn capacity(self) -> usize {
        match self {
            Slot::Ring => 2,
            _ => 1,
        }
    }

    /// Whether this slot is usable by the given job.
    pub fn allowed_for(self, job: Job) -> bool {
        match self {
            Slot::Shield => job == Job::Fighter,
            Slot::Offhand => job != Job::Fighter,
            Slot::Relic => job == Job::Mage,
            _ => true,
        }
    }
}

/// Drop rarity. Ordering matters: loot rolls compare against depth gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Static definition of a piece of equipment, as loaded from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub slot: Slot,
    pub rarity: Rarity,
    pub stats: StatBlock,
    /// Set identifier this piece counts toward, if any.
    pub set: Option<SetId>,
    pub allowed_jobs: Vec<Job>,
}

impl ItemDefinition {
    pub fn usable_by(&self, job: Job) -> bool {
        self.allowed_jobs.contains(&job) && self.slot.allowed_for(job)
    }
}

/// Multiply a stat block by the enhancement bonus for the given level.
///
/// Levels run +0 through +4 and scale every stat on the piece by
/// 1 + {0%, 10%, 25%, 50%, 100%}, truncating toward zero.
pub fn enhanced_stats(stats: StatBlock, enhancement: u8) -> StatBlock {
    let idx = (enhancement as usize).min(CombatConfig::ENHANCEMENT_PERCENTS.len() - 1);
    let pct = 100 + CombatConfig::ENHANCEMENT_PERCENTS[idx];
    StatBlock {
        attack: stats.attack * pct / 100,
        defense: stats.defense * pct / 100,
        hp: stats.hp * pct / 100,
        mp: stats.mp * pct / 100,
        speed: stats.speed * pct / 100,
    }
}

/// One equipped piece: a catalog snapshot plus its enhancement level.
///
/// Loadouts carry snapshots rather than ids so stat resolution never has
/// to consult the gear catalog mid-combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearPiece {
    pub id: ItemId,
    pub slot: Slot,
    pub stats: StatBlock,
    pub set: Option<SetId>,
    pub enhancement: u8,
}

impl GearPiece {
    pub fn from_definition(def: &ItemDefinition, enhancement: u8) -> Self {
        Self {
            id: def.id,
            slot: def.slot,
            stats: def.stats,
            set: def.set,
            enhancement,
        }
    }

    /// Stat contribution of this piece with enhancement applied.
    pub fn effective_stats(&self) -> StatBlock {
        enhanced_stats(self.stats, self.enhancement)
    }
}

/// The set of items a character has equipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pieces: ArrayVec<GearPiece, { CombatConfig::MAX_EQUIPPED_ITEMS }>,
}

impl Loadout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equip a piece, unequipping and returning a displaced piece if the
    /// slot is already at capacity.
    pub fn equip(&mut self, piece: GearPiece) -> Option<GearPiece> {
        let worn = self
            .pieces
            .iter()
            .filter(|p| p.slot == piece.slot)
            .count();
        let displaced = if worn >= piece.slot.capacity() {
            let pos = self.pieces.iter().position(|p| p.slot == piece.slot)?;
            Some(self.pieces.remove(pos))
        } else {
            None
        };
        if !self.pieces.is_full() {
            self.pieces.push(piece);
        }
        displaced
    }

    pub fn unequip(&mut self, id: ItemId) -> Option<GearPiece> {
        let pos = self.pieces.iter().position(|p| p.id == id)?;
        Some(self.pieces.remove(pos))
    }

    pub fn pieces(&self) -> &[GearPiece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Total flat stat contribution of every equipped piece, enhancement
    /// included. This is the equipment layer of stat resolution.
    pub fn flat_stats(&self) -> StatBlock {
        let mut total = StatBlock::default();
        for piece in &self.pieces {
            let s = piece.effective_stats();
            total.attack += s.attack;
            total.defense += s.defense;
            total.hp += s.hp;
            total.mp += s.mp;
            total.speed += s.speed;
        }
        total
    }

    /// Number of equipped pieces per set identifier.
    ///
    /// The multiset feeds threshold matching in the set-bonus aggregator.
    pub fn set_counts(&self) -> Vec<(SetId, usize)> {
        let mut counts: Vec<(SetId, usize)> = Vec::new();
        for piece in &self.pieces {
            let Some(set) = piece.set else { continue };
            match counts.iter_mut().find(|(id, _)| *id == set) {
                Some((_, n)) => *n += 1,
                None => counts.push((set, 1)),
            }
        }
        counts
    }
}

/// Consumable kind for potion drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotionKind {
    Health,
    Mana,
    Elixir,
}

/// Identifier for a potion definition in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotionId(pub u32);

/// Static definition of a potion, as loaded from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotionDefinition {
    pub id: PotionId,
    pub name: String,
    pub kind: PotionKind,
    pub hp_restore: i32,
    pub mp_restore: i32,
    pub rarity: Rarity,
}

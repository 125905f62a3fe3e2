//! Combatants: party members, monsters, and the references that name them.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::items::Loadout;
use crate::stats::{BaseStats, StatBlock};
use crate::status::StatusEffects;

/// Playable job classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Job {
    Fighter,
    Mage,
    Monk,
}

/// Identifier for a party member (slot index within the party).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub u8);

/// Identifier for a monster species in the bestiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesId(pub u32);

impl std::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "species#{}", self.0)
    }
}

/// Reference to a living (or dead) combatant within an encounter.
///
/// Indices are stable for the whole encounter: defeated combatants keep
/// their slot and are skipped, never removed, so a reference taken at
/// round 1 still names the same combatant at round 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantRef {
    /// Party member by slot index.
    Party(u8),
    /// Monster by spawn index within the current encounter.
    Monster(u8),
}

impl CombatantRef {
    pub fn is_party(self) -> bool {
        matches!(self, CombatantRef::Party(_))
    }

    pub fn is_monster(self) -> bool {
        matches!(self, CombatantRef::Monster(_))
    }
}

impl std::fmt::Display for CombatantRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatantRef::Party(i) => write!(f, "party[{i}]"),
            CombatantRef::Monster(i) => write!(f, "monster[{i}]"),
        }
    }
}

/// A party member.
///
/// Carries persistent progression (level, experience, equipment) alongside
/// the transient combat pools. Current HP/MP are clamped against resolved
/// maxima at the points where maxima can change, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub job: Job,
    pub level: u32,
    pub xp: u64,
    pub base: BaseStats,
    pub hp: i32,
    pub mp: i32,
    pub loadout: Loadout,
    pub statuses: StatusEffects,
}

impl Character {
    /// A fresh level-1 character with full pools and empty equipment.
    pub fn new(id: CharacterId, name: impl Into<String>, job: Job, base: BaseStats) -> Self {
        Self {
            id,
            name: name.into(),
            job,
            level: 1,
            xp: 0,
            hp: base.max_hp,
            mp: base.max_mp,
            base,
            loadout: Loadout::empty(),
            statuses: StatusEffects::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Static monster species definition, as loaded from the bestiary.
///
/// `stats` are the unscaled depth-0 values; the spawner applies depth
/// scaling when it instantiates a [`Monster`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub species: SpeciesId,
    pub name: String,
    pub stats: BaseStats,
    pub xp_value: u64,
    pub gold_value: u64,
    /// Minimum depth at which this species can spawn.
    pub min_depth: u32,
}

/// A live monster instance within an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub species: SpeciesId,
    pub name: String,
    /// Depth-scaled stats, fixed at spawn time.
    pub stats: BaseStats,
    pub hp: i32,
    pub mp: i32,
    pub statuses: StatusEffects,
    pub xp_value: u64,
    pub gold_value: u64,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// The player's party, bounded at four members.
pub const MAX_PARTY_SIZE: usize = CombatConfig::MAX_COMBATANTS - CombatConfig::MAX_ENCOUNTER_SIZE;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    pub members: ArrayVec<Character, MAX_PARTY_SIZE>,
    pub gold: u64,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(&self, index: u8) -> Option<&Character> {
        self.members.get(index as usize)
    }

    pub fn member_mut(&mut self, index: u8) -> Option<&mut Character> {
        self.members.get_mut(index as usize)
    }

    pub fn any_alive(&self) -> bool {
        self.members.iter().any(Character::is_alive)
    }

    pub fn living(&self) -> impl Iterator<Item = (u8, &Character)> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, c)| (i as u8, c))
    }
}

/// `StatBlock` view of a monster's scaled base stats, for the damage
/// pipeline and turn scheduler which operate on resolved values.
impl From<&Monster> for StatBlock {
    fn from(monster: &Monster) -> Self {
        StatBlock {
            attack: monster.stats.attack,
            defense: monster.stats.defense,
            hp: monster.stats.max_hp,
            mp: monster.stats.max_mp,
            speed: monster.stats.speed,
        }
    }
}

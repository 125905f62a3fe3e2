//! Effective-stat computation.
//!
//! A combatant's working numbers are never stored: they are recomputed on
//! demand from base stats plus equipment, set bonuses, and status effects.
//! The computation is pure and cheap enough to run every turn (or whenever
//! the UI wants fresh numbers).

pub mod bonus;
mod resolve;

pub use bonus::{Bonus, BonusStack, StatBonuses, StatBounds};
pub use resolve::{resolve_character, resolve_monster};

/// Permanent stats of a combatant before any modifier is applied.
///
/// Current HP/MP are not part of this value; they live on the combatant
/// and are mutated only by ability resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub max_hp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl BaseStats {
    pub fn new(max_hp: i32, max_mp: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            max_hp,
            max_mp,
            attack,
            defense,
            speed,
        }
    }
}

/// Flat stat contributions carried by a piece of equipment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub attack: i32,
    pub defense: i32,
    pub hp: i32,
    pub mp: i32,
    pub speed: i32,
}

/// A combatant's stats after all modifier layers.
///
/// `max_hp`/`max_mp` are the effective caps used for heal clamping and
/// regen; current HP/MP stay on the combatant untouched by resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats {
    pub max_hp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl EffectiveStats {
    /// Apply one bonus layer on top of these stats, clamping at the end.
    pub(crate) fn layered(self, layer: &StatBonuses) -> Self {
        Self {
            max_hp: StatBounds::RESOURCE_MAX.clamp(layer.max_hp.apply(self.max_hp)),
            max_mp: StatBounds::MP_MAX.clamp(layer.max_mp.apply(self.max_mp)),
            attack: StatBounds::DERIVED.clamp(layer.attack.apply(self.attack)),
            defense: StatBounds::DERIVED.clamp(layer.defense.apply(self.defense)),
            speed: StatBounds::DERIVED.clamp(layer.speed.apply(self.speed)),
        }
    }
}

impl From<BaseStats> for EffectiveStats {
    fn from(base: BaseStats) -> Self {
        Self {
            max_hp: StatBounds::RESOURCE_MAX.clamp(base.max_hp),
            max_mp: StatBounds::MP_MAX.clamp(base.max_mp),
            attack: StatBounds::DERIVED.clamp(base.attack),
            defense: StatBounds::DERIVED.clamp(base.defense),
            speed: StatBounds::DERIVED.clamp(base.speed),
        }
    }
}

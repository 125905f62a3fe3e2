//! The resolution pipeline itself: base stats through the three layers.

use crate::items::Loadout;
use crate::sets::{aggregate_set_bonuses, SetBonusOracle};
use crate::status::StatusEffects;

use super::{BaseStats, Bonus, EffectiveStats, StatBonuses};

/// Resolve a party member's effective stats.
///
/// Layer order is fixed: equipment flats first, then set-bonus
/// percentages (which therefore compound on gear), then status-effect
/// modifiers last so temporary buffs and penalties are never amplified
/// by set percentages.
pub fn resolve_character(
    base: BaseStats,
    loadout: &Loadout,
    sets: &dyn SetBonusOracle,
    statuses: &StatusEffects,
) -> EffectiveStats {
    let gear = loadout.flat_stats();
    let mut equipment_layer = StatBonuses::new();
    equipment_layer.attack.add(Bonus::Flat(gear.attack));
    equipment_layer.defense.add(Bonus::Flat(gear.defense));
    equipment_layer.max_hp.add(Bonus::Flat(gear.hp));
    equipment_layer.max_mp.add(Bonus::Flat(gear.mp));
    equipment_layer.speed.add(Bonus::Flat(gear.speed));

    let set_layer = aggregate_set_bonuses(loadout, sets).stats;
    let status_layer = statuses.stat_layer();

    EffectiveStats::from(base)
        .layered(&equipment_layer)
        .layered(&set_layer)
        .layered(&status_layer)
}

/// Resolve a monster's effective stats.
///
/// Monsters carry no equipment or sets; only the status layer applies on
/// top of their depth-scaled base stats.
pub fn resolve_monster(stats: BaseStats, statuses: &StatusEffects) -> EffectiveStats {
    EffectiveStats::from(stats).layered(&statuses.stat_layer())
}

//! Equipment set bonuses.
//!
//! Wearing multiple pieces tagged with the same set identifier unlocks
//! threshold tiers at 2/4/6/9 pieces. Tiers are cumulative: six pieces
//! grant the 2p, 4p, and 6p effects together.
//!
//! Most effects are static stat modifiers and feed the set layer of stat
//! resolution. Two are not:
//!
//! - flat per-round HP/MP regeneration, applied by the turn scheduler at
//!   round boundaries;
//! - HP-scaling damage reduction, which depends on the defender's current
//!   HP at the moment of each incoming hit and is therefore consumed
//!   directly by the damage pipeline.

use crate::items::Loadout;
use crate::stats::{Bonus, StatBonuses};

/// Identifier for an equipment set in the set-bonus table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetId(pub u16);

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "set#{}", self.0)
    }
}

/// Piece-count thresholds at which set tiers unlock.
pub const SET_THRESHOLDS: [u8; 4] = [2, 4, 6, 9];

/// A single effect granted by a set tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetEffect {
    AttackPercent(i32),
    DefensePercent(i32),
    HpPercent(i32),
    MpPercent(i32),
    SpeedPercent(i32),
    /// Flat HP restored at each round boundary.
    HpRegen(i32),
    /// Flat MP restored at each round boundary.
    MpRegen(i32),
    /// Maximum damage-reduction percentage. The live reduction scales
    /// linearly with the wearer's missing-HP fraction: zero at full HP,
    /// the full value as HP approaches zero.
    ScalingReduction(i32),
}

impl SetEffect {
    /// Discriminant index used for tier-monotonicity validation.
    fn kind_index(self) -> usize {
        match self {
            SetEffect::AttackPercent(_) => 0,
            SetEffect::DefensePercent(_) => 1,
            SetEffect::HpPercent(_) => 2,
            SetEffect::MpPercent(_) => 3,
            SetEffect::SpeedPercent(_) => 4,
            SetEffect::HpRegen(_) => 5,
            SetEffect::MpRegen(_) => 6,
            SetEffect::ScalingReduction(_) => 7,
        }
    }

    fn magnitude(self) -> i32 {
        match self {
            SetEffect::AttackPercent(v)
            | SetEffect::DefensePercent(v)
            | SetEffect::HpPercent(v)
            | SetEffect::MpPercent(v)
            | SetEffect::SpeedPercent(v)
            | SetEffect::HpRegen(v)
            | SetEffect::MpRegen(v)
            | SetEffect::ScalingReduction(v) => v,
        }
    }
}

/// One unlockable tier of a set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetTier {
    pub threshold: u8,
    pub effects: Vec<SetEffect>,
}

/// Full definition of one equipment set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetBonus {
    pub id: SetId,
    pub name: String,
    /// Tiers in ascending threshold order.
    pub tiers: Vec<SetTier>,
}

/// Validation failures for a set definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetTableError {
    #[error("set {set}: thresholds must be strictly increasing")]
    ThresholdsNotIncreasing { set: SetId },

    #[error("set {set}: threshold {threshold} is not one of the allowed tiers")]
    UnknownThreshold { set: SetId, threshold: u8 },

    #[error("set {set}: effect magnitude decreases between tiers (power curve must be monotonic)")]
    NonMonotonicEffect { set: SetId },
}

impl SetBonus {
    /// Check table invariants: thresholds strictly increasing and drawn
    /// from the allowed tier set, and each effect kind's magnitude
    /// non-decreasing from tier to tier.
    pub fn validate(&self) -> Result<(), SetTableError> {
        let mut prev_threshold = 0u8;
        // Highest magnitude seen so far per effect kind.
        let mut floor = [i32::MIN; 8];

        for tier in &self.tiers {
            if tier.threshold <= prev_threshold {
                return Err(SetTableError::ThresholdsNotIncreasing { set: self.id });
            }
            if !SET_THRESHOLDS.contains(&tier.threshold) {
                return Err(SetTableError::UnknownThreshold {
                    set: self.id,
                    threshold: tier.threshold,
                });
            }
            prev_threshold = tier.threshold;

            for effect in &tier.effects {
                let idx = effect.kind_index();
                if effect.magnitude() < floor[idx] {
                    return Err(SetTableError::NonMonotonicEffect { set: self.id });
                }
                floor[idx] = effect.magnitude();
            }
        }
        Ok(())
    }

    /// Every tier whose threshold is met by `count`, in ascending order.
    pub fn unlocked_tiers(&self, count: usize) -> impl Iterator<Item = &SetTier> {
        self.tiers
            .iter()
            .filter(move |tier| count >= tier.threshold as usize)
    }
}

/// Aggregated output of every set a loadout completes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetAggregate {
    /// Static stat modifiers; the set layer of stat resolution.
    pub stats: StatBonuses,
    /// Flat HP restored per round boundary.
    pub hp_regen: i32,
    /// Flat MP restored per round boundary.
    pub mp_regen: i32,
    /// Highest unlocked scaling-reduction ceiling, as a percentage.
    /// The damage pipeline scales it by the wearer's missing-HP fraction.
    pub scaling_reduction_max: i32,
}

impl SetAggregate {
    fn absorb(&mut self, effect: SetEffect) {
        match effect {
            SetEffect::AttackPercent(v) => self.stats.attack.add(Bonus::Percent(v)),
            SetEffect::DefensePercent(v) => self.stats.defense.add(Bonus::Percent(v)),
            SetEffect::HpPercent(v) => self.stats.max_hp.add(Bonus::Percent(v)),
            SetEffect::MpPercent(v) => self.stats.max_mp.add(Bonus::Percent(v)),
            SetEffect::SpeedPercent(v) => self.stats.speed.add(Bonus::Percent(v)),
            SetEffect::HpRegen(v) => self.hp_regen += v,
            SetEffect::MpRegen(v) => self.mp_regen += v,
            SetEffect::ScalingReduction(v) => {
                self.scaling_reduction_max = self.scaling_reduction_max.max(v)
            }
        }
    }
}

/// Oracle over the static set-bonus table.
pub trait SetBonusOracle {
    fn set_bonus(&self, id: SetId) -> Option<&SetBonus>;
}

/// Aggregate every unlocked tier of every set present in a loadout.
///
/// Unknown set identifiers are skipped: a loadout referencing a set the
/// table does not define simply earns nothing from it.
pub fn aggregate_set_bonuses(loadout: &Loadout, table: &dyn SetBonusOracle) -> SetAggregate {
    let mut aggregate = SetAggregate::default();
    for (set_id, count) in loadout.set_counts() {
        let Some(set) = table.set_bonus(set_id) else {
            continue;
        };
        for tier in set.unlocked_tiers(count) {
            for &effect in &tier.effects {
                aggregate.absorb(effect);
            }
        }
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{GearPiece, ItemId, Slot};
    use crate::stats::StatBlock;

    pub(crate) struct TestTable(pub Vec<SetBonus>);

    impl SetBonusOracle for TestTable {
        fn set_bonus(&self, id: SetId) -> Option<&SetBonus> {
            self.0.iter().find(|s| s.id == id)
        }
    }

    fn last_stand() -> SetBonus {
        SetBonus {
            id: SetId(1),
            name: "Last Stand".into(),
            tiers: vec![
                SetTier {
                    threshold: 2,
                    effects: vec![SetEffect::DefensePercent(15), SetEffect::ScalingReduction(10)],
                },
                SetTier {
                    threshold: 4,
                    effects: vec![SetEffect::DefensePercent(25), SetEffect::ScalingReduction(20)],
                },
                SetTier {
                    threshold: 6,
                    effects: vec![SetEffect::DefensePercent(35), SetEffect::ScalingReduction(30)],
                },
                SetTier {
                    threshold: 9,
                    effects: vec![SetEffect::DefensePercent(50), SetEffect::ScalingReduction(40)],
                },
            ],
        }
    }

    fn loadout_with_pieces(set: SetId, count: usize) -> Loadout {
        let mut loadout = Loadout::empty();
        let slots = [
            Slot::Weapon,
            Slot::Shield,
            Slot::Armor,
            Slot::Helmet,
            Slot::Gloves,
            Slot::Boots,
            Slot::Necklace,
            Slot::Ring,
            Slot::Ring,
        ];
        for (i, &slot) in slots.iter().take(count).enumerate() {
            loadout.equip(GearPiece {
                id: ItemId(i as u32 + 1),
                slot,
                stats: StatBlock::default(),
                set: Some(set),
                enhancement: 0,
            });
        }
        loadout
    }

    #[test]
    fn test_tiers_are_cumulative() {
        let table = TestTable(vec![last_stand()]);
        let loadout = loadout_with_pieces(SetId(1), 6);
        let agg = aggregate_set_bonuses(&loadout, &table);
        // 2p + 4p + 6p defense percentages all apply.
        assert_eq!(agg.stats.defense, crate::stats::BonusStack::new().percent(75));
        // Scaling reduction takes the highest unlocked ceiling, not a sum.
        assert_eq!(agg.scaling_reduction_max, 30);
    }

    #[test]
    fn test_below_first_threshold_grants_nothing() {
        let table = TestTable(vec![last_stand()]);
        let loadout = loadout_with_pieces(SetId(1), 1);
        let agg = aggregate_set_bonuses(&loadout, &table);
        assert_eq!(agg, SetAggregate::default());
    }

    #[test]
    fn test_nine_pieces_unlock_all_tiers() {
        let table = TestTable(vec![last_stand()]);
        let loadout = loadout_with_pieces(SetId(1), 9);
        let agg = aggregate_set_bonuses(&loadout, &table);
        assert_eq!(agg.scaling_reduction_max, 40);
    }

    #[test]
    fn test_unknown_set_is_ignored() {
        let table = TestTable(vec![]);
        let loadout = loadout_with_pieces(SetId(99), 4);
        assert_eq!(aggregate_set_bonuses(&loadout, &table), SetAggregate::default());
    }

    #[test]
    fn test_validate_accepts_well_formed_table() {
        assert_eq!(last_stand().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_decreasing_threshold() {
        let mut set = last_stand();
        set.tiers[1].threshold = 2;
        assert_eq!(
            set.validate(),
            Err(SetTableError::ThresholdsNotIncreasing { set: SetId(1) })
        );
    }

    #[test]
    fn test_validate_rejects_non_monotonic_magnitude() {
        let mut set = last_stand();
        set.tiers[3].effects = vec![SetEffect::ScalingReduction(5)];
        assert_eq!(
            set.validate(),
            Err(SetTableError::NonMonotonicEffect { set: SetId(1) })
        );
    }

    #[test]
    fn test_validate_rejects_off_grid_threshold() {
        let mut set = last_stand();
        set.tiers[0].threshold = 3;
        // 3 > previous 0 but not an allowed tier.
        assert_eq!(
            set.validate(),
            Err(SetTableError::UnknownThreshold {
                set: SetId(1),
                threshold: 3
            })
        );
    }
}

//! Victory rewards: experience, gold, and drop rolls.
//!
//! Rolled once, at the moment a session resolves to victory. Every roll
//! is deterministic over the session seed, so replaying the same fight
//! yields the same loot.

use crate::config::CombatConfig;
use crate::env::{compute_seed, CombatEnv, OracleError, RngOracle};
use crate::items::{ItemId, PotionId, Rarity};
use crate::party::Monster;

/// One dropped piece of equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub item: ItemId,
    pub enhancement: u8,
}

/// Everything a victorious encounter pays out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VictoryRewards {
    pub xp: u64,
    pub gold: u64,
    pub equipment: Vec<ItemDrop>,
    pub potions: Vec<PotionId>,
}

/// Roll rewards for a fully-defeated monster roster.
///
/// Each monster contributes its XP and gold and rolls its drops
/// independently: an equipment chance with depth-gated rarity, and a
/// potion chance with depth-gated quality.
pub fn roll_victory_rewards(
    monsters: &[Monster],
    depth: u32,
    env: &CombatEnv<'_>,
    session_seed: u64,
    nonce: u64,
) -> Result<VictoryRewards, OracleError> {
    let rng = env.rng()?;
    let gear = env.gear()?;
    let config = env.config();

    let mut rewards = VictoryRewards::default();
    for (index, monster) in monsters.iter().enumerate() {
        rewards.xp += monster.xp_value;
        rewards.gold += monster.gold_value;

        // Loot rolls get their own actor namespace so they never collide
        // with combat rolls under the same nonce.
        let actor = 0x200 + index as u32;
        let mut context = 0u32;
        let mut seed = |ctx: &mut u32| {
            let s = compute_seed(session_seed, nonce, actor, *ctx);
            *ctx += 1;
            s
        };

        if rng.roll_d100(seed(&mut context)) <= config.equipment_drop_chance_percent {
            let rarity = roll_equipment_rarity(rng.roll_d100(seed(&mut context)), depth);
            let pool = gear.items_of_rarity(rarity);
            if !pool.is_empty() {
                let pick = rng.range(seed(&mut context), 0, pool.len() as u32 - 1) as usize;
                let enhancement = roll_enhancement(rng, seed(&mut context), depth);
                rewards.equipment.push(ItemDrop {
                    item: pool[pick].id,
                    enhancement,
                });
            }
        }

        if rng.roll_d100(seed(&mut context)) <= config.potion_drop_chance_percent {
            let ceiling = potion_rarity_ceiling(depth);
            let pool = gear.potions_up_to(ceiling);
            if let Some(potion) = weighted_potion_pick(rng, seed(&mut context), &pool) {
                rewards.potions.push(potion);
            }
        }
    }
    Ok(rewards)
}

/// Depth-gated rarity roll: deep floors unlock rare and epic bands at
/// the top of the d100, shallow floors collapse them into uncommon and
/// common.
fn roll_equipment_rarity(roll: u32, depth: u32) -> Rarity {
    if depth >= 3 && roll <= 5 {
        Rarity::Epic
    } else if depth >= 2 && roll <= 15 {
        Rarity::Rare
    } else if roll <= 40 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

/// Enhancement roll, +0 through +4, with higher levels rarer.
///
/// Depth adds up to a 20-point bonus shifting the distribution upward.
/// Thresholds are in tenths of a percent so the fractional bonus scaling
/// stays in integer math.
fn roll_enhancement(rng: &dyn RngOracle, seed: u64, depth: u32) -> u8 {
    let roll = rng.range(seed, 0, 999);
    let bonus = (depth * 2).min(20);
    if roll < 10 + bonus * 5 {
        4
    } else if roll < 50 + bonus * 5 {
        3
    } else if roll < 150 + bonus * 3 {
        2
    } else if roll < 400 + bonus * 2 {
        1
    } else {
        0
    }
}

/// Potion quality unlocks with depth.
fn potion_rarity_ceiling(depth: u32) -> Rarity {
    if depth <= 2 {
        Rarity::Common
    } else if depth <= 4 {
        Rarity::Uncommon
    } else {
        Rarity::Rare
    }
}

fn potion_weight(rarity: Rarity) -> u32 {
    match rarity {
        Rarity::Common => 5,
        Rarity::Uncommon => 3,
        _ => 1,
    }
}

/// Weighted pick over a potion pool: commons five times as likely as
/// rares, uncommons three times.
fn weighted_potion_pick(
    rng: &dyn RngOracle,
    seed: u64,
    pool: &[&crate::items::PotionDefinition],
) -> Option<PotionId> {
    let total: u32 = pool.iter().map(|p| potion_weight(p.rarity)).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.range(seed, 0, total - 1);
    for potion in pool {
        let weight = potion_weight(potion.rarity);
        if roll < weight {
            return Some(potion.id);
        }
        roll -= weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Env, GearOracle, PcgRng};
    use crate::items::{ItemDefinition, PotionDefinition, PotionKind, Slot};
    use crate::party::{Job, SpeciesId};
    use crate::stats::{BaseStats, StatBlock};
    use crate::status::StatusEffects;

    struct TestCatalog {
        items: Vec<ItemDefinition>,
        potions: Vec<PotionDefinition>,
    }

    impl GearOracle for TestCatalog {
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

    fn catalog() -> TestCatalog {
        let item = |id: u32, rarity: Rarity| ItemDefinition {
            id: ItemId(id),
            name: format!("item {id}"),
            slot: Slot::Weapon,
            rarity,
            stats: StatBlock::default(),
            set: None,
            allowed_jobs: vec![Job::Fighter, Job::Mage, Job::Monk],
        };
        let potion = |id: u32, rarity: Rarity| PotionDefinition {
            id: PotionId(id),
            name: format!("potion {id}"),
            kind: PotionKind::Health,
            hp_restore: 25,
            mp_restore: 0,
            rarity,
        };
        TestCatalog {
            items: vec![
                item(1, Rarity::Common),
                item(2, Rarity::Uncommon),
                item(3, Rarity::Rare),
                item(4, Rarity::Epic),
            ],
            potions: vec![
                potion(1, Rarity::Common),
                potion(2, Rarity::Uncommon),
                potion(3, Rarity::Rare),
            ],
        }
    }

    fn monster(xp: u64, gold: u64) -> Monster {
        Monster {
            species: SpeciesId(1),
            name: "Slime".into(),
            stats: BaseStats::new(10, 0, 3, 1, 2),
            hp: 0,
            mp: 0,
            statuses: StatusEffects::new(),
            xp_value: xp,
            gold_value: gold,
        }
    }

    #[test]
    fn test_xp_and_gold_sum_over_roster() {
        let gear = catalog();
        let rng = PcgRng;
        let config = CombatConfig::new();
        let env: CombatEnv<'_> =
            Env::new(None, None, None, Some(&gear as _), Some(&rng as _), &config);

        let monsters = vec![monster(10, 4), monster(25, 9)];
        let rewards = roll_victory_rewards(&monsters, 1, &env, 42, 0).unwrap();
        assert_eq!(rewards.xp, 35);
        assert_eq!(rewards.gold, 13);
    }

    #[test]
    fn test_rewards_are_deterministic() {
        let gear = catalog();
        let rng = PcgRng;
        let config = CombatConfig::new();
        let env: CombatEnv<'_> =
            Env::new(None, None, None, Some(&gear as _), Some(&rng as _), &config);

        let monsters = vec![monster(10, 4); 5];
        let a = roll_victory_rewards(&monsters, 4, &env, 42, 7).unwrap();
        let b = roll_victory_rewards(&monsters, 4, &env, 42, 7).unwrap();
        assert_eq!(a, b);
        let c = roll_victory_rewards(&monsters, 4, &env, 43, 7).unwrap();
        // xp/gold never vary with the seed.
        assert_eq!(a.xp, c.xp);
        assert_eq!(a.gold, c.gold);
    }

    #[test]
    fn test_rarity_gates_by_depth() {
        // A top-band roll on floor 1 cannot produce epic or rare.
        assert_eq!(roll_equipment_rarity(3, 1), Rarity::Uncommon);
        assert_eq!(roll_equipment_rarity(3, 3), Rarity::Epic);
        assert_eq!(roll_equipment_rarity(10, 2), Rarity::Rare);
        assert_eq!(roll_equipment_rarity(90, 9), Rarity::Common);
    }

    #[test]
    fn test_potion_ceiling_by_depth() {
        assert_eq!(potion_rarity_ceiling(1), Rarity::Common);
        assert_eq!(potion_rarity_ceiling(3), Rarity::Uncommon);
        assert_eq!(potion_rarity_ceiling(7), Rarity::Rare);
    }

    #[test]
    fn test_enhancement_depth_shifts_distribution() {
        let rng = PcgRng;
        let deep: u32 = (0..500)
            .map(|s| roll_enhancement(&rng, s, 10) as u32)
            .sum();
        let shallow: u32 = (0..500)
            .map(|s| roll_enhancement(&rng, s, 0) as u32)
            .sum();
        assert!(deep > shallow);
    }
}

//! Encounter spawning.
//!
//! The movement/dungeon layer decides *whether* an encounter happens;
//! this module decides *what* shows up. Monster count scales with depth
//! behind a probability gate, each monster is rolled independently from
//! the depth-eligible bestiary slice, and spawned stats are buffed per
//! floor.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{compute_seed, CombatEnv, OracleError};
use crate::party::{Monster, MonsterTemplate};
use crate::status::StatusEffects;

/// Actor namespace for spawn rolls in seed mixing.
const SPAWN_ACTOR: u32 = 0x1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("no monster species eligible at depth {depth}")]
    EmptyBestiary { depth: u32 },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Roll an encounter for the given depth.
///
/// Count: `1 + range(0..=2)`, plus `depth / 3` bonus monsters behind a
/// configured probability gate, capped at the encounter limit. Stats:
/// HP and attack grow 10% per floor, gold 15%; defense, speed, and XP
/// stay at catalog values.
pub fn spawn_encounter(
    depth: u32,
    env: &CombatEnv<'_>,
    session_seed: u64,
    nonce: u64,
) -> Result<ArrayVec<Monster, { CombatConfig::MAX_ENCOUNTER_SIZE }>, SpawnError> {
    let rng = env.rng()?;
    let bestiary = env.bestiary()?;
    let config = env.config();

    let eligible = bestiary.eligible(depth);
    if eligible.is_empty() {
        return Err(SpawnError::EmptyBestiary { depth });
    }

    let mut context = 0u32;
    let mut seed = || {
        let s = compute_seed(session_seed, nonce, SPAWN_ACTOR, context);
        context += 1;
        s
    };

    let base_count = 1 + rng.range(seed(), 0, 2);
    let bonus = if rng.roll_d100(seed()) <= config.encounter_bonus_chance_percent {
        depth / 3
    } else {
        0
    };
    let count = (base_count + bonus).min(CombatConfig::MAX_ENCOUNTER_SIZE as u32);

    let mut monsters = ArrayVec::new();
    for _ in 0..count {
        let pick = rng.range(seed(), 0, eligible.len() as u32 - 1) as usize;
        monsters.push(instantiate(eligible[pick], depth));
    }
    Ok(monsters)
}

/// Build a live monster from its template, applying depth scaling.
pub fn instantiate(template: &MonsterTemplate, depth: u32) -> Monster {
    let mut stats = template.stats;
    stats.max_hp = scale_10pct(stats.max_hp, depth);
    stats.attack = scale_10pct(stats.attack, depth);
    Monster {
        species: template.species,
        name: template.name.clone(),
        hp: stats.max_hp,
        mp: stats.max_mp,
        stats,
        statuses: StatusEffects::new(),
        xp_value: template.xp_value,
        gold_value: template.gold_value * (100 + 15 * depth as u64) / 100,
    }
}

/// `value × (1 + depth/10)`, truncated.
fn scale_10pct(value: i32, depth: u32) -> i32 {
    (value as i64 * (10 + depth as i64) / 10) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BestiaryOracle, Env, PcgRng};
    use crate::party::SpeciesId;
    use crate::stats::BaseStats;

    struct TestBestiary(Vec<MonsterTemplate>);

    impl BestiaryOracle for TestBestiary {
        fn species(&self, id: SpeciesId) -> Option<&MonsterTemplate> {
            self.0.iter().find(|t| t.species == id)
        }

        fn eligible(&self, depth: u32) -> Vec<&MonsterTemplate> {
            self.0.iter().filter(|t| t.min_depth <= depth).collect()
        }
    }

    fn bestiary() -> TestBestiary {
        TestBestiary(vec![
            MonsterTemplate {
                species: SpeciesId(1),
                name: "Slime".into(),
                stats: BaseStats::new(20, 0, 6, 2, 3),
                xp_value: 5,
                gold_value: 4,
                min_depth: 0,
            },
            MonsterTemplate {
                species: SpeciesId(2),
                name: "Bone Colossus".into(),
                stats: BaseStats::new(90, 0, 20, 10, 4),
                xp_value: 60,
                gold_value: 40,
                min_depth: 6,
            },
        ])
    }

    #[test]
    fn test_depth_scaling() {
        let template = &bestiary().0[0];
        let spawned = instantiate(template, 5);
        // 20 HP and 6 attack × 1.5, 4 gold × 1.75.
        assert_eq!(spawned.stats.max_hp, 30);
        assert_eq!(spawned.hp, 30);
        assert_eq!(spawned.stats.attack, 9);
        assert_eq!(spawned.gold_value, 7);
        // Defense, speed, and XP are untouched.
        assert_eq!(spawned.stats.defense, 2);
        assert_eq!(spawned.stats.speed, 3);
        assert_eq!(spawned.xp_value, 5);
    }

    #[test]
    fn test_depth_zero_is_identity() {
        let template = &bestiary().0[0];
        let spawned = instantiate(template, 0);
        assert_eq!(spawned.stats.max_hp, 20);
        assert_eq!(spawned.gold_value, 4);
    }

    #[test]
    fn test_spawn_respects_depth_gate_and_cap() {
        let beasts = bestiary();
        let rng = PcgRng;
        let config = CombatConfig::new();
        let env: CombatEnv<'_> =
            Env::new(None, Some(&beasts as _), None, None, Some(&rng as _), &config);

        for seed in 0..50u64 {
            let spawned = spawn_encounter(2, &env, seed, 0).unwrap();
            assert!(!spawned.is_empty());
            assert!(spawned.len() <= CombatConfig::MAX_ENCOUNTER_SIZE);
            // Depth 2 never spawns the deep species.
            assert!(spawned.iter().all(|m| m.species == SpeciesId(1)));
        }
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let beasts = bestiary();
        let rng = PcgRng;
        let config = CombatConfig::new();
        let env: CombatEnv<'_> =
            Env::new(None, Some(&beasts as _), None, None, Some(&rng as _), &config);

        let a = spawn_encounter(7, &env, 99, 3).unwrap();
        let b = spawn_encounter(7, &env, 99, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_bestiary_is_an_error() {
        let beasts = TestBestiary(vec![]);
        let rng = PcgRng;
        let config = CombatConfig::new();
        let env: CombatEnv<'_> =
            Env::new(None, Some(&beasts as _), None, None, Some(&rng as _), &config);

        assert_eq!(
            spawn_encounter(1, &env, 1, 0),
            Err(SpawnError::EmptyBestiary { depth: 1 })
        );
    }
}

//! Deterministic turn-based combat rules for a dungeon crawler.
//!
//! `combat-core` owns the whole combat loop: effective-stat resolution
//! through layered bonuses, set-bonus aggregation, the damage and
//! mitigation pipeline, round-robin turn scheduling, data-driven ability
//! resolution, depth-scaled encounter spawning, and the session state
//! machine. All state mutation flows through [`session::CombatEngine`];
//! content (abilities, bestiary, sets, gear) arrives through the oracle
//! traits in [`env`], so the crate stays free of any catalog format.
pub mod ability;
pub mod combat;
pub mod config;
pub mod env;
pub mod events;
pub mod items;
pub mod loot;
pub mod party;
pub mod session;
pub mod sets;
pub mod spawn;
pub mod stats;
pub mod status;
pub mod turn;

pub use ability::{
    resolve_ability, Ability, AbilityError, AbilityId, AbilityKind, AbilityPower, AbilityRequest,
    BuffEffect, OnHitEffect, Resolution, TargetSelector,
};
pub use combat::{raw_damage, DamageOutcome, Mitigation};
pub use config::CombatConfig;
pub use env::{
    compute_seed, AbilityOracle, BestiaryOracle, CombatEnv, Env, GearOracle, OracleError, PcgRng,
    RngOracle, SetBonusOracle,
};
pub use events::{AnimationCue, CombatEvent};
pub use items::{
    GearPiece, ItemDefinition, ItemId, Loadout, PotionDefinition, PotionId, PotionKind, Rarity,
    Slot,
};
pub use loot::{roll_victory_rewards, ItemDrop, VictoryRewards};
pub use party::{
    Character, CharacterId, CombatantRef, Job, Monster, MonsterTemplate, Party, SpeciesId,
};
pub use session::{CombatEngine, CombatOutcome, CombatPhase, CombatSession, SessionError};
pub use sets::{
    aggregate_set_bonuses, SetAggregate, SetBonus, SetEffect, SetId, SetTableError, SetTier,
    SET_THRESHOLDS,
};
pub use spawn::{spawn_encounter, SpawnError};
pub use stats::{
    resolve_character, resolve_monster, BaseStats, Bonus, BonusStack, EffectiveStats, StatBlock,
    StatBonuses, StatBounds,
};
pub use status::{StatusDuration, StatusEffect, StatusEffects, StatusKind};
pub use turn::{TurnAdvance, TurnOrder};

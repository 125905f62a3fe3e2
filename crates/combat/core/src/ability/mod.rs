//! Ability definitions and resolution.
//!
//! Abilities are data: each job's kit is loaded from the content catalog
//! and interpreted by [`resolve`], which validates a request against the
//! current state before mutating anything.

mod resolve;

pub use resolve::{resolve_ability, AbilityError, AbilityRequest, Resolution};

use crate::config::CombatConfig;
use crate::status::StatusDuration;

/// Identifier of an ability within a job's kit (e.g. `power_strike`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an ability fundamentally does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    /// Hostile: runs the damage pipeline against each target.
    Attack,
    /// Restores HP on the target.
    Heal,
    /// Applies a beneficial status effect; no damage pipeline.
    Buff,
    /// Applies a hostile status effect (provoke); no damage pipeline.
    Debuff,
}

/// How an ability's strength is expressed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityPower {
    /// Multiplier over the user's effective attack (attacks).
    Multiplier(f64),
    /// Flat amount (heals).
    Flat(i32),
}

/// Who an ability can be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelector {
    SingleEnemy,
    SingleAlly,
    SelfOnly,
    AllEnemies,
}

/// Rider effect a damaging ability may apply after a successful hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnHitEffect {
    /// Chance (d100) to freeze the target for the given number of
    /// skipped turns. Rolled independently per target.
    Freeze { chance: u32, turns: u8 },
}

/// Status-granting payload of a buff ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffEffect {
    /// Halve incoming damage until the current round ends.
    Defend,
    /// Taunt an enemy: forced targeting plus an attack penalty.
    Provoke { attack_penalty: i32, rounds: u8 },
    /// Restore HP now and empower the user's next attack.
    Meditate { heal: i32, empower_percent: i32 },
    /// Battle-long dodge chance.
    Stealth { dodge_percent: i32 },
}

impl BuffEffect {
    /// Duration of the status this buff applies.
    pub fn duration(&self) -> StatusDuration {
        match self {
            BuffEffect::Defend => StatusDuration::Rounds(1),
            BuffEffect::Provoke { rounds, .. } => StatusDuration::Rounds(*rounds),
            BuffEffect::Meditate { .. } => StatusDuration::Battle,
            BuffEffect::Stealth { .. } => StatusDuration::Battle,
        }
    }
}

/// One ability as loaded from the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub mp_cost: i32,
    pub kind: AbilityKind,
    pub power: AbilityPower,
    pub target: TargetSelector,
    /// Rider on damaging abilities.
    pub on_hit: Option<OnHitEffect>,
    /// Status payload on buff abilities.
    pub buff: Option<BuffEffect>,
}

impl Ability {
    /// The plain attack every monster (and every job) has: no MP cost,
    /// 1.0× attack, single enemy.
    pub fn basic_attack() -> Self {
        Self {
            id: AbilityId::new("attack"),
            name: "Attack".into(),
            mp_cost: 0,
            kind: AbilityKind::Attack,
            power: AbilityPower::Multiplier(1.0),
            target: TargetSelector::SingleEnemy,
            on_hit: None,
            buff: None,
        }
    }

    /// Power multiplier scaled by the user's level.
    ///
    /// Each level past the first adds a fixed percentage of the base
    /// multiplier, so a 2.0× skill at level 3 with 15%/level resolves
    /// at 2.0 × 1.30 = 2.6×. Flat powers scale the same way.
    pub fn scaled_power(&self, level: u32, config: &CombatConfig) -> AbilityPower {
        let scale = 1.0
            + config.power_scaling_percent_per_level as f64 / 100.0
                * level.saturating_sub(1) as f64;
        match self.power {
            AbilityPower::Multiplier(m) => AbilityPower::Multiplier(m * scale),
            AbilityPower::Flat(v) => AbilityPower::Flat((v as f64 * scale) as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_attack_is_free() {
        let attack = Ability::basic_attack();
        assert_eq!(attack.mp_cost, 0);
        assert_eq!(attack.kind, AbilityKind::Attack);
        assert_eq!(attack.power, AbilityPower::Multiplier(1.0));
    }

    #[test]
    fn test_power_scales_with_level() {
        let config = CombatConfig::new();
        let ability = Ability {
            power: AbilityPower::Multiplier(2.0),
            ..Ability::basic_attack()
        };
        assert_eq!(
            ability.scaled_power(1, &config),
            AbilityPower::Multiplier(2.0)
        );
        assert_eq!(
            ability.scaled_power(3, &config),
            AbilityPower::Multiplier(2.0 * 1.3)
        );
    }

    #[test]
    fn test_flat_power_scales_and_truncates() {
        let config = CombatConfig::new();
        let heal = Ability {
            power: AbilityPower::Flat(25),
            ..Ability::basic_attack()
        };
        // 25 × 1.15 = 28.75 → 28
        assert_eq!(heal.scaled_power(2, &config), AbilityPower::Flat(28));
    }
}

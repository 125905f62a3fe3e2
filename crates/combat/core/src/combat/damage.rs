//! The damage and mitigation pipeline.
//!
//! Every hostile hit flows through the same fixed stages:
//!
//! 1. raw damage: effective attack × ability power multiplier;
//! 2. defense reduction: × 100 / (100 + defense), diminishing returns
//!    rather than flat subtraction;
//! 3. defending reduction, if the target holds the Defending status;
//! 4. HP-scaling set reduction, growing with the target's missing HP;
//! 5. round half-up and floor at zero.
//!
//! Stages run in floating point; only the final value is an integer. A
//! fully mitigated hit deals 0, which still counts as a hit (it is not a
//! dodge). Dodges are decided before the pipeline runs and skip it
//! entirely.

use crate::config::CombatConfig;

/// Result of one hostile hit against one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The target evaded; no pipeline stage ran, no damage, no on-hit
    /// effects.
    Dodged,
    /// The hit connected for this much damage (possibly 0).
    Hit { amount: i32 },
}

/// Raw pre-mitigation damage.
pub fn raw_damage(attack: i32, power: f64) -> f64 {
    attack as f64 * power
}

/// Everything known about the target that mitigates an incoming hit.
#[derive(Clone, Copy, Debug)]
pub struct Mitigation {
    /// Target's effective defense.
    pub defense: i32,
    /// Whether the target holds the Defending status.
    pub defending: bool,
    /// Highest unlocked HP-scaling reduction ceiling (percent), from the
    /// target's set bonuses. Zero when no such set is worn.
    pub scaling_reduction_max: i32,
    /// Target's current and maximum HP, for the missing-HP fraction.
    pub hp: i32,
    pub max_hp: i32,
}

impl Mitigation {
    /// Run the mitigation stages over a raw damage value.
    pub fn apply(&self, raw: f64, config: &CombatConfig) -> i32 {
        let defense = self.defense.max(0) as f64;
        let mut damage = raw * 100.0 / (100.0 + defense);

        if self.defending {
            damage *= (100 - config.defend_reduction_percent).max(0) as f64 / 100.0;
        }

        if self.scaling_reduction_max > 0 && self.max_hp > 0 {
            let missing = 1.0 - (self.hp.clamp(0, self.max_hp) as f64 / self.max_hp as f64);
            let reduction = self.scaling_reduction_max as f64 / 100.0 * missing;
            damage *= 1.0 - reduction;
        }

        round_half_up(damage).max(0)
    }
}

/// Round half-up to the nearest integer.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Apply a heal, clamped so current HP never exceeds the effective
/// maximum. Returns the amount actually restored.
pub fn apply_heal(current: &mut i32, amount: i32, max: i32) -> i32 {
    let before = *current;
    *current = (*current + amount.max(0)).min(max);
    *current - before
}

/// Apply damage, clamped so current HP never drops below zero. Returns
/// the amount actually lost.
pub fn apply_damage(current: &mut i32, amount: i32) -> i32 {
    let before = *current;
    *current = (*current - amount.max(0)).max(0);
    before - *current
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> CombatConfig {
        CombatConfig::new()
    }

    #[test]
    fn test_defense_reduction_curve() {
        // 150 raw against 150 defense: 150 × 100/250 = 60.
        let mitigation = Mitigation {
            defense: 150,
            defending: false,
            scaling_reduction_max: 0,
            hp: 100,
            max_hp: 100,
        };
        assert_eq!(mitigation.apply(raw_damage(100, 1.5), &config()), 60);
    }

    #[test]
    fn test_scaling_reduction_at_half_hp() {
        // 40% ceiling at half HP mitigates 20%: 60 → 48.
        let mitigation = Mitigation {
            defense: 150,
            defending: false,
            scaling_reduction_max: 40,
            hp: 50,
            max_hp: 100,
        };
        assert_eq!(mitigation.apply(raw_damage(100, 1.5), &config()), 48);
    }

    #[test]
    fn test_scaling_reduction_inert_at_full_hp() {
        let mitigation = Mitigation {
            defense: 150,
            defending: false,
            scaling_reduction_max: 40,
            hp: 100,
            max_hp: 100,
        };
        assert_eq!(mitigation.apply(raw_damage(100, 1.5), &config()), 60);
    }

    #[test]
    fn test_defending_halves_after_defense() {
        let mitigation = Mitigation {
            defense: 100,
            defending: true,
            scaling_reduction_max: 0,
            hp: 80,
            max_hp: 80,
        };
        // 120 × 100/200 = 60, × 0.5 = 30.
        assert_eq!(mitigation.apply(raw_damage(80, 1.5), &config()), 30);
    }

    #[test]
    fn test_fully_mitigated_hit_is_zero_not_negative() {
        let mitigation = Mitigation {
            defense: 9999,
            defending: true,
            scaling_reduction_max: 40,
            hp: 1,
            max_hp: 100,
        };
        assert_eq!(mitigation.apply(raw_damage(1, 1.0), &config()), 0);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(0.5), 1);
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut hp = 90;
        assert_eq!(apply_heal(&mut hp, 25, 100), 10);
        assert_eq!(hp, 100);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut hp = 10;
        assert_eq!(apply_damage(&mut hp, 25), 10);
        assert_eq!(hp, 0);
    }

    proptest! {
        #[test]
        fn prop_mitigated_never_exceeds_raw(
            attack in 0i32..9999,
            power in 0.0f64..5.0,
            defense in 0i32..9999,
            defending: bool,
            ceiling in 0i32..=40,
            hp in 0i32..500,
            max_hp in 1i32..500,
        ) {
            let raw = raw_damage(attack, power);
            let mitigation = Mitigation {
                defense,
                defending,
                scaling_reduction_max: ceiling,
                hp: hp.min(max_hp),
                max_hp,
            };
            let dealt = mitigation.apply(raw, &config());
            prop_assert!(dealt >= 0);
            prop_assert!((dealt as f64) <= raw + 0.5);
        }

        #[test]
        fn prop_more_defense_never_hurts(
            attack in 1i32..9999,
            power in 0.1f64..5.0,
            defense in 0i32..9000,
        ) {
            let low = Mitigation {
                defense,
                defending: false,
                scaling_reduction_max: 0,
                hp: 100,
                max_hp: 100,
            };
            let high = Mitigation { defense: defense + 100, ..low };
            let raw = raw_damage(attack, power);
            prop_assert!(high.apply(raw, &config()) <= low.apply(raw, &config()));
        }
    }
}

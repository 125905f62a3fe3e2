//! Temporary status effects and their lifecycle.
//!
//! Statuses live on each combatant in a bounded list. Durations measured
//! in rounds tick down at round boundaries, with one exception: Frozen is
//! consumed by the skipped turn itself, so a freeze landed mid-round is
//! never shortened by the wrap that follows.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::party::CombatantRef;
use crate::stats::{Bonus, StatBonuses};

/// The kind of a status effect. At most one instance of each kind is
/// active per combatant; re-application refreshes duration and magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Skips the victim's turns while active.
    Frozen,
    /// Grants a percentage chance to dodge incoming attacks entirely.
    Stealth,
    /// Forces the victim to target the provoker and lowers its attack by
    /// the effect magnitude.
    Provoked { by: CombatantRef },
    /// Halves incoming damage until the current round ends.
    Defending,
    /// The bearer's next attack deals bonus damage, then the status is
    /// consumed.
    Empowered,
}

impl StatusKind {
    fn same_kind(self, other: StatusKind) -> bool {
        matches!(
            (self, other),
            (StatusKind::Frozen, StatusKind::Frozen)
                | (StatusKind::Stealth, StatusKind::Stealth)
                | (StatusKind::Provoked { .. }, StatusKind::Provoked { .. })
                | (StatusKind::Defending, StatusKind::Defending)
                | (StatusKind::Empowered, StatusKind::Empowered)
        )
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKind::Frozen => write!(f, "Frozen"),
            StatusKind::Stealth => write!(f, "Stealth"),
            StatusKind::Provoked { .. } => write!(f, "Provoked"),
            StatusKind::Defending => write!(f, "Defending"),
            StatusKind::Empowered => write!(f, "Empowered"),
        }
    }
}

/// How long a status persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusDuration {
    /// Expires after this many round boundaries (Frozen: skipped turns).
    Rounds(u8),
    /// Lasts until the encounter resolves.
    Battle,
}

/// One active status effect.
///
/// `magnitude` is kind-specific: dodge percentage for Stealth, attack
/// penalty for Provoked, bonus attack percentage for Empowered. Frozen
/// and Defending ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: StatusDuration,
    pub magnitude: i32,
}

/// Bounded set of active statuses on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Apply a status. Re-applying a kind already present replaces it,
    /// refreshing duration and magnitude. When the list is full and the
    /// kind is new, the effect is dropped.
    pub fn apply(&mut self, effect: StatusEffect) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.kind.same_kind(effect.kind))
        {
            *existing = effect;
        } else if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_frozen(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, StatusKind::Frozen))
    }

    /// Consume one skipped turn from an active Frozen status. Returns
    /// true if the status expired (the bearer thaws afterwards).
    pub fn consume_frozen_turn(&mut self) -> bool {
        let Some(pos) = self
            .effects
            .iter()
            .position(|e| matches!(e.kind, StatusKind::Frozen))
        else {
            return false;
        };
        match &mut self.effects[pos].duration {
            StatusDuration::Rounds(n) => {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    self.effects.remove(pos);
                    true
                } else {
                    false
                }
            }
            StatusDuration::Battle => false,
        }
    }

    /// Dodge chance in percent granted by Stealth, if any.
    pub fn stealth_chance(&self) -> Option<i32> {
        self.effects
            .iter()
            .find(|e| matches!(e.kind, StatusKind::Stealth))
            .map(|e| e.magnitude)
    }

    /// Forced target imposed by an active Provoked status.
    pub fn provoked_target(&self) -> Option<CombatantRef> {
        self.effects.iter().find_map(|e| match e.kind {
            StatusKind::Provoked { by } => Some(by),
            _ => None,
        })
    }

    pub fn is_defending(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, StatusKind::Defending))
    }

    /// Remove an active Empowered status and return its bonus attack
    /// percentage. The buff is spent by the attack it boosts.
    pub fn take_empowered(&mut self) -> Option<i32> {
        let pos = self
            .effects
            .iter()
            .position(|e| matches!(e.kind, StatusKind::Empowered))?;
        Some(self.effects.remove(pos).magnitude)
    }

    /// Stat modifiers contributed by active statuses; the final layer of
    /// stat resolution.
    ///
    /// Empowered is deliberately absent: it boosts a single attack and is
    /// consumed inside the damage pipeline, not carried as a stat.
    pub fn stat_layer(&self) -> StatBonuses {
        let mut layer = StatBonuses::new();
        for effect in &self.effects {
            if let StatusKind::Provoked { .. } = effect.kind {
                layer.attack.add(Bonus::Flat(-effect.magnitude));
            }
        }
        layer
    }

    /// Advance round-scoped durations at a round boundary and drop the
    /// expired ones. Frozen is excluded (it ticks per skipped turn).
    /// Returns the kinds that expired, for event reporting.
    pub fn tick_round(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain(|effect| {
            if matches!(effect.kind, StatusKind::Frozen) {
                return true;
            }
            match &mut effect.duration {
                StatusDuration::Rounds(n) => {
                    *n = n.saturating_sub(1);
                    if *n == 0 {
                        expired.push(effect.kind);
                        false
                    } else {
                        true
                    }
                }
                StatusDuration::Battle => true,
            }
        });
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen(rounds: u8) -> StatusEffect {
        StatusEffect {
            kind: StatusKind::Frozen,
            duration: StatusDuration::Rounds(rounds),
            magnitude: 0,
        }
    }

    #[test]
    fn test_reapply_refreshes_instead_of_stacking() {
        let mut statuses = StatusEffects::new();
        statuses.apply(frozen(1));
        statuses.apply(frozen(3));
        assert_eq!(statuses.iter().count(), 1);
        // Three skipped turns before thawing.
        assert!(!statuses.consume_frozen_turn());
        assert!(!statuses.consume_frozen_turn());
        assert!(statuses.consume_frozen_turn());
        assert!(!statuses.is_frozen());
    }

    #[test]
    fn test_frozen_survives_round_tick() {
        let mut statuses = StatusEffects::new();
        statuses.apply(frozen(1));
        assert!(statuses.tick_round().is_empty());
        assert!(statuses.is_frozen());
        assert!(statuses.consume_frozen_turn());
    }

    #[test]
    fn test_provoke_expires_and_penalizes_attack() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect {
            kind: StatusKind::Provoked {
                by: CombatantRef::Party(0),
            },
            duration: StatusDuration::Rounds(2),
            magnitude: 2,
        });
        assert_eq!(statuses.provoked_target(), Some(CombatantRef::Party(0)));
        assert_eq!(statuses.stat_layer().attack.apply(10), 8);
        assert!(statuses.tick_round().is_empty());
        let expired = statuses.tick_round();
        assert!(matches!(expired.as_slice(), [StatusKind::Provoked { .. }]));
        assert_eq!(statuses.provoked_target(), None);
    }

    #[test]
    fn test_defending_lasts_until_round_end() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect {
            kind: StatusKind::Defending,
            duration: StatusDuration::Rounds(1),
            magnitude: 0,
        });
        assert!(statuses.is_defending());
        assert_eq!(statuses.tick_round(), vec![StatusKind::Defending]);
        assert!(!statuses.is_defending());
    }

    #[test]
    fn test_battle_duration_never_ticks_out() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect {
            kind: StatusKind::Stealth,
            duration: StatusDuration::Battle,
            magnitude: 20,
        });
        for _ in 0..10 {
            assert!(statuses.tick_round().is_empty());
        }
        assert_eq!(statuses.stealth_chance(), Some(20));
    }

    #[test]
    fn test_empowered_is_single_use() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusEffect {
            kind: StatusKind::Empowered,
            duration: StatusDuration::Battle,
            magnitude: 50,
        });
        assert_eq!(statuses.take_empowered(), Some(50));
        assert_eq!(statuses.take_empowered(), None);
    }
}

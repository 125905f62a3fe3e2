//! Combat events emitted during resolution.
//!
//! Every state mutation produces an event, in the order the mutations
//! happened. Callers render them as a battle log, drive animations from
//! the cues, or just drop them. Events carry enough to describe what
//! happened without the caller re-deriving it from state diffs.

use crate::items::PotionId;
use crate::party::CombatantRef;
use crate::status::StatusKind;

/// Animation hint attached to some events, for front ends that stage
/// visual playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationCue {
    Entrance,
    Impact,
    Defeated,
}

/// One thing that happened during combat resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// An encounter began with this many monsters at this depth.
    EncounterStarted { depth: u32, monsters: u8 },
    /// A hostile hit connected.
    AttackHit {
        attacker: CombatantRef,
        target: CombatantRef,
        damage: i32,
    },
    /// The target evaded entirely; no damage, no on-hit effects.
    Dodged {
        attacker: CombatantRef,
        target: CombatantRef,
    },
    /// HP restored (ability heal or round regeneration).
    Healed { target: CombatantRef, amount: i32 },
    /// MP restored by round regeneration.
    ManaRestored { target: CombatantRef, amount: i32 },
    /// A status effect landed.
    StatusApplied {
        target: CombatantRef,
        status: StatusKind,
    },
    /// A status effect ran out at a round boundary.
    StatusExpired {
        target: CombatantRef,
        status: StatusKind,
    },
    /// A frozen combatant's turn was skipped.
    FrozenSkip { target: CombatantRef },
    /// A monster dropped to 0 HP.
    MonsterDefeated { target: CombatantRef },
    /// A party member dropped to 0 HP.
    CharacterDowned { target: CombatantRef },
    /// A flee attempt failed; the turn is spent.
    FleeFailed { actor: CombatantRef },
    /// The party escaped the encounter.
    Fled,
    /// Every monster is defeated.
    Victory { xp: u64, gold: u64 },
    /// Every party member is downed.
    Defeat,
    /// A defeated monster dropped a piece of equipment.
    EquipmentDropped {
        item: crate::items::ItemId,
        enhancement: u8,
    },
    /// A defeated monster dropped a potion.
    PotionDropped { potion: PotionId },
}

impl CombatEvent {
    /// Animation cue for front ends, when one applies.
    pub fn cue(&self) -> Option<AnimationCue> {
        match self {
            CombatEvent::EncounterStarted { .. } => Some(AnimationCue::Entrance),
            CombatEvent::AttackHit { .. } => Some(AnimationCue::Impact),
            CombatEvent::MonsterDefeated { .. } | CombatEvent::CharacterDowned { .. } => {
                Some(AnimationCue::Defeated)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatEvent::EncounterStarted { depth, monsters } => {
                write!(f, "{monsters} monster(s) appear at depth {depth}")
            }
            CombatEvent::AttackHit {
                attacker,
                target,
                damage,
            } => write!(f, "{attacker} hits {target} for {damage}"),
            CombatEvent::Dodged { attacker, target } => {
                write!(f, "{target} dodges {attacker}'s attack")
            }
            CombatEvent::Healed { target, amount } => {
                write!(f, "{target} recovers {amount} HP")
            }
            CombatEvent::ManaRestored { target, amount } => {
                write!(f, "{target} recovers {amount} MP")
            }
            CombatEvent::StatusApplied { target, status } => {
                write!(f, "{target} is {status}")
            }
            CombatEvent::StatusExpired { target, status } => {
                write!(f, "{status} wears off {target}")
            }
            CombatEvent::FrozenSkip { target } => write!(f, "{target} is frozen solid"),
            CombatEvent::MonsterDefeated { target } => write!(f, "{target} is defeated"),
            CombatEvent::CharacterDowned { target } => write!(f, "{target} falls"),
            CombatEvent::FleeFailed { actor } => write!(f, "{actor} fails to flee"),
            CombatEvent::Fled => write!(f, "the party escapes"),
            CombatEvent::Victory { xp, gold } => {
                write!(f, "victory! {xp} XP and {gold} gold earned")
            }
            CombatEvent::Defeat => write!(f, "the party has fallen"),
            CombatEvent::EquipmentDropped { item, enhancement } => {
                write!(f, "{item} (+{enhancement}) dropped")
            }
            CombatEvent::PotionDropped { potion } => {
                write!(f, "potion#{} dropped", potion.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lines() {
        let hit = CombatEvent::AttackHit {
            attacker: CombatantRef::Party(0),
            target: CombatantRef::Monster(2),
            damage: 48,
        };
        assert_eq!(hit.to_string(), "party[0] hits monster[2] for 48");
        assert_eq!(hit.cue(), Some(AnimationCue::Impact));

        let fled = CombatEvent::Fled;
        assert_eq!(fled.to_string(), "the party escapes");
        assert_eq!(fled.cue(), None);
    }
}

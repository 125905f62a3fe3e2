//! Combat sessions and the state machine driving them.
//!
//! The phase machine is `Idle → Active → Resolved → Idle`. An encounter
//! request spawns monsters and arms the scheduler; each action call
//! resolves exactly one combatant's turn; terminal conditions are checked
//! after every action with victory winning ties; acknowledgment collects
//! the outcome and returns to idle. Action requests outside `Active`
//! fail with `InvalidState` and touch nothing.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::ability::{resolve_ability, Ability, AbilityError, AbilityId, AbilityRequest};
use crate::combat::damage::apply_heal;
use crate::config::CombatConfig;
use crate::env::{compute_seed, CombatEnv, OracleError};
use crate::events::CombatEvent;
use crate::loot::{roll_victory_rewards, VictoryRewards};
use crate::party::{CombatantRef, Monster, Party};
use crate::sets::aggregate_set_bonuses;
use crate::spawn::{spawn_encounter, SpawnError};
use crate::status::StatusKind;
use crate::turn::TurnOrder;

/// How a finished encounter ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory(VictoryRewards),
    Defeat,
    Fled,
}

/// One live (or just-finished) encounter.
///
/// Monsters are owned exclusively by the session and discarded with it;
/// the party lives outside and is only borrowed per call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub depth: u32,
    pub monsters: ArrayVec<Monster, { CombatConfig::MAX_ENCOUNTER_SIZE }>,
    pub turn_order: TurnOrder,
    /// Base seed for every roll in this session.
    pub seed: u64,
    /// Advances once per resolved action.
    pub nonce: u64,
}

/// The combat state machine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    #[default]
    Idle,
    Active(CombatSession),
    Resolved {
        session: CombatSession,
        outcome: CombatOutcome,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("action not valid in the current combat phase")]
    InvalidState,

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Drives one party through encounters.
///
/// Borrows the party and phase for the duration of one call sequence;
/// all content comes in through the environment. Single-threaded by
/// contract: exactly one action is in flight at a time.
pub struct CombatEngine<'a> {
    party: &'a mut Party,
    phase: &'a mut CombatPhase,
    env: CombatEnv<'a>,
}

impl<'a> CombatEngine<'a> {
    pub fn new(party: &'a mut Party, phase: &'a mut CombatPhase, env: CombatEnv<'a>) -> Self {
        Self { party, phase, env }
    }

    pub fn phase(&self) -> &CombatPhase {
        self.phase
    }

    /// Whose action is expected next, while a session is active.
    pub fn current_combatant(&self) -> Option<CombatantRef> {
        match &*self.phase {
            CombatPhase::Active(session) => session.turn_order.current(),
            _ => None,
        }
    }

    /// Spawn an encounter at the given depth and arm the scheduler.
    ///
    /// The turn order covers living party members plus every spawned
    /// monster, sorted by effective speed.
    pub fn request_encounter(
        &mut self,
        depth: u32,
        seed: u64,
    ) -> Result<Vec<CombatEvent>, SessionError> {
        if !matches!(&*self.phase, CombatPhase::Idle) {
            return Err(SessionError::InvalidState);
        }
        if !self.party.any_alive() {
            return Err(SessionError::InvalidState);
        }

        let monsters = spawn_encounter(depth, &self.env, seed, 0)?;
        let mut entries: Vec<(CombatantRef, i32)> = Vec::new();
        for (i, member) in self.party.living() {
            let stats = crate::stats::resolve_character(
                member.base,
                &member.loadout,
                self.env.sets()?,
                &member.statuses,
            );
            entries.push((CombatantRef::Party(i), stats.speed));
        }
        for (i, monster) in monsters.iter().enumerate() {
            entries.push((CombatantRef::Monster(i as u8), monster.stats.speed));
        }

        let events = vec![CombatEvent::EncounterStarted {
            depth,
            monsters: monsters.len() as u8,
        }];
        debug!(depth, count = monsters.len(), "encounter spawned");

        *self.phase = CombatPhase::Active(CombatSession {
            depth,
            monsters,
            turn_order: TurnOrder::new(&entries),
            seed,
            nonce: 1,
        });
        Ok(events)
    }

    /// Resolve the current combatant's chosen ability.
    ///
    /// Validation failures (`InsufficientResource`, `InvalidTarget`)
    /// leave the turn unconsumed so the caller can re-prompt.
    pub fn resolve_ability(
        &mut self,
        ability_id: &AbilityId,
        target: Option<CombatantRef>,
    ) -> Result<Vec<CombatEvent>, SessionError> {
        let CombatPhase::Active(session) = &mut *self.phase else {
            return Err(SessionError::InvalidState);
        };
        let Some(actor) = session.turn_order.current() else {
            return Err(SessionError::InvalidState);
        };

        let ability = lookup_ability(self.party, &self.env, actor, ability_id)?;
        let resolution = resolve_ability(
            self.party,
            &mut session.monsters,
            &self.env,
            session.seed,
            session.nonce,
            AbilityRequest {
                actor,
                ability: &ability,
                target,
            },
        )?;
        session.nonce += 1;
        debug!(%actor, ability = %ability.id, events = resolution.events.len(), "action resolved");

        let mut events = resolution.events;
        self.finish_action(&mut events)?;
        Ok(events)
    }

    /// Attempt to flee with the current (party) combatant.
    ///
    /// Success ends the session as `Fled`; failure consumes the turn.
    pub fn attempt_flee(&mut self) -> Result<Vec<CombatEvent>, SessionError> {
        let CombatPhase::Active(session) = &mut *self.phase else {
            return Err(SessionError::InvalidState);
        };
        let Some(actor) = session.turn_order.current() else {
            return Err(SessionError::InvalidState);
        };
        if !actor.is_party() {
            return Err(SessionError::InvalidState);
        }

        let seed = compute_seed(session.seed, session.nonce, u32::MAX, 0);
        session.nonce += 1;
        let roll = self.env.rng()?.roll_d100(seed);
        if roll <= self.env.config().flee_chance_percent {
            debug!(%actor, roll, "flee succeeded");
            self.resolve(CombatOutcome::Fled);
            return Ok(vec![CombatEvent::Fled]);
        }

        debug!(%actor, roll, "flee failed");
        let mut events = vec![CombatEvent::FleeFailed { actor }];
        self.finish_action(&mut events)?;
        Ok(events)
    }

    /// Pass the current combatant's turn without acting.
    ///
    /// Consumes the turn exactly like a resolved action: the scheduler
    /// steps past dead slots, frozen turns are consumed, and
    /// round-boundary effects run on wrap. Returns the combatant whose
    /// action is expected next.
    pub fn advance_turn(&mut self) -> Result<(CombatantRef, Vec<CombatEvent>), SessionError> {
        let CombatPhase::Active(session) = &mut *self.phase else {
            return Err(SessionError::InvalidState);
        };
        if session.turn_order.current().is_none() {
            return Err(SessionError::InvalidState);
        }
        session.nonce += 1;

        let mut events = Vec::new();
        self.finish_action(&mut events)?;
        let next = self
            .current_combatant()
            .ok_or(SessionError::InvalidState)?;
        Ok((next, events))
    }

    /// Collect the outcome of a resolved session and return to idle.
    ///
    /// On victory the party is credited: gold to the shared purse, XP to
    /// every surviving member. Drop payloads stay in the returned
    /// outcome for the persistence layer.
    pub fn acknowledge(&mut self) -> Result<CombatOutcome, SessionError> {
        let phase = std::mem::take(self.phase);
        let CombatPhase::Resolved { outcome, .. } = phase else {
            *self.phase = phase;
            return Err(SessionError::InvalidState);
        };
        if let CombatOutcome::Victory(rewards) = &outcome {
            self.party.gold += rewards.gold;
            for i in 0..self.party.members.len() {
                if self.party.members[i].is_alive() {
                    self.party.members[i].xp += rewards.xp;
                }
            }
        }
        Ok(outcome)
    }

    // ===== internals =====

    /// Terminal-condition check and turn advancement after a consumed
    /// action. Victory is checked before defeat.
    fn finish_action(&mut self, events: &mut Vec<CombatEvent>) -> Result<(), SessionError> {
        let CombatPhase::Active(session) = &mut *self.phase else {
            return Err(SessionError::InvalidState);
        };

        if !session.monsters.iter().any(Monster::is_alive) {
            let rewards = roll_victory_rewards(
                &session.monsters,
                session.depth,
                &self.env,
                session.seed,
                session.nonce,
            )?;
            session.nonce += 1;
            events.push(CombatEvent::Victory {
                xp: rewards.xp,
                gold: rewards.gold,
            });
            for drop in &rewards.equipment {
                events.push(CombatEvent::EquipmentDropped {
                    item: drop.item,
                    enhancement: drop.enhancement,
                });
            }
            for &potion in &rewards.potions {
                events.push(CombatEvent::PotionDropped { potion });
            }
            self.resolve(CombatOutcome::Victory(rewards));
            return Ok(());
        }

        if !self.party.any_alive() {
            events.push(CombatEvent::Defeat);
            self.resolve(CombatOutcome::Defeat);
            return Ok(());
        }

        // Step the scheduler: skip dead slots, consume frozen turns, run
        // round-boundary effects once per wrap.
        loop {
            let CombatSession {
                monsters,
                turn_order,
                ..
            } = &mut *session;
            let party = &*self.party;
            let Some(step) = turn_order.advance(|r| match r {
                CombatantRef::Party(i) => party.member(i).is_some_and(|c| c.is_alive()),
                CombatantRef::Monster(i) => {
                    monsters.get(i as usize).is_some_and(|m| m.is_alive())
                }
            }) else {
                return Err(SessionError::InvalidState);
            };

            for _ in 0..step.rounds_elapsed {
                round_boundary(self.party, &mut session.monsters, &self.env, events)?;
            }

            let frozen = match step.next {
                CombatantRef::Party(i) => self
                    .party
                    .member_mut(i)
                    .map(|c| &mut c.statuses),
                CombatantRef::Monster(i) => {
                    session.monsters.get_mut(i as usize).map(|m| &mut m.statuses)
                }
            }
            .filter(|s| s.is_frozen());

            let Some(statuses) = frozen else {
                return Ok(());
            };
            events.push(CombatEvent::FrozenSkip { target: step.next });
            if statuses.consume_frozen_turn() {
                events.push(CombatEvent::StatusExpired {
                    target: step.next,
                    status: StatusKind::Frozen,
                });
            }
        }
    }

    fn resolve(&mut self, outcome: CombatOutcome) {
        let phase = std::mem::take(self.phase);
        if let CombatPhase::Active(session) = phase {
            *self.phase = CombatPhase::Resolved { session, outcome };
        }
    }
}

/// Resolve an ability id for the acting combatant. Party members draw
/// from their job's kit; monsters only know the basic attack.
fn lookup_ability(
    party: &Party,
    env: &CombatEnv<'_>,
    actor: CombatantRef,
    id: &AbilityId,
) -> Result<Ability, SessionError> {
    match actor {
        CombatantRef::Party(i) => {
            let member = party.member(i).ok_or(SessionError::InvalidState)?;
            let ability = env
                .abilities()
                .map_err(AbilityError::from)?
                .ability(member.job, id)
                .ok_or_else(|| AbilityError::UnknownAbility(id.clone()))?;
            Ok(ability.clone())
        }
        CombatantRef::Monster(_) => {
            let attack = Ability::basic_attack();
            if *id != attack.id {
                return Err(AbilityError::UnknownAbility(id.clone()).into());
            }
            Ok(attack)
        }
    }
}

/// Per-round effects: status countdowns and set regeneration, applied
/// once per combatant per round.
fn round_boundary(
    party: &mut Party,
    monsters: &mut [Monster],
    env: &CombatEnv<'_>,
    events: &mut Vec<CombatEvent>,
) -> Result<(), SessionError> {
    let sets = env.sets().map_err(AbilityError::from)?;

    for i in 0..party.members.len() {
        let member = &mut party.members[i];
        if !member.is_alive() {
            continue;
        }
        let target = CombatantRef::Party(i as u8);
        for status in member.statuses.tick_round() {
            events.push(CombatEvent::StatusExpired { target, status });
        }

        let aggregate = aggregate_set_bonuses(&member.loadout, sets);
        if aggregate.hp_regen > 0 || aggregate.mp_regen > 0 {
            let stats = crate::stats::resolve_character(
                member.base,
                &member.loadout,
                sets,
                &member.statuses,
            );
            if aggregate.hp_regen > 0 {
                let restored = apply_heal(&mut member.hp, aggregate.hp_regen, stats.max_hp);
                if restored > 0 {
                    events.push(CombatEvent::Healed {
                        target,
                        amount: restored,
                    });
                }
            }
            if aggregate.mp_regen > 0 {
                let before = member.mp;
                member.mp = (member.mp + aggregate.mp_regen).min(stats.max_mp);
                if member.mp > before {
                    events.push(CombatEvent::ManaRestored {
                        target,
                        amount: member.mp - before,
                    });
                }
            }
        }
    }

    for (i, monster) in monsters.iter_mut().enumerate() {
        if !monster.is_alive() {
            continue;
        }
        let target = CombatantRef::Monster(i as u8);
        for status in monster.statuses.tick_round() {
            events.push(CombatEvent::StatusExpired { target, status });
        }
    }
    Ok(())
}

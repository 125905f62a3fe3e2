//! Validate-then-mutate ability resolution.
//!
//! A resolution call either fails before touching any state or runs to
//! completion. Validation (actor liveness, MP, target selection, ability
//! shape) happens up front; only then is MP deducted and the dispatch by
//! ability kind allowed to mutate HP, MP, and statuses. A failed call
//! therefore never leaves a half-applied action behind, and
//! `InsufficientResource` in particular does not consume the turn.

use crate::ability::{Ability, AbilityId, AbilityKind, AbilityPower, BuffEffect, OnHitEffect, TargetSelector};
use crate::combat::damage::{apply_damage, apply_heal, raw_damage, DamageOutcome, Mitigation};
use crate::env::{compute_seed, CombatEnv, OracleError};
use crate::events::CombatEvent;
use crate::party::{CombatantRef, Monster, Party};
use crate::sets::aggregate_set_bonuses;
use crate::stats::{resolve_character, resolve_monster, EffectiveStats};
use crate::status::{StatusDuration, StatusEffect, StatusKind};

/// Why an ability request was rejected. All variants leave state
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("not enough MP: need {needed}, have {available}")]
    InsufficientResource { needed: i32, available: i32 },

    #[error("invalid target for {ability}")]
    InvalidTarget { ability: AbilityId },

    #[error("action not valid in the current state")]
    InvalidState,

    #[error("unknown ability {0}")]
    UnknownAbility(AbilityId),

    #[error("ability {0} has an inconsistent definition")]
    MalformedAbility(AbilityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// A resolution request: who acts, with what, at whom.
///
/// `target` is required for single-target selectors and must be absent
/// for self and all-enemies selectors.
#[derive(Clone, Debug)]
pub struct AbilityRequest<'r> {
    pub actor: CombatantRef,
    pub ability: &'r Ability,
    pub target: Option<CombatantRef>,
}

/// Everything one resolved action produced, in mutation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub events: Vec<CombatEvent>,
}

/// Mutable view over both sides of an encounter.
pub(crate) struct Roster<'s> {
    pub party: &'s mut Party,
    pub monsters: &'s mut [Monster],
}

impl Roster<'_> {
    pub fn is_alive(&self, r: CombatantRef) -> bool {
        match r {
            CombatantRef::Party(i) => self.party.member(i).is_some_and(|c| c.is_alive()),
            CombatantRef::Monster(i) => self
                .monsters
                .get(i as usize)
                .is_some_and(|m| m.is_alive()),
        }
    }

    pub fn hp(&self, r: CombatantRef) -> i32 {
        match r {
            CombatantRef::Party(i) => self.party.member(i).map_or(0, |c| c.hp),
            CombatantRef::Monster(i) => self.monsters.get(i as usize).map_or(0, |m| m.hp),
        }
    }

    pub fn statuses_mut(&mut self, r: CombatantRef) -> Option<&mut crate::status::StatusEffects> {
        match r {
            CombatantRef::Party(i) => self.party.member_mut(i).map(|c| &mut c.statuses),
            CombatantRef::Monster(i) => self.monsters.get_mut(i as usize).map(|m| &mut m.statuses),
        }
    }

    pub fn statuses(&self, r: CombatantRef) -> Option<&crate::status::StatusEffects> {
        match r {
            CombatantRef::Party(i) => self.party.member(i).map(|c| &c.statuses),
            CombatantRef::Monster(i) => self.monsters.get(i as usize).map(|m| &m.statuses),
        }
    }

    /// Effective stats through the full layer stack.
    pub fn effective(
        &self,
        env: &CombatEnv<'_>,
        r: CombatantRef,
    ) -> Result<EffectiveStats, AbilityError> {
        match r {
            CombatantRef::Party(i) => {
                let c = self.party.member(i).ok_or(AbilityError::InvalidState)?;
                Ok(resolve_character(c.base, &c.loadout, env.sets()?, &c.statuses))
            }
            CombatantRef::Monster(i) => {
                let m = self
                    .monsters
                    .get(i as usize)
                    .ok_or(AbilityError::InvalidState)?;
                Ok(resolve_monster(m.stats, &m.statuses))
            }
        }
    }

    /// HP-scaling reduction ceiling from the target's worn sets. Zero
    /// for monsters, which carry no equipment.
    pub fn scaling_ceiling(
        &self,
        env: &CombatEnv<'_>,
        r: CombatantRef,
    ) -> Result<i32, AbilityError> {
        match r {
            CombatantRef::Party(i) => {
                let c = self.party.member(i).ok_or(AbilityError::InvalidState)?;
                Ok(aggregate_set_bonuses(&c.loadout, env.sets()?).scaling_reduction_max)
            }
            CombatantRef::Monster(_) => Ok(0),
        }
    }

    pub fn living_enemies_of(&self, r: CombatantRef) -> Vec<CombatantRef> {
        if r.is_party() {
            self.monsters
                .iter()
                .enumerate()
                .filter(|(_, m)| m.is_alive())
                .map(|(i, _)| CombatantRef::Monster(i as u8))
                .collect()
        } else {
            self.party.living().map(|(i, _)| CombatantRef::Party(i)).collect()
        }
    }
}

/// Stable per-combatant index for seed mixing.
pub(crate) fn actor_index(r: CombatantRef) -> u32 {
    match r {
        CombatantRef::Party(i) => i as u32,
        CombatantRef::Monster(i) => 0x100 + i as u32,
    }
}

fn opposed(a: CombatantRef, b: CombatantRef) -> bool {
    a.is_party() != b.is_party()
}

/// Resolve one ability request against the roster.
///
/// `session_seed` and `nonce` feed the deterministic rolls; the caller
/// advances the nonce once per resolved action.
pub fn resolve_ability(
    party: &mut Party,
    monsters: &mut [Monster],
    env: &CombatEnv<'_>,
    session_seed: u64,
    nonce: u64,
    request: AbilityRequest<'_>,
) -> Result<Resolution, AbilityError> {
    let mut roster = Roster { party, monsters };
    let ability = request.ability;
    let actor = request.actor;

    if !roster.is_alive(actor) {
        return Err(AbilityError::InvalidState);
    }

    // ===== validation, before any mutation =====
    let available = match actor {
        CombatantRef::Party(i) => roster.party.member(i).map_or(0, |c| c.mp),
        CombatantRef::Monster(i) => roster.monsters.get(i as usize).map_or(0, |m| m.mp),
    };
    if available < ability.mp_cost {
        return Err(AbilityError::InsufficientResource {
            needed: ability.mp_cost,
            available,
        });
    }

    let targets = select_targets(&roster, actor, ability, request.target)?;

    // Shape checks so dispatch below cannot fail mid-mutation.
    match ability.kind {
        AbilityKind::Attack => {
            if !matches!(ability.power, AbilityPower::Multiplier(_)) {
                return Err(AbilityError::MalformedAbility(ability.id.clone()));
            }
        }
        AbilityKind::Heal => {
            if !matches!(ability.power, AbilityPower::Flat(_)) {
                return Err(AbilityError::MalformedAbility(ability.id.clone()));
            }
        }
        AbilityKind::Buff | AbilityKind::Debuff => {
            if ability.buff.is_none() {
                return Err(AbilityError::MalformedAbility(ability.id.clone()));
            }
        }
    }

    // Dispatch resolves effective stats for every kind, and attacks
    // roll dodge and rider chances. Confirm those oracles are present
    // before the MP deduction so a failed call leaves state untouched.
    env.sets()?;
    if matches!(ability.kind, AbilityKind::Attack) {
        env.rng()?;
    }

    // ===== mutation =====
    match actor {
        CombatantRef::Party(i) => {
            if let Some(c) = roster.party.member_mut(i) {
                c.mp -= ability.mp_cost;
            }
        }
        CombatantRef::Monster(i) => {
            if let Some(m) = roster.monsters.get_mut(i as usize) {
                m.mp -= ability.mp_cost;
            }
        }
    }

    let mut resolution = Resolution::default();
    let mut rolls = RollStream::new(session_seed, nonce, actor_index(actor));

    match ability.kind {
        AbilityKind::Attack => resolve_attack(
            &mut roster,
            env,
            actor,
            ability,
            &targets,
            &mut rolls,
            &mut resolution,
        )?,
        AbilityKind::Heal => resolve_heal(&mut roster, env, actor, ability, &targets, &mut resolution)?,
        AbilityKind::Buff | AbilityKind::Debuff => {
            resolve_status(&mut roster, env, actor, ability, &targets, &mut resolution)?
        }
    }

    Ok(resolution)
}

/// Sequential deterministic roll source for one action.
struct RollStream {
    session_seed: u64,
    nonce: u64,
    actor: u32,
    context: u32,
}

impl RollStream {
    fn new(session_seed: u64, nonce: u64, actor: u32) -> Self {
        Self {
            session_seed,
            nonce,
            actor,
            context: 0,
        }
    }

    fn d100(&mut self, env: &CombatEnv<'_>) -> Result<u32, OracleError> {
        let seed = compute_seed(self.session_seed, self.nonce, self.actor, self.context);
        self.context += 1;
        Ok(env.rng()?.roll_d100(seed))
    }
}

fn select_targets(
    roster: &Roster<'_>,
    actor: CombatantRef,
    ability: &Ability,
    requested: Option<CombatantRef>,
) -> Result<Vec<CombatantRef>, AbilityError> {
    let invalid = || AbilityError::InvalidTarget {
        ability: ability.id.clone(),
    };

    match ability.target {
        TargetSelector::SingleEnemy => {
            // A provoked actor has its hostile target forced to the
            // provoker, regardless of what was requested.
            let forced = roster
                .statuses(actor)
                .and_then(|s| s.provoked_target())
                .filter(|&t| roster.is_alive(t) && opposed(actor, t));
            let target = match forced {
                Some(t) => t,
                None => requested.ok_or_else(invalid)?,
            };
            if !opposed(actor, target) || !roster.is_alive(target) {
                return Err(invalid());
            }
            Ok(vec![target])
        }
        TargetSelector::SingleAlly => {
            let target = requested.ok_or_else(invalid)?;
            if opposed(actor, target) || !roster.is_alive(target) {
                return Err(invalid());
            }
            Ok(vec![target])
        }
        TargetSelector::SelfOnly => {
            if requested.is_some_and(|t| t != actor) {
                return Err(invalid());
            }
            Ok(vec![actor])
        }
        TargetSelector::AllEnemies => {
            if requested.is_some() {
                return Err(invalid());
            }
            let enemies = roster.living_enemies_of(actor);
            if enemies.is_empty() {
                return Err(invalid());
            }
            Ok(enemies)
        }
    }
}

fn actor_level(roster: &Roster<'_>, actor: CombatantRef) -> u32 {
    match actor {
        CombatantRef::Party(i) => roster.party.member(i).map_or(1, |c| c.level),
        CombatantRef::Monster(_) => 1,
    }
}

fn resolve_attack(
    roster: &mut Roster<'_>,
    env: &CombatEnv<'_>,
    actor: CombatantRef,
    ability: &Ability,
    targets: &[CombatantRef],
    rolls: &mut RollStream,
    resolution: &mut Resolution,
) -> Result<(), AbilityError> {
    let attack = roster.effective(env, actor)?.attack;
    let AbilityPower::Multiplier(multiplier) =
        ability.scaled_power(actor_level(roster, actor), env.config())
    else {
        return Err(AbilityError::MalformedAbility(ability.id.clone()));
    };

    // A pending Empowered buff boosts this whole swing, then is spent.
    let empowered = roster
        .statuses_mut(actor)
        .and_then(|s| s.take_empowered())
        .unwrap_or(0);
    let raw = raw_damage(attack, multiplier) * (100 + empowered) as f64 / 100.0;

    for &target in targets {
        // Dodge short-circuits the whole pipeline: no damage, no riders.
        let outcome = match roster.statuses(target).and_then(|s| s.stealth_chance()) {
            Some(chance) if rolls.d100(env)? as i32 <= chance => DamageOutcome::Dodged,
            _ => {
                let effective = roster.effective(env, target)?;
                let mitigation = Mitigation {
                    defense: effective.defense,
                    defending: roster.statuses(target).is_some_and(|s| s.is_defending()),
                    scaling_reduction_max: roster.scaling_ceiling(env, target)?,
                    hp: roster.hp(target),
                    max_hp: effective.max_hp,
                };
                DamageOutcome::Hit {
                    amount: mitigation.apply(raw, env.config()),
                }
            }
        };
        let DamageOutcome::Hit { amount } = outcome else {
            resolution.events.push(CombatEvent::Dodged {
                attacker: actor,
                target,
            });
            continue;
        };

        let hp_after = match target {
            CombatantRef::Party(i) => {
                let c = roster
                    .party
                    .member_mut(i)
                    .ok_or(AbilityError::InvalidState)?;
                apply_damage(&mut c.hp, amount);
                c.hp
            }
            CombatantRef::Monster(i) => {
                let m = roster
                    .monsters
                    .get_mut(i as usize)
                    .ok_or(AbilityError::InvalidState)?;
                apply_damage(&mut m.hp, amount);
                m.hp
            }
        };
        resolution.events.push(CombatEvent::AttackHit {
            attacker: actor,
            target,
            damage: amount,
        });
        if hp_after == 0 {
            resolution.events.push(match target {
                CombatantRef::Party(_) => CombatEvent::CharacterDowned { target },
                CombatantRef::Monster(_) => CombatEvent::MonsterDefeated { target },
            });
            continue;
        }

        // On-hit riders roll independently per surviving target.
        if let Some(OnHitEffect::Freeze { chance, turns }) = ability.on_hit {
            if rolls.d100(env)? <= chance {
                if let Some(statuses) = roster.statuses_mut(target) {
                    statuses.apply(StatusEffect {
                        kind: StatusKind::Frozen,
                        duration: StatusDuration::Rounds(turns),
                        magnitude: 0,
                    });
                    resolution.events.push(CombatEvent::StatusApplied {
                        target,
                        status: StatusKind::Frozen,
                    });
                }
            }
        }
    }
    Ok(())
}

fn resolve_heal(
    roster: &mut Roster<'_>,
    env: &CombatEnv<'_>,
    actor: CombatantRef,
    ability: &Ability,
    targets: &[CombatantRef],
    resolution: &mut Resolution,
) -> Result<(), AbilityError> {
    let AbilityPower::Flat(amount) = ability.scaled_power(actor_level(roster, actor), env.config())
    else {
        return Err(AbilityError::MalformedAbility(ability.id.clone()));
    };

    for &target in targets {
        let max_hp = roster.effective(env, target)?.max_hp;
        let restored = match target {
            CombatantRef::Party(i) => {
                let c = roster
                    .party
                    .member_mut(i)
                    .ok_or(AbilityError::InvalidState)?;
                apply_heal(&mut c.hp, amount, max_hp)
            }
            CombatantRef::Monster(i) => {
                let m = roster
                    .monsters
                    .get_mut(i as usize)
                    .ok_or(AbilityError::InvalidState)?;
                apply_heal(&mut m.hp, amount, max_hp)
            }
        };
        resolution.events.push(CombatEvent::Healed {
            target,
            amount: restored,
        });
    }
    Ok(())
}

fn resolve_status(
    roster: &mut Roster<'_>,
    env: &CombatEnv<'_>,
    actor: CombatantRef,
    ability: &Ability,
    targets: &[CombatantRef],
    resolution: &mut Resolution,
) -> Result<(), AbilityError> {
    let Some(buff) = ability.buff else {
        return Err(AbilityError::MalformedAbility(ability.id.clone()));
    };

    for &target in targets {
        // Meditate heals before it empowers.
        if let BuffEffect::Meditate { heal, .. } = buff {
            let max_hp = roster.effective(env, target)?.max_hp;
            let restored = match target {
                CombatantRef::Party(i) => {
                    let c = roster
                        .party
                        .member_mut(i)
                        .ok_or(AbilityError::InvalidState)?;
                    apply_heal(&mut c.hp, heal, max_hp)
                }
                CombatantRef::Monster(i) => {
                    let m = roster
                        .monsters
                        .get_mut(i as usize)
                        .ok_or(AbilityError::InvalidState)?;
                    apply_heal(&mut m.hp, heal, max_hp)
                }
            };
            resolution.events.push(CombatEvent::Healed {
                target,
                amount: restored,
            });
        }

        let (kind, magnitude) = match buff {
            BuffEffect::Defend => (StatusKind::Defending, 0),
            BuffEffect::Provoke { attack_penalty, .. } => {
                (StatusKind::Provoked { by: actor }, attack_penalty)
            }
            BuffEffect::Meditate {
                empower_percent, ..
            } => (StatusKind::Empowered, empower_percent),
            BuffEffect::Stealth { dodge_percent } => (StatusKind::Stealth, dodge_percent),
        };
        if let Some(statuses) = roster.statuses_mut(target) {
            statuses.apply(StatusEffect {
                kind,
                duration: buff.duration(),
                magnitude,
            });
            resolution
                .events
                .push(CombatEvent::StatusApplied { target, status: kind });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityId;
    use crate::config::CombatConfig;
    use crate::env::{Env, PcgRng};
    use crate::party::{Character, CharacterId, Job, SpeciesId};
    use crate::sets::{SetBonus, SetBonusOracle, SetId};
    use crate::stats::BaseStats;

    struct NoSets;

    impl SetBonusOracle for NoSets {
        fn set_bonus(&self, _id: SetId) -> Option<&SetBonus> {
            None
        }
    }

    fn test_env<'a>(
        sets: &'a NoSets,
        rng: &'a PcgRng,
        config: &'a CombatConfig,
    ) -> CombatEnv<'a> {
        Env::new(None, None, Some(sets as _), None, Some(rng as _), config)
    }

    fn mage(mp: i32) -> Character {
        let mut c = Character::new(
            CharacterId(0),
            "Mira",
            Job::Mage,
            BaseStats::new(40, mp, 20, 5, 7),
        );
        c.mp = mp;
        c
    }

    fn slime(hp: i32, defense: i32) -> Monster {
        Monster {
            species: SpeciesId(1),
            name: "Slime".into(),
            stats: BaseStats::new(hp, 0, 6, defense, 3),
            hp,
            mp: 0,
            statuses: crate::status::StatusEffects::new(),
            xp_value: 5,
            gold_value: 3,
        }
    }

    fn fireball() -> Ability {
        Ability {
            id: AbilityId::new("fireball"),
            name: "Fireball".into(),
            mp_cost: 8,
            kind: AbilityKind::Attack,
            power: AbilityPower::Multiplier(3.0),
            target: TargetSelector::SingleEnemy,
            on_hit: None,
            buff: None,
        }
    }

    #[test]
    fn test_fireball_mp_exhaustion() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        party.members.push(mage(8));
        let mut monsters = vec![slime(100, 0)];
        let ability = fireball();

        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &ability,
                target: Some(CombatantRef::Monster(0)),
            },
        )
        .unwrap();

        // 20 attack × 3.0 against 0 defense: exactly 60.
        assert_eq!(
            resolution.events,
            vec![CombatEvent::AttackHit {
                attacker: CombatantRef::Party(0),
                target: CombatantRef::Monster(0),
                damage: 60,
            }]
        );
        assert_eq!(party.members[0].mp, 0);
        assert_eq!(monsters[0].hp, 40);

        // Casting again fails without consuming anything.
        let err = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            1,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &ability,
                target: Some(CombatantRef::Monster(0)),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            AbilityError::InsufficientResource {
                needed: 8,
                available: 0
            }
        );
        assert_eq!(party.members[0].mp, 0);
        assert_eq!(monsters[0].hp, 40);
    }

    #[test]
    fn test_provoked_attack_is_redirected() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        party.members.push(mage(0));
        party.members.push({
            let mut c = Character::new(
                CharacterId(1),
                "Aldric",
                Job::Fighter,
                BaseStats::new(60, 0, 10, 8, 5),
            );
            c.hp = 60;
            c
        });
        let mut monsters = vec![slime(50, 0)];
        monsters[0].statuses.apply(StatusEffect {
            kind: StatusKind::Provoked {
                by: CombatantRef::Party(1),
            },
            duration: StatusDuration::Rounds(2),
            magnitude: 2,
        });

        let attack = Ability::basic_attack();
        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Monster(0),
                ability: &attack,
                // The monster tries to hit the mage; provoke overrides.
                target: Some(CombatantRef::Party(0)),
            },
        )
        .unwrap();

        match &resolution.events[0] {
            CombatEvent::AttackHit { target, .. } => {
                assert_eq!(*target, CombatantRef::Party(1));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(party.members[0].hp, 40);
        assert!(party.members[1].hp < 60);
    }

    #[test]
    fn test_meditate_heals_then_empowers_next_attack() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        let mut monk = Character::new(
            CharacterId(0),
            "Ren",
            Job::Monk,
            BaseStats::new(50, 20, 10, 4, 8),
        );
        monk.hp = 20;
        party.members.push(monk);
        let mut monsters = vec![slime(100, 0)];

        let meditate = Ability {
            id: AbilityId::new("meditate"),
            name: "Meditate".into(),
            mp_cost: 0,
            kind: AbilityKind::Buff,
            power: AbilityPower::Flat(0),
            target: TargetSelector::SelfOnly,
            on_hit: None,
            buff: Some(BuffEffect::Meditate {
                heal: 15,
                empower_percent: 50,
            }),
        };

        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &meditate,
                target: None,
            },
        )
        .unwrap();
        assert_eq!(party.members[0].hp, 35);
        assert!(matches!(
            resolution.events.as_slice(),
            [
                CombatEvent::Healed { amount: 15, .. },
                CombatEvent::StatusApplied {
                    status: StatusKind::Empowered,
                    ..
                }
            ]
        ));

        // The empowered attack deals 10 × 1.5 = 15, and the buff is spent.
        let attack = Ability::basic_attack();
        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            1,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &attack,
                target: Some(CombatantRef::Monster(0)),
            },
        )
        .unwrap();
        assert_eq!(
            resolution.events,
            vec![CombatEvent::AttackHit {
                attacker: CombatantRef::Party(0),
                target: CombatantRef::Monster(0),
                damage: 15,
            }]
        );
        assert!(party.members[0].statuses.take_empowered().is_none());
        assert_eq!(monsters[0].hp, 85);
    }

    #[test]
    fn test_all_enemies_hits_every_living_monster() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        party.members.push(mage(20));
        let mut monsters = vec![slime(100, 0), slime(100, 0), slime(100, 0)];
        monsters[1].hp = 0;

        let nova = Ability {
            id: AbilityId::new("nova"),
            name: "Nova".into(),
            mp_cost: 0,
            kind: AbilityKind::Attack,
            power: AbilityPower::Multiplier(1.0),
            target: TargetSelector::AllEnemies,
            on_hit: None,
            buff: None,
        };
        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &nova,
                target: None,
            },
        )
        .unwrap();
        assert_eq!(resolution.events.len(), 2);
        assert_eq!(monsters[0].hp, 80);
        assert_eq!(monsters[1].hp, 0);
        assert_eq!(monsters[2].hp, 80);
    }

    #[test]
    fn test_dead_target_rejected_before_mutation() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        party.members.push(mage(8));
        let mut monsters = vec![slime(0, 0)];
        monsters[0].hp = 0;

        let ability = fireball();
        let err = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &ability,
                target: Some(CombatantRef::Monster(0)),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AbilityError::InvalidTarget { .. }));
        assert_eq!(party.members[0].mp, 8);
    }

    #[test]
    fn test_guaranteed_stealth_dodge_short_circuits() {
        let (sets, rng, config) = (NoSets, PcgRng, CombatConfig::new());
        let env = test_env(&sets, &rng, &config);
        let mut party = Party::new();
        party.members.push(mage(0));
        party.members[0].statuses.apply(StatusEffect {
            kind: StatusKind::Stealth,
            duration: StatusDuration::Battle,
            magnitude: 100,
        });
        let mut monsters = vec![slime(50, 0)];

        let attack = Ability {
            on_hit: Some(OnHitEffect::Freeze {
                chance: 100,
                turns: 2,
            }),
            ..Ability::basic_attack()
        };
        let resolution = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            7,
            0,
            AbilityRequest {
                actor: CombatantRef::Monster(0),
                ability: &attack,
                target: Some(CombatantRef::Party(0)),
            },
        )
        .unwrap();

        // A 100% dodge chance always evades, and the freeze rider never
        // lands on a dodge.
        assert_eq!(
            resolution.events,
            vec![CombatEvent::Dodged {
                attacker: CombatantRef::Monster(0),
                target: CombatantRef::Party(0),
            }]
        );
        assert_eq!(party.members[0].hp, 40);
        assert!(!party.members[0].statuses.is_frozen());
    }

    #[test]
    fn test_missing_sets_oracle_fails_before_mutation() {
        let (rng, config) = (PcgRng, CombatConfig::new());
        let env: CombatEnv<'_> = Env::new(None, None, None, None, Some(&rng as _), &config);
        let mut party = Party::new();
        party.members.push(mage(8));
        let mut monsters = vec![slime(30, 0)];

        let ability = fireball();
        let err = resolve_ability(
            &mut party,
            &mut monsters,
            &env,
            3,
            0,
            AbilityRequest {
                actor: CombatantRef::Party(0),
                ability: &ability,
                target: Some(CombatantRef::Monster(0)),
            },
        )
        .unwrap_err();

        // Stat resolution has no set table to consult; the call must
        // fail without spending the caster's MP or touching the target.
        assert!(matches!(err, AbilityError::Oracle(_)));
        assert_eq!(party.members[0].mp, 8);
        assert_eq!(monsters[0].hp, 30);
    }
}

//! Traits describing read-only content data.
//!
//! Oracles expose the ability kits, bestiary, set-bonus table, gear
//! catalogs, and random source. The [`Env`] aggregate bundles them so the
//! engine can reach everything it needs without hard coupling to concrete
//! catalog implementations.

mod abilities;
mod bestiary;
mod gear;
mod rng;

pub use abilities::AbilityOracle;
pub use bestiary::BestiaryOracle;
pub use gear::GearOracle;
pub use rng::{compute_seed, PcgRng, RngOracle};

pub use crate::sets::SetBonusOracle;

use crate::config::CombatConfig;

/// A needed oracle was not provided to the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("ability oracle not available")]
    AbilitiesNotAvailable,
    #[error("bestiary oracle not available")]
    BestiaryNotAvailable,
    #[error("set-bonus oracle not available")]
    SetsNotAvailable,
    #[error("gear oracle not available")]
    GearNotAvailable,
    #[error("rng oracle not available")]
    RngNotAvailable,
}

/// Aggregates the read-only oracles and tuning the engine resolves
/// against.
///
/// Oracles are optional so partial environments work in tests; accessors
/// return [`OracleError`] when an absent oracle is actually needed.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, A, B, S, G, R>
where
    A: AbilityOracle + ?Sized,
    B: BestiaryOracle + ?Sized,
    S: SetBonusOracle + ?Sized,
    G: GearOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    abilities: Option<&'a A>,
    bestiary: Option<&'a B>,
    sets: Option<&'a S>,
    gear: Option<&'a G>,
    rng: Option<&'a R>,
    config: &'a CombatConfig,
}

/// Trait-object environment, the form the engine works with.
pub type CombatEnv<'a> = Env<
    'a,
    dyn AbilityOracle + 'a,
    dyn BestiaryOracle + 'a,
    dyn SetBonusOracle + 'a,
    dyn GearOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, A, B, S, G, R> Env<'a, A, B, S, G, R>
where
    A: AbilityOracle + ?Sized,
    B: BestiaryOracle + ?Sized,
    S: SetBonusOracle + ?Sized,
    G: GearOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        abilities: Option<&'a A>,
        bestiary: Option<&'a B>,
        sets: Option<&'a S>,
        gear: Option<&'a G>,
        rng: Option<&'a R>,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            abilities,
            bestiary,
            sets,
            gear,
            rng,
            config,
        }
    }

    pub fn with_all(
        abilities: &'a A,
        bestiary: &'a B,
        sets: &'a S,
        gear: &'a G,
        rng: &'a R,
        config: &'a CombatConfig,
    ) -> Self {
        Self::new(
            Some(abilities),
            Some(bestiary),
            Some(sets),
            Some(gear),
            Some(rng),
            config,
        )
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    pub fn abilities(&self) -> Result<&'a A, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    pub fn bestiary(&self) -> Result<&'a B, OracleError> {
        self.bestiary.ok_or(OracleError::BestiaryNotAvailable)
    }

    pub fn sets(&self) -> Result<&'a S, OracleError> {
        self.sets.ok_or(OracleError::SetsNotAvailable)
    }

    pub fn gear(&self) -> Result<&'a G, OracleError> {
        self.gear.ok_or(OracleError::GearNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, A, B, S, G, R> Env<'a, A, B, S, G, R>
where
    A: AbilityOracle + 'a,
    B: BestiaryOracle + 'a,
    S: SetBonusOracle + 'a,
    G: GearOracle + 'a,
    R: RngOracle + 'a,
{
    /// View this environment as its trait-object form.
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let abilities: Option<&'a dyn AbilityOracle> = self.abilities.map(|a| a as _);
        let bestiary: Option<&'a dyn BestiaryOracle> = self.bestiary.map(|b| b as _);
        let sets: Option<&'a dyn SetBonusOracle> = self.sets.map(|s| s as _);
        let gear: Option<&'a dyn GearOracle> = self.gear.map(|g| g as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|r| r as _);
        Env::new(abilities, bestiary, sets, gear, rng, self.config)
    }
}

//! Static combat content and the registries that serve it.
//!
//! This crate embeds the game's data files (RON) and loads them into
//! registries implementing the oracle traits `combat-core` defines:
//! - Job ability kits ([`AbilityBook`])
//! - Monster bestiary ([`Bestiary`])
//! - Set-bonus tables ([`SetBonusRegistry`])
//! - Gear and potion catalogs ([`GearCatalog`])
//!
//! Content is consumed through read-only oracles and never appears in
//! session state.

pub mod abilities;
pub mod bestiary;
pub mod gear;
pub mod sets;

pub use abilities::AbilityBook;
pub use bestiary::Bestiary;
pub use gear::GearCatalog;
pub use sets::SetBonusRegistry;

use combat_core::{CombatConfig, CombatEnv, Env, RngOracle};
use combat_core::{AbilityOracle, BestiaryOracle, GearOracle, SetBonusOracle};

/// Common result type for content loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Every content registry, loaded together.
pub struct Content {
    pub abilities: AbilityBook,
    pub bestiary: Bestiary,
    pub sets: SetBonusRegistry,
    pub gear: GearCatalog,
}

impl Content {
    /// Load and validate all embedded data files.
    pub fn load() -> LoadResult<Self> {
        Ok(Self {
            abilities: AbilityBook::load()?,
            bestiary: Bestiary::load()?,
            sets: SetBonusRegistry::load()?,
            gear: GearCatalog::load()?,
        })
    }

    /// Build a combat environment over these registries.
    ///
    /// The RNG and config are caller-supplied; everything else comes
    /// from the loaded content.
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle, config: &'a CombatConfig) -> CombatEnv<'a> {
        Env::new(
            Some(&self.abilities as &dyn AbilityOracle),
            Some(&self.bestiary as &dyn BestiaryOracle),
            Some(&self.sets as &dyn SetBonusOracle),
            Some(&self.gear as &dyn GearOracle),
            Some(rng),
            config,
        )
    }
}

//! Bestiary oracle: which monster species exist and where they spawn.

use crate::party::{MonsterTemplate, SpeciesId};

/// Read-only view over the monster catalog.
///
/// Depth gating lives here: `eligible` returns only species whose
/// minimum depth is at or below the requested floor, so deep horrors
/// never appear on floor one. The spawner indexes into the returned set
/// with a deterministic roll.
pub trait BestiaryOracle {
    /// Look up one species.
    fn species(&self, id: SpeciesId) -> Option<&MonsterTemplate>;

    /// Every species allowed to spawn at this depth, in stable catalog
    /// order.
    fn eligible(&self, depth: u32) -> Vec<&MonsterTemplate>;
}

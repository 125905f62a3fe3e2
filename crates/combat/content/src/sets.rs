//! Set-bonus tables, loaded from embedded RON and validated on load.

use combat_core::{SetBonus, SetBonusOracle, SetId};
use serde::Deserialize;

use crate::LoadResult;

/// RON file structure for the set-bonus table.
#[derive(Debug, Deserialize)]
struct SetFile {
    sets: Vec<SetBonus>,
}

/// Registry of every equipment set.
#[derive(Debug, Clone)]
pub struct SetBonusRegistry {
    sets: Vec<SetBonus>,
}

impl SetBonusRegistry {
    /// Load the set table from the embedded data file.
    ///
    /// Each set's tier invariants (thresholds drawn from the allowed
    /// tier counts, monotone power curves) are checked here so a bad
    /// data file fails at startup rather than mid-combat.
    pub fn load() -> LoadResult<Self> {
        let raw = include_str!("../data/sets.ron");
        let file: SetFile = ron::from_str(raw)
            .map_err(|e| anyhow::anyhow!("failed to parse sets.ron: {e}"))?;

        for set in &file.sets {
            set.validate()
                .map_err(|e| anyhow::anyhow!("invalid set table: {e}"))?;
        }

        Ok(Self { sets: file.sets })
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl SetBonusOracle for SetBonusRegistry {
    fn set_bonus(&self, id: SetId) -> Option<&SetBonus> {
        self.sets.iter().find(|s| s.id == id)
    }
}

//! Job ability kits, loaded from embedded RON.

use combat_core::{Ability, AbilityId, AbilityOracle, Job};
use serde::Deserialize;

use crate::LoadResult;

/// RON file structure for the ability catalog.
#[derive(Debug, Deserialize)]
struct AbilityCatalog {
    kits: Vec<(Job, Vec<Ability>)>,
}

/// Registry of every job's ability kit.
#[derive(Debug, Clone)]
pub struct AbilityBook {
    kits: Vec<(Job, Vec<Ability>)>,
}

impl AbilityBook {
    /// Load the ability catalog from the embedded data file.
    pub fn load() -> LoadResult<Self> {
        let raw = include_str!("../data/abilities.ron");
        let catalog: AbilityCatalog = ron::from_str(raw)
            .map_err(|e| anyhow::anyhow!("failed to parse abilities.ron: {e}"))?;

        // Every kit leads with the universal basic attack so monsters
        // and party members share the same zero-cost fallback.
        for (job, kit) in &catalog.kits {
            let Some(first) = kit.first() else {
                anyhow::bail!("{job} kit is empty");
            };
            if first.id != Ability::basic_attack().id {
                anyhow::bail!("{job} kit must lead with the basic attack");
            }
        }

        Ok(Self { kits: catalog.kits })
    }

    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }
}

impl AbilityOracle for AbilityBook {
    fn ability(&self, job: Job, id: &AbilityId) -> Option<&Ability> {
        self.kit(job).iter().find(|a| &a.id == id)
    }

    fn kit(&self, job: Job) -> &[Ability] {
        self.kits
            .iter()
            .find(|(j, _)| *j == job)
            .map(|(_, kit)| kit.as_slice())
            .unwrap_or(&[])
    }
}

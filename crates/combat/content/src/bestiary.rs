//! Monster bestiary, loaded from embedded RON.

use combat_core::{BestiaryOracle, MonsterTemplate, SpeciesId};
use serde::Deserialize;

use crate::LoadResult;

/// RON file structure for the bestiary.
#[derive(Debug, Deserialize)]
struct BestiaryFile {
    species: Vec<MonsterTemplate>,
}

/// Registry of every monster template, in catalog order.
#[derive(Debug, Clone)]
pub struct Bestiary {
    templates: Vec<MonsterTemplate>,
}

impl Bestiary {
    /// Load the bestiary from the embedded data file.
    pub fn load() -> LoadResult<Self> {
        let raw = include_str!("../data/bestiary.ron");
        let file: BestiaryFile = ron::from_str(raw)
            .map_err(|e| anyhow::anyhow!("failed to parse bestiary.ron: {e}"))?;

        for (i, template) in file.species.iter().enumerate() {
            if template.stats.max_hp <= 0 || template.stats.attack < 0 {
                anyhow::bail!("template {} ({}) has invalid stats", i, template.name);
            }
            let duplicate = file.species[..i]
                .iter()
                .any(|t| t.species == template.species);
            if duplicate {
                anyhow::bail!("duplicate species id {}", template.species.0);
            }
        }

        Ok(Self {
            templates: file.species,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }
}

impl BestiaryOracle for Bestiary {
    fn species(&self, id: SpeciesId) -> Option<&MonsterTemplate> {
        self.templates.iter().find(|t| t.species == id)
    }

    fn eligible(&self, depth: u32) -> Vec<&MonsterTemplate> {
        self.templates
            .iter()
            .filter(|t| t.min_depth <= depth)
            .collect()
    }
}

//! Ability oracle: each job's skill kit.

use crate::ability::{Ability, AbilityId};
use crate::party::Job;

/// Read-only view over the ability catalog.
pub trait AbilityOracle {
    /// Look up one ability within a job's kit.
    fn ability(&self, job: Job, id: &AbilityId) -> Option<&Ability>;

    /// The full kit of a job, in display order.
    fn kit(&self, job: Job) -> &[Ability];
}

//! Damage and mitigation.

pub mod damage;

pub use damage::{raw_damage, DamageOutcome, Mitigation};

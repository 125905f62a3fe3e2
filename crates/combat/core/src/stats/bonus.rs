//! Bonus application following the layered stack architecture.
//!
//! Effective stats are computed in a fixed layer order:
//! base → equipment → set bonuses → status effects.
//!
//! Within one layer the formula is `value × (100 + %inc) / 100 + flat`.
//! The layer order is load-bearing: set percentages compound on top of raw
//! equipment bonuses, and temporary status modifiers (a post-meditate attack
//! buff, a provoke penalty) are applied last so set percentages never
//! compound them.

/// A single bonus contributing to one stat within one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus (e.g., +15 attack from a sword).
    Flat(i32),
    /// Percentage increase, summed with other percentages in the same
    /// layer before being applied (e.g., 20 = +20%).
    Percent(i32),
}

/// Accumulated bonuses for one stat within one layer.
///
/// Flat and percentage contributions are summed separately; `apply`
/// combines them with the incoming value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    flat: i32,
    percent: i32,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        match bonus {
            Bonus::Flat(v) => self.flat += v,
            Bonus::Percent(p) => self.percent += p,
        }
    }

    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::Flat(value));
        self
    }

    pub fn percent(mut self, value: i32) -> Self {
        self.add(Bonus::Percent(value));
        self
    }

    /// Apply this layer to an incoming value.
    ///
    /// # Formula
    ///
    /// ```text
    /// result = value × (100 + Σ percent) / 100 + Σ flat
    /// ```
    ///
    /// Integer math, truncating toward zero like the rest of the stat
    /// system.
    pub fn apply(&self, value: i32) -> i32 {
        value * (100 + self.percent) / 100 + self.flat
    }

    pub fn is_empty(&self) -> bool {
        self.flat == 0 && self.percent == 0
    }
}

/// One layer of bonuses covering every derived stat.
///
/// Three of these are produced per resolution: the equipment layer, the
/// set-bonus layer, and the status-effect layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBonuses {
    pub attack: BonusStack,
    pub defense: BonusStack,
    pub max_hp: BonusStack,
    pub max_mp: BonusStack,
    pub speed: BonusStack,
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.attack.is_empty()
            && self.defense.is_empty()
            && self.max_hp.is_empty()
            && self.max_mp.is_empty()
            && self.speed.is_empty()
    }
}

/// Bounds applied after all layers.
///
/// Defense and speed must never go negative (the damage pipeline assumes
/// defense ≥ 0), and maximum HP stays at least 1 so a combatant cannot be
/// bricked by debuffs alone.
#[derive(Clone, Copy, Debug)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Offensive/defensive stats: [0, 9999].
    pub const DERIVED: Self = Self { min: 0, max: 9999 };

    /// Resource maxima: [1, 99999].
    pub const RESOURCE_MAX: Self = Self { min: 1, max: 99_999 };

    /// MP maximum may legitimately be zero (Fighters have no MP pool).
    pub const MP_MAX: Self = Self { min: 0, max: 99_999 };

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Combat configuration constants and tunable balance parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Flat percentage reduction applied while a combatant holds the
    /// Defending status. Applied after defense reduction, before the
    /// HP-scaling set reduction.
    pub defend_reduction_percent: i32,

    /// Chance (d100) that a flee attempt succeeds. A failed attempt
    /// consumes the fleeing combatant's turn.
    pub flee_chance_percent: u32,

    /// Chance (d100) that the depth-scaled bonus monsters join an
    /// encounter on top of the base spawn count.
    pub encounter_bonus_chance_percent: u32,

    /// Chance (d100) that a defeated monster drops a piece of equipment.
    pub equipment_drop_chance_percent: u32,

    /// Chance (d100) that a defeated monster drops a potion.
    pub potion_drop_chance_percent: u32,

    /// Ability power gained per character level past the first, as a
    /// percentage of base power.
    pub power_scaling_percent_per_level: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of monsters in a single encounter.
    pub const MAX_ENCOUNTER_SIZE: usize = 8;
    /// Maximum combatants in a turn order (party + monsters).
    pub const MAX_COMBATANTS: usize = 12;
    /// Maximum simultaneous status effects on one combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum equipped items contributing to one combatant's stats.
    pub const MAX_EQUIPPED_ITEMS: usize = 11;

    // ===== fixed balance tables =====
    /// Stat multiplier bonus per enhancement level (+0 through +4),
    /// expressed as percentages.
    pub const ENHANCEMENT_PERCENTS: [i32; 5] = [0, 10, 25, 50, 100];

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFEND_REDUCTION: i32 = 50;
    pub const DEFAULT_FLEE_CHANCE: u32 = 50;
    pub const DEFAULT_ENCOUNTER_BONUS_CHANCE: u32 = 25;
    pub const DEFAULT_EQUIPMENT_DROP_CHANCE: u32 = 20;
    pub const DEFAULT_POTION_DROP_CHANCE: u32 = 30;
    pub const DEFAULT_POWER_SCALING: u32 = 15;

    pub fn new() -> Self {
        Self {
            defend_reduction_percent: Self::DEFAULT_DEFEND_REDUCTION,
            flee_chance_percent: Self::DEFAULT_FLEE_CHANCE,
            encounter_bonus_chance_percent: Self::DEFAULT_ENCOUNTER_BONUS_CHANCE,
            equipment_drop_chance_percent: Self::DEFAULT_EQUIPMENT_DROP_CHANCE,
            potion_drop_chance_percent: Self::DEFAULT_POTION_DROP_CHANCE,
            power_scaling_percent_per_level: Self::DEFAULT_POWER_SCALING,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

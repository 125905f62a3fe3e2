//! Round-robin turn scheduling.
//!
//! Turn order is fixed once per encounter: every combatant sorted by
//! effective speed, highest first. The sort is stable over the roster
//! order (party slots first, then monsters in spawn order), so speed ties
//! always resolve the same way: party members act before monsters, and
//! lower slot indices act first.
//!
//! Defeated combatants keep their slot in the order and are skipped, so
//! [`CombatantRef`]s taken from the schedule stay valid for the whole
//! encounter. When the cursor wraps past the end of the order a new round
//! begins; the session layer fires regeneration and status ticks on each
//! wrap.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::party::CombatantRef;

/// Fixed schedule for one encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrder {
    order: ArrayVec<CombatantRef, { CombatConfig::MAX_COMBATANTS }>,
    position: usize,
    round: u32,
}

/// Result of advancing the cursor to the next living combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnAdvance {
    /// The combatant whose turn it now is.
    pub next: CombatantRef,
    /// How many round boundaries the cursor crossed getting there.
    /// Usually 0 or 1; more when a whole round of combatants is dead.
    pub rounds_elapsed: u32,
}

impl TurnOrder {
    /// Build the schedule from `(combatant, effective speed)` pairs given
    /// in roster order. The cursor starts on the first entry of round 1.
    pub fn new(entries: &[(CombatantRef, i32)]) -> Self {
        let mut sorted: ArrayVec<(CombatantRef, i32), { CombatConfig::MAX_COMBATANTS }> =
            entries.iter().copied().take(CombatConfig::MAX_COMBATANTS).collect();
        // Stable sort: ties keep roster order.
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            order: sorted.into_iter().map(|(c, _)| c).collect(),
            position: 0,
            round: 1,
        }
    }

    /// The combatant the cursor currently points at.
    pub fn current(&self) -> Option<CombatantRef> {
        self.order.get(self.position).copied()
    }

    /// 1-based round counter.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The full schedule, in acting order.
    pub fn order(&self) -> &[CombatantRef] {
        &self.order
    }

    /// Move the cursor to the next living combatant, skipping dead slots
    /// and counting round wraps. Returns `None` when nobody is alive,
    /// which the session treats as an already-resolved encounter.
    pub fn advance(&mut self, mut alive: impl FnMut(CombatantRef) -> bool) -> Option<TurnAdvance> {
        if self.order.is_empty() || !self.order.iter().any(|&c| alive(c)) {
            return None;
        }
        let mut rounds_elapsed = 0;
        loop {
            self.position += 1;
            if self.position >= self.order.len() {
                self.position = 0;
                self.round += 1;
                rounds_elapsed += 1;
            }
            let next = self.order[self.position];
            if alive(next) {
                return Some(TurnAdvance {
                    next,
                    rounds_elapsed,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: u8) -> CombatantRef {
        CombatantRef::Party(i)
    }

    fn m(i: u8) -> CombatantRef {
        CombatantRef::Monster(i)
    }

    #[test]
    fn test_order_sorted_by_speed_descending() {
        let order = TurnOrder::new(&[(p(0), 5), (p(1), 9), (m(0), 7), (m(1), 3)]);
        assert_eq!(order.order(), [p(1), m(0), p(0), m(1)]);
        assert_eq!(order.current(), Some(p(1)));
        assert_eq!(order.round(), 1);
    }

    #[test]
    fn test_speed_ties_favor_party_then_roster_order() {
        let order = TurnOrder::new(&[(p(0), 6), (p(1), 6), (m(0), 6), (m(1), 6)]);
        assert_eq!(order.order(), [p(0), p(1), m(0), m(1)]);
    }

    #[test]
    fn test_identical_roster_gives_identical_order() {
        let entries = [(p(0), 4), (m(0), 8), (m(1), 8), (m(2), 2)];
        assert_eq!(TurnOrder::new(&entries), TurnOrder::new(&entries));
    }

    #[test]
    fn test_advance_skips_dead_and_wraps_rounds() {
        let mut order = TurnOrder::new(&[(p(0), 9), (m(0), 5), (m(1), 1)]);
        let dead = m(0);
        let alive = |c: CombatantRef| c != dead;

        let step = order.advance(alive).unwrap();
        assert_eq!(step.next, m(1));
        assert_eq!(step.rounds_elapsed, 0);

        let step = order.advance(alive).unwrap();
        assert_eq!(step.next, p(0));
        assert_eq!(step.rounds_elapsed, 1);
        assert_eq!(order.round(), 2);
    }

    #[test]
    fn test_advance_counts_multiple_wraps_for_dead_rounds() {
        let mut order = TurnOrder::new(&[(p(0), 9), (m(0), 5)]);
        // Only p(0) alive: advancing loops the whole order once.
        let step = order.advance(|c| c == p(0)).unwrap();
        assert_eq!(step.next, p(0));
        assert_eq!(step.rounds_elapsed, 1);
    }

    #[test]
    fn test_advance_with_no_living_is_none() {
        let mut order = TurnOrder::new(&[(p(0), 9), (m(0), 5)]);
        assert_eq!(order.advance(|_| false), None);
    }
}

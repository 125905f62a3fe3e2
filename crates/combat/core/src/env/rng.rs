//! Deterministic randomness.
//!
//! Combat never touches ambient entropy. Every roll derives from the
//! session seed, the action nonce, and a per-roll context, so a replay of
//! the same inputs produces the same fight.

/// Stateless deterministic random source.
///
/// Implementations must be pure functions of the seed: the same seed
/// always yields the same value.
pub trait RngOracle: Send + Sync {
    /// Produce a u32 from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive). Percentage checks pass when the
    /// roll is ≤ the chance.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Uniform value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.next_u32(seed) % (max - min + 1)
    }
}

/// PCG-XSH-RR: one LCG step then a permuted 32-bit output.
///
/// Small state, fast, and statistically solid, which is all a combat
/// roll needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derive a per-roll seed from session state.
///
/// `nonce` advances once per resolved action; `actor` distinguishes
/// combatants acting under the same nonce; `context` distinguishes
/// multiple independent rolls within one action (0 for the primary roll,
/// 1 for the next, and so on).
pub fn compute_seed(session_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    // SplitMix64/FxHash-style mix with a final avalanche.
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

//! RNG oracle for deterministic random number generation.
//!
//! Every roll in a combat (damage inside a spell's range, basic-attack
//! variance, loot checks) is derived from the session seed, the action nonce,
//! the acting combatant and a per-roll context counter. Replaying the same
//! inputs reproduces the same fight.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }

    /// Signed variant of [`RngOracle::range`].
    fn range_i32(&self, seed: u64, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        (i64::from(min) + (u64::from(self.next_u32(seed)) % span) as i64) as i32
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// Stateless: the caller supplies the state as the seed on every call, which
/// keeps the combat state the single source of truth for replay.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed from combat state components.
///
/// * `game_seed` - Session seed fixed at creation
/// * `nonce` - Action sequence number
/// * `actor_id` - Combatant performing the action
/// * `context` - Distinguishes several rolls inside one action
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor_id).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // SplitMix-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;

    hash
}

/// Sequence of independent rolls for one action.
///
/// Each call advances the context counter, so consecutive rolls inside the
/// same action never share a seed.
pub struct RollStream<'a> {
    rng: &'a dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    actor_id: u32,
    context: u32,
}

impl<'a> RollStream<'a> {
    pub fn new(rng: &'a dyn RngOracle, game_seed: u64, nonce: u64, actor_id: u32) -> Self {
        Self {
            rng,
            game_seed,
            nonce,
            actor_id,
            context: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, self.actor_id, self.context);
        self.context = self.context.wrapping_add(1);
        seed
    }

    pub fn d100(&mut self) -> u32 {
        let seed = self.next_seed();
        self.rng.roll_d100(seed)
    }

    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.rng.range(seed, min, max)
    }

    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let seed = self.next_seed();
        self.rng.range_i32(seed, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_rolls() {
        let rng = PcgRng;
        let mut a = RollStream::new(&rng, 7, 3, 1);
        let mut b = RollStream::new(&rng, 7, 3, 1);
        for _ in 0..32 {
            assert_eq!(a.range(0, 1_000), b.range(0, 1_000));
        }
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let rng = PcgRng;
        let mut stream = RollStream::new(&rng, 42, 0, 0);
        for _ in 0..2_000 {
            let roll = stream.range_i32(-3, 3);
            assert!((-3..=3).contains(&roll));
            let d = stream.d100();
            assert!((1..=100).contains(&d));
        }
        assert_eq!(stream.range(5, 5), 5);
    }

    #[test]
    fn every_value_of_a_small_range_appears() {
        let rng = PcgRng;
        let mut stream = RollStream::new(&rng, 1, 1, 1);
        let mut seen = [false; 7];
        for _ in 0..500 {
            seen[(stream.range_i32(-3, 3) + 3) as usize] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }
}

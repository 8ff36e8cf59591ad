//! Injectable dice-roll sources.
//!
//! Every resolver that needs randomness takes a `&mut impl DieRoller`, so
//! production code can hand in a seeded or entropy-backed RNG and tests can
//! replay a scripted face sequence.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::collections::VecDeque;

use crate::constants::{STREAM_TAG_POOL, STREAM_TAG_USAGE};

/// Source of uniformly distributed die faces.
pub trait DieRoller {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u8) -> u8;
}

impl<R: RngCore + ?Sized> DieRoller for R {
    fn roll(&mut self, sides: u8) -> u8 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of faces; intended for tests and demonstrations.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: VecDeque<u8>,
    drawn: usize,
}

impl ScriptedRoller {
    #[must_use]
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Faces not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.drawn
    }
}

impl DieRoller for ScriptedRoller {
    /// # Panics
    ///
    /// Panics when the script runs out of faces or the next face cannot come
    /// from a die with `sides` faces.
    fn roll(&mut self, sides: u8) -> u8 {
        let face = self
            .faces
            .pop_front()
            .unwrap_or_else(|| panic!("scripted roller exhausted after {} draws", self.drawn));
        assert!(
            (1..=sides.max(1)).contains(&face),
            "scripted face {face} at draw {} is not a d{sides} face",
            self.drawn + 1
        );
        self.drawn += 1;
        face
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl CountingRng<SmallRng> {
    #[must_use]
    pub fn small(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Independent per-session roll streams derived from one user-visible seed.
///
/// Pool tests and usage-die rolls draw from separate streams so that adding a
/// usage roll never shifts the faces of later pool rolls under the same seed.
#[derive(Debug, Clone)]
pub struct RollStreams {
    seed: Option<u64>,
    pool: CountingRng<ChaCha20Rng>,
    usage: CountingRng<ChaCha20Rng>,
}

impl RollStreams {
    /// Construct the streams from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            pool: CountingRng::new(ChaCha20Rng::seed_from_u64(derive_stream_seed(
                seed,
                STREAM_TAG_POOL,
            ))),
            usage: CountingRng::new(ChaCha20Rng::seed_from_u64(derive_stream_seed(
                seed,
                STREAM_TAG_USAGE,
            ))),
        }
    }

    /// Construct unseeded streams backed by operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            pool: CountingRng::new(ChaCha20Rng::from_entropy()),
            usage: CountingRng::new(ChaCha20Rng::from_entropy()),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Stream used for dice-pool tests.
    pub fn pool(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.pool
    }

    /// Stream used for usage-die rolls.
    pub fn usage(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.usage
    }

    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.pool.draws().saturating_add(self.usage.draws())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

//! Centralized balance and tuning constants for the Ficha rules engine.
//!
//! These values define the deterministic math for every resolver.
//! Keeping them together ensures the game's numbers can only be adjusted via
//! code changes reviewed in version control, rather than scattered literals.

// Dice pools ---------------------------------------------------------------
pub const MAX_POOL_DICE: u8 = 8;
pub const PENALTY_POOL_DICE: u8 = 2;
pub(crate) const CANCELLATION_FACE: u8 = 1;

// Usage dice ---------------------------------------------------------------
pub(crate) const USAGE_DEPLETION_ROLL: u8 = 1;

// Guard / Vitality ---------------------------------------------------------
/// Vitality at or below this value halves Guard's ceiling.
pub const VITALITY_CRITICAL_THRESHOLD: u32 = 1;
pub(crate) const GUARD_CRITICAL_DIVISOR: u32 = 2;
pub(crate) const BATTERED_DIVISOR: u32 = 2;
/// Recovery points exchanged for a single point of Vitality.
pub const DEFAULT_RECOVERY_RATE: u32 = 5;

// Progression --------------------------------------------------------------
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;
/// Level at which multi-archetype classes become available.
pub const CLASS_UNLOCK_LEVEL: u8 = 5;
pub(crate) const VITALITY_FROM_GUARD_DIVISOR: u32 = 3;

/// Experience needed to advance from level `n` (index `n - 1`).
pub(crate) const EXPERIENCE_THRESHOLDS: [u32; 19] = [
    250, 500, 750, 1_000, 1_500, 2_000, 2_500, 3_000, 4_000, 5_000, 6_000, 7_000, 8_500, 10_000,
    11_500, 13_000, 15_000, 17_000, 19_000,
];

// Track gains (guard, power) per level -------------------------------------
pub(crate) const VANGUARD_GAINS: (u32, u32) = (4, 1);
pub(crate) const ADEPT_GAINS: (u32, u32) = (2, 3);
pub(crate) const SPECIALIST_GAINS: (u32, u32) = (3, 2);

// Track milestones (new level reached) -------------------------------------
pub(crate) const VANGUARD_TRAIT_LEVELS: &[u8] = &[3, 7, 11, 15, 19];
pub(crate) const VANGUARD_COMPETENCE_LEVELS: &[u8] = &[2, 5, 8, 11, 14, 17, 20];
pub(crate) const VANGUARD_POWER_LEVELS: &[u8] = &[4, 8, 12, 16, 20];

pub(crate) const ADEPT_TRAIT_LEVELS: &[u8] = &[4, 8, 12, 16, 20];
pub(crate) const ADEPT_COMPETENCE_LEVELS: &[u8] = &[5, 10, 15, 20];
pub(crate) const ADEPT_POWER_LEVELS: &[u8] = &[2, 3, 5, 7, 9, 11, 13, 15, 17, 19];

pub(crate) const SPECIALIST_TRAIT_LEVELS: &[u8] = &[3, 6, 9, 12, 15, 18];
pub(crate) const SPECIALIST_COMPETENCE_LEVELS: &[u8] = &[2, 4, 6, 8, 10, 12, 14, 16, 18, 20];
pub(crate) const SPECIALIST_POWER_LEVELS: &[u8] = &[5, 10, 15, 20];

// Roll streams -------------------------------------------------------------
pub(crate) const STREAM_TAG_POOL: &[u8] = b"ficha-pool";
pub(crate) const STREAM_TAG_USAGE: &[u8] = b"ficha-usage";

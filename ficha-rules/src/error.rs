//! Error types surfaced by the rules engine.
use thiserror::Error;

use crate::progression::RewardKind;

/// Rule violations reported back to the caller for display.
///
/// Every variant is local and recoverable; callers are expected to show the
/// message to the player and leave the character record untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("resource '{id}' is depleted and cannot be used")]
    ResourceDepleted { id: String },
    #[error("roll {roll} is outside 1..={sides}")]
    RollOutOfRange { roll: u8, sides: u8 },
    #[error("{points} recovery points cannot buy a Vitality point (rate {rate})")]
    RecoveryBelowRate { points: u32, rate: u32 },
    #[error("recovery rate must be at least 1")]
    InvalidRecoveryRate,
    #[error("Vitality is already at its maximum of {max}")]
    VitalityFull { max: u32 },
    #[error("experience {experience} is below the {required} required to level up")]
    InsufficientExperience { experience: u32, required: u32 },
    #[error("level {level} is the maximum level")]
    MaxLevelReached { level: u8 },
    #[error("a {0} choice is required for this level")]
    MissingReward(RewardKind),
}

/// Errors raised when rules configuration invariants are violated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pool max dice must be within 1..={max} (got {value})")]
    PoolMaxDice { value: u8, max: u8 },
    #[error("recovery rate must be at least 1 (got {value})")]
    RecoveryRate { value: u32 },
    #[error("experience threshold for level {level} ({value}) does not exceed the previous level")]
    ThresholdOrder { level: u8, value: u32 },
    #[error("{track} milestone at level {level} is outside {min}..={max}")]
    MilestoneRange {
        track: &'static str,
        level: u8,
        min: u8,
        max: u8,
    },
}

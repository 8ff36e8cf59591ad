//! Ficha Rules Engine
//!
//! Platform-agnostic rules resolution for Ficha character sheets.
//! This crate provides the game's numeric rules as pure functions over plain
//! records: dice pools, usage dice, the Guard/Vitality damage model and
//! level progression. Storage, presentation and roster state live elsewhere.

pub mod config;
pub mod constants;
pub mod die;
pub mod error;
pub mod guard;
pub mod history;
pub mod modifiers;
pub mod pool;
pub mod progression;
pub mod roller;
pub mod usage;

// Re-export commonly used types
pub use config::{PoolConfig, RecoveryConfig, RulesConfig};
pub use die::{DieSize, PoolDie};
pub use error::{ConfigError, RulesError};
pub use guard::{
    CombatState, CombatStatus, DamageOutcome, GuardPoints, PoolUpdate, RecoveryOutcome,
    VitalityPoints, apply_damage, assess, combat_state, damage_vitality, effective_guard_max,
    heal_guard, heal_vitality, is_battered, recover_vitality, recover_vitality_at,
};
pub use history::RollLog;
pub use modifiers::{Modifier, ModifierCategory};
pub use pool::{
    DiceFace, DicePoolResult, FaceKind, dice_modifier, resolve_pool, resolve_pool_with,
};
pub use progression::{
    GrantedReward, LevelUpCommit, LevelUpGains, ProgressionSnapshot, ProgressionTable,
    RewardChoices, RewardFlags, RewardKind, Track, commit_level_up, preview_level_up,
};
pub use roller::{CountingRng, DieRoller, RollStreams, ScriptedRoller};
pub use usage::{ResourceDie, UsageOutcome, resolve_use, step_down, step_up};

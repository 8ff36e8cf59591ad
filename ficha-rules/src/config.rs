//! Tunable rules configuration.
//!
//! Defaults mirror the rulebook; tables can be overridden from JSON for house
//! rules and play-testing.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RECOVERY_RATE, MAX_POOL_DICE};
use crate::error::ConfigError;
use crate::progression::ProgressionTable;

/// Pool tuning. The penalty roll is fixed at two dice and is not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// House-rule cap on rolled dice, within `1..=MAX_POOL_DICE`.
    #[serde(default = "PoolConfig::default_max_dice")]
    pub max_dice: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_dice: Self::default_max_dice(),
        }
    }
}

impl PoolConfig {
    const fn default_max_dice() -> u8 {
        MAX_POOL_DICE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Recovery points exchanged per Vitality point.
    #[serde(default = "RecoveryConfig::default_points_per_vitality")]
    pub points_per_vitality: u32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            points_per_vitality: Self::default_points_per_vitality(),
        }
    }
}

impl RecoveryConfig {
    const fn default_points_per_vitality() -> u32 {
        DEFAULT_RECOVERY_RATE
    }
}

/// Every tunable the resolvers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub progression: ProgressionTable,
}

impl RulesConfig {
    /// Get default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON string; missing sections use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every invariant the resolvers rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_POOL_DICE).contains(&self.pool.max_dice) {
            return Err(ConfigError::PoolMaxDice {
                value: self.pool.max_dice,
                max: MAX_POOL_DICE,
            });
        }
        if self.recovery.points_per_vitality == 0 {
            return Err(ConfigError::RecoveryRate {
                value: self.recovery.points_per_vitality,
            });
        }
        self.progression.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = RulesConfig::from_json("{}").unwrap();
        assert_eq!(cfg, RulesConfig::default_config());
        assert_eq!(cfg.pool.max_dice, 8);
        assert_eq!(cfg.recovery.points_per_vitality, 5);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let cfg = RulesConfig::from_json(r#"{ "pool": { "max_dice": 6 } }"#).unwrap();
        assert_eq!(cfg.pool.max_dice, 6);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_pool_cap_above_rules_maximum() {
        let cfg = RulesConfig::from_json(r#"{ "pool": { "max_dice": 20 } }"#).unwrap();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PoolMaxDice { value: 20, max: 8 })
        );
    }

    #[test]
    fn validate_rejects_zero_pool_cap() {
        let cfg = RulesConfig::from_json(r#"{ "pool": { "max_dice": 0 } }"#).unwrap();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PoolMaxDice { value: 0, max: 8 })
        );
    }

    #[test]
    fn penalty_size_cannot_be_configured() {
        let cfg = RulesConfig::from_json(r#"{ "pool": { "penalty_dice": 5 } }"#).unwrap();
        assert_eq!(cfg, RulesConfig::default_config());
        let mut roller = crate::roller::ScriptedRoller::new([4, 2, 6, 6, 6]);
        let result = crate::pool::resolve_pool_with(
            &cfg.pool,
            0,
            crate::die::PoolDie::D6,
            0,
            "Penalty",
            &mut roller,
        );
        assert!(result.penalty);
        assert_eq!(result.faces.len(), 2);
        assert_eq!(roller.remaining(), 3);
    }

    #[test]
    fn validate_rejects_zero_recovery_rate() {
        let cfg = RulesConfig::from_json(r#"{ "recovery": { "points_per_vitality": 0 } }"#)
            .unwrap();
        assert_eq!(cfg.validate(), Err(ConfigError::RecoveryRate { value: 0 }));
    }
}

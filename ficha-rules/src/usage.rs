//! Usage dice for consumable resources (rations, torches, ammunition).
//!
//! A resource is tracked as a die on the fixed scale. Using it rolls the
//! current die: a `1` depletes it outright, anything else steps it one size
//! down, and stepping below the configured minimum depletes it too.

use serde::{Deserialize, Serialize};

use crate::constants::USAGE_DEPLETION_ROLL;
use crate::die::{DieSize, ordered};
use crate::error::RulesError;
use crate::roller::DieRoller;

/// A consumable resource owned by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDie {
    pub id: String,
    pub name: String,
    /// `None` once the resource is depleted.
    pub current: Option<DieSize>,
    pub min: DieSize,
    pub max: DieSize,
}

/// Result of resolving one use of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageOutcome {
    pub roll: u8,
    pub new_die: Option<DieSize>,
    pub is_depleted: bool,
    pub is_stepped_down: bool,
}

impl ResourceDie {
    /// Create a full resource; `min` and `max` are swapped when reversed.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, min: DieSize, max: DieSize) -> Self {
        let (min, max) = ordered(min, max);
        Self {
            id: id.into(),
            name: name.into(),
            current: Some(max),
            min,
            max,
        }
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current.is_none()
    }

    /// Replace the bounds, clamping the current die into the new range.
    #[must_use]
    pub fn reconfigure(&self, min: DieSize, max: DieSize) -> Self {
        let (min, max) = ordered(min, max);
        Self {
            current: self.current.map(|die| die.clamp(min, max)),
            min,
            max,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn stepped_up(&self) -> Self {
        self.with_die(Some(step_up(self.current, self.min, self.max)))
    }

    #[must_use]
    pub fn stepped_down(&self) -> Self {
        self.with_die(self.current.and_then(|die| step_down(die, self.min)))
    }

    /// Restore the resource to its maximum die.
    #[must_use]
    pub fn reset(&self) -> Self {
        self.with_die(Some(self.max))
    }

    /// Apply a resolved use to produce the replacement record.
    #[must_use]
    pub fn with_outcome(&self, outcome: &UsageOutcome) -> Self {
        self.with_die(outcome.new_die)
    }

    /// Roll the current die and resolve the use.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ResourceDepleted`] when the resource is already
    /// depleted.
    pub fn roll_use<R: DieRoller + ?Sized>(
        &self,
        roller: &mut R,
    ) -> Result<UsageOutcome, RulesError> {
        let die = self.current.ok_or_else(|| self.depleted_error())?;
        resolve_use(self, roller.roll(die.sides()))
    }

    fn with_die(&self, current: Option<DieSize>) -> Self {
        Self {
            current,
            ..self.clone()
        }
    }

    fn depleted_error(&self) -> RulesError {
        RulesError::ResourceDepleted {
            id: self.id.clone(),
        }
    }
}

/// Move one size up the scale, never past `max`. A depleted die restores to
/// `min` rather than to the bottom of the scale.
#[must_use]
pub fn step_up(current: Option<DieSize>, min: DieSize, max: DieSize) -> DieSize {
    let (min, max) = ordered(min, max);
    match current {
        None => min,
        Some(die) => die.step_up().unwrap_or(die).clamp(min, max),
    }
}

/// Move one size down the scale. At (or below) `min` the resource is depleted.
#[must_use]
pub fn step_down(current: DieSize, min: DieSize) -> Option<DieSize> {
    if current <= min {
        return None;
    }
    current.step_down().filter(|die| *die >= min)
}

/// Resolve a usage roll against a resource.
///
/// # Errors
///
/// Returns [`RulesError::ResourceDepleted`] when the resource has no die left
/// and [`RulesError::RollOutOfRange`] when `roll` cannot come from the
/// current die.
pub fn resolve_use(resource: &ResourceDie, roll: u8) -> Result<UsageOutcome, RulesError> {
    let Some(die) = resource.current else {
        log::debug!("use rejected: resource '{}' already depleted", resource.id);
        return Err(resource.depleted_error());
    };
    if roll == 0 || roll > die.sides() {
        return Err(RulesError::RollOutOfRange {
            roll,
            sides: die.sides(),
        });
    }

    let new_die = if roll == USAGE_DEPLETION_ROLL {
        None
    } else {
        step_down(die, resource.min)
    };
    let outcome = UsageOutcome {
        roll,
        new_die,
        is_depleted: new_die.is_none(),
        is_stepped_down: new_die.is_some(),
    };
    if outcome.is_depleted {
        log::debug!("resource '{}' depleted on {die} roll {roll}", resource.id);
    }
    Ok(outcome)
}

//! Two-tier damage model: a regenerating Guard pool in front of Vitality.
//!
//! Damage drains the temporary buffer, then Guard, and overflows 1:1 into
//! Vitality. While Vitality sits at or below the critical threshold, Guard's
//! ceiling is halved. That ceiling is always derived through
//! [`effective_guard_max`] and never stored.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BATTERED_DIVISOR, DEFAULT_RECOVERY_RATE, GUARD_CRITICAL_DIVISOR, VITALITY_CRITICAL_THRESHOLD,
};
use crate::error::RulesError;
use crate::modifiers::{Modifier, ModifierCategory, total_for};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GuardPoints {
    pub current: u32,
    pub base_max: u32,
    /// Only [`ModifierCategory::GuardMax`] entries change the maximum.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Temporary points spent before Guard itself.
    #[serde(default)]
    pub temporary: Option<u32>,
}

impl GuardPoints {
    #[must_use]
    pub fn new(current: u32, base_max: u32) -> Self {
        Self {
            current: current.min(base_max),
            base_max,
            modifiers: Vec::new(),
            temporary: None,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_temporary(mut self, temporary: u32) -> Self {
        self.temporary = (temporary > 0).then_some(temporary);
        self
    }

    /// Base maximum plus Guard modifiers, floored at zero.
    #[must_use]
    pub fn nominal_max(&self) -> u32 {
        let bonus = i64::from(total_for(&self.modifiers, ModifierCategory::GuardMax));
        let total = (i64::from(self.base_max) + bonus).max(0);
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Copy with `current` clamped to `ceiling`.
    #[must_use]
    pub fn clamped(&self, ceiling: u32) -> Self {
        Self {
            current: self.current.min(ceiling),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VitalityPoints {
    pub current: u32,
    pub max: u32,
}

impl VitalityPoints {
    #[must_use]
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    Normal,
    DirectWound,
    CriticalWound,
}

/// Derived view of a character's combat condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStatus {
    pub state: CombatState,
    /// Guard is above zero but at or below half its effective maximum.
    pub battered: bool,
    pub nominal_guard_max: u32,
    pub effective_guard_max: u32,
}

/// New pool values after an operation that may touch both pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUpdate {
    pub guard: GuardPoints,
    pub vitality: VitalityPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub guard: GuardPoints,
    pub vitality: VitalityPoints,
    pub absorbed_by_temporary: u32,
    pub absorbed_by_guard: u32,
    pub absorbed_by_vitality: u32,
    /// Damage left over once every pool reached zero.
    pub unabsorbed: u32,
}

impl DamageOutcome {
    #[must_use]
    pub const fn absorbed(&self) -> u32 {
        self.absorbed_by_temporary
            .saturating_add(self.absorbed_by_guard)
            .saturating_add(self.absorbed_by_vitality)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    pub guard: GuardPoints,
    pub vitality: VitalityPoints,
    pub vitality_gained: u32,
    /// Points exchanged for the Vitality actually gained.
    pub points_spent: u32,
    /// Points that bought nothing: an incomplete remainder or overflow past
    /// Vitality's maximum.
    pub points_discarded: u32,
}

/// Guard's ceiling given the current Vitality.
#[must_use]
pub const fn effective_guard_max(nominal_max: u32, vitality_current: u32) -> u32 {
    if vitality_current <= VITALITY_CRITICAL_THRESHOLD {
        nominal_max / GUARD_CRITICAL_DIVISOR
    } else {
        nominal_max
    }
}

/// Guard's ceiling for a concrete pair of pools.
#[must_use]
pub fn guard_ceiling(guard: &GuardPoints, vitality: &VitalityPoints) -> u32 {
    effective_guard_max(guard.nominal_max(), vitality.current)
}

/// Clamp Guard against the ceiling implied by `vitality`.
#[must_use]
pub fn clamp_guard(guard: &GuardPoints, vitality: &VitalityPoints) -> GuardPoints {
    guard.clamped(guard_ceiling(guard, vitality))
}

#[must_use]
pub const fn combat_state(vitality: &VitalityPoints) -> CombatState {
    if vitality.current == 0 {
        CombatState::CriticalWound
    } else if vitality.current >= vitality.max {
        CombatState::Normal
    } else {
        CombatState::DirectWound
    }
}

#[must_use]
pub fn is_battered(guard: &GuardPoints, vitality: &VitalityPoints) -> bool {
    let ceiling = guard_ceiling(guard, vitality);
    let current = guard.current.min(ceiling);
    current > 0 && current <= ceiling / BATTERED_DIVISOR
}

#[must_use]
pub fn assess(guard: &GuardPoints, vitality: &VitalityPoints) -> CombatStatus {
    CombatStatus {
        state: combat_state(vitality),
        battered: is_battered(guard, vitality),
        nominal_guard_max: guard.nominal_max(),
        effective_guard_max: guard_ceiling(guard, vitality),
    }
}

/// Apply damage through the temporary buffer, Guard, then Vitality.
#[must_use]
pub fn apply_damage(guard: &GuardPoints, vitality: &VitalityPoints, amount: u32) -> DamageOutcome {
    let buffer = guard.temporary.unwrap_or(0);
    let absorbed_by_temporary = buffer.min(amount);
    let mut remaining = amount - absorbed_by_temporary;

    let absorbed_by_guard = guard.current.min(remaining);
    remaining -= absorbed_by_guard;

    let absorbed_by_vitality = vitality.current.min(remaining);
    remaining -= absorbed_by_vitality;

    let vitality = VitalityPoints {
        current: vitality.current - absorbed_by_vitality,
        ..*vitality
    };
    let guard = GuardPoints {
        current: guard.current - absorbed_by_guard,
        temporary: Some(buffer - absorbed_by_temporary).filter(|left| *left > 0),
        ..guard.clone()
    };
    let guard = clamp_guard(&guard, &vitality);

    if remaining > 0 {
        log::trace!("{remaining} damage left unabsorbed");
    }
    DamageOutcome {
        guard,
        vitality,
        absorbed_by_temporary,
        absorbed_by_guard,
        absorbed_by_vitality,
        unabsorbed: remaining,
    }
}

/// Damage Vitality directly, bypassing Guard.
#[must_use]
pub fn damage_vitality(guard: &GuardPoints, vitality: &VitalityPoints, amount: u32) -> PoolUpdate {
    let vitality = VitalityPoints {
        current: vitality.current.saturating_sub(amount),
        ..*vitality
    };
    PoolUpdate {
        guard: clamp_guard(guard, &vitality),
        vitality,
    }
}

/// Heal Vitality directly, up to its maximum.
#[must_use]
pub fn heal_vitality(guard: &GuardPoints, vitality: &VitalityPoints, amount: u32) -> PoolUpdate {
    let vitality = VitalityPoints {
        current: vitality.current.saturating_add(amount).min(vitality.max),
        ..*vitality
    };
    PoolUpdate {
        guard: clamp_guard(guard, &vitality),
        vitality,
    }
}

/// Heal Guard up to its effective (possibly halved) maximum.
#[must_use]
pub fn heal_guard(guard: &GuardPoints, vitality: &VitalityPoints, amount: u32) -> GuardPoints {
    let ceiling = guard_ceiling(guard, vitality);
    GuardPoints {
        current: guard.current.saturating_add(amount).min(ceiling),
        ..guard.clone()
    }
}

/// Convert recovery points into Vitality at the default exchange rate.
///
/// # Errors
///
/// See [`recover_vitality_at`].
pub fn recover_vitality(
    guard: &GuardPoints,
    vitality: &VitalityPoints,
    recovery_points: u32,
) -> Result<RecoveryOutcome, RulesError> {
    recover_vitality_at(guard, vitality, recovery_points, DEFAULT_RECOVERY_RATE)
}

/// Convert recovery points into Vitality, `rate` points per Vitality point.
///
/// # Errors
///
/// Returns [`RulesError::InvalidRecoveryRate`] for a zero rate,
/// [`RulesError::RecoveryBelowRate`] when the grant cannot buy a single point
/// and [`RulesError::VitalityFull`] when Vitality has no room to recover.
pub fn recover_vitality_at(
    guard: &GuardPoints,
    vitality: &VitalityPoints,
    recovery_points: u32,
    rate: u32,
) -> Result<RecoveryOutcome, RulesError> {
    if rate == 0 {
        return Err(RulesError::InvalidRecoveryRate);
    }
    if recovery_points < rate {
        return Err(RulesError::RecoveryBelowRate {
            points: recovery_points,
            rate,
        });
    }

    if vitality.current >= vitality.max {
        return Err(RulesError::VitalityFull { max: vitality.max });
    }

    let whole_points = recovery_points / rate;
    let update = heal_vitality(guard, vitality, whole_points);
    let vitality_gained = update.vitality.current - vitality.current;
    let points_spent = vitality_gained * rate;
    Ok(RecoveryOutcome {
        vitality_gained,
        points_spent,
        points_discarded: recovery_points - points_spent,
        guard: update.guard,
        vitality: update.vitality,
    })
}

//! Dice-pool resolution for skill and defense tests.
//!
//! A pool rolls `attribute + modifier` dice of one size. Each die showing its
//! top face is a success, each `1` cancels one success, and the test is
//! measured in net successes. Pools that would drop to zero or fewer dice
//! become penalty rolls: two dice are rolled and only the lower is kept.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::config::PoolConfig;
use crate::constants::{CANCELLATION_FACE, MAX_POOL_DICE, PENALTY_POOL_DICE};
use crate::die::PoolDie;
use crate::modifiers::{Modifier, ModifierCategory, total_for};
use crate::roller::DieRoller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceKind {
    Success,
    Cancellation,
    Blank,
}

/// One rolled die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceFace {
    pub value: u8,
    pub kind: FaceKind,
    /// False only for the discarded die of a penalty roll.
    pub kept: bool,
}

impl DiceFace {
    #[must_use]
    pub const fn new(value: u8, die: PoolDie, kept: bool) -> Self {
        Self {
            value,
            kind: classify(value, die),
            kept,
        }
    }
}

/// Classify a face against the die it was rolled on.
#[must_use]
pub const fn classify(value: u8, die: PoolDie) -> FaceKind {
    if value >= die.sides() {
        FaceKind::Success
    } else if value == CANCELLATION_FACE {
        FaceKind::Cancellation
    } else {
        FaceKind::Blank
    }
}

/// Immutable outcome of one pool resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePoolResult {
    pub die: PoolDie,
    /// Dice requested before the modifier was applied.
    pub requested: i32,
    pub modifier: i32,
    pub faces: SmallVec<[DiceFace; 8]>,
    pub successes: u8,
    pub cancellations: u8,
    pub net_successes: u8,
    pub penalty: bool,
    pub context: String,
}

impl DicePoolResult {
    /// Number of dice physically rolled, including a discarded penalty die.
    #[must_use]
    pub fn dice_rolled(&self) -> usize {
        self.faces.len()
    }

    pub fn kept_faces(&self) -> impl Iterator<Item = &DiceFace> {
        self.faces.iter().filter(|face| face.kept)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.net_successes > 0
    }
}

impl fmt::Display for DicePoolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self
            .faces
            .iter()
            .map(|face| {
                if face.kept {
                    face.value.to_string()
                } else {
                    format!("({})", face.value)
                }
            })
            .collect();
        let label = if self.penalty { " penalty" } else { "" };
        write!(
            f,
            "{}{}{label} [{}] -> {} net",
            self.dice_rolled(),
            self.die,
            values.join(", "),
            self.net_successes
        )?;
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}

/// Sum of the dice-count modifiers in a typed modifier list.
#[must_use]
pub fn dice_modifier(modifiers: &[Modifier]) -> i32 {
    total_for(modifiers, ModifierCategory::DiceCount)
}

/// Resolve a pool with the default pool configuration.
pub fn resolve_pool<R: DieRoller + ?Sized>(
    dice_count: i32,
    die: PoolDie,
    modifier: i32,
    context: impl Into<String>,
    roller: &mut R,
) -> DicePoolResult {
    resolve_pool_with(
        &PoolConfig::default(),
        dice_count,
        die,
        modifier,
        context,
        roller,
    )
}

/// Resolve a pool test.
///
/// The effective count is `dice_count + modifier`, capped at
/// `config.max_dice` and never above `MAX_POOL_DICE`. A count of zero or less
/// becomes a penalty roll of `PENALTY_POOL_DICE` dice keeping only the lowest
/// face; a zero-dice roll is never produced.
pub fn resolve_pool_with<R: DieRoller + ?Sized>(
    config: &PoolConfig,
    dice_count: i32,
    die: PoolDie,
    modifier: i32,
    context: impl Into<String>,
    roller: &mut R,
) -> DicePoolResult {
    let effective = dice_count.saturating_add(modifier);
    let penalty = effective <= 0;

    let mut faces: SmallVec<[DiceFace; 8]> = SmallVec::new();
    if penalty {
        let rolls: SmallVec<[u8; 8]> = (0..PENALTY_POOL_DICE)
            .map(|_| roller.roll(die.sides()))
            .collect();
        let keep_index = lowest_index(&rolls);
        faces.extend(
            rolls
                .iter()
                .enumerate()
                .map(|(idx, &value)| DiceFace::new(value, die, idx == keep_index)),
        );
    } else {
        let cap = i32::from(config.max_dice.clamp(1, MAX_POOL_DICE));
        let count = effective.min(cap);
        faces.extend((0..count).map(|_| DiceFace::new(roller.roll(die.sides()), die, true)));
    }

    let (successes, cancellations) = tally(&faces);
    let result = DicePoolResult {
        die,
        requested: dice_count,
        modifier,
        faces,
        successes,
        cancellations,
        net_successes: successes.saturating_sub(cancellations),
        penalty,
        context: context.into(),
    };
    log::debug!("pool resolved: {result}");
    result
}

fn lowest_index(rolls: &[u8]) -> usize {
    rolls
        .iter()
        .enumerate()
        .min_by_key(|(_, value)| **value)
        .map_or(0, |(idx, _)| idx)
}

fn tally(faces: &[DiceFace]) -> (u8, u8) {
    faces
        .iter()
        .filter(|face| face.kept)
        .fold((0_u8, 0_u8), |(hits, cancels), face| match face.kind {
            FaceKind::Success => (hits.saturating_add(1), cancels),
            FaceKind::Cancellation => (hits, cancels.saturating_add(1)),
            FaceKind::Blank => (hits, cancels),
        })
}

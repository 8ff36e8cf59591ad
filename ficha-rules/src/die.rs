//! Die sizes and the fixed step scale shared by pools and usage dice.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One position on the fixed die scale, ordered smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieSize {
    D2,
    D4,
    D6,
    D8,
    D10,
    D12,
}

impl DieSize {
    /// The full scale, smallest first.
    pub const SCALE: [Self; 6] = [Self::D2, Self::D4, Self::D6, Self::D8, Self::D10, Self::D12];

    #[must_use]
    pub const fn sides(self) -> u8 {
        match self {
            Self::D2 => 2,
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
        }
    }

    #[must_use]
    pub const fn from_sides(sides: u8) -> Option<Self> {
        match sides {
            2 => Some(Self::D2),
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            _ => None,
        }
    }

    /// Next larger size, or `None` at the top of the scale.
    #[must_use]
    pub const fn step_up(self) -> Option<Self> {
        match self {
            Self::D2 => Some(Self::D4),
            Self::D4 => Some(Self::D6),
            Self::D6 => Some(Self::D8),
            Self::D8 => Some(Self::D10),
            Self::D10 => Some(Self::D12),
            Self::D12 => None,
        }
    }

    /// Next smaller size, or `None` at the bottom of the scale.
    #[must_use]
    pub const fn step_down(self) -> Option<Self> {
        match self {
            Self::D2 => None,
            Self::D4 => Some(Self::D2),
            Self::D6 => Some(Self::D4),
            Self::D8 => Some(Self::D6),
            Self::D10 => Some(Self::D8),
            Self::D12 => Some(Self::D10),
        }
    }

    /// Clamp into `[min, max]`; the bounds are swapped when given out of order.
    #[must_use]
    pub fn clamp_between(self, min: Self, max: Self) -> Self {
        let (low, high) = ordered(min, max);
        self.clamp(low, high)
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Die sizes a dice pool may be rolled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolDie {
    D6,
    D8,
    D10,
    D12,
}

impl PoolDie {
    pub const ALL: [Self; 4] = [Self::D6, Self::D8, Self::D10, Self::D12];

    #[must_use]
    pub const fn sides(self) -> u8 {
        self.size().sides()
    }

    #[must_use]
    pub const fn size(self) -> DieSize {
        match self {
            Self::D6 => DieSize::D6,
            Self::D8 => DieSize::D8,
            Self::D10 => DieSize::D10,
            Self::D12 => DieSize::D12,
        }
    }
}

impl From<PoolDie> for DieSize {
    fn from(die: PoolDie) -> Self {
        die.size()
    }
}

impl TryFrom<DieSize> for PoolDie {
    type Error = DieSize;

    fn try_from(size: DieSize) -> Result<Self, Self::Error> {
        match size {
            DieSize::D6 => Ok(Self::D6),
            DieSize::D8 => Ok(Self::D8),
            DieSize::D10 => Ok(Self::D10),
            DieSize::D12 => Ok(Self::D12),
            other => Err(other),
        }
    }
}

impl fmt::Display for PoolDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.size().fmt(f)
    }
}

/// Return `(a, b)` ordered so the first element is the smaller size.
#[must_use]
pub fn ordered(a: DieSize, b: DieSize) -> (DieSize, DieSize) {
    if a <= b { (a, b) } else { (b, a) }
}

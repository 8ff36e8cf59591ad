//! Caller-owned roll history for player review.
use serde::{Deserialize, Serialize};

use crate::pool::DicePoolResult;

/// Append-only log of pool results for one play session.
///
/// The engine never writes here; the session that owns the log records
/// results after resolving them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RollLog {
    pub session: String,
    entries: Vec<DicePoolResult>,
}

impl RollLog {
    #[must_use]
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            entries: Vec::new(),
        }
    }

    /// Append a result and return a reference to the stored entry.
    pub fn record(&mut self, result: DicePoolResult) -> &DicePoolResult {
        self.entries.push(result);
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn entries(&self) -> &[DicePoolResult] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DicePoolResult> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total_net_successes(&self) -> u32 {
        self.entries
            .iter()
            .map(|entry| u32::from(entry.net_successes))
            .sum()
    }
}

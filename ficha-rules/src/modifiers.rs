//! Typed modifiers attached to a character by items and conditions.
use serde::{Deserialize, Serialize};

/// Closed set of things a modifier can affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierCategory {
    /// Adds or removes dice from pool tests.
    DiceCount,
    /// Raises or lowers Guard's nominal maximum.
    GuardMax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Where the modifier comes from, for display.
    pub source: String,
    pub category: ModifierCategory,
    pub amount: i32,
}

impl Modifier {
    #[must_use]
    pub fn new(source: impl Into<String>, category: ModifierCategory, amount: i32) -> Self {
        Self {
            source: source.into(),
            category,
            amount,
        }
    }

    #[must_use]
    pub fn affects(&self, category: ModifierCategory) -> bool {
        self.category == category
    }
}

/// Iterate the modifiers of one category.
pub fn of_category(
    modifiers: &[Modifier],
    category: ModifierCategory,
) -> impl Iterator<Item = &Modifier> {
    modifiers.iter().filter(move |m| m.affects(category))
}

/// Sum of every modifier in `category`, saturating at the `i32` bounds.
#[must_use]
pub fn total_for(modifiers: &[Modifier], category: ModifierCategory) -> i32 {
    of_category(modifiers, category).fold(0_i32, |acc, m| acc.saturating_add(m.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_only_count_matching_category() {
        let mods = vec![
            Modifier::new("Blessed blade", ModifierCategory::DiceCount, 2),
            Modifier::new("Heavy armor", ModifierCategory::GuardMax, 4),
            Modifier::new("Exhaustion", ModifierCategory::DiceCount, -1),
        ];
        assert_eq!(total_for(&mods, ModifierCategory::DiceCount), 1);
        assert_eq!(total_for(&mods, ModifierCategory::GuardMax), 4);
        assert_eq!(total_for(&[], ModifierCategory::GuardMax), 0);
        assert_eq!(of_category(&mods, ModifierCategory::DiceCount).count(), 2);
    }
}

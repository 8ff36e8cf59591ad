//! Level-up progression: pool growth, experience thresholds and the special
//! rewards a player must choose when reaching certain levels.
//!
//! Vitality's maximum is never tracked on its own; it is always a third of
//! the Guard maximum, so the two cannot drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ADEPT_COMPETENCE_LEVELS, ADEPT_GAINS, ADEPT_POWER_LEVELS, ADEPT_TRAIT_LEVELS,
    CLASS_UNLOCK_LEVEL, EXPERIENCE_THRESHOLDS, MIN_LEVEL, SPECIALIST_COMPETENCE_LEVELS,
    SPECIALIST_GAINS, SPECIALIST_POWER_LEVELS, SPECIALIST_TRAIT_LEVELS, VANGUARD_COMPETENCE_LEVELS,
    VANGUARD_GAINS, VANGUARD_POWER_LEVELS, VANGUARD_TRAIT_LEVELS, VITALITY_FROM_GUARD_DIVISOR,
};
use crate::error::{ConfigError, RulesError};

/// Advancement track chosen at each level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Vanguard,
    Adept,
    Specialist,
}

impl Track {
    pub const ALL: [Self; 3] = [Self::Vanguard, Self::Adept, Self::Specialist];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vanguard => "vanguard",
            Self::Adept => "adept",
            Self::Specialist => "specialist",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Trait,
    Competence,
    PowerOrTalent,
}

impl RewardKind {
    pub const ALL: [Self; 3] = [Self::Trait, Self::Competence, Self::PowerOrTalent];
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trait => f.write_str("trait"),
            Self::Competence => f.write_str("competence"),
            Self::PowerOrTalent => f.write_str("power or talent"),
        }
    }
}

/// Which reward categories a level requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RewardFlags {
    pub trait_grant: bool,
    pub competence: bool,
    pub power_or_talent: bool,
}

impl RewardFlags {
    #[must_use]
    pub const fn requires(&self, kind: RewardKind) -> bool {
        match kind {
            RewardKind::Trait => self.trait_grant,
            RewardKind::Competence => self.competence,
            RewardKind::PowerOrTalent => self.power_or_talent,
        }
    }

    pub fn required(&self) -> impl Iterator<Item = RewardKind> + '_ {
        RewardKind::ALL
            .into_iter()
            .filter(move |kind| self.requires(*kind))
    }

    #[must_use]
    pub const fn any(&self) -> bool {
        self.trait_grant || self.competence || self.power_or_talent
    }
}

/// Labels the player picked for this level's rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RewardChoices {
    #[serde(default)]
    pub trait_grant: Option<String>,
    #[serde(default)]
    pub competence: Option<String>,
    #[serde(default)]
    pub power_or_talent: Option<String>,
}

impl RewardChoices {
    #[must_use]
    pub fn with(mut self, kind: RewardKind, label: impl Into<String>) -> Self {
        let slot = match kind {
            RewardKind::Trait => &mut self.trait_grant,
            RewardKind::Competence => &mut self.competence,
            RewardKind::PowerOrTalent => &mut self.power_or_talent,
        };
        *slot = Some(label.into());
        self
    }

    /// Trimmed, non-empty label for `kind`.
    #[must_use]
    pub fn label(&self, kind: RewardKind) -> Option<&str> {
        let slot = match kind {
            RewardKind::Trait => &self.trait_grant,
            RewardKind::Competence => &self.competence,
            RewardKind::PowerOrTalent => &self.power_or_talent,
        };
        slot.as_deref().map(str::trim).filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedReward {
    pub kind: RewardKind,
    pub label: String,
}

/// The slice of a character record the calculator reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    pub level: u8,
    pub experience: u32,
    pub guard_max: u32,
    pub power_max: u32,
    pub vitality_max: u32,
    /// Track chosen at each past level-up, oldest first.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl ProgressionSnapshot {
    /// A first-level character; Vitality is derived from `guard_max`.
    #[must_use]
    pub fn starting(guard_max: u32, power_max: u32) -> Self {
        Self {
            level: MIN_LEVEL,
            experience: 0,
            guard_max,
            power_max,
            vitality_max: derived_vitality_max(guard_max),
            tracks: Vec::new(),
        }
    }
}

/// Derived, non-persisted preview of the next level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpGains {
    pub track: Track,
    pub from_level: u8,
    pub to_level: u8,
    /// `None` at the maximum level.
    pub experience_threshold: Option<u32>,
    pub can_level_up: bool,
    pub remaining_experience: u32,
    pub guard_max: u32,
    pub power_max: u32,
    pub vitality_max: u32,
    pub guard_gain: u32,
    pub power_gain: u32,
    pub vitality_gain: u32,
    pub rewards: RewardFlags,
    /// Set when `to_level` is the level that unlocks multi-archetype classes.
    pub classes_unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpCommit {
    pub snapshot: ProgressionSnapshot,
    pub gains: LevelUpGains,
    pub rewards: Vec<GrantedReward>,
}

/// Per-track growth and reward milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTable {
    pub guard_per_level: u32,
    pub power_per_level: u32,
    #[serde(default)]
    pub trait_levels: Vec<u8>,
    #[serde(default)]
    pub competence_levels: Vec<u8>,
    #[serde(default)]
    pub power_levels: Vec<u8>,
}

impl TrackTable {
    fn from_parts(gains: (u32, u32), traits: &[u8], competences: &[u8], powers: &[u8]) -> Self {
        Self {
            guard_per_level: gains.0,
            power_per_level: gains.1,
            trait_levels: traits.to_vec(),
            competence_levels: competences.to_vec(),
            power_levels: powers.to_vec(),
        }
    }

    #[must_use]
    pub fn rewards_at(&self, level: u8) -> RewardFlags {
        RewardFlags {
            trait_grant: self.trait_levels.contains(&level),
            competence: self.competence_levels.contains(&level),
            power_or_talent: self.power_levels.contains(&level),
        }
    }

    fn milestones(&self) -> impl Iterator<Item = u8> + '_ {
        self.trait_levels
            .iter()
            .chain(&self.competence_levels)
            .chain(&self.power_levels)
            .copied()
    }
}

/// Static progression lookup data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTable {
    /// Experience to advance from level `n`, at index `n - 1`.
    pub experience_thresholds: Vec<u32>,
    #[serde(default = "ProgressionTable::default_class_unlock_level")]
    pub class_unlock_level: u8,
    pub vanguard: TrackTable,
    pub adept: TrackTable,
    pub specialist: TrackTable,
}

impl Default for ProgressionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProgressionTable {
    const fn default_class_unlock_level() -> u8 {
        CLASS_UNLOCK_LEVEL
    }

    /// The rulebook's progression tables.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            experience_thresholds: EXPERIENCE_THRESHOLDS.to_vec(),
            class_unlock_level: CLASS_UNLOCK_LEVEL,
            vanguard: TrackTable::from_parts(
                VANGUARD_GAINS,
                VANGUARD_TRAIT_LEVELS,
                VANGUARD_COMPETENCE_LEVELS,
                VANGUARD_POWER_LEVELS,
            ),
            adept: TrackTable::from_parts(
                ADEPT_GAINS,
                ADEPT_TRAIT_LEVELS,
                ADEPT_COMPETENCE_LEVELS,
                ADEPT_POWER_LEVELS,
            ),
            specialist: TrackTable::from_parts(
                SPECIALIST_GAINS,
                SPECIALIST_TRAIT_LEVELS,
                SPECIALIST_COMPETENCE_LEVELS,
                SPECIALIST_POWER_LEVELS,
            ),
        }
    }

    #[must_use]
    pub const fn track(&self, track: Track) -> &TrackTable {
        match track {
            Track::Vanguard => &self.vanguard,
            Track::Adept => &self.adept,
            Track::Specialist => &self.specialist,
        }
    }

    /// Highest reachable level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        let steps = u8::try_from(self.experience_thresholds.len()).unwrap_or(u8::MAX - 1);
        MIN_LEVEL.saturating_add(steps)
    }

    /// Experience needed to advance from `level`, or `None` at the cap.
    #[must_use]
    pub fn threshold_for(&self, level: u8) -> Option<u32> {
        let index = usize::from(level.max(MIN_LEVEL) - MIN_LEVEL);
        self.experience_thresholds.get(index).copied()
    }

    /// Preview the next level-up. At or past the cap the preview targets the
    /// current level and carries no gains or rewards.
    #[must_use]
    pub fn preview(&self, snapshot: &ProgressionSnapshot, track: Track) -> LevelUpGains {
        let from_level = snapshot.level.max(MIN_LEVEL);
        let threshold = self.threshold_for(from_level);
        let at_cap = threshold.is_none();
        let to_level = if at_cap {
            from_level
        } else {
            from_level.saturating_add(1)
        };
        let can_level_up = threshold.is_some_and(|required| snapshot.experience >= required);
        let remaining_experience = match threshold {
            Some(required) if can_level_up => snapshot.experience - required,
            _ => snapshot.experience,
        };

        let table = self.track(track);
        let (guard_gain, power_gain) = if at_cap {
            (0, 0)
        } else {
            (table.guard_per_level, table.power_per_level)
        };
        let guard_max = snapshot.guard_max.saturating_add(guard_gain);
        let power_max = snapshot.power_max.saturating_add(power_gain);
        let vitality_max = if at_cap {
            snapshot.vitality_max
        } else {
            derived_vitality_max(guard_max)
        };

        LevelUpGains {
            track,
            from_level,
            to_level,
            experience_threshold: threshold,
            can_level_up,
            remaining_experience,
            guard_max,
            power_max,
            vitality_max,
            guard_gain,
            power_gain,
            vitality_gain: vitality_max.saturating_sub(snapshot.vitality_max),
            rewards: if at_cap {
                RewardFlags::default()
            } else {
                table.rewards_at(to_level)
            },
            classes_unlocked: from_level < self.class_unlock_level
                && to_level == self.class_unlock_level,
        }
    }

    /// Validate and apply a level-up.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::MaxLevelReached`], [`RulesError::InsufficientExperience`]
    /// or [`RulesError::MissingReward`] naming the first required category
    /// without a label. Nothing is applied when an error is returned.
    pub fn commit(
        &self,
        snapshot: &ProgressionSnapshot,
        track: Track,
        choices: &RewardChoices,
    ) -> Result<LevelUpCommit, RulesError> {
        let gains = self.preview(snapshot, track);
        let result = self.check_commit(&gains, snapshot, choices);
        if let Err(err) = &result {
            log::debug!("level-up rejected at level {}: {err}", gains.from_level);
        }
        let rewards = result?;

        let mut tracks = snapshot.tracks.clone();
        tracks.push(track);
        let next = ProgressionSnapshot {
            level: gains.to_level,
            experience: gains.remaining_experience,
            guard_max: gains.guard_max,
            power_max: gains.power_max,
            vitality_max: gains.vitality_max,
            tracks,
        };
        Ok(LevelUpCommit {
            snapshot: next,
            gains,
            rewards,
        })
    }

    fn check_commit(
        &self,
        gains: &LevelUpGains,
        snapshot: &ProgressionSnapshot,
        choices: &RewardChoices,
    ) -> Result<Vec<GrantedReward>, RulesError> {
        let Some(required) = gains.experience_threshold else {
            return Err(RulesError::MaxLevelReached {
                level: gains.from_level,
            });
        };
        if !gains.can_level_up {
            return Err(RulesError::InsufficientExperience {
                experience: snapshot.experience,
                required,
            });
        }
        gains
            .rewards
            .required()
            .map(|kind| {
                choices
                    .label(kind)
                    .map(|label| GrantedReward {
                        kind,
                        label: label.to_string(),
                    })
                    .ok_or(RulesError::MissingReward(kind))
            })
            .collect()
    }

    /// Check table invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, pair) in self.experience_thresholds.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                let level = u8::try_from(index + 2).unwrap_or(u8::MAX);
                return Err(ConfigError::ThresholdOrder {
                    level,
                    value: pair[1],
                });
            }
        }
        let min = MIN_LEVEL + 1;
        let max = self.max_level();
        for track in Track::ALL {
            if let Some(level) = self
                .track(track)
                .milestones()
                .find(|level| !(min..=max).contains(level))
            {
                return Err(ConfigError::MilestoneRange {
                    track: track.label(),
                    level,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Vitality's maximum for a given Guard maximum.
#[must_use]
pub const fn derived_vitality_max(guard_max: u32) -> u32 {
    guard_max / VITALITY_FROM_GUARD_DIVISOR
}

/// Preview a level-up against the standard tables.
#[must_use]
pub fn preview_level_up(snapshot: &ProgressionSnapshot, track: Track) -> LevelUpGains {
    ProgressionTable::standard().preview(snapshot, track)
}

/// Commit a level-up against the standard tables.
///
/// # Errors
///
/// See [`ProgressionTable::commit`].
pub fn commit_level_up(
    snapshot: &ProgressionSnapshot,
    track: Track,
    choices: &RewardChoices,
) -> Result<LevelUpCommit, RulesError> {
    ProgressionTable::standard().commit(snapshot, track, choices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_LEVEL;

    fn level_four(experience: u32) -> ProgressionSnapshot {
        ProgressionSnapshot {
            level: 4,
            experience,
            guard_max: 24,
            power_max: 6,
            vitality_max: 8,
            tracks: vec![Track::Vanguard; 3],
        }
    }

    #[test]
    fn threshold_boundary_at_level_four() {
        let short = preview_level_up(&level_four(999), Track::Adept);
        assert!(!short.can_level_up);
        assert_eq!(short.experience_threshold, Some(1_000));
        assert_eq!(short.remaining_experience, 999);

        let exact = preview_level_up(&level_four(1_000), Track::Adept);
        assert!(exact.can_level_up);
        assert_eq!(exact.remaining_experience, 0);

        let over = preview_level_up(&level_four(1_240), Track::Adept);
        assert_eq!(over.remaining_experience, 240);
    }

    #[test]
    fn vitality_is_derived_from_new_guard_max() {
        let gains = preview_level_up(&level_four(1_000), Track::Vanguard);
        assert_eq!(gains.guard_max, 28);
        assert_eq!(gains.power_max, 7);
        assert_eq!(gains.vitality_max, 9);
        assert_eq!(gains.vitality_gain, 1);
    }

    #[test]
    fn class_unlock_flag_only_when_entering_level_five() {
        let gains = preview_level_up(&level_four(1_000), Track::Specialist);
        assert_eq!(gains.to_level, CLASS_UNLOCK_LEVEL);
        assert!(gains.classes_unlocked);

        let mut later = level_four(1_500);
        later.level = 5;
        assert!(!preview_level_up(&later, Track::Specialist).classes_unlocked);
    }

    #[test]
    fn commit_requires_every_flagged_reward() {
        // Level 5 on the specialist track grants a power or talent.
        let snapshot = level_four(1_100);
        let gains = preview_level_up(&snapshot, Track::Specialist);
        assert!(gains.rewards.power_or_talent);

        let err = commit_level_up(&snapshot, Track::Specialist, &RewardChoices::default());
        assert_eq!(err, Err(RulesError::MissingReward(RewardKind::PowerOrTalent)));

        let blank = RewardChoices::default().with(RewardKind::PowerOrTalent, "   ");
        assert!(commit_level_up(&snapshot, Track::Specialist, &blank).is_err());

        let choices = RewardChoices::default().with(RewardKind::PowerOrTalent, "Quickdraw");
        let commit = commit_level_up(&snapshot, Track::Specialist, &choices).unwrap();
        assert_eq!(commit.snapshot.level, 5);
        assert_eq!(commit.snapshot.experience, 100);
        assert_eq!(commit.snapshot.tracks.len(), 4);
        assert_eq!(commit.rewards[0].label, "Quickdraw");
    }

    #[test]
    fn commit_rejects_short_experience_and_cap() {
        assert_eq!(
            commit_level_up(&level_four(10), Track::Adept, &RewardChoices::default()),
            Err(RulesError::InsufficientExperience {
                experience: 10,
                required: 1_000
            })
        );

        let mut capped = level_four(u32::MAX);
        capped.level = MAX_LEVEL;
        let gains = preview_level_up(&capped, Track::Adept);
        assert!(!gains.can_level_up);
        assert_eq!(gains.experience_threshold, None);
        assert_eq!(
            commit_level_up(&capped, Track::Adept, &RewardChoices::default()),
            Err(RulesError::MaxLevelReached { level: MAX_LEVEL })
        );
    }

    #[test]
    fn preview_past_the_cap_never_targets_a_lower_level() {
        let mut beyond = level_four(u32::MAX);
        beyond.level = 25;
        let gains = preview_level_up(&beyond, Track::Vanguard);
        assert_eq!(gains.from_level, 25);
        assert_eq!(gains.to_level, 25);
        assert!(!gains.can_level_up);
        assert_eq!(gains.rewards.required().count(), 0);
        assert_eq!(gains.guard_gain, 0);
        assert_eq!(gains.guard_max, beyond.guard_max);
        assert_eq!(gains.vitality_max, beyond.vitality_max);
        assert!(!gains.classes_unlocked);
        assert_eq!(
            commit_level_up(&beyond, Track::Vanguard, &RewardChoices::default()),
            Err(RulesError::MaxLevelReached { level: 25 })
        );
    }

    #[test]
    fn preview_at_the_cap_offers_no_milestone() {
        let mut capped = level_four(0);
        capped.level = MAX_LEVEL;
        for track in Track::ALL {
            let gains = preview_level_up(&capped, track);
            assert_eq!(gains.to_level, MAX_LEVEL);
            assert_eq!(gains.rewards, RewardFlags::default());
        }
    }

    #[test]
    fn commit_records_the_chosen_track() {
        let table = ProgressionTable::standard();
        let start = ProgressionSnapshot::starting(12, 4);
        let mut snapshot = start.clone();
        snapshot.experience = table.threshold_for(MIN_LEVEL).unwrap_or(0);
        let choices = RewardChoices::default()
            .with(RewardKind::Trait, "Keen Eye")
            .with(RewardKind::Competence, "Survival")
            .with(RewardKind::PowerOrTalent, "Second Wind");
        let commit = table.commit(&snapshot, Track::Specialist, &choices).unwrap();
        assert_eq!(commit.snapshot.tracks, vec![Track::Specialist]);
        assert!(start.tracks.is_empty());
    }

    #[test]
    fn standard_table_is_valid_and_reaches_max_level() {
        let table = ProgressionTable::standard();
        assert_eq!(table.validate(), Ok(()));
        assert_eq!(table.max_level(), MAX_LEVEL);
    }

    #[test]
    fn validate_flags_flat_thresholds() {
        let mut table = ProgressionTable::standard();
        table.experience_thresholds[3] = table.experience_thresholds[2];
        assert_eq!(
            table.validate(),
            Err(ConfigError::ThresholdOrder {
                level: 4,
                value: 750
            })
        );
    }
}

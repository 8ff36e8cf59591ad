use ficha_rules::{
    CombatState, DieSize, GuardPoints, PoolDie, ProgressionSnapshot, ResourceDie, RewardChoices,
    ScriptedRoller, Track, VitalityPoints, apply_damage, assess, commit_level_up,
    effective_guard_max, preview_level_up, resolve_pool, resolve_use, step_down, step_up,
};

#[test]
fn pool_of_three_d6_with_two_sixes_and_a_one() {
    let mut roller = ScriptedRoller::new([6, 6, 1]);
    let result = resolve_pool(3, PoolDie::D6, 0, "Defense", &mut roller);
    assert_eq!(result.successes, 2);
    assert_eq!(result.cancellations, 1);
    assert_eq!(result.net_successes, 1);
}

#[test]
fn zero_dice_and_zero_modifier_still_rolls_two() {
    let mut roller = ScriptedRoller::new([4, 6]);
    let result = resolve_pool(0, PoolDie::D6, 0, "Untrained", &mut roller);
    assert!(result.penalty);
    assert_eq!(result.dice_rolled(), 2);
    assert_eq!(result.kept_faces().count(), 1);
    assert_eq!(result.net_successes, 0);
}

#[test]
fn guard_overflow_into_vitality_reaches_critical() {
    let guard = GuardPoints::new(10, 20);
    let vitality = VitalityPoints::new(3, 5);
    let outcome = apply_damage(&guard, &vitality, 15);

    assert_eq!(outcome.guard.current, 0);
    assert_eq!(outcome.vitality.current, 0);
    let status = assess(&outcome.guard, &outcome.vitality);
    assert_eq!(status.state, CombatState::CriticalWound);
    assert_eq!(status.effective_guard_max, 10);
    assert_eq!(effective_guard_max(20, outcome.vitality.current), 10);
}

#[test]
fn usage_die_steps_down_then_depletes_on_one() {
    let resource = ResourceDie::new("rations", "Rations", DieSize::D2, DieSize::D12)
        .reconfigure(DieSize::D2, DieSize::D6);
    assert_eq!(resource.current, Some(DieSize::D6));

    let first = resolve_use(&resource, 4).unwrap();
    assert_eq!(first.new_die, Some(DieSize::D4));
    let resource = resource.with_outcome(&first);

    let second = resolve_use(&resource, 1).unwrap();
    assert!(second.is_depleted);
    let resource = resource.with_outcome(&second);
    assert!(resource.is_depleted());
    assert!(resolve_use(&resource, 2).is_err());
}

#[test]
fn scale_edges_for_step_up_and_down() {
    for min in DieSize::SCALE {
        assert_eq!(step_down(min, min), None);
        assert_eq!(step_up(None, min, DieSize::D12), min);
    }
}

#[test]
fn level_four_experience_boundary() {
    let snapshot = ProgressionSnapshot {
        level: 4,
        experience: 999,
        guard_max: 21,
        power_max: 9,
        vitality_max: 7,
        tracks: vec![Track::Adept, Track::Adept, Track::Adept],
    };
    assert!(!preview_level_up(&snapshot, Track::Vanguard).can_level_up);

    let ready = ProgressionSnapshot {
        experience: 1_000,
        ..snapshot
    };
    let gains = preview_level_up(&ready, Track::Vanguard);
    assert!(gains.can_level_up);
    assert_eq!(gains.remaining_experience, 0);

    // Vanguard's level 5 grants a competence.
    let choices = RewardChoices::default().with(ficha_rules::RewardKind::Competence, "Tactics");
    let commit = commit_level_up(&ready, Track::Vanguard, &choices).unwrap();
    assert_eq!(commit.snapshot.level, 5);
    assert_eq!(commit.snapshot.experience, 0);
    assert!(commit.gains.classes_unlocked);
    assert_eq!(commit.snapshot.vitality_max, commit.snapshot.guard_max / 3);
}

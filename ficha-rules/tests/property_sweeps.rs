use ficha_rules::constants::{MAX_LEVEL, MAX_POOL_DICE, PENALTY_POOL_DICE};
use ficha_rules::{
    CombatState, DieRoller, DieSize, GuardPoints, PoolDie, ProgressionSnapshot, ResourceDie,
    Track, VitalityPoints, apply_damage, assess, combat_state, damage_vitality,
    effective_guard_max, heal_guard, heal_vitality, preview_level_up, resolve_pool, resolve_use,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SAMPLE_SIZE: usize = 2_000;

#[test]
fn pools_never_roll_zero_dice_and_net_is_bounded() {
    let mut inputs = SmallRng::seed_from_u64(0x5EED);
    let mut dice = ChaCha20Rng::seed_from_u64(0xD1CE);
    for _ in 0..SAMPLE_SIZE {
        let count = inputs.gen_range(-4..=12);
        let modifier = inputs.gen_range(-6..=6);
        let die = PoolDie::ALL[inputs.gen_range(0..PoolDie::ALL.len())];
        let result = resolve_pool(count, die, modifier, "", &mut dice);

        let rolled = result.dice_rolled();
        if result.penalty {
            assert_eq!(rolled, usize::from(PENALTY_POOL_DICE));
            assert!(count + modifier <= 0);
        } else {
            assert!((1..=usize::from(MAX_POOL_DICE)).contains(&rolled));
        }
        assert_eq!(
            result.net_successes,
            result.successes.saturating_sub(result.cancellations)
        );
        assert!(usize::from(result.net_successes) <= rolled);
        assert!(result.faces.iter().all(|f| (1..=die.sides()).contains(&f.value)));
    }
}

#[test]
fn damage_is_conserved_and_pools_stay_in_range() {
    let mut rng = SmallRng::seed_from_u64(0xBADD_A7A);
    for _ in 0..SAMPLE_SIZE {
        let guard_max = rng.gen_range(0..=40);
        let vitality_max = rng.gen_range(0..=12);
        let vitality = VitalityPoints::new(rng.gen_range(0..=vitality_max), vitality_max);
        let ceiling = effective_guard_max(guard_max, vitality.current);
        let guard = GuardPoints::new(rng.gen_range(0..=ceiling), guard_max);
        let amount = rng.gen_range(0..=60);

        let outcome = apply_damage(&guard, &vitality, amount);
        let capacity = guard.current + vitality.current;
        if amount <= capacity {
            assert_eq!(outcome.absorbed(), amount);
            assert_eq!(outcome.unabsorbed, 0);
        } else {
            assert_eq!(outcome.guard.current, 0);
            assert_eq!(outcome.vitality.current, 0);
        }
        assert!(outcome.vitality.current <= outcome.vitality.max);
        let status = assess(&outcome.guard, &outcome.vitality);
        assert!(outcome.guard.current <= status.effective_guard_max);
        assert_eq!(
            status.state == CombatState::CriticalWound,
            outcome.vitality.current == 0
        );
    }
}

#[test]
fn guard_never_exceeds_ceiling_across_direct_vitality_changes() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut guard = GuardPoints::new(30, 30);
    let mut vitality = VitalityPoints::new(10, 10);
    for _ in 0..SAMPLE_SIZE {
        let amount = rng.gen_range(0..=6);
        let update = match rng.gen_range(0..3) {
            0 => damage_vitality(&guard, &vitality, amount),
            1 => heal_vitality(&guard, &vitality, amount),
            _ => ficha_rules::PoolUpdate {
                guard: heal_guard(&guard, &vitality, amount),
                vitality,
            },
        };
        guard = update.guard;
        vitality = update.vitality;

        let expected = if vitality.current <= 1 { 15 } else { 30 };
        assert_eq!(effective_guard_max(guard.nominal_max(), vitality.current), expected);
        assert!(guard.current <= expected);
        if vitality.current == 0 {
            assert_eq!(combat_state(&vitality), CombatState::CriticalWound);
        }
    }
}

#[test]
fn usage_rolls_of_one_always_deplete() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..SAMPLE_SIZE {
        let min = DieSize::SCALE[rng.gen_range(0..DieSize::SCALE.len())];
        let max = DieSize::SCALE[rng.gen_range(0..DieSize::SCALE.len())];
        let resource = ResourceDie::new("r", "Resource", min, max);
        assert!(resource.min <= resource.max);

        let die = resource.current.expect("new resources start full");
        assert!(resolve_use(&resource, 1).unwrap().is_depleted);

        let roll = rng.roll(die.sides()).max(2);
        let outcome = resolve_use(&resource, roll).unwrap();
        assert_eq!(outcome.is_depleted, die == resource.min);
        assert_ne!(outcome.is_depleted, outcome.is_stepped_down);
    }
}

#[test]
fn progression_gains_are_monotonic_through_every_level() {
    for track in Track::ALL {
        let mut snapshot = ProgressionSnapshot::starting(12, 4);
        let mut last_threshold = 0;
        while snapshot.level < MAX_LEVEL {
            let gains = preview_level_up(&snapshot, track);
            let threshold = gains.experience_threshold.expect("below cap");
            assert!(threshold > last_threshold);
            last_threshold = threshold;
            assert!(gains.guard_max > snapshot.guard_max);
            assert_eq!(gains.vitality_max, gains.guard_max / 3);

            snapshot = ProgressionSnapshot {
                level: gains.to_level,
                experience: 0,
                guard_max: gains.guard_max,
                power_max: gains.power_max,
                vitality_max: gains.vitality_max,
                tracks: snapshot.tracks.clone(),
            };
        }
        assert!(!preview_level_up(&snapshot, track).can_level_up);
    }
}

use anyhow::{Context, Result, ensure};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use ficha_rules::constants::{MAX_LEVEL, MAX_POOL_DICE, PENALTY_POOL_DICE};
use ficha_rules::{
    CombatState, DieSize, GuardPoints, Modifier, ModifierCategory, PoolDie, ProgressionSnapshot,
    ResourceDie, RewardChoices, RollLog, RollStreams, RulesError, Track, VitalityPoints,
    apply_damage, assess, combat_state, damage_vitality, dice_modifier, effective_guard_max,
    heal_guard, heal_vitality, recover_vitality_at, resolve_pool_with, resolve_use, step_up,
};

use super::{ScenarioCtx, TestScenario};

const SWEEP_SIZE: usize = 250;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke",
            "One pool, one hit, one usage roll and one level preview",
            smoke,
        ),
        TestScenario::new(
            "pool-bounds",
            "Dice Pool Bounds",
            "Random pool requests never roll zero dice or exceed the cap",
            pool_bounds,
        ),
        TestScenario::new(
            "pool-determinism",
            "Deterministic Pools",
            "Equal seeds replay identical pool results",
            pool_determinism,
        ),
        TestScenario::new(
            "damage-conservation",
            "Damage Conservation",
            "Damage splits across buffer, Guard and Vitality without loss",
            damage_conservation,
        ),
        TestScenario::new(
            "guard-ceiling",
            "Guard Ceiling",
            "Guard stays under the Vitality-derived ceiling through random wounds",
            guard_ceiling,
        ),
        TestScenario::new(
            "usage-depletion",
            "Usage Depletion",
            "Resource dice step down one size per use until depleted",
            usage_depletion,
        ),
        TestScenario::new(
            "recovery-exchange",
            "Recovery Exchange",
            "Recovery points convert to Vitality at the configured rate",
            recovery_exchange,
        ),
        TestScenario::new(
            "level-progression",
            "Level Progression",
            "Characters climb every track from level 1 to the cap",
            level_progression,
        ),
    ]
}

fn inputs(ctx: &ScenarioCtx) -> SmallRng {
    SmallRng::seed_from_u64(ctx.seed)
}

fn smoke(ctx: &mut ScenarioCtx) -> Result<()> {
    ctx.config.validate().context("rules configuration is invalid")?;

    let mut log = RollLog::new(format!("smoke-{}", ctx.seed));
    let pool = resolve_pool_with(&ctx.config.pool, 3, PoolDie::D6, 0, "Smoke", ctx.streams.pool());
    ensure!(pool.dice_rolled() == 3, "expected 3 dice, rolled {}", pool.dice_rolled());
    if ctx.verbose {
        println!("    {pool}");
    }
    log.record(pool);
    ensure!(log.len() == 1, "roll log lost an entry");

    let guard = GuardPoints::new(10, 20);
    let vitality = VitalityPoints::new(3, 5);
    let hit = apply_damage(&guard, &vitality, 15);
    ensure!(
        combat_state(&hit.vitality) == CombatState::CriticalWound,
        "15 damage against 10 Guard and 3 Vitality must be critical"
    );

    let torch = ResourceDie::new("torch", "Torch", DieSize::D4, DieSize::D8);
    let used = torch.roll_use(ctx.streams.usage())?;
    ensure!(
        used.is_depleted || used.new_die == Some(DieSize::D6),
        "d8 torch should step to d6 or deplete, got {:?}",
        used.new_die
    );

    let gains = ctx
        .config
        .progression
        .preview(&ProgressionSnapshot::starting(12, 4), Track::Vanguard);
    ensure!(gains.to_level == 2, "preview should target level 2");
    Ok(())
}

fn pool_bounds(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut rng = inputs(ctx);
    let max_dice = usize::from(ctx.config.pool.max_dice.clamp(1, MAX_POOL_DICE));
    let penalty_dice = usize::from(PENALTY_POOL_DICE);

    for _ in 0..SWEEP_SIZE {
        let count = rng.gen_range(-4..=12);
        let mods = vec![
            Modifier::new("Blessing", ModifierCategory::DiceCount, rng.gen_range(-3..=3)),
            Modifier::new("Armor", ModifierCategory::GuardMax, rng.gen_range(0..=4)),
        ];
        let modifier = dice_modifier(&mods);
        let die = PoolDie::ALL[rng.gen_range(0..PoolDie::ALL.len())];
        let result = resolve_pool_with(
            &ctx.config.pool,
            count,
            die,
            modifier,
            "Sweep",
            ctx.streams.pool(),
        );

        let rolled = result.dice_rolled();
        ensure!(rolled > 0, "zero-dice roll for {count}{modifier:+}");
        if result.penalty {
            ensure!(
                rolled == penalty_dice && result.kept_faces().count() == 1,
                "penalty roll must keep one of {penalty_dice} dice: {result}"
            );
        } else {
            ensure!(rolled <= max_dice, "pool exceeded cap: {result}");
        }
        ensure!(
            result.net_successes == result.successes.saturating_sub(result.cancellations),
            "net successes miscounted: {result}"
        );
        ensure!(
            result.faces.iter().all(|f| (1..=die.sides()).contains(&f.value)),
            "face out of range for {die:?}: {result}"
        );
    }
    Ok(())
}

fn pool_determinism(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut replay = RollStreams::from_user_seed(ctx.seed);
    for count in 0..=8 {
        let pool = ctx.config.pool;
        let first = resolve_pool_with(&pool, count, PoolDie::D10, 0, "", ctx.streams.pool());
        let second = resolve_pool_with(&pool, count, PoolDie::D10, 0, "", replay.pool());
        ensure!(first == second, "seed {} diverged at count {count}", ctx.seed);
    }
    ensure!(
        ctx.streams.total_draws() == replay.total_draws(),
        "draw counters diverged"
    );
    Ok(())
}

fn damage_conservation(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut rng = inputs(ctx);
    for _ in 0..SWEEP_SIZE {
        let guard_max = rng.gen_range(0..=40);
        let vitality_max = rng.gen_range(0..=12);
        let vitality = VitalityPoints::new(rng.gen_range(0..=vitality_max), vitality_max);
        let ceiling = effective_guard_max(guard_max, vitality.current);
        let mut guard = GuardPoints::new(rng.gen_range(0..=ceiling), guard_max);
        if rng.gen_bool(0.3) {
            guard = guard.with_temporary(rng.gen_range(1..=6));
        }
        let amount = rng.gen_range(0..=60);

        let outcome = apply_damage(&guard, &vitality, amount);
        ensure!(
            outcome.absorbed() + outcome.unabsorbed == amount,
            "{amount} damage split into {} absorbed and {} unabsorbed",
            outcome.absorbed(),
            outcome.unabsorbed
        );
        if outcome.unabsorbed > 0 {
            ensure!(
                outcome.guard.current == 0 && outcome.vitality.current == 0,
                "damage left over while pools remain"
            );
        }
        if outcome.absorbed_by_guard > 0 {
            ensure!(
                outcome.absorbed_by_temporary == guard.temporary.unwrap_or(0),
                "Guard took damage before the buffer was spent"
            );
        }
        let status = assess(&outcome.guard, &outcome.vitality);
        ensure!(
            outcome.guard.current <= status.effective_guard_max,
            "Guard {} above ceiling {}",
            outcome.guard.current,
            status.effective_guard_max
        );
    }
    Ok(())
}

fn guard_ceiling(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut rng = inputs(ctx);
    let mut guard = GuardPoints::new(30, 30);
    let mut vitality = VitalityPoints::new(10, 10);

    for _ in 0..SWEEP_SIZE {
        let amount = rng.gen_range(0..=6);
        match rng.gen_range(0..4) {
            0 => {
                let update = damage_vitality(&guard, &vitality, amount);
                (guard, vitality) = (update.guard, update.vitality);
            }
            1 => {
                let update = heal_vitality(&guard, &vitality, amount);
                (guard, vitality) = (update.guard, update.vitality);
            }
            2 => {
                let outcome = apply_damage(&guard, &vitality, amount);
                (guard, vitality) = (outcome.guard, outcome.vitality);
            }
            _ => guard = heal_guard(&guard, &vitality, amount),
        }

        let expected = if vitality.current <= 1 { 15 } else { 30 };
        let status = assess(&guard, &vitality);
        ensure!(
            status.effective_guard_max == expected,
            "ceiling {} with Vitality {}",
            status.effective_guard_max,
            vitality.current
        );
        ensure!(guard.current <= expected, "Guard {} over {expected}", guard.current);
        ensure!(
            (status.state == CombatState::CriticalWound) == (vitality.current == 0),
            "critical state disagrees with Vitality {}",
            vitality.current
        );
    }
    Ok(())
}

fn usage_depletion(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut resource = ResourceDie::new("rations", "Rations", DieSize::D2, DieSize::D12);
    let mut uses = 0usize;

    while let Some(die) = resource.current {
        let outcome = resource.roll_use(ctx.streams.usage())?;
        uses += 1;
        ensure!(
            outcome.is_depleted != outcome.is_stepped_down,
            "outcome must either deplete or step down"
        );
        if let Some(next) = outcome.new_die {
            ensure!(
                die.step_down() == Some(next),
                "{die} stepped to {next} instead of one size down"
            );
        }
        resource = resource.with_outcome(&outcome);
    }
    ensure!(
        uses <= DieSize::SCALE.len(),
        "took {uses} uses to deplete a d12"
    );

    match resolve_use(&resource, 1) {
        Err(RulesError::ResourceDepleted { .. }) => {}
        other => anyhow::bail!("depleted resource accepted a use: {other:?}"),
    }
    ensure!(
        step_up(resource.current, resource.min, resource.max) == resource.min,
        "restoring a depleted die must land on its minimum"
    );
    Ok(())
}

fn recovery_exchange(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut rng = inputs(ctx);
    let rate = ctx.config.recovery.points_per_vitality;

    for _ in 0..SWEEP_SIZE {
        let vitality_max = rng.gen_range(1..=12);
        let vitality = VitalityPoints::new(rng.gen_range(0..=vitality_max), vitality_max);
        let guard = GuardPoints::new(rng.gen_range(0..=30), 30);
        let points = rng.gen_range(0..=40);

        match recover_vitality_at(&guard, &vitality, points, rate) {
            Ok(outcome) => {
                ensure!(points >= rate, "{points} points bought Vitality below rate {rate}");
                ensure!(
                    outcome.vitality_gained <= points / rate,
                    "gained {} from {points} points",
                    outcome.vitality_gained
                );
                ensure!(outcome.vitality_gained > 0, "{points} points bought nothing");
                ensure!(
                    outcome.points_spent == outcome.vitality_gained * rate,
                    "charged {} points for {} Vitality",
                    outcome.points_spent,
                    outcome.vitality_gained
                );
                ensure!(
                    outcome.points_spent + outcome.points_discarded == points,
                    "recovery points were lost"
                );
                ensure!(
                    outcome.vitality.current <= outcome.vitality.max,
                    "Vitality over maximum"
                );
            }
            Err(RulesError::RecoveryBelowRate { .. }) => {
                ensure!(points < rate, "{points} points rejected at rate {rate}");
            }
            Err(RulesError::VitalityFull { .. }) => {
                ensure!(
                    vitality.current == vitality.max,
                    "recovery refused at Vitality {}/{}",
                    vitality.current,
                    vitality.max
                );
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(())
}

fn level_progression(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut rng = inputs(ctx);
    let table = &ctx.config.progression;
    let mut snapshot = ProgressionSnapshot::starting(12, 4);
    let choices = RewardChoices::default()
        .with(ficha_rules::RewardKind::Trait, "Keen Eye")
        .with(ficha_rules::RewardKind::Competence, "Survival")
        .with(ficha_rules::RewardKind::PowerOrTalent, "Second Wind");

    while snapshot.level < table.max_level() {
        let track = Track::ALL[rng.gen_range(0..Track::ALL.len())];
        let required = table
            .threshold_for(snapshot.level)
            .context("threshold missing below the cap")?;

        snapshot.experience = required.saturating_sub(1);
        match table.commit(&snapshot, track, &choices) {
            Err(RulesError::InsufficientExperience { .. }) => {}
            other => anyhow::bail!("level-up one point short was not rejected: {other:?}"),
        }

        snapshot.experience = required + rng.gen_range(0..50);
        let commit = table.commit(&snapshot, track, &choices)?;
        ensure!(
            commit.snapshot.vitality_max == commit.snapshot.guard_max / 3,
            "Vitality max drifted from Guard max at level {}",
            commit.snapshot.level
        );
        ensure!(
            commit.snapshot.experience == snapshot.experience - required,
            "experience carry-over mismatch"
        );
        ensure!(
            commit.rewards.len() == commit.gains.rewards.required().count(),
            "granted rewards disagree with flags"
        );
        if ctx.verbose {
            println!(
                "    level {} -> {} via {track} (+{} Guard)",
                commit.gains.from_level, commit.gains.to_level, commit.gains.guard_gain
            );
        }
        snapshot = commit.snapshot;
    }

    ensure!(snapshot.level == MAX_LEVEL.min(table.max_level()), "stopped below cap");
    match table.commit(&snapshot, Track::Adept, &choices) {
        Err(RulesError::MaxLevelReached { .. }) => Ok(()),
        other => anyhow::bail!("level-up past the cap was not rejected: {other:?}"),
    }
}

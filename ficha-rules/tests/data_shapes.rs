use ficha_rules::{
    DieSize, GuardPoints, Modifier, ModifierCategory, PoolDie, ProgressionSnapshot, ResourceDie,
    RollLog, RulesConfig, ScriptedRoller, Track, preview_level_up, resolve_pool,
};
use serde_json::{Value, json};

#[test]
fn resource_die_serializes_with_lowercase_sizes() {
    let resource = ResourceDie::new("torch", "Torch", DieSize::D4, DieSize::D8);
    let value = serde_json::to_value(&resource).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "torch",
            "name": "Torch",
            "current": "d8",
            "min": "d4",
            "max": "d8"
        })
    );

    let depleted: ResourceDie = serde_json::from_value(json!({
        "id": "oil",
        "name": "Lamp oil",
        "current": null,
        "min": "d2",
        "max": "d6"
    }))
    .unwrap();
    assert!(depleted.is_depleted());
}

#[test]
fn guard_record_defaults_optional_fields() {
    let guard: GuardPoints =
        serde_json::from_value(json!({ "current": 7, "base_max": 10 })).unwrap();
    assert!(guard.modifiers.is_empty());
    assert_eq!(guard.temporary, None);

    let with_mods = guard.with_modifiers(vec![Modifier::new(
        "Ring",
        ModifierCategory::GuardMax,
        2,
    )]);
    let value = serde_json::to_value(&with_mods).unwrap();
    assert_eq!(value["modifiers"][0]["category"], Value::from("guard_max"));
}

#[test]
fn roll_log_roundtrips_pool_results() {
    let mut roller = ScriptedRoller::new([8, 1, 5]);
    let mut log = RollLog::new("table-night");
    log.record(resolve_pool(3, PoolDie::D8, 0, "Lockpicking", &mut roller));

    let text = serde_json::to_string(&log).unwrap();
    let restored: RollLog = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, log);
    assert_eq!(restored.entries()[0].faces[1].kind, ficha_rules::FaceKind::Cancellation);
}

#[test]
fn level_up_preview_exposes_reward_flags() {
    let gains = preview_level_up(&ProgressionSnapshot::starting(12, 4), Track::Specialist);
    let value = serde_json::to_value(&gains).unwrap();
    assert_eq!(value["track"], Value::from("specialist"));
    assert_eq!(value["rewards"]["competence"], Value::from(true));
    assert_eq!(value["to_level"], Value::from(2));
}

#[test]
fn rules_config_accepts_custom_progression() {
    let mut cfg = RulesConfig::default_config();
    cfg.progression.class_unlock_level = 3;
    let text = serde_json::to_string(&cfg).unwrap();
    let parsed = RulesConfig::from_json(&text).unwrap();
    assert_eq!(parsed.progression.class_unlock_level, 3);
    assert_eq!(parsed.validate(), Ok(()));
}

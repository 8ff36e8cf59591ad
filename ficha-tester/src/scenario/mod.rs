use anyhow::Result;
use ficha_rules::{RollStreams, RulesConfig};

pub mod catalog;

use catalog::catalog_scenarios;

/// Everything one scenario iteration may touch.
pub struct ScenarioCtx {
    pub seed: u64,
    pub streams: RollStreams,
    pub config: RulesConfig,
    pub verbose: bool,
}

impl ScenarioCtx {
    #[must_use]
    pub fn new(seed: u64, config: RulesConfig, verbose: bool) -> Self {
        Self {
            seed,
            streams: RollStreams::from_user_seed(seed),
            config,
            verbose,
        }
    }
}

pub type ScenarioCheck = fn(&mut ScenarioCtx) -> Result<()>;

#[derive(Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    check: ScenarioCheck,
}

impl TestScenario {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        check: ScenarioCheck,
    ) -> Self {
        Self {
            key,
            name,
            description,
            check,
        }
    }

    pub fn run(&self, ctx: &mut ScenarioCtx) -> Result<()> {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for TestScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestScenario")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let wanted = name.to_lowercase();
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == wanted)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn all_scenario_keys() -> Vec<String> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| scenario.key.to_string())
        .collect()
}

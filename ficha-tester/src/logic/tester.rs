use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use ficha_rules::RulesConfig;

use crate::scenario::{ScenarioCtx, TestScenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Dice drawn across every iteration.
    pub total_draws: u64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    config: RulesConfig,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(config: RulesConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {})",
                    scenario.name.bright_white(),
                    seed
                );
            }

            let result = self.run_single_scenario(scenario, seed, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::with_capacity(iterations);
        let mut total_draws = 0u64;

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(i as u64);
            let mut ctx = ScenarioCtx::new(iteration_seed, self.config.clone(), self.verbose);
            let start_time = Instant::now();
            let outcome = scenario.run(&mut ctx);
            let duration = start_time.elapsed();
            total_draws = total_draws.saturating_add(ctx.streams.total_draws());

            match outcome {
                Ok(()) => {
                    successes += 1;
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) draws:{}",
                            i + 1,
                            iterations,
                            ctx.streams.total_draws()
                        );
                    }
                }
                Err(err) => {
                    let message = format!("iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    log::warn!("{} {message}", scenario.key);
                    if self.verbose {
                        println!("  ❌ {}", message.red());
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            total_draws,
            average_duration,
            performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::get_scenario;

    #[test]
    fn runs_each_seed_and_counts_iterations() {
        let tester = LogicTester::new(RulesConfig::default_config(), false);
        let scenario = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
        assert!(results.iter().all(|r| r.successful_iterations == 3));
        assert!(results.iter().all(|r| r.total_draws > 0));
    }

    #[test]
    fn broken_config_surfaces_as_failures() {
        let mut config = RulesConfig::default_config();
        config.recovery.points_per_vitality = 0;
        let tester = LogicTester::new(config, false);
        let scenario = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[7], 2);
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 2);
        assert!(results[0].failures[0].contains("seed 7"));
    }

    #[test]
    fn result_serializes_durations_as_micros() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            total_draws: 4,
            average_duration: Duration::from_micros(250),
            performance_data: vec![Duration::from_micros(250)],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], serde_json::json!(250));
        let back: ScenarioResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.performance_data, result.performance_data);
    }
}

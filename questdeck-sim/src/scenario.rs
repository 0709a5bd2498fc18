//! Scenario catalog: named action mixes the simulation driver samples from.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative weights for the driver's action choices. Zero disables an
/// action entirely.
#[derive(Debug, Clone, Copy)]
pub struct ActionMix {
    pub swipe: u32,
    pub complete: u32,
    pub advance: u32,
    pub checkin: u32,
    pub redeem: u32,
    pub reset: u32,
}

impl ActionMix {
    pub const fn total(&self) -> u32 {
        self.swipe + self.complete + self.advance + self.checkin + self.redeem + self.reset
    }
}

/// One runnable scenario: a mix plus how long to run it.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub steps: usize,
    pub mix: ActionMix,
}

/// All scenarios the harness knows about.
pub fn catalog() -> Vec<TestScenario> {
    vec![
        TestScenario {
            name: "smoke",
            description: "Short mixed walk touching every operation once over",
            steps: 60,
            mix: ActionMix {
                swipe: 3,
                complete: 3,
                advance: 2,
                checkin: 1,
                redeem: 1,
                reset: 1,
            },
        },
        TestScenario {
            name: "swipe-storm",
            description: "Hammers swipe-reject to exercise budget gating and the dismissal ledger",
            steps: 200,
            mix: ActionMix {
                swipe: 8,
                complete: 0,
                advance: 0,
                checkin: 0,
                redeem: 0,
                reset: 1,
            },
        },
        TestScenario {
            name: "completionist",
            description: "Completes and advances aggressively until pools run dry",
            steps: 300,
            mix: ActionMix {
                swipe: 1,
                complete: 5,
                advance: 4,
                checkin: 1,
                redeem: 2,
                reset: 0,
            },
        },
        TestScenario {
            name: "churn",
            description: "Frequent resets interleaved with everything else, plus reload checks",
            steps: 250,
            mix: ActionMix {
                swipe: 3,
                complete: 3,
                advance: 2,
                checkin: 1,
                redeem: 1,
                reset: 3,
            },
        },
    ]
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    catalog().into_iter().find(|s| s.name == name)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog().iter().map(|s| (s.name, s.description)).collect()
}

/// Outcome of one scenario over one seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub steps_executed: usize,
    pub swipes: usize,
    pub completions: usize,
    pub advances: usize,
    pub redemptions: usize,
    pub resets: usize,
    pub exhausted_draws: usize,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs_f64(f64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique_and_resolvable() {
        let names: Vec<_> = catalog().iter().map(|s| s.name).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());

        assert!(get_scenario("smoke").is_some());
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn every_mix_has_weight() {
        for scenario in catalog() {
            assert!(scenario.mix.total() > 0, "{} has no actions", scenario.name);
            assert!(scenario.steps > 0);
        }
    }
}

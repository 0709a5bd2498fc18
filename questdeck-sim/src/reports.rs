//! Report rendering for scenario results: console summary or JSON.

use colored::Colorize;
use std::time::Duration;

use crate::scenario::ScenarioResult;

pub fn generate_console_report(results: &[ScenarioResult], total_duration: Duration) {
    println!();
    println!("{}", "Simulation Results".bright_cyan().bold());
    println!("{}", "==================".cyan());

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    println!("Total runs: {total}");
    println!("Passed: {}", passed.to_string().green());
    println!("Failed: {}", failed.to_string().red());
    println!("Total time: {total_duration:?}");
    println!();

    for result in results {
        let status = if result.passed {
            "PASS".green()
        } else {
            "FAIL".red()
        };
        println!(
            "{status} {} (seed {})",
            result.scenario_name.bold(),
            result.seed
        );
        println!(
            "   Iterations: {}/{} successful, avg {:?}",
            result.successful_iterations, result.iterations_run, result.average_duration
        );
        println!(
            "   Steps: {} (swipes {}, completions {}, advances {}, redemptions {}, resets {})",
            result.steps_executed,
            result.swipes,
            result.completions,
            result.advances,
            result.redemptions,
            result.resets
        );
        if result.exhausted_draws > 0 {
            println!(
                "   {} exhausted draws (fallback engaged)",
                result.exhausted_draws.to_string().yellow()
            );
        }
        for failure in &result.failures {
            println!("   {} {failure}", "!".red());
        }
    }
}

pub fn generate_json_report(results: &[ScenarioResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

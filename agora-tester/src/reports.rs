//! Report rendering for sweep results.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::scenarios::RunRecord;

/// Aggregate view over a whole sweep.
#[derive(Debug, Serialize)]
pub struct SweepSummary<'a> {
    pub runs: &'a [RunRecord],
    pub total_checks: usize,
    pub failed_checks: usize,
}

impl<'a> SweepSummary<'a> {
    #[must_use]
    pub fn new(runs: &'a [RunRecord]) -> Self {
        let total_checks = runs.iter().map(|run| run.checks.len()).sum();
        let failed_checks = runs
            .iter()
            .flat_map(|run| &run.checks)
            .filter(|check| !check.passed)
            .count();
        Self {
            runs,
            total_checks,
            failed_checks,
        }
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed_checks == 0
    }
}

/// Print a colored console report.
pub fn print_console(summary: &SweepSummary<'_>) {
    for run in summary.runs {
        let header = format!("{} (seed {})", run.sim, run.seed);
        if run.passed() {
            println!("{} {}", "PASS".green().bold(), header);
        } else {
            println!("{} {}", "FAIL".red().bold(), header);
        }
        for check in &run.checks {
            let mark = if check.passed {
                "ok".green()
            } else {
                "failed".red()
            };
            println!("  {:<36} {} - {}", check.name, mark, check.detail.dimmed());
        }
    }
    let verdict = if summary.all_passed() {
        format!("{} checks passed", summary.total_checks)
            .green()
            .to_string()
    } else {
        format!(
            "{} of {} checks failed",
            summary.failed_checks, summary.total_checks
        )
        .red()
        .to_string()
    };
    println!("\n{verdict}");
}

/// Print the sweep as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json(summary: &SweepSummary<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::run_simulation;
    use agora_game::SimulationKind;

    #[test]
    fn summary_counts_checks() {
        let runs = vec![
            run_simulation(SimulationKind::Lexicon, 1, 10),
            run_simulation(SimulationKind::Narrative, 1, 10),
        ];
        let summary = SweepSummary::new(&runs);
        assert_eq!(
            summary.total_checks,
            runs.iter().map(|run| run.checks.len()).sum::<usize>()
        );
        assert!(summary.all_passed());
    }
}

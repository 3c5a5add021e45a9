mod reports;
mod scenarios;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;

use agora_game::{ALL_SIMULATIONS, SimulationKind};
use reports::{SweepSummary, print_console, print_json};
use scenarios::run_simulation;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable colored console output
    Console,
    /// Pretty-printed JSON for tooling
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "agora-tester", version)]
#[command(about = "Automated QA sweeps for the Agora simulations - pure logic, no browser")]
struct Args {
    /// Simulations to run (comma-separated names, or "all")
    #[arg(long, default_value = "all")]
    sims: String,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Logical 100ms frames to advance per run
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// List available simulations and exit
    #[arg(long)]
    list_sims: bool,
}

fn parse_sims(spec: &str) -> Result<Vec<SimulationKind>> {
    if spec.trim() == "all" {
        return Ok(ALL_SIMULATIONS.to_vec());
    }
    spec.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<SimulationKind>()
                .map_err(|()| anyhow::anyhow!("unknown simulation {name:?}"))
        })
        .collect()
}

fn parse_seeds(spec: &str) -> Result<Vec<u64>> {
    spec.split(',')
        .map(str::trim)
        .filter(|seed| !seed.is_empty())
        .map(|seed| {
            seed.parse::<u64>()
                .with_context(|| format!("invalid seed {seed:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_sims {
        for kind in ALL_SIMULATIONS {
            println!("{:<12} {}", kind.as_str(), kind.describe());
        }
        return Ok(());
    }

    let sims = parse_sims(&args.sims)?;
    let seeds = parse_seeds(&args.seeds)?;
    if seeds.is_empty() {
        bail!("at least one seed is required");
    }

    let mut runs = Vec::with_capacity(sims.len() * seeds.len());
    for kind in &sims {
        for seed in &seeds {
            runs.push(run_simulation(*kind, *seed, args.frames));
        }
    }
    info!("completed {} runs", runs.len());

    let summary = SweepSummary::new(&runs);
    match args.report {
        ReportFormat::Console => print_console(&summary),
        ReportFormat::Json => print_json(&summary)?,
    }

    if !summary.all_passed() {
        bail!("{} checks failed", summary.failed_checks);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_spec_parses_names_and_all() {
        assert_eq!(parse_sims("all").unwrap(), ALL_SIMULATIONS.to_vec());
        assert_eq!(
            parse_sims("commons, spread").unwrap(),
            vec![SimulationKind::Commons, SimulationKind::Spread]
        );
        assert!(parse_sims("bogus").is_err());
    }

    #[test]
    fn seed_spec_parses_numbers() {
        assert_eq!(parse_seeds("1337,42").unwrap(), vec![1337, 42]);
        assert!(parse_seeds("not-a-seed").is_err());
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

use fleet_core::PlanConfig;
use fleetsizer_catalog::{AwsNodeSource, NodeSource};
use fleetsizer_dsl::{expand, parse};
use fleetsizer_search::{filter_machines, find_cheapest_fleet, Recommendation};
use fleetsizer_sim::Simulator;

const USAGE: &str = "USAGE: fleetsizer <YAML_CONFIG_PATH>";

#[derive(Parser)]
#[command(
    name = "fleetsizer",
    about = "Find the cheapest homogeneous fleet for a declarative workload",
    version,
)]
struct Cli {
    /// Path to the YAML planning config
    config: PathBuf,
}

/// Distinguished outcomes of a completed run. Not finding a fleet is a
/// result, not an error: the process still exits zero.
enum Verdict {
    Fleet(Recommendation),
    NoMachines,
    NoConvergence,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if err.kind() == ErrorKind::DisplayHelp
                || err.kind() == ErrorKind::DisplayVersion =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    match run(&cli.config) {
        Ok(Verdict::Fleet(fleet)) => {
            println!("Instance type: {}", fleet.instance_type);
            println!("Node count: {}", fleet.node_count);
            println!("Total Price per Month: USD ${:.2}", fleet.monthly_price_usd);
            ExitCode::SUCCESS
        }
        Ok(Verdict::NoMachines) => {
            println!("[!] No machine types are available for simulation.");
            ExitCode::SUCCESS
        }
        Ok(Verdict::NoConvergence) => {
            println!("[!] Could not converge to a solution.");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("[!] {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run(config_path: &Path) -> anyhow::Result<Verdict> {
    let config = PlanConfig::from_file(config_path)?;

    // Workload DSL: report the complete diagnostic set, then stop.
    let (expr, parse_errors) = parse(&config.pods);
    if !parse_errors.is_empty() {
        for error in &parse_errors {
            eprintln!("[!] Parse error: {error}");
        }
        anyhow::bail!("workload has {} parse error(s)", parse_errors.len());
    }
    let expr = expr.ok_or_else(|| anyhow::anyhow!("workload is empty"))?;

    let (units, expand_errors) = expand(&expr);
    if !expand_errors.is_empty() {
        for error in &expand_errors {
            eprintln!("[!] Workload error: {error}");
        }
        anyhow::bail!("workload has {} materialization error(s)", expand_errors.len());
    }
    info!(units = units.len(), "workload materialized");

    let source = AwsNodeSource::new(
        &config.nodes.aws.region,
        dedupe(config.nodes.aws.instance_types),
    );
    let machines = source.fetch()?;

    let survivors = filter_machines(machines, &units);
    if survivors.is_empty() {
        return Ok(Verdict::NoMachines);
    }

    match find_cheapest_fleet(&survivors, &units, &Simulator::new()) {
        Some(fleet) => Ok(Verdict::Fleet(fleet)),
        None => Ok(Verdict::NoConvergence),
    }
}

/// Config order is a preference list; repeated names are ignored.
fn dedupe(instance_types: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    instance_types
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

mod fixtures;
mod reports;
mod scenarios;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use reports::{ScenarioResult, write_console, write_json};
use scenarios::{ScenarioCtx, list_scenarios, run_scenario};

#[derive(Debug, Parser)]
#[command(name = "farshore-tester", version)]
#[command(about = "Automated QA sweeps for the Farshore voyage planning engine")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per randomized scenario
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        println!("Available scenarios:");
        for (key, description) in list_scenarios() {
            println!("  {key:20} - {description}");
        }
        return Ok(());
    }

    println!("{}", "Farshore Automated Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());

    let start = Instant::now();
    let scenario_names = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let mut results = Vec::new();
    for name in &scenario_names {
        for &seed in &seeds {
            let ctx = ScenarioCtx {
                seed,
                iterations: args.iterations,
                verbose: args.verbose,
            };
            let scenario_start = Instant::now();
            let outcome = run_scenario(name, &ctx);
            results.push(ScenarioResult {
                scenario: name.clone(),
                seed,
                passed: outcome.is_ok(),
                failure: outcome.err().map(|error| format!("{error:#}")),
                duration_ms: scenario_start.elapsed().as_millis(),
            });
        }
    }

    write_report(&args, &results, start)?;

    if results.iter().any(|result| !result.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn expand_scenarios(arg: &str) -> Vec<String> {
    let requested: Vec<String> = arg
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if requested.iter().any(|name| name == "all") {
        list_scenarios()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect()
    } else {
        requested
    }
}

fn parse_seeds(arg: &str) -> Result<Vec<u64>> {
    arg.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

fn write_report(args: &Args, results: &[ScenarioResult], start: Instant) -> Result<()> {
    let elapsed = start.elapsed();
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(stdout().lock()),
    };
    match args.report.as_str() {
        "json" => write_json(&mut writer, results, elapsed)?,
        _ => write_console(&mut writer, results, elapsed)?,
    }
    writer.flush()?;
    Ok(())
}

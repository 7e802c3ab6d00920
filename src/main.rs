use anyhow::Result;
use clap::Parser;
use image_resizer_rs::{Cli, Config, RunReport, run_batch};
use tracing_subscriber::EnvFilter;

const EXIT_FATAL: i32 = 1;
const EXIT_CONFIG: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err:#}");
        std::process::exit(EXIT_FATAL);
    }
}

fn run(config: &Config) -> Result<()> {
    let report = run_batch(config)?;
    print_report(&report, config.json_report)?;
    Ok(())
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print!("{}", report.summary());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

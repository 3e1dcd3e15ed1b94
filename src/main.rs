mod collection;
mod json_body;
mod placeholder;
mod python;
mod slug;
mod synth;
mod walker;
mod writer;

use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, Command};
use std::env;
use std::io::Write;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "generated_code";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = build_cli().get_matches();
    setup_logging(matches.get_flag("debug"))?;
    let config = load_config(&matches)?;

    for line in generate(&config)? {
        write_stdout_line(&line)?;
    }
    Ok(())
}

/// Loads, plans and (unless dry-running) writes; returns the lines to print.
fn generate(config: &Config) -> Result<Vec<String>> {
    let collection = collection::load_collection(&config.collection)?;
    let plan = walker::plan_collection(&collection, &config.output);

    if config.dry_run {
        return Ok(plan.describe());
    }

    let summary = writer::write_plan(&plan)?;
    log::info!(
        "wrote {} modules in {} packages",
        summary.modules,
        summary.packages
    );
    Ok(vec![format!("Code generated at: {}", plan.base.display())])
}

struct Config {
    collection: PathBuf,
    output: PathBuf,
    dry_run: bool,
}

fn load_config(matches: &clap::ArgMatches) -> Result<Config> {
    let collection = matches
        .get_one::<String>("collection")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("collection required"))?;

    let output = matches
        .get_one::<String>("output")
        .cloned()
        .or_else(|| env::var("POSTMAN2PY_OUTPUT").ok())
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    Ok(Config {
        collection,
        output: PathBuf::from(output),
        dry_run: matches.get_flag("dry_run"),
    })
}

fn setup_logging(debug: bool) -> Result<()> {
    if debug {
        env_logger::Builder::from_env("RUST_LOG")
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env("RUST_LOG")
            .filter_level(log::LevelFilter::Warn)
            .init();
    }
    Ok(())
}

fn build_cli() -> Command {
    Command::new("postman2py")
        .about("Convert a Postman collection into Python request functions")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("collection")
                .required(true)
                .value_name("FILE")
                .help("Path to Postman collection JSON file"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("DIR")
                .help("Output directory (env: POSTMAN2PY_OUTPUT, default: generated_code)"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("List the files that would be written; delete and write nothing"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

fn write_stdout_line(value: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if let Err(err) = out.write_all(value.as_bytes()) {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        return Err(err.into());
    }
    if let Err(err) = out.write_all(b"\n") {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        return Err(err.into());
    }
    Ok(())
}

//! capplan CLI - Capacity Planning Engine
//!
//! Command-line interface for checking a project portfolio against resource
//! capacity, generating remediation options, scheduling resource-driven
//! projects and forecasting demand.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use capplan_solver::{scheduling, ResolutionEngine, RoleFilter};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod input;
mod report;

use input::{load_profile, ScenarioFile};
use report::{write_json, ExitCode, OutputFormat, TextReport};

#[derive(Parser)]
#[command(name = "capplan")]
#[command(author, version, about = "Resource capacity planning engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Planning profile (TOML); built-in heuristics when omitted
    #[arg(long, env = "CAPPLAN_PROFILE", value_name = "FILE", global = true)]
    profile: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); the horizon starts at its month
    #[arg(long, env = "CAPPLAN_AS_OF", value_name = "DATE", global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the first capacity conflict; exits 1 if there is one
    Check {
        /// Scenario file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Report the first conflict and its TIME, CAPACITY and PRIORITY options
    Resolve {
        /// Scenario file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compute end dates of resource-driven projects
    Schedule {
        /// Scenario file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Monthly demand against capacity, plus overloaded roles
    Forecast {
        /// Scenario file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Role to forecast, or "All"
        #[arg(short, long, default_value = "All")]
        role: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let profile = load_profile(cli.profile.as_deref())?;
    let engine = ResolutionEngine::new(profile);
    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    tracing::debug!(%as_of, "reference date");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Commands::Check { file } => cmd_check(&engine, &file, as_of, cli.format, &mut out)?,
        Commands::Resolve { file } => cmd_resolve(&engine, &file, as_of, cli.format, &mut out)?,
        Commands::Schedule { file } => cmd_schedule(&engine, &file, cli.format, &mut out)?,
        Commands::Forecast { file, role } => {
            cmd_forecast(&engine, &file, as_of, &role, cli.format, &mut out)?
        }
    };

    out.flush().context("failed to flush output")?;
    Ok(code.into())
}

fn cmd_check(
    engine: &ResolutionEngine,
    file: &Path,
    as_of: NaiveDate,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let scenario = ScenarioFile::load(file)?.current(engine);
    let (_, analysis) = engine.analyze(scenario, as_of);

    match format {
        OutputFormat::Text => TextReport::new(&mut *out)
            .conflict(analysis.conflict.as_ref(), engine.profile().horizon_months)?,
        OutputFormat::Json => write_json(out, &json!({ "conflict": analysis.conflict }))?,
    }
    Ok(ExitCode::from_conflict(analysis.conflict.as_ref()))
}

fn cmd_resolve(
    engine: &ResolutionEngine,
    file: &Path,
    as_of: NaiveDate,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let scenario = ScenarioFile::load(file)?.current(engine);
    let (_, analysis) = engine.analyze(scenario, as_of);

    match format {
        OutputFormat::Text => {
            TextReport::new(&mut *out).analysis(&analysis, engine.profile().horizon_months)?;
        }
        OutputFormat::Json => write_json(
            out,
            &json!({
                "conflict": analysis.conflict,
                "solutions": analysis.solutions,
            }),
        )?,
    }
    Ok(ExitCode::Success)
}

fn cmd_schedule(
    engine: &ResolutionEngine,
    file: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let scenario = ScenarioFile::load(file)?.current(engine).without_paused();
    let (fixed, flexible) = scheduling::partition_resource_driven(&scenario.projects);
    let schedules = engine.schedule_flexible(&fixed, &flexible, &scenario.resources);

    match format {
        OutputFormat::Text => TextReport::new(&mut *out).schedules(&schedules)?,
        OutputFormat::Json => write_json(out, &schedules)?,
    }
    Ok(ExitCode::Success)
}

fn cmd_forecast(
    engine: &ResolutionEngine,
    file: &Path,
    as_of: NaiveDate,
    role: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let scenario = ScenarioFile::load(file)?.current(engine);
    let (current, _) = engine.analyze(scenario, as_of);

    let filter = RoleFilter::parse(role);
    let loads = engine.forecast(&current.projects, &current.resources, as_of, &filter);
    let overloads = engine.overload_report(&current.projects, &current.resources, as_of);

    match format {
        OutputFormat::Text => TextReport::new(&mut *out).forecast(role, &loads, &overloads)?,
        OutputFormat::Json => write_json(
            out,
            &json!({
                "role": role,
                "months": loads,
                "overloads": overloads,
            }),
        )?,
    }
    Ok(ExitCode::Success)
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches the published vaccination time-series
//! - reduces it to a snapshot and consults the posting decision
//! - renders the progress image and posts it
//!
//! All logging lives here and in the pipeline; the statistics core and the
//! decision rule stay pure.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DataArgs, RenderArgs, RunArgs};
use crate::data::DashboardClient;
use crate::domain::{CycleConfig, StatsConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `vaxbot` binary.
pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The scheduled job invokes the bare binary; make that mean `vaxbot run`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Stats(args) => handle_stats(args),
        Command::Render(args) => handle_render(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = cycle_config_from_args(&args);
    let outcome = pipeline::run_cycle(&config)?;

    if outcome.posted {
        info!("Posted update for {}", outcome.snapshot.as_of_date);
    } else if outcome.post {
        info!("Dry run: would have posted update for {}", outcome.snapshot.as_of_date);
    } else {
        info!("No new data since the last post; nothing to do");
    }
    Ok(())
}

fn handle_stats(args: DataArgs) -> Result<(), AppError> {
    let snapshot = fetch_snapshot(&args)?;
    println!("{}", crate::report::format_snapshot_summary(&snapshot));
    Ok(())
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let snapshot = fetch_snapshot(&args.data)?;
    crate::render::render_progress_bar(&args.out, &snapshot, args.data.milestone)?;
    info!("Image written to {}", args.out.display());
    Ok(())
}

fn fetch_snapshot(args: &DataArgs) -> Result<crate::domain::StatsSnapshot, AppError> {
    let client = DashboardClient::new(args.url.as_deref());
    let records = client.fetch_records()?;
    info!(records = records.len(), "Dataset loaded");
    Ok(crate::stats::compute_snapshot(&records, &stats_config_from_args(args))?)
}

fn stats_config_from_args(args: &DataArgs) -> StatsConfig {
    StatsConfig {
        population: args.population,
        milestone_ratio: args.milestone,
    }
}

pub fn cycle_config_from_args(args: &RunArgs) -> CycleConfig {
    CycleConfig {
        stats: stats_config_from_args(&args.render.data),
        image_path: args.render.out.clone(),
        force: args.force,
        dry_run: args.dry_run,
        dataset_url: args.render.data.url.clone(),
    }
}

/// Rewrite argv so `vaxbot` defaults to `vaxbot run`.
///
/// Rules:
/// - `vaxbot`                     -> `vaxbot run`
/// - `vaxbot --force ...`         -> `vaxbot run --force ...`
/// - `vaxbot --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "stats" | "render");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["vaxbot"])), args(&["vaxbot", "run"]));
    }

    #[test]
    fn leading_flag_is_treated_as_run_flags() {
        assert_eq!(
            rewrite_args(args(&["vaxbot", "--dry-run"])),
            args(&["vaxbot", "run", "--dry-run"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(args(&["vaxbot", "stats"])), args(&["vaxbot", "stats"]));
        assert_eq!(rewrite_args(args(&["vaxbot", "--help"])), args(&["vaxbot", "--help"]));
    }
}

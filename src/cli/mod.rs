//! Command-line parsing for the vaccination progress bot.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics/adapter code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_MILESTONE_RATIO, DEFAULT_POPULATION};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vaxbot", version, about = "Vaccination progress bot (dashboard-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one full cycle: fetch, compute, decide, render, post.
    Run(RunArgs),
    /// Fetch the dataset and print the snapshot summary only.
    Stats(DataArgs),
    /// Fetch the dataset and render the progress-bar image only.
    Render(RenderArgs),
}

/// Options shared by every dataset-consuming command.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Population used as the coverage denominator.
    #[arg(long, default_value_t = DEFAULT_POPULATION)]
    pub population: i64,

    /// Coverage fraction of the first projection target.
    #[arg(long, default_value_t = DEFAULT_MILESTONE_RATIO)]
    pub milestone: f64,

    /// Override the dataset URL (mirrors, fixtures).
    #[arg(long)]
    pub url: Option<String>,
}

/// Options for rendering the image.
#[derive(Debug, Parser, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output path for the progress-bar PNG.
    #[arg(long, value_name = "PNG", default_value = "progress_bar.png")]
    pub out: PathBuf,
}

/// Options for a full posting cycle.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Post even if the dataset has not advanced since the last post.
    #[arg(long)]
    pub force: bool,

    /// Do everything except the actual post (no feed writes).
    #[arg(long)]
    pub dry_run: bool,
}

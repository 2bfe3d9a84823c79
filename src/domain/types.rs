//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a refresh cycle
//! - dumped to JSON for debugging
//! - reused by future front-ends without dragging adapters along

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// German resident population, the denominator for coverage ratios.
///
/// Destatis figure as of the dataset's launch; overridable via `--population`
/// for other countries or revised censuses.
pub const DEFAULT_POPULATION: i64 = 83_190_556;

/// Coverage fraction treated as the first projection target.
pub const DEFAULT_MILESTONE_RATIO: f64 = 0.7;

/// One row of the published vaccination time-series (one calendar date).
///
/// Cumulative counters are `i64` rather than `u64` on purpose: the source
/// occasionally publishes corrections, and a negative value must be
/// representable so validation can reject it with a useful error instead of
/// failing inside the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Reporting date; unique and ascending within the source file.
    pub date: NaiveDate,
    /// Total doses administered up to and including `date`.
    pub cumulative_doses: i64,
    /// People with at least one dose.
    pub cumulative_first_dose: i64,
    /// People fully vaccinated.
    pub cumulative_full_dose: i64,
    /// Doses administered on `date` itself (negative on correction days).
    pub daily_delta_doses: i64,
}

/// Tunables for the statistics reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Population used as the ratio denominator.
    pub population: i64,
    /// Coverage fraction of the first projection target (switches to 1.0
    /// once exceeded).
    pub milestone_ratio: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            milestone_ratio: DEFAULT_MILESTONE_RATIO,
        }
    }
}

/// All derived statistics for a single refresh cycle.
///
/// Built once per cycle from a freshly fetched record sequence, never mutated
/// afterwards, and discarded when the cycle ends. Persistence of "what did we
/// last post" is inferred from the feed itself (see `decision`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Date of the most recent input record.
    pub as_of_date: NaiveDate,

    pub cumulative_doses: i64,
    pub cumulative_first_dose: i64,
    pub cumulative_full_dose: i64,

    /// `cumulative_first_dose / population`, clamped to at most 1.0.
    pub first_dose_ratio: f64,
    /// `cumulative_full_dose / population`, clamped to at most 1.0.
    pub full_dose_ratio: f64,

    /// Current projection target: the milestone ratio until first-dose
    /// coverage exceeds it, then 1.0.
    pub target_ratio: f64,

    /// Mean of `daily_delta_doses` over the trailing 7 records.
    ///
    /// Historical misnomer kept on purpose: this has always been an
    /// arithmetic mean, not a median, and downstream text says "Median".
    pub daily_rate_median: f64,

    /// `population * target_ratio - cumulative_first_dose`; negative once the
    /// target is already exceeded.
    pub people_remaining: f64,

    /// `round(people_remaining / daily_rate_median)`; zero or negative when
    /// the target is already met.
    pub days_to_go: i64,

    /// Wall-clock "today" at snapshot construction plus `days_to_go`.
    pub target_date: NaiveDate,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct CycleConfig {
    pub stats: StatsConfig,
    /// Where the rendered progress-bar PNG is written.
    pub image_path: PathBuf,
    /// Bypass the new-data check and always post.
    pub force: bool,
    /// Do everything except the actual post.
    pub dry_run: bool,
    /// Override for the dataset URL (tests, mirrors).
    pub dataset_url: Option<String>,
}

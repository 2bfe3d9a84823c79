//! Shared refresh-cycle logic used by the `run` subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> snapshot -> decide -> render -> post
//!
//! The cycle is synchronous and runs to completion; scheduling is external
//! (cron or similar), and at most one cycle should run at a time, since the
//! posting platform does not serialize concurrent posts for us. A failed
//! cycle produces no post at all.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::info;

use crate::data::DashboardClient;
use crate::domain::{CycleConfig, DatasetRecord, StatsSnapshot};
use crate::error::AppError;
use crate::social::SocialClient;

/// Everything a cycle decided and produced.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub snapshot: StatsSnapshot,
    /// The new-data verdict (before dry-run suppression).
    pub post: bool,
    /// Whether a post actually went out.
    pub posted: bool,
    pub status_text: String,
}

/// The deterministic part of a cycle: snapshot, verdict, and status text.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    pub snapshot: StatsSnapshot,
    pub post: bool,
    pub status_text: String,
}

/// Execute one full refresh cycle.
pub fn run_cycle(config: &CycleConfig) -> Result<CycleOutcome, AppError> {
    let client = DashboardClient::new(config.dataset_url.as_deref());
    let records = client.fetch_records()?;
    info!(records = records.len(), "Dataset loaded");

    // A dry run never contacts the feed: no credentials needed, and with no
    // prior post visible the decision is an unconditional go-ahead.
    let social = if config.dry_run {
        None
    } else {
        Some(SocialClient::from_env()?)
    };

    let last_post_created_at = match &social {
        Some(social) => social.last_post_created_at()?,
        None => None,
    };

    let plan = plan_cycle_at(
        Local::now().date_naive(),
        &records,
        last_post_created_at,
        config,
    )?;
    info!(as_of = %plan.snapshot.as_of_date, post = plan.post, "Snapshot computed");

    if !plan.post {
        return Ok(CycleOutcome {
            snapshot: plan.snapshot,
            post: false,
            posted: false,
            status_text: plan.status_text,
        });
    }

    crate::render::render_progress_bar(
        &config.image_path,
        &plan.snapshot,
        config.stats.milestone_ratio,
    )?;
    info!("Image written to {}", config.image_path.display());

    let posted = match &social {
        Some(social) => {
            let media_id = social.upload_media(&config.image_path)?;
            social.post_status(&plan.status_text, &media_id)?;
            true
        }
        None => {
            info!("Dry run: skipping post\n{}", plan.status_text);
            false
        }
    };

    Ok(CycleOutcome {
        snapshot: plan.snapshot,
        post: true,
        posted,
        status_text: plan.status_text,
    })
}

/// Compute the snapshot, the posting verdict, and the status text.
///
/// Pure given its inputs; `today` is injected so the projection and the
/// verdict are testable at a fixed instant.
pub fn plan_cycle_at(
    today: NaiveDate,
    records: &[DatasetRecord],
    last_post_created_at: Option<DateTime<Utc>>,
    config: &CycleConfig,
) -> Result<CyclePlan, AppError> {
    let snapshot = crate::stats::compute_snapshot_at(today, records, &config.stats)?;
    let post = crate::decision::should_post(snapshot.as_of_date, last_post_created_at, config.force);
    let status_text = crate::report::format_status_text(&snapshot);

    Ok(CyclePlan {
        snapshot,
        post,
        status_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::StatsConfig;

    fn records() -> Vec<DatasetRecord> {
        (1..=7)
            .map(|day| DatasetRecord {
                date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
                cumulative_doses: 800_000,
                cumulative_first_dose: 690_000,
                cumulative_full_dose: 110_000,
                daily_delta_doses: 1000,
            })
            .collect()
    }

    fn config(force: bool) -> CycleConfig {
        CycleConfig {
            stats: StatsConfig {
                population: 1_000_000,
                milestone_ratio: 0.7,
            },
            image_path: "progress_bar.png".into(),
            force,
            dry_run: true,
            dataset_url: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 8).unwrap()
    }

    #[test]
    fn plan_posts_when_the_feed_is_empty() {
        let plan = plan_cycle_at(today(), &records(), None, &config(false)).unwrap();
        assert!(plan.post);
        assert_eq!(plan.snapshot.days_to_go, 10);
        assert!(plan.status_text.contains("690.000"));
    }

    #[test]
    fn plan_skips_when_the_last_post_already_covered_this_dataset() {
        // Posted on the 8th, carrying the 7th's data; the snapshot is still
        // the 7th.
        let created = Utc.with_ymd_and_hms(2021, 3, 8, 9, 0, 0).unwrap();
        let plan = plan_cycle_at(today(), &records(), Some(created), &config(false)).unwrap();
        assert!(!plan.post);
    }

    #[test]
    fn force_turns_a_skip_into_a_post() {
        let created = Utc.with_ymd_and_hms(2021, 3, 8, 9, 0, 0).unwrap();
        let plan = plan_cycle_at(today(), &records(), Some(created), &config(true)).unwrap();
        assert!(plan.post);
    }

    #[test]
    fn core_errors_fail_the_whole_plan() {
        let short = &records()[..4];
        assert!(plan_cycle_at(today(), short, None, &config(false)).is_err());
    }
}

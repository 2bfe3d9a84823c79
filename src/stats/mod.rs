//! Statistics reduction: raw daily records -> one `StatsSnapshot`.
//!
//! This is the correctness-critical core of the bot. It is a pure function of
//! its inputs plus an injected "today" date (used only for `target_date`), so
//! every edge case is testable without network, clock, or feed access.
//!
//! The reduction never recovers silently: a short sequence, a malformed
//! record, or a zero mean daily rate each fail the whole cycle with a typed
//! error. No partial snapshot is ever produced.

use chrono::{Duration, Local, NaiveDate};

use crate::domain::{DatasetRecord, StatsConfig, StatsSnapshot};

/// Trailing window used for the daily-rate average.
pub const RATE_WINDOW: usize = 7;

/// Typed failures of the statistics reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Fewer than [`RATE_WINDOW`] records supplied.
    InsufficientData { got: usize },
    /// A record violates the input contract (negative cumulative counter, or
    /// dates not strictly ascending). The message names the offending date.
    InvalidRecord(String),
    /// The trailing mean daily rate is exactly zero, so the projection is
    /// undefined.
    DivisionByZero,
    /// `days_to_go` lands outside the representable calendar range (a
    /// near-zero mean rate can project millions of days out).
    ProjectionOutOfRange { days: i64 },
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::InsufficientData { got } => write!(
                f,
                "Dataset has {got} records; at least {RATE_WINDOW} are required."
            ),
            StatsError::InvalidRecord(msg) => write!(f, "Invalid dataset record: {msg}"),
            StatsError::DivisionByZero => write!(
                f,
                "Mean daily rate over the last {RATE_WINDOW} records is zero; projection is undefined."
            ),
            StatsError::ProjectionOutOfRange { days } => write!(
                f,
                "Projected completion ({days} days out) is beyond the representable date range."
            ),
        }
    }
}

impl std::error::Error for StatsError {}

/// Reduce an ordered record sequence into a snapshot, dated from the local
/// wall clock.
pub fn compute_snapshot(
    records: &[DatasetRecord],
    config: &StatsConfig,
) -> Result<StatsSnapshot, StatsError> {
    compute_snapshot_at(Local::now().date_naive(), records, config)
}

/// Reduce an ordered record sequence into a snapshot as of `today`.
///
/// `today` feeds only `target_date`: the projection answers "how many days
/// from now", not "from the dataset's as-of date", which lags publication by
/// a day.
pub fn compute_snapshot_at(
    today: NaiveDate,
    records: &[DatasetRecord],
    config: &StatsConfig,
) -> Result<StatsSnapshot, StatsError> {
    if records.len() < RATE_WINDOW {
        return Err(StatsError::InsufficientData { got: records.len() });
    }
    validate_records(records)?;

    let current = &records[records.len() - 1];

    let first_dose_ratio = clamped_ratio(current.cumulative_first_dose, config.population);
    let full_dose_ratio = clamped_ratio(current.cumulative_full_dose, config.population);

    // Once first-dose coverage passes the milestone, the projection target
    // moves to full coverage. Exactly hitting the milestone keeps it.
    let target_ratio = if first_dose_ratio > config.milestone_ratio {
        1.0
    } else {
        config.milestone_ratio
    };

    let window = &records[records.len() - RATE_WINDOW..];
    let daily_rate_median =
        window.iter().map(|r| r.daily_delta_doses as f64).sum::<f64>() / RATE_WINDOW as f64;

    let people_remaining =
        config.population as f64 * target_ratio - current.cumulative_first_dose as f64;

    if daily_rate_median == 0.0 {
        return Err(StatsError::DivisionByZero);
    }

    // Half-away-from-zero rounding; applied identically on every run.
    let days_to_go = (people_remaining / daily_rate_median).round() as i64;

    // A near-zero mean rate projects far past chrono's calendar range.
    let target_date = Duration::try_days(days_to_go)
        .and_then(|d| today.checked_add_signed(d))
        .ok_or(StatsError::ProjectionOutOfRange { days: days_to_go })?;

    Ok(StatsSnapshot {
        as_of_date: current.date,
        cumulative_doses: current.cumulative_doses,
        cumulative_first_dose: current.cumulative_first_dose,
        cumulative_full_dose: current.cumulative_full_dose,
        first_dose_ratio,
        full_dose_ratio,
        target_ratio,
        daily_rate_median,
        people_remaining,
        days_to_go,
        target_date,
    })
}

fn clamped_ratio(count: i64, population: i64) -> f64 {
    let ratio = count as f64 / population as f64;
    ratio.min(1.0)
}

fn validate_records(records: &[DatasetRecord]) -> Result<(), StatsError> {
    let mut prev_date: Option<NaiveDate> = None;
    for r in records {
        if r.cumulative_doses < 0 || r.cumulative_first_dose < 0 || r.cumulative_full_dose < 0 {
            return Err(StatsError::InvalidRecord(format!(
                "negative cumulative counter on {}",
                r.date
            )));
        }
        if let Some(prev) = prev_date {
            if r.date <= prev {
                return Err(StatsError::InvalidRecord(format!(
                    "dates not strictly ascending ({prev} followed by {})",
                    r.date
                )));
            }
        }
        prev_date = Some(r.date);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).unwrap()
    }

    /// 7 records ending on 2021-03-07, with the given final first-dose count
    /// and a flat daily delta.
    fn records(first_dose: i64, delta: i64) -> Vec<DatasetRecord> {
        (1..=7)
            .map(|day| DatasetRecord {
                date: date(day),
                cumulative_doses: first_dose + 100_000,
                cumulative_first_dose: first_dose,
                cumulative_full_dose: first_dose / 2,
                daily_delta_doses: delta,
            })
            .collect()
    }

    fn config() -> StatsConfig {
        StatsConfig {
            population: 1_000_000,
            milestone_ratio: 0.7,
        }
    }

    #[test]
    fn projects_days_to_milestone() {
        let snap = compute_snapshot_at(date(8), &records(690_000, 1000), &config()).unwrap();

        assert_eq!(snap.as_of_date, date(7));
        assert!((snap.first_dose_ratio - 0.69).abs() < 1e-12);
        assert_eq!(snap.target_ratio, 0.7);
        assert_eq!(snap.daily_rate_median, 1000.0);
        assert_eq!(snap.people_remaining, 10_000.0);
        assert_eq!(snap.days_to_go, 10);
        assert_eq!(snap.target_date, date(18));
    }

    #[test]
    fn switches_target_to_full_coverage_past_milestone() {
        let snap = compute_snapshot_at(date(8), &records(710_000, 1000), &config()).unwrap();

        assert!((snap.first_dose_ratio - 0.71).abs() < 1e-12);
        assert_eq!(snap.target_ratio, 1.0);
        assert_eq!(snap.people_remaining, 290_000.0);
        assert_eq!(snap.days_to_go, 290);
    }

    #[test]
    fn ratio_exactly_at_milestone_keeps_milestone_target() {
        let snap = compute_snapshot_at(date(8), &records(700_000, 1000), &config()).unwrap();
        assert_eq!(snap.first_dose_ratio, 0.7);
        assert_eq!(snap.target_ratio, 0.7);
        assert_eq!(snap.days_to_go, 0);
    }

    #[test]
    fn ratios_clamp_to_one_when_counts_exceed_population() {
        let mut recs = records(1_200_000, 1000);
        recs[6].cumulative_full_dose = 1_100_000;
        let snap = compute_snapshot_at(date(8), &recs, &config()).unwrap();

        assert_eq!(snap.first_dose_ratio, 1.0);
        assert_eq!(snap.full_dose_ratio, 1.0);
        // Target already exceeded: remaining and days go negative.
        assert!(snap.people_remaining < 0.0);
        assert!(snap.days_to_go < 0);
    }

    #[test]
    fn rate_is_the_mean_of_the_trailing_seven_deltas() {
        let deltas = [500i64, 1500, 1000, 2000, 0, 3000, 700];
        let mut recs = records(690_000, 0);
        for (r, d) in recs.iter_mut().zip(deltas) {
            r.daily_delta_doses = d;
        }
        // Hand-computed: (500+1500+1000+2000+0+3000+700) / 7 = 8700 / 7.
        let snap = compute_snapshot_at(date(8), &recs, &config()).unwrap();
        assert!((snap.daily_rate_median - 8700.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn only_the_last_seven_records_feed_the_rate() {
        let mut recs = records(690_000, 1000);
        let mut older: Vec<DatasetRecord> = (1..=5)
            .map(|i| DatasetRecord {
                date: NaiveDate::from_ymd_opt(2021, 2, i).unwrap(),
                cumulative_doses: 0,
                cumulative_first_dose: 0,
                cumulative_full_dose: 0,
                daily_delta_doses: 999_999,
            })
            .collect();
        older.append(&mut recs);

        let snap = compute_snapshot_at(date(8), &older, &config()).unwrap();
        assert_eq!(snap.daily_rate_median, 1000.0);
        assert_eq!(snap.days_to_go, 10);
    }

    #[test]
    fn zero_mean_rate_fails_rather_than_projecting() {
        let err = compute_snapshot_at(date(8), &records(690_000, 0), &config()).unwrap_err();
        assert_eq!(err, StatsError::DivisionByZero);
    }

    #[test]
    fn near_zero_rate_fails_typed_instead_of_overflowing_the_calendar() {
        // One dose in a whole week: the mean rate is 1/7, so the projection
        // lands hundreds of millions of days out, past chrono's date range.
        let mut recs = records(5_000_000, 0);
        recs[6].daily_delta_doses = 1;
        let cfg = StatsConfig {
            population: 83_190_556,
            milestone_ratio: 0.7,
        };
        let err = compute_snapshot_at(date(8), &recs, &cfg).unwrap_err();
        assert!(matches!(err, StatsError::ProjectionOutOfRange { .. }));
    }

    #[test]
    fn mixed_deltas_summing_to_zero_also_fail() {
        let deltas = [1000i64, -1000, 2000, -2000, 500, -500, 0];
        let mut recs = records(690_000, 0);
        for (r, d) in recs.iter_mut().zip(deltas) {
            r.daily_delta_doses = d;
        }
        let err = compute_snapshot_at(date(8), &recs, &config()).unwrap_err();
        assert_eq!(err, StatsError::DivisionByZero);
    }

    #[test]
    fn fewer_than_seven_records_is_a_contract_violation() {
        let recs = &records(690_000, 1000)[..5];
        let err = compute_snapshot_at(date(8), recs, &config()).unwrap_err();
        assert_eq!(err, StatsError::InsufficientData { got: 5 });
    }

    #[test]
    fn negative_cumulative_counter_is_rejected() {
        let mut recs = records(690_000, 1000);
        recs[3].cumulative_full_dose = -1;
        let err = compute_snapshot_at(date(8), &recs, &config()).unwrap_err();
        assert!(matches!(err, StatsError::InvalidRecord(_)));
    }

    #[test]
    fn non_ascending_dates_are_rejected() {
        let mut recs = records(690_000, 1000);
        recs[4].date = recs[3].date;
        let err = compute_snapshot_at(date(8), &recs, &config()).unwrap_err();
        assert!(matches!(err, StatsError::InvalidRecord(_)));
    }

    #[test]
    fn same_inputs_same_instant_yield_identical_snapshots() {
        let recs = records(690_000, 1234);
        let a = compute_snapshot_at(date(8), &recs, &config()).unwrap();
        let b = compute_snapshot_at(date(8), &recs, &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn negative_daily_rate_yields_negative_days() {
        // A sustained correction period: mean rate is negative, so the
        // "projection" runs backwards. The reduction reports it as-is rather
        // than clamping.
        let snap = compute_snapshot_at(date(8), &records(690_000, -1000), &config()).unwrap();
        assert_eq!(snap.daily_rate_median, -1000.0);
        assert_eq!(snap.days_to_go, -10);
    }
}

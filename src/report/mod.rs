//! Formatting: the post text and terminal summaries.
//!
//! We keep formatting code in one place so:
//! - the statistics core stays free of locale concerns and emits plain values
//! - output changes are localized (important for future snapshot tests)
//!
//! The post text is German, hence German digit grouping (`.` thousands
//! separator, `,` decimal comma) and `dd.mm.yyyy` dates. Grouping is done by
//! small pure helpers rather than process-wide locale state.

use crate::domain::StatsSnapshot;

/// The status text published alongside the image.
pub fn format_status_text(snapshot: &StatsSnapshot) -> String {
    format!(
        "In Deutschland sind {} Menschen ({} %) mindestens einmal geimpft.\n\
         Davon sind {} ({} %) bereits vollständig geimpft.\n\
         Verimpfte Dosen insgesamt: {}\n\
         Impfungen/Tag: {} (Median über die letzten 7 Meldetage)\n\
         Stand: {}.",
        group_thousands(snapshot.cumulative_first_dose),
        format_percent(snapshot.first_dose_ratio),
        group_thousands(snapshot.cumulative_full_dose),
        format_percent(snapshot.full_dose_ratio),
        group_thousands(snapshot.cumulative_doses),
        group_thousands(snapshot.daily_rate_median.round() as i64),
        snapshot.as_of_date.format("%d.%m.%Y"),
    )
}

/// Terminal summary for the `stats` subcommand.
pub fn format_snapshot_summary(snapshot: &StatsSnapshot) -> String {
    let mut out = String::new();

    out.push_str("=== vaxbot - Vaccination Progress ===\n");
    out.push_str(&format!("As-of: {}\n", snapshot.as_of_date));
    out.push_str(&format!(
        "First dose: {} ({} %)\n",
        group_thousands(snapshot.cumulative_first_dose),
        format_percent(snapshot.first_dose_ratio),
    ));
    out.push_str(&format!(
        "Full dose : {} ({} %)\n",
        group_thousands(snapshot.cumulative_full_dose),
        format_percent(snapshot.full_dose_ratio),
    ));
    out.push_str(&format!(
        "Doses     : {}\n",
        group_thousands(snapshot.cumulative_doses)
    ));
    out.push_str(&format!(
        "Rate/day  : {} (7-record mean)\n",
        group_thousands(snapshot.daily_rate_median.round() as i64)
    ));
    out.push_str(&format!(
        "Target    : {:.0}% | {} people remaining | {} days | {}\n",
        snapshot.target_ratio * 100.0,
        group_thousands(snapshot.people_remaining.round() as i64),
        snapshot.days_to_go,
        snapshot.target_date,
    ));

    out
}

/// Group an integer with `.` thousands separators (German convention).
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a ratio in [0, 1] as a percentage with a decimal comma.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}", ratio * 100.0).replace('.', ",")
}

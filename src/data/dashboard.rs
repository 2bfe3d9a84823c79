//! Client for the published vaccination time-series (impfdashboard.de TSV).
//!
//! The dashboard publishes one tab-separated file with one row per reporting
//! date. We resolve columns by header name rather than position, since the
//! file has grown extra columns over time and order is not guaranteed.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::domain::DatasetRecord;
use crate::error::AppError;

const DATA_URL: &str =
    "https://impfdashboard.de/static/data/germany_vaccinations_timeseries_v2.tsv";

const COL_DATE: &str = "date";
const COL_DOSES: &str = "dosen_kumulativ";
const COL_FIRST: &str = "personen_erst_kumulativ";
const COL_FULL: &str = "personen_voll_kumulativ";
const COL_DELTA: &str = "dosen_differenz_zum_vortag";

pub struct DashboardClient {
    client: Client,
    url: String,
}

impl DashboardClient {
    pub fn new(url_override: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            url: url_override.unwrap_or(DATA_URL).to_string(),
        }
    }

    /// Fetch and parse the full time-series, in file order.
    pub fn fetch_records(&self) -> Result<Vec<DatasetRecord>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Dataset request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read dataset body: {e}")))?;

        parse_tsv(&body)
    }
}

/// Parse the dashboard TSV into records.
///
/// Kept separate from the HTTP fetch so the format handling is testable
/// offline.
pub fn parse_tsv(body: &str) -> Result<Vec<DatasetRecord>, AppError> {
    let mut lines = body.lines();

    let header = lines
        .next()
        .ok_or_else(|| AppError::new(4, "Dataset is empty (no header row)."))?;
    let columns: Vec<&str> = header.split('\t').collect();

    let idx_date = column_index(&columns, COL_DATE)?;
    let idx_doses = column_index(&columns, COL_DOSES)?;
    let idx_first = column_index(&columns, COL_FIRST)?;
    let idx_full = column_index(&columns, COL_FULL)?;
    let idx_delta = column_index(&columns, COL_DELTA)?;

    let mut out = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();

        let date = field(&fields, idx_date, line_no, COL_DATE)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            AppError::new(4, format!("Invalid dataset date '{date}' on row {}: {e}", line_no + 2))
        })?;

        out.push(DatasetRecord {
            date,
            cumulative_doses: int_field(&fields, idx_doses, line_no, COL_DOSES)?,
            cumulative_first_dose: int_field(&fields, idx_first, line_no, COL_FIRST)?,
            cumulative_full_dose: int_field(&fields, idx_full, line_no, COL_FULL)?,
            daily_delta_doses: int_field(&fields, idx_delta, line_no, COL_DELTA)?,
        });
    }

    Ok(out)
}

fn column_index(columns: &[&str], name: &str) -> Result<usize, AppError> {
    columns
        .iter()
        .position(|c| c.trim() == name)
        .ok_or_else(|| AppError::new(4, format!("Dataset is missing the '{name}' column.")))
}

fn field<'a>(
    fields: &[&'a str],
    idx: usize,
    line_no: usize,
    name: &str,
) -> Result<&'a str, AppError> {
    fields.get(idx).copied().ok_or_else(|| {
        AppError::new(
            4,
            format!("Row {} has no '{name}' field.", line_no + 2),
        )
    })
}

fn int_field(fields: &[&str], idx: usize, line_no: usize, name: &str) -> Result<i64, AppError> {
    let raw = field(fields, idx, line_no, name)?;
    raw.trim().parse::<i64>().map_err(|e| {
        AppError::new(
            4,
            format!("Invalid '{name}' value '{raw}' on row {}: {e}", line_no + 2),
        )
    })
}

//! Data-source adapters.

pub mod dashboard;

pub use dashboard::{DashboardClient, parse_tsv};

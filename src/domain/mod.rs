//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw dataset rows (`DatasetRecord`)
//! - derived per-cycle statistics (`StatsSnapshot`)
//! - configuration (`StatsConfig`, `CycleConfig`)

pub mod types;

pub use types::*;

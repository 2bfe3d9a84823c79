//! `vax-progress` library crate.
//!
//! The binary (`vaxbot`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., other countries' datasets, other feeds)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod decision;
pub mod domain;
pub mod error;
pub mod render;
pub mod report;
pub mod social;
pub mod stats;

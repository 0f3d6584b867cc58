// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Costguard Store
//!
//! Files in and out of the costguard engine.
//!
//! This crate provides:
//!
//! - **Export**: JSON reports, CSV, and Prometheus text from a tracker
//! - **Reports**: loading a JSON report and replaying it into a tracker
//! - **Config**: budget policies and custom pricing from `config.json`
//! - **Persistence**: atomic, owner-only file writes
//!
//! ## Usage
//!
//! ```no_run
//! use costguard_core::CostTracker;
//! use costguard_store::{load_report, save_json_report};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), costguard_store::StoreError> {
//! let tracker = CostTracker::new();
//! tracker.record("gpt-4o", 1_000, 500)?;
//!
//! save_json_report(&tracker, Path::new("report.json")).await?;
//!
//! let replayed = CostTracker::new();
//! load_report(Path::new("report.json")).await?.replay(&replayed)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod persistence;
pub mod report;

pub use config::{BudgetConfig, GuardConfig, PolicyConfig, PricingConfig};
pub use error::StoreError;
pub use export::{
    save_csv, save_json_report, to_csv, to_json, to_prometheus, DEFAULT_METRIC_PREFIX,
};
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, default_report_path, load_json,
    load_json_or_default, save_json, save_text,
};
pub use report::{load_report, CostReport, ExportedRecord};

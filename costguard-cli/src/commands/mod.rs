//! CLI command implementations.

pub mod check;
pub mod estimate;
pub mod export;
pub mod models;
pub mod report;

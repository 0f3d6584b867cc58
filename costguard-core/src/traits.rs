//! Trait definitions for costguard.
//!
//! This module defines the extension point for budget rules.

use std::fmt;

use crate::models::BudgetResult;
use crate::tracker::CostTracker;

/// A budget rule evaluated against a tracker's current state.
///
/// Implementors hold only their own configuration. All spend information
/// is read from the tracker at evaluation time, which takes the tracker's
/// lock briefly for each read; evaluation itself runs outside the lock.
///
/// A policy returns one of three actions:
/// - `Allow` when the rule is satisfied
/// - `Warn` when spend is notable but the call may proceed
/// - `Block` when the call must not proceed
pub trait BudgetPolicy: Send + Sync + fmt::Debug {
    /// Returns a short name for logs.
    fn name(&self) -> &'static str;

    /// Evaluates the rule against the tracker.
    fn evaluate(&self, tracker: &CostTracker) -> BudgetResult;
}

//! Budget outcome types.
//!
//! This module contains the values produced by budget policies:
//! - [`Action`] - What to do with the next call
//! - [`BudgetResult`] - A single policy (or manager) decision

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Action
// ============================================================================

/// What to do when a budget threshold is crossed.
///
/// Variants are declared in strictness order, so `Allow < Warn < Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Let the call through.
    #[default]
    Allow,
    /// Let the call through, but report it.
    Warn,
    /// Refuse the call.
    Block,
}

impl Action {
    /// Returns the lowercase name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "warn" => Ok(Self::Warn),
            "block" => Ok(Self::Block),
            other => Err(CoreError::InvalidConfig(format!("unknown action: {other}"))),
        }
    }
}

// ============================================================================
// Budget Result
// ============================================================================

/// Outcome of evaluating one policy, or the combined outcome of a manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    /// The decided action.
    pub action: Action,
    /// Human-readable explanation.
    pub message: String,
    /// Cost the decision was based on (USD).
    pub current_cost: f64,
    /// Threshold the cost was compared against (USD).
    pub limit: f64,
}

impl BudgetResult {
    /// Creates a new result.
    pub fn new(action: Action, message: impl Into<String>, current_cost: f64, limit: f64) -> Self {
        Self {
            action,
            message: message.into(),
            current_cost,
            limit,
        }
    }

    /// Creates an allow result with zero cost and limit.
    pub fn allow(message: impl Into<String>) -> Self {
        Self::new(Action::Allow, message, 0.0, 0.0)
    }

    /// Returns true if the call must not proceed.
    pub fn is_blocked(&self) -> bool {
        self.action == Action::Block
    }

    /// Returns true if the outcome is a warning.
    pub fn is_warning(&self) -> bool {
        self.action == Action::Warn
    }

    /// Returns true if the outcome allows the call without comment.
    pub fn is_allowed(&self) -> bool {
        self.action == Action::Allow
    }
}

impl fmt::Display for BudgetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.action, self.message)
    }
}

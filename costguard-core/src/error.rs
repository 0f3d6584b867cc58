//! Core error types for costguard.

use thiserror::Error;

use crate::models::BudgetResult;

/// Core error type for costguard operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No exact or prefix match in the pricing table.
    #[error("Unknown model: {0:?}. Register it or use a known model name.")]
    UnknownModel(String),

    /// A budget policy blocked the call.
    ///
    /// Carries the blocking outcome so callers can log or display it
    /// without re-evaluating the policies.
    #[error("Budget exceeded: {}", .0.message)]
    BudgetExceeded(BudgetResult),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cost override that is negative, NaN or infinite.
    #[error("Invalid cost: {0} (must be a finite, non-negative USD amount)")]
    InvalidCost(f64),

    /// Recording the call would overflow a running token total.
    #[error("Token total overflow while recording {model:?}")]
    TokenOverflow { model: String },
}

impl CoreError {
    /// Returns the blocking outcome if this is a budget error.
    pub fn budget_result(&self) -> Option<&BudgetResult> {
        match self {
            CoreError::BudgetExceeded(result) => Some(result),
            _ => None,
        }
    }

    /// Returns true if the caller can recover by supplying an explicit cost.
    pub fn is_unknown_model(&self) -> bool {
        matches!(self, CoreError::UnknownModel(_))
    }
}

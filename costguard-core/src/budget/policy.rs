//! Built-in budget policies.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Action, BudgetResult};
use crate::traits::BudgetPolicy;
use crate::tracker::CostTracker;

/// Default sliding window length in seconds (one hour).
pub const DEFAULT_WINDOW_SECS: i64 = 3600;

// ============================================================================
// Hard Cap
// ============================================================================

/// Block requests once total cost reaches `limit_usd`.
#[derive(Debug, Clone, PartialEq)]
pub struct HardCapPolicy {
    /// Lifetime spend ceiling in USD.
    pub limit_usd: f64,
}

impl HardCapPolicy {
    /// Creates a hard cap.
    pub fn new(limit_usd: f64) -> Self {
        Self { limit_usd }
    }

    /// Decides against a given spend.
    pub fn decide(&self, cost: f64) -> BudgetResult {
        if cost >= self.limit_usd {
            BudgetResult::new(
                Action::Block,
                format!("Hard cap reached: ${cost:.4} >= ${:.2}", self.limit_usd),
                cost,
                self.limit_usd,
            )
        } else {
            BudgetResult::new(
                Action::Allow,
                format!("Within budget: ${cost:.4} / ${:.2}", self.limit_usd),
                cost,
                self.limit_usd,
            )
        }
    }
}

impl BudgetPolicy for HardCapPolicy {
    fn name(&self) -> &'static str {
        "hard_cap"
    }

    fn evaluate(&self, tracker: &CostTracker) -> BudgetResult {
        self.decide(tracker.total_cost())
    }
}

// ============================================================================
// Soft Warning
// ============================================================================

/// Warn (but allow) once total cost reaches `warning_usd`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftWarningPolicy {
    /// Spend at which to start warning, in USD.
    pub warning_usd: f64,
}

impl SoftWarningPolicy {
    /// Creates a soft warning threshold.
    pub fn new(warning_usd: f64) -> Self {
        Self { warning_usd }
    }

    /// Decides against a given spend.
    pub fn decide(&self, cost: f64) -> BudgetResult {
        if cost >= self.warning_usd {
            BudgetResult::new(
                Action::Warn,
                format!("Warning: ${cost:.4} exceeds soft limit ${:.2}", self.warning_usd),
                cost,
                self.warning_usd,
            )
        } else {
            BudgetResult::new(
                Action::Allow,
                format!("Within budget: ${cost:.4} / ${:.2}", self.warning_usd),
                cost,
                self.warning_usd,
            )
        }
    }
}

impl BudgetPolicy for SoftWarningPolicy {
    fn name(&self) -> &'static str {
        "soft_warning"
    }

    fn evaluate(&self, tracker: &CostTracker) -> BudgetResult {
        self.decide(tracker.total_cost())
    }
}

// ============================================================================
// Sliding Window
// ============================================================================

/// Enforce a cost limit over a rolling time window.
///
/// Each evaluation scans every record, so the cost is O(records).
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindowPolicy {
    /// Maximum spend within the window, in USD.
    pub limit_usd: f64,
    /// Window length.
    pub window: Duration,
    /// Outcome when the limit is reached.
    pub action_on_exceed: Action,
}

impl SlidingWindowPolicy {
    /// Creates a one-hour window that blocks once `limit_usd` is reached.
    pub fn new(limit_usd: f64) -> Self {
        Self {
            limit_usd,
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
            action_on_exceed: Action::Block,
        }
    }

    /// Sets the window length.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the window length in seconds.
    #[must_use]
    pub fn with_window_secs(self, secs: i64) -> Self {
        self.with_window(Duration::seconds(secs))
    }

    /// Sets the outcome produced when the limit is reached.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action_on_exceed = action;
        self
    }

    /// Evaluates as of `now`.
    pub fn evaluate_at(&self, tracker: &CostTracker, now: DateTime<Utc>) -> BudgetResult {
        let window_cost = tracker.window_cost(now - self.window);
        let secs = self.window.num_seconds();

        if window_cost >= self.limit_usd {
            BudgetResult::new(
                self.action_on_exceed,
                format!(
                    "Sliding window ({secs}s) cost ${window_cost:.4} >= ${:.2}",
                    self.limit_usd
                ),
                window_cost,
                self.limit_usd,
            )
        } else {
            BudgetResult::new(
                Action::Allow,
                format!("Window cost ${window_cost:.4} / ${:.2}", self.limit_usd),
                window_cost,
                self.limit_usd,
            )
        }
    }
}

impl BudgetPolicy for SlidingWindowPolicy {
    fn name(&self) -> &'static str {
        "sliding_window"
    }

    fn evaluate(&self, tracker: &CostTracker) -> BudgetResult {
        self.evaluate_at(tracker, Utc::now())
    }
}

// ============================================================================
// Tests
// ============================================================================

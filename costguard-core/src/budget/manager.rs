//! Budget manager combining several policies.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::models::{Action, BudgetResult};
use crate::traits::BudgetPolicy;
use crate::tracker::CostTracker;

/// Hook invoked synchronously by [`BudgetManager::enforce`] on a warning.
pub type WarnHook = Arc<dyn Fn(&BudgetResult) + Send + Sync>;

/// Evaluates a stack of policies and enforces the strictest outcome.
///
/// Precedence is `Block > Warn > Allow`. Within a tier the first policy in
/// registration order wins, and the first `Block` stops evaluation.
///
/// Policies are added before the manager is shared; wrap it in an `Arc` to
/// use it from several threads.
#[derive(Default)]
pub struct BudgetManager {
    policies: Vec<Box<dyn BudgetPolicy>>,
    on_warn: Option<WarnHook>,
}

impl fmt::Debug for BudgetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetManager")
            .field("policies", &self.policies)
            .field("has_warn_hook", &self.on_warn.is_some())
            .finish()
    }
}

impl BudgetManager {
    /// Creates a manager with no policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a policy (builder style).
    #[must_use]
    pub fn with_policy<P: BudgetPolicy + 'static>(mut self, policy: P) -> Self {
        self.add(policy);
        self
    }

    /// Adds a policy.
    pub fn add<P: BudgetPolicy + 'static>(&mut self, policy: P) -> &mut Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Adds an already boxed policy.
    pub fn add_boxed(&mut self, policy: Box<dyn BudgetPolicy>) -> &mut Self {
        self.policies.push(policy);
        self
    }

    /// Sets the hook invoked when `enforce` sees a warning.
    #[must_use]
    pub fn on_warn<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BudgetResult) + Send + Sync + 'static,
    {
        self.on_warn = Some(Arc::new(hook));
        self
    }

    /// Returns the configured policies in registration order.
    pub fn policies(&self) -> &[Box<dyn BudgetPolicy>] {
        &self.policies
    }

    /// Returns the number of configured policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if no policies are configured.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Evaluates all policies and returns the most restrictive result.
    ///
    /// Never fails; use [`enforce`](Self::enforce) to turn a block into an
    /// error.
    pub fn check(&self, tracker: &CostTracker) -> BudgetResult {
        if self.policies.is_empty() {
            return BudgetResult::allow("No policies configured");
        }

        let mut first_warning: Option<BudgetResult> = None;
        for policy in &self.policies {
            let result = policy.evaluate(tracker);
            debug!(policy = policy.name(), action = %result.action, "Evaluated policy");

            match result.action {
                Action::Block => return result,
                Action::Warn if first_warning.is_none() => first_warning = Some(result),
                _ => {}
            }
        }

        first_warning.unwrap_or_else(|| BudgetResult::allow("No policies flagged"))
    }

    /// Checks policies and fails if any policy blocks.
    ///
    /// A warning invokes the warn hook once and is returned as `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BudgetExceeded` carrying the blocking result.
    pub fn enforce(&self, tracker: &CostTracker) -> Result<BudgetResult, CoreError> {
        let result = self.check(tracker);

        match result.action {
            Action::Block => {
                warn!(
                    cost = result.current_cost,
                    limit = result.limit,
                    message = %result.message,
                    "Budget blocked call"
                );
                Err(CoreError::BudgetExceeded(result))
            }
            Action::Warn => {
                warn!(
                    cost = result.current_cost,
                    limit = result.limit,
                    message = %result.message,
                    "Budget warning"
                );
                if let Some(hook) = &self.on_warn {
                    hook(&result);
                }
                Ok(result)
            }
            Action::Allow => Ok(result),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{HardCapPolicy, SoftWarningPolicy};
    use crate::models::RecordRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Policy that always returns a fixed action and counts evaluations.
    #[derive(Debug)]
    struct Fixed {
        action: Action,
        tag: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(action: Action, tag: &'static str) -> Self {
            Self {
                action,
                tag,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl BudgetPolicy for Fixed {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn evaluate(&self, _tracker: &CostTracker) -> BudgetResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BudgetResult::new(self.action, self.tag, 1.0, 1.0)
        }
    }

    fn spent(cost: f64) -> CostTracker {
        let tracker = CostTracker::new();
        tracker
            .record_with(RecordRequest::new("gpt-4o", 0, 0).cost(cost))
            .unwrap();
        tracker
    }

    #[test]
    fn test_empty_manager_allows() {
        let result = BudgetManager::new().check(&CostTracker::new());

        assert_eq!(result.action, Action::Allow);
        assert_eq!(result.current_cost, 0.0);
        assert_eq!(result.limit, 0.0);
        assert_eq!(result.message, "No policies configured");
    }

    #[test]
    fn test_all_allow_returns_default() {
        let manager = BudgetManager::new().with_policy(HardCapPolicy::new(10.0));
        let result = manager.check(&spent(1.0));

        assert_eq!(result.action, Action::Allow);
        assert_eq!(result.message, "No policies flagged");
        assert_eq!(result.current_cost, 0.0);
    }

    #[test]
    fn test_block_beats_warn_in_either_order() {
        let tracker = spent(2.0);

        let warn_first = BudgetManager::new()
            .with_policy(SoftWarningPolicy::new(1.0))
            .with_policy(HardCapPolicy::new(1.5));
        assert_eq!(warn_first.check(&tracker).action, Action::Block);

        let block_first = BudgetManager::new()
            .with_policy(HardCapPolicy::new(1.5))
            .with_policy(SoftWarningPolicy::new(1.0));
        assert_eq!(block_first.check(&tracker).action, Action::Block);
    }

    #[test]
    fn test_first_block_short_circuits() {
        let later = Fixed::new(Action::Allow, "later");
        let later_calls = Arc::clone(&later.calls);

        let manager = BudgetManager::new()
            .with_policy(Fixed::new(Action::Block, "first-block"))
            .with_policy(Fixed::new(Action::Block, "second-block"))
            .with_policy(later);

        let result = manager.check(&CostTracker::new());
        assert_eq!(result.message, "first-block");
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_warning_wins() {
        let manager = BudgetManager::new()
            .with_policy(Fixed::new(Action::Allow, "allow"))
            .with_policy(Fixed::new(Action::Warn, "first-warn"))
            .with_policy(Fixed::new(Action::Warn, "second-warn"));

        assert_eq!(manager.check(&CostTracker::new()).message, "first-warn");
    }

    #[test]
    fn test_enforce_raises_on_block() {
        let manager = BudgetManager::new().with_policy(HardCapPolicy::new(0.01));
        let err = manager.enforce(&spent(0.75)).unwrap_err();

        let result = err.budget_result().expect("budget error");
        assert_eq!(result.action, Action::Block);
        assert!((result.current_cost - 0.75).abs() < 1e-12);
        assert_eq!(result.limit, 0.01);
    }

    #[test]
    fn test_enforce_calls_warn_hook_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let manager = {
            let hits = Arc::clone(&hits);
            BudgetManager::new()
                .with_policy(SoftWarningPolicy::new(0.5))
                .with_policy(SoftWarningPolicy::new(0.1))
                .on_warn(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
        };

        let result = manager.enforce(&spent(1.0)).unwrap();
        assert_eq!(result.action, Action::Warn);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_check_does_not_call_warn_hook() {
        let hits = Arc::new(AtomicUsize::new(0));
        let manager = {
            let hits = Arc::clone(&hits);
            BudgetManager::new()
                .with_policy(SoftWarningPolicy::new(0.5))
                .on_warn(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
        };

        assert!(manager.check(&spent(1.0)).is_warning());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_enforce_allows() {
        let manager = BudgetManager::new().with_policy(HardCapPolicy::new(10.0));
        let result = manager.enforce(&spent(1.0)).unwrap();
        assert!(result.is_allowed());
    }

    #[test]
    fn test_add_by_reference() {
        let mut manager = BudgetManager::new();
        manager.add(HardCapPolicy::new(1.0)).add(SoftWarningPolicy::new(0.5));
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.policies()[0].name(), "hard_cap");
    }
}

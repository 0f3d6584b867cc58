//! Integration tests for the tracker and budget manager working together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use costguard_core::{
    Action, BudgetManager, CoreError, CostTracker, HardCapPolicy, RecordRequest,
    SlidingWindowPolicy, SoftWarningPolicy,
};

#[test]
fn test_concurrent_records_keep_totals_consistent() {
    let tracker = CostTracker::new();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let t = tracker.clone();
            thread::spawn(move || {
                for j in 0..250u64 {
                    t.record_with(
                        RecordRequest::new(format!("model-{}", i % 3), j, 2 * j).cost(0.001),
                    )
                    .unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let records = tracker.records();
    assert_eq!(records.len(), 2000);

    let summed_cost: f64 = records.iter().map(|r| r.cost).sum();
    let summed_input: u64 = records.iter().map(|r| r.input_tokens).sum();
    let summed_output: u64 = records.iter().map(|r| r.output_tokens).sum();

    assert!((tracker.total_cost() - summed_cost).abs() < 1e-9);
    assert_eq!(tracker.total_input_tokens(), summed_input);
    assert_eq!(tracker.total_output_tokens(), summed_output);
    assert_eq!(summed_input, 8 * (0..250u64).sum::<u64>());

    let by_model: f64 = tracker.cost_by_model().values().sum();
    assert!((by_model - tracker.total_cost()).abs() < 1e-9);
}

#[test]
fn test_summary_is_consistent_under_concurrent_writes() {
    let tracker = CostTracker::new();
    let writer = {
        let t = tracker.clone();
        thread::spawn(move || {
            for _ in 0..1000 {
                t.record_with(RecordRequest::new("gpt-4o", 1, 1).cost(1.0)).unwrap();
            }
        })
    };

    for _ in 0..200 {
        let summary = tracker.summary();
        // Every record costs exactly 1.0 and carries one input token.
        assert_eq!(summary.total_input_tokens as usize, summary.total_requests);
        assert!((summary.total_cost_usd - summary.total_requests as f64).abs() < 1e-9);
    }

    writer.join().unwrap();
    assert_eq!(tracker.summary().total_requests, 1000);
}

#[test]
fn test_concurrent_enforce_and_record() {
    let tracker = CostTracker::new();
    let budget = Arc::new(BudgetManager::new().with_policy(HardCapPolicy::new(5.0)));
    let blocked = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let t = tracker.clone();
            let b = Arc::clone(&budget);
            let blocked = Arc::clone(&blocked);
            thread::spawn(move || {
                for _ in 0..50 {
                    match b.enforce(&t) {
                        Ok(_) => {
                            t.record_with(RecordRequest::new("gpt-4o", 0, 0).cost(0.1)).unwrap();
                        }
                        Err(CoreError::BudgetExceeded(_)) => {
                            blocked.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // Check-then-record is not atomic: each thread can have one call in
    // flight when the cap is crossed.
    assert!(tracker.total_cost() >= 5.0);
    assert!(tracker.total_cost() < 5.6);
    assert!(blocked.load(Ordering::SeqCst) > 0);
}

#[test]
fn test_enforce_blocks_iff_check_blocks() {
    let tracker = CostTracker::new();
    let budget = BudgetManager::new()
        .with_policy(SoftWarningPolicy::new(1.0))
        .with_policy(HardCapPolicy::new(2.0));

    for _ in 0..30 {
        let checked = budget.check(&tracker);
        let enforced = budget.enforce(&tracker);
        assert_eq!(checked.action == Action::Block, enforced.is_err());
        tracker
            .record_with(RecordRequest::new("gpt-4o", 0, 0).cost(0.1))
            .unwrap();
    }
}

#[test]
fn test_budget_lifecycle() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let tracker = CostTracker::new();
    let budget = {
        let warnings = Arc::clone(&warnings);
        BudgetManager::new()
            .with_policy(SoftWarningPolicy::new(5.0))
            .with_policy(HardCapPolicy::new(10.0))
            .on_warn(move |_| {
                warnings.fetch_add(1, Ordering::SeqCst);
            })
    };

    // $7.50 per call on gpt-4o.
    assert!(budget.enforce(&tracker).unwrap().is_allowed());
    tracker.record("gpt-4o", 1_000_000, 500_000).unwrap();

    assert!(budget.enforce(&tracker).unwrap().is_warning());
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    tracker.record("gpt-4o", 1_000_000, 500_000).unwrap();

    let err = budget.enforce(&tracker).unwrap_err();
    let result = err.budget_result().unwrap();
    assert!((result.current_cost - 15.0).abs() < 1e-9);
    assert_eq!(result.limit, 10.0);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);

    tracker.reset();
    assert!(budget.enforce(&tracker).unwrap().is_allowed());
}

#[test]
fn test_sliding_window_forgets_old_spend() {
    let tracker = CostTracker::new();
    let budget = BudgetManager::new()
        .with_policy(SlidingWindowPolicy::new(1.0).with_window_secs(3600));

    tracker
        .record_with(
            RecordRequest::new("gpt-4o", 0, 0)
                .cost(10.0)
                .timestamp(Utc::now() - Duration::seconds(4000)),
        )
        .unwrap();

    assert!(budget.enforce(&tracker).is_ok());
    assert_eq!(tracker.total_cost(), 10.0);

    tracker
        .record_with(RecordRequest::new("gpt-4o", 0, 0).cost(1.0))
        .unwrap();
    assert!(budget.enforce(&tracker).is_err());
}

//! Tracked client behavior against an in-process client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use costguard_core::{
    Action, BudgetManager, CostTracker, HardCapPolicy, RecordRequest, SoftWarningPolicy,
};
use costguard_providers::{
    CompletionClient, ProviderError, ReportsUsage, RequestModel, TokenUsage, Tracked,
};

// ============================================================================
// Fake client
// ============================================================================

#[derive(Debug, Clone)]
struct FakeRequest {
    model: String,
}

impl FakeRequest {
    fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

impl RequestModel for FakeRequest {
    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Clone)]
struct FakeResponse {
    model: Option<String>,
    usage: Option<TokenUsage>,
}

impl ReportsUsage for FakeResponse {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }
}

/// Answers every request with fixed usage and counts calls.
#[derive(Debug, Default)]
struct FakeClient {
    calls: AtomicUsize,
    served_model: Option<String>,
    usage: Option<TokenUsage>,
    fail: bool,
}

impl FakeClient {
    fn with_usage(input: u64, output: u64) -> Self {
        Self {
            usage: Some(TokenUsage::new(input, output)),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    type Request = FakeRequest;
    type Response = FakeResponse;

    async fn create(&self, request: FakeRequest) -> Result<FakeResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Api {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(FakeResponse {
            model: Some(self.served_model.clone().unwrap_or(request.model)),
            usage: self.usage,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_records_usage_under_served_model() {
    let tracker = CostTracker::new();
    let client = Tracked::new(
        FakeClient {
            served_model: Some("gpt-4o-2024-08-06".into()),
            ..FakeClient::with_usage(1_000, 500)
        },
        tracker.clone(),
    );

    client.create(FakeRequest::new("gpt-4o")).await.unwrap();

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "gpt-4o-2024-08-06");
    assert!((tracker.total_cost() - 0.0075).abs() < 1e-12);
}

#[tokio::test]
async fn test_falls_back_to_requested_model() {
    #[derive(Debug)]
    struct Anonymous;

    #[async_trait]
    impl CompletionClient for Anonymous {
        type Request = FakeRequest;
        type Response = FakeResponse;

        async fn create(&self, _request: FakeRequest) -> Result<FakeResponse, ProviderError> {
            Ok(FakeResponse {
                model: None,
                usage: Some(TokenUsage::new(10, 10)),
            })
        }
    }

    let tracker = CostTracker::new();
    Tracked::new(Anonymous, tracker.clone())
        .create(FakeRequest::new("claude-3-haiku-20240307"))
        .await
        .unwrap();

    assert_eq!(tracker.records()[0].model, "claude-3-haiku-20240307");
}

#[tokio::test]
async fn test_missing_usage_is_not_recorded() {
    let tracker = CostTracker::new();
    let client = Tracked::new(FakeClient::default(), tracker.clone());

    let response = client.create(FakeRequest::new("gpt-4o")).await.unwrap();
    assert!(response.usage.is_none());
    assert_eq!(tracker.request_count(), 0);
}

#[tokio::test]
async fn test_block_skips_the_call() {
    let tracker = CostTracker::new();
    tracker
        .record_with(RecordRequest::new("gpt-4o", 0, 0).cost(2.0))
        .unwrap();
    let budget = Arc::new(BudgetManager::new().with_policy(HardCapPolicy::new(1.0)));
    let client =
        Tracked::new(FakeClient::with_usage(10, 10), tracker.clone()).with_budget(budget);

    let err = client.create(FakeRequest::new("gpt-4o")).await.unwrap_err();

    assert!(err.is_budget_exceeded());
    assert_eq!(client.inner().calls(), 0);
    assert_eq!(tracker.request_count(), 1);
}

#[tokio::test]
async fn test_warning_lets_the_call_through() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let budget = {
        let warnings = Arc::clone(&warnings);
        BudgetManager::new()
            .with_policy(SoftWarningPolicy::new(0.0))
            .on_warn(move |result| {
                assert_eq!(result.action, Action::Warn);
                warnings.fetch_add(1, Ordering::SeqCst);
            })
    };
    let tracker = CostTracker::new();
    let client = Tracked::new(FakeClient::with_usage(100, 100), tracker.clone())
        .with_budget(Arc::new(budget));

    client.create(FakeRequest::new("gpt-4o")).await.unwrap();
    client.create(FakeRequest::new("gpt-4o")).await.unwrap();

    assert_eq!(warnings.load(Ordering::SeqCst), 2);
    assert_eq!(tracker.request_count(), 2);
}

#[tokio::test]
async fn test_client_error_records_nothing() {
    let tracker = CostTracker::new();
    let client = Tracked::new(
        FakeClient {
            fail: true,
            ..FakeClient::with_usage(1, 1)
        },
        tracker.clone(),
    );

    let err = client.create(FakeRequest::new("gpt-4o")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    assert_eq!(tracker.request_count(), 0);
}

#[tokio::test]
async fn test_unpriced_model_surfaces_error() {
    let tracker = CostTracker::new();
    let client = Tracked::new(FakeClient::with_usage(1, 1), tracker.clone());

    let err = client
        .create(FakeRequest::new("mystery-model"))
        .await
        .unwrap_err();

    assert!(matches!(&err, ProviderError::Guard(e) if e.is_unknown_model()));
    assert_eq!(client.inner().calls(), 1);
    assert_eq!(tracker.request_count(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_accumulate() {
    let tracker = CostTracker::new();
    let client = Arc::new(Tracked::new(FakeClient::with_usage(1_000, 1_000), tracker.clone()));

    let calls = (0..32).map(|_| {
        let client = Arc::clone(&client);
        async move { client.create(FakeRequest::new("gpt-4o-mini")).await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(tracker.request_count(), 32);
    assert_eq!(tracker.total_input_tokens(), 32_000);
    assert_eq!(client.inner().calls(), 32);
}

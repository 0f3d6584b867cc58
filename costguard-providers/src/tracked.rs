//! Budget-enforcing, usage-recording wrapper around a completion client.

use std::sync::Arc;

use costguard_core::{BudgetManager, CostTracker};
use tracing::{debug, instrument};

use crate::client::{CompletionClient, ReportsUsage, RequestModel};
use crate::error::ProviderError;

/// Wraps a [`CompletionClient`] so every `create` call is budget-checked
/// before it runs and recorded after it returns.
#[derive(Debug, Clone)]
pub struct Tracked<C> {
    client: C,
    tracker: CostTracker,
    budget: Option<Arc<BudgetManager>>,
}

impl<C: CompletionClient> Tracked<C> {
    /// Wraps `client`, recording into `tracker`.
    pub fn new(client: C, tracker: CostTracker) -> Self {
        Self {
            client,
            tracker,
            budget: None,
        }
    }

    /// Enforces `budget` before each call.
    #[must_use]
    pub fn with_budget(mut self, budget: Arc<BudgetManager>) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Returns the wrapped client for calls that are not metered.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Returns the tracker calls are recorded into.
    pub fn tracker(&self) -> &CostTracker {
        &self.tracker
    }

    /// Returns the configured budget, if any.
    pub fn budget(&self) -> Option<&BudgetManager> {
        self.budget.as_deref()
    }

    /// Enforces the budget, performs the call, and records its usage.
    ///
    /// Usage is recorded under the model the response reports, falling back
    /// to the requested model. Responses without usage are returned
    /// unrecorded.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Guard(BudgetExceeded)` if a policy blocks; the
    ///   client is not called.
    /// - Any error from the client.
    /// - `ProviderError::Guard(UnknownModel)` if the usage cannot be priced.
    #[instrument(skip_all, fields(model = request.model()))]
    pub async fn create(&self, request: C::Request) -> Result<C::Response, ProviderError> {
        if let Some(budget) = &self.budget {
            budget.enforce(&self.tracker)?;
        }

        let requested = request.model().to_string();
        let response = self.client.create(request).await?;

        match response.usage() {
            Some(usage) => {
                let model = response.model().unwrap_or(&requested);
                self.tracker
                    .record(model, usage.input_tokens, usage.output_tokens)?;
            }
            None => debug!("Response carried no usage, not recorded"),
        }

        Ok(response)
    }
}

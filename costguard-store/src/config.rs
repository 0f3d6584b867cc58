//! Configuration management.
//!
//! The config file declares budget policies and extra pricing entries. A
//! missing file means no policies and the built-in pricing table.

use std::path::{Path, PathBuf};

use costguard_core::{
    Action, BudgetManager, BudgetPolicy, HardCapPolicy, ModelPricing, PricingTable,
    PricingTableBuilder, SlidingWindowPolicy, SoftWarningPolicy, DEFAULT_WINDOW_SECS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Budget policies.
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Pricing overrides and additions.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Budget section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Policies in evaluation order.
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

/// Pricing section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Entries registered after the built-in table.
    #[serde(default)]
    pub models: Vec<ModelPricing>,
}

/// One configured policy, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Lifetime spend ceiling.
    HardCap {
        /// Limit in USD.
        limit_usd: f64,
    },
    /// Lifetime spend warning threshold.
    SoftWarning {
        /// Threshold in USD.
        warning_usd: f64,
    },
    /// Rolling-window limit.
    SlidingWindow {
        /// Limit in USD within the window.
        limit_usd: f64,
        /// Window length in seconds.
        #[serde(default = "default_window_seconds")]
        window_seconds: i64,
        /// Outcome when the limit is reached.
        #[serde(default = "default_window_action")]
        action: Action,
    },
}

fn default_window_seconds() -> i64 {
    DEFAULT_WINDOW_SECS
}

fn default_window_action() -> Action {
    Action::Block
}

impl PolicyConfig {
    /// Checks that limits are non-negative and windows positive.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` describing the first problem.
    pub fn validate(&self) -> Result<(), StoreError> {
        match *self {
            Self::HardCap { limit_usd } => non_negative("hard_cap.limit_usd", limit_usd),
            Self::SoftWarning { warning_usd } => {
                non_negative("soft_warning.warning_usd", warning_usd)
            }
            Self::SlidingWindow {
                limit_usd,
                window_seconds,
                ..
            } => {
                non_negative("sliding_window.limit_usd", limit_usd)?;
                if window_seconds <= 0 {
                    return Err(StoreError::Config(format!(
                        "sliding_window.window_seconds must be positive, got {window_seconds}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Builds the policy object.
    pub fn to_policy(&self) -> Box<dyn BudgetPolicy> {
        match *self {
            Self::HardCap { limit_usd } => Box::new(HardCapPolicy::new(limit_usd)),
            Self::SoftWarning { warning_usd } => Box::new(SoftWarningPolicy::new(warning_usd)),
            Self::SlidingWindow {
                limit_usd,
                window_seconds,
                action,
            } => Box::new(
                SlidingWindowPolicy::new(limit_usd)
                    .with_window_secs(window_seconds)
                    .with_action(action),
            ),
        }
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::Config(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

impl GuardConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: Self = load_json(path).await?;
        config.validate()?;

        info!(
            path = %path.display(),
            policies = config.budget.policies.len(),
            custom_models = config.pricing.models.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validates every policy and pricing entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` describing the first problem.
    pub fn validate(&self) -> Result<(), StoreError> {
        for policy in &self.budget.policies {
            policy.validate()?;
        }
        for model in &self.pricing.models {
            if model.name.trim().is_empty() {
                return Err(StoreError::Config("pricing model name is empty".into()));
            }
            non_negative(&format!("{}.input_cost_per_1m", model.name), model.input_cost_per_1m)?;
            non_negative(&format!("{}.output_cost_per_1m", model.name), model.output_cost_per_1m)?;
        }
        Ok(())
    }

    /// Builds a budget manager with the configured policies in order.
    pub fn build_manager(&self) -> BudgetManager {
        let mut manager = BudgetManager::new();
        for policy in &self.budget.policies {
            manager.add_boxed(policy.to_policy());
        }
        manager
    }

    /// Builds the built-in table with configured entries registered after it.
    ///
    /// An entry named like a built-in model replaces it in place.
    pub fn build_pricing(&self) -> PricingTable {
        let mut builder = PricingTableBuilder::with_defaults();
        for model in &self.pricing.models {
            builder.insert(model.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Tests
// ============================================================================

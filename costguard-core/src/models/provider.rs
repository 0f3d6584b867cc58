//! Provider-related types.
//!
//! This module contains the [`Provider`] tag attached to every pricing entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Provider
// ============================================================================

/// Vendors whose models are priced in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI (GPT and o-series models)
    OpenAI,
    /// Anthropic (Claude models)
    Anthropic,
    /// Google (Gemini models)
    Google,
}

impl Provider {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Google => "Google",
        }
    }

    /// Returns all known providers.
    pub fn all() -> &'static [Provider] {
        &[Self::OpenAI, Self::Anthropic, Self::Google]
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.cli_name() == lower)
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown provider: {s}")))
    }
}

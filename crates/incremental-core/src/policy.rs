//! Abort Policies and Pipeline Configuration
//!
//! By default only an explicit `abort()` or a contained failure stops a
//! chain. `OnErrors` restores the stricter behavior where any Error-severity
//! diagnostic also suppresses the rest of the chain.

use serde::{Deserialize, Serialize};

use crate::error::IncrementalError;
use crate::incremental::Incremental;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortPolicy {
    /// Abort only on `abort()` or a caught failure.
    #[default]
    Explicit,
    /// Also abort as soon as an Error-severity diagnostic is present.
    OnErrors,
}

/// Pipeline configuration profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Profile name (e.g., "strict@1.0", "lenient@1.0")
    pub name: String,

    #[serde(default)]
    pub abort_policy: AbortPolicy,
}

impl PipelineConfig {
    /// Stops at the first stage that reports an error
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            abort_policy: AbortPolicy::OnErrors,
        }
    }

    /// Keeps producing values while diagnostics accumulate
    pub fn lenient() -> Self {
        Self {
            name: "lenient@1.0".to_string(),
            abort_policy: AbortPolicy::Explicit,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, IncrementalError> {
        serde_yaml::from_str(yaml).map_err(|e| IncrementalError::Config(e.to_string()))
    }

    /// Get profile by mode name
    pub fn for_mode(mode: &str) -> Self {
        match mode {
            "strict" => Self::strict(),
            _ => Self::lenient(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl<T> Incremental<T> {
    /// Aborts the chain if any Error-severity diagnostic has been recorded.
    pub fn abort_on_errors(self) -> Self {
        if !self.is_aborted() && self.has_errors() {
            tracing::debug!("error diagnostic present, aborting chain");
            self.abort()
        } else {
            self
        }
    }

    pub fn apply_policy(self, policy: AbortPolicy) -> Self {
        match policy {
            AbortPolicy::Explicit => self,
            AbortPolicy::OnErrors => self.abort_on_errors(),
        }
    }
}

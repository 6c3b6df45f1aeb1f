//! Typed configuration for the planner.
//!
//! Every section has a `Default` and is `#[serde(default)]`, so a
//! `config.toml` only needs the keys it wants to override:
//!
//! ```toml
//! [itinerary]
//! max_days = 30
//! board_removal = "cascade"
//!
//! [autosave]
//! max_retries = 5
//! retry_delay_ms = 500
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::itinerary::BoardRemoval;
use crate::error::{ItineraryError, Result};

/// Limits applied to itinerary date ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryConfig {
    /// Longest trip, in days, that a date range may span
    pub max_days: u32,
    /// What happens to items on boards trimmed away by range edits
    pub board_removal: BoardRemoval,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            max_days: 366,
            board_removal: BoardRemoval::default(),
        }
    }
}

/// Settings for the view-facing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Push every committed snapshot to the save channel
    pub autosave: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { autosave: true }
    }
}

/// Background save behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl AutosaveConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub itinerary: ItineraryConfig,
    pub session: SessionConfig,
    pub autosave: AutosaveConfig,
}

impl PlannerConfig {
    /// Parses and validates a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.itinerary.max_days == 0 {
            return Err(ItineraryError::ConfigError(
                "itinerary.max_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

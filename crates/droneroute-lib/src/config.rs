//! Engine configuration shared by the session, optimizer and CLI.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::hash_table::DEFAULT_BUCKETS;
use crate::routing::{RouteAlgorithm, DEFAULT_BATTERY_LIMIT};

/// Environment variable overriding [`EngineConfig::battery_limit`].
pub const BATTERY_LIMIT_ENV: &str = "DRONEROUTE_BATTERY_LIMIT";
/// Environment variable overriding [`EngineConfig::visit_table_buckets`].
pub const VISIT_BUCKETS_ENV: &str = "DRONEROUTE_VISIT_BUCKETS";
/// Environment variable overriding [`EngineConfig::algorithm`].
pub const ALGORITHM_ENV: &str = "DRONEROUTE_ALGORITHM";

/// Tunables for planning and history-based suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum cumulative edge cost between two recharges.
    pub battery_limit: f64,
    /// Ranked routes scanned for an exact origin/destination match.
    pub exact_match_window: usize,
    /// Ranked routes scanned for routes containing both endpoints.
    pub partial_match_window: usize,
    /// Ranked routes aggregated by pattern analysis.
    pub pattern_window: usize,
    /// Bucket count of the node-visit table.
    pub visit_table_buckets: usize,
    pub algorithm: RouteAlgorithm,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            battery_limit: DEFAULT_BATTERY_LIMIT,
            exact_match_window: 10,
            partial_match_window: 20,
            pattern_window: 50,
            visit_table_buckets: DEFAULT_BUCKETS,
            algorithm: RouteAlgorithm::Recharge,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `DRONEROUTE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BATTERY_LIMIT_ENV) {
            config.battery_limit = raw.trim().parse().map_err(|_| Error::InvalidConfig {
                message: format!("{BATTERY_LIMIT_ENV} must be a number, got '{raw}'"),
            })?;
        }
        if let Some(raw) = lookup(VISIT_BUCKETS_ENV) {
            config.visit_table_buckets =
                raw.trim().parse().map_err(|_| Error::InvalidConfig {
                    message: format!("{VISIT_BUCKETS_ENV} must be a positive integer, got '{raw}'"),
                })?;
        }
        if let Some(raw) = lookup(ALGORITHM_ENV) {
            config.algorithm = raw.trim().parse()?;
        }

        config.validate()?;
        debug!(?config, "loaded engine configuration");
        Ok(config)
    }

    /// Replace the battery limit, keeping other settings.
    pub fn with_battery_limit(mut self, battery_limit: f64) -> Self {
        self.battery_limit = battery_limit;
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.battery_limit.is_finite() || self.battery_limit <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "battery_limit must be finite and positive, got {}",
                    self.battery_limit
                ),
            });
        }

        let windows = [
            ("exact_match_window", self.exact_match_window),
            ("partial_match_window", self.partial_match_window),
            ("pattern_window", self.pattern_window),
            ("visit_table_buckets", self.visit_table_buckets),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(Error::InvalidConfig {
                message: format!("{name} must be at least 1"),
            });
        }

        Ok(())
    }
}

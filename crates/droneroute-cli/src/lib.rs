//! Drone routing CLI library.
//!
//! Argument types, subcommand handlers and output formatting for the
//! `droneroute-cli` binary. The binary only parses arguments and dispatches
//! to [`commands`].

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;

use droneroute_lib::{DeliveryNetwork, EngineConfig, RouteAlgorithm};

pub mod commands;
pub mod output;

use crate::output::OutputFormat;

/// Environment variable naming the delivery network document.
pub const NETWORK_ENV: &str = "DRONEROUTE_NETWORK";

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Delivery network JSON document (falls back to `DRONEROUTE_NETWORK`).
    #[arg(long, global = true)]
    pub network: Option<PathBuf>,
    /// Battery capacity; overrides `DRONEROUTE_BATTERY_LIMIT`.
    #[arg(long, global = true)]
    pub battery: Option<f64>,
    /// Search strategy; overrides `DRONEROUTE_ALGORITHM`.
    #[arg(long, global = true)]
    pub algorithm: Option<RouteAlgorithm>,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// The network path from the flag, else from the environment.
    pub fn network_path(&self) -> Result<PathBuf> {
        self.network
            .clone()
            .or_else(|| env::var_os(NETWORK_ENV).map(PathBuf::from))
            .ok_or_else(|| {
                anyhow!("no delivery network given; pass --network or set {NETWORK_ENV}")
            })
    }

    /// Environment configuration with command-line overrides applied.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config =
            EngineConfig::from_env().context("failed to read engine configuration")?;
        if let Some(limit) = self.battery {
            config = config.with_battery_limit(limit);
        }
        if let Some(algorithm) = self.algorithm {
            config = config.with_algorithm(algorithm);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_network(&self) -> Result<DeliveryNetwork> {
        let path = self.network_path()?;
        DeliveryNetwork::load(&path)
            .with_context(|| format!("failed to load delivery network from {}", path.display()))
    }
}

/// Arguments for the `route` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Origin node label.
    #[arg(long = "from")]
    pub from: String,
    /// Destination node label.
    #[arg(long = "to")]
    pub to: String,
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// JSON list of `{"from": .., "to": ..}` delivery orders.
    #[arg(long)]
    pub deliveries: PathBuf,
    /// Number of most frequent routes to list.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

/// Arguments for the `suggest` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    /// Origin node label.
    #[arg(long = "from")]
    pub from: String,
    /// Destination node label.
    #[arg(long = "to")]
    pub to: String,
    /// Delivery history replayed before asking for a suggestion.
    #[arg(long)]
    pub deliveries: Option<PathBuf>,
    /// Also run pattern analysis over the replayed history.
    #[arg(long)]
    pub patterns: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let options = GlobalOptions {
            battery: Some(20.0),
            algorithm: Some(RouteAlgorithm::Dijkstra),
            ..GlobalOptions::default()
        };
        let config = options.engine_config().unwrap();
        assert_eq!(config.battery_limit, 20.0);
        assert_eq!(config.algorithm, RouteAlgorithm::Dijkstra);
    }

    #[test]
    fn invalid_battery_flag_is_rejected() {
        let options = GlobalOptions {
            battery: Some(-1.0),
            ..GlobalOptions::default()
        };
        assert!(options.engine_config().is_err());
    }

    #[test]
    fn explicit_network_flag_wins() {
        let options = GlobalOptions {
            network: Some(PathBuf::from("net.json")),
            ..GlobalOptions::default()
        };
        assert_eq!(options.network_path().unwrap(), PathBuf::from("net.json"));
    }
}

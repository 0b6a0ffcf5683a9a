//! Delivery sessions.
//!
//! A [`DeliverySession`] is created when a simulation starts, owns the
//! network together with the route history gathered while it runs, and is
//! consumed by [`DeliverySession::finish`] to produce a [`SessionSummary`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::network::DeliveryNetwork;
use crate::optimizer::{RouteOptimizer, RouteSuggestion, SearchContext};
use crate::routing::{RoutePlan, RouteRequest};
use crate::tracker::{RouteTracker, VisitOrder};

/// A requested delivery between two labelled nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOrder {
    pub from: String,
    pub to: String,
}

/// Read a JSON list of delivery orders.
pub fn load_orders(path: &Path) -> Result<Vec<DeliveryOrder>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Aggregate results of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub deliveries: u64,
    pub total_cost: f64,
    pub distinct_routes: usize,
    pub most_frequent_routes: Vec<(String, u64)>,
    /// Node visit counts, busiest first.
    pub node_visits: Vec<(String, u64)>,
    pub report: Vec<String>,
}

#[derive(Debug)]
pub struct DeliverySession {
    network: DeliveryNetwork,
    config: EngineConfig,
    tracker: RouteTracker,
    optimizer: RouteOptimizer,
    last_route: Option<RoutePlan>,
    deliveries: u64,
    total_cost: f64,
}

impl DeliverySession {
    /// Start a session; fails when `config` does not validate.
    pub fn new(network: DeliveryNetwork, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            network,
            tracker: RouteTracker::with_visit_buckets(config.visit_table_buckets),
            optimizer: RouteOptimizer::new(&config),
            config,
            last_route: None,
            deliveries: 0,
            total_cost: 0.0,
        })
    }

    pub fn network(&self) -> &DeliveryNetwork {
        &self.network
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tracker(&self) -> &RouteTracker {
        &self.tracker
    }

    pub fn last_route(&self) -> Option<&RoutePlan> {
        self.last_route.as_ref()
    }

    pub fn deliveries(&self) -> u64 {
        self.deliveries
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Plan a route with the configured algorithm and battery limit.
    pub fn plan_delivery(&self, origin: &str, destination: &str) -> Result<RoutePlan> {
        let request = RouteRequest::recharge(origin, destination, self.config.battery_limit)
            .with_algorithm(self.config.algorithm);
        self.network
            .manager()
            .plan_route(self.network.graph(), &request)
    }

    /// Record a flown route. Returns the route's updated frequency.
    pub fn complete_delivery(&mut self, plan: RoutePlan) -> Result<u64> {
        let frequency = self.tracker.register_plan(&plan)?;
        self.deliveries += 1;
        self.total_cost += plan.total_cost;
        debug!(
            deliveries = self.deliveries,
            route = %plan.path.join("→"),
            "delivery completed"
        );
        self.last_route = Some(plan);
        Ok(frequency)
    }

    /// Plan and complete a delivery in one step.
    pub fn deliver(&mut self, origin: &str, destination: &str) -> Result<RoutePlan> {
        let plan = self.plan_delivery(origin, destination)?;
        self.complete_delivery(plan.clone())?;
        Ok(plan)
    }

    /// Ask the optimizer for a route, searching the network when history
    /// has nothing to offer.
    pub fn suggest_route(&mut self, origin: &str, destination: &str) -> Result<RouteSuggestion> {
        let context = SearchContext {
            graph: self.network.graph(),
            manager: self.network.manager(),
            battery_limit: self.config.battery_limit,
            algorithm: self.config.algorithm,
        };
        self.optimizer
            .suggest_optimized_route(&self.tracker, Some(context), origin, destination)
    }

    /// Weighted node counts over the most frequent routes.
    pub fn analyze_patterns(&mut self) -> Vec<(String, u64)> {
        self.optimizer
            .analyze_route_patterns(&self.tracker)
            .into_iter()
            .collect()
    }

    pub fn optimization_report(&self) -> String {
        self.optimizer.get_optimization_report()
    }

    /// End the session and summarize what happened.
    pub fn finish(mut self) -> SessionSummary {
        let node_visits = self.tracker.get_node_visits_stats(VisitOrder::CountDesc);
        let most_frequent_routes = self
            .tracker
            .get_most_frequent_routes(self.config.exact_match_window);
        info!(
            deliveries = self.deliveries,
            total_cost = self.total_cost,
            "delivery session finished"
        );

        SessionSummary {
            deliveries: self.deliveries,
            total_cost: self.total_cost,
            distinct_routes: self.tracker.route_count(),
            most_frequent_routes,
            node_visits,
            report: self.optimizer.report_entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::SuggestionSource;

    fn network() -> DeliveryNetwork {
        DeliveryNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"label": "W", "role": "warehouse"},
                    {"label": "R", "role": "recharge"},
                    {"label": "C", "role": "client"}
                ],
                "edges": [
                    {"from": "W", "to": "R", "weight": 7},
                    {"from": "R", "to": "C", "weight": 7}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn deliveries_accumulate() {
        let config = EngineConfig::default().with_battery_limit(10.0);
        let mut session = DeliverySession::new(network(), config).unwrap();
        let plan = session.deliver("W", "C").unwrap();
        assert_eq!(plan.recharge_stops, vec!["R"]);
        session.deliver("W", "C").unwrap();

        assert_eq!(session.deliveries(), 2);
        assert_eq!(session.total_cost(), 28.0);
        assert_eq!(session.tracker().frequency(&["W", "R", "C"]), 2);
        assert_eq!(session.last_route().map(|plan| plan.total_cost), Some(14.0));
    }

    #[test]
    fn suggestions_prefer_history() {
        let mut session = DeliverySession::new(network(), EngineConfig::default()).unwrap();
        let first = session.suggest_route("W", "C").unwrap();
        assert_eq!(first.source, SuggestionSource::Computed);

        session.complete_delivery(first.plan.unwrap()).unwrap();
        let second = session.suggest_route("W", "C").unwrap();
        assert_eq!(second.source, SuggestionSource::Exact);
        assert_eq!(session.optimization_report().lines().count(), 2);
    }

    #[test]
    fn finish_summarizes() {
        let mut session = DeliverySession::new(network(), EngineConfig::default()).unwrap();
        session.deliver("W", "C").unwrap();
        let summary = session.finish();
        assert_eq!(summary.deliveries, 1);
        assert_eq!(summary.distinct_routes, 1);
        assert_eq!(summary.most_frequent_routes, vec![("W→R→C".to_string(), 1)]);
        assert_eq!(summary.node_visits.len(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_battery_limit(0.0);
        assert!(DeliverySession::new(network(), config).is_err());
    }
}

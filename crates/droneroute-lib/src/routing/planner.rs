//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and implementations for the
//! supported algorithms. The strategy pattern allows adding new algorithms
//! without modifying the `plan_route` orchestrator.

use tracing::warn;

use super::projection::project_battery;
use super::{validate_battery_limit, RouteAlgorithm, RouteManager, RoutePlan};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path::shortest_path;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Plan a battery-feasible route between two labelled vertices.
    fn plan(
        &self,
        graph: &Graph,
        manager: &RouteManager,
        origin: &str,
        destination: &str,
        battery_limit: f64,
    ) -> Result<RoutePlan>;
}

/// Recharge-aware state-space search.
///
/// Always finds the cheapest feasible route when one exists.
#[derive(Debug, Clone, Default)]
pub struct RechargePlanner;

impl RoutePlanner for RechargePlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Recharge
    }

    fn plan(
        &self,
        graph: &Graph,
        manager: &RouteManager,
        origin: &str,
        destination: &str,
        battery_limit: f64,
    ) -> Result<RoutePlan> {
        manager.find_route_with_recharge(graph, origin, destination, battery_limit)
    }
}

/// Shortest path by weight, accepted only if the battery projection along
/// it is feasible.
///
/// Faster than [`RechargePlanner`] but rejects networks where the cheapest
/// path needs a stop away from a station.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn plan(
        &self,
        graph: &Graph,
        manager: &RouteManager,
        origin: &str,
        destination: &str,
        battery_limit: f64,
    ) -> Result<RoutePlan> {
        let start = graph.resolve(origin)?;
        let goal = graph.resolve(destination)?;
        if start == goal {
            return Ok(RoutePlan {
                algorithm: RouteAlgorithm::Dijkstra,
                path: vec![origin.to_string()],
                total_cost: 0.0,
                recharge_stops: Vec::new(),
                segments: vec![vec![origin.to_string()]],
            });
        }
        validate_battery_limit(battery_limit)?;

        let no_route = || Error::NoFeasibleRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
            battery_limit,
        };

        let (vertices, _) = shortest_path(graph, start, goal).ok_or_else(no_route)?;
        let path: Vec<String> = vertices
            .iter()
            .filter_map(|vertex| graph.label(*vertex).map(ToString::to_string))
            .collect();

        let projection = project_battery(graph, manager, &path, battery_limit)?;
        if !projection.feasible {
            warn!(
                origin,
                destination,
                forced_stops = ?projection.forced_stops,
                "shortest path needs recharges away from stations"
            );
            return Err(no_route());
        }

        Ok(RoutePlan {
            algorithm: RouteAlgorithm::Dijkstra,
            path,
            total_cost: projection.total_cost,
            recharge_stops: projection.recharge_stops,
            segments: projection.segments,
        })
    }
}

/// Select the planner for a given algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Recharge => Box::new(RechargePlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}

//! Battery-aware route planning.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - supported planning strategies
//! - [`RouteManager`] - recharge-station registry and search entry points
//! - [`RouteRequest`] / [`RoutePlan`] - planning input and result
//! - [`project_battery`] - hop-by-hop battery projection along a fixed path
//!
//! # Strategy Pattern
//!
//! Each algorithm is wrapped in a [`RoutePlanner`] implementation selected by
//! [`select_planner`], so [`RouteManager::plan_route`] does not need to know
//! how a particular strategy reaches its answer.
//!
//! # Example
//!
//! ```
//! use droneroute_lib::{Graph, RouteManager};
//!
//! let mut graph = Graph::undirected();
//! let a = graph.insert_vertex("A");
//! let r = graph.insert_vertex("R");
//! let b = graph.insert_vertex("B");
//! graph.insert_edge(a, r, 8.0)?;
//! graph.insert_edge(r, b, 8.0)?;
//!
//! let mut manager = RouteManager::new();
//! manager.add_recharge_station("R");
//! let plan = manager.find_route_with_recharge(&graph, "A", "B", 10.0)?;
//! assert_eq!(plan.path, vec!["A", "R", "B"]);
//! assert_eq!(plan.recharge_stops, vec!["R"]);
//! # Ok::<(), droneroute_lib::Error>(())
//! ```

mod planner;
mod projection;
mod search;

pub use planner::{select_planner, DijkstraPlanner, RechargePlanner, RoutePlanner};
pub use projection::{
    project_battery, project_battery_for_hop, BatteryProjection, ChargeProjection, HopProjection,
};
pub use search::RechargeDetour;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

/// Default battery ceiling used when the caller does not supply one.
pub const DEFAULT_BATTERY_LIMIT: f64 = 50.0;

/// Supported route planning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// State-space search that interleaves travel with recharge decisions.
    #[default]
    Recharge,
    /// Plain shortest path, then a battery projection along it.
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Recharge => "recharge",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "recharge" => Ok(RouteAlgorithm::Recharge),
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            other => Err(Error::InvalidConfig {
                message: format!("unknown route algorithm '{other}'"),
            }),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub algorithm: RouteAlgorithm,
    pub battery_limit: f64,
}

impl RouteRequest {
    /// Request using the recharge-aware search.
    pub fn recharge(
        origin: impl Into<String>,
        destination: impl Into<String>,
        battery_limit: f64,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            algorithm: RouteAlgorithm::Recharge,
            battery_limit,
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    /// Node labels from origin to destination, detours included.
    pub path: Vec<String>,
    pub total_cost: f64,
    /// Nodes where the battery was reset, in travel order.
    pub recharge_stops: Vec<String>,
    /// Maximal stretches travelled between recharges.
    pub segments: Vec<Vec<String>>,
}

impl RoutePlan {
    /// Number of edges travelled.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn origin(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn destination(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Energy used by each segment, resolved against `graph`.
    pub fn segment_costs(&self, graph: &Graph) -> Result<Vec<f64>> {
        let index = graph.label_index();
        self.segments
            .iter()
            .map(|segment| {
                segment.windows(2).try_fold(0.0, |total, pair| {
                    edge_weight(graph, &index, &pair[0], &pair[1]).map(|weight| total + weight)
                })
            })
            .collect()
    }
}

pub(crate) fn edge_weight(
    graph: &Graph,
    index: &HashMap<String, VertexId>,
    from: &str,
    to: &str,
) -> Result<f64> {
    let u = index
        .get(from)
        .copied()
        .ok_or_else(|| graph.vertex_not_found(from))?;
    let v = index
        .get(to)
        .copied()
        .ok_or_else(|| graph.vertex_not_found(to))?;
    graph
        .get_edge(u, v)
        .map(|edge| edge.weight)
        .ok_or_else(|| Error::MissingEdge {
            from: from.to_string(),
            to: to.to_string(),
        })
}

pub(crate) fn validate_battery_limit(limit: f64) -> Result<()> {
    if limit.is_finite() && limit > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidBatteryLimit { limit })
    }
}

/// Registry of recharge stations plus the search entry points that use it.
///
/// Stations are stored by the canonical string form of their label and are
/// only read during a search; the graph is never mutated by planning.
#[derive(Debug, Clone, Default)]
pub struct RouteManager {
    recharge_stations: HashSet<String>,
}

impl RouteManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the vertex labelled `label` as able to fully restore the battery.
    ///
    /// Returns `false` when the label was already registered.
    pub fn add_recharge_station(&mut self, label: impl fmt::Display) -> bool {
        self.recharge_stations.insert(label.to_string())
    }

    pub fn is_recharge_station(&self, label: &str) -> bool {
        self.recharge_stations.contains(label)
    }

    /// Registered station labels in ascending order.
    pub fn recharge_stations(&self) -> BTreeSet<&str> {
        self.recharge_stations.iter().map(String::as_str).collect()
    }

    pub(crate) fn stations(&self) -> &HashSet<String> {
        &self.recharge_stations
    }

    /// Minimum-cost feasible route from `origin_id` to `destination_id`.
    ///
    /// Explores (vertex, remaining battery, cost) states breadth-first,
    /// recharging at stations or detouring to the nearest one when an edge
    /// does not fit the remaining charge. Fails with
    /// [`Error::VertexNotFound`] for unknown labels and
    /// [`Error::NoFeasibleRoute`] when no battery-feasible route exists.
    pub fn find_route_with_recharge(
        &self,
        graph: &Graph,
        origin_id: &str,
        destination_id: &str,
        battery_limit: f64,
    ) -> Result<RoutePlan> {
        search::find_route_with_recharge(
            graph,
            &self.recharge_stations,
            origin_id,
            destination_id,
            battery_limit,
        )
    }

    /// Closest recharge station reachable from `from` without spending more
    /// than `battery_limit`, counting `from` itself.
    pub fn nearest_recharge_station(
        &self,
        graph: &Graph,
        from: VertexId,
        battery_limit: f64,
    ) -> Option<RechargeDetour> {
        let include_all = |_: VertexId, _: &str| false;
        search::nearest_recharge_station(
            graph,
            &self.recharge_stations,
            from,
            battery_limit,
            include_all,
        )
    }

    /// Plan a route with the algorithm named in `request`.
    pub fn plan_route(&self, graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
        let planner = select_planner(request.algorithm);
        planner.plan(
            graph,
            self,
            &request.origin,
            &request.destination,
            request.battery_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!("Dijkstra".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Dijkstra);
        assert_eq!("recharge".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Recharge);
        assert!("a-star".parse::<RouteAlgorithm>().is_err());
    }

    #[test]
    fn stations_are_keyed_by_canonical_label() {
        let mut manager = RouteManager::new();
        assert!(manager.add_recharge_station(7));
        assert!(!manager.add_recharge_station("7"));
        assert!(manager.is_recharge_station("7"));
    }

    #[test]
    fn route_plan_hop_count() {
        let plan = RoutePlan {
            algorithm: RouteAlgorithm::Recharge,
            path: vec!["A".into(), "B".into(), "C".into()],
            total_cost: 3.0,
            recharge_stops: Vec::new(),
            segments: vec![vec!["A".into(), "B".into(), "C".into()]],
        };
        assert_eq!(plan.hop_count(), 2);
        assert_eq!(plan.origin(), Some("A"));
        assert_eq!(plan.destination(), Some("C"));
    }

    #[test]
    fn battery_limit_must_be_positive() {
        assert!(validate_battery_limit(10.0).is_ok());
        assert!(validate_battery_limit(0.0).is_err());
        assert!(validate_battery_limit(f64::NAN).is_err());
    }
}

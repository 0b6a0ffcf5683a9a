//! Battery projection along a fixed path.
//!
//! Given a path chosen without regard to charge, walk it hop by hop and
//! record where the drone would have to stop to recharge. A stop is only
//! usable when the vertex is a registered recharge station.
//!
//! ```
//! use droneroute_lib::{project_battery, Graph, RouteManager};
//!
//! let mut graph = Graph::undirected();
//! let a = graph.insert_vertex("A");
//! let r = graph.insert_vertex("R");
//! let b = graph.insert_vertex("B");
//! graph.insert_edge(a, r, 6.0)?;
//! graph.insert_edge(r, b, 6.0)?;
//!
//! let mut manager = RouteManager::new();
//! manager.add_recharge_station("R");
//!
//! let projection = project_battery(&graph, &manager, &["A", "R", "B"], 10.0)?;
//! assert!(projection.feasible);
//! assert_eq!(projection.recharge_stops, vec!["R"]);
//! assert_eq!(projection.hops[1].charge.warning.as_deref(), Some("RECHARGE"));
//! # Ok::<(), droneroute_lib::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use super::{edge_weight, validate_battery_limit, RouteManager};
use crate::error::{Error, Result};
use crate::graph::Graph;

/// Warning attached to a hop that needs a full battery before departure.
pub const RECHARGE_WARNING: &str = "RECHARGE";
/// Warning attached to a hop that costs more than a full battery.
pub const EXCEEDS_CAPACITY_WARNING: &str = "EXCEEDS_CAPACITY";

/// Battery state for a single hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeProjection {
    /// Charge consumed by this hop.
    pub hop_cost: f64,
    /// Charge consumed up to and including this hop.
    pub cumulative: f64,
    /// Charge left on arrival.
    pub remaining: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Project battery use for one hop.
///
/// When `hop_cost` exceeds `remaining` the drone is assumed to recharge to
/// `battery_limit` before leaving and the projection carries a
/// [`RECHARGE_WARNING`]. A hop longer than `battery_limit` can never be
/// flown; it is flagged with [`EXCEEDS_CAPACITY_WARNING`] and arrives empty.
///
/// Returns the projection and the remaining charge to carry into the next hop.
pub fn project_battery_for_hop(
    hop_cost: f64,
    cumulative: f64,
    remaining: f64,
    battery_limit: f64,
) -> (ChargeProjection, f64) {
    let cumulative = cumulative + hop_cost;
    let (warning, left) = if hop_cost > battery_limit {
        (Some(EXCEEDS_CAPACITY_WARNING.to_string()), 0.0)
    } else if hop_cost > remaining {
        (Some(RECHARGE_WARNING.to_string()), battery_limit - hop_cost)
    } else {
        (None, (remaining - hop_cost).max(0.0))
    };

    (
        ChargeProjection {
            hop_cost,
            cumulative,
            remaining: left,
            warning,
        },
        left,
    )
}

/// Projection for the hop between two consecutive path nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopProjection {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub charge: ChargeProjection,
}

/// Hop-by-hop battery projection for a whole path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryProjection {
    pub hops: Vec<HopProjection>,
    pub total_cost: f64,
    /// Vertices where a recharge is needed, in travel order.
    pub recharge_stops: Vec<String>,
    /// Recharge points that are not registered stations.
    pub forced_stops: Vec<String>,
    pub segments: Vec<Vec<String>>,
    /// `false` when a forced stop or an over-capacity hop occurs.
    pub feasible: bool,
}

/// Walk `path` and project battery use at every hop.
///
/// Fails with [`Error::EmptyRoute`] for an empty path and
/// [`Error::MissingEdge`] when two consecutive nodes are not connected.
pub fn project_battery<S: AsRef<str>>(
    graph: &Graph,
    manager: &RouteManager,
    path: &[S],
    battery_limit: f64,
) -> Result<BatteryProjection> {
    validate_battery_limit(battery_limit)?;
    let first = path.first().ok_or(Error::EmptyRoute)?.as_ref();

    let index = graph.label_index();
    if !index.contains_key(first) {
        return Err(graph.vertex_not_found(first));
    }

    let mut hops = Vec::with_capacity(path.len().saturating_sub(1));
    let mut recharge_stops = Vec::new();
    let mut forced_stops = Vec::new();
    let mut segments = vec![vec![first.to_string()]];
    let mut feasible = true;
    let mut cumulative = 0.0;
    let mut remaining = battery_limit;

    for pair in path.windows(2) {
        let (from, to) = (pair[0].as_ref(), pair[1].as_ref());
        let hop_cost = edge_weight(graph, &index, from, to)?;
        let (charge, left) = project_battery_for_hop(hop_cost, cumulative, remaining, battery_limit);

        match charge.warning.as_deref() {
            Some(EXCEEDS_CAPACITY_WARNING) => feasible = false,
            Some(RECHARGE_WARNING) => {
                recharge_stops.push(from.to_string());
                if !manager.is_recharge_station(from) {
                    forced_stops.push(from.to_string());
                    feasible = false;
                }
                segments.push(vec![from.to_string()]);
            }
            _ => {}
        }
        if let Some(segment) = segments.last_mut() {
            segment.push(to.to_string());
        }

        cumulative = charge.cumulative;
        remaining = left;
        hops.push(HopProjection {
            from: from.to_string(),
            to: to.to_string(),
            charge,
        });
    }

    Ok(BatteryProjection {
        hops,
        total_cost: cumulative,
        recharge_stops,
        forced_stops,
        segments,
        feasible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_within_charge_consumes_it() {
        let (charge, left) = project_battery_for_hop(4.0, 10.0, 6.0, 10.0);
        assert_eq!(charge.cumulative, 14.0);
        assert_eq!(left, 2.0);
        assert!(charge.warning.is_none());
    }

    #[test]
    fn hop_beyond_charge_requests_recharge() {
        let (charge, left) = project_battery_for_hop(7.0, 3.0, 3.0, 10.0);
        assert_eq!(charge.warning.as_deref(), Some(RECHARGE_WARNING));
        assert_eq!(left, 3.0);
    }

    #[test]
    fn hop_beyond_capacity_is_flagged() {
        let (charge, left) = project_battery_for_hop(12.0, 0.0, 10.0, 10.0);
        assert_eq!(charge.warning.as_deref(), Some(EXCEEDS_CAPACITY_WARNING));
        assert_eq!(left, 0.0);
    }

    #[test]
    fn recharge_at_non_station_is_forced() {
        let mut graph = Graph::undirected();
        let a = graph.insert_vertex("A");
        let b = graph.insert_vertex("B");
        let c = graph.insert_vertex("C");
        graph.insert_edge(a, b, 6.0).unwrap();
        graph.insert_edge(b, c, 6.0).unwrap();

        let projection =
            project_battery(&graph, &RouteManager::new(), &["A", "B", "C"], 10.0).unwrap();
        assert!(!projection.feasible);
        assert_eq!(projection.forced_stops, vec!["B"]);
        assert_eq!(projection.total_cost, 12.0);
        assert_eq!(
            projection.segments,
            vec![vec!["A", "B"], vec!["B", "C"]]
        );
    }

    #[test]
    fn hop_that_empties_battery_needs_no_recharge() {
        let (charge, left) = project_battery_for_hop(6.0, 4.0, 6.0, 10.0);
        assert!(charge.warning.is_none());
        assert_eq!(left, 0.0);

        let mut graph = Graph::undirected();
        let a = graph.insert_vertex("A");
        let b = graph.insert_vertex("B");
        let c = graph.insert_vertex("C");
        graph.insert_edge(a, b, 4.0).unwrap();
        graph.insert_edge(b, c, 6.0).unwrap();
        let projection =
            project_battery(&graph, &RouteManager::new(), &["A", "B", "C"], 10.0).unwrap();
        assert!(projection.feasible);
        assert!(projection.recharge_stops.is_empty());
        assert_eq!(projection.hops[1].charge.remaining, 0.0);
    }

    #[test]
    fn missing_edge_is_reported() {
        let mut graph = Graph::undirected();
        graph.insert_vertex("A");
        graph.insert_vertex("B");
        let err = project_battery(&graph, &RouteManager::new(), &["A", "B"], 10.0).unwrap_err();
        assert!(matches!(err, Error::MissingEdge { .. }));
    }

    #[test]
    fn single_node_path_is_trivially_feasible() {
        let mut graph = Graph::undirected();
        graph.insert_vertex("A");
        let projection = project_battery(&graph, &RouteManager::new(), &["A"], 10.0).unwrap();
        assert!(projection.feasible);
        assert!(projection.hops.is_empty());
        assert_eq!(projection.segments, vec![vec!["A"]]);
    }
}

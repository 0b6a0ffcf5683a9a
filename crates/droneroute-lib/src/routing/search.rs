//! Breadth-first exploration over (vertex, remaining battery, cost) states.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{validate_battery_limit, RouteAlgorithm, RoutePlan};
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

/// Costs closer than this are treated as equal when comparing candidates.
const COST_EPSILON: f64 = 1e-9;

/// Route from a vertex to the recharge station nearest to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RechargeDetour {
    pub station: VertexId,
    /// Vertices after the starting vertex, ending with the station.
    pub path: Vec<VertexId>,
    pub cost: f64,
}

#[derive(Debug, Clone)]
struct SearchState {
    vertex: VertexId,
    path: Vec<String>,
    remaining: f64,
    cost: f64,
    recharge_stops: Vec<String>,
    segments: Vec<Vec<String>>,
}

impl SearchState {
    fn start(vertex: VertexId, label: String, battery_limit: f64) -> Self {
        Self {
            vertex,
            path: vec![label.clone()],
            remaining: battery_limit,
            cost: 0.0,
            recharge_stops: Vec::new(),
            segments: vec![vec![label]],
        }
    }

    fn travel(&self, next: VertexId, label: &str, weight: f64) -> Self {
        let mut successor = self.clone();
        successor.vertex = next;
        successor.path.push(label.to_string());
        successor.remaining -= weight;
        successor.cost += weight;
        if let Some(segment) = successor.segments.last_mut() {
            segment.push(label.to_string());
        }
        successor
    }

    fn recharge_here(&self, label: &str, battery_limit: f64) -> Self {
        let mut successor = self.clone();
        successor.remaining = battery_limit;
        successor.recharge_stops.push(label.to_string());
        successor.segments.push(vec![label.to_string()]);
        successor
    }

    fn detour(&self, detour: &RechargeDetour, labels: &[String], battery_limit: f64) -> Self {
        let mut successor = self.clone();
        successor.vertex = detour.station;
        successor.path.extend(labels.iter().cloned());
        if let Some(segment) = successor.segments.last_mut() {
            segment.extend(labels.iter().cloned());
        }
        successor.cost += detour.cost;
        successor.remaining = battery_limit;
        if let Some(station) = labels.last() {
            successor.recharge_stops.push(station.clone());
            successor.segments.push(vec![station.clone()]);
        }
        successor
    }

    /// Lower cost wins; equal costs prefer fewer recharge stops, then the
    /// lexicographically smaller path.
    fn beats(&self, other: &SearchState) -> bool {
        if self.cost < other.cost - COST_EPSILON {
            return true;
        }
        if (self.cost - other.cost).abs() <= COST_EPSILON {
            return (self.recharge_stops.len(), &self.path)
                < (other.recharge_stops.len(), &other.path);
        }
        false
    }

    fn into_plan(self) -> RoutePlan {
        RoutePlan {
            algorithm: RouteAlgorithm::Recharge,
            path: self.path,
            total_cost: self.cost,
            recharge_stops: self.recharge_stops,
            segments: self.segments,
        }
    }
}

/// Non-dominated (remaining battery, cost, recharge stops) labels per vertex.
///
/// A state is dominated when an earlier state at the same vertex had at least
/// as much charge, no higher cost and no more recharge stops.
#[derive(Debug, Default)]
struct Frontier {
    labels: HashMap<VertexId, Vec<(f64, f64, usize)>>,
}

impl Frontier {
    fn dominates(&self, state: &SearchState) -> bool {
        let stops = state.recharge_stops.len();
        self.labels.get(&state.vertex).is_some_and(|seen| {
            seen.iter().any(|(battery, cost, seen_stops)| {
                *battery >= state.remaining && *cost <= state.cost && *seen_stops <= stops
            })
        })
    }

    fn record(&mut self, state: &SearchState) {
        let stops = state.recharge_stops.len();
        let seen = self.labels.entry(state.vertex).or_default();
        seen.retain(|(battery, cost, seen_stops)| {
            !(*battery <= state.remaining && *cost >= state.cost && *seen_stops >= stops)
        });
        seen.push((state.remaining, state.cost, stops));
    }
}

pub(super) fn find_route_with_recharge(
    graph: &Graph,
    stations: &HashSet<String>,
    origin_id: &str,
    destination_id: &str,
    battery_limit: f64,
) -> Result<RoutePlan> {
    let index = graph.label_index();
    let origin = index
        .get(origin_id)
        .copied()
        .ok_or_else(|| graph.vertex_not_found(origin_id))?;
    let destination = index
        .get(destination_id)
        .copied()
        .ok_or_else(|| graph.vertex_not_found(destination_id))?;

    if origin == destination {
        return Ok(RoutePlan {
            algorithm: RouteAlgorithm::Recharge,
            path: vec![origin_id.to_string()],
            total_cost: 0.0,
            recharge_stops: Vec::new(),
            segments: vec![vec![origin_id.to_string()]],
        });
    }
    validate_battery_limit(battery_limit)?;

    let labels: HashMap<VertexId, String> = graph
        .vertices()
        .filter_map(|v| graph.label(v).map(|label| (v, label.to_string())))
        .collect();
    let label_of = |vertex: VertexId| labels.get(&vertex).map(String::as_str).unwrap_or_default();

    let mut queue = VecDeque::new();
    queue.push_back(SearchState::start(
        origin,
        origin_id.to_string(),
        battery_limit,
    ));

    let mut frontier = Frontier::default();
    let mut best: Option<SearchState> = None;
    let mut expanded = 0usize;
    let mut pruned = 0usize;

    while let Some(state) = queue.pop_front() {
        if state.vertex == destination {
            if best.as_ref().map_or(true, |current| state.beats(current)) {
                best = Some(state);
            }
            continue;
        }

        if frontier.dominates(&state) {
            pruned += 1;
            continue;
        }
        frontier.record(&state);
        expanded += 1;

        let current_label = label_of(state.vertex);
        let mut wants_recharge = false;

        for (neighbour, weight) in graph.weighted_neighbors(state.vertex) {
            let neighbour_label = label_of(neighbour);
            if weight <= state.remaining {
                queue.push_back(state.travel(neighbour, neighbour_label, weight));
            }
            if weight > state.remaining || stations.contains(neighbour_label) {
                wants_recharge = true;
            }
        }

        if !wants_recharge {
            continue;
        }

        let already_used = |label: &str| state.recharge_stops.iter().any(|stop| stop == label);
        if stations.contains(current_label) && !already_used(current_label) {
            queue.push_back(state.recharge_here(current_label, battery_limit));
        } else if let Some(detour) = nearest_recharge_station(
            graph,
            stations,
            state.vertex,
            state.remaining,
            |vertex, label| vertex == state.vertex || already_used(label),
        ) {
            let detour_labels: Vec<String> = detour
                .path
                .iter()
                .map(|vertex| label_of(*vertex).to_string())
                .collect();
            debug!(
                from = current_label,
                station = detour_labels.last().map(String::as_str).unwrap_or_default(),
                cost = detour.cost,
                "detouring to recharge station"
            );
            queue.push_back(state.detour(&detour, &detour_labels, battery_limit));
        }
    }

    debug!(expanded, pruned, "battery-constrained search finished");

    best.map(SearchState::into_plan)
        .ok_or_else(|| Error::NoFeasibleRoute {
            origin: origin_id.to_string(),
            destination: destination_id.to_string(),
            battery_limit,
        })
}

/// Breadth-first search for the first recharge station reachable from
/// `from` with accumulated cost at most `budget`.
///
/// Stations for which `skip(vertex, label)` returns `true` are passed over
/// but may still be travelled through.
pub(super) fn nearest_recharge_station<F>(
    graph: &Graph,
    stations: &HashSet<String>,
    from: VertexId,
    budget: f64,
    skip: F,
) -> Option<RechargeDetour>
where
    F: Fn(VertexId, &str) -> bool,
{
    let mut queue: VecDeque<(VertexId, f64, Vec<VertexId>)> = VecDeque::new();
    let mut visited = HashSet::new();
    queue.push_back((from, 0.0, Vec::new()));

    while let Some((vertex, cost, path)) = queue.pop_front() {
        let label = graph.label(vertex)?.to_string();
        if stations.contains(&label) && !skip(vertex, &label) {
            return Some(RechargeDetour {
                station: vertex,
                path,
                cost,
            });
        }

        if !visited.insert(vertex) {
            continue;
        }

        for (neighbour, weight) in graph.weighted_neighbors(vertex) {
            let total = cost + weight;
            if total <= budget {
                let mut next_path = path.clone();
                next_path.push(neighbour);
                queue.push_back((neighbour, total, next_path));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(weights: &[f64]) -> (Graph, Vec<VertexId>) {
        let mut graph = Graph::undirected();
        let ids: Vec<VertexId> = (0..=weights.len())
            .map(|i| graph.insert_vertex(format!("N{i}")))
            .collect();
        for (i, weight) in weights.iter().enumerate() {
            graph.insert_edge(ids[i], ids[i + 1], *weight).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn direct_route_without_recharge() {
        let (graph, _) = line(&[3.0, 4.0]);
        let plan =
            find_route_with_recharge(&graph, &HashSet::new(), "N0", "N2", 10.0).unwrap();
        assert_eq!(plan.path, vec!["N0", "N1", "N2"]);
        assert_eq!(plan.total_cost, 7.0);
        assert!(plan.recharge_stops.is_empty());
        assert_eq!(plan.segments, vec![vec!["N0", "N1", "N2"]]);
    }

    #[test]
    fn recharges_at_intermediate_station() {
        let (graph, _) = line(&[6.0, 6.0]);
        let stations = HashSet::from(["N1".to_string()]);
        let plan = find_route_with_recharge(&graph, &stations, "N0", "N2", 8.0).unwrap();
        assert_eq!(plan.path, vec!["N0", "N1", "N2"]);
        assert_eq!(plan.recharge_stops, vec!["N1"]);
        assert_eq!(plan.segments, vec![vec!["N0", "N1"], vec!["N1", "N2"]]);
        assert_eq!(plan.total_cost, 12.0);
    }

    #[test]
    fn fails_when_battery_too_small() {
        let (graph, _) = line(&[6.0, 6.0]);
        let err = find_route_with_recharge(&graph, &HashSet::new(), "N0", "N2", 8.0).unwrap_err();
        assert!(matches!(err, Error::NoFeasibleRoute { .. }));
    }

    #[test]
    fn nearest_station_respects_budget() {
        let (graph, ids) = line(&[2.0, 2.0, 2.0]);
        let stations = HashSet::from(["N3".to_string()]);
        assert!(nearest_recharge_station(&graph, &stations, ids[0], 5.0, |_, _| false).is_none());

        let detour =
            nearest_recharge_station(&graph, &stations, ids[0], 6.0, |_, _| false).unwrap();
        assert_eq!(detour.station, ids[3]);
        assert_eq!(detour.path, vec![ids[1], ids[2], ids[3]]);
        assert_eq!(detour.cost, 6.0);
    }

    #[test]
    fn nearest_station_counts_start_unless_skipped() {
        let (graph, ids) = line(&[1.0]);
        let stations = HashSet::from(["N0".to_string(), "N1".to_string()]);
        let here = nearest_recharge_station(&graph, &stations, ids[0], 5.0, |_, _| false).unwrap();
        assert_eq!(here.station, ids[0]);
        assert!(here.path.is_empty());

        let next =
            nearest_recharge_station(&graph, &stations, ids[0], 5.0, |v, _| v == ids[0]).unwrap();
        assert_eq!(next.station, ids[1]);
    }

    #[test]
    fn equal_cost_ties_prefer_fewer_stops_then_path_order() {
        let (_, ids) = line(&[1.0]);
        let mut a = SearchState::start(ids[1], "A".into(), 10.0);
        a.cost = 5.0;
        a.path = vec!["A".into(), "C".into()];
        let mut b = a.clone();
        b.path = vec!["A".into(), "B".into()];
        assert!(b.beats(&a));
        assert!(!a.beats(&b));

        b.recharge_stops.push("B".into());
        assert!(a.beats(&b));
    }
}

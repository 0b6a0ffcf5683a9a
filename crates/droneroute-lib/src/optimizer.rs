//! History-first route suggestions.
//!
//! [`RouteOptimizer`] answers "how should a drone get from A to B" from the
//! tracker's ranked history before paying for a full battery search:
//!
//! 1. a frequent route that starts at A and ends at B is reused as is;
//! 2. otherwise frequent routes visiting both A and B nominate the most
//!    visited other node as a waypoint and `A → waypoint → B` is proposed;
//! 3. otherwise the configured planner runs, or an unresolved `[A, B]`
//!    placeholder is returned when no search context is available.
//!
//! Each decision is appended to a human-readable report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::routing::{RouteAlgorithm, RouteManager, RoutePlan, RouteRequest};
use crate::tracker::{RouteKey, RouteTracker};

/// Everything needed to fall back to a live search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a Graph,
    pub manager: &'a RouteManager,
    pub battery_limit: f64,
    pub algorithm: RouteAlgorithm,
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// A registered route with matching endpoints.
    Exact,
    /// Synthesized through the most visited node of related routes.
    Stitched,
    /// Produced by a live search.
    Computed,
    /// No history and no search context; the path is only `[origin, destination]`.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSuggestion {
    pub source: SuggestionSource,
    pub path: Vec<String>,
    /// Registration count of the reused route, for exact matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RoutePlan>,
}

impl RouteSuggestion {
    fn from_history(source: SuggestionSource, path: Vec<String>, frequency: Option<u64>) -> Self {
        Self {
            source,
            path,
            frequency,
            plan: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    exact_match_window: usize,
    partial_match_window: usize,
    pattern_window: usize,
    report: Vec<String>,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RouteOptimizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            exact_match_window: config.exact_match_window,
            partial_match_window: config.partial_match_window,
            pattern_window: config.pattern_window,
            report: Vec::new(),
        }
    }

    /// Suggest a route from `origin` to `destination`.
    ///
    /// Errors only come from the fallback search.
    pub fn suggest_optimized_route(
        &mut self,
        tracker: &RouteTracker,
        fallback: Option<SearchContext<'_>>,
        origin: &str,
        destination: &str,
    ) -> Result<RouteSuggestion> {
        if let Some((key, frequency)) = self.exact_match(tracker, origin, destination) {
            self.report.push(format!(
                "Using frequent exact route: {key} (seen {frequency} times)"
            ));
            let path = key.nodes().map(str::to_string).collect();
            return Ok(RouteSuggestion::from_history(
                SuggestionSource::Exact,
                path,
                Some(frequency),
            ));
        }

        if let Some(waypoint) = self.best_waypoint(tracker, origin, destination) {
            self.report.push(format!(
                "Stitching route through frequently visited node {waypoint}: \
                 {origin}→{waypoint}→{destination}"
            ));
            let path = vec![origin.to_string(), waypoint, destination.to_string()];
            return Ok(RouteSuggestion::from_history(
                SuggestionSource::Stitched,
                path,
                None,
            ));
        }

        let Some(context) = fallback else {
            self.report.push(format!(
                "No history for {origin}→{destination}; route must be computed"
            ));
            return Ok(RouteSuggestion::from_history(
                SuggestionSource::Unresolved,
                vec![origin.to_string(), destination.to_string()],
                None,
            ));
        };

        let request = RouteRequest::recharge(origin, destination, context.battery_limit)
            .with_algorithm(context.algorithm);
        let plan = context.manager.plan_route(context.graph, &request)?;
        self.report.push(format!(
            "Computed new route with {} search: {} (cost {})",
            context.algorithm,
            plan.path.join("→"),
            plan.total_cost
        ));
        Ok(RouteSuggestion {
            source: SuggestionSource::Computed,
            path: plan.path.clone(),
            frequency: None,
            plan: Some(plan),
        })
    }

    fn exact_match(
        &self,
        tracker: &RouteTracker,
        origin: &str,
        destination: &str,
    ) -> Option<(RouteKey, u64)> {
        tracker
            .get_most_frequent_routes(self.exact_match_window)
            .into_iter()
            .map(|(key, count)| (RouteKey::from_key(key), count))
            .find(|(key, _)| key.first() == Some(origin) && key.last() == Some(destination))
    }

    /// Most visited node, other than the endpoints, among ranked routes that
    /// pass through both endpoints. Ties go to the smaller label.
    fn best_waypoint(
        &self,
        tracker: &RouteTracker,
        origin: &str,
        destination: &str,
    ) -> Option<String> {
        let total = tracker.total_node_visits();
        if total == 0 {
            return None;
        }

        let related: Vec<RouteKey> = tracker
            .get_most_frequent_routes(self.partial_match_window)
            .into_iter()
            .map(|(key, _)| RouteKey::from_key(key))
            .filter(|key| key.contains_node(origin) && key.contains_node(destination))
            .collect();
        debug!(origin, destination, related = related.len(), "scanning related routes");

        let mut best: Option<(f64, &str)> = None;
        for node in related.iter().flat_map(|key| key.nodes()) {
            if node == origin || node == destination {
                continue;
            }
            let score = tracker.node_visits(node) as f64 / total as f64;
            let better = match best {
                None => true,
                Some((best_score, best_label)) => {
                    score > best_score || (score == best_score && node < best_label)
                }
            };
            if better {
                best = Some((score, node));
            }
        }
        best.map(|(_, label)| label.to_string())
    }

    /// Visit counts weighted by route frequency across the ranked routes.
    pub fn analyze_route_patterns(&mut self, tracker: &RouteTracker) -> BTreeMap<String, u64> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        let ranked = tracker.get_most_frequent_routes(self.pattern_window);
        for (key, frequency) in &ranked {
            let key = RouteKey::from_key(key.as_str());
            for node in key.nodes() {
                *counts.entry(node.to_string()).or_insert(0) += frequency;
            }
        }

        let summary = counts
            .iter()
            .map(|(node, count)| format!("{node}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.report.push(format!(
            "Pattern analysis over {} routes: {summary}",
            ranked.len()
        ));
        counts
    }

    /// Every report entry, one per line, oldest first.
    pub fn get_optimization_report(&self) -> String {
        self.report.join("\n")
    }

    pub fn report_entries(&self) -> &[String] {
        &self.report
    }

    pub fn clear_report(&mut self) {
        self.report.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> RouteTracker {
        let mut tracker = RouteTracker::new();
        for _ in 0..3 {
            tracker.register_route(&["A", "B", "C"]).unwrap();
        }
        for _ in 0..2 {
            tracker.register_route(&["A", "D", "E"]).unwrap();
        }
        tracker.register_route(&["D", "E", "F"]).unwrap();
        tracker
    }

    #[test]
    fn exact_match_reuses_history() {
        let tracker = history();
        let mut optimizer = RouteOptimizer::default();
        let suggestion = optimizer
            .suggest_optimized_route(&tracker, None, "A", "C")
            .unwrap();
        assert_eq!(suggestion.source, SuggestionSource::Exact);
        assert_eq!(suggestion.path, vec!["A", "B", "C"]);
        assert_eq!(suggestion.frequency, Some(3));
        assert!(optimizer.get_optimization_report().contains("A→B→C"));
    }

    #[test]
    fn exact_match_compares_whole_labels() {
        let mut tracker = RouteTracker::new();
        tracker.register_route(&["A1", "B", "C1"]).unwrap();
        let mut optimizer = RouteOptimizer::default();
        let suggestion = optimizer
            .suggest_optimized_route(&tracker, None, "A", "C")
            .unwrap();
        assert_eq!(suggestion.source, SuggestionSource::Unresolved);
    }

    #[test]
    fn partial_match_stitches_through_busiest_node() {
        let tracker = history();
        let mut optimizer = RouteOptimizer::default();
        // D→E→F and A→D→E both contain D and E; A has 5 visits, F has 1.
        let suggestion = optimizer
            .suggest_optimized_route(&tracker, None, "E", "D")
            .unwrap();
        assert_eq!(suggestion.source, SuggestionSource::Stitched);
        assert_eq!(suggestion.path, vec!["E", "A", "D"]);
    }

    #[test]
    fn no_history_yields_placeholder() {
        let mut optimizer = RouteOptimizer::default();
        let suggestion = optimizer
            .suggest_optimized_route(&RouteTracker::new(), None, "X", "Y")
            .unwrap();
        assert_eq!(suggestion.source, SuggestionSource::Unresolved);
        assert_eq!(suggestion.path, vec!["X", "Y"]);
        assert_eq!(optimizer.report_entries().len(), 1);
    }

    #[test]
    fn falls_back_to_search() {
        let mut graph = Graph::undirected();
        let x = graph.insert_vertex("X");
        let y = graph.insert_vertex("Y");
        graph.insert_edge(x, y, 3.0).unwrap();
        let manager = RouteManager::new();
        let context = SearchContext {
            graph: &graph,
            manager: &manager,
            battery_limit: 10.0,
            algorithm: RouteAlgorithm::Recharge,
        };

        let mut optimizer = RouteOptimizer::default();
        let suggestion = optimizer
            .suggest_optimized_route(&RouteTracker::new(), Some(context), "X", "Y")
            .unwrap();
        assert_eq!(suggestion.source, SuggestionSource::Computed);
        assert_eq!(suggestion.plan.map(|plan| plan.total_cost), Some(3.0));
    }

    #[test]
    fn pattern_analysis_weights_by_frequency() {
        let tracker = history();
        let mut optimizer = RouteOptimizer::default();
        let counts = optimizer.analyze_route_patterns(&tracker);
        assert_eq!(counts["A"], 5);
        assert_eq!(counts["E"], 3);
        assert_eq!(counts["F"], 1);
        assert!(optimizer
            .get_optimization_report()
            .starts_with("Pattern analysis over 3 routes"));
    }
}

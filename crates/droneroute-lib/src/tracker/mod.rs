//! Historical route analytics.
//!
//! This module provides:
//! - [`RouteKey`] - canonical string form of a node-label sequence
//! - [`FrequencyTree`] - AVL tree counting occurrences per route key
//! - [`RouteTracker`] - registers completed routes, ranks them by frequency
//!   and aggregates per-node visit counts into a [`ChainedHashMap`]

mod avl;

pub use avl::{FrequencyTree, InOrder};

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hash_table::{ChainedHashMap, DEFAULT_BUCKETS};
use crate::routing::RoutePlan;

/// Separator placed between node labels in a route key.
pub const ROUTE_SEPARATOR: &str = "→";

/// Canonical key for an ordered sequence of node labels.
///
/// Two keys are equal exactly when their node sequences are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// Join `path` with [`ROUTE_SEPARATOR`]. Empty paths are rejected.
    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::EmptyRoute);
        }
        let joined = path
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(ROUTE_SEPARATOR);
        Ok(Self(joined))
    }

    /// Wrap an already-serialized key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Node labels making up the route.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split(ROUTE_SEPARATOR)
    }

    pub fn first(&self) -> Option<&str> {
        self.nodes().next()
    }

    pub fn last(&self) -> Option<&str> {
        self.nodes().last()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes().any(|node| node == label)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordering applied to node-visit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitOrder {
    /// Hash table order: bucket, then insertion order within the bucket.
    #[default]
    Bucket,
    /// Highest visit count first; ties by label ascending.
    CountDesc,
    /// Label ascending.
    Label,
}

/// Registers completed routes and answers frequency queries.
#[derive(Debug, Clone)]
pub struct RouteTracker {
    tree: FrequencyTree,
    node_visits: HashMap<String, u64>,
    visit_order: Vec<String>,
    visit_table: Option<ChainedHashMap<u64>>,
    visit_buckets: usize,
    total_registrations: u64,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::with_visit_buckets(DEFAULT_BUCKETS)
    }

    /// Tracker whose on-demand visit table uses `buckets` chains.
    pub fn with_visit_buckets(buckets: usize) -> Self {
        Self {
            tree: FrequencyTree::new(),
            node_visits: HashMap::new(),
            visit_order: Vec::new(),
            visit_table: None,
            visit_buckets: buckets.max(1),
            total_registrations: 0,
        }
    }

    /// Record one traversal of `path`, returning the route's new frequency.
    ///
    /// Every label in the path has its visit counter bumped once per
    /// occurrence. A previously materialized visit table is dropped since its
    /// counts no longer reflect the tracker.
    pub fn register_route<S: AsRef<str>>(&mut self, path: &[S]) -> Result<u64> {
        let key = RouteKey::from_path(path)?;
        let frequency = self.tree.increment(key.as_str());

        for node in path.iter().map(AsRef::as_ref) {
            match self.node_visits.get_mut(node) {
                Some(count) => *count += 1,
                None => {
                    self.node_visits.insert(node.to_string(), 1);
                    self.visit_order.push(node.to_string());
                }
            }
        }

        self.total_registrations += 1;
        self.visit_table = None;
        debug!(route = %key, frequency, "registered route");
        Ok(frequency)
    }

    /// Register the path of a computed plan. The plan's cost is not counted.
    pub fn register_plan(&mut self, plan: &RoutePlan) -> Result<u64> {
        debug!(cost = plan.total_cost, "registering planned route");
        self.register_route(&plan.path)
    }

    /// How many times `path` has been registered.
    pub fn frequency<S: AsRef<str>>(&self, path: &[S]) -> u64 {
        RouteKey::from_path(path)
            .ok()
            .and_then(|key| self.tree.get(key.as_str()))
            .unwrap_or(0)
    }

    /// Number of distinct routes.
    pub fn route_count(&self) -> usize {
        self.tree.len()
    }

    pub fn total_registrations(&self) -> u64 {
        self.total_registrations
    }

    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Routes in ascending key order with their counts.
    pub fn routes_in_order(&self) -> InOrder<'_> {
        self.tree.iter()
    }

    /// The `top_n` most frequent routes, highest count first.
    ///
    /// Equal counts keep ascending key order.
    pub fn get_most_frequent_routes(&self, top_n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .tree
            .iter()
            .map(|(key, count)| (key.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n);
        ranked
    }

    /// Raw visit count for a node label.
    pub fn node_visits(&self, label: &str) -> u64 {
        self.node_visits.get(label).copied().unwrap_or(0)
    }

    /// Total of all node visit counters.
    pub fn total_node_visits(&self) -> u64 {
        self.node_visits.values().sum()
    }

    /// Rebuild the visit table from the current counters.
    pub fn create_visit_table(&mut self, buckets: usize) {
        let table = self.build_visit_table(buckets);
        self.visit_buckets = table.bucket_count();
        self.visit_table = Some(table);
    }

    fn build_visit_table(&self, buckets: usize) -> ChainedHashMap<u64> {
        let mut table = ChainedHashMap::new(buckets);
        for label in &self.visit_order {
            if let Some(count) = self.node_visits.get(label) {
                table.put(label.clone(), *count);
            }
        }
        table
    }

    /// Entries of the materialized visit table.
    ///
    /// Fails with [`Error::UninitializedVisitTable`] until
    /// [`create_visit_table`](Self::create_visit_table) has run since the last
    /// registration.
    pub fn node_visit_stats(&self, order: VisitOrder) -> Result<Vec<(String, u64)>> {
        let table = self
            .visit_table
            .as_ref()
            .ok_or(Error::UninitializedVisitTable)?;
        Ok(ordered_stats(table, order))
    }

    /// Visit statistics, materializing the table first when needed.
    pub fn get_node_visits_stats(&mut self, order: VisitOrder) -> Vec<(String, u64)> {
        let table = match self.visit_table.take() {
            Some(table) => table,
            None => self.build_visit_table(self.visit_buckets),
        };
        let stats = ordered_stats(&table, order);
        self.visit_table = Some(table);
        stats
    }

    /// Drop every registered route and counter.
    pub fn reset(&mut self) {
        self.tree.clear();
        self.node_visits.clear();
        self.visit_order.clear();
        self.visit_table = None;
        self.total_registrations = 0;
    }
}

fn ordered_stats(table: &ChainedHashMap<u64>, order: VisitOrder) -> Vec<(String, u64)> {
    let mut stats: Vec<(String, u64)> = table
        .items()
        .map(|(label, count)| (label.to_string(), *count))
        .collect();

    match order {
        VisitOrder::Bucket => {}
        VisitOrder::CountDesc => {
            stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        }
        VisitOrder::Label => stats.sort_by(|a, b| a.0.cmp(&b.0)),
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_key_joins_with_arrow() {
        let key = RouteKey::from_path(&["A", "B", "C"]).unwrap();
        assert_eq!(key.as_str(), "A→B→C");
        assert_eq!(key.first(), Some("A"));
        assert_eq!(key.last(), Some("C"));
        assert!(key.contains_node("B"));
        assert!(!key.contains_node("AB"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut tracker = RouteTracker::new();
        let empty: [&str; 0] = [];
        assert!(matches!(
            tracker.register_route(&empty),
            Err(Error::EmptyRoute)
        ));
        assert_eq!(tracker.total_registrations(), 0);
    }

    #[test]
    fn stats_require_materialized_table() {
        let mut tracker = RouteTracker::new();
        tracker.register_route(&["A", "B"]).unwrap();
        assert!(matches!(
            tracker.node_visit_stats(VisitOrder::Label),
            Err(Error::UninitializedVisitTable)
        ));

        tracker.create_visit_table(4);
        assert_eq!(tracker.node_visit_stats(VisitOrder::Label).unwrap().len(), 2);

        // New registrations invalidate the snapshot.
        tracker.register_route(&["B", "C"]).unwrap();
        assert!(tracker.node_visit_stats(VisitOrder::Label).is_err());
    }

    #[test]
    fn on_demand_stats_materialize() {
        let mut tracker = RouteTracker::new();
        tracker.register_route(&["X", "Y", "X"]).unwrap();
        let stats = tracker.get_node_visits_stats(VisitOrder::CountDesc);
        assert_eq!(
            stats,
            vec![("X".to_string(), 2), ("Y".to_string(), 1)]
        );
        // The table built on demand stays available to the strict query.
        let mut by_label = stats;
        by_label.sort();
        assert_eq!(tracker.node_visit_stats(VisitOrder::Label).unwrap(), by_label);
    }

    #[test]
    fn on_demand_stats_rebuild_after_registration() {
        let mut tracker = RouteTracker::with_visit_buckets(3);
        tracker.register_route(&["A", "B"]).unwrap();
        tracker.create_visit_table(3);
        tracker.register_route(&["B", "C"]).unwrap();

        let stats = tracker.get_node_visits_stats(VisitOrder::Label);
        assert_eq!(
            stats,
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
        assert!(tracker.node_visit_stats(VisitOrder::Bucket).is_ok());
    }

    #[test]
    fn ranking_ties_fall_back_to_key_order() {
        let mut tracker = RouteTracker::new();
        tracker.register_route(&["C", "D"]).unwrap();
        tracker.register_route(&["A", "B"]).unwrap();
        tracker.register_route(&["B", "C"]).unwrap();
        tracker.register_route(&["B", "C"]).unwrap();

        let ranked = tracker.get_most_frequent_routes(3);
        assert_eq!(
            ranked,
            vec![
                ("B→C".to_string(), 2),
                ("A→B".to_string(), 1),
                ("C→D".to_string(), 1),
            ]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = RouteTracker::new();
        tracker.register_route(&["A"]).unwrap();
        tracker.reset();
        assert_eq!(tracker.route_count(), 0);
        assert_eq!(tracker.node_visits("A"), 0);
        assert!(tracker.get_most_frequent_routes(5).is_empty());
    }
}

//! Drone routing library entry points.
//!
//! This crate models delivery networks as weighted graphs, plans routes that
//! respect a battery ceiling by recharging at designated stations, records
//! flown routes in a frequency tracker and suggests future routes from that
//! history. Higher-level consumers (the CLI) should only depend on the items
//! exported here instead of reimplementing behavior.
//!

pub mod config;
pub mod error;
pub mod graph;
pub mod hash_table;
pub mod network;
pub mod optimizer;
pub mod output;
pub mod path;
pub mod routing;
pub mod session;
pub mod tracker;
pub mod traversal;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use graph::{Direction, Edge, EdgeId, Graph, Label, Vertex, VertexId};
pub use hash_table::ChainedHashMap;
pub use network::{DeliveryNetwork, NetworkDocument, NodeRole};
pub use optimizer::{RouteOptimizer, RouteSuggestion, SearchContext, SuggestionSource};
pub use output::{RouteLeg, RouteRenderMode, RouteSummary};
pub use path::{
    all_pairs_shortest_paths, minimum_spanning_tree, shortest_distances, shortest_path,
    DistanceTable,
};
pub use routing::{
    project_battery, select_planner, BatteryProjection, RouteAlgorithm, RouteManager, RoutePlan,
    RoutePlanner, RouteRequest, DEFAULT_BATTERY_LIMIT,
};
pub use session::{load_orders, DeliveryOrder, DeliverySession, SessionSummary};
pub use tracker::{RouteKey, RouteTracker, VisitOrder, ROUTE_SEPARATOR};
pub use traversal::{bfs, dfs, topological_sort};

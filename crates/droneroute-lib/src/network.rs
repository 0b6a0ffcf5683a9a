//! Delivery networks loaded from JSON documents.
//!
//! A network document lists labelled nodes with a [`NodeRole`] and weighted
//! edges between them:
//!
//! ```json
//! {
//!   "directed": false,
//!   "nodes": [{ "label": "A", "role": "warehouse" }, { "label": "R1", "role": "recharge" }],
//!   "edges": [{ "from": "A", "to": "R1", "weight": 5.0 }]
//! }
//! ```
//!
//! Every `recharge` node is registered as a recharge station.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, Label, VertexId};
use crate::routing::RouteManager;

/// Function of a node within the delivery network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Warehouse,
    Recharge,
    Client,
    #[default]
    Intermediate,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            NodeRole::Warehouse => "warehouse",
            NodeRole::Recharge => "recharge",
            NodeRole::Client => "client",
            NodeRole::Intermediate => "intermediate",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub label: Label,
    #[serde(default)]
    pub role: NodeRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub from: Label,
    pub to: Label,
    pub weight: f64,
}

/// Serialized form of a delivery network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkDocument {
    #[serde(default)]
    pub directed: bool,
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

/// Graph plus recharge-station registry and node roles.
#[derive(Debug, Clone)]
pub struct DeliveryNetwork {
    graph: Graph,
    manager: RouteManager,
    roles: Vec<(String, NodeRole)>,
}

impl DeliveryNetwork {
    /// Build a network from an already parsed document.
    ///
    /// Fails with [`Error::DuplicateLabel`] when two nodes share a label and
    /// with [`Error::VertexNotFound`] when an edge names an undeclared node.
    pub fn from_document(document: &NetworkDocument) -> Result<Self> {
        let mut graph = Graph::new(document.directed);
        let mut manager = RouteManager::new();
        let mut ids: HashMap<String, VertexId> = HashMap::with_capacity(document.nodes.len());
        let mut roles = Vec::with_capacity(document.nodes.len());

        for node in &document.nodes {
            let label = node.label.to_string();
            if ids.contains_key(&label) {
                return Err(Error::DuplicateLabel { label });
            }
            let id = graph.insert_vertex(node.label.clone());
            if node.role == NodeRole::Recharge {
                manager.add_recharge_station(&label);
            }
            ids.insert(label.clone(), id);
            roles.push((label, node.role));
        }

        for edge in &document.edges {
            let from = edge.from.to_string();
            let to = edge.to.to_string();
            let u = ids
                .get(&from)
                .copied()
                .ok_or_else(|| graph.vertex_not_found(&from))?;
            let v = ids
                .get(&to)
                .copied()
                .ok_or_else(|| graph.vertex_not_found(&to))?;
            graph.insert_edge(u, v, edge.weight)?;
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            stations = manager.recharge_stations().len(),
            "built delivery network"
        );

        Ok(Self {
            graph,
            manager,
            roles,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: NetworkDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Read and parse a network document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn manager(&self) -> &RouteManager {
        &self.manager
    }

    pub fn role(&self, label: &str) -> Option<NodeRole> {
        self.roles
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, role)| *role)
    }

    /// Labels carrying `role`, in declaration order.
    pub fn labels_with_role(&self, role: NodeRole) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|(_, candidate)| *candidate == role)
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum normalized similarity for a label to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.5;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Caller-supplied vertex label.
///
/// Labels are payload only: two vertices carrying the same label are still
/// distinct vertices. Routing code addresses vertices by the label's
/// canonical string form (its `Display` output).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(value) => write!(f, "{value}"),
            Label::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Number(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Number(i64::from(value))
    }
}

/// Opaque handle to a vertex owned by a specific [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    graph: u64,
    index: usize,
}

impl VertexId {
    /// Position of the vertex in its graph's arena (creation order).
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}@g{}", self.index, self.graph)
    }
}

/// Opaque handle to an edge owned by a specific [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    graph: u64,
    index: usize,
}

impl EdgeId {
    /// Position of the edge in its graph's arena (insertion order).
    pub fn index(self) -> usize {
        self.index
    }
}

/// Vertex record stored in the graph arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub label: Label,
}

/// Weighted relation between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub origin: VertexId,
    pub destination: VertexId,
    /// Travel cost, also the battery drained by traversing the edge.
    pub weight: f64,
}

impl Edge {
    /// Both endpoints as an ordered pair.
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.origin, self.destination)
    }

    /// The endpoint opposite to `vertex`, or `None` if `vertex` is not incident.
    pub fn opposite(&self, vertex: VertexId) -> Option<VertexId> {
        if vertex == self.origin {
            Some(self.destination)
        } else if vertex == self.destination {
            Some(self.origin)
        } else {
            None
        }
    }
}

/// Which adjacency map to consult for degree and incidence queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
}

/// Neighbour map for one vertex; iteration follows edge insertion order.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    order: Vec<VertexId>,
    edges: HashMap<VertexId, EdgeId>,
}

impl Adjacency {
    fn insert(&mut self, neighbour: VertexId, edge: EdgeId) {
        if self.edges.insert(neighbour, edge).is_none() {
            self.order.push(neighbour);
        }
    }

    fn remove(&mut self, neighbour: VertexId) -> Option<EdgeId> {
        let edge = self.edges.remove(&neighbour)?;
        self.order.retain(|vertex| *vertex != neighbour);
        Some(edge)
    }

    fn get(&self, neighbour: VertexId) -> Option<EdgeId> {
        self.edges.get(&neighbour).copied()
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn iter(&self) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        self.order.iter().map(move |vertex| (*vertex, self.edges[vertex]))
    }
}

/// Weighted graph backed by vertex/edge arenas and per-vertex adjacency maps.
///
/// Undirected graphs register every edge under both endpoints and share a
/// single adjacency map for both directions; directed graphs keep separate
/// outgoing and incoming maps.
#[derive(Debug, Clone)]
pub struct Graph {
    id: u64,
    directed: bool,
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    outgoing: HashMap<VertexId, Adjacency>,
    incoming: HashMap<VertexId, Adjacency>,
    vertex_count: usize,
    edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Graph {
    /// Create an empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            directed,
            vertices: Vec::new(),
            edges: Vec::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            vertex_count: 0,
            edge_count: 0,
        }
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Add a vertex carrying `label` and return its handle.
    pub fn insert_vertex(&mut self, label: impl Into<Label>) -> VertexId {
        let id = VertexId {
            graph: self.id,
            index: self.vertices.len(),
        };
        self.vertices.push(Some(Vertex {
            id,
            label: label.into(),
        }));
        self.outgoing.insert(id, Adjacency::default());
        if self.directed {
            self.incoming.insert(id, Adjacency::default());
        }
        self.vertex_count += 1;
        id
    }

    /// Connect `u` to `v` with the given weight, replacing any existing edge
    /// between the same ordered pair.
    pub fn insert_edge(&mut self, u: VertexId, v: VertexId, weight: f64) -> Result<EdgeId> {
        self.ensure_owned(u)?;
        self.ensure_owned(v)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { weight });
        }

        if self.get_edge(u, v).is_some() {
            self.remove_edge(u, v);
        }

        let id = EdgeId {
            graph: self.id,
            index: self.edges.len(),
        };
        self.edges.push(Some(Edge {
            id,
            origin: u,
            destination: v,
            weight,
        }));

        self.adjacency_mut(u, Direction::Outgoing).insert(v, id);
        self.adjacency_mut(v, Direction::Incoming).insert(u, id);
        self.edge_count += 1;
        Ok(id)
    }

    /// Remove the edge between `u` and `v`, returning it if it existed.
    pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> Option<Edge> {
        let id = self.outgoing.get_mut(&u)?.remove(v)?;
        if let Some(reverse) = self.reverse_map_mut(v) {
            reverse.remove(u);
        }
        self.edge_count -= 1;
        self.edges.get_mut(id.index).and_then(Option::take)
    }

    /// Remove a vertex and every edge incident to it.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<Label> {
        self.ensure_owned(v)?;

        let outgoing: Vec<VertexId> = self.neighbors(v).collect();
        for neighbour in outgoing {
            self.remove_edge(v, neighbour);
        }
        if self.directed {
            let incoming: Vec<VertexId> = self
                .incoming
                .get(&v)
                .map(|adj| adj.order.clone())
                .unwrap_or_default();
            for neighbour in incoming {
                self.remove_edge(neighbour, v);
            }
            self.incoming.remove(&v);
        }
        self.outgoing.remove(&v);

        self.vertex_count -= 1;
        self.vertices[v.index]
            .take()
            .map(|vertex| vertex.label)
            .ok_or_else(|| foreign(v))
    }

    /// Edge from `u` to `v`, if one exists.
    pub fn get_edge(&self, u: VertexId, v: VertexId) -> Option<&Edge> {
        let id = self.outgoing.get(&u)?.get(v)?;
        self.edge(id)
    }

    /// Lookup an edge by handle.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        if id.graph != self.id {
            return None;
        }
        self.edges.get(id.index).and_then(Option::as_ref)
    }

    /// Lookup a vertex record by handle.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        if id.graph != self.id {
            return None;
        }
        self.vertices.get(id.index).and_then(Option::as_ref)
    }

    /// Label of the vertex, if the handle is live in this graph.
    pub fn label(&self, id: VertexId) -> Option<&Label> {
        self.vertex(id).map(|vertex| &vertex.label)
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertex(id).is_some()
    }

    /// Live vertices in creation order. Each call starts a fresh pass.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().flatten().map(|vertex| vertex.id)
    }

    /// Every live edge exactly once, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().flatten()
    }

    /// Vertices reachable from `v` over a single outgoing edge.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outgoing
            .get(&v)
            .into_iter()
            .flat_map(|adj| adj.order.iter().copied())
    }

    /// Outgoing neighbours paired with the weight of the connecting edge.
    pub fn weighted_neighbors(&self, v: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.outgoing.get(&v).into_iter().flat_map(move |adj| {
            adj.iter().filter_map(move |(neighbour, edge)| {
                self.edge(edge).map(|edge| (neighbour, edge.weight))
            })
        })
    }

    /// Number of edges attached to `v` in the given direction.
    pub fn degree(&self, v: VertexId, direction: Direction) -> usize {
        self.adjacency(direction)
            .get(&v)
            .map(Adjacency::len)
            .unwrap_or(0)
    }

    /// Edges attached to `v` in the given direction.
    pub fn incident_edges(
        &self,
        v: VertexId,
        direction: Direction,
    ) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency(direction)
            .get(&v)
            .into_iter()
            .flat_map(move |adj| adj.iter().filter_map(move |(_, edge)| self.edge(edge)))
    }

    /// First vertex (in creation order) whose canonical label equals `label`.
    pub fn find_vertex(&self, label: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .flatten()
            .find(|vertex| vertex.label.to_string() == label)
            .map(|vertex| vertex.id)
    }

    /// Canonical label to handle index; duplicate labels resolve to the first vertex.
    pub fn label_index(&self) -> HashMap<String, VertexId> {
        let mut index = HashMap::with_capacity(self.vertex_count);
        for vertex in self.vertices.iter().flatten() {
            index.entry(vertex.label.to_string()).or_insert(vertex.id);
        }
        index
    }

    /// Resolve a label or fail with suggestions for similar labels.
    pub fn resolve(&self, label: &str) -> Result<VertexId> {
        self.find_vertex(label)
            .ok_or_else(|| self.vertex_not_found(label))
    }

    /// Build a [`Error::VertexNotFound`] carrying close label matches.
    pub fn vertex_not_found(&self, label: &str) -> Error {
        Error::VertexNotFound {
            label: label.to_string(),
            suggestions: self.similar_labels(label, 3),
        }
    }

    /// Labels similar to `query`, most similar first.
    pub fn similar_labels(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.to_lowercase();
        let mut scored: Vec<(f64, String)> = self
            .vertices
            .iter()
            .flatten()
            .map(|vertex| vertex.label.to_string())
            .map(|label| {
                let score = strsim::normalized_levenshtein(&query, &label.to_lowercase());
                (score, label)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.dedup_by(|a, b| a.1 == b.1);
        scored.into_iter().take(limit).map(|(_, label)| label).collect()
    }

    fn ensure_owned(&self, id: VertexId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(foreign(id))
        }
    }

    fn adjacency(&self, direction: Direction) -> &HashMap<VertexId, Adjacency> {
        match direction {
            Direction::Incoming if self.directed => &self.incoming,
            _ => &self.outgoing,
        }
    }

    fn adjacency_mut(&mut self, vertex: VertexId, direction: Direction) -> &mut Adjacency {
        let map = match direction {
            Direction::Incoming if self.directed => &mut self.incoming,
            _ => &mut self.outgoing,
        };
        map.entry(vertex).or_default()
    }

    fn reverse_map_mut(&mut self, vertex: VertexId) -> Option<&mut Adjacency> {
        if self.directed {
            self.incoming.get_mut(&vertex)
        } else {
            self.outgoing.get_mut(&vertex)
        }
    }
}

fn foreign(id: VertexId) -> Error {
    Error::ForeignVertex {
        handle: id.to_string(),
    }
}

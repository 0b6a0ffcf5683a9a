use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{Edge, Graph, VertexId};

/// Single-source shortest distances (Dijkstra) over outgoing edges.
///
/// Unreachable vertices are absent from the returned map.
pub fn shortest_distances(graph: &Graph, source: VertexId) -> HashMap<VertexId, f64> {
    dijkstra(graph, source, None).0
}

/// Lowest-cost path from `start` to `goal` together with its total cost.
pub fn shortest_path(
    graph: &Graph,
    start: VertexId,
    goal: VertexId,
) -> Option<(Vec<VertexId>, f64)> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    if start == goal {
        return Some((vec![start], 0.0));
    }

    let (distances, parents) = dijkstra(graph, start, Some(goal));
    let cost = *distances.get(&goal)?;
    Some((reconstruct_path(&parents, start, goal), cost))
}

fn dijkstra(
    graph: &Graph,
    start: VertexId,
    goal: Option<VertexId>,
) -> (HashMap<VertexId, f64>, HashMap<VertexId, Option<VertexId>>) {
    let mut distances: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, Option<VertexId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    if !graph.contains(start) {
        return (distances, parents);
    }

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if Some(entry.node) == goal {
            break;
        }

        for (next, weight) in graph.weighted_neighbors(entry.node) {
            let next_cost = current_distance + weight;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    (distances, parents)
}

fn reconstruct_path(
    parents: &HashMap<VertexId, Option<VertexId>>,
    start: VertexId,
    goal: VertexId,
) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

/// All-pairs shortest distances produced by Floyd-Warshall.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    distances: HashMap<(VertexId, VertexId), f64>,
}

impl DistanceTable {
    /// Shortest distance from `u` to `v`, or `None` when unreachable.
    pub fn get(&self, u: VertexId, v: VertexId) -> Option<f64> {
        self.distances.get(&(u, v)).copied()
    }

    /// Number of reachable ordered pairs (including each vertex to itself).
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Compute shortest distances between every ordered pair of vertices.
pub fn all_pairs_shortest_paths(graph: &Graph) -> DistanceTable {
    let vertices: Vec<VertexId> = graph.vertices().collect();
    let mut distances: HashMap<(VertexId, VertexId), f64> = HashMap::new();

    for &v in &vertices {
        distances.insert((v, v), 0.0);
        for (neighbour, weight) in graph.weighted_neighbors(v) {
            let entry = distances.entry((v, neighbour)).or_insert(f64::INFINITY);
            if weight < *entry {
                *entry = weight;
            }
        }
    }

    for &k in &vertices {
        for &i in &vertices {
            let Some(&ik) = distances.get(&(i, k)) else {
                continue;
            };
            for &j in &vertices {
                let Some(&kj) = distances.get(&(k, j)) else {
                    continue;
                };
                let through = ik + kj;
                let current = distances.get(&(i, j)).copied().unwrap_or(f64::INFINITY);
                if through < current {
                    distances.insert((i, j), through);
                }
            }
        }
    }

    DistanceTable { distances }
}

/// Kruskal's minimum spanning tree (a forest when the graph is disconnected).
///
/// Edges are returned in the order they were accepted: ascending weight, ties
/// broken by insertion order.
pub fn minimum_spanning_tree(graph: &Graph) -> Vec<Edge> {
    let mut parent: HashMap<VertexId, VertexId> = graph.vertices().map(|v| (v, v)).collect();
    let target = parent.len().saturating_sub(1);

    let mut candidates: Vec<&Edge> = graph.edges().collect();
    candidates.sort_by(|a, b| {
        a.weight
            .total_cmp(&b.weight)
            .then_with(|| a.id.index().cmp(&b.id.index()))
    });

    let mut tree = Vec::with_capacity(target);
    for edge in candidates {
        if tree.len() >= target {
            break;
        }
        let (u, v) = edge.endpoints();
        let root_u = find_root(&mut parent, u);
        let root_v = find_root(&mut parent, v);
        if root_u != root_v {
            parent.insert(root_v, root_u);
            tree.push(edge.clone());
        }
    }
    tree
}

fn find_root(parent: &mut HashMap<VertexId, VertexId>, mut vertex: VertexId) -> VertexId {
    while let Some(&next) = parent.get(&vertex) {
        if next == vertex {
            break;
        }
        // Path halving.
        let grandparent = parent.get(&next).copied().unwrap_or(next);
        parent.insert(vertex, grandparent);
        vertex = grandparent;
    }
    vertex
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//! Lazy graph traversals and topological ordering.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

/// Breadth-first traversal iterator.
#[derive(Debug)]
pub struct Bfs<'g> {
    graph: &'g Graph,
    queue: VecDeque<VertexId>,
    visited: HashSet<VertexId>,
}

impl Iterator for Bfs<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        for neighbour in self.graph.neighbors(current) {
            if self.visited.insert(neighbour) {
                self.queue.push_back(neighbour);
            }
        }
        Some(current)
    }
}

/// Depth-first (pre-order) traversal iterator.
#[derive(Debug)]
pub struct Dfs<'g> {
    graph: &'g Graph,
    stack: Vec<VertexId>,
    visited: HashSet<VertexId>,
}

impl Iterator for Dfs<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current) {
                continue;
            }
            let pending: Vec<VertexId> = self
                .graph
                .neighbors(current)
                .filter(|neighbour| !self.visited.contains(neighbour))
                .collect();
            // Reversed so the first neighbour is explored first.
            self.stack.extend(pending.into_iter().rev());
            return Some(current);
        }
        None
    }
}

/// Visit every vertex reachable from `start` in breadth-first order.
///
/// An unknown `start` yields an empty traversal.
pub fn bfs(graph: &Graph, start: VertexId) -> Bfs<'_> {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    if graph.contains(start) {
        queue.push_back(start);
        visited.insert(start);
    }
    Bfs {
        graph,
        queue,
        visited,
    }
}

/// Visit every vertex reachable from `start` in depth-first pre-order.
pub fn dfs(graph: &Graph, start: VertexId) -> Dfs<'_> {
    let stack = if graph.contains(start) {
        vec![start]
    } else {
        Vec::new()
    };
    Dfs {
        graph,
        stack,
        visited: HashSet::new(),
    }
}

/// Order vertices so that every edge points forward (Kahn's algorithm).
pub fn topological_sort(graph: &Graph) -> Result<Vec<VertexId>> {
    let mut in_degree: HashMap<VertexId, usize> = graph.vertices().map(|v| (v, 0)).collect();
    for vertex in graph.vertices() {
        for neighbour in graph.neighbors(vertex) {
            *in_degree.entry(neighbour).or_default() += 1;
        }
    }

    let mut queue: VecDeque<VertexId> = graph
        .vertices()
        .filter(|vertex| in_degree.get(vertex) == Some(&0))
        .collect();
    let mut order = Vec::with_capacity(in_degree.len());

    while let Some(vertex) = queue.pop_front() {
        order.push(vertex);
        for neighbour in graph.neighbors(vertex) {
            if let Some(degree) = in_degree.get_mut(&neighbour) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    if order.len() != in_degree.len() {
        return Err(Error::CyclicGraph);
    }
    Ok(order)
}

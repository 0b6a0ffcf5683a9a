//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use droneroute_lib::{DeliveryNetwork, Graph, VertexId};

/// Path to fixtures directory used by tests (delivery network, history).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The eight-node delivery network from `docs/fixtures/delivery_network.json`.
#[allow(dead_code)]
pub fn fixture_network() -> DeliveryNetwork {
    DeliveryNetwork::load(&fixtures_dir().join("delivery_network.json"))
        .expect("fixture network loads")
}

/// Undirected graph A–B(10), B–C(15), A–D(20), D–E(10), E–F(5), B–E(30).
#[allow(dead_code)]
pub fn sample_graph() -> (Graph, Vec<VertexId>) {
    let mut graph = Graph::undirected();
    let ids: Vec<VertexId> = ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .map(|label| graph.insert_vertex(label))
        .collect();
    for (u, v, weight) in [
        (0, 1, 10.0),
        (1, 2, 15.0),
        (0, 3, 20.0),
        (3, 4, 10.0),
        (4, 5, 5.0),
        (1, 4, 30.0),
    ] {
        graph
            .insert_edge(ids[u], ids[v], weight)
            .expect("sample edge inserts");
    }
    (graph, ids)
}

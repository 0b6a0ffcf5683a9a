mod common;

use std::fs;

use droneroute_lib::{DeliveryNetwork, Error, NodeRole};
use tempfile::tempdir;

use common::fixture_network;

#[test]
fn fixture_network_loads_roles_and_stations() {
    let network = fixture_network();
    assert_eq!(network.graph().vertex_count(), 8);
    assert_eq!(network.graph().edge_count(), 9);
    assert_eq!(
        network.manager().recharge_stations().into_iter().collect::<Vec<_>>(),
        vec!["R1", "R2"]
    );
    assert_eq!(network.labels_with_role(NodeRole::Client), vec!["X", "Y", "Z"]);
    assert_eq!(network.role("A"), Some(NodeRole::Warehouse));
    assert_eq!(network.role("Q"), None);
}

#[test]
fn malformed_documents_surface_json_errors() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"nodes\": [ }").expect("write fixture");
    assert!(matches!(DeliveryNetwork::load(&path), Err(Error::Json(_))));
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempdir().expect("temp dir");
    let err = DeliveryNetwork::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn directed_documents_keep_direction() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("oneway.json");
    fs::write(
        &path,
        r#"{"directed": true,
            "nodes": [{"label": "A"}, {"label": "B"}],
            "edges": [{"from": "A", "to": "B", "weight": 2}]}"#,
    )
    .expect("write fixture");

    let network = DeliveryNetwork::load(&path).unwrap();
    let graph = network.graph();
    assert!(graph.is_directed());
    let err = network
        .manager()
        .find_route_with_recharge(graph, "B", "A", 10.0)
        .unwrap_err();
    assert!(matches!(err, Error::NoFeasibleRoute { .. }));
}

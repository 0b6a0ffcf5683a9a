mod common;

use droneroute_lib::{
    load_orders, DeliverySession, EngineConfig, RouteAlgorithm, SuggestionSource,
};

use common::{fixture_network, fixtures_dir};

fn replayed_session(config: EngineConfig) -> DeliverySession {
    let orders = load_orders(&fixtures_dir().join("deliveries.json")).expect("orders load");
    let mut session = DeliverySession::new(fixture_network(), config).expect("valid config");
    for order in &orders {
        session.deliver(&order.from, &order.to).expect("delivery succeeds");
    }
    session
}

#[test]
fn replay_ranks_routes_by_frequency() {
    let session = replayed_session(EngineConfig::default().with_battery_limit(30.0));
    let tracker = session.tracker();

    assert_eq!(session.deliveries(), 7);
    assert_eq!(tracker.route_count(), 4);
    assert_eq!(
        tracker.get_most_frequent_routes(2),
        vec![
            ("A→R1→R2→C→X".to_string(), 3),
            ("A→R1→R2→C→Y".to_string(), 2),
        ]
    );
    assert_eq!(tracker.node_visits("C"), 7);
    assert_eq!(tracker.node_visits("B"), 1);
    assert_eq!(
        session.last_route().map(|plan| plan.path.join("→")),
        Some("A→R1→R2→C→X".to_string())
    );
}

#[test]
fn suggestions_use_history_before_search() {
    let mut session = replayed_session(EngineConfig::default());

    let exact = session.suggest_route("A", "Y").unwrap();
    assert_eq!(exact.source, SuggestionSource::Exact);
    assert_eq!(exact.frequency, Some(2));

    // No route ends at R1, but ranked routes contain both A and R1.
    let stitched = session.suggest_route("A", "R1").unwrap();
    assert_eq!(stitched.source, SuggestionSource::Stitched);
    assert_eq!(stitched.path, vec!["A", "C", "R1"]);

    let computed = session.suggest_route("X", "Z").unwrap();
    assert_eq!(computed.source, SuggestionSource::Computed);
    assert_eq!(computed.path, vec!["X", "C", "Z"]);

    let report = session.optimization_report();
    assert_eq!(report.lines().count(), 3);
}

#[test]
fn finishing_consumes_the_session() {
    let config = EngineConfig::default().with_algorithm(RouteAlgorithm::Dijkstra);
    let session = replayed_session(config);
    let summary = session.finish();

    assert_eq!(summary.deliveries, 7);
    assert_eq!(summary.distinct_routes, 4);
    assert_eq!(summary.node_visits[0], ("C".to_string(), 7));
    // 3 × 30 + 2 × 35 + 40 + 25
    assert_eq!(summary.total_cost, 225.0);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["deliveries"], 7);
}

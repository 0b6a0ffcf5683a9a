use criterion::{criterion_group, criterion_main, Criterion};
use droneroute_lib::{
    DeliveryNetwork, Graph, RouteAlgorithm, RouteManager, RouteRequest, RouteTracker, VertexId,
};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

const GRID: usize = 8;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/delivery_network.json")
}

static NETWORK: Lazy<DeliveryNetwork> =
    Lazy::new(|| DeliveryNetwork::load(&fixture_path()).expect("fixture loads"));

/// Square grid with weights cycling 1..=7 and a recharge station every fourth cell.
static GRID_NETWORK: Lazy<(Graph, RouteManager)> = Lazy::new(|| {
    let mut graph = Graph::undirected();
    let mut manager = RouteManager::new();
    let ids: Vec<VertexId> = (0..GRID * GRID)
        .map(|i| {
            let label = format!("N{i}");
            if i % 4 == 3 {
                manager.add_recharge_station(&label);
            }
            graph.insert_vertex(label)
        })
        .collect();
    for row in 0..GRID {
        for col in 0..GRID {
            let i = row * GRID + col;
            let weight = (i % 7 + 1) as f64;
            if col + 1 < GRID {
                graph.insert_edge(ids[i], ids[i + 1], weight).expect("edge");
            }
            if row + 1 < GRID {
                graph.insert_edge(ids[i], ids[i + GRID], weight + 1.0).expect("edge");
            }
        }
    }
    (graph, manager)
});

static ROUTES: Lazy<Vec<Vec<String>>> = Lazy::new(|| {
    (0..500)
        .map(|i| (0..4).map(|j| format!("N{}", (i * 7 + j * 13) % 97)).collect())
        .collect()
});

fn benchmark_search(c: &mut Criterion) {
    let network = &*NETWORK;
    let (grid, grid_manager) = &*GRID_NETWORK;
    let far_corner = format!("N{}", GRID * GRID - 1);

    c.bench_function("recharge_fixture_a_x", |b| {
        let request = RouteRequest::recharge("A", "X", 20.0);
        b.iter(|| {
            let plan = network
                .manager()
                .plan_route(network.graph(), &request)
                .expect("route exists");
            black_box(plan.total_cost)
        });
    });

    c.bench_function("recharge_grid_corner", |b| {
        let request = RouteRequest::recharge("N0", far_corner.as_str(), 20.0);
        b.iter(|| {
            let plan = grid_manager.plan_route(grid, &request).expect("route exists");
            black_box(plan.recharge_stops.len())
        });
    });

    c.bench_function("dijkstra_grid_corner", |b| {
        let request = RouteRequest::recharge("N0", far_corner.as_str(), 200.0)
            .with_algorithm(RouteAlgorithm::Dijkstra);
        b.iter(|| {
            let plan = grid_manager.plan_route(grid, &request).expect("route exists");
            black_box(plan.hop_count())
        });
    });

    c.bench_function("tracker_register_500", |b| {
        let routes = &*ROUTES;
        b.iter(|| {
            let mut tracker = RouteTracker::new();
            for route in routes {
                tracker.register_route(route).expect("non-empty route");
            }
            black_box(tracker.get_most_frequent_routes(10))
        });
    });
}

criterion_group!(benches, benchmark_search);
criterion_main!(benches);

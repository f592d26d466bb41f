//! # Mconfig Build Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | Facade | Full build from wire forms, single gateway |
//! | Graph | Ancestor lookup through deep tier chains |
//! | IPC | Encoded request to encoded response |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use shared_types::{EntityId, UPGRADE_TIER_ENTITY_TYPE};

use mc_01_config_builder::{
    BuildHandler, BuildRequest, BuildService, BuildServiceApi, BuilderConfig, EntityGraph,
};
use mc_tests::integration::fixtures::*;

// ============================================================================
// Facade
// ============================================================================

fn bench_build_single_gateway(c: &mut Criterion) {
    let mut group = c.benchmark_group("build-facade");
    group.measurement_time(Duration::from_secs(5));

    let service = BuildService::new(BuilderConfig::new(VERSION_TAG));
    let network = NetworkFixture::new(NETWORK_ID).with_state(60).with_sentry().build();
    let graph = scenario_graph();

    group.bench_function("scenario_gateway", |b| {
        b.iter(|| black_box(service.build(&network, &graph, GATEWAY_ID).is_ok()))
    });

    group.finish();
}

// ============================================================================
// Graph
// ============================================================================

/// `T{depth} -> ... -> T1 -> GW1` with only `T{depth}` carrying a version.
fn tier_chain(depth: usize) -> GraphFixture {
    let mut graph = GraphFixture::new().gateway(GATEWAY_ID, Some(scenario_gateway_config()));
    for i in 1..=depth {
        let key = format!("T{}", i);
        graph = graph.entity(UPGRADE_TIER_ENTITY_TYPE, &key, Some(json!({ "version": key })));
    }
    graph = graph.edge(EntityId::upgrade_tier("T1"), EntityId::gateway(GATEWAY_ID));
    for i in 2..=depth {
        graph = graph.edge(
            EntityId::upgrade_tier(format!("T{}", i)),
            EntityId::upgrade_tier(format!("T{}", i - 1)),
        );
    }
    graph
}

fn bench_graph_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("build-graph");

    for depth in [1usize, 16, 128] {
        let wire = tier_chain(depth).build();
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::new("from_wire", depth), &wire, |b, wire| {
            b.iter(|| black_box(EntityGraph::from_wire(wire).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// IPC
// ============================================================================

fn bench_handle_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build-ipc");

    let handler = BuildHandler::new(BuildService::new(BuilderConfig::new(VERSION_TAG)));
    let request = BuildRequest {
        network: scenario_network(),
        graph: scenario_graph(),
        gateway_id: GATEWAY_ID.to_string(),
    };
    let input = bincode::serialize(&request).unwrap_or_default();

    group.bench_function("handle_bytes", |b| {
        b.iter(|| black_box(handler.handle_bytes(&input).map(|out| out.len())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build_single_gateway,
    bench_graph_decode,
    bench_handle_bytes
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pullgraph::graph::{EdgeData, Graph, VertexData};
use pullgraph::persistence::{from_json, to_json};
use pullgraph::query::{parse_traversal, Query, Registry};

/// Chain-plus-fanout graph: vertex i links to i+1 and i+2
fn build_graph(size: i64) -> Graph {
    let vertices = (0..size).map(|i| VertexData::with_id(i).property("name", format!("Person{}", i)).property("age", i % 100));
    let edges = (0..size).flat_map(|i| {
        [
            EdgeData::new(i, "knows", (i + 1) % size),
            EdgeData::new(i, "likes", (i + 2) % size),
        ]
    });
    Graph::from_parts(vertices, edges)
}

/// Benchmark vertex and edge insertion throughput
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| build_graph(size));
        });
    }
    group.finish();
}

/// Benchmark two-hop traversal with dedup over every vertex
fn bench_two_hop(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_hop_unique");
    let registry = Registry::builtin();

    for size in [100, 1000, 10_000].iter() {
        let graph = build_graph(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                graph
                    .v(&registry, ())
                    .out("knows")
                    .out(())
                    .unique()
                    .run()
                    .len()
            });
        });
    }
    group.finish();
}

/// Benchmark the early exit of `take` on a large fan-out
fn bench_take(c: &mut Criterion) {
    let registry = Registry::builtin();
    let graph = build_graph(10_000);

    c.bench_function("take_10_of_all", |b| {
        b.iter(|| graph.v(&registry, ()).out(()).take(10).run().len());
    });
}

/// Benchmark parsing plus execution of a textual traversal
fn bench_parsed(c: &mut Criterion) {
    let registry = Registry::builtin();
    let graph = build_graph(1000);

    c.bench_function("parse_and_run", |b| {
        b.iter(|| {
            let program = parse_traversal(r#"v({age: 7}).as("me").out(["knows", "likes"]).except("me").property("name")"#)
                .unwrap_or_default();
            Query::from_program(&graph, &registry, program).run().len()
        });
    });
}

/// Benchmark JSON encode and decode
fn bench_codec(c: &mut Criterion) {
    let graph = build_graph(1000);
    let text = to_json(&graph).unwrap_or_default();

    c.bench_function("encode_1000", |b| b.iter(|| to_json(&graph).map(|t| t.len())));
    c.bench_function("decode_1000", |b| b.iter(|| from_json(&text).map(|g| g.edge_count())));
}

criterion_group!(benches, bench_insertion, bench_two_hop, bench_take, bench_parsed, bench_codec);
criterion_main!(benches);

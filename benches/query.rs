//! Benchmarks for path evaluation.
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use jpath::path::{Evaluator, PathExpression};

/// A document with `n` records, each holding a small nested array.
fn records(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            let name = format!("record-{i}");
            json!({"id": i, "name": name, "tags": ["a", "b", "c"]})
        })
        .collect();
    json!({ "records": items })
}

fn bench_fetch(c: &mut Criterion) {
    let doc = records(10_000);
    let evaluator = Evaluator::new();

    let mut group = c.benchmark_group("fetch");
    for expression in [
        ".records[^1].name",
        ".records[*].name",
        ".records[100:200].tags[*]",
        ".records[*].missing",
    ] {
        let path = PathExpression::parse(expression);
        group.bench_function(expression, |b| {
            b.iter(|| evaluator.fetch(black_box(&doc), &path).count());
        });
    }
    group.bench_function("first of wildcard", |b| {
        let path = PathExpression::parse(".records[*].id");
        b.iter(|| evaluator.fetch(black_box(&doc), &path).next());
    });
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse path", |b| {
        b.iter(|| PathExpression::parse(black_box(".a.b[1:3].c.d[^2].e[*]")));
    });
}

criterion_group!(benches, bench_fetch, bench_parse);
criterion_main!(benches);

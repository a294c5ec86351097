//! List adaptation and store fetch throughput
//!
//! - `to_frontend_list` over catalogs of increasing size, with null and
//!   malformed entries mixed in
//! - full `fetch_all` through the store against the in-process catalog

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use product_catalog_lib::ProductStore;
use product_catalog_lib::domain::WireProduct;
use product_catalog_lib::infrastructure::{InMemoryProductApi, ProductSchemaAdapter};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn wire_catalog(size: usize) -> Vec<WireProduct> {
    (0..size)
        .map(|i| {
            let price = i64::try_from(i % 5000).unwrap_or(0) * 10;
            let discount = i64::try_from(i % 40).unwrap_or(0);
            WireProduct::new(format!("{:08}", 74_000_000 + i), format!("Item {i}"), "Accessories", price, discount, i64::from(i % 3 != 0))
        })
        .collect()
}

fn list_body(size: usize) -> Value {
    let mut entries: Vec<Value> = wire_catalog(size)
        .into_iter()
        .map(|record| serde_json::to_value(record).unwrap_or(Value::Null))
        .collect();
    // Roughly 1% noise the adapter has to skip
    for i in (0..entries.len()).step_by(100) {
        entries[i] = if i % 200 == 0 { Value::Null } else { json!({ "price": "n/a" }) };
    }
    Value::Array(entries)
}

fn benchmark_to_frontend_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_frontend_list");
    for size in [10_usize, 1_000, 10_000] {
        let body = list_body(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter(|| ProductSchemaAdapter::to_frontend_list(black_box(body)));
        });
    }
    group.finish();
}

fn benchmark_store_fetch_all(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let store = ProductStore::new(Arc::new(InMemoryProductApi::with_records(wire_catalog(1_000))));

    c.bench_function("store_fetch_all_1000", |b| {
        b.iter(|| rt.block_on(async { black_box(store.fetch_all().await.expect("fetch")) }));
    });
}

criterion_group!(benches, benchmark_to_frontend_list, benchmark_store_fetch_all);
criterion_main!(benches);

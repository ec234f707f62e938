use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcf_core::{canonicalize, Value};

fn wide_record(fields: usize) -> Value {
    let fields: Vec<serde_json::Value> = (0..fields)
        .map(|i| {
            serde_json::json!({
                "name": format!("field_{i}"),
                "doc": "generated",
                "type": ["null", "string", {"type": "array", "items": "Item"}]
            })
        })
        .collect();
    Value::from(serde_json::json!({
        "type": "record",
        "name": "Wide",
        "namespace": "bench",
        "fields": fields
    }))
}

fn bench_canonicalize(c: &mut Criterion) {
    let small = wide_record(8);
    let large = wide_record(512);

    c.bench_function("canonicalize_record_8_fields", |b| {
        b.iter(|| canonicalize(black_box(&small)))
    });
    c.bench_function("canonicalize_record_512_fields", |b| {
        b.iter(|| canonicalize(black_box(&large)))
    });
}

criterion_group!(benches, bench_canonicalize);
criterion_main!(benches);

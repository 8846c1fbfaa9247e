// Typed arrays take a dedicated path; compare it with the same values boxed
// into a heterogeneous array.
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tagged_json::{stringify, TypedArray, Value};

fn bench_array_sizes(c: &mut Criterion) {
    let test_sizes = vec![10, 100, 1000, 10000, 100000usize];

    for test_size in test_sizes {
        let ints: Vec<i64> = (0..test_size as i64).map(|i| i * 31 - 7).collect();
        let typed = Value::Typed(TypedArray::I64(ints.clone()));
        let generic = Value::Array(ints.into_iter().map(Value::I64).collect());

        let mut group = c.benchmark_group(format!("stringify (size {test_size})"));
        if test_size > 1000 {
            group.sample_size(10);
        }
        group.bench_function("typed", |b| {
            b.iter(|| {
                let text = stringify(black_box(&typed));
                black_box(text)
            });
        });

        group.bench_function("generic", |b| {
            b.iter(|| {
                let text = stringify(black_box(&generic));
                black_box(text)
            });
        });

        group.bench_function("serde_json", |b| {
            b.iter(|| {
                let text = serde_json::to_string(black_box(&generic)).unwrap();
                black_box(text)
            });
        });
        group.finish();
    }
}

criterion_group!(serializer_benches, bench_array_sizes);
criterion_main!(serializer_benches);

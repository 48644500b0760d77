//! Criterion micro-benchmarks for data structure operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simpl_bench::{cell_data, volume};
use simpl_data::AttributeMatrix;
use simpl_core::{AttributeMatrixType, NumericType};

fn bench_resize(c: &mut Criterion) {
    c.bench_function("matrix_resize_grow_shrink_64k", |b| {
        let mut m = AttributeMatrix::new("M", AttributeMatrixType::Generic, &[65_536]).unwrap();
        for (i, t) in NumericType::ALL.into_iter().enumerate() {
            m.create_dynamic_array(t, &format!("A{i}"), &[1], 0.0, false)
                .unwrap();
        }
        b.iter(|| {
            m.resize_attribute_arrays(black_box(&[131_072])).unwrap();
            m.resize_attribute_arrays(black_box(&[65_536])).unwrap();
        });
    });
}

fn bench_schema_clone(c: &mut Criterion) {
    let dca = volume(64).unwrap();
    c.bench_function("schema_clone_64cubed", |b| {
        b.iter(|| black_box(dca.schema_clone()));
    });
}

fn bench_lookup(c: &mut Criterion) {
    let dca = volume(8).unwrap();
    let path = cell_data().with_array("FeatureIds");
    c.bench_function("typed_array_lookup", |b| {
        b.iter(|| black_box(dca.typed_array::<i32>(black_box(&path)).unwrap().tuples()));
    });
    let handle = dca.array_ref(&path).unwrap();
    c.bench_function("array_ref_resolve", |b| {
        b.iter(|| black_box(dca.resolve::<i32>(black_box(&handle)).unwrap().tuples()));
    });
}

criterion_group!(benches, bench_resize, bench_schema_clone, bench_lookup);
criterion_main!(benches);

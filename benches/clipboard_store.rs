//! Clipboard Store Benchmarks
//!
//! Measures insert and full-text search throughput against an in-memory
//! SQLite store, since both run on every observed clipboard change.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use suyan_host::clipboard::store::{ClipboardStore, ContentType};

fn seeded_store(n: usize) -> ClipboardStore {
    let store = ClipboardStore::open_in_memory().unwrap();
    for i in 0..n {
        store
            .add_record(
                ContentType::Text,
                &format!("the quick brown fox jumps over the lazy dog {i}"),
                &format!("hash-{i}"),
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .unwrap();
    }
    store
}

fn bench_add_record(c: &mut Criterion) {
    let store = ClipboardStore::open_in_memory().unwrap();
    let mut i = 0u64;
    c.bench_function("add_record", |b| {
        b.iter(|| {
            i += 1;
            black_box(
                store
                    .add_record(
                        ContentType::Text,
                        black_box("benchmark clipboard entry"),
                        &format!("hash-{i}"),
                        None,
                        None,
                        None,
                        None,
                        None,
                        None,
                    )
                    .unwrap(),
            )
        })
    });
}

fn bench_search_text(c: &mut Criterion) {
    let store = seeded_store(1000);
    c.bench_function("search_text_fts", |b| {
        b.iter(|| black_box(store.search_text(black_box("quick"), 20).unwrap()))
    });
}

criterion_group!(benches, bench_add_record, bench_search_text);
criterion_main!(benches);

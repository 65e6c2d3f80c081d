//! Key Codec Benchmarks
//!
//! Measures virtual-key → keysym translation throughput, since every
//! keystroke on every composing session goes through this table lookup.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use suyan_host::input::codec::KeyCodec;

fn bench_translate_letters(c: &mut Criterion) {
    let codec = KeyCodec::new();
    c.bench_function("translate_letters", |b| {
        b.iter(|| {
            for vk in 0x41u32..=0x5a {
                black_box(codec.translate(black_box(vk), black_box(false)));
            }
        })
    });
}

fn bench_translate_table_lookup(c: &mut Criterion) {
    let codec = KeyCodec::new();
    let keys = [0x08u32, 0x0d, 0x1b, 0x25, 0x26, 0x27, 0x28, 0x70, 0xa0];
    c.bench_function("translate_table_lookup", |b| {
        b.iter(|| {
            for &vk in &keys {
                black_box(codec.translate(black_box(vk), black_box(false)));
            }
        })
    });
}

criterion_group!(benches, bench_translate_letters, bench_translate_table_lookup);
criterion_main!(benches);

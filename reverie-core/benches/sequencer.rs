//! Playlist sequencer benchmarks.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use reverie_core::PlaylistSequencer;

fn bench_reshuffle(c: &mut Criterion) {
    c.bench_function("reshuffle_10k_tracks", |b| {
        let mut sequencer = PlaylistSequencer::new(10_000, Some(42)).unwrap();
        sequencer.set_shuffled(true);
        b.iter(|| {
            sequencer.reshuffle();
            black_box(sequencer.current());
        });
    });
}

fn bench_full_traversal(c: &mut Criterion) {
    c.bench_function("traverse_10k_tracks", |b| {
        let mut sequencer = PlaylistSequencer::new(10_000, Some(42)).unwrap();
        b.iter(|| {
            for _ in 0..10_000 {
                black_box(sequencer.next());
            }
        });
    });
}

criterion_group!(benches, bench_reshuffle, bench_full_traversal);
criterion_main!(benches);

//! Benchmarks for grouping the saved-album library by artist.
//!
//! These benchmarks measure a full regroup and the memoized lookup used on
//! every frame.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fake::{Fake, Faker};
use spotify_albums_tui::spotify::{ArtistRef, SavedAlbum};
use spotify_albums_tui::state::{group_by_artist, PageRequest, SavedAlbumsState};

/// Build a library where albums cycle through a fixed set of artists.
///
fn library(size: usize, artists: usize) -> Vec<SavedAlbum> {
    (0..size)
        .map(|i| {
            let mut saved: SavedAlbum = Faker.fake();
            saved.album.artists = vec![ArtistRef {
                id: format!("artist-{}", i % artists),
                name: format!("Artist {}", i % artists),
            }];
            saved
        })
        .collect()
}

fn bench_group_by_artist(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by_artist");
    for size in [50usize, 500, 2000] {
        let items = library(size, 40);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| group_by_artist(black_box(items)))
        });
    }
    group.finish();
}

fn bench_memoized_grouping(c: &mut Criterion) {
    let mut state = SavedAlbumsState::new(50);
    let request = state.begin_load();
    state.apply_page(request, library(50, 10));
    let mut offset = 0;
    while offset < 1950 {
        offset += 50;
        state.apply_page(PageRequest { offset, limit: 50 }, library(50, 10));
    }
    c.bench_function("grouped_by_artist_cached", |b| {
        b.iter(|| black_box(state.grouped_by_artist().len()))
    });
}

criterion_group!(benches, bench_group_by_artist, bench_memoized_grouping);
criterion_main!(benches);

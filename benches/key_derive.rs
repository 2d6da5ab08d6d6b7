//! Key 派生与存储读写基准测试

use std::hint::black_box;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shortkey::services::{KeyRange, LinkService};
use shortkey::storage::key::{base36, content_hash};
use shortkey::storage::store::DEFAULT_WRITE_TIMEOUT;
use shortkey::storage::{LinkKey, LinkStore};
use tempfile::TempDir;

// ============== key 派生 ==============

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("key/derive");
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

    for len in [16usize, 128, 2048] {
        let url = format!("https://example.com/{}", "a".repeat(len));
        group.bench_with_input(BenchmarkId::new("url_len", len), &url, |b, url| {
            b.iter(|| LinkKey::derive(black_box(url), now));
        });
    }

    group.bench_function("content_hash", |b| {
        b.iter(|| content_hash(black_box("https://example.com/landing?ref=newsletter")));
    });

    group.bench_function("base36_max", |b| {
        b.iter(|| base36(black_box(u64::MAX)));
    });

    group.finish();
}

// ============== 存储 ==============

fn bench_store(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LinkStore::open(dir.path().join("bench.db"), DEFAULT_WRITE_TIMEOUT).unwrap());
    let service = LinkService::new(store);

    let urls: String = (0..1000)
        .map(|i| format!("https://example.com/{}\n", i))
        .collect();
    let added = service.add_links(&urls).unwrap();
    let probe = added[500].key;

    let mut group = c.benchmark_group("store");

    group.bench_function("lookup_hit", |b| {
        b.iter(|| service.lookup(black_box(probe.as_bytes())).unwrap());
    });

    group.bench_function("list_first_page", |b| {
        b.iter(|| service.list(&KeyRange::default()).unwrap());
    });

    group.bench_function("add_batch_10", |b| {
        let batch: String = (0..10)
            .map(|i| format!("https://bench.example/{}\n", i))
            .collect();
        b.iter(|| service.add_links(black_box(&batch)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_derive, bench_store);
criterion_main!(benches);

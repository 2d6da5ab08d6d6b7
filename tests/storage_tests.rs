//! Storage layer tests
//!
//! Key derivation properties and store transaction semantics.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use shortkey::config::StoreConfig;
use shortkey::errors::ShortkeyError;
use shortkey::storage::key::{BUCKET_LEN, HASH_LEN, content_hash, time_bucket};
use shortkey::storage::{KEY_LEN, LinkKey, LinkStore, StorageFactory};

// =============================================================================
// Key derivation
// =============================================================================

#[test]
fn test_key_layout() {
    let now = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
    let key = LinkKey::derive("https://example.com/page", now);

    assert_eq!(key.as_bytes().len(), KEY_LEN);
    assert_eq!(key.bucket(), b"2511");
    assert_eq!(&time_bucket(now), b"2511");

    let hash = content_hash("https://example.com/page");
    let expected = &hash.as_bytes()[..HASH_LEN.min(hash.len())];
    assert_eq!(&key.hash_part()[..expected.len()], expected);
}

#[test]
fn test_key_is_deterministic_per_bucket() {
    let bucket = *b"2401";
    let urls = [
        "https://example.com",
        "https://example.com/",
        "http://a.b/c?d=e",
        "ftp://not-checked",
        "",
    ];
    for url in urls {
        assert_eq!(
            LinkKey::derive_at_bucket(url, &bucket),
            LinkKey::derive_at_bucket(url, &bucket)
        );
    }
}

#[test]
fn test_hash_part_is_base36() {
    let bucket = *b"2401";
    for i in 0..200 {
        let url = format!("https://example.com/{}", i);
        let key = LinkKey::derive_at_bucket(&url, &bucket);
        assert_eq!(key.bucket().len(), BUCKET_LEN);
        assert!(
            key.hash_part()
                .iter()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        );
    }
}

#[test]
fn test_short_encoding_is_padded_with_zero() {
    let key = LinkKey::pack(b"2401", "k3x9p2");
    assert_eq!(key.as_bytes(), b"2401k3x9p200");

    let key = LinkKey::pack(b"2401", "7");
    assert_eq!(key.bucket(), b"2401");
    assert_eq!(key.hash_part(), b"70000000");
}

#[test]
fn test_long_encoding_keeps_first_hash_len_bytes() {
    let encoded = "18oz3bldeyee1";
    let key = LinkKey::pack(b"2401", encoded);
    assert_eq!(key.hash_part(), &encoded.as_bytes()[..HASH_LEN]);
}

#[test]
fn test_keys_sort_by_month() {
    let url = "https://example.com";
    let dec = LinkKey::derive(url, Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap());
    let jan = LinkKey::derive(url, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert!(dec < jan);
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn test_factory_creates_nested_path() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        path: dir.path().join("a/b/links.db").display().to_string(),
        write_timeout_ms: 500,
    };
    let store = StorageFactory::create(&config).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.write_timeout(), Duration::from_millis(500));
}

#[test]
fn test_batch_write_is_atomic() {
    let dir = TempDir::new().unwrap();
    let store = LinkStore::open(dir.path().join("links.db"), Duration::from_secs(1)).unwrap();

    let result: shortkey::errors::Result<()> = store.with_write_transaction(|txn| {
        txn.put(b"2401aaaaaaaa", b"u1")?;
        txn.put(b"2401bbbbbbbb", b"u2")?;
        Err(ShortkeyError::store_operation("disk full"))
    });
    assert!(result.is_err());

    let first = store.with_read_transaction(|txn| txn.first_key()).unwrap();
    assert!(first.is_none());
}

#[test]
fn test_write_sees_own_writes() {
    let dir = TempDir::new().unwrap();
    let store = LinkStore::open(dir.path().join("links.db"), Duration::from_secs(1)).unwrap();

    let seen = store
        .with_write_transaction(|txn| {
            txn.put(b"2401aaaaaaaa", b"u1")?;
            txn.get(b"2401aaaaaaaa")
        })
        .unwrap();
    assert_eq!(seen.as_deref(), Some(b"u1".as_slice()));
}

#[test]
fn test_writer_timeout_when_slot_is_busy() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(
        LinkStore::open(dir.path().join("links.db"), Duration::from_millis(50)).unwrap(),
    );

    let (entered_tx, entered_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

    let holder = {
        let store = store.clone();
        std::thread::spawn(move || {
            store
                .with_write_transaction(|txn| {
                    txn.put(b"2401aaaaaaaa", b"u1")?;
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .unwrap();
        })
    };

    entered_rx.recv().unwrap();
    let err = store
        .with_write_transaction(|txn| txn.put(b"2401bbbbbbbb", b"u2"))
        .unwrap_err();
    assert!(matches!(err, ShortkeyError::WriterTimeout(_)));

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    // 锁释放后可以正常写入
    store
        .with_write_transaction(|txn| txn.put(b"2401bbbbbbbb", b"u2"))
        .unwrap();
}

#[test]
fn test_reader_not_blocked_by_writer() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(
        LinkStore::open(dir.path().join("links.db"), Duration::from_secs(1)).unwrap(),
    );
    store
        .with_write_transaction(|txn| txn.put(b"2401aaaaaaaa", b"old"))
        .unwrap();

    let (entered_tx, entered_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

    let writer = {
        let store = store.clone();
        std::thread::spawn(move || {
            store
                .with_write_transaction(|txn| {
                    txn.put(b"2401aaaaaaaa", b"new")?;
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .unwrap();
        })
    };

    entered_rx.recv().unwrap();
    let during = store
        .with_read_transaction(|txn| txn.get(b"2401aaaaaaaa"))
        .unwrap();
    assert_eq!(during.as_deref(), Some(b"old".as_slice()));

    release_tx.send(()).unwrap();
    writer.join().unwrap();

    let after = store
        .with_read_transaction(|txn| txn.get(b"2401aaaaaaaa"))
        .unwrap();
    assert_eq!(after.as_deref(), Some(b"new".as_slice()));
}

#[test]
fn test_open_rejects_garbage_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not-a-db");
    std::fs::write(&path, b"definitely not a redb file, just some bytes padding it out").unwrap();

    let err = LinkStore::open(&path, Duration::from_secs(1))
        .err()
        .expect("garbage file must not open");
    assert!(matches!(err, ShortkeyError::StoreOpen(_)));
}

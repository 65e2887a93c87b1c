//! Integration tests for the cache-or-fetch read path.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lorawatch_core::mock::MockTransport;
use lorawatch_core::{ConnectionConfig, NoEnrichment, ReadError, SensorReader};
use lorawatch_store::SnapshotCache;
use lorawatch_types::Snapshot;

fn test_config() -> Arc<ConnectionConfig> {
    Arc::new(ConnectionConfig {
        url: "https://x".to_string(),
        token: "t".to_string(),
        proxy: None,
        cache_timeout: 60_000,
    })
}

fn ok_body(records: &str) -> String {
    format!(r#"{{"_meta": {{"status": "OK"}}, "records": {records}}}"#)
}

/// Script the happy-path tree: one project, two devices, one message each.
fn script_happy_path(transport: &MockTransport) {
    transport.respond(
        "https://x/project/get?token=t",
        &ok_body(r#"[{"projectId": "p-1", "name": "Farm"}]"#),
    );
    transport.respond(
        "https://x/device/get/p-1?token=t",
        &ok_body(r#"[{"devEUI": "D1"}, {"devEUI": "D2"}]"#),
    );
    transport.respond(
        "https://x/message/get/D1?limit=1&token=t",
        &ok_body(r#"[{"lrrs": [{"Lrrid": "G1"}], "createdAt": "t1"}]"#),
    );
    transport.respond(
        "https://x/message/get/D2?limit=1&token=t",
        &ok_body(r#"[{"lrrs": [{"Lrrid": "G2"}], "createdAt": "t2"}]"#),
    );
}

fn reader_over(
    cache_path: &Path,
    transport: &Arc<MockTransport>,
    window: Duration,
) -> (SensorReader, Arc<SnapshotCache>) {
    let cache = Arc::new(SnapshotCache::new(cache_path, window));
    let reader = SensorReader::new(
        test_config(),
        Arc::clone(&cache),
        Arc::clone(transport) as _,
        Arc::new(NoEnrichment),
    );
    (reader, cache)
}

fn cached_snapshot() -> Snapshot {
    serde_json::from_str(
        r#"{
            "projects": [{"projectId": "cached"}],
            "sensors": [{"devEUI": "CACHED"}]
        }"#,
    )
    .unwrap()
}

/// The write-back is detached; give it a moment to land.
async fn wait_for_file(path: &Path) {
    for _ in 0..200 {
        if path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("cache file was not written at {}", path.display());
}

#[tokio::test]
async fn test_fresh_cache_skips_network() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    let (reader, cache) = reader_over(&path, &transport, Duration::from_secs(60));

    cache.write(&cached_snapshot()).unwrap();

    let snapshot = reader.read_sensors_data(false).await.unwrap();
    assert_eq!(snapshot.sensors[0].dev_eui, "CACHED");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_repeated_cached_reads_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    let (reader, cache) = reader_over(&path, &transport, Duration::from_secs(60));

    cache.write(&cached_snapshot()).unwrap();

    let first = reader.read_sensors_data(false).await.unwrap();
    let second = reader.read_sensors_data(false).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_force_refresh_always_hits_network() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    script_happy_path(&transport);
    let (reader, cache) = reader_over(&path, &transport, Duration::from_secs(60));

    // A perfectly fresh cache must still be bypassed.
    cache.write(&cached_snapshot()).unwrap();

    let snapshot = reader.read_sensors_data(true).await.unwrap();
    assert_eq!(snapshot.projects[0].project_id, "p-1");
    assert!(snapshot.sensors.iter().all(|d| d.dev_eui != "CACHED"));
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_live_fetch_writes_cache_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    script_happy_path(&transport);
    let (reader, cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let snapshot = reader.read_sensors_data(false).await.unwrap();
    assert_eq!(snapshot.sensors.len(), 2);

    wait_for_file(&path).await;
    let persisted = cache.read().unwrap();
    assert_eq!(persisted.sensors.len(), 2);
    assert_eq!(persisted.projects[0].project_id, "p-1");
}

#[tokio::test]
async fn test_stale_cache_triggers_live_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    script_happy_path(&transport);
    // Zero freshness window: anything on disk is already stale.
    let (reader, cache) = reader_over(&path, &transport, Duration::ZERO);

    cache.write(&cached_snapshot()).unwrap();

    let snapshot = reader.read_sensors_data(false).await.unwrap();
    assert_eq!(snapshot.projects[0].project_id, "p-1");
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_corrupt_fresh_cache_falls_back_to_live_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    std::fs::write(&path, "{ not json").unwrap();

    let transport = Arc::new(MockTransport::new());
    script_happy_path(&transport);
    let (reader, _cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let snapshot = reader.read_sensors_data(false).await.unwrap();
    assert_eq!(snapshot.projects[0].project_id, "p-1");
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_root_failure_yields_unavailable_and_no_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    transport.fail("https://x/project/get?token=t", "connection refused");
    let (reader, _cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let err = reader.read_sensors_data(false).await.unwrap_err();
    assert_eq!(err, ReadError::Unavailable);
    assert_eq!(
        err.to_string(),
        "Unable to read sensors data. Check server log and verify connection configuration."
    );
    assert!(!path.exists());
}

#[tokio::test]
async fn test_rejected_root_yields_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    transport.respond(
        "https://x/project/get?token=t",
        r#"{"_meta": {"status": "ERROR", "message": "bad token"}}"#,
    );
    let (reader, _cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let err = reader.read_sensors_data(false).await.unwrap_err();
    assert_eq!(err, ReadError::Unavailable);
}

#[tokio::test]
async fn test_unparseable_root_yields_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    transport.respond("https://x/project/get?token=t", "<html>504</html>");
    let (reader, _cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let err = reader.read_sensors_data(false).await.unwrap_err();
    assert_eq!(err, ReadError::Internal);
    assert_eq!(err.to_string(), "Server error. Check server log.");
    assert!(!path.exists());
}

#[tokio::test]
async fn test_partial_message_rejection_still_caches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.cache.json");
    let transport = Arc::new(MockTransport::new());
    transport.respond(
        "https://x/project/get?token=t",
        &ok_body(r#"[{"projectId": "p-1"}]"#),
    );
    transport.respond(
        "https://x/device/get/p-1?token=t",
        &ok_body(r#"[{"devEUI": "D1"}, {"devEUI": "D2"}]"#),
    );
    transport.respond(
        "https://x/message/get/D1?limit=1&token=t",
        &ok_body(r#"[{"lrrs": [{"Lrrid": "G1"}], "createdAt": "t1"}]"#),
    );
    transport.respond(
        "https://x/message/get/D2?limit=1&token=t",
        r#"{"_meta": {"status": "ERROR"}}"#,
    );
    let (reader, cache) = reader_over(&path, &transport, Duration::from_secs(60));

    let snapshot = reader.read_sensors_data(false).await.unwrap();
    assert_eq!(snapshot.sensors.len(), 2);

    let d2 = snapshot.sensors.iter().find(|d| d.dev_eui == "D2").unwrap();
    assert!(d2.created_at.is_none());

    wait_for_file(&path).await;
    assert_eq!(cache.read().unwrap().sensors.len(), 2);
}

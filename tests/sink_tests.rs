use chrono::{TimeZone, Utc};
use flate2::read::GzDecoder;
use object_store::memory::InMemory;
use s3_log_sink::{
    ApacheObjectStoreAdapter, FlushOutcome, LogRecord, LogSink, ObjectKey, ObjectStore,
    RawSinkSettings, RecordValue, SinkBuilder,
};
use serde_json::{json, Value};
use std::io::Read;
use std::sync::Arc;

fn settings() -> RawSinkSettings {
    RawSinkSettings {
        access_key_id: "AKIAEXAMPLE".to_string(),
        secret_access_key: "wJalrXUtnFEMI".to_string(),
        bucket: "fluent-logs".to_string(),
        s3_prefix: "cluster/web".to_string(),
        region: "ap-northeast-1".to_string(),
        time_zone: "Asia/Tokyo".to_string(),
        ..Default::default()
    }
}

fn memory_store() -> Arc<ApacheObjectStoreAdapter> {
    Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())))
}

fn lines(data: &[u8]) -> Vec<Value> {
    std::str::from_utf8(data)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn flush_writes_time_partitioned_ndjson() {
    let store = memory_store();
    let sink = SinkBuilder::new(settings())
        .with_object_store(store.clone())
        .build()
        .await
        .unwrap();

    // 2024-03-05 08:07:09 in Tokyo
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 23, 7, 9).unwrap();
    let records = vec![
        LogRecord::new()
            .with("log", b"GET / 200".as_slice())
            .with(
                "kubernetes",
                LogRecord::new().with("pod_name", b"web-0".as_slice()),
            ),
        LogRecord::new().with("log", b"GET /health 200".as_slice()),
    ];

    assert_eq!(sink.flush_at(records, now).await, FlushOutcome::Success);

    let key = ObjectKey::new("cluster/web/20240305/08/20240305080709.log".to_string()).unwrap();
    let data = store.get_object(&key).await.unwrap();
    assert_eq!(
        lines(&data),
        vec![
            json!({ "log": "GET / 200", "kubernetes": { "pod_name": "web-0" } }),
            json!({ "log": "GET /health 200" }),
        ]
    );
}

#[tokio::test]
async fn gzip_sink_uploads_compressed_object() {
    let store = memory_store();
    let sink = SinkBuilder::new(RawSinkSettings {
        compress: "gzip".to_string(),
        ..settings()
    })
    .with_object_store(store.clone())
    .build()
    .await
    .unwrap();

    let records: Vec<LogRecord> = (0..100i64)
        .map(|i| LogRecord::new().with("seq", i).with("log", "repeated line"))
        .collect();
    assert_eq!(sink.flush(records).await, FlushOutcome::Success);

    let objects = store.list_objects(Some("cluster/web")).await.unwrap();
    assert_eq!(objects.len(), 1);
    assert!(objects[0].key.as_str().ends_with(".log.gz"));

    let data = store.get_object(&objects[0].key).await.unwrap();
    let mut decoded = Vec::new();
    GzDecoder::new(data.as_slice())
        .read_to_end(&mut decoded)
        .unwrap();

    let decoded = lines(&decoded);
    assert_eq!(decoded.len(), 100);
    assert_eq!(decoded[42], json!({ "seq": 42, "log": "repeated line" }));
}

#[tokio::test]
async fn records_from_json_keep_their_types() {
    let store = memory_store();
    let sink = SinkBuilder::new(settings())
        .with_object_store(store.clone())
        .build()
        .await
        .unwrap();

    let input = json!({
        "level": "info",
        "status": 503,
        "latency": 0.25,
        "tags": ["a", "b"],
        "ok": false,
        "trace": null
    });
    let record = match RecordValue::from(input.clone()) {
        RecordValue::Map(record) => record,
        other => panic!("expected a map, got {other:?}"),
    };

    assert_eq!(sink.flush(vec![record]).await, FlushOutcome::Success);

    let objects = store.list_objects(Some("cluster")).await.unwrap();
    let data = store.get_object(&objects[0].key).await.unwrap();
    assert_eq!(lines(&data), vec![input]);
}

#[tokio::test]
async fn same_second_flushes_overwrite() {
    let store = memory_store();
    let sink = SinkBuilder::new(settings())
        .with_object_store(store.clone())
        .build()
        .await
        .unwrap();

    let now = Utc.with_ymd_and_hms(2024, 3, 4, 23, 7, 9).unwrap();
    sink.flush_at(vec![LogRecord::new().with("n", 1i64)], now)
        .await;
    sink.flush_at(vec![LogRecord::new().with("n", 2i64)], now)
        .await;

    let objects = store.list_objects(Some("cluster")).await.unwrap();
    assert_eq!(objects.len(), 1);
    let data = store.get_object(&objects[0].key).await.unwrap();
    assert_eq!(lines(&data), vec![json!({ "n": 2 })]);
}

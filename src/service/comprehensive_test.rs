//! Comprehensive tests for the key-value facade

#[cfg(test)]
mod integration_tests {
    use crate::config::StoreConfig;
    use crate::edge::mock_reader::MockEdgeReader;
    use crate::error::KvError;
    use crate::invalidation::mock_invalidator::MockInvalidator;
    use crate::service::{KeyValueStore, Lookup, Payload};
    use crate::storage::mock_store::MockObjectStore;
    use serde::Serialize;
    use serde_json::json;
    use std::sync::Arc;

    const BUCKET: &str = "test-bucket";
    const EDGE: &str = "https://d111.cloudfront.net";
    const DISTRIBUTION: &str = "E2EXAMPLE";

    struct Harness {
        store: Arc<KeyValueStore>,
        objects: Arc<MockObjectStore>,
        invalidator: Arc<MockInvalidator>,
        reader: Arc<MockEdgeReader>,
    }

    /// Store whose edge serves whatever the mock bucket holds
    fn harness() -> Harness {
        let _ = env_logger::builder().is_test(true).try_init();
        let objects = Arc::new(MockObjectStore::new());
        let invalidator = Arc::new(MockInvalidator::new());
        let reader = Arc::new(MockEdgeReader::mirroring(Arc::clone(&objects), BUCKET, EDGE));
        let store = Arc::new(KeyValueStore::new(
            StoreConfig::new("us-east-1", BUCKET, EDGE, DISTRIBUTION),
            objects.clone(),
            invalidator.clone(),
            reader.clone(),
        ));
        Harness { store, objects, invalidator, reader }
    }

    #[actix_web::test]
    async fn test_set_object_then_get() {
        let h = harness();

        h.store.set("profile", json!({"name": "Ana"})).await.expect("Set failed");

        let stored = h.objects.object(BUCKET, "corejson/profile.json").expect("Object missing");
        assert_eq!(&stored.body[..], br#"{"name":"Ana"}"#);
        assert_eq!(stored.content_type, "application/json");
        assert!(stored.public_read);
        assert_eq!(stored.metadata.get("cache-control").map(String::as_str), Some("max-age=31536000"));

        assert_eq!(h.store.get("profile").await, Some(json!({"name": "Ana"})));
        assert_eq!(
            h.reader.fetched_urls(),
            vec!["https://d111.cloudfront.net/corejson/profile.json".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_set_raw_text_then_get() {
        let h = harness();

        h.store.set("raw", "plain text").await.expect("Set failed");

        assert_eq!(h.objects.body(BUCKET, "corejson/raw.json").as_deref(), Some(r#""plain text""#));
        assert_eq!(h.store.get("raw").await, Some(json!("plain text")));
    }

    #[actix_web::test]
    async fn test_set_json_text_is_not_double_encoded() {
        let h = harness();
        let text = r#"{"items": [1, 2, 3], "ok": true}"#;

        h.store.set("list", text).await.expect("Set failed");

        assert_eq!(h.objects.body(BUCKET, "corejson/list.json").as_deref(), Some(text));
        assert_eq!(h.store.get("list").await, Some(json!({"items": [1, 2, 3], "ok": true})));
    }

    #[actix_web::test]
    async fn test_set_value_serializes_struct() {
        #[derive(Serialize)]
        struct Profile {
            name: String,
            age: u32,
        }
        let h = harness();

        h.store
            .set_value("ana", &Profile { name: "Ana".to_string(), age: 31 })
            .await
            .expect("Set failed");

        assert_eq!(h.objects.body(BUCKET, "corejson/ana.json").as_deref(), Some(r#"{"name":"Ana","age":31}"#));
        assert_eq!(h.store.get("ana").await, Some(json!({"name": "Ana", "age": 31})));
    }

    #[actix_web::test]
    async fn test_set_value_of_plain_string_is_quoted() {
        let h = harness();

        h.store.set_value("greeting", "hello").await.expect("Set failed");

        assert_eq!(h.objects.body(BUCKET, "corejson/greeting.json").as_deref(), Some(r#""hello""#));
    }

    #[actix_web::test]
    async fn test_invalidation_request_for_key() {
        let h = harness();

        h.store.set("profile", json!({"name": "Ana"})).await.expect("Set failed");

        let request = h.invalidator.last_request().expect("No invalidation issued");
        assert_eq!(request.distribution_id, DISTRIBUTION);
        assert_eq!(request.quantity(), 1);
        assert_eq!(request.paths, vec!["/corejson/profile.json".to_string()]);
    }

    #[actix_web::test]
    async fn test_every_set_invalidates_once() {
        let h = harness();

        for i in 0..3 {
            h.store.set("counter", json!(i)).await.expect("Set failed");
        }

        let requests = h.invalidator.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.paths == vec!["/corejson/counter.json".to_string()]));
        assert_ne!(requests[0].caller_reference, requests[1].caller_reference);
        assert_ne!(requests[1].caller_reference, requests[2].caller_reference);
        assert_eq!(h.objects.upload_count(), 3);
        assert_eq!(h.store.get("counter").await, Some(json!(2)));
    }

    #[actix_web::test]
    async fn test_upload_failure_skips_invalidation() {
        let h = harness();
        h.objects.set_failing(true);

        let err = h.store.set("profile", json!({"name": "Ana"})).await.unwrap_err();

        assert!(matches!(err, KvError::Upload(_)));
        assert!(err.to_string().starts_with("failed to upload file or invalidate cache"));
        assert_eq!(h.invalidator.request_count(), 0);
        assert!(!h.objects.object_exists(BUCKET, "corejson/profile.json"));
    }

    #[actix_web::test]
    async fn test_invalidation_failure_keeps_object() {
        let h = harness();
        h.invalidator.set_failing(true);

        let err = h.store.set("profile", json!({"name": "Ana"})).await.unwrap_err();

        assert!(matches!(err, KvError::Invalidation(_)));
        assert!(err.to_string().starts_with("failed to upload file or invalidate cache"));
        assert_eq!(h.objects.body(BUCKET, "corejson/profile.json").as_deref(), Some(r#"{"name":"Ana"}"#));
    }

    #[actix_web::test]
    async fn test_get_missing_key_returns_none() {
        let h = harness();

        assert_eq!(h.store.get("never-set").await, None);
        assert_eq!(h.store.lookup("never-set").await, Lookup::NotFound);
    }

    #[actix_web::test]
    async fn test_get_failure_returns_none() {
        let h = harness();
        h.store.set("profile", json!({"name": "Ana"})).await.expect("Set failed");

        h.reader.set_unreachable(true);
        assert_eq!(h.store.get("profile").await, None);
        assert!(matches!(h.store.lookup("profile").await, Lookup::Unavailable(_)));
    }

    #[actix_web::test]
    async fn test_get_server_error_and_malformed_body_return_none() {
        let h = harness();
        h.reader.serve("https://d111.cloudfront.net/corejson/broken.json", 502, "Bad Gateway");
        h.reader.serve("https://d111.cloudfront.net/corejson/html.json", 200, "<html></html>");

        assert_eq!(h.store.get("broken").await, None);
        assert_eq!(
            h.store.lookup("broken").await,
            Lookup::Unavailable("unexpected status 502".to_string())
        );
        assert_eq!(h.store.get("html").await, None);
        assert!(matches!(h.store.lookup("html").await, Lookup::Unavailable(_)));
    }

    #[actix_web::test]
    async fn test_stale_edge_copy_is_served_until_invalidated() {
        let h = harness();
        // A cached edge response shadows the bucket
        h.reader.serve("https://d111.cloudfront.net/corejson/profile.json", 200, r#"{"name":"Old"}"#);

        h.store.set("profile", json!({"name": "Ana"})).await.expect("Set failed");

        assert_eq!(h.store.get("profile").await, Some(json!({"name": "Old"})));
        assert_eq!(h.invalidator.request_count(), 1);
    }

    #[actix_web::test]
    async fn test_payload_variants() {
        let h = harness();

        h.store.set("n", Payload::Text("42".to_string())).await.unwrap();
        h.store.set("s", Payload::Json(json!("42"))).await.unwrap();
        h.store.set("owned", String::from("not json")).await.unwrap();

        assert_eq!(h.store.get("n").await, Some(json!(42)));
        assert_eq!(h.store.get("s").await, Some(json!("42")));
        assert_eq!(h.store.get("owned").await, Some(json!("not json")));
    }

    #[actix_web::test]
    async fn test_deeply_nested_value_round_trip() {
        let h = harness();
        let mut value = json!({"leaf": true});
        for _ in 0..200 {
            value = json!([value]);
        }

        h.store.set("deep", value.clone()).await.expect("Set failed");
        assert_eq!(h.store.get("deep").await, Some(value));

        let text = format!("{}0{}", "[".repeat(200), "]".repeat(200));
        h.store.set("deep_text", text.as_str()).await.expect("Set failed");
        assert_eq!(h.objects.body(BUCKET, "corejson/deep_text.json").as_deref(), Some(text.as_str()));
        assert!(h.store.get("deep_text").await.is_some());
    }

    #[actix_web::test]
    async fn test_out_of_range_number_text_is_stored_verbatim() {
        let h = harness();

        h.store.set("huge", "1e400").await.expect("Set failed");

        assert_eq!(h.objects.body(BUCKET, "corejson/huge.json").as_deref(), Some("1e400"));
        // Not representable as a value, so the read counts as a failure
        assert_eq!(h.store.get("huge").await, None);
        assert!(matches!(h.store.lookup("huge").await, Lookup::Unavailable(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_operations() {
        let h = harness();

        let handles: Vec<_> = (0..8).map(|i| {
            let store = Arc::clone(&h.store);
            tokio::spawn(async move {
                let key = format!("concurrent_{}", i);
                store.set(&key, json!({"index": i})).await.unwrap();
                store.get(&key).await
            })
        }).collect();

        let results = futures::future::join_all(handles).await;
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), Some(json!({"index": i})));
        }
        assert_eq!(h.objects.object_count(BUCKET), 8);
        assert_eq!(h.invalidator.request_count(), 8);
    }
}

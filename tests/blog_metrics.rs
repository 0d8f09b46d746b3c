use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use metrics::Unit;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tower::ServiceExt;

use blogfeed::application::blogs::{BlogFeedService, FixedClock};
use blogfeed::infra::content::JsonFileSource;
use blogfeed::infra::http::{BLOGS_PATH, HttpState, build_router};
use blogfeed::infra::telemetry::{
    BLOG_LOAD_MS, BLOG_REQUESTS_TOTAL, BLOGS_PUBLISHED, describe_metrics,
};
use blogfeed::util::timezone::ReferenceZone;

#[tokio::test]
async fn blog_requests_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    describe_metrics();

    let dir = tempfile::tempdir().expect("tempdir");
    let listed = dir.path().join("listed.json");
    let empty = dir.path().join("empty.json");
    let missing = dir.path().join("missing.json");
    std::fs::write(
        &listed,
        r#"[{ "publishedAt": "2030-01-01" }, { "publishedAt": "2030-02-01" }]"#,
    )
    .expect("write listed");
    std::fs::write(&empty, "[]").expect("write empty");

    let now = Utc.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap();
    let cases = [
        (listed, StatusCode::OK),
        (empty, StatusCode::NOT_FOUND),
        (missing, StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (path, expected) in cases {
        let service = BlogFeedService::new(
            Arc::new(JsonFileSource::new(path)),
            Arc::new(FixedClock(now)),
            ReferenceZone::Named(chrono_tz::UTC),
        );
        let router = build_router(HttpState {
            blogs: Arc::new(service),
        });
        let request = Request::builder()
            .method(Method::GET)
            .uri(BLOGS_PATH)
            .body(Body::empty())
            .expect("request should build");
        let response = router.oneshot(request).await.expect("router should respond");
        assert_eq!(response.status(), expected);
    }

    let snapshot = snapshotter.snapshot().into_vec();

    let names: HashSet<String> = snapshot
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();
    for metric in [BLOG_REQUESTS_TOTAL, BLOG_LOAD_MS, BLOGS_PUBLISHED] {
        assert!(names.contains(metric), "missing metric: {metric}");
    }

    let outcomes: HashMap<String, u64> = snapshot
        .iter()
        .filter(|(composite_key, _, _, _)| composite_key.key().name() == BLOG_REQUESTS_TOTAL)
        .filter_map(|(composite_key, _, _, value)| {
            let outcome = composite_key
                .key()
                .labels()
                .find(|label| label.key() == "outcome")?
                .value()
                .to_string();
            match value {
                DebugValue::Counter(count) => Some((outcome, *count)),
                _ => None,
            }
        })
        .collect();
    assert_eq!(outcomes.get("ok"), Some(&1));
    assert_eq!(outcomes.get("empty"), Some(&1));
    assert_eq!(outcomes.get("error"), Some(&1));

    let published = snapshot
        .iter()
        .find(|(composite_key, _, _, _)| composite_key.key().name() == BLOGS_PUBLISHED)
        .map(|(_, _, _, value)| value.clone());
    match published {
        Some(DebugValue::Gauge(value)) => assert_eq!(value.into_inner(), 2.0),
        other => panic!("unexpected gauge value: {other:?}"),
    }

    let load_unit = snapshot
        .iter()
        .find(|(composite_key, _, _, _)| composite_key.key().name() == BLOG_LOAD_MS)
        .and_then(|(_, unit, _, _)| *unit);
    assert_eq!(load_unit, Some(Unit::Milliseconds));
}

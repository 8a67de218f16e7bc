//! HttpBackend against a mock profiling server
//!
//! Covers the `/p` query string, body interpretation and the `/stats` decode.

use mockito::Matcher;
use pprof_dashboard::backend::{HttpBackend, ProfileBackend};
use pprof_dashboard::config::DashboardConfig;
use pprof_dashboard::error::FetchError;
use pprof_dashboard::models::{Metric, ProfileKind, StatsSample, TableQuery, TableResponse};

fn backend_for(url: String) -> HttpBackend {
    let config = DashboardConfig {
        target: url,
        ..DashboardConfig::default()
    };
    HttpBackend::new(&config).unwrap()
}

fn query(profile: ProfileKind, filter: &str, cumsort: bool, force: bool) -> TableQuery {
    TableQuery {
        profile,
        filter: filter.to_string(),
        cumsort,
        force,
    }
}

#[tokio::test]
async fn test_table_request_sends_all_parameters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/p")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("profile".into(), "profile".into()),
            Matcher::UrlEncoded("filter".into(), "runtime\\.(malloc|gc)".into()),
            Matcher::UrlEncoded("cumsort".into(), "true".into()),
            Matcher::UrlEncoded("force".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"score":1.0,"flat":"120ms","flat_perc":"40%","flatsum_perc":"40%","cum":"200ms","cum_perc":"66%","name":"runtime.mallocgc"},
                {"score":0.25,"flat":30,"flat_perc":"10%","flatsum_perc":"50%","cum":30,"cum_perc":"10%","name":"runtime.gcBgMarkWorker"}]"#,
        )
        .create_async()
        .await;

    let backend = backend_for(server.url());
    let response = backend
        .fetch_table(query(ProfileKind::Cpu, "runtime\\.(malloc|gc)", true, true))
        .await
        .unwrap();

    mock.assert_async().await;
    match response {
        TableResponse::Rows(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].name, "runtime.mallocgc");
            assert_eq!(rows[0].flat, Metric::Text("120ms".to_string()));
            assert_eq!(rows[1].flat, Metric::Number(30.0));
            assert_eq!(rows[1].bar_fraction(), 0.25);
        }
        other => panic!("Expected rows, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_filter_is_still_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/p")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("profile".into(), "heap".into()),
            Matcher::UrlEncoded("filter".into(), "".into()),
            Matcher::UrlEncoded("cumsort".into(), "false".into()),
            Matcher::UrlEncoded("force".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;

    let backend = backend_for(server.url());
    let response = backend
        .fetch_table(query(ProfileKind::Heap, "", false, false))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response, TableResponse::Rows(Vec::new()));
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/p")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("Profile not found.")
        .create_async()
        .await;

    let backend = backend_for(server.url());
    let err = backend
        .fetch_table(query(ProfileKind::Heap, "", true, false))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Status { code: 404, body: "Profile not found.".to_string() }
    );
    assert_eq!(err.display_body(), "Profile not found.");
}

#[tokio::test]
async fn test_plain_text_body_becomes_fragment() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/p")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<p>no samples</p>")
        .create_async()
        .await;

    let backend = backend_for(format!("{}/", server.url()));
    let response = backend
        .fetch_table(query(ProfileKind::Heap, "", true, false))
        .await
        .unwrap();

    assert_eq!(response, TableResponse::Fragment("<p>no samples</p>".to_string()));
}

#[tokio::test]
async fn test_stats_decode() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/stats")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"goroutine":12,"thread":40,"block":3,"timestamp":1700000000}"#)
        .create_async()
        .await;

    let backend = backend_for(server.url());
    let sample = backend.fetch_stats().await.unwrap();

    assert_eq!(
        sample,
        StatsSample { goroutine: 12, thread: 40, block: 3, timestamp: Some(1700000000) }
    );
}

#[tokio::test]
async fn test_stats_bad_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/stats")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let backend = backend_for(server.url());
    let err = backend.fetch_stats().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Nothing listens on port 1
    let backend = backend_for("http://127.0.0.1:1".to_string());
    let err = backend.fetch_stats().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {:?}", err);
}

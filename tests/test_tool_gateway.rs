//! Tool gateway behaviour against a stub upstream
//!
//! Covers the observable contract of `add-document` and `list-documents`:
//! validation happens before any network call, upstream payloads pass through
//! untouched, and upstream failures keep their status code.

use proptest::prelude::*;
use readwise_gateway::error::GatewayError;
use readwise_gateway::testing::{MockReader, RecordingNotifier};
use readwise_gateway::tools::ToolSystem;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_helpers::test_gateway;

/// Any request reaching the stub fails the test when the server drops
async fn mount_no_calls(mock_server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_add_document_scenario() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "123", "title": "Example"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tools, notifier) = test_gateway(&mock_server.uri());
    let result = tools
        .execute_tool("add-document", &json!({"url": "https://example.com/article"}))
        .await
        .unwrap();

    assert_eq!(result, json!({"id": "123", "title": "Example"}));
    assert_eq!(notifier.publish_count(), 1);
}

#[tokio::test]
async fn test_add_document_missing_url_makes_no_call() {
    let mock_server = MockServer::start().await;
    mount_no_calls(&mock_server).await;

    let (tools, notifier) = test_gateway(&mock_server.uri());

    for arguments in [json!({}), json!({"url": ""}), json!({"url": "  "})] {
        let result = tools.execute_tool("add-document", &arguments).await;
        assert!(
            matches!(result, Err(GatewayError::Validation { .. })),
            "Accepted: {arguments}"
        );
    }
    assert_eq!(notifier.publish_count(), 0);
}

#[tokio::test]
async fn test_add_document_upstream_rejection_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid URL"})))
        .mount(&mock_server)
        .await;

    let (tools, notifier) = test_gateway(&mock_server.uri());
    let error = tools
        .execute_tool("add-document", &json!({"url": "https://nowhere.invalid/"}))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(400));
    assert_eq!(error.to_payload().message, "Invalid URL");
    assert_eq!(notifier.publish_count(), 0);
}

#[tokio::test]
async fn test_list_documents_empty_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("location", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "nextPageCursor": null,
            "results": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tools, _) = test_gateway(&mock_server.uri());
    let result = tools
        .execute_tool("list-documents", &json!({"location": "new"}))
        .await
        .unwrap();

    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_list_documents_bogus_location_makes_no_call() {
    let mock_server = MockServer::start().await;
    mount_no_calls(&mock_server).await;

    let (tools, _) = test_gateway(&mock_server.uri());
    let result = tools
        .execute_tool("list-documents", &json!({"location": "bogus"}))
        .await;

    assert!(matches!(result, Err(GatewayError::Validation { .. })));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_documents_blank_timestamp_makes_no_call() {
    let mock_server = MockServer::start().await;
    mount_no_calls(&mock_server).await;

    let (tools, _) = test_gateway(&mock_server.uri());
    for arguments in [
        json!({"location": "new", "updatedAfter": ""}),
        json!({"location": "new", "updatedAfter": "   "}),
        json!({"location": "new", "updatedAfter": "2024-01-01", "updated_after": "garbage"}),
    ] {
        let result = tools.execute_tool("list-documents", &arguments).await;
        assert!(
            matches!(result, Err(GatewayError::Validation { .. })),
            "Accepted: {arguments}"
        );
    }
}

#[tokio::test]
async fn test_list_documents_sparse_documents_gain_no_keys() {
    let mock_server = MockServer::start().await;

    let results = json!([
        {"id": "1", "url": "https://read.readwise.io/read/1"},
        {"id": "2", "title": null}
    ]);

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "nextPageCursor": null,
            "results": results.clone()
        })))
        .mount(&mock_server)
        .await;

    let (tools, _) = test_gateway(&mock_server.uri());
    let result = tools
        .execute_tool("list-documents", &json!({"location": "new"}))
        .await
        .unwrap();

    assert_eq!(result, results);
}

#[tokio::test]
async fn test_list_documents_mirrors_upstream_payload() {
    let mock_server = MockServer::start().await;

    let results = json!([
        {
            "id": "z",
            "title": "Zeta",
            "source_url": "https://z.example/post",
            "category": "article",
            "updated_at": "2024-06-01T09:00:00Z",
            "author": "Someone",
            "word_count": 900,
            "summary": null
        },
        {
            "id": "a",
            "title": "Alpha",
            "source_url": "https://a.example/feed",
            "category": "rss",
            "updated_at": "2024-01-01T09:00:00Z",
            "tags": {}
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("updatedAfter", "2024-01-01T00:00:00+00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "nextPageCursor": null,
            "results": results.clone()
        })))
        .mount(&mock_server)
        .await;

    let (tools, _) = test_gateway(&mock_server.uri());
    let result = tools
        .execute_tool(
            "list-documents",
            &json!({"location": "later", "updatedAfter": "2024-01-01"}),
        )
        .await
        .unwrap();

    assert_eq!(result, results);
}

#[tokio::test]
async fn test_list_documents_upstream_failures_keep_status() {
    for status in [401u16, 404, 500, 503] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let (tools, _) = test_gateway(&mock_server.uri());
        let error = tools
            .execute_tool("list-documents", &json!({"location": "archive"}))
            .await
            .unwrap_err();

        assert!(matches!(error, GatewayError::Upstream { .. }));
        assert_eq!(error.status(), Some(status), "Failed for status {status}");
    }
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "nextPageCursor": null,
            "results": [{"id": "1"}]
        })))
        .expect(8)
        .mount(&mock_server)
        .await;

    let (tools, _) = test_gateway(&mock_server.uri());
    let tools = Arc::new(tools);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let tools = tools.clone();
        handles.push(tokio::spawn(async move {
            tools
                .execute_tool("list-documents", &json!({"location": "feed"}))
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.as_array().unwrap().len(), 1);
    }
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn mock_gateway() -> (ToolSystem, Arc<MockReader>) {
    let reader = Arc::new(MockReader::new());
    let tools = ToolSystem::reader(reader.clone(), Arc::new(RecordingNotifier::new()));
    (tools, reader)
}

fn is_validation(result: &Result<Value, GatewayError>) -> bool {
    matches!(result, Err(GatewayError::Validation { .. }))
}

proptest! {
    #[test]
    fn blank_urls_never_reach_upstream(url in "[ \t]{0,8}") {
        let (tools, reader) = mock_gateway();
        let result = run(tools.execute_tool("add-document", &json!({"url": url})));

        prop_assert!(is_validation(&result));
        prop_assert_eq!(run(reader.call_count()), 0);
    }

    #[test]
    fn unknown_locations_never_reach_upstream(location in "[a-zA-Z]{0,12}") {
        prop_assume!(!["new", "later", "archive", "feed"].contains(&location.as_str()));

        let (tools, reader) = mock_gateway();
        let result = run(tools.execute_tool("list-documents", &json!({"location": location})));

        prop_assert!(is_validation(&result));
        prop_assert_eq!(run(reader.call_count()), 0);
    }

    #[test]
    fn unparseable_timestamps_are_rejected(updated_after in "[a-zA-Z ]{0,20}") {
        let (tools, reader) = mock_gateway();
        let result = run(tools.execute_tool(
            "list-documents",
            &json!({"location": "new", "updatedAfter": updated_after}),
        ));

        prop_assert!(is_validation(&result));
        prop_assert_eq!(run(reader.call_count()), 0);
    }
}

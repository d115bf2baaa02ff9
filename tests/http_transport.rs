//! `HttpTransport` against a mock Meilisearch over real HTTP.

use std::time::Duration;

use meilisearch_mcp::client::{ApiRequest, Coordinates, HttpTransport, MeiliClient, Transport};
use meilisearch_mcp::{Error, ErrorKind};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn sends_bearer_key_and_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .and(header("authorization", "Bearer masterKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pkgVersion": "1.6.0"})))
        .expect(1)
        .mount(&server)
        .await;

    let coords = Coordinates::new(server.uri(), Some("masterKey".into()));
    let body = transport()
        .send(&coords, ApiRequest::new(Method::GET, ["version"]))
        .await
        .unwrap();
    assert_eq!(body["pkgVersion"], "1.6.0");
}

#[tokio::test]
async fn omits_authorization_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "available"})))
        .mount(&server)
        .await;

    let client = MeiliClient::new(
        Coordinates::new(server.uri(), None),
        Arc::new(transport()),
    )
    .unwrap();
    assert!(client.is_healthy().await);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn forwards_query_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/movies/documents"))
        .and(query_param("primaryKey", "id"))
        .and(body_json(json!([{"id": 1}])))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"taskUid": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::new(Method::POST, ["indexes", "movies", "documents"])
        .with_query("primaryKey", Some("id"))
        .with_body(json!([{"id": 1}]));
    let body = transport()
        .send(&Coordinates::new(server.uri(), None), request)
        .await
        .unwrap();
    assert_eq!(body["taskUid"], 3);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meili/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"databaseSize": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let coords = Coordinates::new(format!("{}/meili/", server.uri()), None);
    let body = transport()
        .send(&coords, ApiRequest::new(Method::GET, ["stats"]))
        .await
        .unwrap();
    assert_eq!(body["databaseSize"], 1);
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/keys/abc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = transport()
        .send(
            &Coordinates::new(server.uri(), Some("k".into())),
            ApiRequest::new(Method::DELETE, ["keys", "abc"]),
        )
        .await
        .unwrap();
    assert!(body.is_null());
}

// ── failures ────────────────────────────────────────────────

#[tokio::test]
async fn error_body_becomes_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Index `ghost` not found.",
            "code": "index_not_found",
            "type": "invalid_request",
            "link": "https://docs.meilisearch.com/errors#index_not_found",
        })))
        .mount(&server)
        .await;

    let err = transport()
        .send(
            &Coordinates::new(server.uri(), None),
            ApiRequest::new(Method::GET, ["indexes", "ghost"]),
        )
        .await
        .unwrap_err();
    match &err {
        Error::Remote { status, code, message } => {
            assert_eq!(*status, 404);
            assert_eq!(code.as_deref(), Some("index_not_found"));
            assert_eq!(message, "Index `ghost` not found.");
        }
        other => panic!("expected a remote error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Index `ghost` not found. (code: index_not_found)");
}

#[tokio::test]
async fn non_json_error_keeps_status_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = transport()
        .send(
            &Coordinates::new(server.uri(), None),
            ApiRequest::new(Method::GET, ["stats"]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on port 1.
    let err = transport()
        .send(
            &Coordinates::new("http://127.0.0.1:1", None),
            ApiRequest::new(Method::GET, ["health"]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

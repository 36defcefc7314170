//! Tests for the Trello HTTP client against an in-process stub server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::{HttpTrelloClient, TrelloApi, TrelloCredentials, TrelloError, authenticated_url};

fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    query: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
}

async fn record(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    stub.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    (stub.status, stub.body)
}

/// Start a stub Trello API and return its base URL plus the request log.
async fn spawn_stub(
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        seen: Arc::clone(&seen),
        status,
        body,
        delay,
    };
    let app = Router::new().fallback(record).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/1"), seen)
}

fn credentials() -> TrelloCredentials {
    TrelloCredentials::new("KEY", "TOKEN")
}

fn client(base_url: &str, timeout: Option<Duration>) -> HttpTrelloClient {
    init_crypto();
    HttpTrelloClient::new(base_url, credentials(), timeout).unwrap()
}

#[test]
fn test_authenticated_url_starts_query_string() {
    let url = authenticated_url(
        "https://api.trello.com/1",
        "/boards/aaaaaaaaaaaaaaaaaaaaaaaa",
        &credentials(),
    )
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.trello.com/1/boards/aaaaaaaaaaaaaaaaaaaaaaaa?key=KEY&token=TOKEN"
    );
}

#[test]
fn test_authenticated_url_extends_existing_query() {
    let url = authenticated_url(
        "https://api.trello.com/1/",
        "/cards/abc/actions?filter=commentCard",
        &credentials(),
    )
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.trello.com/1/cards/abc/actions?filter=commentCard&key=KEY&token=TOKEN"
    );
}

#[test]
fn test_authenticated_url_rejects_bad_base() {
    let err = authenticated_url("not a url", "/boards", &credentials()).unwrap_err();
    assert!(matches!(err, TrelloError::InvalidUrl { .. }));
}

#[test]
fn test_debug_output_redacts_credentials() {
    let rendered = format!("{:?}", client("http://localhost/1", None));
    assert!(!rendered.contains("KEY"));
    assert!(!rendered.contains("TOKEN"));
    assert!(rendered.contains("<redacted>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_appends_credentials_and_returns_body() {
    let (base, seen) = spawn_stub(StatusCode::OK, r#"{"id":"b1","name":"Roadmap"}"#, None).await;
    let client = client(&base, None);

    let value = client
        .invoke(Method::GET, "/boards/aaaaaaaaaaaaaaaaaaaaaaaa", None)
        .await
        .unwrap();

    assert_eq!(value, json!({"id": "b1", "name": "Roadmap"}));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one remote call");
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/1/boards/aaaaaaaaaaaaaaaaaaaaaaaa");
    assert_eq!(seen[0].query.as_deref(), Some("key=KEY&token=TOKEN"));
    assert!(seen[0].body.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_response_keeps_remote_key_order() {
    let raw = r#"{"name":"Roadmap","id":"b1","desc":"","closed":false,"prefs":{"z":1,"a":2}}"#;
    let (base, _seen) = spawn_stub(StatusCode::OK, raw, None).await;
    let client = client(&base, None);

    let value = client.invoke(Method::GET, "/boards/b1", None).await.unwrap();

    assert_eq!(value.to_string(), raw);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_sends_json_body() {
    let (base, seen) = spawn_stub(StatusCode::OK, r#"{"id":"c1"}"#, None).await;
    let client = client(&base, None);

    client
        .invoke(
            Method::POST,
            "/cards",
            Some(json!({"idList": "l1", "name": "Write docs"})),
        )
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, json!({"idList": "l1", "name": "Write docs"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_hides_remote_body() {
    let (base, _seen) = spawn_stub(
        StatusCode::FORBIDDEN,
        "invalid token for member 5f2b internal shard 7",
        None,
    )
    .await;
    let client = client(&base, None);

    let err = client
        .invoke(Method::GET, "/members/me", None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    let message = err.to_string();
    assert_eq!(message, "Trello API request failed with status 403");
    assert!(!message.contains("invalid token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_json_success_is_decode_error() {
    let (base, _seen) = spawn_stub(StatusCode::OK, "<html>maintenance</html>", None).await;
    let client = client(&base, None);

    let err = client
        .invoke(Method::GET, "/members/me", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TrelloError::Decode));
    assert!(!err.to_string().contains("maintenance"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused_is_opaque_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client(&format!("http://{addr}/1"), None);

    let err = client
        .invoke(Method::GET, "/members/me", None)
        .await
        .unwrap_err();

    assert!(matches!(err, TrelloError::Transport { .. }));
    assert!(!err.to_string().contains("TOKEN"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_applies_per_request() {
    let (base, _seen) = spawn_stub(
        StatusCode::OK,
        "{}",
        Some(Duration::from_millis(1500)),
    )
    .await;
    let client = client(&base, Some(Duration::from_millis(100)));

    let err = client
        .invoke(Method::GET, "/members/me", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TrelloError::Transport {
            reason: "request timed out"
        }
    ));
}

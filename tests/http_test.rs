use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use throwback::http::{
    HttpClient, HttpError, HttpRequest, HttpResponse, Method, RetryPolicy, Transport,
};

// Replays a fixed list of outcomes and counts how often it was called
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    calls: Mutex<u32>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(ScriptedTransport {
            script: Mutex::new(script.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        *self.calls.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Transport("script exhausted".to_string())))
    }
}

fn status(code: u16, body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse {
        status: code,
        body: body.to_string(),
    })
}

fn client(transport: Arc<ScriptedTransport>) -> HttpClient {
    HttpClient::with_transport(
        transport,
        RetryPolicy {
            backoff_base: Duration::ZERO,
            ..RetryPolicy::default()
        },
    )
}

fn request() -> HttpRequest {
    HttpRequest::get("https://example.invalid/tmdb/movie/603").query("apikey", "key")
}

#[tokio::test]
async fn test_four_server_errors_then_success() {
    let transport = ScriptedTransport::new(vec![
        status(503, ""),
        status(503, ""),
        status(503, ""),
        status(503, ""),
        status(200, r#"{"title": "The Matrix"}"#),
    ]);
    let http = client(Arc::clone(&transport));

    let value = http.request_json(&request()).await.unwrap();

    assert_eq!(value.unwrap()["title"], "The Matrix");
    assert_eq!(transport.calls(), 5);
}

#[tokio::test]
async fn test_five_server_errors_exhaust_retries() {
    let transport = ScriptedTransport::new(vec![
        status(500, ""),
        status(502, ""),
        status(503, ""),
        status(504, ""),
        status(503, ""),
        status(200, "{}"),
    ]);
    let http = client(Arc::clone(&transport));

    let err = http.send(&request()).await.unwrap_err();

    assert!(matches!(
        err,
        HttpError::RetriesExhausted {
            status: Some(503),
            attempts: 5,
            ..
        }
    ));
    assert_eq!(transport.calls(), 5);
}

#[tokio::test]
async fn test_lenient_call_reports_exhaustion_as_no_data() {
    let transport = ScriptedTransport::new((0..5).map(|_| status(503, "")).collect());
    let http = client(Arc::clone(&transport));

    let value = http.request_json(&request()).await.unwrap();

    assert!(value.is_none());
}

#[tokio::test]
async fn test_not_found_short_circuits() {
    let transport = ScriptedTransport::new(vec![status(404, "not found"), status(200, "{}")]);
    let http = client(Arc::clone(&transport));

    let err = http.request_json(&request()).await.unwrap_err();

    assert!(matches!(err, HttpError::Client { status: 404, .. }));
    assert_eq!(err.status(), Some(404));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    let transport = ScriptedTransport::new(vec![
        Err(HttpError::Transport("connection reset".to_string())),
        status(200, "[1, 2, 3]"),
    ]);
    let http = client(Arc::clone(&transport));

    let value: Vec<u32> = http.fetch_json(&request()).await.unwrap();

    assert_eq!(value, vec![1, 2, 3]);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_undecodable_body_is_no_data_for_lenient_calls() {
    let transport = ScriptedTransport::new(vec![status(200, "<html>")]);
    let http = client(Arc::clone(&transport));

    assert!(http.request_json(&request()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_non_retryable_server_error_is_not_retried() {
    let transport = ScriptedTransport::new(vec![status(501, "")]);
    let http = client(Arc::clone(&transport));

    let err = http.send(&request()).await.unwrap_err();

    assert!(matches!(err, HttpError::Server { status: 501, .. }));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn test_only_get_and_post_are_accepted() {
    assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
    assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
    assert!(matches!(
        "DELETE".parse::<Method>(),
        Err(HttpError::InvalidMethod(_))
    ));
}

#[test]
fn test_backoff_doubles() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(4), Duration::from_millis(800));
    assert!(policy.is_retryable(502));
    assert!(!policy.is_retryable(404));
}

#[test]
fn test_request_builder() {
    let request = HttpRequest::post("https://example.invalid/4/list/1/items")
        .bearer("secret")
        .json(&serde_json::json!({"items": []}))
        .unwrap();

    assert_eq!(request.method, Method::Post);
    assert!(
        request
            .headers
            .contains(&("Authorization".to_string(), "Bearer secret".to_string()))
    );
}

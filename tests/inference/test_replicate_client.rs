// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ReplicateClient against an in-process stub of the prediction API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use photo_studio::inference::models::{REAL_ESRGAN, REMBG};
use photo_studio::inference::{InferenceError, PredictionBackend, ReplicateClient};
use serde_json::{json, Value};

const TOKEN: &str = "r8_stub_token";

#[derive(Clone, Default)]
struct Stub {
    /// Polls answered with `processing` before the final state
    pending_polls: usize,
    /// Final prediction body, merged over `{id, status}`
    terminal: Value,
    /// Hand out a `urls.get` link to `/v1/queue/:id` on create
    link_urls: bool,
    polls: Arc<AtomicUsize>,
    linked_polls: Arc<AtomicUsize>,
    base_url: Arc<Mutex<String>>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_prefer: Arc<Mutex<Option<String>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

async fn create(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthenticated"})));
    }
    *stub.last_prefer.lock().unwrap() = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *stub.last_body.lock().unwrap() = Some(body);

    if stub.pending_polls == 0 {
        (StatusCode::CREATED, Json(terminal_body(&stub)))
    } else {
        let mut body = json!({"id": "pred-1", "status": "starting", "output": null});
        if stub.link_urls {
            let base = stub.base_url.lock().unwrap().clone();
            body["urls"] = json!({"get": format!("{}/v1/queue/pred-1", base)});
        }
        (StatusCode::CREATED, Json(body))
    }
}

async fn poll_link(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    stub.linked_polls.fetch_add(1, Ordering::SeqCst);
    poll(State(stub), Path(id), headers).await
}

async fn poll(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthenticated"})));
    }
    assert_eq!(id, "pred-1");

    let n = stub.polls.fetch_add(1, Ordering::SeqCst) + 1;
    if n < stub.pending_polls {
        (
            StatusCode::OK,
            Json(json!({"id": "pred-1", "status": "processing", "output": null})),
        )
    } else {
        (StatusCode::OK, Json(terminal_body(&stub)))
    }
}

async fn account(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

fn terminal_body(stub: &Stub) -> Value {
    let mut body = json!({"id": "pred-1", "status": "succeeded", "output": null, "error": null});
    if let (Some(target), Some(extra)) = (body.as_object_mut(), stub.terminal.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    body
}

async fn spawn_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/v1/predictions", post(create))
        .route("/v1/predictions/:id", get(poll))
        .route("/v1/queue/:id", get(poll_link))
        .route("/v1/account", get(account))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    *stub.base_url.lock().unwrap() = format!("http://{}", addr);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str, token: &str) -> ReplicateClient {
    ReplicateClient::new(base_url, token, Duration::from_secs(5))
        .unwrap()
        .with_polling(Duration::from_millis(10), Duration::from_secs(5))
}

#[tokio::test]
async fn test_health_check_accepts_valid_token() {
    let base = spawn_stub(Stub::default()).await;
    assert!(client(&base, TOKEN).health_check().await);
    assert!(!client(&base, "wrong").health_check().await);
}

#[tokio::test]
async fn test_run_returns_output_from_create() {
    let stub = Stub {
        terminal: json!({"output": "https://replicate.delivery/out.png"}),
        ..Default::default()
    };
    let base = spawn_stub(stub.clone()).await;

    let output = client(&base, TOKEN)
        .run(REMBG, json!({"image": "data:image/png;base64,AAAA"}))
        .await
        .unwrap();

    assert_eq!(output, json!("https://replicate.delivery/out.png"));
    assert_eq!(stub.polls.load(Ordering::SeqCst), 0);

    let body = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["version"], REMBG.version);
    assert_eq!(body["input"]["image"], "data:image/png;base64,AAAA");
    assert_eq!(stub.last_prefer.lock().unwrap().as_deref(), Some("wait"));
}

#[tokio::test]
async fn test_run_polls_until_succeeded() {
    let stub = Stub {
        pending_polls: 3,
        terminal: json!({"output": ["https://replicate.delivery/a.png"]}),
        ..Default::default()
    };
    let base = spawn_stub(stub.clone()).await;

    let output = client(&base, TOKEN)
        .run(REAL_ESRGAN, json!({"image": "x", "face_enhance": true}))
        .await
        .unwrap();

    assert_eq!(output, json!(["https://replicate.delivery/a.png"]));
    assert_eq!(stub.polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_run_polls_returned_link() {
    let stub = Stub {
        pending_polls: 2,
        link_urls: true,
        terminal: json!({"output": "https://replicate.delivery/b.png"}),
        ..Default::default()
    };
    let base = spawn_stub(stub.clone()).await;

    let output = client(&base, TOKEN)
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap();

    assert_eq!(output, json!("https://replicate.delivery/b.png"));
    assert_eq!(stub.polls.load(Ordering::SeqCst), 2);
    assert_eq!(stub.linked_polls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_run_failed_prediction() {
    let stub = Stub {
        pending_polls: 1,
        terminal: json!({"status": "failed", "error": "NSFW content detected"}),
        ..Default::default()
    };
    let base = spawn_stub(stub).await;

    let err = client(&base, TOKEN)
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap_err();

    match err {
        InferenceError::PredictionFailed { id, status, reason } => {
            assert_eq!(id, "pred-1");
            assert_eq!(status, "failed");
            assert_eq!(reason, "NSFW content detected");
        }
        other => panic!("expected PredictionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_canceled_prediction() {
    let stub = Stub {
        terminal: json!({"status": "canceled"}),
        ..Default::default()
    };
    let base = spawn_stub(stub).await;

    let err = client(&base, TOKEN)
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InferenceError::PredictionFailed { ref status, .. } if status == "canceled"
    ));
}

#[tokio::test]
async fn test_run_times_out() {
    let stub = Stub {
        pending_polls: usize::MAX,
        ..Default::default()
    };
    let base = spawn_stub(stub).await;

    let client = ReplicateClient::new(&base, TOKEN, Duration::from_secs(5))
        .unwrap()
        .with_polling(Duration::from_millis(10), Duration::from_millis(60));

    let err = client.run(REMBG, json!({"image": "x"})).await.unwrap_err();
    assert!(matches!(err, InferenceError::Timeout { .. }));
}

#[tokio::test]
async fn test_run_succeeded_without_output() {
    let base = spawn_stub(Stub::default()).await;

    let err = client(&base, TOKEN)
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::MissingOutput(ref id) if id == "pred-1"));
}

#[tokio::test]
async fn test_run_upstream_rejects_token() {
    let base = spawn_stub(Stub::default()).await;

    let err = client(&base, "wrong")
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap_err();

    match err {
        InferenceError::Upstream { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthenticated"));
        }
        other => panic!("expected Upstream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_unreachable() {
    let err = client("http://127.0.0.1:59998", TOKEN)
        .run(REMBG, json!({"image": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::Http(_)));
}

#[tokio::test]
async fn test_ai_endpoint_through_stub() {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use photo_studio::api::{create_app, AppState};
    use photo_studio::config::ServerConfig;
    use tower::util::ServiceExt;

    let stub = Stub {
        pending_polls: 2,
        terminal: json!({"output": "https://replicate.delivery/nobg.png"}),
        ..Default::default()
    };
    let base = spawn_stub(stub.clone()).await;

    let config = ServerConfig {
        replicate_api_token: Some(TOKEN.to_string()),
        replicate_base_url: base,
        poll_interval_ms: 10,
        ..Default::default()
    };
    let app = create_app(Arc::new(AppState::new(config).unwrap()));

    let boundary = "stub-boundary";
    let png = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(
        format!(
            "\r\n--{b}\r\nContent-Disposition: form-data; name=\"options\"\r\n\r\n{{\"mode\":\"background\"}}\r\n--{b}--\r\n",
            b = boundary
        )
        .as_bytes(),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["enhancedImage"], "https://replicate.delivery/nobg.png");

    let sent = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["version"], REMBG.version);
    assert!(sent["input"]["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

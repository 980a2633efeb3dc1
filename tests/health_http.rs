mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::http::{assert_json_error, request, response_json};

#[tokio::test]
async fn it_health_live_and_ready() {
    let app = spawn_test_app().await;

    let live = request(&app.app, Method::GET, "/health/live", None, &[]).await;
    let (live_status, _, _) = response_json(live).await;
    assert_eq!(live_status, StatusCode::OK);

    let ready = request(&app.app, Method::GET, "/health/ready", None, &[]).await;
    let (ready_status, _, body) = response_json(ready).await;
    assert_eq!(ready_status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["store"]["healthy"], true);
}

#[tokio::test]
async fn it_health_reports_corpus_size() {
    let app = spawn_test_app().await;

    let resp = request(&app.app, Method::GET, "/health", None, &[]).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["corpus"]["items"], 4);
}

#[tokio::test]
async fn it_unknown_route_is_json_404_with_trace_id() {
    let app = spawn_test_app().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/nope",
        None,
        &[("x-request-id", "req-abc_123".to_string())],
    )
    .await;
    let (status, headers, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
    assert_eq!(body["traceId"], "req-abc_123");
    assert_eq!(headers["x-request-id"], "req-abc_123");
}

#[tokio::test]
async fn it_invalid_request_id_is_replaced() {
    let app = spawn_test_app().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/health/live",
        None,
        &[("x-request-id", "not valid!".to_string())],
    )
    .await;
    let (_, headers, _) = response_json(resp).await;
    let echoed = headers["x-request-id"].to_str().unwrap();
    assert_ne!(echoed, "not valid!");
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}

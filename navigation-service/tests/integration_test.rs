use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use navgraph::{split_into_chunks, Edge, EngineConfig, PathRequest};
use navigation_service::{build_router, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

const MAX_BODY: usize = 16 * 1024 * 1024;

fn app() -> Router {
    build_router(AppState::new(EngineConfig::default()), MAX_BODY)
}

fn city_edges() -> Vec<Edge> {
    vec![
        Edge::new("City_0", "City_1", 1.0),
        Edge::new("City_1", "City_2", 1.0),
        Edge::new("City_1", "City_4", 5.0),
        Edge::new("City_2", "City_3", 1.0),
        Edge::new("City_3", "City_4", 1.0),
        Edge::new("City_0", "City_3", 1.0),
        Edge::new("City_4", "City_4", 0.0),
    ]
}

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ndjson_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/paths/stream")
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from(body))
        .unwrap()
}

fn ndjson(edges: &[Edge], start: &str, end: &str, chunk_size: usize) -> String {
    split_into_chunks("map_5", start, end, edges, chunk_size)
        .iter()
        .map(|chunk| serde_json::to_string(chunk).unwrap() + "\n")
        .collect()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
    assert_eq!(body["engine"]["phase_timeout_ms"], 5000);
    assert_eq!(body["engine"]["unary_deadline"], false);
}

#[tokio::test]
async fn test_health_reports_bounded_unary() {
    let app = build_router(
        AppState::new(EngineConfig::new(Duration::from_millis(250), true)),
        MAX_BODY,
    );
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["engine"]["phase_timeout_ms"], 250);
    assert_eq!(body["engine"]["unary_deadline"], true);
}

#[tokio::test]
async fn test_unary_path() {
    let payload = serde_json::to_value(PathRequest::new("City_0", "City_4", city_edges())).unwrap();
    let (status, body) = send(app(), json_request("/api/v1/paths", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path_opt"], json!(["City_0", "City_3", "City_4"]));
    assert_eq!(body["path_alt"], json!(["City_0", "City_1", "City_4"]));
}

#[tokio::test]
async fn test_unary_wire_format() {
    // `dist` omitted on the wire decodes as 0
    let payload = json!({
        "start_endpoint": "A",
        "end_endpoint": "C",
        "connections": {
            "connections": [
                {"from": "A", "to": "B", "dist": 2},
                {"from": "B", "to": "C"},
                {"from": "A", "to": "C", "dist": 5}
            ]
        }
    });
    let (status, body) = send(app(), json_request("/api/v1/paths", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path_opt"], json!(["A", "B", "C"]));
    assert_eq!(body["path_alt"], json!(["A", "C"]));
}

#[tokio::test]
async fn test_unary_errors() {
    let missing = json!({"start_endpoint": "Riften", "end_endpoint": "Whiterun"});
    let (status, body) = send(app(), json_request("/api/v1/paths", &missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["error"],
        "Missing required fields: start_endpoint, end_endpoint, or connections"
    );

    let no_path =
        serde_json::to_value(PathRequest::new("City_0", "City_X", city_edges())).unwrap();
    let (status, body) = send(app(), json_request("/api/v1/paths", &no_path)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "No path found between City_0 and City_X");
}

#[tokio::test]
async fn test_unary_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/paths")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"start_endpoint\": \"A\","))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().len() > 0);

    // Wrong field types are rejected the same way
    let wrong_type = json!({"start_endpoint": 7, "end_endpoint": "B"});
    let (status, body) = send(app(), json_request("/api/v1/paths", &wrong_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_stream_path() {
    let body = ndjson(&city_edges(), "City_0", "City_4", 4);
    let (status, body) = send(app(), ndjson_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path_opt"], json!(["City_0", "City_3", "City_4"]));
    assert_eq!(body["path_alt"], json!(["City_0", "City_1", "City_4"]));
}

#[tokio::test]
async fn test_stream_no_alt_path() {
    let edges: Vec<Edge> = city_edges()
        .into_iter()
        .filter(|e| !(e.from == "City_1" && e.to == "City_4"))
        .collect();
    let (status, body) = send(app(), ndjson_request(ndjson(&edges, "City_0", "City_4", 3))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No alt path found between City_0 and City_4");
}

#[tokio::test]
async fn test_stream_missing_fields() {
    let line = json!({
        "chunk": {
            "mapname": "map_5",
            "chunkid": 1,
            "connections": [{"from": "City_0", "to": "City_1", "dist": 1}]
        }
    });
    let (status, body) = send(app(), ndjson_request(format!("{}\n", line))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, _) = send(app(), ndjson_request(String::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stream_malformed_line() {
    let mut body = ndjson(&city_edges(), "City_0", "City_4", 4);
    body.push_str("{this is not json}\n");
    let (status, body) = send(app(), ndjson_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL");
    assert_eq!(body["error"], "Internal error while streaming connection chunks");
}

#[tokio::test]
async fn test_stream_deadline() {
    // A long chain with a zero deadline cannot finish in time
    let edges: Vec<Edge> = (0..20_000)
        .map(|i| Edge::new(format!("City_{}", i), format!("City_{}", i + 1), 1.0))
        .collect();
    let app = build_router(
        AppState::new(EngineConfig::new(Duration::ZERO, false)),
        MAX_BODY,
    );

    let (status, body) = send(app, ndjson_request(ndjson(&edges, "City_0", "City_20000", 5000))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "DEADLINE_EXCEEDED");
    assert_eq!(body["error"], "Dijkstra computation took too long and was aborted");
}

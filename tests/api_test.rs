use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use kbtui::{
    ApiError, ClusterContext, KbApi, KbClient, SearchParameters, SearchStatus, TopicConfigEdit,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Requests seen by the test server: method, path, kafka_id header, query, body
type Recorded = Arc<Mutex<Vec<(Method, String, Option<String>, HashMap<String, String>, Option<Value>)>>>;

fn kafka_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("kafka_id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn topic_info(
    State(seen): State<Recorded>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let topic = query.get("topic").cloned().unwrap_or_default();
    seen.lock().unwrap().push((
        Method::GET,
        "/get-topic-info".into(),
        kafka_id(&headers),
        query,
        None,
    ));
    Json(json!({ "name": topic, "configs": { "retention.ms": "1000" } }))
}

async fn search(
    State(seen): State<Recorded>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    seen.lock()
        .unwrap()
        .push((method.clone(), "/search".into(), kafka_id(&headers), query, None));
    if method == Method::DELETE {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({
        "status": "Finished",
        "createdDate": "2024-01-02T03:04:05Z",
        "completedTime": 842,
        "data": [{ "partition": 0, "offset": 17, "key": "k", "value": { "id": 17 } }]
    }))
    .into_response()
}

async fn update_config(
    State(seen): State<Recorded>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    seen.lock().unwrap().push((
        Method::POST,
        "/update-topic-config".into(),
        kafka_id(&headers),
        query,
        Some(body),
    ));
    StatusCode::OK
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn kb_server() -> (KbClient, Recorded) {
    let seen = Recorded::default();
    let router = Router::new()
        .route("/api/get-topic-info", get(topic_info))
        .route("/api/search", get(search).delete(search))
        .route("/api/update-topic-config", post(update_config))
        .with_state(seen.clone());
    let base = spawn_server(router).await;
    let client = KbClient::new(&format!("{}/api/", base), Duration::from_secs(5)).unwrap();
    (client, seen)
}

#[tokio::test]
async fn test_search_sends_parameters_and_cluster() {
    let (client, seen) = kb_server().await;
    let cluster = ClusterContext::new("7");

    let response = client
        .search(&cluster, &SearchParameters::new("orders", "abc"))
        .await
        .unwrap();

    assert_eq!(response.status, SearchStatus::Finished);
    assert_eq!(response.completed_time, Some(842));
    assert_eq!(response.created_date, 1_704_164_645_000);
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].offset, Some(17));

    let seen = seen.lock().unwrap();
    let (method, path, id, query, _) = &seen[0];
    assert_eq!(method, Method::GET);
    assert_eq!(path, "/search");
    assert_eq!(id.as_deref(), Some("7"));
    assert_eq!(query.get("topicName").map(String::as_str), Some("orders"));
    assert_eq!(query.get("value").map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn test_delete_uses_same_parameters() {
    let (client, seen) = kb_server().await;
    client
        .delete_search(&ClusterContext::new("7"), &SearchParameters::new("orders", ""))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let (method, _, id, query, _) = &seen[0];
    assert_eq!(method, Method::DELETE);
    assert_eq!(id.as_deref(), Some("7"));
    assert_eq!(query.get("topicName").map(String::as_str), Some("orders"));
    assert_eq!(query.get("value").map(String::as_str), Some(""));
}

#[tokio::test]
async fn test_topic_info_and_config_update() {
    let (client, seen) = kb_server().await;
    let cluster = ClusterContext::new("3");

    let info = client.topic_info(&cluster, "orders").await.unwrap();
    assert_eq!(info.config_value("retention.ms").as_deref(), Some("1000"));

    let edit = TopicConfigEdit {
        key: "retention.ms".to_string(),
        value: "86400000".to_string(),
    };
    client.update_topic_config(&cluster, "orders", &edit).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].3.get("topic").map(String::as_str), Some("orders"));
    let (method, path, id, query, body) = &seen[1];
    assert_eq!(method, Method::POST);
    assert_eq!(path, "/update-topic-config");
    assert_eq!(id.as_deref(), Some("3"));
    assert_eq!(query.get("topic").map(String::as_str), Some("orders"));
    assert_eq!(
        body.as_ref(),
        Some(&json!({ "key": "retention.ms", "value": "86400000" }))
    );
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let router = Router::new().route(
        "/update-topic-config",
        post(|| async { (StatusCode::BAD_REQUEST, "Invalid value for retention.ms") }),
    );
    let client = KbClient::new(&spawn_server(router).await, Duration::from_secs(5)).unwrap();

    let edit = TopicConfigEdit {
        key: "retention.ms".to_string(),
        value: "-5".to_string(),
    };
    let err = client
        .update_topic_config(&ClusterContext::new("1"), "orders", &edit)
        .await
        .unwrap_err();

    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body, "Invalid value for retention.ms");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.message(), "Invalid value for retention.ms (400)");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let router = Router::new().route("/search", get(|| async { "not json" }));
    let client = KbClient::new(&spawn_server(router).await, Duration::from_secs(5)).unwrap();

    let err = client
        .search(&ClusterContext::new("1"), &SearchParameters::new("orders", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = KbClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = client
        .topic_info(&ClusterContext::new("1"), "orders")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

//! Local stand-in for the evaluation service
//!
//! The reply depends on the submitted title, so each test picks its
//! scenario by choosing a title.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as the mock service saw it
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub body: Value,
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockService {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockService {
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

pub fn categorized_evaluation() -> Value {
    json!({
        "ratings": {
            "impact": { "score": 8, "comment": "強い" },
            "imagination": { "score": 7, "comment": "良い" },
            "eroticism": { "score": 9, "comment": "高い" },
            "originality": { "score": 6, "comment": "普通" }
        },
        "overall_comment": "総じて良好"
    })
}

pub fn flat_evaluation() -> Value {
    json!({
        "genre": "ドラマ",
        "target_audience": "20代",
        "appeal_points": ["設定が良い", "演技が自然"],
        "rating": 7
    })
}

/// Start the mock service on an ephemeral port; returns its base URL
pub async fn spawn_mock_service() -> (String, MockService) {
    let service = MockService::default();
    let app = Router::new()
        .route("/api/evaluate", post(evaluate))
        .with_state(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock service");
    let addr = listener.local_addr().expect("mock service address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock service runs");
    });

    (format!("http://{}", addr), service)
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn evaluate(
    State(service): State<MockService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    service.received.lock().unwrap().push(ReceivedRequest {
        body: body.clone(),
        accept: header(&headers, "accept"),
        content_type: header(&headers, "content-type"),
    });

    let title = body["title"].as_str().unwrap_or_default().trim().to_string();
    match title.as_str() {
        "reject" => Json(json!({ "success": false, "message": "不適切な内容です" })).into_response(),
        "reject-silently" => Json(json!({ "success": false })).into_response(),
        "flat" => Json(json!({
            "success": true,
            "data": { "evaluation": flat_evaluation() }
        }))
        .into_response(),
        "garbage" => Json(json!({
            "success": true,
            "data": { "evaluation": "great title" }
        }))
        .into_response(),
        "not-json" => (StatusCode::OK, "definitely not json").into_response(),
        "server-error" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "サーバーが混雑しています" })),
        )
            .into_response(),
        "bad-gateway" => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({
                "success": true,
                "data": { "evaluation": categorized_evaluation() }
            }))
            .into_response()
        }
        _ => Json(json!({
            "success": true,
            "data": { "evaluation": categorized_evaluation() }
        }))
        .into_response(),
    }
}

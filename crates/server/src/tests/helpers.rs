// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use relief::ApplyPolicy;
use relief_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

/// Creates a router over a fresh in-memory database.
pub fn create_test_app() -> Router {
    create_test_app_with_policy(ApplyPolicy::Dispatched)
}

/// Creates a router over a fresh in-memory database with the given policy.
pub fn create_test_app_with_policy(policy: ApplyPolicy) -> Router {
    let persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_apply_policy(policy);
    build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    })
}

/// The attribution fields every mutating call carries.
pub fn attribution() -> Value {
    json!({
        "actor_id": "dispatch-1",
        "actor_type": "dispatcher",
        "cause_id": "test-cause",
        "cause_description": "Test request",
    })
}

/// Merges attribution into a payload object.
pub fn attributed(payload: Value) -> Value {
    let mut body: Value = attribution();
    if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), payload) {
        target.extend(fields);
    }
    body
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request: Request<Body> = match body {
        Some(value) => builder
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers a volunteer and returns its id.
pub async fn register(app: &Router, n: u32, member_count: Option<u32>) -> i64 {
    let (status, body): (StatusCode, Value) = send(
        app,
        "POST",
        "/volunteers",
        Some(json!({
            "name": format!("Volunteer {n}"),
            "phone": format!("555-040-{n:04}"),
            "member_count": member_count,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["volunteer_id"].as_i64().unwrap()
}

/// Creates a request and returns its id.
pub async fn create_request(app: &Router, required_volunteers: u32) -> i64 {
    let (status, body): (StatusCode, Value) = send(
        app,
        "POST",
        "/requests",
        Some(json!({
            "location": "Shelter 4",
            "contact_name": "Sam Ortiz",
            "contact_phone": "555-050-0001",
            "required_volunteers": required_volunteers,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create request failed: {body}");
    body["request_id"].as_i64().unwrap()
}

/// Applies a volunteer to a request and returns the assignment id.
pub async fn apply(app: &Router, volunteer_id: i64, request_id: i64) -> i64 {
    let (status, body): (StatusCode, Value) = send(
        app,
        "POST",
        "/assignments",
        Some(attributed(json!({
            "volunteer_id": volunteer_id,
            "request_id": request_id,
        }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "apply failed: {body}");
    body["assignment"]["assignment_id"].as_i64().unwrap()
}

/// Posts an attributed lifecycle action against an assignment.
pub async fn act(app: &Router, assignment_id: i64, action: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/assignments/{assignment_id}/{action}"),
        Some(attribution()),
    )
    .await
}

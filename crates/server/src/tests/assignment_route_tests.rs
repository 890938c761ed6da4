// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use relief::ApplyPolicy;
use serde_json::{Value, json};

use crate::tests::helpers::{
    act, apply, attributed, create_request, create_test_app, create_test_app_with_policy,
    register, send,
};

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    let volunteer_id: i64 = register(&app, 1, None).await;

    let assignment_id: i64 = apply(&app, volunteer_id, request_id).await;
    let (status, confirmed): (StatusCode, Value) = act(&app, assignment_id, "confirm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["request_status"], "in_progress");
    assert_eq!(confirmed["volunteer_status"], "assigned");

    let (status, completed): (StatusCode, Value) = act(&app, assignment_id, "complete").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["assignment"]["status"], "completed");
    assert_eq!(completed["request_status"], "completed");
    assert_eq!(completed["request_completed"], true);
    assert_eq!(completed["volunteer_status"], "available");

    let (_, timeline): (StatusCode, Value) = send(
        &app,
        "GET",
        &format!("/audit/timeline?request_id={request_id}"),
        None,
    )
    .await;
    let events: &Vec<Value> = timeline["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[2]["action"], "CompleteAssignment");

    let event_id: i64 = completed["event_id"].as_i64().unwrap();
    let (status, event): (StatusCode, Value) =
        send(&app, "GET", &format!("/audit/event/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["assignment_id"], assignment_id);
}

#[tokio::test]
async fn test_complete_twice_is_conflict_with_invalid_state() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    let volunteer_id: i64 = register(&app, 1, None).await;
    let assignment_id: i64 = apply(&app, volunteer_id, request_id).await;
    act(&app, assignment_id, "confirm").await;
    act(&app, assignment_id, "complete").await;

    let (status, body): (StatusCode, Value) = act(&app, assignment_id, "complete").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn test_apply_to_full_request_is_conflict() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 3).await;
    let group: i64 = register(&app, 1, Some(4)).await;
    let single: i64 = register(&app, 2, None).await;
    let group_assignment: i64 = apply(&app, group, request_id).await;
    act(&app, group_assignment, "confirm").await;

    let (status, body): (StatusCode, Value) = send(
        &app,
        "POST",
        "/assignments",
        Some(attributed(json!({
            "volunteer_id": single,
            "request_id": request_id,
        }))),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (_, detail): (StatusCode, Value) =
        send(&app, "GET", &format!("/requests/{request_id}"), None).await;
    assert_eq!(detail["capacity"]["committed"], 4);
    assert_eq!(detail["capacity"]["is_full"], true);
}

#[tokio::test]
async fn test_reject_records_reason() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    let volunteer_id: i64 = register(&app, 1, None).await;
    let assignment_id: i64 = apply(&app, volunteer_id, request_id).await;

    let (status, body): (StatusCode, Value) = send(
        &app,
        "POST",
        &format!("/assignments/{assignment_id}/reject"),
        Some(attributed(json!({ "reason": "Road closed" }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment"]["status"], "rejected");
    assert_eq!(body["assignment"]["rejection_reason"], "Road closed");
    assert_eq!(body["request_status"], "pending");
}

#[tokio::test]
async fn test_cancel_reopens_request() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    let volunteer_id: i64 = register(&app, 1, None).await;
    let assignment_id: i64 = apply(&app, volunteer_id, request_id).await;
    act(&app, assignment_id, "confirm").await;

    let (status, body): (StatusCode, Value) = act(&app, assignment_id, "cancel").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_status"], "pending");

    let (_, open): (StatusCode, Value) = send(&app, "GET", "/requests/open", None).await;
    assert_eq!(open["requests"].as_array().unwrap().len(), 1);

    let (_, history): (StatusCode, Value) = send(
        &app,
        "GET",
        &format!("/volunteers/{volunteer_id}/assignments"),
        None,
    )
    .await;
    assert_eq!(history["assignments"][0]["status"], "cancelled");
}

#[tokio::test]
async fn test_missing_assignment_is_not_found() {
    let app: Router = create_test_app();

    let (status, body): (StatusCode, Value) = act(&app, 404, "confirm").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, _): (StatusCode, Value) = send(&app, "GET", "/assignments/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_self_service_apply_confirms_immediately() {
    let app: Router = create_test_app_with_policy(ApplyPolicy::SelfService);
    let request_id: i64 = create_request(&app, 2).await;
    let volunteer_id: i64 = register(&app, 1, None).await;

    let assignment_id: i64 = apply(&app, volunteer_id, request_id).await;
    let (_, assignment): (StatusCode, Value) =
        send(&app, "GET", &format!("/assignments/{assignment_id}"), None).await;

    assert_eq!(assignment["status"], "confirmed");

    let (_, timeline): (StatusCode, Value) = send(
        &app,
        "GET",
        &format!("/volunteers/{volunteer_id}/timeline"),
        None,
    )
    .await;
    assert_eq!(timeline["events"].as_array().unwrap().len(), 1);
}

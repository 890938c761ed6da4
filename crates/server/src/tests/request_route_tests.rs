// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

use crate::tests::helpers::{
    act, apply, attribution, create_request, create_test_app, register, send,
};

#[tokio::test]
async fn test_create_request_starts_pending() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 3).await;

    let (status, body): (StatusCode, Value) =
        send(&app, "GET", &format!("/requests/{request_id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["capacity"]["required"], 3);
    assert_eq!(body["capacity"]["remaining"], 3);
    assert_eq!(body["assignments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_request_with_zero_required_is_bad_request() {
    let app: Router = create_test_app();

    let (status, body): (StatusCode, Value) = send(
        &app,
        "POST",
        "/requests",
        Some(json!({
            "location": "Shelter 4",
            "contact_name": "Sam Ortiz",
            "contact_phone": "555-050-0001",
            "required_volunteers": 0,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_open_requests_excludes_full() {
    let app: Router = create_test_app();
    let full: i64 = create_request(&app, 1).await;
    let open: i64 = create_request(&app, 2).await;
    let volunteer_id: i64 = register(&app, 1, None).await;
    let assignment_id: i64 = apply(&app, volunteer_id, full).await;
    act(&app, assignment_id, "confirm").await;

    let (status, body): (StatusCode, Value) = send(&app, "GET", "/requests/open", None).await;

    assert_eq!(status, StatusCode::OK);
    let requests: &Vec<Value> = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["request"]["request_id"], open);
}

#[tokio::test]
async fn test_withdraw_with_active_assignment_is_conflict() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    let volunteer_id: i64 = register(&app, 1, None).await;
    apply(&app, volunteer_id, request_id).await;

    let (status, body): (StatusCode, Value) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/withdraw"),
        Some(attribution()),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn test_withdraw_then_list_by_status() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;
    create_request(&app, 1).await;

    let (status, body): (StatusCode, Value) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/withdraw"),
        Some(attribution()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "cancelled");

    let (_, cancelled): (StatusCode, Value) =
        send(&app, "GET", "/requests?status=cancelled", None).await;
    let list: &Vec<Value> = cancelled["requests"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["request_id"], request_id);
}

#[tokio::test]
async fn test_reevaluate_missing_request_is_not_found() {
    let app: Router = create_test_app();

    let (status, _): (StatusCode, Value) = send(
        &app,
        "POST",
        "/requests/12/reevaluate",
        Some(attribution()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reevaluate_records_event_each_call() {
    let app: Router = create_test_app();
    let request_id: i64 = create_request(&app, 1).await;

    let (_, first): (StatusCode, Value) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/reevaluate"),
        Some(attribution()),
    )
    .await;
    let (_, second): (StatusCode, Value) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/reevaluate"),
        Some(attribution()),
    )
    .await;

    assert_eq!(first["status_changed"], false);
    assert_eq!(second["request"], first["request"]);
    assert_ne!(second["event_id"], first["event_id"]);

    let (_, timeline): (StatusCode, Value) = send(
        &app,
        "GET",
        &format!("/audit/timeline?request_id={request_id}"),
        None,
    )
    .await;
    assert_eq!(timeline["events"].as_array().unwrap().len(), 2);
}

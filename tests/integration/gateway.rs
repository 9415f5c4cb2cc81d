//! Gateway integration tests.
//!
//! These tests drive the API client against a local mockito server and
//! verify request shapes, wire-format decoding, and error normalization.

use mockito::Matcher;
use serde_json::json;

use taskdeck::api::{ApiClient, ApiErrorKind};

use crate::fixtures::{client_for, sub_task_json, task_json, task_with_subs_json, tasks_json};

/// Test: fetch decodes the wire format
/// Given GET /tasks answering with nested camelCase JSON
/// When fetch_tasks runs
/// Then tasks and subtasks come back fully typed
#[tokio::test]
async fn test_fetch_tasks_decodes_wire_format() {
    let mut server = mockito::Server::new_async().await;
    let body = tasks_json(&[task_with_subs_json(
        1,
        "Prepare lunch",
        false,
        &[sub_task_json(10, 1, "Buy bread", true)],
    )]);
    let mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let tasks = client.fetch_tasks().await.expect("fetch should succeed");

    mock.assert_async().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Prepare lunch");
    assert_eq!(tasks[0].sub_tasks.len(), 1);
    assert_eq!(tasks[0].sub_tasks[0].parent_id, 1);
    assert!(tasks[0].sub_tasks[0].done);
}

/// Test: create sends the title and nothing else
/// Given POST /tasks expecting exactly {"title": ...}
/// When create_task runs
/// Then the request body matches and the created task is returned
#[tokio::test]
async fn test_create_task_sends_title_only() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks")
        .match_body(Matcher::Json(json!({"title": "Buy milk"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(task_json(2, "Buy milk", false))
        .create_async()
        .await;

    let client = client_for(&server);
    let task = client
        .create_task("Buy milk")
        .await
        .expect("create should succeed");

    mock.assert_async().await;
    assert_eq!(task.id, 2);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.done);
}

/// Test: task updates are PATCHes on the task path
/// Given PATCH /tasks/7 expecting exactly {"done": true}
/// When update_task runs
/// Then the request body matches and the updated task is returned
#[tokio::test]
async fn test_update_task_patches_done_flag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/tasks/7")
        .match_body(Matcher::Json(json!({"done": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(7, "Water plants", true))
        .create_async()
        .await;

    let client = client_for(&server);
    let task = client
        .update_task(7, true)
        .await
        .expect("update should succeed");

    mock.assert_async().await;
    assert_eq!(task.id, 7);
    assert!(task.done);
}

/// Test: subtask creation targets the parent's subtask collection
/// Given POST /tasks/3/subTasks expecting {"title": ...}
/// When create_sub_task runs
/// Then the new subtask comes back with its parent id
#[tokio::test]
async fn test_create_sub_task_targets_parent_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks/3/subTasks")
        .match_body(Matcher::Json(json!({"title": "Slice cheese"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(sub_task_json(31, 3, "Slice cheese", false))
        .create_async()
        .await;

    let client = client_for(&server);
    let sub = client
        .create_sub_task(3, "Slice cheese")
        .await
        .expect("create should succeed");

    mock.assert_async().await;
    assert_eq!(sub.id, 31);
    assert_eq!(sub.parent_id, 3);
}

/// Test: subtask updates address both ids in the path
/// Given PATCH /tasks/3/subTasks/31 expecting {"done": true}
/// When update_sub_task runs
/// Then the updated subtask is returned
#[tokio::test]
async fn test_update_sub_task_targets_nested_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/tasks/3/subTasks/31")
        .match_body(Matcher::Json(json!({"done": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sub_task_json(31, 3, "Slice cheese", true))
        .create_async()
        .await;

    let client = client_for(&server);
    let sub = client
        .update_sub_task(3, 31, true)
        .await
        .expect("update should succeed");

    mock.assert_async().await;
    assert!(sub.done);
}

/// Test: 400 validation bodies collapse to their field messages
/// Given POST /tasks answering 400 with a field-keyed object
/// When create_task runs
/// Then the error joins the field messages in key order
#[tokio::test]
async fn test_validation_error_collapses_to_field_messages() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title": "Title is required", "done": "Done must be a boolean"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .create_task("")
        .await
        .expect_err("400 must surface as an error");

    assert_eq!(err.kind, ApiErrorKind::ClientError);
    assert_eq!(err.status, Some(400));
    assert_eq!(
        err.user_message(),
        "Done must be a boolean, Title is required"
    );
}

/// Test: message envelopes pass through untouched
/// Given PATCH /tasks/99 answering 404 with {"message": ...}
/// When update_task runs
/// Then the message is used verbatim
#[tokio::test]
async fn test_message_error_passes_through() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PATCH", "/tasks/99")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Task not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .update_task(99, true)
        .await
        .expect_err("404 must surface as an error");

    assert_eq!(err.kind, ApiErrorKind::ClientError);
    assert_eq!(err.message, "Task not found");
    assert_eq!(err.user_message(), "Task not found");
}

/// Test: non-JSON failure bodies fall back to the status line
/// Given GET /tasks answering 500 with a plain-text body
/// When fetch_tasks runs
/// Then the error carries the synthesized status message
#[tokio::test]
async fn test_server_error_without_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/tasks")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .fetch_tasks()
        .await
        .expect_err("500 must surface as an error");

    assert_eq!(err.kind, ApiErrorKind::ServerError);
    assert_eq!(err.status, Some(500));
    assert_eq!(err.message, "Request failed with status code 500");
}

/// Test: transport failures have no HTTP status
/// Given a base URL nothing listens on
/// When fetch_tasks runs
/// Then the error is a network error without a status
#[tokio::test]
async fn test_network_failure_has_no_status() {
    let client = ApiClient::new("http://127.0.0.1:9");

    let err = client
        .fetch_tasks()
        .await
        .expect_err("unreachable host must surface as an error");

    assert_eq!(err.kind, ApiErrorKind::NetworkError);
    assert_eq!(err.status, None);
}

/// Test: malformed success bodies are decode errors
/// Given GET /tasks answering 200 with a body that is not JSON
/// When fetch_tasks runs
/// Then the error is a decode error
#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .fetch_tasks()
        .await
        .expect_err("garbage body must surface as an error");

    assert_eq!(err.kind, ApiErrorKind::DecodeError);
    assert_eq!(err.status, None);
}

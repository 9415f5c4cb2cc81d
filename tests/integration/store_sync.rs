//! Store synchronization integration tests.
//!
//! Full round trips: a store operation hits the mock server, the
//! response merges into the local task list, and the watch channel
//! publishes the settled state.

use crate::fixtures::{store_for, sub_task_json, task_json, task_with_subs_json, tasks_json};

/// Test: fetch replaces the whole list
/// Given a store holding a locally created task
/// When fetch_tasks answers with a different list
/// Then the local list is replaced wholesale
#[tokio::test]
async fn test_fetch_replaces_the_whole_list() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/tasks")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(task_json(99, "local leftover", false))
        .create_async()
        .await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_json(1, "Water plants", false)]))
        .create_async()
        .await;

    let store = store_for(&server);
    store.create_task("local leftover").await;
    assert_eq!(store.snapshot().tasks.len(), 1);

    store.fetch_tasks().await;

    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, 1, "fetch must not keep local extras");
    assert!(!state.loading);
    assert!(state.error.is_empty());
}

/// Test: created tasks append at the end
/// Given a fetched list with one task
/// When create_task settles
/// Then the new task sits after the existing ones
#[tokio::test]
async fn test_create_task_appends_at_the_end() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_json(1, "Water plants", false)]))
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/tasks")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(task_json(2, "Buy milk", false))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.create_task("Buy milk").await;

    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 2);
    assert_eq!(state.tasks[0].id, 1);
    assert_eq!(state.tasks[1].id, 2);
    assert_eq!(state.tasks[1].title, "Buy milk");
}

/// Test: task updates merge in place
/// Given a fetched list with two tasks
/// When update_task settles for the first one
/// Then it is replaced in place and order is preserved
#[tokio::test]
async fn test_update_task_merges_in_place() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[
            task_json(1, "Water plants", false),
            task_json(2, "Buy milk", false),
        ]))
        .create_async()
        .await;
    let _update = server
        .mock("PATCH", "/tasks/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(1, "Water plants", true))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.update_task(1, true).await;

    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 2);
    assert!(state.tasks[0].done);
    assert_eq!(state.tasks[1].id, 2, "order must be preserved");
    assert!(!state.tasks[1].done);
}

/// Test: new subtasks attach to their parent
/// Given a fetched task without subtasks
/// When create_sub_task settles
/// Then the subtask appears under that task
#[tokio::test]
async fn test_create_sub_task_attaches_to_parent() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_json(1, "Prepare lunch", false)]))
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/tasks/1/subTasks")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(sub_task_json(10, 1, "Buy bread", false))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.create_sub_task(1, "Buy bread").await;

    let state = store.snapshot();
    assert_eq!(state.tasks[0].sub_tasks.len(), 1);
    assert_eq!(state.tasks[0].sub_tasks[0].id, 10);
    assert_eq!(state.tasks[0].sub_tasks[0].parent_id, 1);
}

/// Test: completing the last subtask leaves the parent alone
/// Given a task with one done and one open subtask
/// When the open one is completed
/// Then both subtasks are done and the parent keeps its own flag
#[tokio::test]
async fn test_completing_sub_task_never_completes_parent() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_with_subs_json(
            1,
            "Prepare lunch",
            false,
            &[
                sub_task_json(10, 1, "Buy bread", true),
                sub_task_json(11, 1, "Slice cheese", false),
            ],
        )]))
        .create_async()
        .await;
    let _update = server
        .mock("PATCH", "/tasks/1/subTasks/11")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sub_task_json(11, 1, "Slice cheese", true))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.update_sub_task(1, 11, true).await;

    let state = store.snapshot();
    let task = &state.tasks[0];
    assert!(task.sub_tasks.iter().all(|s| s.done));
    assert!(!task.done, "completing subtasks must not complete the task");
}

/// Test: reopening a subtask reopens its parent
/// Given a done task whose subtasks are all done
/// When one subtask is marked not done
/// Then the parent is no longer done
#[tokio::test]
async fn test_reopening_sub_task_reopens_parent() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_with_subs_json(
            1,
            "Prepare lunch",
            true,
            &[sub_task_json(10, 1, "Buy bread", true)],
        )]))
        .create_async()
        .await;
    let _update = server
        .mock("PATCH", "/tasks/1/subTasks/10")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sub_task_json(10, 1, "Buy bread", false))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.update_sub_task(1, 10, false).await;

    let state = store.snapshot();
    let task = &state.tasks[0];
    assert!(!task.sub_tasks[0].done);
    assert!(
        !task.done,
        "a task cannot stay done with an incomplete subtask"
    );
}

/// Test: rejection records the error and settles
/// Given POST /tasks answering 400 with a validation body
/// When create_task settles
/// Then loading is off, the error is set, and the list is untouched
#[tokio::test]
async fn test_rejection_sets_error_and_clears_loading() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/tasks")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title": "Title is required"}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    store.create_task("").await;

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error, "Title is required");
    assert!(state.tasks.is_empty(), "a failed create must not add a task");
}

/// Test: a later success clears a stale error
/// Given a store whose last operation failed
/// When a fetch settles successfully
/// Then the error is cleared
#[tokio::test]
async fn test_success_clears_previous_error() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/tasks")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title": "Title is required"}"#)
        .create_async()
        .await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let store = store_for(&server);
    store.create_task("").await;
    assert!(!store.snapshot().error.is_empty());

    store.fetch_tasks().await;
    assert!(store.snapshot().error.is_empty());
}

/// Test: responses for unknown ids are dropped
/// Given a fetched list without task 99
/// When update_task(99) settles successfully anyway
/// Then the list is unchanged and no error is recorded
#[tokio::test]
async fn test_unknown_task_id_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tasks_json(&[task_json(1, "Water plants", false)]))
        .create_async()
        .await;
    let _update = server
        .mock("PATCH", "/tasks/99")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(99, "ghost", true))
        .create_async()
        .await;

    let store = store_for(&server);
    store.fetch_tasks().await;
    store.update_task(99, true).await;

    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, 1);
    assert!(!state.loading);
    assert!(state.error.is_empty());
}

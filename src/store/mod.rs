//! Client-side task store synchronized with the remote API.
//!
//! The store owns [`TaskListState`] inside a `tokio::sync::watch`
//! channel. Operations take `&self`, so any number may be in flight at
//! once; each walks the pending/settled lifecycle on the shared state
//! and the last response to land wins. Interested parties subscribe to
//! the channel and observe every transition, the pending phase included.

pub mod state;

pub use state::TaskListState;

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{ApiClient, ApiError};
use crate::{tlog_debug, tlog_warn};

/// Shared task store wrapped in Arc for concurrent access.
pub type SharedTaskStore = Arc<TaskStore>;

/// Owns the task list and runs the five API-backed operations against it.
#[derive(Debug)]
pub struct TaskStore {
    api: ApiClient,
    state: watch::Sender<TaskListState>,
}

impl TaskStore {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(TaskListState::default());
        Self { api, state }
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<TaskListState> {
        self.state.subscribe()
    }

    fn begin(&self) {
        self.state.send_modify(|s| s.begin());
    }

    fn reject(&self, op: &str, err: ApiError) {
        tlog_warn!("{} rejected: {}", op, err);
        self.state.send_modify(|s| s.fail(err.user_message()));
    }

    /// Replace the local list with the server's.
    pub async fn fetch_tasks(&self) {
        tlog_debug!("TaskStore::fetch_tasks");
        self.begin();
        match self.api.fetch_tasks().await {
            Ok(tasks) => self.state.send_modify(|s| s.finish_fetch(tasks)),
            Err(err) => self.reject("fetch_tasks", err),
        }
    }

    /// Create a task and append it to the list.
    pub async fn create_task(&self, title: &str) {
        tlog_debug!("TaskStore::create_task title={:?}", title);
        self.begin();
        match self.api.create_task(title).await {
            Ok(task) => self.state.send_modify(|s| s.finish_create_task(task)),
            Err(err) => self.reject("create_task", err),
        }
    }

    /// Set a task's done flag and merge the server's version back in.
    pub async fn update_task(&self, task_id: i64, done: bool) {
        tlog_debug!("TaskStore::update_task id={} done={}", task_id, done);
        self.begin();
        match self.api.update_task(task_id, done).await {
            Ok(task) => self
                .state
                .send_modify(|s| s.finish_update_task(task_id, task)),
            Err(err) => self.reject("update_task", err),
        }
    }

    /// Create a subtask under the given task.
    pub async fn create_sub_task(&self, task_id: i64, title: &str) {
        tlog_debug!(
            "TaskStore::create_sub_task task={} title={:?}",
            task_id,
            title
        );
        self.begin();
        match self.api.create_sub_task(task_id, title).await {
            Ok(sub) => self
                .state
                .send_modify(|s| s.finish_create_sub_task(task_id, sub)),
            Err(err) => self.reject("create_sub_task", err),
        }
    }

    /// Set a subtask's done flag and merge the server's version back in.
    pub async fn update_sub_task(&self, task_id: i64, sub_task_id: i64, done: bool) {
        tlog_debug!(
            "TaskStore::update_sub_task task={} sub={} done={}",
            task_id,
            sub_task_id,
            done
        );
        self.begin();
        match self.api.update_sub_task(task_id, sub_task_id, done).await {
            Ok(sub) => self
                .state
                .send_modify(|s| s.finish_update_sub_task(task_id, sub_task_id, sub)),
            Err(err) => self.reject("update_sub_task", err),
        }
    }
}

//! Task and subtask data model, mirroring the wire format of the task API.

use serde::{Deserialize, Serialize};

/// A single step nested under a task. `parent_id` points back at the
/// owning task and is only used for lookups, never for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: i64,
    #[serde(rename = "parentId")]
    pub parent_id: i64,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// A task as the server reports it. Ids are server-assigned; subtasks
/// keep their insertion order, which is also their display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, rename = "subTasks")]
    pub sub_tasks: Vec<SubTask>,
}

impl Task {
    /// Count of subtasks already marked done.
    pub fn completed_sub_tasks(&self) -> usize {
        self.sub_tasks.iter().filter(|s| s.done).count()
    }
}

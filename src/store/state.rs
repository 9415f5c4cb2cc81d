//! In-memory task list state and its transition rules.
//!
//! Every store operation runs the same three-phase lifecycle: `begin`
//! marks the request pending, then exactly one of `fail` or a `finish_*`
//! merge settles it. Merges locate rows with by-id linear scans using
//! the ids the request was issued with; a row that disappeared between
//! request and response leaves the list untouched.

use crate::task::{SubTask, Task};
use crate::tlog_warn;

/// Snapshot of everything the store knows: the task list plus the
/// loading/error bookkeeping of the most recent request.
///
/// `loading` is a single shared flag, not a per-operation counter, so
/// overlapping requests can drop it to false while one is still pending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListState {
    pub loading: bool,
    pub error: String,
    pub tasks: Vec<Task>,
}

impl TaskListState {
    /// Pending phase: a request just went out.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Rejected phase: surface the failure, keep the task list as-is.
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = message;
    }

    fn settle_ok(&mut self) {
        self.loading = false;
        self.error.clear();
    }

    /// Fulfilled fetch: the server's list replaces local state wholesale.
    pub fn finish_fetch(&mut self, tasks: Vec<Task>) {
        self.settle_ok();
        self.tasks = tasks;
    }

    /// Fulfilled create: the new task goes to the end of the list.
    pub fn finish_create_task(&mut self, task: Task) {
        self.settle_ok();
        self.tasks.push(task);
    }

    /// Fulfilled task update: replace the requested task in place.
    pub fn finish_update_task(&mut self, task_id: i64, task: Task) {
        self.settle_ok();
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(slot) => *slot = task,
            None => tlog_warn!("update response for unknown task {} dropped", task_id),
        }
    }

    /// Fulfilled subtask create: append to the parent's subtasks.
    pub fn finish_create_sub_task(&mut self, task_id: i64, sub: SubTask) {
        self.settle_ok();
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(parent) => parent.sub_tasks.push(sub),
            None => tlog_warn!(
                "subtask {} arrived for unknown task {}, dropped",
                sub.id,
                task_id
            ),
        }
    }

    /// Fulfilled subtask update: replace the requested subtask in place,
    /// then force the parent back to not-done if the subtask came back
    /// not-done. A task cannot stay done while an incomplete subtask
    /// exists; the reverse transition never happens automatically.
    pub fn finish_update_sub_task(&mut self, task_id: i64, sub_task_id: i64, sub: SubTask) {
        self.settle_ok();
        let Some(parent) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            tlog_warn!("subtask update for unknown task {} dropped", task_id);
            return;
        };
        let Some(slot) = parent.sub_tasks.iter_mut().find(|s| s.id == sub_task_id) else {
            tlog_warn!(
                "update response for unknown subtask {} under task {} dropped",
                sub_task_id,
                task_id
            );
            return;
        };
        let sub_done = sub.done;
        *slot = sub;
        if !sub_done {
            parent.done = false;
        }
    }
}

//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime infrastructure.

use crate::render::{next_version, RenderState, RowKind, RowView};
use crate::store::TaskListState;

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The severity level of the notification
    pub level: NotificationLevel,
    /// The notification message text
    pub message: String,
}

/// Application UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    List,
    Input(InputKind),
}

/// Types of input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TaskTitle,
    /// Carries the parent task the new subtask will be created under
    SubTaskTitle { task_id: i64 },
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::TaskTitle => "New task",
            InputKind::SubTaskTitle { .. } => "New subtask",
        }
    }
}

/// Position of a visible row within the task tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Index into the task list
    Task(usize),
    /// Index into the task list, then into that task's subtask list
    Sub(usize, usize),
}

/// Pure application state - the single source of truth.
pub struct Model {
    // Core state (mirrors the store)
    pub task_list: TaskListState,
    pub selected: usize,
    /// Task whose subtasks are shown; one panel open at a time
    pub open_task: Option<i64>,
    pub mode: Mode,

    // Input state
    pub input_buffer: String,
    pub notification: Option<Notification>,

    // UI toggle state
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,
}

impl Model {
    pub fn new() -> Self {
        Self {
            task_list: TaskListState::default(),
            selected: 0,
            open_task: None,
            mode: Mode::default(),
            input_buffer: String::new(),
            notification: None,
            show_keymap: false,
            dirty: true,
        }
    }

    /// Rows currently visible: every task, plus the subtasks of the open one.
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (ti, task) in self.task_list.tasks.iter().enumerate() {
            rows.push(Row::Task(ti));
            if self.open_task == Some(task.id) {
                for si in 0..task.sub_tasks.len() {
                    rows.push(Row::Sub(ti, si));
                }
            }
        }
        rows
    }

    /// The row under the cursor, if any.
    pub fn selected_row(&self) -> Option<Row> {
        self.visible_rows().get(self.selected).copied()
    }

    /// Keep the selection inside the visible row range.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move the cursor to the given task's row, if it is visible.
    ///
    /// Expanding or collapsing a panel shifts row indices; relocating by
    /// id keeps the cursor on the task the user acted on.
    pub fn select_task(&mut self, task_id: i64) {
        let pos = self.visible_rows().iter().position(|row| match row {
            Row::Task(ti) => self.task_list.tasks[*ti].id == task_id,
            Row::Sub(..) => false,
        });
        if let Some(pos) = pos {
            self.selected = pos;
        }
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// This is called after state updates to send the current view
    /// to the render thread via a lock-free channel.
    ///
    /// Each snapshot gets a monotonically increasing version number,
    /// enabling the render thread to detect state changes and skip
    /// redundant renders.
    pub fn snapshot(&self) -> RenderState {
        let rows: Vec<RowView> = self
            .visible_rows()
            .into_iter()
            .map(|row| match row {
                Row::Task(ti) => {
                    let task = &self.task_list.tasks[ti];
                    RowView {
                        title: task.title.clone(),
                        done: task.done,
                        kind: RowKind::Task {
                            expanded: self.open_task == Some(task.id),
                            sub_done: task.completed_sub_tasks(),
                            sub_total: task.sub_tasks.len(),
                        },
                    }
                }
                Row::Sub(ti, si) => {
                    let sub = &self.task_list.tasks[ti].sub_tasks[si];
                    RowView {
                        title: sub.title.clone(),
                        done: sub.done,
                        kind: RowKind::Sub,
                    }
                }
            })
            .collect();

        RenderState {
            version: next_version(),
            rows,
            selected: self.selected,
            loading: self.task_list.loading,
            mode: self.mode,
            input_buffer: self.input_buffer.clone(),
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

use crate::tea::{Mode, Notification};
use std::sync::atomic::{AtomicU64, Ordering};

/// One visible line of the task list.
///
/// The logic thread flattens the task tree into rows so the render
/// thread never walks nested structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub title: String,
    pub done: bool,
    pub kind: RowKind,
}

/// What a row represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Task {
        /// Whether the task's subtasks are shown below it
        expanded: bool,
        /// Subtask progress as (done, total)
        sub_done: usize,
        sub_total: usize,
    },
    Sub,
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    pub rows: Vec<RowView>,
    pub selected: usize,
    /// A request is in flight; the title bar shows a badge
    pub loading: bool,
    pub mode: Mode,
    pub input_buffer: String,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            rows: Vec::new(),
            selected: 0,
            loading: false,
            mode: Mode::List,
            input_buffer: String::new(),
            notification: None,
            show_keymap: false,
        }
    }
}

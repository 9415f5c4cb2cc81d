//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

/// Output commands from the update function.
/// These represent side effects that need to be executed.
#[derive(Debug)]
pub enum Command {
    // Store operations (spawn async tasks)
    FetchTasks,
    CreateTask {
        title: String,
    },
    UpdateTask {
        task_id: i64,
        done: bool,
    },
    CreateSubTask {
        task_id: i64,
        title: String,
    },
    UpdateSubTask {
        task_id: i64,
        sub_task_id: i64,
        done: bool,
    },

    // App lifecycle
    Quit,
}

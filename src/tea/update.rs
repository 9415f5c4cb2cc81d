//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute.

use crossterm::event::{KeyCode, KeyEvent};

use crate::tlog_warn;

use super::command::Command;
use super::message::Message;
use super::model::{InputKind, Mode, Model, Notification, NotificationLevel, Row};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    tlog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
///
/// This function:
/// 1. Takes the current model and an input message
/// 2. Mutates the model state (and sets dirty flag)
/// 3. Returns a list of commands (side effects) to execute
///
/// The function itself has no side effects - all I/O happens via returned Commands.
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            match model.mode {
                Mode::List => update_list_mode(model, key, &mut cmds),
                Mode::Input(kind) => update_input_mode(model, key, kind, &mut cmds),
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        Message::StoreUpdated(state) => {
            // Surface an error the moment it arrives; repeated snapshots
            // of the same failure stay quiet
            if !state.error.is_empty() && state.error != model.task_list.error {
                set_error(model, state.error.clone());
            }
            model.task_list = state;

            // The open panel follows its task; drop it if the task vanished
            if let Some(open_id) = model.open_task {
                if !model.task_list.tasks.iter().any(|t| t.id == open_id) {
                    model.open_task = None;
                }
            }
            model.clamp_selection();
            model.dirty = true;
        }
    }

    cmds
}

fn update_list_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = model.visible_rows().len();
            if len != 0 {
                model.selected = (model.selected + 1) % len;
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            let len = model.visible_rows().len();
            if len != 0 {
                model.selected = model.selected.checked_sub(1).unwrap_or(len - 1);
            }
        }

        KeyCode::Enter => {
            // Expand/collapse the selected task's subtask panel
            if let Some(Row::Task(ti)) = model.selected_row() {
                let id = model.task_list.tasks[ti].id;
                model.open_task = if model.open_task == Some(id) {
                    None
                } else {
                    Some(id)
                };
                model.select_task(id);
            }
        }

        KeyCode::Char(' ') => match model.selected_row() {
            Some(Row::Task(ti)) => {
                let task = &model.task_list.tasks[ti];
                cmds.push(Command::UpdateTask {
                    task_id: task.id,
                    done: !task.done,
                });
            }
            Some(Row::Sub(ti, si)) => {
                let task = &model.task_list.tasks[ti];
                let sub = &task.sub_tasks[si];
                cmds.push(Command::UpdateSubTask {
                    task_id: task.id,
                    sub_task_id: sub.id,
                    done: !sub.done,
                });
            }
            None => {}
        },

        KeyCode::Char('n') => {
            model.mode = Mode::Input(InputKind::TaskTitle);
            model.input_buffer.clear();
        }

        KeyCode::Char('a') => {
            // New subtask under the task the cursor is on (a subtask row
            // targets its parent); the panel opens so the result is visible
            let parent = match model.selected_row() {
                Some(Row::Task(ti)) | Some(Row::Sub(ti, _)) => {
                    Some(model.task_list.tasks[ti].id)
                }
                None => None,
            };
            if let Some(task_id) = parent {
                model.open_task = Some(task_id);
                model.select_task(task_id);
                model.mode = Mode::Input(InputKind::SubTaskTitle { task_id });
                model.input_buffer.clear();
            }
        }

        KeyCode::Char('r') => {
            cmds.push(Command::FetchTasks);
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

fn update_input_mode(model: &mut Model, key: KeyEvent, kind: InputKind, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Enter => {
            let title = std::mem::take(&mut model.input_buffer);
            model.mode = Mode::List;
            if !title.is_empty() {
                match kind {
                    InputKind::TaskTitle => cmds.push(Command::CreateTask { title }),
                    InputKind::SubTaskTitle { task_id } => {
                        cmds.push(Command::CreateSubTask { task_id, title })
                    }
                }
            }
        }

        KeyCode::Esc => {
            model.input_buffer.clear();
            model.mode = Mode::List;
        }

        KeyCode::Backspace => {
            model.input_buffer.pop();
        }

        KeyCode::Char(c) => {
            model.input_buffer.push(c);
        }

        _ => {}
    }
}

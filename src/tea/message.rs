//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - they come from external sources
//! like keyboard events or the store sync actor.

use crossterm::event::KeyEvent;

use crate::store::TaskListState;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // From the store sync actor
    /// The task store moved to a new state (pending or settled)
    StoreUpdated(TaskListState),
}

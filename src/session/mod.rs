//! Editing session state: bounded undo history and the session
//! state machine that owns the live buffer.

pub mod editor;
pub mod history;

pub use editor::EditorSession;
pub use history::{HistoryStack, DEFAULT_HISTORY_CAPACITY};

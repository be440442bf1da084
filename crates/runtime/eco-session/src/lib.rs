//! Session-scoped eco tasks, quiz and rewards
//!
//! State lives for one browser session. It is created on first visit,
//! mutated by task and quiz actions, and its daily task list resets when the
//! calendar date changes.

pub mod context;
pub mod quiz;
pub mod store;
pub mod tasks;

pub use context::{SessionContext, TaskList};
pub use quiz::{QuizQuestion, QUESTIONS};
pub use store::SessionStore;
pub use tasks::{EcoTask, DAILY_TASKS};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No {list:?} task at index {index}")]
    UnknownTask { list: TaskList, index: usize },

    #[error("Today's quiz is already completed ({score} points)")]
    QuizAlreadyTaken { score: u32 },
}

pub type Result<T> = std::result::Result<T, SessionError>;

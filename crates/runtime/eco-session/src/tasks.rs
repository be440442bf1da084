//! Eco tasks

use serde::{Deserialize, Serialize};

/// Tasks assigned every day
pub const DAILY_TASKS: [&str; 5] = [
    "Turn off lights when not in use",
    "Use a reusable water bottle",
    "Walk or cycle instead of using a car",
    "Avoid using plastic bags",
    "Unplug unused devices",
];

/// A task and whether it has been done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcoTask {
    pub task: String,
    pub done: bool,
}

impl EcoTask {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            done: false,
        }
    }

    /// Mark done. Returns true only on the transition from not-done.
    pub fn complete(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        true
    }
}

/// A fresh, all-open copy of the daily task list
pub fn daily_tasks() -> Vec<EcoTask> {
    DAILY_TASKS.iter().map(|t| EcoTask::new(*t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_tasks_start_open() {
        let tasks = daily_tasks();
        assert_eq!(tasks.len(), 5);
        assert!(tasks.iter().all(|t| !t.done));
    }

    #[test]
    fn test_complete_once() {
        let mut task = EcoTask::new("Plant a tree");
        assert!(task.complete());
        assert!(!task.complete());
        assert!(task.done);
    }
}

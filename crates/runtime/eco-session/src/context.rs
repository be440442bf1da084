//! Per-session state
//!
//! One [`SessionContext`] per browser session. Daily tasks reset whenever the
//! calendar date moves on; custom tasks, rewards and the quiz record survive.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::quiz;
use crate::tasks::{daily_tasks, EcoTask};
use crate::{Result, SessionError};

/// Which task list an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskList {
    Daily,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    /// Date the daily task list belongs to
    pub task_date: NaiveDate,
    pub daily_tasks: Vec<EcoTask>,
    pub custom_tasks: Vec<EcoTask>,
    pub rewards: u32,
    pub quiz_score: u32,
    /// Date of the last quiz submission
    pub quiz_date: Option<NaiveDate>,
}

impl SessionContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            task_date: today,
            daily_tasks: daily_tasks(),
            custom_tasks: Vec::new(),
            rewards: 0,
            quiz_score: 0,
            quiz_date: None,
        }
    }

    /// Reset the daily tasks if `today` differs from the task date.
    /// Returns true when a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.task_date == today {
            return false;
        }
        tracing::debug!(from = %self.task_date, to = %today, "resetting daily tasks");
        self.daily_tasks = daily_tasks();
        self.task_date = today;
        true
    }

    /// Mark a task done. The first completion earns one reward point; later
    /// ones change nothing. Returns whether a point was awarded.
    pub fn complete_task(&mut self, list: TaskList, index: usize) -> Result<bool> {
        let tasks = match list {
            TaskList::Daily => &mut self.daily_tasks,
            TaskList::Custom => &mut self.custom_tasks,
        };
        let task = tasks
            .get_mut(index)
            .ok_or(SessionError::UnknownTask { list, index })?;
        let awarded = task.complete();
        if awarded {
            self.rewards += 1;
        }
        Ok(awarded)
    }

    /// Append a custom task. Blank input is ignored.
    pub fn add_custom_task(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.custom_tasks.push(EcoTask::new(text));
        true
    }

    /// Whether the quiz can still be taken today
    pub fn quiz_available(&self, today: NaiveDate) -> bool {
        self.quiz_date != Some(today)
    }

    /// Score a quiz submission and bank the points. One submission per day.
    pub fn submit_quiz(&mut self, answers: &HashMap<usize, String>, today: NaiveDate) -> Result<u32> {
        if !self.quiz_available(today) {
            return Err(SessionError::QuizAlreadyTaken {
                score: self.quiz_score,
            });
        }
        let score = quiz::score(answers);
        self.quiz_score = score;
        self.rewards += score;
        self.quiz_date = Some(today);
        Ok(score)
    }

    /// Nothing earned, added or answered yet
    pub fn is_untouched(&self) -> bool {
        self.rewards == 0
            && self.quiz_date.is_none()
            && self.custom_tasks.is_empty()
            && self.daily_tasks.iter().all(|t| !t.done)
    }

    pub fn completed_tasks(&self) -> usize {
        self.daily_tasks
            .iter()
            .chain(self.custom_tasks.iter())
            .filter(|t| t.done)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn correct_answers() -> HashMap<usize, String> {
        quiz::QUESTIONS
            .iter()
            .map(|q| (q.id, q.answer.to_string()))
            .collect()
    }

    #[test]
    fn test_new_session() {
        let ctx = SessionContext::new(day(1));
        assert_eq!(ctx.daily_tasks.len(), 5);
        assert!(ctx.custom_tasks.is_empty());
        assert_eq!(ctx.rewards, 0);
        assert!(ctx.quiz_available(day(1)));
    }

    #[test]
    fn test_untouched_until_progress() {
        let mut ctx = SessionContext::new(day(1));
        assert!(ctx.is_untouched());
        ctx.add_custom_task("Compost kitchen scraps");
        assert!(!ctx.is_untouched());

        let mut ctx = SessionContext::new(day(1));
        ctx.submit_quiz(&HashMap::new(), day(1)).unwrap();
        assert!(!ctx.is_untouched());
    }

    #[test]
    fn test_complete_task_awards_once() {
        let mut ctx = SessionContext::new(day(1));
        assert!(ctx.complete_task(TaskList::Daily, 2).unwrap());
        assert!(!ctx.complete_task(TaskList::Daily, 2).unwrap());
        assert_eq!(ctx.rewards, 1);
        assert_eq!(ctx.completed_tasks(), 1);
    }

    #[test]
    fn test_unknown_task_index() {
        let mut ctx = SessionContext::new(day(1));
        let err = ctx.complete_task(TaskList::Custom, 0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnknownTask {
                list: TaskList::Custom,
                index: 0
            }
        ));
    }

    #[test]
    fn test_custom_tasks() {
        let mut ctx = SessionContext::new(day(1));
        assert!(!ctx.add_custom_task("   "));
        assert!(ctx.add_custom_task(" Compost kitchen scraps "));
        assert_eq!(ctx.custom_tasks[0].task, "Compost kitchen scraps");
        assert!(ctx.complete_task(TaskList::Custom, 0).unwrap());
        assert_eq!(ctx.rewards, 1);
    }

    #[test]
    fn test_roll_over_resets_daily_only() {
        let mut ctx = SessionContext::new(day(1));
        ctx.complete_task(TaskList::Daily, 0).unwrap();
        ctx.add_custom_task("Carry a cloth bag");
        ctx.complete_task(TaskList::Custom, 0).unwrap();

        assert!(!ctx.roll_over(day(1)));
        assert!(ctx.daily_tasks[0].done);

        assert!(ctx.roll_over(day(2)));
        assert!(ctx.daily_tasks.iter().all(|t| !t.done));
        assert_eq!(ctx.task_date, day(2));
        assert!(ctx.custom_tasks[0].done);
        assert_eq!(ctx.rewards, 2);
    }

    #[test]
    fn test_quiz_once_per_day() {
        let mut ctx = SessionContext::new(day(1));
        assert_eq!(ctx.submit_quiz(&correct_answers(), day(1)).unwrap(), 20);
        assert_eq!(ctx.rewards, 20);
        assert!(!ctx.quiz_available(day(1)));

        let err = ctx.submit_quiz(&correct_answers(), day(1)).unwrap_err();
        assert!(matches!(err, SessionError::QuizAlreadyTaken { score: 20 }));
        assert_eq!(ctx.rewards, 20);

        // next day the quiz opens again and points accumulate
        assert_eq!(ctx.submit_quiz(&HashMap::new(), day(2)).unwrap(), 0);
        assert_eq!(ctx.quiz_score, 0);
        assert_eq!(ctx.rewards, 20);
    }
}

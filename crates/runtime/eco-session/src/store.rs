//! Session store
//!
//! Contexts keyed by session id. Every access first applies the date
//! roll-over, so handlers never see yesterday's task list. On the first
//! access of a new day, sessions left untouched on an earlier day are
//! dropped; sessions with progress are kept so rewards carry over.

use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::context::SessionContext;

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<Uuid, SessionContext>,
    /// Last date stale sessions were swept
    swept_on: Option<NaiveDate>,
}

impl Inner {
    fn sweep(&mut self, today: NaiveDate) -> usize {
        if self.swept_on.is_some_and(|d| d >= today) {
            return 0;
        }
        self.swept_on = Some(today);
        let before = self.sessions.len();
        self.sessions
            .retain(|_, ctx| ctx.task_date >= today || !ctx.is_untouched());
        before - self.sessions.len()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a session, creating it on first visit
    pub async fn snapshot(&self, id: Uuid, today: NaiveDate) -> SessionContext {
        self.update(id, today, |ctx| ctx.clone()).await
    }

    /// Run `f` against a session, creating it on first visit
    pub async fn update<R, F>(&self, id: Uuid, today: NaiveDate, f: F) -> R
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut inner = self.inner.write().await;
        let evicted = inner.sweep(today);
        if evicted > 0 {
            tracing::info!(evicted, "dropped stale sessions");
        }
        let ctx = inner.sessions.entry(id).or_insert_with(|| {
            tracing::debug!(%id, "new session");
            SessionContext::new(today)
        });
        ctx.roll_over(today);
        f(ctx)
    }

    /// Drop sessions untouched since before `today`. Returns how many went.
    pub async fn evict_stale(&self, today: NaiveDate) -> usize {
        let mut inner = self.inner.write().await;
        inner.swept_on = None;
        inner.sweep(today)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.sessions.is_empty()
    }
}

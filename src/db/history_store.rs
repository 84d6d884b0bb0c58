use anyhow::Result;
use async_trait::async_trait;

use crate::history::{FeedbackOutcome, HistoryStore};
use crate::models::{AdaptationEvent, Feedback};

use super::connection::Database;

/// SQLite-backed history for sessions that should survive a restart.
///
/// Same contract as the in-memory store; rows are scoped to one session id
/// so several sessions can share the database file.
pub struct SqliteHistory {
    db: Database,
    session_id: String,
}

impl SqliteHistory {
    pub fn new(db: Database, session_id: impl Into<String>) -> Self {
        Self {
            db,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn append(&self, event: AdaptationEvent) -> Result<()> {
        self.db
            .insert_adaptation_event(&self.session_id, &event)
            .await
    }

    async fn provide_feedback(
        &self,
        event_id: &str,
        feedback: Feedback,
    ) -> Result<FeedbackOutcome> {
        self.db.set_event_feedback(event_id, feedback).await
    }

    async fn events(&self) -> Result<Vec<AdaptationEvent>> {
        self.db.get_adaptation_events(&self.session_id).await
    }

    async fn commit_count(&self) -> Result<u64> {
        self.db.count_adaptation_events(&self.session_id).await
    }
}

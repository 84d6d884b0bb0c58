use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AdaptationEvent, Feedback};

use super::{FeedbackOutcome, HistoryStore};

/// Session-scoped in-memory history; the default backing.
#[derive(Default)]
pub struct MemoryHistory {
    events: RwLock<Vec<AdaptationEvent>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, event: AdaptationEvent) -> Result<()> {
        self.events.write().unwrap().push(event);
        Ok(())
    }

    async fn provide_feedback(
        &self,
        event_id: &str,
        feedback: Feedback,
    ) -> Result<FeedbackOutcome> {
        let mut events = self.events.write().unwrap();
        match events.iter_mut().find(|event| event.id == event_id) {
            None => Ok(FeedbackOutcome::UnknownEvent),
            Some(event) if event.feedback.is_some() => Ok(FeedbackOutcome::AlreadySet),
            Some(event) => {
                event.feedback = Some(feedback);
                event.effectiveness_score = Some(feedback.effectiveness_score());
                Ok(FeedbackOutcome::Recorded)
            }
        }
    }

    async fn events(&self) -> Result<Vec<AdaptationEvent>> {
        Ok(self.events.read().unwrap().clone())
    }

    async fn commit_count(&self) -> Result<u64> {
        Ok(self.events.read().unwrap().len() as u64)
    }
}

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use serde_json::{from_str, to_string};

use crate::db::connection::Database;
use crate::db::helpers::{parse_datetime, parse_feedback};
use crate::history::FeedbackOutcome;
use crate::models::{AdaptationEvent, Feedback};

impl Database {
    pub async fn insert_adaptation_event(
        &self,
        session_id: &str,
        event: &AdaptationEvent,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        let record = event.clone();
        self.execute(move |conn| {
            let context_json =
                to_string(&record.context).context("failed to serialize context snapshot")?;
            let metrics_json =
                to_string(&record.metrics).context("failed to serialize metrics snapshot")?;
            let rules_applied_json =
                to_string(&record.rules_applied).context("failed to serialize rules list")?;
            let before_json =
                to_string(&record.before).context("failed to serialize before config")?;
            let after_json =
                to_string(&record.after).context("failed to serialize after config")?;
            let rationale_json =
                to_string(&record.rationale).context("failed to serialize rationale")?;

            conn.execute(
                "INSERT INTO adaptation_events (
                    id,
                    session_id,
                    timestamp,
                    context_json,
                    metrics_json,
                    rules_applied_json,
                    before_json,
                    after_json,
                    rationale_json,
                    feedback,
                    effectiveness_score
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id,
                    session_id,
                    record.timestamp.to_rfc3339(),
                    context_json,
                    metrics_json,
                    rules_applied_json,
                    before_json,
                    after_json,
                    rationale_json,
                    record.feedback.map(|f| f.as_str()),
                    record.effectiveness_score,
                ],
            )
            .with_context(|| "failed to insert adaptation event")?;
            Ok(())
        })
        .await
    }

    /// First-feedback-wins update; reports whether the write landed.
    pub async fn set_event_feedback(
        &self,
        event_id: &str,
        feedback: Feedback,
    ) -> Result<FeedbackOutcome> {
        let event_id = event_id.to_string();
        self.execute(move |conn| {
            let existing: Option<Option<String>> = conn
                .query_row(
                    "SELECT feedback FROM adaptation_events WHERE id = ?1",
                    params![event_id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                None => Ok(FeedbackOutcome::UnknownEvent),
                Some(Some(_)) => Ok(FeedbackOutcome::AlreadySet),
                Some(None) => {
                    conn.execute(
                        "UPDATE adaptation_events
                         SET feedback = ?1,
                             effectiveness_score = ?2
                         WHERE id = ?3 AND feedback IS NULL",
                        params![
                            feedback.as_str(),
                            feedback.effectiveness_score(),
                            event_id,
                        ],
                    )
                    .with_context(|| "failed to record event feedback")?;
                    Ok(FeedbackOutcome::Recorded)
                }
            }
        })
        .await
    }

    pub async fn get_adaptation_events(&self, session_id: &str) -> Result<Vec<AdaptationEvent>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT
                    id,
                    timestamp,
                    context_json,
                    metrics_json,
                    rules_applied_json,
                    before_json,
                    after_json,
                    rationale_json,
                    feedback,
                    effectiveness_score
                FROM adaptation_events
                WHERE session_id = ?1
                ORDER BY timestamp ASC",
            )?;

            let mut rows = stmt.query(params![session_id])?;
            let mut events = Vec::new();
            while let Some(row) = rows.next()? {
                let id: String = row.get(0)?;
                let timestamp_str: String = row.get(1)?;
                let context_json: String = row.get(2)?;
                let metrics_json: String = row.get(3)?;
                let rules_applied_json: String = row.get(4)?;
                let before_json: String = row.get(5)?;
                let after_json: String = row.get(6)?;
                let rationale_json: String = row.get(7)?;
                let feedback: Option<String> = row.get(8)?;
                let effectiveness_score: Option<f64> = row.get(9)?;

                events.push(AdaptationEvent {
                    id,
                    timestamp: parse_datetime(&timestamp_str, "timestamp")?,
                    context: from_str(&context_json)
                        .context("failed to deserialize context snapshot")?,
                    metrics: from_str(&metrics_json)
                        .context("failed to deserialize metrics snapshot")?,
                    rules_applied: from_str(&rules_applied_json)
                        .context("failed to deserialize rules list")?,
                    before: from_str(&before_json)
                        .context("failed to deserialize before config")?,
                    after: from_str(&after_json).context("failed to deserialize after config")?,
                    rationale: from_str(&rationale_json)
                        .context("failed to deserialize rationale")?,
                    feedback: parse_feedback(feedback)?,
                    effectiveness_score,
                });
            }

            Ok(events)
        })
        .await
    }

    pub async fn count_adaptation_events(&self, session_id: &str) -> Result<u64> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM adaptation_events WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::Feedback;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_feedback(value: Option<String>) -> Result<Option<Feedback>> {
    match value.as_deref() {
        None => Ok(None),
        Some("Positive") => Ok(Some(Feedback::Positive)),
        Some("Negative") => Ok(Some(Feedback::Negative)),
        Some(other) => Err(anyhow!("unknown feedback value {other}")),
    }
}

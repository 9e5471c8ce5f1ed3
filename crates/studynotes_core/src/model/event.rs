//! Calendar event record and scheduling payload.

use crate::model::timestamp;
use crate::model::validation::{validate_event, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned event identifier.
pub type EventId = String;

/// Event as confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

/// Scheduling request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start_time,
            end_time,
        }
    }

    /// Title and time-window check; must pass before submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_event(&self.title, self.start_time, self.end_time)
    }
}

// Event module
// Calendar event model shared with the remote store

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Calendar event as held by the remote store.
///
/// The grid only ever holds read-only copies of these, plus at most one
/// locally-mutated draft during an active gesture. Field names mirror the
/// store's JSON wire format, so the model doubles as the HTTP payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier; `None` for an uncommitted creation draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "start_time")]
    pub start: DateTime<Local>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Local>,
    #[serde(rename = "is_all_day", default)]
    pub all_day: bool,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    ///
    /// # Returns
    /// Returns `Result<Event, String>` with validation
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let title = title.into();

        // Validate title
        if title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        // Validate times
        if end <= start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(Self {
            id: None,
            title,
            description: None,
            location: None,
            start,
            end,
            all_day: false,
        })
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(())
    }

    /// Get the duration of the event
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Partial update sent to the store after a move or resize gesture.
/// Only the time window is committed; all other fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPatch {
    #[serde(rename = "start_time")]
    pub start: DateTime<Local>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Local>,
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    all_day: bool,
}

impl EventBuilder {
    /// Create a new event builder
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            location: None,
            start: None,
            end: None,
            all_day: false,
        }
    }

    /// Set the event title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the event description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the start time
    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end time
    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set as all-day event
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let event = Event {
            id: None,
            title,
            description: self.description,
            location: self.location,
            start,
            end,
            all_day: self.all_day,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Event service
// Remote event store boundary: async create/update/delete over HTTP + JSON

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::models::event::{Event, EventPatch};

/// Errors from the remote event API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },
}

/// Async boundary to the event store.
///
/// Each operation is idempotent on id and fallible; none is retried here.
/// The grid core holds no event cache of its own beyond the transient
/// gesture draft, so callers re-fetch after a successful mutation.
#[allow(async_fn_in_trait)]
pub trait EventGateway {
    /// Fetch every event for the current user.
    async fn list(&self) -> Result<Vec<Event>>;
    /// Persist an uncommitted draft (`id` must be `None`); returns the
    /// stored event with its assigned id. Called by the creation dialog,
    /// never by the gesture machinery directly.
    async fn create(&self, event: &Event) -> Result<Event>;
    /// Replace only the time window of an existing event.
    async fn update(&self, id: i64, patch: &EventPatch) -> Result<Event>;
    /// Remove an event.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<String>,
}

/// Event store client for the dashboard's calendar API.
///
/// Endpoints live under `{base_url}/api/calendar/events` and scope every
/// call with a `user_id` query parameter. Authentication is owned by the
/// surrounding application; when it hands us a bearer token we attach it,
/// token refresh is not handled here.
pub struct RemoteEventService {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
    bearer_token: Option<String>,
}

impl RemoteEventService {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            user_id: user_id.into(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn events_url(&self) -> String {
        format!("{}/api/calendar/events", self.base_url)
    }

    fn event_url(&self, id: i64) -> String {
        format!("{}/api/calendar/events/{}", self.base_url, id)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.query(&[("user_id", self.user_id.as_str())]);
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Reject non-success responses, pulling the server's `detail` field
    /// into the error when present.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(ApiError::Status { status, detail })
    }
}

impl EventGateway for RemoteEventService {
    async fn list(&self) -> Result<Vec<Event>> {
        let response = self
            .apply_auth(self.client.get(self.events_url()))
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to fetch events")?;

        let response = Self::check(response).await.context("Failed to fetch events")?;
        let body: EventsResponse = response.json().await.context("Malformed events response")?;
        debug!("Fetched {} events for user {}", body.events.len(), self.user_id);
        Ok(body.events)
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        let response = self
            .apply_auth(self.client.post(self.events_url()).json(event))
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to create event")?;

        let response = Self::check(response).await.context("Failed to create event")?;
        response.json().await.context("Malformed create response")
    }

    async fn update(&self, id: i64, patch: &EventPatch) -> Result<Event> {
        let response = self
            .apply_auth(self.client.put(self.event_url(id)).json(patch))
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to update event {}", id))?;

        let response = Self::check(response)
            .await
            .with_context(|| format!("Failed to update event {}", id))?;
        response.json().await.context("Malformed update response")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .apply_auth(self.client.delete(self.event_url(id)))
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to delete event {}", id))?;

        Self::check(response)
            .await
            .with_context(|| format!("Failed to delete event {}", id))?;
        Ok(())
    }
}

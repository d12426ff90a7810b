//! Audit events for authentication flows.
//!
//! Security-relevant flow events are built with [`Event::builder`] and
//! written as structured `tracing` records on the [`AUDIT_TARGET`] target,
//! so they can be routed separately from ordinary diagnostics.
//!
//! All events include:
//! - Timestamp (ISO 8601)
//! - Event type
//! - Flow and client identity (when available)
//! - Outcome (success/failure)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tracing target used for audit records.
pub const AUDIT_TARGET: &str = "authflow::audit";

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A flow was created by an authorization request.
    FlowInitiated,
    /// An authorization or authentication request was rejected.
    FlowRejected,
    /// Credentials were verified and the flow completed.
    Login,
    /// Credential verification failed.
    LoginError,
    /// Expired flows were evicted.
    FlowExpired,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Flow the event belongs to.
    pub flow_id: Option<Uuid>,

    /// Client that initiated the flow.
    pub client_id: Option<String>,

    /// Authenticator involved in the event.
    pub authenticator_id: Option<String>,

    /// Error code or message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the audit log.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let flow_id = self.flow_id.map(|id| id.to_string()).unwrap_or_default();

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                target: AUDIT_TARGET,
                event_id = %self.id,
                event_type = ?self.event_type,
                flow_id = %flow_id,
                client_id = self.client_id.as_deref().unwrap_or(""),
                authenticator_id = self.authenticator_id.as_deref().unwrap_or(""),
                details = %details,
                "audit event"
            ),
            EventOutcome::Failure => tracing::warn!(
                target: AUDIT_TARGET,
                event_id = %self.id,
                event_type = ?self.event_type,
                flow_id = %flow_id,
                client_id = self.client_id.as_deref().unwrap_or(""),
                authenticator_id = self.authenticator_id.as_deref().unwrap_or(""),
                error = self.error.as_deref().unwrap_or(""),
                details = %details,
                "audit event"
            ),
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    flow_id: Option<Uuid>,
    client_id: Option<String>,
    authenticator_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            flow_id: None,
            client_id: None,
            authenticator_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the flow ID.
    #[must_use]
    pub const fn flow(mut self, flow_id: Uuid) -> Self {
        self.flow_id = Some(flow_id);
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the authenticator ID.
    #[must_use]
    pub fn authenticator(mut self, authenticator_id: impl Into<String>) -> Self {
        self.authenticator_id = Some(authenticator_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            flow_id: self.flow_id,
            client_id: self.client_id,
            authenticator_id: self.authenticator_id,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds the event and writes it to the audit log.
    pub fn emit(self) {
        self.build().emit();
    }
}

//! Flow record and status machine.
//!
//! A flow is created by an authorization request and mutated only by
//! authentication attempts. Status moves along:
//!
//! ```text
//! INCOMPLETE ──fail──▶ FAIL_INCOMPLETE ──fail──┐
//!     │                    │    ▲──────────────┘
//!     └──success──▶ SUCCESS_COMPLETED ◀──success
//! ```
//!
//! `SUCCESS_COMPLETED` is terminal.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FlowError, FlowResult};

/// Default flow lifetime (10 minutes).
pub const DEFAULT_FLOW_LIFESPAN: Duration = Duration::from_secs(600);

/// Scope recorded when the client sends none.
pub const DEFAULT_SCOPE: &str = "openid";

/// Status of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStatus {
    /// Created, no attempt yet.
    #[default]
    Incomplete,
    /// At least one attempt failed.
    FailIncomplete,
    /// Credentials verified and a code issued.
    SuccessCompleted,
}

impl FlowStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "INCOMPLETE",
            Self::FailIncomplete => "FAIL_INCOMPLETE",
            Self::SuccessCompleted => "SUCCESS_COMPLETED",
        }
    }

    /// Checks whether the status machine allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Incomplete | Self::FailIncomplete, Self::FailIncomplete | Self::SuccessCompleted)
        )
    }

    /// Checks if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SuccessCompleted)
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Challenge currently outstanding on a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    /// The authenticator prompt is outstanding.
    #[default]
    Initial,
    /// Nothing outstanding.
    Completed,
}

/// One in-progress authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    /// Unique flow identifier.
    pub id: Uuid,
    /// Client that initiated the flow.
    pub client_id: String,
    /// Redirect URI sent with the authorization request.
    pub redirect_uri: String,
    /// Requested scope.
    pub scope: String,
    /// Opaque client state, echoed back on completion.
    pub state: String,
    /// Current status.
    pub status: FlowStatus,
    /// Current step.
    pub step: FlowStep,
    /// Failed verification attempts so far.
    pub failed_attempts: u32,
    /// Authorization code, set on completion.
    pub auth_code: Option<String>,
    /// When the flow was created.
    pub created_at: DateTime<Utc>,
    /// When the flow stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl Flow {
    /// Creates a new flow in `INCOMPLETE` status.
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
            state: String::new(),
            status: FlowStatus::Incomplete,
            step: FlowStep::Initial,
            failed_attempts: 0,
            auth_code: None,
            created_at,
            expires_at: expiry(created_at, DEFAULT_FLOW_LIFESPAN),
        }
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the client state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the lifetime, counted from creation.
    #[must_use]
    pub fn with_lifespan(mut self, lifespan: Duration) -> Self {
        self.expires_at = expiry(self.created_at, lifespan);
        self
    }

    /// Checks whether the flow expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks whether the flow has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks whether the flow completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns how many failed attempts remain out of `max_attempts`.
    #[must_use]
    pub const fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.failed_attempts)
    }

    /// Checks whether every allowed attempt already failed.
    #[must_use]
    pub const fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.failed_attempts >= max_attempts
    }

    /// Moves to `next` if the status machine allows it.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` otherwise.
    pub fn transition(&mut self, next: FlowStatus) -> FlowResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(FlowError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Completes the flow and binds the authorization code to it.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Completed` if the flow already completed.
    pub fn complete(&mut self, code: impl Into<String>) -> FlowResult<()> {
        if self.is_completed() {
            return Err(FlowError::Completed(self.id));
        }
        self.transition(FlowStatus::SuccessCompleted)?;
        self.step = FlowStep::Completed;
        self.auth_code = Some(code.into());
        Ok(())
    }

    /// Records a failed attempt and returns the attempts left.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Completed` if the flow already completed, or
    /// `FlowError::AttemptsExhausted` if no attempt was left to fail.
    pub fn record_failure(&mut self, max_attempts: u32) -> FlowResult<u32> {
        if self.is_completed() {
            return Err(FlowError::Completed(self.id));
        }
        if self.is_exhausted(max_attempts) {
            return Err(FlowError::AttemptsExhausted(self.id));
        }
        self.transition(FlowStatus::FailIncomplete)?;
        self.failed_attempts += 1;
        Ok(self.remaining_attempts(max_attempts))
    }
}

fn expiry(created_at: DateTime<Utc>, lifespan: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(lifespan)
        .ok()
        .and_then(|lifespan| created_at.checked_add_signed(lifespan))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

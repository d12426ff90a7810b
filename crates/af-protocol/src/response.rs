//! Response envelopes for flow endpoints.

use af_auth::{AuthenticatorDescriptor, FailureMessage};
use af_session::{Flow, FlowStatus};
use serde::Serialize;
use uuid::Uuid;

/// Flow type reported by every flow response.
pub const FLOW_TYPE_AUTHENTICATION: &str = "AUTHENTICATION";

/// Link name for the authentication endpoint.
pub const LINK_AUTHENTICATION: &str = "authentication";

/// Context key carrying the attempts left on a flow.
pub const REMAINING_ATTEMPTS_KEY: &str = "remainingAttempts";

/// Kind of step a client must take next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    /// Pick an authenticator and submit its parameters.
    AuthenticatorPrompt,
}

/// The challenge a client must answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    /// Step kind.
    pub step_type: StepType,
    /// Authenticators the client may choose from.
    pub authenticators: Vec<AuthenticatorDescriptor>,
}

impl NextStep {
    /// Creates an authenticator prompt.
    #[must_use]
    pub const fn prompt(authenticators: Vec<AuthenticatorDescriptor>) -> Self {
        Self {
            step_type: StepType::AuthenticatorPrompt,
            authenticators,
        }
    }
}

/// Hypermedia link to the endpoint that continues the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Link relation.
    pub name: String,
    /// Target path.
    pub href: String,
    /// HTTP method.
    pub method: String,
}

impl Link {
    /// Creates the `authentication` link.
    #[must_use]
    pub fn authentication(href: impl Into<String>) -> Self {
        Self {
            name: LINK_AUTHENTICATION.to_string(),
            href: href.into(),
            method: "POST".to_string(),
        }
    }
}

/// Severity of a flow message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// The last attempt failed.
    Error,
}

/// Key/value pair attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContext {
    /// Context key.
    pub key: String,
    /// Context value.
    pub value: String,
}

/// Diagnostic message attached to a retry response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Severity.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Stable message identifier.
    pub message_id: String,
    /// Human-readable text.
    pub message: String,
    /// Localization key.
    pub i18n_key: String,
    /// Extra context.
    pub context: Vec<MessageContext>,
}

impl Message {
    /// Creates the error message for a failed attempt.
    #[must_use]
    pub fn failed_attempt(failure: FailureMessage, remaining_attempts: u32) -> Self {
        Self {
            message_type: MessageType::Error,
            message_id: failure.message_id,
            message: failure.message,
            i18n_key: failure.i18n_key,
            context: vec![MessageContext {
                key: REMAINING_ATTEMPTS_KEY.to_string(),
                value: remaining_attempts.to_string(),
            }],
        }
    }
}

/// Response for a flow that still awaits authentication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    /// Flow identifier.
    pub flow_id: Uuid,
    /// Current status.
    pub flow_status: FlowStatus,
    /// Always `AUTHENTICATION`.
    pub flow_type: &'static str,
    /// Outstanding challenge.
    pub next_step: NextStep,
    /// Where to submit the answer.
    pub links: Vec<Link>,
    /// Diagnostics from the previous attempt.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl FlowResponse {
    /// Creates a prompt response for a flow.
    #[must_use]
    pub fn prompt(flow: &Flow, next_step: NextStep, links: Vec<Link>) -> Self {
        Self {
            flow_id: flow.id,
            flow_status: flow.status,
            flow_type: FLOW_TYPE_AUTHENTICATION,
            next_step,
            links,
            messages: Vec::new(),
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Data handed back when a flow completes.
#[derive(Debug, Clone, Serialize)]
pub struct AuthData {
    /// Authorization code.
    pub code: String,
    /// Client state from the authorization request.
    pub state: String,
}

/// Response for a completed flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedResponse {
    /// Always `SUCCESS_COMPLETED`.
    pub flow_status: FlowStatus,
    /// Code and echoed state.
    pub auth_data: AuthData,
}

/// Result of an authentication attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuthnResponse {
    /// The flow completed.
    Completed(CompletedResponse),
    /// The attempt failed; the client may retry.
    Retry(FlowResponse),
}

impl AuthnResponse {
    /// Returns the flow status carried by the response.
    #[must_use]
    pub const fn flow_status(&self) -> FlowStatus {
        match self {
            Self::Completed(r) => r.flow_status,
            Self::Retry(r) => r.flow_status,
        }
    }
}

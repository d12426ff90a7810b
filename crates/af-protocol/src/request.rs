//! Request types for flow endpoints.

use std::collections::HashMap;

use af_auth::AuthParams;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};

/// Only response type accepted by `/authorize`.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Only response mode accepted by `/authorize`.
pub const RESPONSE_MODE_DIRECT: &str = "direct";

/// Authorization request that initiates a flow.
///
/// Every field is optional at the extractor level so that absent
/// parameters are reported as `ABA-40000` rather than as an extractor
/// rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiateRequest {
    /// Response type (must be `code`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,

    /// Client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Response mode (must be `direct`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mode: Option<String>,

    /// Redirect URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Scope (defaults to `openid`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Opaque client state (defaults to empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl InitiateRequest {
    /// Checks the required parameters.
    ///
    /// # Errors
    ///
    /// Returns an `ABA-40000` error naming the first offending parameter.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.response_type.as_deref() != Some(RESPONSE_TYPE_CODE) {
            return Err(ProtocolError::invalid_request("response_type must be 'code'"));
        }
        if is_blank(self.client_id.as_deref()) {
            return Err(ProtocolError::invalid_request("client_id is required"));
        }
        if self.response_mode.as_deref() != Some(RESPONSE_MODE_DIRECT) {
            return Err(ProtocolError::invalid_request("response_mode must be 'direct'"));
        }
        if is_blank(self.redirect_uri.as_deref()) {
            return Err(ProtocolError::invalid_request("redirect_uri is required"));
        }
        Ok(())
    }
}

/// Authentication request that continues a flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnRequest {
    /// Flow to continue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,

    /// Authenticator chosen by the client, with its parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_authenticator: Option<SelectedAuthenticator>,
}

impl AuthnRequest {
    /// Returns the flow id and selected authenticator.
    ///
    /// # Errors
    ///
    /// Returns an `ABA-40001` error if either id is missing or empty.
    pub fn required(&self) -> ProtocolResult<(&str, &SelectedAuthenticator)> {
        let flow_id = self
            .flow_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProtocolError::missing_authn_params("flowId is required"))?;

        let selected = self
            .selected_authenticator
            .as_ref()
            .filter(|s| !is_blank(s.authenticator_id.as_deref()))
            .ok_or_else(|| {
                ProtocolError::missing_authn_params("selectedAuthenticator.authenticatorId is required")
            })?;

        Ok((flow_id, selected))
    }
}

/// The authenticator a client picked and the values it collected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAuthenticator {
    /// Authenticator id from the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_id: Option<String>,

    /// Parameter values keyed by parameter name.
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

impl SelectedAuthenticator {
    /// Returns the authenticator id, empty if absent.
    #[must_use]
    pub fn authenticator_id(&self) -> &str {
        self.authenticator_id.as_deref().unwrap_or_default()
    }

    /// Returns the string-valued parameters.
    ///
    /// Values of any other JSON type are dropped, so they read as missing.
    #[must_use]
    pub fn string_params(&self) -> AuthParams {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
            .collect()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

//! Authenticator descriptors.
//!
//! A descriptor is the public contract of an authenticator: who it is, which
//! parameters it prompts for, and which of them must be present before a
//! verification attempt. Descriptors serialize to the exact shape clients
//! receive inside an `AUTHENTICATOR_PROMPT` step.

use std::collections::HashMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex_lite::Regex;
use serde::{Serialize, Serializer};

use crate::error::{AuthError, AuthResult};

/// Parameters submitted with a verification attempt, keyed by parameter name.
pub type AuthParams = HashMap<String, String>;

/// Type of a prompted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    /// Free text.
    String,
    /// Decimal integer (e.g. a one-time code).
    Integer,
    /// `true` / `false`.
    Boolean,
}

/// How the client is expected to collect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptType {
    /// The end user types the values.
    UserPrompt,
}

/// One prompted parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    /// Parameter name, as submitted in `selectedAuthenticator.params`.
    #[serde(rename = "param")]
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether the UI should mask the value.
    pub is_confidential: bool,
    /// Display order, starting at 1.
    pub order: u32,
    #[serde(
        rename = "validationRegex",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_regex"
    )]
    validation: Option<Regex>,
    /// Localization key for the field label.
    pub i18n_key: String,
}

fn serialize_regex<S: Serializer>(regex: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error> {
    match regex {
        Some(regex) => serializer.serialize_str(regex.as_str()),
        None => serializer.serialize_none(),
    }
}

impl ParamDescriptor {
    /// Creates a non-confidential parameter with i18n key `param.<name>`.
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: ParamType, order: u32) -> Self {
        let name = name.into();
        Self {
            i18n_key: format!("param.{name}"),
            name,
            param_type,
            is_confidential: false,
            order,
            validation: None,
        }
    }

    /// Marks the parameter as confidential.
    #[must_use]
    pub const fn confidential(mut self) -> Self {
        self.is_confidential = true;
        self
    }

    /// Attaches a validation pattern the submitted value must match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidDescriptor` if the pattern does not compile.
    pub fn with_validation(mut self, pattern: &str) -> AuthResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| AuthError::InvalidDescriptor(format!("{}: {e}", self.name)))?;
        self.validation = Some(regex);
        Ok(self)
    }

    /// Returns the validation pattern, if any.
    #[must_use]
    pub fn validation_regex(&self) -> Option<&str> {
        self.validation.as_ref().map(Regex::as_str)
    }

    /// Checks a submitted value against the validation pattern.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.validation
            .as_ref()
            .is_none_or(|regex| regex.is_match(value))
    }
}

/// Prompt metadata for an authenticator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMetadata {
    /// Localization key for the authenticator label.
    pub i18n_key: String,
    /// How values are collected.
    pub prompt_type: PromptType,
    /// Prompted parameters, sorted by `order`.
    pub params: Vec<ParamDescriptor>,
}

/// Public description of an authenticator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorDescriptor {
    /// Stable opaque identifier.
    pub authenticator_id: String,
    /// Human-facing label.
    #[serde(rename = "authenticator")]
    pub display_name: String,
    /// Identity-provider tag.
    pub idp: String,
    /// Prompt metadata.
    pub metadata: PromptMetadata,
    /// Parameters that must be present for a verification attempt.
    pub required_params: Vec<String>,
}

impl AuthenticatorDescriptor {
    /// Creates a descriptor whose id is `base64("<name>:<idp>")`.
    #[must_use]
    pub fn new(name: &str, idp: impl Into<String>, display_name: impl Into<String>) -> Self {
        let idp = idp.into();
        Self {
            authenticator_id: Self::derive_id(name, &idp),
            display_name: display_name.into(),
            metadata: PromptMetadata {
                i18n_key: format!("authenticator.{}", name.to_lowercase()),
                prompt_type: PromptType::UserPrompt,
                params: Vec::new(),
            },
            idp,
            required_params: Vec::new(),
        }
    }

    /// Derives the opaque authenticator id for a name and identity provider.
    #[must_use]
    pub fn derive_id(name: &str, idp: &str) -> String {
        STANDARD.encode(format!("{name}:{idp}"))
    }

    /// Sets the label i18n key.
    #[must_use]
    pub fn i18n_key(mut self, key: impl Into<String>) -> Self {
        self.metadata.i18n_key = key.into();
        self
    }

    /// Adds a prompted parameter.
    #[must_use]
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.metadata.params.push(param);
        self.metadata.params.sort_by_key(|p| p.order);
        self
    }

    /// Adds a prompted parameter that must be present.
    #[must_use]
    pub fn required_param(mut self, param: ParamDescriptor) -> Self {
        self.required_params.push(param.name.clone());
        self.param(param)
    }

    /// Checks submitted parameters against the contract.
    ///
    /// Every required parameter must be present and every present parameter
    /// with a validation pattern must match it.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_params(&self, params: &AuthParams) -> Result<(), ParamViolation> {
        if let Some(missing) = self
            .required_params
            .iter()
            .find(|name| !params.contains_key(name.as_str()))
        {
            return Err(ParamViolation::Missing(missing.clone()));
        }

        for param in &self.metadata.params {
            if let Some(value) = params.get(&param.name) {
                if !param.accepts(value) {
                    return Err(ParamViolation::Invalid(param.name.clone()));
                }
            }
        }

        Ok(())
    }
}

/// A parameter contract violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamViolation {
    /// A required parameter was not submitted.
    Missing(String),
    /// A parameter did not match its validation pattern.
    Invalid(String),
}

impl fmt::Display for ParamViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required parameter '{name}'"),
            Self::Invalid(name) => write!(f, "parameter '{name}' failed validation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> AuthenticatorDescriptor {
        AuthenticatorDescriptor::new("BasicAuthenticator", "LOCAL", "Username & Password")
            .i18n_key("authenticator.basic")
            .required_param(
                ParamDescriptor::new("username", ParamType::String, 1)
                    .with_validation(r"^[\S]{3,50}$")
                    .unwrap(),
            )
            .required_param(ParamDescriptor::new("password", ParamType::String, 2).confidential())
    }

    fn params(pairs: &[(&str, &str)]) -> AuthParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn id_is_base64_of_name_and_idp() {
        assert_eq!(
            AuthenticatorDescriptor::derive_id("BasicAuthenticator", "LOCAL"),
            "QmFzaWNBdXRoZW50aWNhdG9yOkxPQ0FM"
        );
    }

    #[test]
    fn serializes_to_prompt_shape() {
        let json = serde_json::to_value(descriptor()).unwrap();

        assert_eq!(json["authenticatorId"], "QmFzaWNBdXRoZW50aWNhdG9yOkxPQ0FM");
        assert_eq!(json["authenticator"], "Username & Password");
        assert_eq!(json["idp"], "LOCAL");
        assert_eq!(json["metadata"]["i18nKey"], "authenticator.basic");
        assert_eq!(json["metadata"]["promptType"], "USER_PROMPT");
        assert_eq!(json["requiredParams"], serde_json::json!(["username", "password"]));

        let username = &json["metadata"]["params"][0];
        assert_eq!(username["param"], "username");
        assert_eq!(username["type"], "STRING");
        assert_eq!(username["isConfidential"], false);
        assert_eq!(username["order"], 1);
        assert_eq!(username["validationRegex"], r"^[\S]{3,50}$");
        assert_eq!(username["i18nKey"], "param.username");

        let password = &json["metadata"]["params"][1];
        assert_eq!(password["isConfidential"], true);
        assert!(password.get("validationRegex").is_none());
    }

    #[test]
    fn params_sorted_by_order() {
        let d = AuthenticatorDescriptor::new("X", "LOCAL", "X")
            .param(ParamDescriptor::new("b", ParamType::String, 2))
            .param(ParamDescriptor::new("a", ParamType::String, 1));
        let names: Vec<_> = d.metadata.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn check_params_reports_missing() {
        let result = descriptor().check_params(&params(&[("username", "admin")]));
        assert_eq!(result, Err(ParamViolation::Missing("password".to_string())));
    }

    #[test]
    fn check_params_reports_invalid() {
        let result = descriptor().check_params(&params(&[("username", "ab"), ("password", "x")]));
        assert_eq!(result, Err(ParamViolation::Invalid("username".to_string())));

        let result =
            descriptor().check_params(&params(&[("username", "has space"), ("password", "x")]));
        assert!(result.is_err());
    }

    #[test]
    fn check_params_accepts_valid() {
        let result =
            descriptor().check_params(&params(&[("username", "admin"), ("password", "wrong")]));
        assert!(result.is_ok());
    }

    #[test]
    fn bad_pattern_rejected() {
        let result = ParamDescriptor::new("x", ParamType::String, 1).with_validation("([");
        assert!(matches!(result, Err(AuthError::InvalidDescriptor(_))));
    }
}

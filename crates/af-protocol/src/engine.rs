//! Authentication flow engine.
//!
//! The engine validates protocol input, creates and advances flows in a
//! [`FlowStore`], and dispatches credential checks to the authenticators of
//! an [`AuthenticatorRegistry`]. Validation failures never touch the store;
//! every status change goes through [`FlowStore::update`] so concurrent
//! attempts on one flow are serialized.

use std::sync::Arc;

use af_auth::{AuthParams, Authenticator, AuthenticatorRegistry};
use af_core::{ErrorKind, Event, EventType, FlowConfig};
use af_session::{Flow, FlowError, FlowStore};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ProtocolError, ProtocolResult};
use crate::request::{AuthnRequest, InitiateRequest};
use crate::response::{
    AuthData, AuthnResponse, CompletedResponse, FlowResponse, Link, Message, NextStep,
};

/// Flow orchestrator.
pub struct FlowEngine<S: FlowStore> {
    store: Arc<S>,
    registry: Arc<AuthenticatorRegistry>,
    config: FlowConfig,
}

impl<S: FlowStore> FlowEngine<S> {
    /// Creates an engine.
    #[must_use]
    pub const fn new(store: Arc<S>, registry: Arc<AuthenticatorRegistry>, config: FlowConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Returns the flow store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the authenticator registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<AuthenticatorRegistry> {
        &self.registry
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Starts a flow from an authorization request.
    ///
    /// # Errors
    ///
    /// Returns `ABA-40000` if a required parameter is missing or invalid; no
    /// flow is created in that case.
    pub async fn initiate(&self, request: &InitiateRequest) -> ProtocolResult<FlowResponse> {
        match self.try_initiate(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let mut event = Event::builder(EventType::FlowRejected)
                    .failure(err.kind.code())
                    .detail("operation", "initiate");
                if let Some(client_id) = request.client_id.as_deref() {
                    event = event.client(client_id);
                }
                event.emit();
                Err(err)
            }
        }
    }

    async fn try_initiate(&self, request: &InitiateRequest) -> ProtocolResult<FlowResponse> {
        request.validate()?;

        let mut flow = Flow::new(
            request.client_id.as_deref().unwrap_or_default(),
            request.redirect_uri.as_deref().unwrap_or_default(),
        )
        .with_lifespan(self.config.flow_lifespan());
        if let Some(scope) = request.scope.as_deref().filter(|s| !s.is_empty()) {
            flow = flow.with_scope(scope);
        }
        if let Some(state) = request.state.as_deref() {
            flow = flow.with_state(state);
        }

        let flow_id = self.store.create(flow.clone()).await?;

        tracing::info!(flow_id = %flow_id, client_id = %flow.client_id, "flow initiated");
        Event::builder(EventType::FlowInitiated)
            .success()
            .flow(flow_id)
            .client(flow.client_id.as_str())
            .detail("scope", flow.scope.as_str())
            .emit();

        Ok(FlowResponse::prompt(&flow, self.prompt(), self.links()))
    }

    /// Submits credentials for a flow.
    ///
    /// Rejected credentials are not an error: the flow moves to
    /// `FAIL_INCOMPLETE` and the response re-renders the prompt with a
    /// message carrying the attempts left.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for malformed requests, unknown or completed
    /// flows, unknown authenticators, exhausted flows, and verification
    /// failures that yield no verdict.
    pub async fn authenticate(&self, request: &AuthnRequest) -> ProtocolResult<AuthnResponse> {
        match self.try_authenticate(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let mut event = Event::builder(EventType::FlowRejected)
                    .failure(err.kind.code())
                    .detail("operation", "authenticate");
                let flow_id = request.flow_id.as_deref().and_then(|id| Uuid::parse_str(id).ok());
                if let Some(flow_id) = flow_id {
                    event = event.flow(flow_id);
                }
                if let Some(selected) = &request.selected_authenticator {
                    event = event.authenticator(selected.authenticator_id());
                }
                event.emit();
                Err(err)
            }
        }
    }

    async fn try_authenticate(&self, request: &AuthnRequest) -> ProtocolResult<AuthnResponse> {
        let (flow_id, selected) = request.required()?;
        let flow_id = Uuid::parse_str(flow_id)
            .map_err(|_| ProtocolError::unknown_flow(format!("malformed flow id '{flow_id}'")))?;

        let flow = self
            .store
            .get(flow_id)
            .await?
            .ok_or_else(|| ProtocolError::unknown_flow(format!("flow {flow_id} not found")))?;

        if flow.is_completed() {
            return Err(ProtocolError::new(
                ErrorKind::FlowCompleted,
                format!("flow {flow_id} already completed"),
            ));
        }

        let authenticator_id = selected.authenticator_id();
        let authenticator = self.registry.resolve(authenticator_id).ok_or_else(|| {
            ProtocolError::unsupported_authenticator(format!(
                "authenticator '{authenticator_id}' is not registered"
            ))
        })?;

        if flow.is_exhausted(self.config.max_attempts) {
            return Err(ProtocolError::new(
                ErrorKind::AttemptsExhausted,
                format!("flow {flow_id} used {} attempts", flow.failed_attempts),
            ));
        }

        if self.verify(flow_id, authenticator.as_ref(), selected.string_params()).await? {
            self.complete(flow_id, authenticator_id).await
        } else {
            self.fail(flow_id, authenticator.as_ref()).await
        }
    }

    async fn verify(
        &self,
        flow_id: Uuid,
        authenticator: &dyn Authenticator,
        params: AuthParams,
    ) -> ProtocolResult<bool> {
        if let Err(violation) = authenticator.describe().check_params(&params) {
            tracing::debug!(flow_id = %flow_id, %violation, "parameters rejected before verification");
            return Ok(false);
        }

        let timeout = self.config.verify_timeout();
        match tokio::time::timeout(timeout, authenticator.verify(&params)).await {
            Ok(Ok(verified)) => Ok(verified),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(ProtocolError::new(
                ErrorKind::AuthenticatorUnavailable,
                format!(
                    "authenticator '{}' did not answer within {timeout:?}",
                    authenticator.id()
                ),
            )),
        }
    }

    async fn complete(&self, flow_id: Uuid, authenticator_id: &str) -> ProtocolResult<AuthnResponse> {
        let code = af_crypto::generate_auth_code();
        let max_attempts = self.config.max_attempts;
        let flow = self
            .store
            .update(flow_id, move |flow| {
                // Concurrent failures may have used up the flow while this
                // attempt was verifying.
                if !flow.is_completed() && flow.is_exhausted(max_attempts) {
                    return Err(FlowError::AttemptsExhausted(flow.id));
                }
                flow.complete(code)
            })
            .await?;

        let code = flow
            .auth_code
            .clone()
            .ok_or_else(|| ProtocolError::server_error(format!("flow {flow_id} completed without a code")))?;

        tracing::info!(flow_id = %flow_id, "flow completed");
        Event::builder(EventType::Login)
            .success()
            .flow(flow_id)
            .client(flow.client_id.as_str())
            .authenticator(authenticator_id)
            .emit();

        Ok(AuthnResponse::Completed(CompletedResponse {
            flow_status: flow.status,
            auth_data: AuthData {
                code,
                state: flow.state,
            },
        }))
    }

    async fn fail(&self, flow_id: Uuid, authenticator: &dyn Authenticator) -> ProtocolResult<AuthnResponse> {
        let max_attempts = self.config.max_attempts;
        let flow = self
            .store
            .update(flow_id, move |flow| flow.record_failure(max_attempts).map(|_| ()))
            .await?;
        let remaining = flow.remaining_attempts(max_attempts);

        tracing::info!(flow_id = %flow_id, remaining_attempts = remaining, "authentication failed");
        Event::builder(EventType::LoginError)
            .failure(authenticator.failure_message().message_id)
            .flow(flow_id)
            .client(flow.client_id.as_str())
            .authenticator(authenticator.id())
            .detail("remaining_attempts", remaining.to_string())
            .emit();

        let message = Message::failed_attempt(authenticator.failure_message(), remaining);
        Ok(AuthnResponse::Retry(
            FlowResponse::prompt(&flow, self.prompt(), self.links()).with_message(message),
        ))
    }

    /// Evicts flows that expired by now.
    ///
    /// # Errors
    ///
    /// Returns `ABA-50000` if the store fails.
    pub async fn sweep_expired(&self) -> ProtocolResult<u64> {
        let removed = self.store.sweep_expired(Utc::now()).await?;
        if removed > 0 {
            Event::builder(EventType::FlowExpired)
                .success()
                .detail("removed", removed.to_string())
                .emit();
        }
        Ok(removed)
    }

    fn prompt(&self) -> NextStep {
        NextStep::prompt(self.registry.descriptors())
    }

    fn links(&self) -> Vec<Link> {
        vec![Link::authentication(self.config.authn_path.as_str())]
    }
}

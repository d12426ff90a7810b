//! Flow store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::FlowResult;
use crate::flow::Flow;

/// Storage for flow records.
///
/// Implementations may keep flows in process memory or in a shared cache.
/// Expired flows must never be returned: they read as absent and are evicted
/// on access or by [`FlowStore::sweep_expired`].
#[async_trait]
pub trait FlowStore: Send + Sync {
    /// Stores a new flow and returns its id.
    ///
    /// Fails with `FlowError::Duplicate` if the id is already live.
    async fn create(&self, flow: Flow) -> FlowResult<Uuid>;

    /// Gets a flow by id.
    async fn get(&self, flow_id: Uuid) -> FlowResult<Option<Flow>>;

    /// Applies `mutation` to a flow and returns the committed record.
    ///
    /// The mutation runs on a copy while the key is held exclusively and is
    /// committed only if it returns `Ok`. Concurrent updates of the same
    /// flow are serialized.
    ///
    /// Fails with `FlowError::NotFound` if the flow is absent or expired.
    async fn update<F>(&self, flow_id: Uuid, mutation: F) -> FlowResult<Flow>
    where
        F: FnOnce(&mut Flow) -> FlowResult<()> + Send;

    /// Removes flows expired at `now`.
    ///
    /// Returns the number of flows removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> FlowResult<u64>;

    /// Counts stored flows.
    async fn count(&self) -> FlowResult<usize>;
}

//! In-memory flow store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::error::{FlowError, FlowResult};
use crate::flow::Flow;
use crate::store::FlowStore;

/// Flow store backed by a sharded concurrent map.
///
/// Updates of one key hold only that key's shard, so flows never contend on
/// a global lock.
#[derive(Debug, Default)]
pub struct InMemoryFlowStore {
    flows: DashMap<Uuid, Flow>,
}

impl InMemoryFlowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn evict_if_expired(&self, flow_id: Uuid, now: DateTime<Utc>) {
        if self
            .flows
            .remove_if(&flow_id, |_, flow| flow.is_expired_at(now))
            .is_some()
        {
            tracing::debug!(flow_id = %flow_id, "evicted expired flow");
        }
    }
}

#[async_trait]
impl FlowStore for InMemoryFlowStore {
    async fn create(&self, flow: Flow) -> FlowResult<Uuid> {
        let id = flow.id;
        match self.flows.entry(id) {
            Entry::Occupied(_) => Err(FlowError::Duplicate(id)),
            Entry::Vacant(slot) => {
                slot.insert(flow);
                Ok(id)
            }
        }
    }

    async fn get(&self, flow_id: Uuid) -> FlowResult<Option<Flow>> {
        let now = Utc::now();
        match self.flows.get(&flow_id) {
            None => return Ok(None),
            Some(flow) if !flow.is_expired_at(now) => return Ok(Some(flow.clone())),
            Some(_) => {}
        }

        // The shard guard is released here; removing under it would deadlock.
        self.evict_if_expired(flow_id, now);
        Ok(None)
    }

    async fn update<F>(&self, flow_id: Uuid, mutation: F) -> FlowResult<Flow>
    where
        F: FnOnce(&mut Flow) -> FlowResult<()> + Send,
    {
        let now = Utc::now();
        let Some(mut entry) = self.flows.get_mut(&flow_id) else {
            return Err(FlowError::NotFound(flow_id));
        };

        if entry.is_expired_at(now) {
            drop(entry);
            self.evict_if_expired(flow_id, now);
            return Err(FlowError::NotFound(flow_id));
        }

        let mut scratch = entry.clone();
        mutation(&mut scratch)?;
        *entry = scratch;
        Ok(entry.clone())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> FlowResult<u64> {
        let mut removed = 0;
        self.flows.retain(|_, flow| {
            let keep = !flow.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn count(&self) -> FlowResult<usize> {
        Ok(self.flows.len())
    }
}

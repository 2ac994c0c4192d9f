use std::sync::{Arc, OnceLock};

use crate::error::GraphError;
use crate::events::{Event, EventBus};
use crate::transfer::TransferExecutor;
use crate::types::{ObjectKind, Param, TransferKind, TransferResponse};

/// State shared by every remote-backed entity: its remote id, its own event
/// bus, and the executor used to talk to the API.
///
/// The remote id goes from unset to set at most once and is never cleared.
pub struct GraphObject {
    remote_id: OnceLock<String>,
    events: EventBus,
    executor: Arc<TransferExecutor>,
}

impl GraphObject {
    pub(crate) fn new(executor: Arc<TransferExecutor>, remote_id: Option<String>) -> Self {
        let cell = OnceLock::new();
        if let Some(id) = remote_id {
            let _ = cell.set(id);
        }
        Self {
            remote_id: cell,
            events: EventBus::new(),
            executor,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.get().map(String::as_str)
    }

    pub fn is_created(&self) -> bool {
        self.remote_id.get().is_some()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the remote id, or `NotCreated` naming the refused operation.
    pub(crate) fn require_created(&self, operation: &'static str) -> Result<&str, GraphError> {
        self.remote_id().ok_or(GraphError::NotCreated { operation })
    }

    /// Record the id assigned by the server. Returns `false` and keeps the
    /// existing id if one was already recorded.
    pub(crate) fn set_remote_id(&self, id: String) -> bool {
        match self.remote_id.set(id) {
            Ok(()) => true,
            Err(rejected) => {
                log::warn!(
                    "[graph_object] already created as {:?}, ignoring new id {}",
                    self.remote_id(),
                    rejected
                );
                false
            }
        }
    }

    pub(crate) fn emit(&self, event: Event) {
        self.events.emit(&event);
    }

    pub(crate) async fn http_call(
        &self,
        url: &str,
        params: Vec<Param>,
        kind: TransferKind,
        object: ObjectKind,
    ) -> TransferResponse {
        self.executor
            .execute(url, params, kind, object, &self.events)
            .await
    }
}

use std::sync::Arc;

use crate::account::AccountProvider;
use crate::config::GraphConfig;
use crate::dispatch::LoopHandle;
use crate::error::GraphError;
use crate::graph::photo::Photo;
use crate::transfer::TransferExecutor;

/// Entry point: binds configuration, credentials and an event loop, and hands
/// out graph objects that share them.
#[derive(Clone)]
pub struct Graph {
    executor: Arc<TransferExecutor>,
    config: Arc<GraphConfig>,
    scheduler: LoopHandle,
}

impl Graph {
    pub fn new(
        config: GraphConfig,
        account: Arc<dyn AccountProvider>,
        scheduler: LoopHandle,
    ) -> Result<Self, GraphError> {
        let executor = TransferExecutor::new(&config, account)?;
        Ok(Self {
            executor: Arc::new(executor),
            config: Arc::new(config),
            scheduler,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub(crate) fn executor(&self) -> &Arc<TransferExecutor> {
        &self.executor
    }

    pub(crate) fn scheduler(&self) -> &LoopHandle {
        &self.scheduler
    }

    /// A photo that does not exist remotely yet; call `create` on it.
    pub fn photo(&self) -> Photo {
        Photo::new(self.clone(), None)
    }

    /// A handle on a photo that already exists with the given id.
    pub fn photo_with_id(&self, id: impl Into<String>) -> Photo {
        Photo::new(self.clone(), Some(id.into()))
    }
}

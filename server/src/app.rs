use std::sync::Arc;

use image_processor::Dispatcher;
use tokio::sync::Semaphore;

use crate::config::AppConfig;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: AppConfig,
    /// Bounds how many merges run codec work at once
    merge_slots: Arc<Semaphore>,
    /// Default execution context policy and canvas limits
    dispatcher: Dispatcher,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Self {
        let merge_slots = Arc::new(Semaphore::new(config.merge_concurrency.max(1)));
        let dispatcher = Dispatcher::new(config.canvas_limits(), config.merge_context);

        Self {
            inner: Arc::new(SharedStateInner {
                config,
                merge_slots,
                dispatcher,
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn merge_slots(&self) -> Arc<Semaphore> {
        Arc::clone(&self.inner.merge_slots)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.inner.dispatcher
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::services::ContactService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    service: Arc<dyn ContactService>,
    metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config, service: Arc<dyn ContactService>, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                service,
                metrics,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn service(&self) -> &dyn ContactService {
        self.inner.service.as_ref()
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }
}

use std::sync::Arc;

use crate::calculate::InsightPolicy;
use crate::config::AppConfig;
use crate::storage::{MatchSet, MatchStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<tokio::sync::RwLock<MatchStore>>,
    pub config: Arc<AppConfig>,
    pub policy: Arc<InsightPolicy>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = MatchStore::new(config.data_file.clone(), config.analysis.field_size);
        Self {
            store: Arc::new(tokio::sync::RwLock::new(store)),
            config: Arc::new(config),
            policy: Arc::new(InsightPolicy::default()),
        }
    }

    /// Current history, reloaded if the file changed since the last request.
    pub async fn matches(&self) -> Arc<MatchSet> {
        self.store.write().await.load()
    }
}

//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::{DraftStore, ObjectStorage};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub storage: Arc<dyn ObjectStorage>,
    pub drafts: DraftStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            pool,
            config,
            storage,
            drafts: DraftStore::new(),
        }
    }

    /// Tarea en segundo plano que elimina borradores inactivos
    pub fn spawn_draft_purge(&self) -> tokio::task::JoinHandle<()> {
        let drafts = self.drafts.clone();
        let ttl = chrono::Duration::minutes(self.config.draft_ttl_minutes);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                drafts.purge_stale(ttl).await;
            }
        })
    }
}

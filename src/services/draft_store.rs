//! Borradores del asistente en memoria
//!
//! Los borradores no se persisten. Cada uno pertenece al usuario que lo creó;
//! un id ajeno se trata como inexistente.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::services::wizard::OperationDraft;

#[derive(Clone, Default)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<Uuid, OperationDraft>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, draft: OperationDraft) -> OperationDraft {
        let mut drafts = self.drafts.write().await;
        debug!("📝 Borrador {} creado por {}", draft.id, draft.operator.user_id);
        drafts.insert(draft.id, draft.clone());
        draft
    }

    /// Copia del borrador si pertenece a `owner`
    pub async fn get(&self, id: Uuid, owner: Uuid) -> Option<OperationDraft> {
        let drafts = self.drafts.read().await;
        drafts
            .get(&id)
            .filter(|d| d.operator.user_id == owner)
            .cloned()
    }

    /// Aplica `f` sobre el borrador bajo el lock de escritura.
    /// `None` cuando no existe o es de otro usuario.
    pub async fn update<T, F>(&self, id: Uuid, owner: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut OperationDraft) -> T,
    {
        let mut drafts = self.drafts.write().await;
        drafts
            .get_mut(&id)
            .filter(|d| d.operator.user_id == owner)
            .map(f)
    }

    /// Sustituye el borrador completo (tras un envío preparado fuera del lock)
    pub async fn replace(&self, draft: OperationDraft) {
        let mut drafts = self.drafts.write().await;
        drafts.insert(draft.id, draft);
    }

    pub async fn remove(&self, id: Uuid, owner: Uuid) -> Option<OperationDraft> {
        let mut drafts = self.drafts.write().await;
        let owned = drafts
            .get(&id)
            .map(|d| d.operator.user_id == owner)
            .unwrap_or(false);
        if owned {
            drafts.remove(&id)
        } else {
            None
        }
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    /// Elimina los borradores sin actividad durante `ttl`
    pub async fn purge_stale(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, d| d.updated_at > cutoff);
        let purged = before - drafts.len();
        if purged > 0 {
            info!("🧹 {} borradores caducados eliminados", purged);
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::services::wizard::Operator;

    fn draft_for(user_id: Uuid) -> OperationDraft {
        OperationDraft::new(Operator {
            user_id,
            company_id: Uuid::new_v4(),
            role: Role::Admin,
            driver_id: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_drafts_are_owned() {
        let store = DraftStore::new();
        let owner = Uuid::new_v4();
        let draft = store.insert(draft_for(owner)).await;

        assert!(store.get(draft.id, owner).await.is_some());
        assert!(store.get(draft.id, Uuid::new_v4()).await.is_none());
        assert!(store.update(draft.id, Uuid::new_v4(), |_| ()).await.is_none());
        assert!(store.remove(draft.id, Uuid::new_v4()).await.is_none());
        assert_eq!(store.len().await, 1);

        assert!(store.remove(draft.id, owner).await.is_some());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let store = DraftStore::new();
        let owner = Uuid::new_v4();
        let draft = store.insert(draft_for(owner)).await;

        let result = store
            .update(draft.id, owner, |d| d.back())
            .await
            .unwrap();
        assert!(result.is_err());
        let stored = store.get(draft.id, owner).await.unwrap();
        assert_eq!(stored.step(), draft.step());
    }

    #[tokio::test]
    async fn test_purge_stale() {
        let store = DraftStore::new();
        let owner = Uuid::new_v4();
        let mut old = draft_for(owner);
        old.updated_at = Utc::now() - Duration::minutes(300);
        store.insert(old).await;
        store.insert(draft_for(owner)).await;

        assert_eq!(store.purge_stale(Duration::minutes(240)).await, 1);
        assert_eq!(store.len().await, 1);
    }
}

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::store_dto::{CreateStoreRequest, StoreListQuery, UpdateStoreRequest};
use crate::dto::ApiResponse;
use crate::models::store::Store;
use crate::repositories::StoreRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct StoreController {
    repository: StoreRepository,
}

impl StoreController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StoreRepository::new(pool),
        }
    }

    pub async fn list(&self, company_id: Uuid, query: StoreListQuery) -> Result<Vec<Store>, AppError> {
        self.repository
            .list(
                company_id,
                query.active_only.unwrap_or(false),
                query.search.as_deref(),
            )
            .await
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Store, AppError> {
        self.repository
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| not_found_error("Store", &id.to_string()))
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateStoreRequest,
    ) -> Result<ApiResponse<Store>, AppError> {
        request.validate()?;
        let store = self.repository.create(company_id, request).await?;
        info!("🏪 Tienda {} creada en empresa {}", store.id, company_id);
        Ok(ApiResponse::success_with_message(
            store,
            "Tienda creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateStoreRequest,
    ) -> Result<ApiResponse<Store>, AppError> {
        request.validate()?;
        let store = self.repository.update(id, company_id, request).await?;
        Ok(ApiResponse::success_with_message(
            store,
            "Tienda actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id, company_id).await?;
        info!("🗑️ Tienda {} eliminada", id);
        Ok(ApiResponse::message_only("Tienda eliminada exitosamente".to_string()))
    }

    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<Store>, AppError> {
        let store = self.repository.toggle_active(id, company_id).await?;
        let message = if store.active {
            "Tienda activada"
        } else {
            "Tienda desactivada"
        };
        Ok(ApiResponse::success_with_message(store, message.to_string()))
    }
}

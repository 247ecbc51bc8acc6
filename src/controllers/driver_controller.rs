use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{CreateDriverRequest, DriverListQuery, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::models::driver::Driver;
use crate::repositories::DriverRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool),
        }
    }

    pub async fn list(&self, company_id: Uuid, query: DriverListQuery) -> Result<Vec<Driver>, AppError> {
        self.repository
            .list(company_id, query.active_only.unwrap_or(false))
            .await
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Driver, AppError> {
        self.repository
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateDriverRequest,
    ) -> Result<ApiResponse<Driver>, AppError> {
        request.validate()?;
        let driver = self.repository.create(company_id, request).await?;
        info!("🚚 Conductor {} creado en empresa {}", driver.id, company_id);
        Ok(ApiResponse::success_with_message(
            driver,
            "Conductor creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<ApiResponse<Driver>, AppError> {
        request.validate()?;
        let driver = self.repository.update(id, company_id, request).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id, company_id).await?;
        info!("🗑️ Conductor {} eliminado", id);
        Ok(ApiResponse::message_only("Conductor eliminado exitosamente".to_string()))
    }

    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<Driver>, AppError> {
        let driver = self.repository.toggle_active(id, company_id).await?;
        let message = if driver.active {
            "Conductor activado"
        } else {
            "Conductor desactivado"
        };
        Ok(ApiResponse::success_with_message(driver, message.to_string()))
    }
}

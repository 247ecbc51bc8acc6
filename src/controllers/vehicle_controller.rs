use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::vehicle::Vehicle;
use crate::repositories::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::normalize_plate;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;
        let plate = normalize_plate(&request.plate);

        // Verificar que la matrícula no exista para esta empresa
        if self.repository.plate_exists(&plate, company_id, None).await? {
            return Err(conflict_error("Vehicle", "plate", &plate));
        }

        let vehicle = self
            .repository
            .create(company_id, plate, request.description)
            .await?;
        info!("🚛 Vehículo {} ({}) creado", vehicle.id, vehicle.plate);

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.repository.find_by_company(company_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;
        let plate = request.plate.as_deref().map(normalize_plate);

        if let Some(plate) = &plate {
            if self.repository.plate_exists(plate, company_id, Some(id)).await? {
                return Err(conflict_error("Vehicle", "plate", plate));
            }
        }

        let vehicle = self
            .repository
            .update(id, company_id, plate, request.description)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self.repository.toggle_active(id, company_id).await?;
        let message = if vehicle.active {
            "Vehículo activado"
        } else {
            "Vehículo desactivado"
        };
        Ok(ApiResponse::success_with_message(vehicle, message.to_string()))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(id, company_id).await?;
        Ok(ApiResponse::message_only("Vehículo eliminado exitosamente".to_string()))
    }
}

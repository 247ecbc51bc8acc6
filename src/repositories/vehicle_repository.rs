use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_optional;

const VEHICLE_COLUMNS: &str = "id, company_id, plate, description, active, created_at";

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `plate` ya normalizada
    pub async fn create(
        &self,
        company_id: Uuid,
        plate: String,
        description: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (id, company_id, plate, description, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(plate)
        .bind(normalize_optional(description))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1 AND company_id = $2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE company_id = $1 ORDER BY plate"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// ¿Existe la matrícula en la empresa? `exclude` ignora el propio vehículo al editar
    pub async fn plate_exists(
        &self,
        plate: &str,
        company_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE plate = $1 AND company_id = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(plate)
        .bind(company_id)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        plate: Option<String>,
        description: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
            SET plate = $3, description = $4
            WHERE id = $1 AND company_id = $2
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .bind(plate.unwrap_or(current.plate))
        .bind(match description {
            Some(value) => normalize_optional(Some(value)),
            None => current.description,
        })
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Solo invierte `active`
    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles SET active = NOT active
            WHERE id = $1 AND company_id = $2
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }
        Ok(())
    }
}

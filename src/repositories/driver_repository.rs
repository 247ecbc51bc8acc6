use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::models::driver::Driver;
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_optional;

const DRIVER_COLUMNS: &str =
    "id, company_id, user_id, name, license_number, phone, active, created_at";

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, company_id: Uuid, active_only: bool) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(&format!(
            r#"
            SELECT {DRIVER_COLUMNS} FROM drivers
            WHERE company_id = $1 AND ($2 = FALSE OR active)
            ORDER BY name
            "#
        ))
        .bind(company_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE id = $1 AND company_id = $2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_active(&self, id: Uuid, company_id: Uuid) -> Result<Option<Driver>, AppError> {
        Ok(self
            .find_by_id(id, company_id)
            .await?
            .filter(|driver| driver.active))
    }

    /// Perfil de conductor vinculado al usuario autenticado
    pub async fn find_by_user(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE user_id = $1 AND company_id = $2"
        ))
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn create(&self, company_id: Uuid, request: CreateDriverRequest) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            r#"
            INSERT INTO drivers (id, company_id, user_id, name, license_number, phone, active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING {DRIVER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(request.user_id)
        .bind(request.name.trim())
        .bind(normalize_optional(request.license_number))
        .bind(normalize_optional(request.phone))
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<Driver, AppError> {
        let current = self
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        let driver = sqlx::query_as::<_, Driver>(&format!(
            r#"
            UPDATE drivers
            SET user_id = $3, name = $4, license_number = $5, phone = $6
            WHERE id = $1 AND company_id = $2
            RETURNING {DRIVER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .bind(request.user_id.or(current.user_id))
        .bind(request.name.map(|n| n.trim().to_string()).unwrap_or(current.name))
        .bind(match request.license_number {
            Some(value) => normalize_optional(Some(value)),
            None => current.license_number,
        })
        .bind(match request.phone {
            Some(value) => normalize_optional(Some(value)),
            None => current.phone,
        })
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Driver not found".to_string()));
        }
        Ok(())
    }

    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<Driver, AppError> {
        sqlx::query_as::<_, Driver>(&format!(
            r#"
            UPDATE drivers SET active = NOT active
            WHERE id = $1 AND company_id = $2
            RETURNING {DRIVER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    pub async fn count_active(&self, company_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM drivers WHERE company_id = $1 AND active")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

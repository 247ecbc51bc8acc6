use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::store_dto::{CreateStoreRequest, UpdateStoreRequest};
use crate::models::store::Store;
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_optional;

const STORE_COLUMNS: &str = "id, company_id, name, address, default_price, active, created_at";

pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tiendas de la empresa ordenadas por nombre
    pub async fn list(
        &self,
        company_id: Uuid,
        active_only: bool,
        search: Option<&str>,
    ) -> Result<Vec<Store>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let stores = sqlx::query_as::<_, Store>(&format!(
            r#"
            SELECT {STORE_COLUMNS} FROM stores
            WHERE company_id = $1
              AND ($2 = FALSE OR active)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')
            ORDER BY name
            "#
        ))
        .bind(company_id)
        .bind(active_only)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1 AND company_id = $2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Tienda activa de la empresa (selección en el asistente)
    pub async fn find_active(&self, id: Uuid, company_id: Uuid) -> Result<Option<Store>, AppError> {
        Ok(self
            .find_by_id(id, company_id)
            .await?
            .filter(|store| store.active))
    }

    pub async fn create(&self, company_id: Uuid, request: CreateStoreRequest) -> Result<Store, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO stores (id, company_id, name, address, default_price, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(request.name.trim())
        .bind(normalize_optional(request.address))
        .bind(request.default_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateStoreRequest,
    ) -> Result<Store, AppError> {
        let current = self
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET name = $3, address = $4, default_price = $5
            WHERE id = $1 AND company_id = $2
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .bind(request.name.map(|n| n.trim().to_string()).unwrap_or(current.name))
        .bind(match request.address {
            Some(address) => normalize_optional(Some(address)),
            None => current.address,
        })
        .bind(request.default_price.or(current.default_price))
        .fetch_one(&self.pool)
        .await?;

        Ok(store)
    }

    /// Falla con violación de FK (409) si la tienda tiene registros
    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Store not found".to_string()));
        }
        Ok(())
    }

    pub async fn toggle_active(&self, id: Uuid, company_id: Uuid) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores SET active = NOT active
            WHERE id = $1 AND company_id = $2
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }

    pub async fn count_active(&self, company_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stores WHERE company_id = $1 AND active")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

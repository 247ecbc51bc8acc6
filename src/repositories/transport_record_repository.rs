//! Acceso a `transport_records`
//!
//! Los registros solo se insertan y se leen. El número secuencial lo asigna el
//! trigger de la base de datos al insertar.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::record_dto::ReportFilters;
use crate::models::dashboard::MonthAggregate;
use crate::models::transport_record::{NewTransportRecord, RecordDetail, TransportRecord};
use crate::utils::errors::AppError;

/// Límite del historial
pub const HISTORY_LIMIT: i64 = 100;
/// Registros recientes del dashboard
pub const RECENT_LIMIT: i64 = 5;

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.company_id, r.sequence_number, r.kind, r.volume_type, r.quantity,
           r.unit_price, r.total_value, r.final_value, r.latitude, r.longitude,
           r.fingerprint, r.status, r.created_at,
           r.store_id, s.name AS store_name, s.address AS store_address,
           r.driver_id, d.name AS driver_name
    FROM transport_records r
    LEFT JOIN stores s ON s.id = r.store_id
    LEFT JOIN drivers d ON d.id = r.driver_id
"#;

/// Escritura de registros, separada para poder sustituirla en pruebas
#[async_trait]
pub trait TransportRecordStore: Send + Sync {
    async fn insert(&self, record: &NewTransportRecord) -> Result<TransportRecord, sqlx::Error>;
}

#[derive(Clone)]
pub struct TransportRecordRepository {
    pool: PgPool,
}

impl TransportRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hasta dos coincidencias por número secuencial, en todas las empresas.
    /// La página de validación solo considera válido un resultado único.
    pub async fn find_by_sequence(&self, sequence_number: i64) -> Result<Vec<RecordDetail>, AppError> {
        let records = sqlx::query_as::<_, RecordDetail>(&format!(
            "{DETAIL_SELECT} WHERE r.sequence_number = $1 LIMIT 2"
        ))
        .bind(sequence_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Más recientes primero; `driver_id` restringe a los registros de un conductor
    pub async fn list_history(
        &self,
        company_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Vec<RecordDetail>, AppError> {
        self.list_recent(company_id, driver_id, HISTORY_LIMIT).await
    }

    pub async fn list_recent(
        &self,
        company_id: Uuid,
        driver_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<RecordDetail>, AppError> {
        let records = sqlx::query_as::<_, RecordDetail>(&format!(
            r#"{DETAIL_SELECT}
            WHERE r.company_id = $1 AND ($2::uuid IS NULL OR r.driver_id = $2)
            ORDER BY r.created_at DESC
            LIMIT $3"#
        ))
        .bind(company_id)
        .bind(driver_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_report(
        &self,
        company_id: Uuid,
        driver_id: Option<Uuid>,
        filters: &ReportFilters,
    ) -> Result<Vec<RecordDetail>, AppError> {
        let records = sqlx::query_as::<_, RecordDetail>(&format!(
            r#"{DETAIL_SELECT}
            WHERE r.company_id = $1
              AND ($2::uuid IS NULL OR r.driver_id = $2)
              AND ($3::text IS NULL OR r.kind = $3)
              AND ($4::timestamptz IS NULL OR r.created_at >= $4)
              AND ($5::timestamptz IS NULL OR r.created_at < $5)
            ORDER BY r.created_at DESC"#
        ))
        .bind(company_id)
        .bind(driver_id)
        .bind(filters.kind.map(|k| k.as_str()))
        .bind(filters.from)
        .bind(filters.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Ingresos y operaciones finalizadas desde `since`
    pub async fn month_aggregate(
        &self,
        company_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<MonthAggregate, AppError> {
        let aggregate = sqlx::query_as::<_, MonthAggregate>(
            r#"
            SELECT COALESCE(SUM(final_value), 0) AS revenue, COUNT(*) AS operations
            FROM transport_records
            WHERE company_id = $1 AND status = 'finalized' AND created_at >= $2
            "#,
        )
        .bind(company_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(aggregate)
    }
}

#[async_trait]
impl TransportRecordStore for TransportRecordRepository {
    async fn insert(&self, record: &NewTransportRecord) -> Result<TransportRecord, sqlx::Error> {
        sqlx::query_as::<_, TransportRecord>(
            r#"
            INSERT INTO transport_records (
                id, company_id, store_id, driver_id, sequence_number, kind, volume_type,
                quantity, unit_price, total_value, final_value, latitude, longitude,
                driver_signature_path, responsible_signature_path, cargo_photo_path,
                fingerprint, status, notes
            )
            VALUES ($1, $2, $3, $4, 0, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.company_id)
        .bind(record.store_id)
        .bind(record.driver_id)
        .bind(record.kind.as_str())
        .bind(&record.volume_type)
        .bind(record.quantity)
        .bind(record.unit_price)
        .bind(record.totals.total_value)
        .bind(record.totals.final_value)
        .bind(record.location.map(|c| c.latitude))
        .bind(record.location.map(|c| c.longitude))
        .bind(&record.driver_signature_path)
        .bind(&record.responsible_signature_path)
        .bind(&record.cargo_photo_path)
        .bind(&record.fingerprint)
        .bind(record.status.as_str())
        .bind(&record.notes)
        .fetch_one(&self.pool)
        .await
    }
}

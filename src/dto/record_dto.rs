//! DTOs de lectura de registros: historial, informes y validación pública

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::transport_record::{format_money, OperationKind, RecordDetail};
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub id: Uuid,
    pub sequence_number: i64,
    pub kind: String,
    pub store_name: Option<String>,
    pub driver_name: Option<String>,
    pub quantity: i32,
    pub final_value: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&RecordDetail> for RecordSummary {
    fn from(record: &RecordDetail) -> Self {
        Self {
            id: record.id,
            sequence_number: record.sequence_number,
            kind: record.kind.clone(),
            store_name: record.store_name.clone(),
            driver_name: record.driver_name.clone(),
            quantity: record.quantity,
            final_value: format_money(record.final_value),
            status: record.status.clone(),
            created_at: record.created_at,
        }
    }
}

/// Datos mostrados en la página pública de validación
#[derive(Debug, Serialize)]
pub struct ValidatedRecord {
    pub sequence_number: i64,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub driver_name: Option<String>,
    pub kind: String,
    pub final_value: String,
    pub created_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ValidatedRecord>,
}

impl ValidationResponse {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            record: None,
        }
    }

    pub fn valid(record: &RecordDetail) -> Self {
        Self {
            valid: true,
            record: Some(ValidatedRecord {
                sequence_number: record.sequence_number,
                store_name: record.store_name.clone(),
                store_address: record.store_address.clone(),
                driver_name: record.driver_name.clone(),
                kind: record.kind.clone(),
                final_value: format_money(record.final_value),
                created_at: record.created_at,
                latitude: record.latitude,
                longitude: record.longitude,
                fingerprint: record.fingerprint.clone(),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub search: Option<String>,
}

/// Query del informe: `kind` vacío o ausente significa todos los tipos
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub kind: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Filtros ya resueltos; el rango es `[from, to)` en UTC
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilters {
    pub kind: Option<OperationKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TryFrom<ReportQuery> for ReportFilters {
    type Error = AppError;

    fn try_from(query: ReportQuery) -> Result<Self, Self::Error> {
        let kind = match query.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(OperationKind::from_str(value).ok_or_else(|| {
                AppError::BadRequest(format!("Tipo de operación desconocido: {}", value))
            })?),
        };

        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "La fecha inicial es posterior a la final".to_string(),
                ));
            }
        }

        // `to` es inclusivo: se cubre el día completo
        let from = query.from.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let to = query
            .to
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());

        Ok(Self { kind, from, to })
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub count: usize,
    pub total_value: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub summary: ReportSummary,
    pub records: Vec<RecordSummary>,
}

impl ReportResponse {
    pub fn from_records(records: &[RecordDetail]) -> Self {
        let total: Decimal = records.iter().map(|r| r.final_value).sum();
        Self {
            summary: ReportSummary {
                count: records.len(),
                total_value: format_money(total),
            },
            records: records.iter().map(RecordSummary::from).collect(),
        }
    }
}

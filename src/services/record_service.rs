//! Lectura de registros: validación pública, historial, informes y dashboard

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::dto::record_dto::{RecordSummary, ReportFilters, ReportResponse, ValidationResponse};
use crate::models::dashboard::DashboardStats;
use crate::models::transport_record::{format_money, RecordDetail};
use crate::repositories::transport_record_repository::RECENT_LIMIT;
use crate::repositories::{DriverRepository, StoreRepository, TransportRecordRepository};
use crate::utils::errors::AppResult;

/// Número secuencial de la URL pública; solo dígitos
pub fn parse_sequence(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Un registro es válido solo si la búsqueda devuelve exactamente una fila
pub fn validation_outcome(matches: &[RecordDetail]) -> ValidationResponse {
    match matches {
        [record] => ValidationResponse::valid(record),
        _ => ValidationResponse::invalid(),
    }
}

pub async fn validate_sequence(
    records: &TransportRecordRepository,
    raw: &str,
) -> AppResult<ValidationResponse> {
    let Some(sequence_number) = parse_sequence(raw) else {
        debug!("🔎 Número de validación no numérico: {:?}", raw);
        return Ok(ValidationResponse::invalid());
    };
    let matches = records.find_by_sequence(sequence_number).await?;
    debug!("🔎 Validación #{}: {} coincidencias", sequence_number, matches.len());
    Ok(validation_outcome(&matches))
}

/// Filtro de texto libre sobre el historial ya cargado
pub fn filter_history(records: &[RecordDetail], search: Option<&str>) -> Vec<RecordSummary> {
    let search = search.unwrap_or_default();
    records
        .iter()
        .filter(|r| r.matches_search(search))
        .map(RecordSummary::from)
        .collect()
}

pub async fn history(
    records: &TransportRecordRepository,
    company_id: Uuid,
    driver_id: Option<Uuid>,
    search: Option<&str>,
) -> AppResult<Vec<RecordSummary>> {
    let rows = records.list_history(company_id, driver_id).await?;
    Ok(filter_history(&rows, search))
}

pub async fn report(
    records: &TransportRecordRepository,
    company_id: Uuid,
    driver_id: Option<Uuid>,
    filters: &ReportFilters,
) -> AppResult<ReportResponse> {
    let rows = records.list_report(company_id, driver_id, filters).await?;
    Ok(ReportResponse::from_records(&rows))
}

/// Inicio (00:00 UTC) del mes de `now`
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or(now)
}

/// Cuatro lecturas independientes en paralelo
pub async fn dashboard(
    records: &TransportRecordRepository,
    stores: &StoreRepository,
    drivers: &DriverRepository,
    company_id: Uuid,
) -> AppResult<DashboardStats> {
    let since = month_start(Utc::now());
    let (month, active_stores, active_drivers, recent) = tokio::try_join!(
        records.month_aggregate(company_id, since),
        stores.count_active(company_id),
        drivers.count_active(company_id),
        records.list_recent(company_id, None, RECENT_LIMIT),
    )?;

    Ok(DashboardStats {
        month_revenue: format_money(month.revenue),
        month_operations: month.operations,
        active_stores,
        active_drivers,
        recent_records: recent.iter().map(RecordSummary::from).collect(),
    })
}

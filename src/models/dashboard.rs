//! Modelos del dashboard de administración

use rust_decimal::Decimal;
use serde::Serialize;

use crate::dto::record_dto::RecordSummary;

/// Agregados del mes en curso (solo registros finalizados)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthAggregate {
    pub revenue: Decimal,
    pub operations: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub month_revenue: String,
    pub month_operations: i64,
    pub active_stores: i64,
    pub active_drivers: i64,
    pub recent_records: Vec<RecordSummary>,
}

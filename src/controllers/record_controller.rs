use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::record_dto::{
    HistoryQuery, RecordSummary, ReportFilters, ReportQuery, ReportResponse, ValidationResponse,
};
use crate::middleware::AuthenticatedUser;
use crate::models::dashboard::DashboardStats;
use crate::repositories::{DriverRepository, StoreRepository, TransportRecordRepository};
use crate::services::record_service;
use crate::utils::errors::AppError;

/// Alcance de lectura de un usuario: toda la empresa, o solo su perfil de conductor
enum RecordScope {
    Company,
    Driver(Uuid),
    /// Conductor sin perfil vinculado: no ve ningún registro
    Nothing,
}

pub struct RecordController {
    records: TransportRecordRepository,
    stores: StoreRepository,
    drivers: DriverRepository,
}

impl RecordController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: TransportRecordRepository::new(pool.clone()),
            stores: StoreRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }

    async fn scope(&self, user: &AuthenticatedUser) -> Result<RecordScope, AppError> {
        if !user.is_driver() {
            return Ok(RecordScope::Company);
        }
        Ok(self
            .drivers
            .find_by_user(user.user_id, user.company_id)
            .await?
            .map(|driver| RecordScope::Driver(driver.id))
            .unwrap_or(RecordScope::Nothing))
    }

    pub async fn history(&self, user: &AuthenticatedUser, query: HistoryQuery) -> Result<Vec<RecordSummary>, AppError> {
        let driver_id = match self.scope(user).await? {
            RecordScope::Company => None,
            RecordScope::Driver(id) => Some(id),
            RecordScope::Nothing => return Ok(Vec::new()),
        };
        record_service::history(&self.records, user.company_id, driver_id, query.search.as_deref()).await
    }

    pub async fn report(&self, user: &AuthenticatedUser, query: ReportQuery) -> Result<ReportResponse, AppError> {
        let filters = ReportFilters::try_from(query)?;
        let driver_id = match self.scope(user).await? {
            RecordScope::Company => None,
            RecordScope::Driver(id) => Some(id),
            RecordScope::Nothing => return Ok(ReportResponse::from_records(&[])),
        };
        record_service::report(&self.records, user.company_id, driver_id, &filters).await
    }

    pub async fn validate(&self, raw_sequence: &str) -> Result<ValidationResponse, AppError> {
        record_service::validate_sequence(&self.records, raw_sequence).await
    }

    pub async fn dashboard(&self, company_id: Uuid) -> Result<DashboardStats, AppError> {
        record_service::dashboard(&self.records, &self.stores, &self.drivers, company_id).await
    }
}

//! Rutas de lectura: historial, informes, dashboard y validación pública

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::record_controller::RecordController;
use crate::dto::record_dto::{
    HistoryQuery, RecordSummary, ReportQuery, ReportResponse, ValidationResponse,
};
use crate::middleware::AuthenticatedUser;
use crate::models::auth::access;
use crate::models::dashboard::DashboardStats;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas autenticadas
pub fn create_record_router() -> Router<AppState> {
    Router::new()
        .route("/api/records", get(list_history))
        .route("/api/reports", get(report))
        .route("/api/dashboard", get(dashboard))
}

/// Validación pública, sin token
pub fn create_validation_router() -> Router<AppState> {
    Router::new().route("/:sequence", get(validate_record))
}

async fn list_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<RecordSummary>>, AppError> {
    user.authorize(&access::VIEW_HISTORY)?;
    let controller = RecordController::new(state.pool.clone());
    Ok(Json(controller.history(&user, query).await?))
}

async fn report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    user.authorize(&access::VIEW_REPORTS)?;
    let controller = RecordController::new(state.pool.clone());
    Ok(Json(controller.report(&user, query).await?))
}

async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<DashboardStats>, AppError> {
    user.authorize(&access::VIEW_DASHBOARD)?;
    let controller = RecordController::new(state.pool.clone());
    Ok(Json(controller.dashboard(user.company_id).await?))
}

async fn validate_record(
    State(state): State<AppState>,
    Path(sequence): Path<String>,
) -> Result<Json<ValidationResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone());
    Ok(Json(controller.validate(&sequence).await?))
}

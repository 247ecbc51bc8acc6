use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::{CreateDriverRequest, DriverListQuery, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::auth::access;
use crate::models::driver::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver).put(update_driver).delete(delete_driver))
        .route("/:id/toggle", patch(toggle_driver))
}

async fn list_drivers(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DriverListQuery>,
) -> Result<Json<Vec<Driver>>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.list(user.company_id, query).await?))
}

async fn get_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Driver>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, user.company_id).await?))
}

async fn create_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.create(user.company_id, request).await?))
}

async fn update_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.update(id, user.company_id, request).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.delete(id, user.company_id).await?))
}

async fn toggle_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    user.authorize(&access::MANAGE_DRIVERS)?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.toggle_active(id, user.company_id).await?))
}

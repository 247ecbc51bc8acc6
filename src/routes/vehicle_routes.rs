use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::auth::access;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/toggle", patch(toggle_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.create(user.company_id, request).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, user.company_id).await?))
}

async fn list_vehicles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.list_by_company(user.company_id).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.update(id, user.company_id, request).await?))
}

async fn toggle_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.toggle_active(id, user.company_id).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(&access::MANAGE_VEHICLES)?;
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.delete(id, user.company_id).await?))
}

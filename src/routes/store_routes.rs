use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::store_controller::StoreController;
use crate::dto::store_dto::{CreateStoreRequest, StoreListQuery, UpdateStoreRequest};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::auth::access;
use crate::models::store::Store;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_store_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/:id", get(get_store).put(update_store).delete(delete_store))
        .route("/:id/toggle", patch(toggle_store))
}

async fn list_stores(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<Vec<Store>>, AppError> {
    user.authorize(&access::LIST_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.list(user.company_id, query).await?))
}

async fn get_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Store>, AppError> {
    user.authorize(&access::LIST_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id, user.company_id).await?))
}

async fn create_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateStoreRequest>,
) -> Result<Json<ApiResponse<Store>>, AppError> {
    user.authorize(&access::MANAGE_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.create(user.company_id, request).await?))
}

async fn update_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStoreRequest>,
) -> Result<Json<ApiResponse<Store>>, AppError> {
    user.authorize(&access::MANAGE_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.update(id, user.company_id, request).await?))
}

async fn delete_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(&access::MANAGE_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.delete(id, user.company_id).await?))
}

async fn toggle_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Store>>, AppError> {
    user.authorize(&access::MANAGE_STORES)?;
    let controller = StoreController::new(state.pool.clone());
    Ok(Json(controller.toggle_active(id, user.company_id).await?))
}

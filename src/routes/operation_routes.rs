//! Rutas del asistente de creación (`/api/operations/drafts`)

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::operation_controller::{OperationController, SubmissionResponse};
use crate::dto::operation_dto::{
    CargoPhotoRequest, DraftView, SelectDriverRequest, SelectStoreRequest, StrokeRequest,
    MAX_PHOTO_BODY_BYTES,
};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::auth::access;
use crate::services::geolocation::DevicePositionReport;
use crate::services::signature::SignatureParty;
use crate::services::wizard::CargoUpdate;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_operation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_draft))
        .route("/:id", get(get_draft).delete(discard_draft))
        .route("/:id/store", put(select_store))
        .route("/:id/driver", put(select_driver))
        .route("/:id/cargo", put(update_cargo))
        .route("/:id/advance", post(advance))
        .route("/:id/back", post(back))
        .route("/:id/location", post(report_location))
        .route("/:id/location/retry", post(retry_location))
        .route("/:id/signatures/:party/strokes", post(draw_stroke))
        .route("/:id/signatures/:party", axum::routing::delete(clear_signature))
        .route(
            "/:id/photo",
            put(attach_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_BODY_BYTES)),
        )
        .route("/:id/submit", post(submit))
}

fn controller(state: &AppState, user: &AuthenticatedUser) -> Result<OperationController, AppError> {
    user.authorize(&access::CREATE_OPERATION)?;
    Ok(OperationController::new(state))
}

async fn start_draft(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<(StatusCode, Json<DraftView>), AppError> {
    let view = controller(&state, &user)?.start(&user).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_draft(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.get(&user, id).await?))
}

async fn discard_draft(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state, &user)?.discard(&user, id).await?;
    Ok(Json(ApiResponse::message_only("Borrador descartado".to_string())))
}

async fn select_store(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectStoreRequest>,
) -> Result<Json<DraftView>, AppError> {
    let view = controller(&state, &user)?
        .select_store(&user, id, request.store_id)
        .await?;
    Ok(Json(view))
}

async fn select_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectDriverRequest>,
) -> Result<Json<DraftView>, AppError> {
    let view = controller(&state, &user)?
        .select_driver(&user, id, request.driver_id)
        .await?;
    Ok(Json(view))
}

async fn update_cargo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(update): Json<CargoUpdate>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.update_cargo(&user, id, update).await?))
}

async fn advance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.advance(&user, id).await?))
}

async fn back(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.back(&user, id).await?))
}

/// El cliente envía el resultado de su llamada de geolocalización
async fn report_location(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(report): Json<DevicePositionReport>,
) -> Result<Json<DraftView>, AppError> {
    let view = controller(&state, &user)?
        .resolve_location(&user, id, &report)
        .await?;
    Ok(Json(view))
}

async fn retry_location(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.retry_location(&user, id).await?))
}

async fn draw_stroke(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, party)): Path<(Uuid, SignatureParty)>,
    Json(request): Json<StrokeRequest>,
) -> Result<Json<DraftView>, AppError> {
    let view = controller(&state, &user)?
        .draw_stroke(&user, id, party, request.points)
        .await?;
    Ok(Json(view))
}

async fn clear_signature(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, party)): Path<(Uuid, SignatureParty)>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.clear_signature(&user, id, party).await?))
}

async fn attach_photo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CargoPhotoRequest>,
) -> Result<Json<DraftView>, AppError> {
    Ok(Json(controller(&state, &user)?.attach_photo(&user, id, request).await?))
}

async fn submit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), AppError> {
    let response = controller(&state, &user)?.submit(&user, id).await?;
    let message = format!("Registro #{} creado", response.record.sequence_number);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, message)),
    ))
}

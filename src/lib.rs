//! Registro de transporte
//!
//! Backend de registros de recogida/entrega: asistente de creación con firmas y
//! ubicación, huella de contenido, validación pública por número secuencial y
//! gestión de tiendas, conductores y vehículos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/stores", routes::store_routes::create_store_router())
        .nest("/api/drivers", routes::driver_routes::create_driver_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest(
            "/api/operations/drafts",
            routes::operation_routes::create_operation_router(),
        )
        .nest("/api/validate", routes::record_routes::create_validation_router())
        .merge(routes::record_routes::create_record_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

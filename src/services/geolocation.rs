//! Proveedor de geolocalización
//!
//! Llamada única "posición actual" que devuelve coordenadas o un error. No hay
//! modo de seguimiento y la espera no tiene timeout.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::transport_record::Coordinates;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeolocationError {
    #[error("posición no disponible: {0}")]
    Unavailable(String),

    #[error("coordenadas fuera de rango ({latitude}, {longitude})")]
    OutOfRange { latitude: f64, longitude: f64 },
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Resultado reportado por el dispositivo del cliente
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DevicePositionReport {
    Fix { latitude: f64, longitude: f64 },
    Failure { error: String },
}

#[async_trait]
impl GeolocationProvider for DevicePositionReport {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            DevicePositionReport::Fix { latitude, longitude } => {
                let coords = Coordinates {
                    latitude: *latitude,
                    longitude: *longitude,
                };
                if coords.is_valid() {
                    Ok(coords)
                } else {
                    Err(GeolocationError::OutOfRange {
                        latitude: *latitude,
                        longitude: *longitude,
                    })
                }
            }
            DevicePositionReport::Failure { error } => {
                Err(GeolocationError::Unavailable(error.clone()))
            }
        }
    }
}

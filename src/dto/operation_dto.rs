//! DTOs del asistente de creación de registros

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::transport_record::{format_money, OperationKind};
use crate::services::signature::{Point, SignatureParty};
use crate::services::wizard::{CargoPhoto, LocationState, OperationDraft, SelectedStore, WizardStep};
use crate::utils::errors::AppError;

/// Límite de la foto decodificada
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Límite del cuerpo JSON de la foto: la foto máxima en base64 más margen
/// para el prefijo de data URL y el resto del objeto
pub const MAX_PHOTO_BODY_BYTES: usize = (MAX_PHOTO_BYTES + 2) / 3 * 4 + 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct SelectStoreRequest {
    pub store_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SelectDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StrokeRequest {
    pub points: Vec<Point>,
}

/// Foto de carga en base64, admite data URLs (`data:image/jpeg;base64,...`).
/// `data: null` quita la foto.
#[derive(Debug, Deserialize)]
pub struct CargoPhotoRequest {
    pub data: Option<String>,
    pub content_type: Option<String>,
}

impl CargoPhotoRequest {
    pub fn decode(self) -> Result<Option<CargoPhoto>, AppError> {
        let Some(raw) = self.data else {
            return Ok(None);
        };

        let (content_type, payload) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (meta, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| AppError::BadRequest("Data URL sin contenido".to_string()))?;
                let mime = meta.trim_end_matches(";base64").to_string();
                (Some(mime), payload.to_string())
            }
            None => (None, raw),
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::BadRequest(format!("Foto en base64 inválida: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("La foto está vacía".to_string()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::BadRequest("La foto supera el tamaño máximo".to_string()));
        }

        let content_type = self
            .content_type
            .or(content_type)
            .unwrap_or_else(|| "image/jpeg".to_string());
        Ok(Some(CargoPhoto { bytes, content_type }))
    }
}

#[derive(Debug, Serialize)]
pub struct CargoView {
    pub kind: OperationKind,
    pub volume_type: String,
    pub quantity: i32,
    pub unit_price: String,
    pub notes: Option<String>,
    pub total_value: String,
    pub final_value: String,
}

#[derive(Debug, Serialize)]
pub struct SignatureView {
    pub party: SignatureParty,
    pub stroke_count: usize,
    pub blank: bool,
}

/// Vista del borrador devuelta por todos los endpoints del asistente
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub id: Uuid,
    pub step: WizardStep,
    pub steps: Vec<WizardStep>,
    pub can_advance: bool,
    pub store: Option<SelectedStore>,
    pub driver_id: Option<Uuid>,
    pub driver_selectable: bool,
    pub cargo: CargoView,
    pub location: LocationState,
    pub signatures: Vec<SignatureView>,
    pub has_cargo_photo: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&OperationDraft> for DraftView {
    fn from(draft: &OperationDraft) -> Self {
        let cargo = draft.cargo();
        let totals = draft.totals();
        Self {
            id: draft.id,
            step: draft.step(),
            steps: WizardStep::ORDER.to_vec(),
            can_advance: draft.can_advance(),
            store: draft.store().cloned(),
            driver_id: draft.driver_id(),
            driver_selectable: draft.driver_selectable(),
            cargo: CargoView {
                kind: cargo.kind,
                volume_type: cargo.volume_type.clone(),
                quantity: cargo.quantity,
                unit_price: format_money(cargo.unit_price),
                notes: cargo.notes.clone(),
                total_value: format_money(totals.total_value),
                final_value: format_money(totals.final_value),
            },
            location: draft.location().clone(),
            signatures: [SignatureParty::Driver, SignatureParty::Responsible]
                .into_iter()
                .map(|party| {
                    let surface = draft.signature(party);
                    SignatureView {
                        party,
                        stroke_count: surface.stroke_count(),
                        blank: surface.is_blank(),
                    }
                })
                .collect(),
            has_cargo_photo: draft.cargo_photo().is_some(),
            updated_at: draft.updated_at,
        }
    }
}

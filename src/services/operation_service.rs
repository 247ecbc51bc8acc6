//! Envío de un borrador confirmado
//!
//! Subidas secuenciales de evidencias (best-effort), huella de contenido e
//! inserción única del registro. No hay reintentos.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::models::transport_record::{NewTransportRecord, RecordStatus, TransportRecord};
use crate::repositories::transport_record_repository::TransportRecordStore;
use crate::services::fingerprint::{derive_fingerprint, FingerprintInput};
use crate::services::signature::SignatureParty;
use crate::services::storage::{object_path, ObjectStorage};
use crate::services::draft_store::DraftStore;
use crate::services::wizard::OperationDraft;
use crate::utils::errors::{AppError, AppResult};

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Extensión de archivo para el tipo de contenido de la foto
pub fn photo_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        _ => "bin",
    }
}

/// Sube un objeto y devuelve su ruta, o `None` si la subida falla
async fn upload_best_effort(
    storage: &dyn ObjectStorage,
    path: String,
    bytes: Vec<u8>,
    content_type: &str,
) -> Option<String> {
    match storage.upload(&path, bytes, content_type).await {
        Ok(()) => Some(path),
        Err(e) => {
            warn!("⚠️ Subida fallida para {}: {}", path, e);
            None
        }
    }
}

pub async fn submit_draft(
    draft: &OperationDraft,
    storage: &dyn ObjectStorage,
    records: &dyn TransportRecordStore,
) -> AppResult<TransportRecord> {
    submit_draft_at(draft, Utc::now(), storage, records).await
}

/// Envía un borrador ya retirado del almacén en una tarea propia.
///
/// La tarea termina aunque quien la espera se cancele (cliente desconectado):
/// si el envío falla el borrador vuelve al almacén sin cambios, y si tiene
/// éxito se devuelve marcado como enviado.
pub fn spawn_submission(
    drafts: DraftStore,
    draft: OperationDraft,
    storage: Arc<dyn ObjectStorage>,
    records: Arc<dyn TransportRecordStore>,
) -> JoinHandle<AppResult<(TransportRecord, OperationDraft)>> {
    tokio::spawn(async move {
        match submit_draft(&draft, storage.as_ref(), records.as_ref()).await {
            Ok(record) => {
                let mut draft = draft;
                draft.mark_submitted()?;
                Ok((record, draft))
            }
            Err(e) => {
                drafts.replace(draft).await;
                Err(e)
            }
        }
    })
}

/// Igual que [`submit_draft`] con el instante de envío explícito
pub async fn submit_draft_at(
    draft: &OperationDraft,
    now: DateTime<Utc>,
    storage: &dyn ObjectStorage,
    records: &dyn TransportRecordStore,
) -> AppResult<TransportRecord> {
    let plan = draft.submission_plan()?;
    let company_id = draft.operator.company_id;
    let millis = now.timestamp_millis();

    let mut signature_paths = Vec::with_capacity(2);
    for party in [SignatureParty::Driver, SignatureParty::Responsible] {
        let path = object_path(company_id, millis, party.as_str(), "svg");
        let bytes = draft.signature(party).export_svg();
        signature_paths.push(upload_best_effort(storage, path, bytes, SVG_CONTENT_TYPE).await);
    }
    let responsible_signature_path = signature_paths.pop().flatten();
    let driver_signature_path = signature_paths.pop().flatten();

    let cargo_photo_path = match draft.cargo_photo() {
        Some(photo) => {
            let path = object_path(
                company_id,
                millis,
                "cargo",
                photo_extension(&photo.content_type),
            );
            upload_best_effort(storage, path, photo.bytes.clone(), &photo.content_type).await
        }
        None => None,
    };

    let fingerprint = derive_fingerprint(&FingerprintInput {
        store_id: plan.store_id,
        driver_id: plan.driver_id,
        total_value: plan.totals.total_value,
        timestamp: now,
        latitude: Some(plan.location.latitude),
    });

    let new_record = NewTransportRecord {
        id: draft.id,
        company_id,
        store_id: plan.store_id,
        driver_id: plan.driver_id,
        kind: plan.cargo.kind,
        volume_type: Some(plan.cargo.volume_type.trim().to_string()).filter(|v| !v.is_empty()),
        quantity: plan.cargo.quantity,
        unit_price: plan.cargo.unit_price,
        totals: plan.totals,
        location: Some(plan.location),
        driver_signature_path,
        responsible_signature_path,
        cargo_photo_path,
        fingerprint,
        status: RecordStatus::Finalized,
        notes: plan.cargo.notes,
    };

    let record = records.insert(&new_record).await.map_err(|e| {
        error!("❌ Error insertando registro del borrador {}: {}", draft.id, e);
        AppError::from(e)
    })?;

    info!(
        "✅ Registro #{} creado (empresa {}, tienda {})",
        record.sequence_number, company_id, record.store_id
    );
    Ok(record)
}

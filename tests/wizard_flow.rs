//! Flujo completo del asistente con dobles en memoria para el almacén de
//! registros, el storage de objetos y el proveedor de geolocalización.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use transport_registry::models::auth::Role;
use transport_registry::models::transport_record::{
    format_money, Coordinates, NewTransportRecord, TransportRecord,
};
use transport_registry::repositories::TransportRecordStore;
use transport_registry::services::geolocation::{GeolocationError, GeolocationProvider};
use transport_registry::services::operation_service::{spawn_submission, submit_draft_at};
use transport_registry::services::signature::{Point, SignatureParty};
use transport_registry::services::storage::{ObjectStorage, StorageError};
use transport_registry::services::wizard::{
    CargoUpdate, LocationState, OperationDraft, Operator, SelectedStore, WizardStep,
};
use transport_registry::services::DraftStore;
use transport_registry::utils::errors::AppError;

#[derive(Default)]
struct MemoryRecordStore {
    inserted: Mutex<Vec<NewTransportRecord>>,
    fail: bool,
}

#[async_trait]
impl TransportRecordStore for MemoryRecordStore {
    async fn insert(&self, record: &NewTransportRecord) -> Result<TransportRecord, sqlx::Error> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(record.clone());
        Ok(TransportRecord {
            id: record.id,
            company_id: record.company_id,
            store_id: record.store_id,
            driver_id: record.driver_id,
            sequence_number: inserted.len() as i64,
            kind: record.kind.as_str().to_string(),
            volume_type: record.volume_type.clone(),
            quantity: record.quantity,
            unit_price: record.unit_price,
            total_value: record.totals.total_value,
            final_value: record.totals.final_value,
            latitude: record.location.map(|c| c.latitude),
            longitude: record.location.map(|c| c.longitude),
            driver_signature_path: record.driver_signature_path.clone(),
            responsible_signature_path: record.responsible_signature_path.clone(),
            cargo_photo_path: record.cargo_photo_path.clone(),
            fingerprint: Some(record.fingerprint.clone()),
            status: record.status.as_str().to_string(),
            notes: record.notes.clone(),
            created_at: Utc::now(),
        })
    }
}

/// Storage que rechaza las rutas que contienen alguna de las etiquetas dadas
#[derive(Default)]
struct MemoryStorage {
    uploads: Mutex<Vec<(String, String)>>,
    reject: Vec<&'static str>,
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, _bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        if self.reject.iter().any(|label| path.contains(label)) {
            return Err(StorageError::Rejected {
                status: 500,
                body: "bucket unavailable".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_string(), content_type.to_string()));
        Ok(())
    }
}

struct FixedPosition(Result<Coordinates, GeolocationError>);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.clone()
    }
}

const SAO_PAULO: Coordinates = Coordinates {
    latitude: -23.5505,
    longitude: -46.6333,
};

fn store_with_price(price: &str) -> SelectedStore {
    SelectedStore {
        id: Uuid::new_v4(),
        name: "Mercado Central".to_string(),
        default_price: Some(Decimal::from_str(price).unwrap()),
    }
}

async fn locate(draft: &mut OperationDraft, provider: &dyn GeolocationProvider) {
    draft.ensure_locating().unwrap();
    let result = provider.current_position().await;
    draft.record_location(result).unwrap();
}

/// Conductor vinculado, tienda con precio 50.00, cantidad 3, firma del conductor
async fn driver_draft_at_confirm(driver_id: Uuid) -> OperationDraft {
    let mut draft = OperationDraft::new(Operator {
        user_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        role: Role::Driver,
        driver_id: Some(driver_id),
    })
    .unwrap();

    draft.select_store(store_with_price("50.00")).unwrap();
    assert_eq!(draft.advance().unwrap(), WizardStep::EnterCargo);

    draft
        .update_cargo(CargoUpdate {
            quantity: Some(3),
            volume_type: Some("caixa".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(format_money(draft.totals().total_value), "150.00");
    assert_eq!(draft.advance().unwrap(), WizardStep::CaptureLocation);

    locate(&mut draft, &FixedPosition(Ok(SAO_PAULO))).await;
    assert_eq!(draft.advance().unwrap(), WizardStep::CaptureSignatures);

    draft
        .signature_mut(SignatureParty::Driver)
        .unwrap()
        .draw_stroke(&[Point { x: 10.0, y: 10.0 }, Point { x: 90.0, y: 40.0 }]);
    assert_eq!(draft.advance().unwrap(), WizardStep::Confirm);
    draft
}

#[tokio::test]
async fn test_driver_flow_creates_finalized_record() {
    let driver_id = Uuid::new_v4();
    let draft = driver_draft_at_confirm(driver_id).await;
    let storage = MemoryStorage::default();
    let records = MemoryRecordStore::default();
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 14, 30, 0).unwrap();

    let record = submit_draft_at(&draft, now, &storage, &records).await.unwrap();

    assert_eq!(record.driver_id, driver_id);
    assert_eq!(record.status, "finalized");
    assert_eq!(format_money(record.total_value), "150.00");
    assert_eq!(record.final_value, record.total_value);
    assert_eq!(record.latitude, Some(SAO_PAULO.latitude));
    assert_eq!(record.volume_type.as_deref(), Some("caixa"));

    let fingerprint = record.fingerprint.unwrap();
    assert_eq!(fingerprint.len(), 64);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));

    let company = draft.operator.company_id;
    let uploads = storage.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].0, format!("{}/{}_driver.svg", company, now.timestamp_millis()));
    assert_eq!(uploads[1].0, format!("{}/{}_responsible.svg", company, now.timestamp_millis()));
    assert_eq!(uploads[0].1, "image/svg+xml");
}

#[tokio::test]
async fn test_failed_upload_leaves_null_reference() {
    let draft = driver_draft_at_confirm(Uuid::new_v4()).await;
    let storage = MemoryStorage {
        reject: vec!["_responsible"],
        ..Default::default()
    };
    let records = MemoryRecordStore::default();

    let record = submit_draft_at(&draft, Utc::now(), &storage, &records).await.unwrap();

    assert!(record.driver_signature_path.is_some());
    assert!(record.responsible_signature_path.is_none());
    assert_eq!(records.inserted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_failure_keeps_draft_on_confirm() {
    let drafts = DraftStore::new();
    let draft = drafts.insert(driver_draft_at_confirm(Uuid::new_v4()).await).await;
    let owner = draft.operator.user_id;
    let storage = MemoryStorage::default();
    let records = MemoryRecordStore {
        fail: true,
        ..Default::default()
    };

    let result = submit_draft_at(&draft, Utc::now(), &storage, &records).await;
    assert!(matches!(result, Err(AppError::Database(_))));

    let stored = drafts.get(draft.id, owner).await.unwrap();
    assert_eq!(stored.step(), WizardStep::Confirm);
    assert!(stored.can_advance());
}

#[tokio::test]
async fn test_submission_time_changes_fingerprint() {
    let draft = driver_draft_at_confirm(Uuid::new_v4()).await;
    let storage = MemoryStorage::default();
    let records = MemoryRecordStore::default();
    let first = Utc.with_ymd_and_hms(2024, 5, 17, 14, 30, 0).unwrap();
    let second = first + chrono::Duration::milliseconds(1);

    let a = submit_draft_at(&draft, first, &storage, &records).await.unwrap();
    let b = submit_draft_at(&draft, second, &storage, &records).await.unwrap();
    assert_ne!(a.fingerprint, b.fingerprint);
}

#[tokio::test]
async fn test_cargo_photo_is_uploaded_with_signatures() {
    let mut draft = driver_draft_at_confirm(Uuid::new_v4()).await;
    draft
        .attach_photo(Some(transport_registry::services::wizard::CargoPhoto {
            bytes: vec![0xFF, 0xD8, 0xFF],
            content_type: "image/jpeg".to_string(),
        }))
        .unwrap();
    let storage = MemoryStorage::default();
    let records = MemoryRecordStore::default();

    let record = submit_draft_at(&draft, Utc::now(), &storage, &records).await.unwrap();

    let photo_path = record.cargo_photo_path.unwrap();
    assert!(photo_path.ends_with("_cargo.jpg"));
    assert_eq!(storage.uploads.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_location_failure_then_retry() {
    let mut draft = OperationDraft::new(Operator {
        user_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        role: Role::Admin,
        driver_id: None,
    })
    .unwrap();
    draft.select_store(store_with_price("12.00")).unwrap();
    draft.advance().unwrap();
    draft.select_driver(Uuid::new_v4()).unwrap();
    draft.advance().unwrap();

    locate(
        &mut draft,
        &FixedPosition(Err(GeolocationError::Unavailable("timeout".to_string()))),
    )
    .await;
    assert!(matches!(draft.location(), LocationState::Failed { .. }));
    assert!(!draft.can_advance());

    draft.retry_location().unwrap();
    locate(&mut draft, &FixedPosition(Ok(SAO_PAULO))).await;
    assert_eq!(draft.location(), &LocationState::Located(SAO_PAULO));
    assert!(draft.can_advance());
}

#[tokio::test]
async fn test_submit_outside_confirm_is_refused_without_side_effects() {
    let mut draft = driver_draft_at_confirm(Uuid::new_v4()).await;
    draft.back().unwrap();
    let storage = MemoryStorage::default();
    let records = MemoryRecordStore::default();

    let result = submit_draft_at(&draft, Utc::now(), &storage, &records).await;
    assert!(matches!(result, Err(AppError::Wizard(_))));
    assert!(storage.uploads.lock().unwrap().is_empty());
    assert!(records.inserted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_abandoned_submission_still_restores_draft_on_failure() {
    let drafts = DraftStore::new();
    let draft = drafts.insert(driver_draft_at_confirm(Uuid::new_v4()).await).await;
    let (id, owner) = (draft.id, draft.operator.user_id);
    let in_flight = drafts.remove(id, owner).await.unwrap();

    // Nadie espera la tarea, como cuando el cliente se desconecta
    drop(spawn_submission(
        drafts.clone(),
        in_flight,
        Arc::new(MemoryStorage::default()),
        Arc::new(MemoryRecordStore {
            fail: true,
            ..Default::default()
        }),
    ));

    let mut restored = None;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        restored = drafts.get(id, owner).await;
        if restored.is_some() {
            break;
        }
    }
    let restored = restored.expect("el borrador vuelve al almacén");
    assert_eq!(restored.step(), WizardStep::Confirm);
}

#[tokio::test]
async fn test_spawned_submission_returns_submitted_draft() {
    let drafts = DraftStore::new();
    let draft = drafts.insert(driver_draft_at_confirm(Uuid::new_v4()).await).await;
    let (id, owner) = (draft.id, draft.operator.user_id);
    let in_flight = drafts.remove(id, owner).await.unwrap();
    let records = Arc::new(MemoryRecordStore::default());

    let (record, submitted) = spawn_submission(
        drafts.clone(),
        in_flight,
        Arc::new(MemoryStorage::default()),
        records.clone(),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(record.status, "finalized");
    assert_eq!(submitted.step(), WizardStep::Submitted);
    assert!(drafts.get(id, owner).await.is_none());
    assert_eq!(records.inserted.lock().unwrap().len(), 1);
}

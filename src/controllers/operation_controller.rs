//! Controlador del asistente de creación de registros
//!
//! Cada borrador vive en el `DraftStore` del estado y solo lo ve su dueño.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::operation_dto::{CargoPhotoRequest, DraftView};
use crate::middleware::AuthenticatedUser;
use crate::models::auth::Role;
use crate::models::transport_record::TransportRecord;
use crate::repositories::{DriverRepository, StoreRepository, TransportRecordRepository};
use crate::services::geolocation::GeolocationProvider;
use crate::services::operation_service::spawn_submission;
use crate::services::signature::{Point, SignatureParty};
use crate::services::wizard::{CargoUpdate, OperationDraft, Operator, SelectedStore, WizardError};
use crate::services::{DraftStore, ObjectStorage};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub record: TransportRecord,
    pub draft: DraftView,
}

pub struct OperationController {
    drafts: DraftStore,
    storage: Arc<dyn ObjectStorage>,
    stores: StoreRepository,
    drivers: DriverRepository,
    records: TransportRecordRepository,
}

impl OperationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            drafts: state.drafts.clone(),
            storage: state.storage.clone(),
            stores: StoreRepository::new(state.pool.clone()),
            drivers: DriverRepository::new(state.pool.clone()),
            records: TransportRecordRepository::new(state.pool.clone()),
        }
    }

    fn draft_not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Borrador {} no encontrado", id))
    }

    /// Aplica una transición sobre el borrador del usuario y devuelve la vista
    async fn mutate<F>(&self, user: &AuthenticatedUser, id: Uuid, f: F) -> AppResult<DraftView>
    where
        F: FnOnce(&mut OperationDraft) -> Result<(), WizardError>,
    {
        self.drafts
            .update(id, user.user_id, |draft| {
                f(draft)?;
                Ok::<_, WizardError>(DraftView::from(&*draft))
            })
            .await
            .ok_or_else(|| Self::draft_not_found(id))?
            .map_err(AppError::from)
    }

    async fn owned(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<OperationDraft> {
        self.drafts
            .get(id, user.user_id)
            .await
            .ok_or_else(|| Self::draft_not_found(id))
    }

    /// Nuevo borrador; un conductor queda vinculado a su perfil
    pub async fn start(&self, user: &AuthenticatedUser) -> AppResult<DraftView> {
        let driver_id = match user.role {
            Role::Driver => {
                let profile = self
                    .drivers
                    .find_by_user(user.user_id, user.company_id)
                    .await?
                    .filter(|d| d.active)
                    .ok_or_else(|| {
                        AppError::BadRequest(
                            "El usuario no tiene un perfil de conductor activo".to_string(),
                        )
                    })?;
                Some(profile.id)
            }
            Role::Admin => None,
        };

        let draft = OperationDraft::new(Operator {
            user_id: user.user_id,
            company_id: user.company_id,
            role: user.role,
            driver_id,
        })?;
        let draft = self.drafts.insert(draft).await;
        info!("🧭 Borrador {} iniciado por {}", draft.id, user.user_id);
        Ok(DraftView::from(&draft))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<DraftView> {
        let draft = self.owned(user, id).await?;
        Ok(DraftView::from(&draft))
    }

    pub async fn select_store(&self, user: &AuthenticatedUser, id: Uuid, store_id: Uuid) -> AppResult<DraftView> {
        self.owned(user, id).await?;
        let store = self
            .stores
            .find_active(store_id, user.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tienda no encontrada o inactiva".to_string()))?;

        let selected = SelectedStore {
            id: store.id,
            name: store.name,
            default_price: store.default_price,
        };
        self.mutate(user, id, |draft| draft.select_store(selected)).await
    }

    pub async fn select_driver(&self, user: &AuthenticatedUser, id: Uuid, driver_id: Uuid) -> AppResult<DraftView> {
        if user.is_driver() {
            return Err(AppError::Forbidden(
                "Un conductor no puede elegir otro conductor".to_string(),
            ));
        }
        self.owned(user, id).await?;
        let driver = self
            .drivers
            .find_active(driver_id, user.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado o inactivo".to_string()))?;

        self.mutate(user, id, |draft| draft.select_driver(driver.id)).await
    }

    pub async fn update_cargo(&self, user: &AuthenticatedUser, id: Uuid, update: CargoUpdate) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| draft.update_cargo(update)).await
    }

    pub async fn advance(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| draft.advance().map(|_| ())).await
    }

    pub async fn back(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| draft.back().map(|_| ())).await
    }

    /// Resuelve el intento de ubicación en curso con el proveedor dado.
    /// La espera no tiene timeout y el borrador no queda bloqueado mientras tanto.
    pub async fn resolve_location(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        provider: &dyn GeolocationProvider,
    ) -> AppResult<DraftView> {
        self.owned(user, id).await?.ensure_locating()?;

        let result = provider.current_position().await;
        if let Err(e) = &result {
            warn!("📍 Ubicación fallida para borrador {}: {}", id, e);
        }

        self.mutate(user, id, |draft| draft.record_location(result).map(|_| ()))
            .await
    }

    pub async fn retry_location(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| draft.retry_location()).await
    }

    pub async fn draw_stroke(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        party: SignatureParty,
        points: Vec<Point>,
    ) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| {
            draft.signature_mut(party)?.draw_stroke(&points);
            Ok(())
        })
        .await
    }

    pub async fn clear_signature(&self, user: &AuthenticatedUser, id: Uuid, party: SignatureParty) -> AppResult<DraftView> {
        self.mutate(user, id, |draft| {
            draft.signature_mut(party)?.clear();
            Ok(())
        })
        .await
    }

    pub async fn attach_photo(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: CargoPhotoRequest,
    ) -> AppResult<DraftView> {
        let photo = request.decode()?;
        self.mutate(user, id, |draft| draft.attach_photo(photo)).await
    }

    /// El borrador se retira del almacén mientras se envía; si el envío falla
    /// vuelve intacto (sigue en Confirm), aunque el cliente ya no espere
    pub async fn submit(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<SubmissionResponse> {
        let draft = self
            .drafts
            .remove(id, user.user_id)
            .await
            .ok_or_else(|| Self::draft_not_found(id))?;

        let (record, draft) = spawn_submission(
            self.drafts.clone(),
            draft,
            self.storage.clone(),
            Arc::new(self.records.clone()),
        )
        .await
        .map_err(|e| AppError::Internal(format!("Envío del borrador {} interrumpido: {}", id, e)))??;

        Ok(SubmissionResponse {
            record,
            draft: DraftView::from(&draft),
        })
    }

    pub async fn discard(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        self.drafts
            .remove(id, user.user_id)
            .await
            .map(|_| ())
            .ok_or_else(|| Self::draft_not_found(id))
    }
}

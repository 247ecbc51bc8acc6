//! Asistente de creación de registros
//!
//! Máquina de estados lineal:
//! `SelectStore → EnterCargo → CaptureLocation → CaptureSignatures → Confirm → Submitted`.
//! Avanzar exige la guarda del paso actual; retroceder siempre está permitido y
//! conserva los datos ya introducidos. Cada campo solo se edita en su paso.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::Role;
use crate::models::transport_record::{is_storable_price, Coordinates, OperationKind, Totals};
use crate::services::geolocation::GeolocationError;
use crate::services::signature::{SignatureParty, SignatureSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectStore,
    EnterCargo,
    CaptureLocation,
    CaptureSignatures,
    Confirm,
    Submitted,
}

impl WizardStep {
    /// Pasos visibles del asistente, en orden
    pub const ORDER: [WizardStep; 5] = [
        WizardStep::SelectStore,
        WizardStep::EnterCargo,
        WizardStep::CaptureLocation,
        WizardStep::CaptureSignatures,
        WizardStep::Confirm,
    ];

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::SelectStore => Some(WizardStep::EnterCargo),
            WizardStep::EnterCargo => Some(WizardStep::CaptureLocation),
            WizardStep::CaptureLocation => Some(WizardStep::CaptureSignatures),
            WizardStep::CaptureSignatures => Some(WizardStep::Confirm),
            // Confirm solo sale por submit
            WizardStep::Confirm | WizardStep::Submitted => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::SelectStore | WizardStep::Submitted => None,
            WizardStep::EnterCargo => Some(WizardStep::SelectStore),
            WizardStep::CaptureLocation => Some(WizardStep::EnterCargo),
            WizardStep::CaptureSignatures => Some(WizardStep::CaptureLocation),
            WizardStep::Confirm => Some(WizardStep::CaptureSignatures),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WizardError {
    #[error("acción no disponible en el paso {actual:?} (requiere {expected:?})")]
    WrongStep { expected: WizardStep, actual: WizardStep },

    #[error("no hay tienda seleccionada")]
    StoreNotSelected,

    #[error("la cantidad debe ser mayor que cero")]
    InvalidQuantity,

    #[error("el precio unitario no puede ser negativo")]
    NegativeUnitPrice,

    #[error("el precio unitario admite dos decimales y como máximo 9999999999.99")]
    UnitPriceNotStorable,

    #[error("el total de la operación excede el máximo admitido")]
    TotalOutOfRange,

    #[error("no hay conductor seleccionado")]
    DriverNotSelected,

    #[error("el conductor está vinculado al usuario y no se puede cambiar")]
    DriverBound,

    #[error("el usuario no tiene perfil de conductor")]
    DriverProfileMissing,

    #[error("todavía no se ha obtenido la ubicación")]
    LocationMissing,

    #[error("no hay un intento de ubicación en curso")]
    NotLocating,

    #[error("solo se puede reintentar una ubicación fallida")]
    NothingToRetry,

    #[error("ya está en el primer paso")]
    AtFirstStep,

    #[error("el paso de confirmación solo avanza enviando el registro")]
    SubmitRequired,

    #[error("el registro ya fue enviado")]
    AlreadySubmitted,
}

impl WizardError {
    pub fn code(&self) -> &'static str {
        match self {
            WizardError::WrongStep { .. } => "WRONG_STEP",
            WizardError::StoreNotSelected => "STORE_NOT_SELECTED",
            WizardError::InvalidQuantity => "INVALID_QUANTITY",
            WizardError::NegativeUnitPrice => "NEGATIVE_UNIT_PRICE",
            WizardError::UnitPriceNotStorable => "UNIT_PRICE_NOT_STORABLE",
            WizardError::TotalOutOfRange => "TOTAL_OUT_OF_RANGE",
            WizardError::DriverNotSelected => "DRIVER_NOT_SELECTED",
            WizardError::DriverBound => "DRIVER_BOUND",
            WizardError::DriverProfileMissing => "DRIVER_PROFILE_MISSING",
            WizardError::LocationMissing => "LOCATION_MISSING",
            WizardError::NotLocating => "NOT_LOCATING",
            WizardError::NothingToRetry => "NOTHING_TO_RETRY",
            WizardError::AtFirstStep => "AT_FIRST_STEP",
            WizardError::SubmitRequired => "SUBMIT_REQUIRED",
            WizardError::AlreadySubmitted => "ALREADY_SUBMITTED",
        }
    }
}

/// Quién opera el asistente
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
    /// Perfil de conductor vinculado al usuario (obligatorio para el rol driver)
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedStore {
    pub id: Uuid,
    pub name: String,
    pub default_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CargoDetails {
    pub kind: OperationKind,
    pub volume_type: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl Default for CargoDetails {
    fn default() -> Self {
        Self {
            kind: OperationKind::Pickup,
            volume_type: String::new(),
            quantity: 1,
            unit_price: Decimal::ZERO,
            notes: None,
        }
    }
}

/// Cambios parciales sobre los datos de carga
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CargoUpdate {
    pub kind: Option<OperationKind>,
    pub volume_type: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    Idle,
    Locating,
    Located(Coordinates),
    Failed { reason: String },
}

impl LocationState {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationState::Located(coords) => Some(*coords),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CargoPhoto {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Datos validados que el envío necesita
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    pub store_id: Uuid,
    pub driver_id: Uuid,
    pub cargo: CargoDetails,
    pub totals: Totals,
    pub location: Coordinates,
}

#[derive(Debug, Clone)]
pub struct OperationDraft {
    pub id: Uuid,
    pub operator: Operator,
    step: WizardStep,
    store: Option<SelectedStore>,
    driver_id: Option<Uuid>,
    cargo: CargoDetails,
    totals: Totals,
    location: LocationState,
    driver_signature: SignatureSurface,
    responsible_signature: SignatureSurface,
    cargo_photo: Option<CargoPhoto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OperationDraft {
    /// Un conductor queda vinculado a su propio perfil desde el inicio
    pub fn new(operator: Operator) -> Result<Self, WizardError> {
        let driver_id = match operator.role {
            Role::Driver => Some(operator.driver_id.ok_or(WizardError::DriverProfileMissing)?),
            Role::Admin => None,
        };
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            operator,
            step: WizardStep::SelectStore,
            store: None,
            driver_id,
            cargo: CargoDetails::default(),
            totals: Totals::default(),
            location: LocationState::Idle,
            driver_signature: SignatureSurface::default(),
            responsible_signature: SignatureSurface::default(),
            cargo_photo: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn store(&self) -> Option<&SelectedStore> {
        self.store.as_ref()
    }

    pub fn driver_id(&self) -> Option<Uuid> {
        self.driver_id
    }

    pub fn cargo(&self) -> &CargoDetails {
        &self.cargo
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn signature(&self, party: SignatureParty) -> &SignatureSurface {
        match party {
            SignatureParty::Driver => &self.driver_signature,
            SignatureParty::Responsible => &self.responsible_signature,
        }
    }

    pub fn cargo_photo(&self) -> Option<&CargoPhoto> {
        self.cargo_photo.as_ref()
    }

    /// El selector de conductor solo existe para administradores
    pub fn driver_selectable(&self) -> bool {
        self.operator.role == Role::Admin
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    fn ensure_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Elegir tienda siembra el precio unitario con el precio por defecto
    pub fn select_store(&mut self, store: SelectedStore) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::SelectStore)?;
        let cargo = CargoDetails {
            unit_price: store.default_price.unwrap_or(Decimal::ZERO),
            ..self.cargo.clone()
        };
        self.apply_cargo(cargo)?;
        self.store = Some(store);
        self.touch();
        Ok(())
    }

    pub fn select_driver(&mut self, driver_id: Uuid) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::EnterCargo)?;
        if !self.driver_selectable() {
            return Err(WizardError::DriverBound);
        }
        self.driver_id = Some(driver_id);
        self.touch();
        Ok(())
    }

    /// Sustituye la carga solo si el precio y el total caben en sus columnas
    fn apply_cargo(&mut self, cargo: CargoDetails) -> Result<(), WizardError> {
        if !is_storable_price(cargo.unit_price) {
            return Err(WizardError::UnitPriceNotStorable);
        }
        self.totals =
            Totals::compute(cargo.quantity, cargo.unit_price).ok_or(WizardError::TotalOutOfRange)?;
        self.cargo = cargo;
        Ok(())
    }

    /// Cantidad y signo del precio no se rechazan aquí: la guarda de avance decide
    pub fn update_cargo(&mut self, update: CargoUpdate) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::EnterCargo)?;
        let mut cargo = self.cargo.clone();
        if let Some(kind) = update.kind {
            cargo.kind = kind;
        }
        if let Some(volume_type) = update.volume_type {
            cargo.volume_type = volume_type;
        }
        if let Some(quantity) = update.quantity {
            cargo.quantity = quantity;
        }
        if let Some(unit_price) = update.unit_price {
            cargo.unit_price = unit_price;
        }
        if let Some(notes) = update.notes {
            cargo.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        self.apply_cargo(cargo)?;
        self.touch();
        Ok(())
    }

    fn check_store(&self) -> Result<Uuid, WizardError> {
        self.store
            .as_ref()
            .map(|s| s.id)
            .ok_or(WizardError::StoreNotSelected)
    }

    fn check_cargo(&self) -> Result<Uuid, WizardError> {
        if self.cargo.quantity <= 0 {
            return Err(WizardError::InvalidQuantity);
        }
        if self.cargo.unit_price.is_sign_negative() && !self.cargo.unit_price.is_zero() {
            return Err(WizardError::NegativeUnitPrice);
        }
        self.driver_id.ok_or(WizardError::DriverNotSelected)
    }

    fn check_location(&self) -> Result<Coordinates, WizardError> {
        self.location.coordinates().ok_or(WizardError::LocationMissing)
    }

    /// Guarda de salida del paso actual
    pub fn check_advance(&self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectStore => self.check_store().map(|_| ()),
            WizardStep::EnterCargo => self.check_cargo().map(|_| ()),
            WizardStep::CaptureLocation => self.check_location().map(|_| ()),
            WizardStep::CaptureSignatures => Ok(()),
            WizardStep::Confirm => self.submission_plan().map(|_| ()),
            WizardStep::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Estado del control "siguiente/enviar"
    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.check_advance()?;
        let next = self.step.next().ok_or(WizardError::SubmitRequired)?;
        self.step = next;
        // Al entrar en el paso de ubicación se lanza un intento automático
        if next == WizardStep::CaptureLocation && self.location.coordinates().is_none() {
            self.location = LocationState::Locating;
        }
        self.touch();
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        self.touch();
        Ok(previous)
    }

    /// Precondición para consultar al proveedor de geolocalización
    pub fn ensure_locating(&self) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::CaptureLocation)?;
        match self.location {
            LocationState::Locating => Ok(()),
            _ => Err(WizardError::NotLocating),
        }
    }

    pub fn record_location(
        &mut self,
        result: Result<Coordinates, GeolocationError>,
    ) -> Result<&LocationState, WizardError> {
        self.ensure_locating()?;
        self.location = match result {
            Ok(coords) => LocationState::Located(coords),
            Err(e) => LocationState::Failed {
                reason: e.to_string(),
            },
        };
        self.touch();
        Ok(&self.location)
    }

    /// Reintento manual tras un fallo
    pub fn retry_location(&mut self) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::CaptureLocation)?;
        match self.location {
            LocationState::Failed { .. } => {
                self.location = LocationState::Locating;
                self.touch();
                Ok(())
            }
            _ => Err(WizardError::NothingToRetry),
        }
    }

    pub fn signature_mut(&mut self, party: SignatureParty) -> Result<&mut SignatureSurface, WizardError> {
        self.ensure_step(WizardStep::CaptureSignatures)?;
        self.touch();
        Ok(match party {
            SignatureParty::Driver => &mut self.driver_signature,
            SignatureParty::Responsible => &mut self.responsible_signature,
        })
    }

    pub fn attach_photo(&mut self, photo: Option<CargoPhoto>) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        self.cargo_photo = photo;
        self.touch();
        Ok(())
    }

    /// Revalida todas las guardas; solo disponible en Confirm.
    /// Las firmas vacías no bloquean el envío.
    pub fn submission_plan(&self) -> Result<SubmissionPlan, WizardError> {
        self.ensure_step(WizardStep::Confirm)?;
        let store_id = self.check_store()?;
        let driver_id = self.check_cargo()?;
        let location = self.check_location()?;
        Ok(SubmissionPlan {
            store_id,
            driver_id,
            cargo: self.cargo.clone(),
            totals: self.totals(),
            location,
        })
    }

    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        self.ensure_step(WizardStep::Confirm)?;
        self.step = WizardStep::Submitted;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signature::Point;
    use std::str::FromStr;

    fn admin() -> Operator {
        Operator {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role: Role::Admin,
            driver_id: None,
        }
    }

    fn driver(driver_id: Uuid) -> Operator {
        Operator {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role: Role::Driver,
            driver_id: Some(driver_id),
        }
    }

    fn store(price: &str) -> SelectedStore {
        SelectedStore {
            id: Uuid::new_v4(),
            name: "Mercado Central".to_string(),
            default_price: Some(Decimal::from_str(price).unwrap()),
        }
    }

    fn coords() -> Coordinates {
        Coordinates {
            latitude: -23.5505,
            longitude: -46.6333,
        }
    }

    /// Lleva un borrador de administrador hasta Confirm
    fn draft_at_confirm() -> OperationDraft {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("50.00")).unwrap();
        draft.advance().unwrap();
        draft.select_driver(Uuid::new_v4()).unwrap();
        draft
            .update_cargo(CargoUpdate {
                quantity: Some(3),
                ..Default::default()
            })
            .unwrap();
        draft.advance().unwrap();
        draft.record_location(Ok(coords())).unwrap();
        draft.advance().unwrap();
        draft.advance().unwrap();
        draft
    }

    #[test]
    fn test_store_required_to_leave_first_step() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        assert!(!draft.can_advance());
        assert_eq!(draft.advance(), Err(WizardError::StoreNotSelected));
        assert_eq!(draft.step(), WizardStep::SelectStore);
    }

    #[test]
    fn test_store_selection_seeds_unit_price() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("50.00")).unwrap();
        draft.advance().unwrap();
        draft
            .update_cargo(CargoUpdate {
                quantity: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(draft.cargo().unit_price, Decimal::from_str("50.00").unwrap());
        assert_eq!(
            crate::models::transport_record::format_money(draft.totals().total_value),
            "150.00"
        );
        assert_eq!(draft.totals().final_value, draft.totals().total_value);
    }

    #[test]
    fn test_store_without_default_price_seeds_zero() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft
            .select_store(SelectedStore {
                id: Uuid::new_v4(),
                name: "Padaria".to_string(),
                default_price: None,
            })
            .unwrap();
        assert_eq!(draft.cargo().unit_price, Decimal::ZERO);
    }

    #[test]
    fn test_oversized_cargo_is_refused_and_draft_keeps_previous_values() {
        let mut draft = OperationDraft::new(driver(Uuid::new_v4())).unwrap();
        draft.select_store(store("50.00")).unwrap();
        draft.advance().unwrap();

        let result = draft.update_cargo(CargoUpdate {
            quantity: Some(i32::MAX),
            unit_price: Some(Decimal::MAX),
            ..Default::default()
        });
        assert_eq!(result, Err(WizardError::UnitPriceNotStorable));

        let result = draft.update_cargo(CargoUpdate {
            quantity: Some(i32::MAX),
            unit_price: Some(Decimal::from_str("9999999999.99").unwrap()),
            ..Default::default()
        });
        assert_eq!(result, Err(WizardError::TotalOutOfRange));

        assert_eq!(draft.cargo().quantity, 1);
        assert_eq!(draft.cargo().unit_price, Decimal::from_str("50.00").unwrap());
        assert_eq!(draft.totals().total_value, Decimal::from_str("50.00").unwrap());
        assert!(draft.can_advance());
    }

    #[test]
    fn test_unit_price_keeps_two_decimals() {
        let mut draft = OperationDraft::new(driver(Uuid::new_v4())).unwrap();
        draft.select_store(store("1.00")).unwrap();
        draft.advance().unwrap();

        let result = draft.update_cargo(CargoUpdate {
            quantity: Some(3),
            unit_price: Some(Decimal::from_str("0.005").unwrap()),
            ..Default::default()
        });
        assert_eq!(result, Err(WizardError::UnitPriceNotStorable));
        assert_eq!(WizardError::UnitPriceNotStorable.code(), "UNIT_PRICE_NOT_STORABLE");

        draft
            .update_cargo(CargoUpdate {
                quantity: Some(3),
                unit_price: Some(Decimal::from_str("0.010").unwrap()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            crate::models::transport_record::format_money(draft.totals().total_value),
            "0.03"
        );
    }

    #[test]
    fn test_admin_must_select_driver() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("10")).unwrap();
        draft.advance().unwrap();
        assert_eq!(draft.advance(), Err(WizardError::DriverNotSelected));
        draft.select_driver(Uuid::new_v4()).unwrap();
        assert_eq!(draft.advance(), Ok(WizardStep::CaptureLocation));
    }

    #[test]
    fn test_driver_is_prebound_and_cannot_select() {
        let driver_id = Uuid::new_v4();
        let mut draft = OperationDraft::new(driver(driver_id)).unwrap();
        assert!(!draft.driver_selectable());
        assert_eq!(draft.driver_id(), Some(driver_id));
        draft.select_store(store("10")).unwrap();
        draft.advance().unwrap();
        assert_eq!(draft.select_driver(Uuid::new_v4()), Err(WizardError::DriverBound));
        assert_eq!(draft.advance(), Ok(WizardStep::CaptureLocation));
    }

    #[test]
    fn test_driver_without_profile_cannot_start() {
        let mut operator = driver(Uuid::new_v4());
        operator.driver_id = None;
        assert_eq!(
            OperationDraft::new(operator).unwrap_err(),
            WizardError::DriverProfileMissing
        );
    }

    #[test]
    fn test_cargo_guards() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("10")).unwrap();
        draft.advance().unwrap();
        draft.select_driver(Uuid::new_v4()).unwrap();

        draft
            .update_cargo(CargoUpdate {
                quantity: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(draft.advance(), Err(WizardError::InvalidQuantity));

        draft
            .update_cargo(CargoUpdate {
                quantity: Some(2),
                unit_price: Some(Decimal::from_str("-0.01").unwrap()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(draft.advance(), Err(WizardError::NegativeUnitPrice));

        draft
            .update_cargo(CargoUpdate {
                unit_price: Some(Decimal::ZERO),
                ..Default::default()
            })
            .unwrap();
        assert!(draft.can_advance());
    }

    #[test]
    fn test_entering_location_step_starts_attempt() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("10")).unwrap();
        draft.advance().unwrap();
        draft.select_driver(Uuid::new_v4()).unwrap();
        draft.advance().unwrap();
        assert_eq!(draft.location(), &LocationState::Locating);
        assert_eq!(draft.advance(), Err(WizardError::LocationMissing));
    }

    #[test]
    fn test_location_failure_and_manual_retry() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        draft.select_store(store("10")).unwrap();
        draft.advance().unwrap();
        draft.select_driver(Uuid::new_v4()).unwrap();
        draft.advance().unwrap();

        draft
            .record_location(Err(GeolocationError::Unavailable("denied".into())))
            .unwrap();
        assert!(matches!(draft.location(), LocationState::Failed { .. }));
        assert_eq!(
            draft.record_location(Ok(coords())).unwrap_err(),
            WizardError::NotLocating
        );

        draft.retry_location().unwrap();
        draft.record_location(Ok(coords())).unwrap();
        assert_eq!(draft.retry_location(), Err(WizardError::NothingToRetry));
        assert_eq!(draft.advance(), Ok(WizardStep::CaptureSignatures));
    }

    #[test]
    fn test_back_keeps_data_and_fix() {
        let mut draft = draft_at_confirm();
        let store_id = draft.store().unwrap().id;
        assert_eq!(draft.back(), Ok(WizardStep::CaptureSignatures));
        assert_eq!(draft.back(), Ok(WizardStep::CaptureLocation));
        assert_eq!(draft.back(), Ok(WizardStep::EnterCargo));
        assert_eq!(draft.cargo().quantity, 3);
        assert_eq!(draft.store().unwrap().id, store_id);

        // Volver a entrar con una posición ya obtenida no relanza el intento
        draft.advance().unwrap();
        assert_eq!(draft.location(), &LocationState::Located(coords()));
    }

    #[test]
    fn test_back_from_first_step_is_refused() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        assert_eq!(draft.back(), Err(WizardError::AtFirstStep));
    }

    #[test]
    fn test_edits_only_on_owning_step() {
        let mut draft = OperationDraft::new(admin()).unwrap();
        assert!(matches!(
            draft.update_cargo(CargoUpdate::default()),
            Err(WizardError::WrongStep { .. })
        ));
        assert!(matches!(
            draft.signature_mut(SignatureParty::Driver),
            Err(WizardError::WrongStep { .. })
        ));
    }

    #[test]
    fn test_signatures_are_independent_and_optional() {
        let mut draft = draft_at_confirm();
        draft.back().unwrap();
        draft
            .signature_mut(SignatureParty::Driver)
            .unwrap()
            .draw_stroke(&[Point { x: 1.0, y: 1.0 }, Point { x: 5.0, y: 5.0 }]);
        draft
            .signature_mut(SignatureParty::Responsible)
            .unwrap()
            .draw_stroke(&[Point { x: 2.0, y: 2.0 }]);
        draft.signature_mut(SignatureParty::Responsible).unwrap().clear();

        assert_eq!(draft.signature(SignatureParty::Driver).stroke_count(), 1);
        assert!(draft.signature(SignatureParty::Responsible).is_blank());
        assert_eq!(draft.advance(), Ok(WizardStep::Confirm));
        assert!(draft.submission_plan().is_ok());
    }

    #[test]
    fn test_confirm_only_leaves_by_submit() {
        let mut draft = draft_at_confirm();
        assert!(draft.can_advance());
        assert_eq!(draft.advance(), Err(WizardError::SubmitRequired));
        draft.mark_submitted().unwrap();
        assert_eq!(draft.step(), WizardStep::Submitted);
        assert_eq!(draft.back(), Err(WizardError::AlreadySubmitted));
        assert_eq!(
            draft.attach_photo(None),
            Err(WizardError::AlreadySubmitted)
        );
    }

    #[test]
    fn test_submission_plan_contents() {
        let draft = draft_at_confirm();
        let plan = draft.submission_plan().unwrap();
        assert_eq!(plan.store_id, draft.store().unwrap().id);
        assert_eq!(Some(plan.driver_id), draft.driver_id());
        assert_eq!(plan.location, coords());
        assert_eq!(plan.totals.total_value, Decimal::from_str("150.00").unwrap());
    }
}

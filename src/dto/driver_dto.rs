use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

// Request para crear un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(max = 50))]
    pub license_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// Usuario del proveedor de identidad vinculado a este perfil
    pub user_id: Option<Uuid>,
}

// Request para actualizar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub license_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DriverListQuery {
    pub active_only: Option<bool>,
}

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_plate;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_plate")]
    pub plate: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_plate")]
    pub plate: Option<String>,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

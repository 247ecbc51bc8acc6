use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_non_negative, validate_not_empty};

// Request para crear una tienda
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoreRequest {
    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub default_price: Option<Decimal>,
}

// Request para actualizar una tienda
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStoreRequest {
    #[validate(length(max = 200), custom = "validate_not_empty")]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub default_price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreListQuery {
    pub active_only: Option<bool>,
    pub search: Option<String>,
}

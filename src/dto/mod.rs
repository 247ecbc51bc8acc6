//! DTOs de entrada y salida de la API

pub mod api_response;
pub mod driver_dto;
pub mod operation_dto;
pub mod record_dto;
pub mod store_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;

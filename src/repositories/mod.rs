//! Repositorios de acceso a datos. Todas las consultas se filtran por empresa.

pub mod driver_repository;
pub mod store_repository;
pub mod transport_record_repository;
pub mod vehicle_repository;

pub use driver_repository::DriverRepository;
pub use store_repository::StoreRepository;
pub use transport_record_repository::{TransportRecordRepository, TransportRecordStore};
pub use vehicle_repository::VehicleRepository;

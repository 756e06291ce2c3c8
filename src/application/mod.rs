pub mod access_guard;
pub mod audit;
pub mod chart_service;
pub mod repair_lifecycle;
pub mod transfer;

mod asset_service;
mod organization_service;
mod repair_service;
mod spare_part_service;

pub use access_guard::AccessGuard;
pub use asset_service::AssetService;
pub use audit::AuditRecorder;
pub use chart_service::ChartService;
pub use organization_service::OrganizationService;
pub use repair_lifecycle::RepairLifecycle;
pub use repair_service::RepairService;
pub use spare_part_service::SparePartService;
pub use transfer::TransferService;

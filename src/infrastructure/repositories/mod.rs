mod actor_repository;
mod asset_repository;
mod audit_repository;
mod organization_repository;
mod repair_repository;
mod spare_part_repository;
mod traits;
mod utils;

pub use actor_repository::{ActorRepositoryImpl, ManagerAssignmentRepositoryImpl};
pub use asset_repository::AssetRepositoryImpl;
pub use audit_repository::AuditRepositoryImpl;
pub use organization_repository::{
    BusinessLineRepositoryImpl, DepartmentRepositoryImpl, SupplierRepositoryImpl,
};
pub use repair_repository::RepairRepositoryImpl;
pub use spare_part_repository::{SparePartRepositoryImpl, SparePartTypeRepositoryImpl};
pub use traits::{
    ActorRepository, AssetFilter, AssetRepository, AuditRepository, BusinessLineRepository,
    DepartmentRepository, ManagerAssignmentRepository, NestedCount, RepairFilter,
    RepairGrouping, RepairRepository, SparePartRepository, SparePartTypeRepository,
    SupplierRepository,
};
pub use utils::escape_like_pattern;

pub mod actor;
pub mod asset;
pub mod audit;
pub mod errors;
pub mod organization;
pub mod repair;
pub mod scope;

pub use actor::{Actor, ManagerAssignment};
pub use asset::{Asset, AssetStatus, AssetType};
pub use audit::{AuditAction, AuditEntry, EntityType};
pub use errors::DomainError;
pub use organization::{BusinessLine, Department, Supplier};
pub use repair::{RepairRecord, RepairStatus, RepairType, SparePart, SparePartType};
pub use scope::{DepartmentScoped, ListScope, Lockable};

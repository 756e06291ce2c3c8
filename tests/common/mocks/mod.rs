#[allow(dead_code, unused_imports)]
pub mod actor_repo;
#[allow(dead_code, unused_imports)]
pub mod asset_repo;
#[allow(dead_code, unused_imports)]
pub mod audit_repo;
#[allow(dead_code, unused_imports)]
pub mod organization_repo;
#[allow(dead_code, unused_imports)]
pub mod repair_repo;
#[allow(dead_code, unused_imports)]
pub mod spare_part_repo;

#[allow(dead_code, unused_imports)]
pub use actor_repo::{MockActorRepo, MockAssignmentRepo};
#[allow(dead_code, unused_imports)]
pub use asset_repo::MockAssetRepo;
#[allow(dead_code, unused_imports)]
pub use audit_repo::MockAuditRepo;
#[allow(dead_code, unused_imports)]
pub use organization_repo::{MockBusinessLineRepo, MockDepartmentRepo, MockSupplierRepo};
#[allow(dead_code, unused_imports)]
pub use repair_repo::MockRepairRepo;
#[allow(dead_code, unused_imports)]
pub use spare_part_repo::{MockSparePartRepo, MockSparePartTypeRepo};

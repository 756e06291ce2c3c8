pub mod asset_dto;
pub mod common;
pub mod organization_dto;
pub mod repair_dto;
pub mod report_dto;
pub mod spare_part_dto;

pub use asset_dto::*;
pub use common::*;
pub use organization_dto::*;
pub use repair_dto::*;
pub use report_dto::*;
pub use spare_part_dto::*;

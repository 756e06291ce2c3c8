mod app_error;
mod conversions;
mod db_mapping;
mod validation_mapping;


pub use app_error::{AppError, AppResult, ValidationIssue};
pub(crate) use db_mapping::UNIQUE_VIOLATION;

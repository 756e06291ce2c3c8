use super::app_error::AppError;

pub(crate) const UNIQUE_VIOLATION: &str = "23505";

pub(super) fn map_database_error(
    code: Option<&str>,
    constraint: Option<&str>,
    message: &str,
) -> Option<AppError> {
    match code {
        Some(UNIQUE_VIOLATION) => Some(AppError::Conflict(
            conflict_message_from_constraint(constraint).to_string(),
        )),
        Some("23502") => Some(AppError::validation_error(
            required_field_message_from_db(message)
                .unwrap_or_else(|| "required field is missing".to_string()),
        )),
        Some("23503") if message.starts_with("update or delete") => Some(AppError::Conflict(
            "record is still referenced by other records".to_string(),
        )),
        Some("23503") => Some(AppError::BadRequest(
            foreign_key_message_from_constraint(constraint).to_string(),
        )),
        Some("23514") => Some(AppError::validation_error(
            check_message_from_constraint(constraint),
        )),
        Some("22P02") => Some(AppError::validation_error("invalid input format")),
        Some("08001") | Some("08006") => Some(AppError::ServiceUnavailable {
            service: "database".to_string(),
            message: "Unable to connect to database. Please try again later.".to_string(),
        }),
        Some("53300") => Some(AppError::ServiceUnavailable {
            service: "database".to_string(),
            message: "Service temporarily unavailable. Please try again later.".to_string(),
        }),
        Some("40001") | Some("55P03") => Some(AppError::Conflict(
            "Resource is currently locked. Please try again.".to_string(),
        )),
        _ => None,
    }
}

pub(super) fn conflict_message_from_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "username already taken",
        Some("business_lines_name_key") => "business line name already exists",
        Some("departments_name_key") => "department name already exists",
        Some("suppliers_name_key") => "supplier name already exists",
        Some("assets_serial_number_key") => "asset serial number already exists",
        Some("spare_parts_serial_number_key") => "spare part serial number already exists",
        Some("repair_records_repair_number_key") => "repair number already allocated",
        Some("asset_managers_user_department_key") => {
            "user already manages this department"
        }
        _ => "resource already exists",
    }
}

pub(super) fn foreign_key_message_from_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("department") => "department does not exist",
        Some(name) if name.contains("supplier") => "supplier does not exist",
        Some(name) if name.contains("business_line") => "business line does not exist",
        Some(name) if name.contains("asset") => "asset does not exist",
        Some(name) if name.contains("part_type") => "spare part type does not exist",
        Some(name) if name.contains("spare_part") => "spare part does not exist",
        _ => "referenced resource does not exist",
    }
}

fn check_message_from_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("assets_price_check") => "price cannot be negative",
        Some("assets_repair_count_check") => "repair count cannot be negative",
        _ => "request violates validation rules",
    }
}

pub(super) fn required_field_message_from_db(message: &str) -> Option<String> {
    let marker = "column \"";
    let start = message.find(marker)?;
    let rest = &message[start + marker.len()..];
    let end = rest.find('"')?;
    Some(format!("{} is required", &rest[..end]))
}

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SparePartTypeRequest {
    #[validate(length(min = 1, max = 32, message = "name must be 1-32 characters"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SparePartRequest {
    pub part_type_id: Uuid,
    #[validate(length(min = 1, max = 32, message = "name must be 1-32 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 32, message = "serial number must be 1-32 characters"))]
    pub serial_number: String,
    pub supplier_id: Uuid,
    #[validate(range(min = 0, max = 600))]
    #[serde(default)]
    pub warranty_months: i32,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SparePartQueryParams {
    pub part_type_id: Option<Uuid>,
}

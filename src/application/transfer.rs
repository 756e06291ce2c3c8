//! Spreadsheet-style CSV import and export.
//!
//! Enums travel as their display labels and booleans as `Yes`/`No`, so a
//! sheet exported here can be edited by hand and fed back in.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::dtos::{ImportReport, ImportRowError};
use crate::application::access_guard::AccessGuard;
use crate::application::audit::AuditRecorder;
use crate::domain::{
    Actor, Asset, AssetStatus, AssetType, BusinessLine, Department, EntityType, RepairRecord,
    Supplier,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    ActorRepository, AssetRepository, BusinessLineRepository, DepartmentRepository,
    ManagerAssignmentRepository, RepairRepository, SparePartRepository, SupplierRepository,
};

pub const ASSET_HEADERS: [&str; 19] = [
    "ID",
    "Business line",
    "Department",
    "Supplier",
    "Purchase date",
    "Name",
    "Serial number",
    "Location",
    "Asset type",
    "Status",
    "Warranty (months)",
    "Price",
    "Repair count",
    "Active",
    "Remark",
    "Creator",
    "Created at",
    "Updated at",
    "QR payload",
];

pub const REPAIR_HEADERS: [&str; 15] = [
    "ID",
    "Repair number",
    "Asset serial",
    "Department",
    "Applicant",
    "Fault description",
    "Supplier",
    "Repair type",
    "Repair status",
    "Spare parts",
    "Repair start time",
    "Repair duration",
    "Creator",
    "Created at",
    "Updated at",
];

const DATE_FORMAT: &str = "%Y/%m/%d";
const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const EXPORT_BATCH: i64 = 500;
const SPARE_PART_SEPARATOR: &str = "|";

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

/// Column positions in an uploaded asset sheet.
#[derive(Debug, Clone)]
pub struct AssetColumns {
    serial_number: usize,
    name: usize,
    business_line: usize,
    department: usize,
    supplier: usize,
    purchase_date: usize,
    asset_type: usize,
    status: usize,
    active: usize,
    location: Option<usize>,
    warranty_months: Option<usize>,
    price: Option<usize>,
    remark: Option<usize>,
}

impl AssetColumns {
    pub fn from_headers(headers: &csv::StringRecord) -> AppResult<Self> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AppError::BadRequest(format!("missing column: {name}")))
        };

        Ok(Self {
            serial_number: require("Serial number")?,
            name: require("Name")?,
            business_line: require("Business line")?,
            department: require("Department")?,
            supplier: require("Supplier")?,
            purchase_date: require("Purchase date")?,
            asset_type: require("Asset type")?,
            status: require("Status")?,
            active: require("Active")?,
            location: find("Location"),
            warranty_months: find("Warranty (months)"),
            price: find("Price"),
            remark: find("Remark"),
        })
    }
}

/// One sheet row, checked and converted but not yet resolved against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRow {
    pub serial_number: String,
    pub name: String,
    pub location: Option<String>,
    pub business_line: String,
    pub department: String,
    pub supplier: String,
    pub purchase_date: NaiveDate,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub is_active: bool,
    pub warranty_months: i32,
    pub price: Decimal,
    pub remark: Option<String>,
}

pub fn parse_asset_row(
    record: &csv::StringRecord,
    columns: &AssetColumns,
) -> Result<AssetRow, String> {
    let cell = |index: usize| record.get(index).map(str::trim).unwrap_or("");
    let optional_cell = |index: Option<usize>| {
        index
            .map(cell)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let required = |index: usize, label: &str| {
        let value = cell(index);
        if value.is_empty() {
            Err(format!("{label} is required"))
        } else {
            Ok(value.to_string())
        }
    };

    let serial_number = required(columns.serial_number, "serial number")?;
    if serial_number.chars().count() > 32 {
        return Err(format!("serial number too long: {serial_number}"));
    }
    let name = required(columns.name, "name")?;
    if name.chars().count() > 32 {
        return Err(format!("name too long: {name}"));
    }

    let raw_date = required(columns.purchase_date, "purchase date")?;
    let purchase_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d"))
        .map_err(|_| format!("invalid purchase date: {raw_date}"))?;

    let raw_type = required(columns.asset_type, "asset type")?;
    let asset_type =
        AssetType::from_label(&raw_type).ok_or_else(|| format!("invalid asset type: {raw_type}"))?;

    let raw_status = required(columns.status, "status")?;
    let status = AssetStatus::from_label(&raw_status)
        .ok_or_else(|| format!("invalid status: {raw_status}"))?;

    let raw_active = cell(columns.active);
    let is_active = parse_yes_no(raw_active)
        .ok_or_else(|| format!("active must be Yes or No, got: {raw_active}"))?;

    let warranty_months = match optional_cell(columns.warranty_months) {
        None => 0,
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|months| *months >= 0)
            .ok_or_else(|| format!("invalid warranty months: {raw}"))?,
    };

    let price = match optional_cell(columns.price) {
        None => Decimal::ZERO,
        Some(raw) => Decimal::from_str(&raw)
            .ok()
            .filter(|price| !price.is_sign_negative())
            .ok_or_else(|| format!("invalid price: {raw}"))?,
    };

    Ok(AssetRow {
        serial_number,
        name,
        location: optional_cell(columns.location),
        business_line: required(columns.business_line, "business line")?,
        department: required(columns.department, "department")?,
        supplier: required(columns.supplier, "supplier")?,
        purchase_date,
        asset_type,
        status,
        is_active,
        warranty_months,
        price,
        remark: optional_cell(columns.remark),
    })
}

enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

struct ResolvedRefs {
    business_line_id: Uuid,
    department_id: Uuid,
    supplier_id: Uuid,
}

#[derive(Clone)]
pub struct TransferService {
    asset_repo: Arc<dyn AssetRepository>,
    repair_repo: Arc<dyn RepairRepository>,
    business_line_repo: Arc<dyn BusinessLineRepository>,
    department_repo: Arc<dyn DepartmentRepository>,
    supplier_repo: Arc<dyn SupplierRepository>,
    spare_part_repo: Arc<dyn SparePartRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    audit: AuditRecorder,
    public_url: String,
    business_offset: FixedOffset,
}

impl TransferService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        repair_repo: Arc<dyn RepairRepository>,
        business_line_repo: Arc<dyn BusinessLineRepository>,
        department_repo: Arc<dyn DepartmentRepository>,
        supplier_repo: Arc<dyn SupplierRepository>,
        spare_part_repo: Arc<dyn SparePartRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
        audit: AuditRecorder,
        public_url: String,
        business_offset: FixedOffset,
    ) -> Self {
        Self {
            asset_repo,
            repair_repo,
            business_line_repo,
            department_repo,
            supplier_repo,
            spare_part_repo,
            actor_repo,
            assignment_repo,
            audit,
            public_url,
            business_offset,
        }
    }

    fn format_datetime(&self, value: DateTime<Utc>) -> String {
        value
            .with_timezone(&self.business_offset)
            .format(DATETIME_FORMAT)
            .to_string()
    }

    async fn name_maps(
        &self,
    ) -> AppResult<(HashMap<Uuid, String>, HashMap<Uuid, String>, HashMap<Uuid, String>)> {
        let business_lines = self
            .business_line_repo
            .list()
            .await?
            .into_iter()
            .map(|line| (line.id, line.name))
            .collect();
        let departments = self
            .department_repo
            .list()
            .await?
            .into_iter()
            .map(|department| (department.id, department.name))
            .collect();
        let suppliers = self
            .supplier_repo
            .list(false)
            .await?
            .into_iter()
            .map(|supplier| (supplier.id, supplier.name))
            .collect();
        Ok((business_lines, departments, suppliers))
    }

    /// Every asset the actor can see, one row each.
    pub async fn export_assets(&self, actor: &Actor) -> AppResult<Vec<u8>> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        let scope = guard.list_scope();

        let mut assets: Vec<Asset> = Vec::new();
        loop {
            let after = assets.last().map(|asset| (asset.created_at, asset.id));
            let batch = self
                .asset_repo
                .list_after(&scope, after, EXPORT_BATCH)
                .await?;
            let done = (batch.len() as i64) < EXPORT_BATCH;
            assets.extend(batch);
            if done {
                break;
            }
        }

        let (business_lines, departments, suppliers) = self.name_maps().await?;
        let creator_ids: Vec<Uuid> = assets.iter().filter_map(|asset| asset.creator_id).collect();
        let creators = self.actor_repo.usernames(&creator_ids).await?;
        let name_of = |names: &HashMap<Uuid, String>, id: Uuid| {
            names.get(&id).cloned().unwrap_or_default()
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(ASSET_HEADERS)?;
        for asset in &assets {
            writer.write_record([
                asset.id.to_string(),
                name_of(&business_lines, asset.business_line_id),
                name_of(&departments, asset.department_id),
                name_of(&suppliers, asset.supplier_id),
                asset.purchase_date.format(DATE_FORMAT).to_string(),
                asset.name.clone(),
                asset.serial_number.clone(),
                asset.location.clone().unwrap_or_default(),
                asset.asset_type.label().to_string(),
                asset.status.label().to_string(),
                asset.warranty_months.to_string(),
                asset.price.to_string(),
                asset.repair_count.to_string(),
                yes_no(asset.is_active).to_string(),
                asset.remark.clone().unwrap_or_default(),
                asset
                    .creator_id
                    .and_then(|id| creators.get(&id).cloned())
                    .unwrap_or_default(),
                self.format_datetime(asset.created_at),
                self.format_datetime(asset.updated_at),
                asset.qr_payload.clone().unwrap_or_default(),
            ])?;
        }

        info!(
            actor = %guard.actor_id(),
            action = "asset.export",
            rows = assets.len(),
            "assets exported"
        );
        finish(writer)
    }

    /// Rows are keyed by serial number and applied one at a time; a bad row is
    /// reported and the rest still go through.
    pub async fn import_assets(&self, actor: &Actor, data: &[u8]) -> AppResult<ImportReport> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);
        let columns = AssetColumns::from_headers(reader.headers()?)?;

        let mut report = ImportReport::default();
        for (index, result) in reader.records().enumerate() {
            let row_number = index + 2;
            let outcome = match result {
                Ok(record) => match parse_asset_row(&record, &columns) {
                    Ok(row) => self.import_row(&guard, row).await,
                    Err(message) => Err(AppError::validation_error(message)),
                },
                Err(err) => Err(AppError::from(err)),
            };

            match outcome {
                Ok(RowOutcome::Created) => report.created += 1,
                Ok(RowOutcome::Updated) => report.updated += 1,
                Ok(RowOutcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    if matches!(err, AppError::InternalError(_) | AppError::DatabaseError(_)) {
                        warn!(row = row_number, error = %err, "asset import row failed");
                    }
                    report.errors.push(ImportRowError {
                        row: row_number,
                        message: err.public_message(),
                    });
                }
            }
        }

        info!(
            actor = %guard.actor_id(),
            action = "asset.import",
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            errors = report.errors.len(),
            "asset import finished"
        );
        Ok(report)
    }

    async fn import_row(&self, guard: &AccessGuard, row: AssetRow) -> AppResult<RowOutcome> {
        let refs = self.resolve_refs(guard, &row).await?;
        let today = Utc::now().with_timezone(&self.business_offset).date_naive();

        match self.asset_repo.find_by_serial(&row.serial_number).await? {
            Some(existing) => {
                // Rows the actor may not touch fail even when nothing would change.
                guard.authorize_mutate(&existing)?;

                let mut asset = existing.clone();
                apply_row(&mut asset, &row, &refs);
                asset.apply_derived_fields(&self.public_url);
                if same_content(&existing, &asset) {
                    return Ok(RowOutcome::Skipped);
                }

                guard.ensure_writable(&existing)?;
                if asset.department_id != existing.department_id {
                    guard.authorize_create(&asset)?;
                }
                asset.validate(today)?;
                if asset.supplier_id != existing.supplier_id {
                    self.ensure_supplier_active(asset.supplier_id).await?;
                }
                guard.stamp_creator(&mut asset);
                asset.updated_at = Utc::now();

                let updated = self.asset_repo.update(&asset).await?;
                self.audit
                    .updated(EntityType::Asset, updated.id, guard.actor_id(), &existing, &updated)
                    .await;
                Ok(RowOutcome::Updated)
            }
            None => {
                let now = Utc::now();
                let mut asset = Asset {
                    id: Uuid::new_v4(),
                    name: String::new(),
                    serial_number: row.serial_number.clone(),
                    asset_type: row.asset_type,
                    location: None,
                    business_line_id: refs.business_line_id,
                    department_id: refs.department_id,
                    supplier_id: refs.supplier_id,
                    purchase_date: row.purchase_date,
                    warranty_months: 0,
                    price: Decimal::ZERO,
                    status: row.status,
                    qr_payload: None,
                    repair_count: 0,
                    is_active: true,
                    creator_id: None,
                    remark: None,
                    created_at: now,
                    updated_at: now,
                };
                apply_row(&mut asset, &row, &refs);

                guard.authorize_create(&asset)?;
                asset.validate(today)?;
                self.ensure_supplier_active(asset.supplier_id).await?;
                asset.apply_derived_fields(&self.public_url);
                guard.stamp_creator(&mut asset);

                let created = self.asset_repo.create(&asset).await?;
                self.audit
                    .created(EntityType::Asset, created.id, guard.actor_id(), &created)
                    .await;
                Ok(RowOutcome::Created)
            }
        }
    }

    async fn ensure_supplier_active(&self, supplier_id: Uuid) -> AppResult<()> {
        match self.supplier_repo.find_by_id(supplier_id).await? {
            Some(supplier) if supplier.is_active => Ok(()),
            Some(supplier) => Err(AppError::validation_error(format!(
                "supplier {} is inactive",
                supplier.name
            ))),
            None => Err(AppError::validation_error("supplier does not exist")),
        }
    }

    /// Looks reference rows up by name. Superusers create the missing ones.
    async fn resolve_refs(&self, guard: &AccessGuard, row: &AssetRow) -> AppResult<ResolvedRefs> {
        let now = Utc::now();
        let missing = |what: &str, name: &str| {
            AppError::validation_error(format!("{what} not found: {name}"))
        };

        let business_line = match self.business_line_repo.find_by_name(&row.business_line).await? {
            Some(line) => line,
            None if guard.is_superuser() => {
                let created = self
                    .business_line_repo
                    .create(&BusinessLine {
                        id: Uuid::new_v4(),
                        name: row.business_line.clone(),
                        creator_id: Some(guard.actor_id()),
                        remark: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
                self.audit
                    .created(EntityType::BusinessLine, created.id, guard.actor_id(), &created)
                    .await;
                created
            }
            None => return Err(missing("business line", &row.business_line)),
        };

        let department = match self.department_repo.find_by_name(&row.department).await? {
            Some(department) => department,
            None if guard.is_superuser() => {
                let created = self
                    .department_repo
                    .create(&Department {
                        id: Uuid::new_v4(),
                        business_line_id: business_line.id,
                        name: row.department.clone(),
                        creator_id: Some(guard.actor_id()),
                        remark: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
                self.audit
                    .created(EntityType::Department, created.id, guard.actor_id(), &created)
                    .await;
                created
            }
            None => return Err(missing("department", &row.department)),
        };

        let supplier = match self.supplier_repo.find_by_name(&row.supplier).await? {
            Some(supplier) => supplier,
            None if guard.is_superuser() => {
                let created = self
                    .supplier_repo
                    .create(&Supplier {
                        id: Uuid::new_v4(),
                        name: row.supplier.clone(),
                        contact: None,
                        phone: None,
                        email: None,
                        address: None,
                        is_active: true,
                        creator_id: Some(guard.actor_id()),
                        remark: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
                self.audit
                    .created(EntityType::Supplier, created.id, guard.actor_id(), &created)
                    .await;
                created
            }
            None => return Err(missing("supplier", &row.supplier)),
        };

        Ok(ResolvedRefs {
            business_line_id: business_line.id,
            department_id: department.id,
            supplier_id: supplier.id,
        })
    }

    /// Every repair record the actor can see, one row each.
    pub async fn export_repairs(&self, actor: &Actor) -> AppResult<Vec<u8>> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        let scope = guard.list_scope();

        let mut records: Vec<RepairRecord> = Vec::new();
        loop {
            let after = records.last().map(|record| record.repair_number.clone());
            let batch = self
                .repair_repo
                .list_after(&scope, after.as_deref(), EXPORT_BATCH)
                .await?;
            let done = (batch.len() as i64) < EXPORT_BATCH;
            records.extend(batch);
            if done {
                break;
            }
        }

        let (_, departments, suppliers) = self.name_maps().await?;
        let part_serials: HashMap<Uuid, String> = self
            .spare_part_repo
            .list(None)
            .await?
            .into_iter()
            .map(|part| (part.id, part.serial_number))
            .collect();
        let creator_ids: Vec<Uuid> = records
            .iter()
            .filter_map(|record| record.creator_id)
            .collect();
        let creators = self.actor_repo.usernames(&creator_ids).await?;

        let mut asset_serials: HashMap<Uuid, String> = HashMap::new();
        for record in &records {
            if !asset_serials.contains_key(&record.asset_id) {
                let serial = self
                    .asset_repo
                    .find_by_id(record.asset_id)
                    .await?
                    .map(|asset| asset.serial_number)
                    .unwrap_or_default();
                asset_serials.insert(record.asset_id, serial);
            }
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(REPAIR_HEADERS)?;
        for record in &records {
            let spare_parts = record
                .spare_part_ids
                .iter()
                .filter_map(|id| part_serials.get(id).map(String::as_str))
                .collect::<Vec<_>>()
                .join(SPARE_PART_SEPARATOR);

            writer.write_record([
                record.id.to_string(),
                record.repair_number.clone(),
                asset_serials.get(&record.asset_id).cloned().unwrap_or_default(),
                departments.get(&record.department_id).cloned().unwrap_or_default(),
                record.applicant.clone(),
                record.fault_description.clone(),
                suppliers.get(&record.supplier_id).cloned().unwrap_or_default(),
                record.repair_type.label().to_string(),
                record.repair_status.label().to_string(),
                spare_parts,
                record
                    .repair_start_time
                    .map(|start| self.format_datetime(start))
                    .unwrap_or_default(),
                record.duration_display(),
                record
                    .creator_id
                    .and_then(|id| creators.get(&id).cloned())
                    .unwrap_or_default(),
                self.format_datetime(record.created_at),
                self.format_datetime(record.updated_at),
            ])?;
        }

        info!(
            actor = %guard.actor_id(),
            action = "repair.export",
            rows = records.len(),
            "repair records exported"
        );
        finish(writer)
    }
}

fn apply_row(asset: &mut Asset, row: &AssetRow, refs: &ResolvedRefs) {
    asset.name = row.name.clone();
    asset.location = row.location.clone();
    asset.asset_type = row.asset_type;
    asset.business_line_id = refs.business_line_id;
    asset.department_id = refs.department_id;
    asset.supplier_id = refs.supplier_id;
    asset.purchase_date = row.purchase_date;
    asset.warranty_months = row.warranty_months;
    asset.price = row.price;
    asset.status = row.status;
    asset.is_active = row.is_active;
    asset.remark = row.remark.clone();
}

fn same_content(left: &Asset, right: &Asset) -> bool {
    left.name == right.name
        && left.location == right.location
        && left.asset_type == right.asset_type
        && left.business_line_id == right.business_line_id
        && left.department_id == right.department_id
        && left.supplier_id == right.supplier_id
        && left.purchase_date == right.purchase_date
        && left.warranty_months == right.warranty_months
        && left.price == right.price
        && left.status == right.status
        && left.is_active == right.is_active
        && left.remark == right.remark
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| AppError::InternalError(anyhow::anyhow!("csv flush failed: {err}")))
}

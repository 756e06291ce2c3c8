//! Save-time rules for repair records: daily sequential numbers, elapsed
//! repair duration, and the start-time sanity check.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::config::RepairConfig;
use crate::domain::RepairRecord;
use crate::error::{AppError, AppResult};

pub const REPAIR_NUMBER_MARKER: &str = "WX";
const SEQUENCE_WIDTH: usize = 4;
const SEQUENCE_MAX: u32 = 9_999;

/// `WX` followed by the calendar day, e.g. `WX20261019`.
pub fn repair_number_prefix(date: NaiveDate) -> String {
    format!("{REPAIR_NUMBER_MARKER}{}", date.format("%Y%m%d"))
}

/// Next number for `date`, given the day's highest number so far.
///
/// The sequence is global for the day and starts at `0001`.
pub fn allocate_number(date: NaiveDate, last_allocated: Option<&str>) -> AppResult<String> {
    let prefix = repair_number_prefix(date);
    let next = match last_allocated {
        None => 1,
        Some(last) => {
            let suffix = last
                .strip_prefix(prefix.as_str())
                .filter(|suffix| suffix.len() == SEQUENCE_WIDTH)
                .ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!(
                        "repair number {last} does not belong to {prefix}"
                    ))
                })?;
            let sequence: u32 = suffix.parse().map_err(|_| {
                AppError::InternalError(anyhow::anyhow!(
                    "repair number {last} has a non-numeric sequence"
                ))
            })?;
            sequence + 1
        }
    };

    if next > SEQUENCE_MAX {
        return Err(AppError::Conflict(format!(
            "repair numbers for {prefix} are exhausted"
        )));
    }

    Ok(format!("{prefix}{next:0width$}", width = SEQUENCE_WIDTH))
}

/// Runs before every persist of a repair record.
///
/// A terminal record gets `now - start` as its duration on each save, so an
/// edited closed record keeps accruing time.
pub fn prepare_for_save(record: &mut RepairRecord, now: DateTime<Utc>) -> AppResult<()> {
    if let Some(start) = record.repair_start_time {
        if start > now {
            return Err(AppError::field_error(
                "repair_start_time",
                "future",
                "repair start time cannot be in the future",
            ));
        }
        if record.repair_status.is_terminal() {
            record.set_repair_duration(now - start);
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RepairLifecycle {
    business_offset: FixedOffset,
    max_allocation_attempts: u32,
}

impl RepairLifecycle {
    pub fn new(config: &RepairConfig) -> AppResult<Self> {
        let business_offset = config.business_offset().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "invalid business utc offset: {} minutes",
                config.utc_offset_minutes
            ))
        })?;
        Ok(Self {
            business_offset,
            max_allocation_attempts: config.max_allocation_attempts.max(1),
        })
    }

    /// Calendar day the repair number is drawn from.
    pub fn business_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.business_offset).date_naive()
    }

    pub fn max_allocation_attempts(&self) -> u32 {
        self.max_allocation_attempts
    }

    /// New records start the clock at creation unless told otherwise.
    pub fn prepare_new(&self, record: &mut RepairRecord, now: DateTime<Utc>) -> AppResult<()> {
        record.repair_start_time.get_or_insert(now);
        prepare_for_save(record, now)
    }

    pub fn prepare_for_save(&self, record: &mut RepairRecord, now: DateTime<Utc>) -> AppResult<()> {
        prepare_for_save(record, now)
    }
}

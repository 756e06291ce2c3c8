use chrono::FixedOffset;
use serde::Deserialize;

use super::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct RepairConfig {
    /// Offset of the business calendar day used for repair numbers.
    #[serde(default = "crate::config::defaults::default_repair_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "crate::config::defaults::default_repair_max_allocation_attempts")]
    pub max_allocation_attempts: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: crate::config::defaults::default_repair_utc_offset_minutes(),
            max_allocation_attempts:
                crate::config::defaults::default_repair_max_allocation_attempts(),
        }
    }
}

impl RepairConfig {
    pub fn business_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business_offset().is_none() {
            return Err(ConfigError::Invalid(format!(
                "repair.utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            )));
        }
        if self.max_allocation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "repair.max_allocation_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

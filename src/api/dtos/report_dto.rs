use serde::{Deserialize, Serialize};

/// One ring segment; leaves carry a value and no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartNode {
    pub name: String,
    pub value: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChartNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstChart {
    pub title: String,
    pub total: i64,
    pub data: Vec<ChartNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairChartGrouping {
    #[default]
    Department,
    Supplier,
}

#[derive(Debug, Default, Deserialize)]
pub struct RepairChartParams {
    #[serde(default)]
    pub group_by: RepairChartGrouping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    /// 1-based line in the uploaded file, header included.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

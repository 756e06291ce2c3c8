use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::dtos::{ChartNode, RepairChartGrouping, SunburstChart};
use crate::application::access_guard::AccessGuard;
use crate::domain::Actor;
use crate::error::AppResult;
use crate::infrastructure::repositories::{
    AssetRepository, ManagerAssignmentRepository, NestedCount, RepairGrouping, RepairRepository,
};

/// Inner key for repairs that used no spare parts.
pub const NO_SPARE_PART: &str = "(none)";

#[derive(Clone)]
pub struct ChartService {
    asset_repo: Arc<dyn AssetRepository>,
    repair_repo: Arc<dyn RepairRepository>,
    assignment_repo: Arc<dyn ManagerAssignmentRepository>,
}

impl ChartService {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        repair_repo: Arc<dyn RepairRepository>,
        assignment_repo: Arc<dyn ManagerAssignmentRepository>,
    ) -> Self {
        Self {
            asset_repo,
            repair_repo,
            assignment_repo,
        }
    }

    /// Department -> asset type -> count.
    pub async fn assets(&self, actor: &Actor) -> AppResult<SunburstChart> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        let rows = self
            .asset_repo
            .count_by_department_and_type(&guard.list_scope())
            .await?;
        Ok(build_chart("Asset distribution", "total assets", rows))
    }

    /// Department or supplier -> spare-part type -> count.
    pub async fn repairs(
        &self,
        actor: &Actor,
        grouping: RepairChartGrouping,
    ) -> AppResult<SunburstChart> {
        let guard = AccessGuard::load(self.assignment_repo.as_ref(), actor).await?;
        let (grouping, title) = match grouping {
            RepairChartGrouping::Department => {
                (RepairGrouping::Department, "Repairs by department")
            }
            RepairChartGrouping::Supplier => (RepairGrouping::Supplier, "Repairs by supplier"),
        };
        let rows = self
            .repair_repo
            .count_by_part_type(&guard.list_scope(), grouping)
            .await?;
        Ok(build_chart(title, "total spare part usages", rows))
    }
}

/// Folds flat leaf counts into a sorted two-level tree.
pub fn build_chart(title: &str, total_label: &str, rows: Vec<NestedCount>) -> SunburstChart {
    let mut tree: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for row in rows {
        let inner = row.inner.unwrap_or_else(|| NO_SPARE_PART.to_string());
        *tree.entry(row.outer).or_default().entry(inner).or_default() += row.count;
    }

    let data: Vec<ChartNode> = tree
        .into_iter()
        .map(|(outer, inner)| {
            let children: Vec<ChartNode> = inner
                .into_iter()
                .map(|(name, value)| ChartNode {
                    name,
                    value,
                    children: Vec::new(),
                })
                .collect();
            ChartNode {
                name: outer,
                value: children.iter().map(|child| child.value).sum(),
                children,
            }
        })
        .collect();

    let total = data.iter().map(|node| node.value).sum();
    SunburstChart {
        title: format!("{title} ({total_label}: {total})"),
        total,
        data,
    }
}

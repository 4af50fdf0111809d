use log::info;

use crate::binning::PrestigeCategories;
use crate::crosstab::{CompleteCases, CrossTab, cross_tabulate, cross_tabulate_names};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::selection::{XColumn, YColumn};
use crate::summary::{GroupSummary, summarize_by_sex};

/// Everything derived from the dataset at startup.
///
/// Built once after the load and shared read-only by every request.
#[derive(Clone, Debug)]
pub struct DashboardContext {
    dataset: Dataset,
    cases: CompleteCases,
    summary: Vec<GroupSummary>,
    prestige: PrestigeCategories,
}

impl DashboardContext {
    pub fn new(dataset: Dataset) -> Self {
        let cases = CompleteCases::from_dataset(&dataset);
        let summary = summarize_by_sex(&dataset);
        let prestige = PrestigeCategories::from_dataset(&dataset);

        info!(
            "dashboard context ready: {} respondents, {} complete cases, {} prestige rows",
            dataset.len(),
            cases.len(),
            prestige.rows().len()
        );

        DashboardContext {
            dataset,
            cases,
            summary,
            prestige,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn cases(&self) -> &CompleteCases {
        &self.cases
    }

    pub fn summary(&self) -> &[GroupSummary] {
        &self.summary
    }

    pub fn prestige(&self) -> &PrestigeCategories {
        &self.prestige
    }

    pub fn cross_tab(&self, x: XColumn, y: YColumn) -> CrossTab {
        cross_tabulate(&self.cases, x, y)
    }

    /// Cross-tab for names submitted by the UI.
    pub fn cross_tab_by_name(&self, x: &str, y: &str) -> Result<CrossTab> {
        cross_tabulate_names(&self.cases, x, y)
    }
}

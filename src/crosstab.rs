//! Cross-tabulation of one attitude column against one demographic column,
//! reshaped into long format for a grouped bar chart.

use indexmap::IndexSet;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::selection::{Categorical, XColumn, YColumn, parse_selection};

/// A respondent projected onto the nine selectable columns.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseRow {
    x: [String; 6],
    y: [String; 3],
}

impl CaseRow {
    pub fn x(&self, column: XColumn) -> &str {
        &self.x[column.index()]
    }

    pub fn y(&self, column: YColumn) -> &str {
        &self.y[column.index()]
    }
}

/// Rows with a value in every selectable column.
///
/// Built once from the dataset; every cross-tab is computed over this
/// subset, whichever pair of columns is selected.
#[derive(Clone, Debug, Default)]
pub struct CompleteCases {
    rows: Vec<CaseRow>,
}

impl CompleteCases {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let rows = dataset
            .respondents()
            .iter()
            .filter_map(|r| {
                let mut x: [String; 6] = Default::default();
                for column in XColumn::ALL {
                    x[column.index()] = column.label(r)?.into_owned();
                }
                let mut y: [String; 3] = Default::default();
                for column in YColumn::ALL {
                    y[column.index()] = column.label(r)?.into_owned();
                }
                Some(CaseRow { x, y })
            })
            .collect();

        CompleteCases { rows }
    }

    pub fn rows(&self) -> &[CaseRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One (x category, y category, count) triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrossTabRow {
    pub x_value: String,
    pub y_value: String,
    pub count: u64,
}

/// Long-format contingency table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossTab {
    pub x: XColumn,
    pub y: YColumn,
    /// X categories in first-appearance order
    pub x_categories: Vec<String>,
    /// Y categories in first-appearance order
    pub y_categories: Vec<String>,
    /// `x_categories.len() * y_categories.len()` rows, grouped by x
    pub rows: Vec<CrossTabRow>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.rows.iter().map(|r| r.count).max().unwrap_or(0)
    }

    /// Count for a category pair, `None` if either category was not observed.
    pub fn count(&self, x_value: &str, y_value: &str) -> Option<u64> {
        let i = self.x_categories.iter().position(|c| c == x_value)?;
        let j = self.y_categories.iter().position(|c| c == y_value)?;
        Some(self.rows[i * self.y_categories.len() + j].count)
    }
}

/// Count complete cases for every observed (x, y) pair.
///
/// The table is dense over the observed categories: pairs that never occur
/// together appear with a count of zero. An empty subset gives an empty
/// table.
pub fn cross_tabulate(cases: &CompleteCases, x: XColumn, y: YColumn) -> CrossTab {
    let mut x_categories: IndexSet<&str> = IndexSet::new();
    let mut y_categories: IndexSet<&str> = IndexSet::new();
    let mut cells: Vec<(usize, usize)> = Vec::with_capacity(cases.len());

    for row in cases.rows() {
        let (i, _) = x_categories.insert_full(row.x(x));
        let (j, _) = y_categories.insert_full(row.y(y));
        cells.push((i, j));
    }

    let width = y_categories.len();
    let mut counts = vec![0u64; x_categories.len() * width];
    for (i, j) in cells {
        counts[i * width + j] += 1;
    }

    let mut rows = Vec::with_capacity(counts.len());
    for (i, x_value) in x_categories.iter().enumerate() {
        for (j, y_value) in y_categories.iter().enumerate() {
            rows.push(CrossTabRow {
                x_value: x_value.to_string(),
                y_value: y_value.to_string(),
                count: counts[i * width + j],
            });
        }
    }

    CrossTab {
        x,
        y,
        x_categories: x_categories.into_iter().map(str::to_string).collect(),
        y_categories: y_categories.into_iter().map(str::to_string).collect(),
        rows,
    }
}

/// Validate dropdown names, then cross-tabulate.
///
/// Names outside the whitelists are rejected before the data is touched.
pub fn cross_tabulate_names(cases: &CompleteCases, x: &str, y: &str) -> Result<CrossTab> {
    let (x, y) = parse_selection(x, y)?;
    Ok(cross_tabulate(cases, x, y))
}

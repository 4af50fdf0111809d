use serde::Serialize;

use crate::dataset::Dataset;

/// Number of occupational-prestige categories.
pub const PRESTIGE_BIN_COUNT: usize = 6;

/// Equal-width, right-closed bins over an observed range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bins {
    /// `count + 1` ascending edges; bin `i` is `(edges[i], edges[i + 1]]`
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Bins {
    /// Split `[min, max]` of `values` into `count` bins.
    ///
    /// The lowest edge is pushed down by 0.1% of the range so the minimum
    /// lands in the first bin. Returns `None` for an empty sample or zero
    /// bins.
    pub fn equal_width(values: &[f64], count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        let mut edges: Vec<f64>;
        if min == max {
            let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
            let (lo, hi) = (min - pad, max + pad);
            let step = (hi - lo) / count as f64;
            edges = (0..=count).map(|i| lo + step * i as f64).collect();
        } else {
            let step = (max - min) / count as f64;
            edges = (0..=count).map(|i| min + step * i as f64).collect();
            edges[count] = max;
            edges[0] -= (max - min) * 0.001;
        }

        let labels = (0..count)
            .map(|i| {
                let lo = if i == 0 {
                    edges[0].floor()
                } else {
                    edges[i].round()
                };
                format!("{} to {}", lo, edges[i + 1].round())
            })
            .collect();

        Some(Bins { edges, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Bin index holding `value`, `None` outside the binned range.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(value > self.edges[0]) {
            return None;
        }
        (0..self.len()).find(|&i| value <= self.edges[i + 1])
    }
}

/// A respondent with a prestige category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrestigeRow {
    pub sex: Option<String>,
    pub income: Option<f64>,
    pub job_prestige: f64,
    pub bin: usize,
}

/// Respondents labelled with their prestige category.
#[derive(Clone, Debug, Default)]
pub struct PrestigeCategories {
    bins: Option<Bins>,
    rows: Vec<PrestigeRow>,
}

impl PrestigeCategories {
    /// Bin occupational prestige into six categories. Rows with missing
    /// prestige are excluded.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let values: Vec<f64> = dataset
            .respondents()
            .iter()
            .filter_map(|r| r.job_prestige)
            .collect();

        let Some(bins) = Bins::equal_width(&values, PRESTIGE_BIN_COUNT) else {
            return PrestigeCategories::default();
        };

        let rows = dataset
            .respondents()
            .iter()
            .filter_map(|r| {
                let prestige = r.job_prestige?;
                Some(PrestigeRow {
                    sex: r.sex.clone(),
                    income: r.income,
                    job_prestige: prestige,
                    bin: bins.index_of(prestige)?,
                })
            })
            .collect();

        PrestigeCategories {
            bins: Some(bins),
            rows,
        }
    }

    pub fn bins(&self) -> Option<&Bins> {
        self.bins.as_ref()
    }

    pub fn rows(&self) -> &[PrestigeRow] {
        &self.rows
    }

    pub fn label(&self, bin: usize) -> Option<&str> {
        self.bins.as_ref()?.labels().get(bin).map(String::as_str)
    }

    /// `(sex, income)` samples per category, dropping rows missing either.
    pub fn income_by_bin(&self) -> Vec<Vec<(&str, f64)>> {
        let n = self.bins.as_ref().map_or(0, Bins::len);
        let mut out = vec![Vec::new(); n];
        for row in &self.rows {
            if let (Some(sex), Some(income)) = (row.sex.as_deref(), row.income) {
                out[row.bin].push((sex, income));
            }
        }
        out
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{Dataset, Respondent};
use crate::stats::mean;

/// Column headers of the rendered summary table.
pub const SUMMARY_HEADERS: [&str; 5] = [
    "Gender",
    "Avg Socioeconomic Index",
    "Avg Income",
    "Avg Years of Education",
    "Avg Job Prestige",
];

/// Mean of four numeric fields for one sex.
///
/// Each mean covers only the rows where that field is present, so a
/// respondent missing income still counts toward average education.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub gender: String,
    pub avg_socioeconomic_index: Option<f64>,
    pub avg_income: Option<f64>,
    pub avg_education: Option<f64>,
    pub avg_job_prestige: Option<f64>,
}

impl GroupSummary {
    /// Cells of one table row, rounded to two decimals; missing means are blank.
    pub fn cells(&self) -> [String; 5] {
        let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", round2(v))).unwrap_or_default();
        [
            self.gender.clone(),
            fmt(self.avg_socioeconomic_index),
            fmt(self.avg_income),
            fmt(self.avg_education),
            fmt(self.avg_job_prestige),
        ]
    }
}

#[derive(Default)]
struct Accumulator {
    socioeconomic_index: Vec<f64>,
    income: Vec<f64>,
    education: Vec<f64>,
    job_prestige: Vec<f64>,
}

impl Accumulator {
    fn push(&mut self, r: &Respondent) {
        self.socioeconomic_index.extend(r.socioeconomic_index);
        self.income.extend(r.income);
        self.education.extend(r.education);
        self.job_prestige.extend(r.job_prestige);
    }
}

/// Group by sex and average each field independently.
///
/// Rows without a sex are left out; groups come back in lexicographic
/// order of the sex label.
pub fn summarize_by_sex(dataset: &Dataset) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in dataset.respondents() {
        if let Some(sex) = r.sex.as_deref() {
            groups.entry(sex).or_default().push(r);
        }
    }

    groups
        .into_iter()
        .map(|(sex, acc)| GroupSummary {
            gender: sex.to_string(),
            avg_socioeconomic_index: mean(&acc.socioeconomic_index),
            avg_income: mean(&acc.income),
            avg_education: mean(&acc.education),
            avg_job_prestige: mean(&acc.job_prestige),
        })
        .collect()
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

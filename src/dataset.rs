use serde::Serialize;

/// One survey respondent.
///
/// Every field except the identifier may be missing. Missing-value
/// sentinels from the raw file are already mapped to `None` here, so a
/// categorical field never holds a placeholder such as `"IAP"`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Respondent {
    /// Unique respondent identifier
    pub id: u64,

    /// Survey sample weight
    pub weight: Option<f64>,

    /// `male` or `female`
    pub sex: Option<String>,

    /// Years of formal education
    pub education: Option<f64>,

    /// Region of the country where the respondent lives
    pub region: Option<String>,

    /// Age in years; `89 or older` is stored as 89
    pub age: Option<f64>,

    /// Personal annual income
    pub income: Option<f64>,

    /// Occupational prestige score
    pub job_prestige: Option<f64>,
    pub mother_job_prestige: Option<f64>,
    pub father_job_prestige: Option<f64>,

    pub socioeconomic_index: Option<f64>,

    /// "On the whole, how satisfied are you with the work you do?"
    pub satjob: Option<String>,

    // Agreement with the five gender-role statements
    pub relationship: Option<String>,
    pub male_breadwinner: Option<String>,
    pub men_bettersuited: Option<String>,
    pub child_suffer: Option<String>,
    pub men_overwork: Option<String>,
}

/// The loaded survey table. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    respondents: Vec<Respondent>,
}

impl Dataset {
    pub fn new(respondents: Vec<Respondent>) -> Self {
        Dataset { respondents }
    }

    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// `(sex, value)` pairs for a numeric field, skipping rows missing either.
    pub fn numeric_by_sex<F>(&self, field: F) -> Vec<(&str, f64)>
    where
        F: Fn(&Respondent) -> Option<f64>,
    {
        self.respondents
            .iter()
            .filter_map(|r| Some((r.sex.as_deref()?, field(r)?)))
            .collect()
    }
}

/// Render a numeric value as a category label.
///
/// Whole numbers lose their fractional part so that years of education read
/// `12` rather than `12.0`.
pub fn numeric_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

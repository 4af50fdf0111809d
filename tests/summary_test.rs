use gss_dashboard::summary::{SUMMARY_HEADERS, round2, summarize_by_sex};
use gss_dashboard::{Dataset, Respondent};

fn person(
    id: u64,
    sex: Option<&str>,
    sei: Option<f64>,
    income: Option<f64>,
    educ: Option<f64>,
    prestige: Option<f64>,
) -> Respondent {
    Respondent {
        id,
        sex: sex.map(str::to_string),
        socioeconomic_index: sei,
        income,
        education: educ,
        job_prestige: prestige,
        ..Default::default()
    }
}

#[test]
fn means_skip_missing_values_per_field() {
    let dataset = Dataset::new(vec![
        person(1, Some("male"), Some(40.0), Some(10000.0), Some(12.0), Some(40.0)),
        // No income, but education and prestige still count
        person(2, Some("male"), None, None, Some(16.0), Some(50.0)),
        person(3, Some("male"), Some(60.0), Some(30000.0), Some(14.0), None),
        person(4, Some("female"), Some(55.0), Some(25000.0), Some(18.0), Some(60.0)),
    ]);

    let summary = summarize_by_sex(&dataset);
    assert_eq!(summary.len(), 2);

    let male = &summary[1];
    assert_eq!(male.gender, "male");
    assert_eq!(male.avg_income, Some(20000.0));
    assert_eq!(male.avg_education, Some(14.0));
    assert_eq!(male.avg_job_prestige, Some(45.0));
    assert_eq!(male.avg_socioeconomic_index, Some(50.0));

    let female = &summary[0];
    assert_eq!(female.gender, "female");
    assert_eq!(female.avg_income, Some(25000.0));
}

#[test]
fn rows_without_sex_are_left_out() {
    let dataset = Dataset::new(vec![
        person(1, None, Some(99.0), Some(99999.0), Some(20.0), Some(80.0)),
        person(2, Some("female"), Some(30.0), Some(1000.0), Some(10.0), Some(20.0)),
    ]);
    let summary = summarize_by_sex(&dataset);
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].avg_income, Some(1000.0));
}

#[test]
fn group_without_values_has_no_mean() {
    let dataset = Dataset::new(vec![person(1, Some("male"), None, None, Some(12.0), None)]);
    let summary = summarize_by_sex(&dataset);
    assert_eq!(summary[0].avg_income, None);

    let cells = summary[0].cells();
    assert_eq!(cells[0], "male");
    assert_eq!(cells[2], "");
    assert_eq!(cells[3], "12.00");
}

#[test]
fn table_cells_round_to_two_decimals() {
    let dataset = Dataset::new(vec![
        person(1, Some("female"), Some(1.0), Some(1.0), Some(1.0), Some(1.0)),
        person(2, Some("female"), Some(2.0), Some(2.0), Some(2.0), Some(2.0)),
        person(3, Some("female"), Some(2.0), Some(2.0), Some(2.0), Some(2.0)),
    ]);
    let cells = summarize_by_sex(&dataset)[0].cells();
    assert_eq!(cells[1], "1.67");
    assert_eq!(SUMMARY_HEADERS[1], "Avg Socioeconomic Index");
    assert_eq!(round2(44.126), 44.13);
}

#[test]
fn empty_dataset_has_empty_summary() {
    assert!(summarize_by_sex(&Dataset::default()).is_empty());
}

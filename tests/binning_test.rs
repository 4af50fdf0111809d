use gss_dashboard::binning::{Bins, PRESTIGE_BIN_COUNT, PrestigeCategories};
use gss_dashboard::{Dataset, Respondent};

#[test]
fn gss_prestige_range_labels() {
    let values: Vec<f64> = (16..=80).map(f64::from).collect();
    let bins = Bins::equal_width(&values, PRESTIGE_BIN_COUNT).expect("non-empty sample");

    assert_eq!(bins.len(), 6);
    assert_eq!(
        bins.labels(),
        ["15 to 27", "27 to 37", "37 to 48", "48 to 59", "59 to 69", "69 to 80"]
    );
    assert_eq!(bins.edges().len(), 7);
}

#[test]
fn extremes_land_in_outer_bins() {
    let values = [16.0, 30.0, 80.0];
    let bins = Bins::equal_width(&values, 6).expect("non-empty sample");
    assert_eq!(bins.index_of(16.0), Some(0));
    assert_eq!(bins.index_of(80.0), Some(5));
    assert_eq!(bins.index_of(81.0), None);
    assert_eq!(bins.index_of(10.0), None);
}

#[test]
fn bins_are_right_closed() {
    let values = [0.0, 60.0];
    let bins = Bins::equal_width(&values, 6).expect("non-empty sample");
    // Edges at 0, 10, 20, ...: a value on an edge belongs to the lower bin
    assert_eq!(bins.index_of(10.0), Some(0));
    assert_eq!(bins.index_of(10.5), Some(1));
    assert_eq!(bins.index_of(20.0), Some(1));
}

#[test]
fn constant_and_empty_samples() {
    let bins = Bins::equal_width(&[50.0, 50.0], 6).expect("constant sample still bins");
    assert_eq!(bins.len(), 6);
    assert!(bins.index_of(50.0).is_some());

    assert!(Bins::equal_width(&[], 6).is_none());
    assert!(Bins::equal_width(&[1.0], 0).is_none());
}

#[test]
fn missing_prestige_is_excluded() {
    let respondent = |id: u64, prestige: Option<f64>, income: Option<f64>| Respondent {
        id,
        sex: Some(if id % 2 == 0 { "female" } else { "male" }.to_string()),
        job_prestige: prestige,
        income,
        ..Default::default()
    };
    let dataset = Dataset::new(vec![
        respondent(1, Some(16.0), Some(10000.0)),
        respondent(2, None, Some(20000.0)),
        respondent(3, Some(80.0), None),
        respondent(4, Some(45.0), Some(40000.0)),
    ]);

    let prestige = PrestigeCategories::from_dataset(&dataset);
    assert_eq!(prestige.rows().len(), 3);
    assert_eq!(prestige.label(0), Some("15 to 27"));

    // The box chart also needs income
    let by_bin = prestige.income_by_bin();
    assert_eq!(by_bin.len(), 6);
    let total: usize = by_bin.iter().map(Vec::len).sum();
    assert_eq!(total, 2);
    assert_eq!(by_bin[0], vec![("male", 10000.0)]);
    assert_eq!(by_bin[2], vec![("female", 40000.0)]);
}

#[test]
fn no_prestige_values_means_no_bins() {
    let dataset = Dataset::new(vec![Respondent { id: 1, ..Default::default() }]);
    let prestige = PrestigeCategories::from_dataset(&dataset);
    assert!(prestige.bins().is_none());
    assert!(prestige.rows().is_empty());
    assert!(prestige.income_by_bin().is_empty());
}

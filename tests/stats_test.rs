use gss_dashboard::stats::{
    BoxStats, LinearFit, kernel_density, linspace, mean, quantile, sorted, std_dev,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn mean_and_spread() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[2.0, 4.0, 9.0]), Some(5.0));
    assert_eq!(std_dev(&[1.0]), None);
    assert!(approx(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(), 2.138089935299395));
}

#[test]
fn quantiles_interpolate_between_ranks() {
    let s = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(quantile(&s, 0.0), Some(1.0));
    assert_eq!(quantile(&s, 0.25), Some(1.75));
    assert_eq!(quantile(&s, 0.5), Some(2.5));
    assert_eq!(quantile(&s, 1.0), Some(4.0));
    assert_eq!(quantile(&[], 0.5), None);
}

#[test]
fn box_stats_sort_their_input() {
    let stats = BoxStats::from_values(&[9.0, 1.0, 5.0, 3.0, 7.0]).unwrap();
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.q1, 3.0);
    assert_eq!(stats.median, 5.0);
    assert_eq!(stats.q3, 7.0);
    assert_eq!(stats.max, 9.0);
    assert!(BoxStats::from_values(&[]).is_none());
    assert_eq!(sorted(&[f64::NAN, 2.0, 1.0]), vec![1.0, 2.0]);
}

#[test]
fn least_squares_recovers_exact_line() {
    let points: Vec<(f64, f64)> = (0..10).map(|x| (x as f64, 2.0 * x as f64 + 1.0)).collect();
    let fit = LinearFit::ordinary_least_squares(&points).unwrap();
    assert!(approx(fit.slope, 2.0));
    assert!(approx(fit.intercept, 1.0));
    assert!(approx(fit.predict(20.0), 41.0));

    assert!(LinearFit::ordinary_least_squares(&[(1.0, 1.0)]).is_none());
    assert!(LinearFit::ordinary_least_squares(&[(3.0, 1.0), (3.0, 5.0)]).is_none());
}

#[test]
fn density_peaks_at_the_data() {
    let values = [-1.0, 0.0, 0.0, 1.0];
    let grid = linspace(-3.0, 3.0, 7);
    assert_eq!(grid, vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);

    let density = kernel_density(&values, &grid);
    assert_eq!(density.len(), 7);
    assert!(density[3] > density[2] && density[3] > density[4]);
    assert!(approx(density[2], density[4]));
    assert!(density.iter().all(|d| *d >= 0.0));

    assert_eq!(kernel_density(&[], &grid), vec![0.0; 7]);
    assert!(kernel_density(&[5.0, 5.0], &[5.0])[0].is_finite());
}

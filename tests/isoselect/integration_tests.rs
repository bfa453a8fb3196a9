#![cfg(feature = "dev")]
use approx::assert_abs_diff_eq;
use isoselect::prelude::*;
use ndarray::Array1;

/// Straight-line curve of slope 2 in magnitude per color.
fn line_curve() -> Isochrone<f64> {
    let color = vec![0.0, 0.5, 1.0, 1.5, 2.0];
    let mag = vec![10.0, 11.0, 12.0, 13.0, 14.0];
    Isochrone::new(&color, &mag).unwrap()
}

fn line_stars() -> (Vec<f64>, Vec<f64>) {
    (vec![0.3, 0.7, 1.2, 3.0], vec![10.5, 11.3, 12.1, 15.0])
}

#[test]
fn test_band_euclidean_sequential() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let res = IsoSelect::new()
        .metric(Euclidean)
        .threshold(0.6)
        .policy(Band)
        .parallel(false)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    // Nearest-sample distances: sqrt(0.29), sqrt(0.13), sqrt(0.05), sqrt(2)
    assert_eq!(res.mask, vec![true, true, true, false]);
    assert_abs_diff_eq!(res.distances[0], 0.29_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(res.distances[1], 0.13_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(res.distances[2], 0.05_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(res.distances[3], 2.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_band_euclidean_parallel() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let res = IsoSelect::new()
        .metric(Euclidean)
        .threshold(0.6)
        .policy(Band)
        .parallel(true)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(res.mask, vec![true, true, true, false]);
    assert_eq!(res.selected_count(), 3);
}

#[test]
fn test_band_euclidean_tight_threshold() {
    // At 0.3 only the third star sits close enough to a curve sample.
    let curve = line_curve();
    let (color, mag) = line_stars();

    let res = IsoSelect::new()
        .metric(Euclidean)
        .threshold(0.3)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(res.mask, vec![false, false, true, false]);
}

#[test]
fn test_band_perpendicular() {
    // The first three stars sit close to the line itself even though their
    // nearest samples are further away; the fourth lies past the curve end.
    let curve = line_curve();
    let (color, mag) = line_stars();

    let res = IsoSelect::new()
        .metric(Perpendicular)
        .threshold(0.3)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(res.mask, vec![true, true, true, false]);
    assert_abs_diff_eq!(res.distances[0], 0.002_f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(res.distances[1], 0.002_f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(res.distances[2], 0.018_f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(res.distances[3], 2.0_f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn test_window_selection() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let mask = IsoSelect::new()
        .color_threshold(0.25)
        .mag_threshold(0.6)
        .policy(Window)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(mask, vec![true, true, true, false]);
}

#[test]
fn test_window_infinite_thresholds() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let mask = IsoSelect::new()
        .color_threshold(f64::INFINITY)
        .mag_threshold(f64::INFINITY)
        .policy(Window)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert!(mask.iter().all(|&m| m));
}

#[test]
fn test_window_zero_color_threshold() {
    // A zero threshold on one axis keeps only stars whose nearest sample
    // matches that axis exactly.
    let curve = line_curve();

    let mask = IsoSelect::new()
        .color_threshold(0.0)
        .mag_threshold(0.5)
        .policy(Window)
        .build()
        .unwrap()
        .select(&curve, &vec![1.0, 1.1], &vec![12.3, 12.0])
        .unwrap();

    assert_eq!(mask, vec![true, false]);
}

#[test]
fn test_ndarray_integration() {
    let iso_color = Array1::from_vec(vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    let iso_mag = Array1::from_vec(vec![10.0, 11.0, 12.0, 13.0, 14.0]);
    let curve = Isochrone::new(&iso_color, &iso_mag).unwrap();

    let star_color = Array1::from_vec(vec![0.3, 0.7, 1.2, 3.0]);
    let star_mag = Array1::from_vec(vec![10.5, 11.3, 12.1, 15.0]);

    let res = IsoSelect::new()
        .metric(Perpendicular)
        .threshold(0.3)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &star_color, &star_mag)
        .unwrap();

    assert_eq!(res.mask, vec![true, true, true, false]);
}

#[test]
fn test_idempotence() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let selector = IsoSelect::new()
        .metric(Perpendicular)
        .threshold(0.3)
        .policy(Band)
        .build()
        .unwrap();

    let first = selector.select(&curve, &color, &mag).unwrap();
    let second = selector.select(&curve, &color, &mag).unwrap();

    assert_eq!(first.mask, second.mask);
    assert_eq!(first.distances, second.distances);
}

#[test]
fn test_threshold_monotonicity() {
    // Raising the threshold never deselects a previously selected star.
    let curve = line_curve();
    let (color, mag) = line_stars();

    let mut previous: Option<Vec<bool>> = None;
    for threshold in [0.1, 0.3, 0.6, 1.0, 2.0] {
        let res = IsoSelect::new()
            .metric(Euclidean)
            .threshold(threshold)
            .policy(Band)
            .build()
            .unwrap()
            .select(&curve, &color, &mag)
            .unwrap();

        if let Some(prev) = previous {
            for (&was, &now) in prev.iter().zip(res.mask.iter()) {
                assert!(!was || now, "threshold {threshold} dropped a star");
            }
        }
        previous = Some(res.mask);
    }
}

#[test]
fn test_inclusive_boundary() {
    // A star exactly threshold away from the curve is selected.
    let curve = line_curve();

    let res = IsoSelect::new()
        .metric(Euclidean)
        .threshold(0.5)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &vec![0.0], &vec![10.5])
        .unwrap();

    assert_eq!(res.distances[0], 0.5);
    assert!(res.mask[0]);
}

#[test]
fn test_on_curve_distances_are_zero() {
    let iso_color = vec![0.0, 1.0, 2.0, 3.0];
    let iso_mag = vec![10.0, 11.0, 12.0, 13.0];
    let curve = Isochrone::new(&iso_color, &iso_mag).unwrap();

    for metric in [Euclidean, Perpendicular] {
        let distances = compute_distances(&curve, &iso_color, &iso_mag, metric).unwrap();
        assert!(distances.iter().all(|&d| d == 0.0));
    }
}

#[test]
fn test_compute_distances_matches_selection() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let distances = compute_distances(&curve, &color, &mag, Euclidean).unwrap();
    let res = IsoSelect::new()
        .metric(Euclidean)
        .threshold(0.6)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(distances, res.distances);
}

#[test]
fn test_empty_query_set() {
    let curve = line_curve();
    let empty: Vec<f64> = Vec::new();

    let res = IsoSelect::new()
        .threshold(0.5)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &empty, &empty)
        .unwrap();

    assert!(res.is_empty());
    assert!(res.distances.is_empty());
}

#[test]
fn test_error_mismatched_queries() {
    let curve = line_curve();
    let selector = IsoSelect::new().threshold(0.5).policy(Band).build().unwrap();

    let err = selector.select(&curve, &vec![0.0, 1.0, 2.0], &vec![10.0, 11.0]);
    assert!(matches!(err, Err(SelectError::InvalidInput(_))));
}

#[test]
fn test_error_non_finite_query() {
    let curve = line_curve();
    let selector = IsoSelect::new().threshold(0.5).policy(Band).build().unwrap();

    let err = selector.select(&curve, &vec![0.0, f64::NAN], &vec![10.0, 11.0]);
    assert!(matches!(err, Err(SelectError::InvalidInput(_))));
}

#[test]
fn test_error_single_sample_curve() {
    let err = Isochrone::new(&vec![1.0], &vec![11.0]);
    assert!(matches!(err, Err(SelectError::InvalidCurve(_))));
}

#[test]
fn test_error_mismatched_curve_arrays() {
    let err = Isochrone::new(&vec![0.0, 1.0, 2.0], &vec![10.0, 11.0]);
    assert!(matches!(err, Err(SelectError::InvalidCurve(_))));
}

#[test]
fn test_error_non_finite_curve() {
    let err = Isochrone::new(&vec![0.0, f64::INFINITY], &vec![10.0, 11.0]);
    assert!(matches!(err, Err(SelectError::InvalidCurve(_))));
}

#[test]
fn test_error_negative_threshold() {
    let err = IsoSelect::new().threshold(-1.0).policy(Band).build();
    assert!(matches!(err, Err(SelectError::InvalidThreshold(_))));

    let err = IsoSelect::new()
        .color_threshold(0.1)
        .mag_threshold(-0.5)
        .policy(Window)
        .build();
    assert!(matches!(err, Err(SelectError::InvalidThreshold(_))));
}

#[test]
fn test_error_missing_threshold() {
    let err = IsoSelect::new::<f64>().policy(Band).build();
    assert!(matches!(err, Err(SelectError::InvalidThreshold(_))));
}

#[test]
fn test_error_unknown_metric_parse() {
    let err = "invalid_metric".parse::<DistanceMetric>();
    match err {
        Err(SelectError::UnknownMetric(name)) => assert_eq!(name, "invalid_metric"),
        other => panic!("expected UnknownMetric, got {other:?}"),
    }
}

#[test]
fn test_error_unknown_metric_deferred() {
    let err = IsoSelect::new()
        .metric_name("manhattan")
        .threshold(0.5)
        .policy(Band)
        .build();
    assert!(matches!(err, Err(SelectError::UnknownMetric(_))));
}

#[test]
fn test_metric_name_accepted() {
    let curve = line_curve();
    let (color, mag) = line_stars();

    let res = IsoSelect::new()
        .metric_name("perpendicular")
        .threshold(0.3)
        .policy(Band)
        .build()
        .unwrap()
        .select(&curve, &color, &mag)
        .unwrap();

    assert_eq!(res.mask, vec![true, true, true, false]);
}

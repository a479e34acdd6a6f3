use rand::Rng;
use simchart::data_types::{Annotation, AxisPosition, DataView, Rectangle, Scale};
use simchart::{Axis, DialogFont};

/// X axis [0, 100] over 300 px, Y axis [0, 100] over 200 px, plot area
/// anchored at (40, 10).
fn measured_pair() -> (Axis, Axis) {
    let mut x = Axis::new(AxisPosition::HorizontalDown);
    x.set_annotation(Annotation::Value);
    x.set_explicit_range(0.0, 100.0);
    x.measure(300, 0, &DialogFont);

    let mut y = Axis::new(AxisPosition::VerticalLeft);
    y.set_explicit_range(0.0, 100.0);
    y.measure(0, 200, &DialogFont);

    let plot = Rectangle::new(40, 10, 300, 200);
    x.set_bound_rect(plot);
    y.set_bound_rect(plot);
    (x, y)
}

#[test]
fn test_transform_maps_midpoint_to_plot_center() {
    let (x, y) = measured_pair();
    let p = y.transform(50.0, 50.0, &x).unwrap();
    // Halfway along 300 px from x=40; halfway up 200 px from the bottom
    // edge at y=210
    assert_eq!(p.x, 190);
    assert_eq!(p.y, 110);
}

#[test]
fn test_transform_pixel_y_grows_downward() {
    let (x, y) = measured_pair();
    let low = y.transform(50.0, 0.0, &x).unwrap();
    let high = y.transform(50.0, 100.0, &x).unwrap();
    assert_eq!(low.y, 210);
    assert_eq!(high.y, 10);
}

#[test]
fn test_transform_saturates_far_values() {
    let (x, y) = measured_pair();
    let p = y.transform(1.0e9, 50.0, &x).unwrap();
    assert_eq!(p.x, 32000 + 40);

    let p = y.transform(50.0, -1.0e9, &x).unwrap();
    assert_eq!(p.y, 32000 + 210);
}

#[test]
fn test_transform_rejects_nan() {
    let (x, y) = measured_pair();
    assert!(y.transform(f64::NAN, 50.0, &x).is_none());
    assert!(y.transform(50.0, f64::NAN, &x).is_none());
}

#[test]
fn test_transform_rejects_non_positive_on_log_scale() {
    let (x, _) = measured_pair();
    let mut y = Axis::new(AxisPosition::VerticalLeft);
    y.set_explicit_range(1.0, 100.0);
    y.set_scale(Scale::Log);
    y.measure(0, 200, &DialogFont);
    y.set_bound_rect(Rectangle::new(40, 10, 300, 200));

    assert!(y.transform(50.0, 0.0, &x).is_none());
    assert!(y.transform(50.0, -1.0, &x).is_none());
    assert!(y.transform(50.0, 10.0, &x).is_some());
}

#[test]
fn test_transform_requires_measure() {
    let x = Axis::new(AxisPosition::HorizontalDown);
    let y = Axis::new(AxisPosition::VerticalLeft);
    assert!(y.transform(50.0, 50.0, &x).is_none());
}

#[test]
fn test_transform_rejects_half_measured_axis() {
    let (x, _) = measured_pair();
    // Width gets measured from the labels but the height stays zero
    let mut y = Axis::new(AxisPosition::VerticalLeft);
    y.set_explicit_range(0.0, 100.0);
    y.measure(0, 0, &DialogFont);
    y.set_bound_rect(Rectangle::new(40, 10, 300, 200));

    assert!(y.transform(50.0, 50.0, &x).is_none());
}

#[test]
fn test_round_trip_within_one_pixel() {
    let (x, y) = measured_pair();
    let mut rng = rand::rng();
    // Value tolerance corresponding to one pixel on each axis
    let x_tol = 100.0 / 300.0;
    let y_tol = 100.0 / 200.0;

    for _ in 0..500 {
        let vx: f64 = rng.random_range(0.0..=100.0);
        let vy: f64 = rng.random_range(0.0..=100.0);
        let p = y.transform(vx, vy, &x).unwrap();
        assert!((x.inverse_transform(p.x) - vx).abs() <= x_tol);
        assert!((y.inverse_transform(p.y) - vy).abs() <= y_tol);
    }
}

#[test]
fn test_bar_width_follows_min_sample_gap() {
    let mut x = Axis::new(AxisPosition::HorizontalDown);
    x.set_annotation(Annotation::Value);
    x.set_explicit_range(0.0, 10.0);
    x.measure(420, 0, &DialogFont);

    let y = Axis::new(AxisPosition::VerticalLeft);
    let mut v = DataView::new("bars");
    v.set_data([(0.0, 1.0), (2.0, 2.0), (4.0, 3.0), (6.0, 4.0), (8.0, 5.0), (10.0, 6.0)]);

    // Gap 2 over span 10 on 420 px: 84 px, minus the 2 px margin
    assert_eq!(y.compute_bar_width(&v, &x), 82);
}

#[test]
fn test_bar_width_explicit_wins() {
    let mut x = Axis::new(AxisPosition::HorizontalDown);
    x.set_explicit_range(0.0, 10.0);
    x.measure(420, 0, &DialogFont);

    let y = Axis::new(AxisPosition::VerticalLeft);
    let mut v = DataView::new("bars");
    v.bar_width = 15;
    v.set_data([(0.0, 1.0), (2.0, 2.0)]);

    assert_eq!(y.compute_bar_width(&v, &x), 15);
}

#[test]
fn test_bar_width_defaults_without_gap_or_on_log_axis() {
    let mut x = Axis::new(AxisPosition::HorizontalDown);
    x.set_annotation(Annotation::Value);
    x.set_explicit_range(1.0, 100.0);
    x.measure(420, 0, &DialogFont);

    let y = Axis::new(AxisPosition::VerticalLeft);
    let mut single = DataView::new("one");
    single.set_data([(5.0, 1.0)]);
    assert_eq!(y.compute_bar_width(&single, &x), 20);

    x.set_scale(Scale::Log);
    let mut many = DataView::new("many");
    many.set_data([(1.0, 1.0), (10.0, 2.0), (100.0, 3.0)]);
    assert_eq!(y.compute_bar_width(&many, &x), 20);
}

#[test]
fn test_bar_width_is_even_and_non_negative() {
    let mut x = Axis::new(AxisPosition::HorizontalDown);
    x.set_annotation(Annotation::Value);
    x.set_explicit_range(0.0, 1000.0);
    x.measure(100, 0, &DialogFont);

    let y = Axis::new(AxisPosition::VerticalLeft);
    let mut v = DataView::new("narrow");
    // Gap 1 over span 1000 on 100 px is well under the 2 px margin
    v.set_data([(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);

    assert_eq!(y.compute_bar_width(&v, &x), 0);
}

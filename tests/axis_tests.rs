use simchart::data_types::{Annotation, AxisPosition, DataView, Rectangle, Scale};
use simchart::Axis;

fn view_with(samples: &[(f64, f64)]) -> DataView {
    let mut v = DataView::new("test");
    v.set_data(samples.iter().copied());
    v
}

#[test]
fn test_autoscale_rounds_outward_to_prec_multiples() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.add_view(view_with(&[(0.0, 5.0), (1.0, 15.0), (2.0, 9.0)]));

    axis.compute_auto_scale();

    // Data span 10 -> prec 10; 5 floors to 0, 15 ceils to 20
    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 20.0);
}

#[test]
fn test_autoscale_is_idempotent() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.add_view(view_with(&[(0.0, 5.0), (1.0, 15.0), (2.0, 9.0)]));

    axis.compute_auto_scale();
    let (min, max) = (axis.min(), axis.max());
    axis.compute_auto_scale();
    assert_eq!(axis.min(), min);
    assert_eq!(axis.max(), max);
}

#[test]
fn test_autoscale_widens_degenerate_range() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.add_view(view_with(&[(0.0, 7.0)]));

    axis.compute_auto_scale();

    // Single value widens to [6.001, 7.999], then rounds to unit multiples
    assert_eq!(axis.min(), 6.0);
    assert_eq!(axis.max(), 8.0);
    assert!(axis.min() < 7.0 && 7.0 < axis.max());
}

#[test]
fn test_autoscale_empty_views_fall_back_to_default_range() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.add_view(DataView::new("empty"));

    axis.compute_auto_scale();

    // Default [0, 99.99] rounds up to [0, 100]
    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 100.0);
}

#[test]
fn test_autoscale_zero_always_visible_pins_positive_data() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.set_zero_always_visible(true);
    axis.add_view(view_with(&[(0.0, 5.0), (1.0, 15.0)]));

    axis.compute_auto_scale();

    assert_eq!(axis.min(), 0.0);
    assert!(axis.max() >= 15.0);
}

#[test]
fn test_autoscale_log_skips_non_positive_and_uses_whole_decades() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_auto_scale(true);
    axis.set_scale(Scale::Log);
    axis.add_view(view_with(&[(0.0, -1.0), (1.0, 0.0), (2.0, 2.0), (3.0, 8.0)]));

    axis.compute_auto_scale();

    // Smallest positive y is 2, largest 8: decades [1, 10] in log10 space
    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 1.0);
}

#[test]
fn test_x_scale_uses_raw_bounds_without_rounding() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_auto_scale(true);
    axis.set_annotation(Annotation::Value);
    let v = view_with(&[(0.0, 5.0), (1.0, 15.0), (2.0, 9.0)]);

    axis.compute_x_scale(&[&v]);

    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 2.0);
}

#[test]
fn test_x_scale_time_fits_display_duration() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_auto_scale(true);
    axis.set_annotation(Annotation::Time);
    axis.set_axis_duration(100.0);
    let v = view_with(&[(0.0, 1.0), (500.0, 2.0), (1000.0, 3.0)]);

    axis.compute_x_scale(&[&v]);

    assert_eq!(axis.max(), 1000.0);
    assert_eq!(axis.min(), 900.0);
}

#[test]
fn test_x_scale_scrollback_extends_ahead_of_newest_sample() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_auto_scale(true);
    axis.set_annotation(Annotation::Time);
    axis.set_percent_scrollback(10.0);
    let v = view_with(&[(0.0, 1.0), (1000.0, 3.0)]);

    axis.compute_x_scale(&[&v]);

    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 1100.0);
}

#[test]
fn test_zoom_horizontal_interpolates_pixel_interval() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_explicit_range(0.0, 100.0);
    axis.set_bound_rect(Rectangle::new(0, 0, 100, 100));

    axis.zoom(25, 75);

    assert_eq!(axis.min(), 25.0);
    assert_eq!(axis.max(), 75.0);
    assert!(!axis.is_auto_scale());
    assert!(axis.is_zoomed());
}

#[test]
fn test_zoom_vertical_flips_pixel_direction() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_explicit_range(0.0, 100.0);
    axis.set_bound_rect(Rectangle::new(0, 0, 100, 100));

    // Pixel y grows downward: the upper pixel bound maps to the larger value
    axis.zoom(25, 75);

    assert_eq!(axis.min(), 25.0);
    assert_eq!(axis.max(), 75.0);
}

#[test]
fn test_zoom_rejects_tiny_pixel_spans() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_explicit_range(0.0, 100.0);
    axis.set_bound_rect(Rectangle::new(0, 0, 100, 100));

    axis.zoom(50, 55);

    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 100.0);
    assert!(!axis.is_zoomed());
}

#[test]
fn test_unzoom_restores_autoscale_state() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_auto_scale(true);
    axis.set_bound_rect(Rectangle::new(0, 0, 100, 100));

    axis.zoom(25, 75);
    assert!(!axis.is_auto_scale());

    axis.unzoom();
    assert!(axis.is_auto_scale());
    assert!(!axis.is_zoomed());
}

#[test]
fn test_unzoom_restores_explicit_range() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_explicit_range(10.0, 90.0);
    axis.set_bound_rect(Rectangle::new(0, 0, 100, 100));

    axis.zoom(25, 75);
    axis.unzoom();

    assert_eq!(axis.min(), 10.0);
    assert_eq!(axis.max(), 90.0);
}

#[test]
fn test_log_scale_guards_non_positive_explicit_range() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_explicit_range(-5.0, 100.0);

    axis.set_scale(Scale::Log);

    // Non-positive bound resets the explicit range to [1, 10]
    assert_eq!(axis.minimum(), 1.0);
    assert_eq!(axis.maximum(), 10.0);
    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 1.0);
}

#[test]
fn test_set_minimum_lifts_non_positive_value_on_log_scale() {
    let mut axis = Axis::new(AxisPosition::VerticalLeft);
    axis.set_explicit_range(1.0, 1000.0);
    axis.set_scale(Scale::Log);

    axis.set_minimum(0.0);

    // Lifted to 1 -> log10 = 0
    assert_eq!(axis.min(), 0.0);
}

#[test]
fn test_horizontal_axis_holds_single_view_and_switches_annotation() {
    let mut axis = Axis::new(AxisPosition::HorizontalDown);
    axis.set_annotation(Annotation::Time);

    axis.add_view(DataView::new("first"));
    axis.add_view(DataView::new("second"));

    assert_eq!(axis.view_count(), 1);
    assert_eq!(axis.view(0).map(|v| v.name.as_str()), Some("second"));
    assert_eq!(axis.annotation(), Annotation::Value);
    assert!(axis.is_xy());

    let removed = axis.remove_view(0);
    assert_eq!(removed.map(|v| v.name), Some("second".to_string()));
    assert_eq!(axis.annotation(), Annotation::Time);
    assert_eq!(axis.scale(), Scale::Linear);
    assert!(!axis.is_xy());
}

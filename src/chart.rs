//! Chart composition: one time/value X axis, two vertical axes, the
//! measurement pass that carves the plot area out of the component
//! rectangle, and data feeding with bounded retention.

use tracing::trace;

use crate::axis::Axis;
use crate::data_types::{Annotation, AxisPosition, DataView, Rectangle, MAX_VALUE};
use crate::metrics::FontMetrics;
use crate::search::SearchResult;

/// Which vertical axis a chart-level operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YAxis {
    Y1,
    Y2,
}

/// A nearest-point match, tagged with the vertical axis it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSearchResult {
    pub axis: YAxis,
    pub result: SearchResult,
}

/// Outer margin kept around the axes, pixels.
const MARGIN: i32 = 5;

/// A complete chart: X axis (time-annotated and auto-scaled by default),
/// left and right Y axes, and the layout glue between them.
#[derive(Clone, Debug)]
pub struct Chart {
    x_axis: Axis,
    y1_axis: Axis,
    y2_axis: Axis,
    header: String,
    /// Seconds of history kept by `add_data` on a time-annotated X axis;
    /// `MAX_VALUE` disables trimming.
    display_duration: f64,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        let mut x_axis = Axis::new(AxisPosition::HorizontalDown);
        x_axis.set_annotation(Annotation::Time);
        x_axis.set_auto_scale(true);

        Self {
            x_axis,
            y1_axis: Axis::new(AxisPosition::VerticalLeft),
            y2_axis: Axis::new(AxisPosition::VerticalRight),
            header: String::new(),
            display_duration: 3600.0,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn x_axis_mut(&mut self) -> &mut Axis {
        &mut self.x_axis
    }

    pub fn y1_axis(&self) -> &Axis {
        &self.y1_axis
    }

    pub fn y1_axis_mut(&mut self) -> &mut Axis {
        &mut self.y1_axis
    }

    pub fn y2_axis(&self) -> &Axis {
        &self.y2_axis
    }

    pub fn y2_axis_mut(&mut self) -> &mut Axis {
        &mut self.y2_axis
    }

    pub fn y_axis(&self, which: YAxis) -> &Axis {
        match which {
            YAxis::Y1 => &self.y1_axis,
            YAxis::Y2 => &self.y2_axis,
        }
    }

    pub fn y_axis_mut(&mut self, which: YAxis) -> &mut Axis {
        match which {
            YAxis::Y1 => &mut self.y1_axis,
            YAxis::Y2 => &mut self.y2_axis,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, h: impl Into<String>) {
        self.header = h.into();
    }

    pub fn display_duration(&self) -> f64 {
        self.display_duration
    }

    pub fn set_display_duration(&mut self, d: f64) {
        self.display_duration = d;
        self.x_axis.set_axis_duration(d);
    }

    // ------------------------------------------------------------------
    // Data feeding

    /// Appends one sample to a view of `axis` and trims history beyond the
    /// display duration. Trimming only applies when x values carry time,
    /// so XY-correlated charts keep everything.
    pub fn add_data(&mut self, axis: YAxis, view: usize, x: f64, y: f64) {
        let time_x = self.x_axis.annotation() == Annotation::Time;
        let duration = self.display_duration;
        if let Some(v) = self.y_axis_mut(axis).view_mut(view) {
            v.add(x, y);
            if time_x && duration != MAX_VALUE {
                let removed = v.series_mut().trim_before(duration);
                if removed > 0 {
                    trace!(removed, "trimmed samples past display duration");
                }
            }
        }
    }

    /// Drops all samples from every attached view (simulation restart).
    pub fn reset_data(&mut self) {
        for axis in [&mut self.y1_axis, &mut self.y2_axis, &mut self.x_axis] {
            for i in 0..axis.view_count() {
                if let Some(v) = axis.view_mut(i) {
                    v.reset();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Layout

    fn header_height(&self, metrics: &dyn FontMetrics) -> i32 {
        if self.header.is_empty() {
            0
        } else {
            metrics.text_height() + MARGIN
        }
    }

    /// Runs the measurement pass for a component of `width` x `height`
    /// pixels: X auto-scale over every Y view, axis label generation, and
    /// the plot-area split. Returns the plot area; all three axes get it
    /// as their bound rectangle, ready for transforms and searches.
    pub fn measure(&mut self, width: i32, height: i32, metrics: &dyn FontMetrics) -> Rectangle {
        {
            let views: Vec<&DataView> = self
                .y1_axis
                .views()
                .iter()
                .chain(self.y2_axis.views())
                .collect();
            self.x_axis.compute_x_scale(&views);
        }

        let header_h = self.header_height(metrics);

        // The X thickness depends on its labels, not on the width it gets;
        // a provisional full-width measure settles it before the Y axes
        // claim their share.
        let x_t = self.x_axis.measure(width - 2 * MARGIN, 0, metrics);

        let y_height = (height - 2 * MARGIN - header_h - x_t).max(1);
        // Hidden axes report zero thickness but still keep a small gutter
        let y1_t = self.y1_axis.measure(0, y_height, metrics).max(5);
        let y2_t = self.y2_axis.measure(0, y_height, metrics).max(5);

        // Final X measure at the width actually left over
        let x_width = (width - 2 * MARGIN - y1_t - y2_t).max(1);
        self.x_axis.measure(x_width, 0, metrics);

        let plot = Rectangle::new(MARGIN + y1_t, MARGIN + header_h, x_width, y_height);

        self.x_axis.set_bound_rect(plot);
        self.y1_axis.set_bound_rect(plot);
        self.y2_axis.set_bound_rect(plot);

        plot
    }

    // ------------------------------------------------------------------
    // Interaction

    /// Nearest attached sample to a pixel position, across both vertical
    /// axes. Requires a prior `measure`.
    pub fn search_nearest(&self, x: i32, y: i32) -> Option<ChartSearchResult> {
        let r1 = self
            .y1_axis
            .search_nearest(x, y, &self.x_axis)
            .map(|result| ChartSearchResult {
                axis: YAxis::Y1,
                result,
            });
        let r2 = self
            .y2_axis
            .search_nearest(x, y, &self.x_axis)
            .map(|result| ChartSearchResult {
                axis: YAxis::Y2,
                result,
            });

        match (r1, r2) {
            (Some(a), Some(b)) => {
                if b.result.dist2 < a.result.dist2 {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Zooms every axis to the pixel rectangle spanned by two corners.
    pub fn zoom(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (xa, xb) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (ya, yb) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        self.x_axis.zoom(xa, xb);
        self.y1_axis.zoom(ya, yb);
        self.y2_axis.zoom(ya, yb);
    }

    pub fn unzoom(&mut self) {
        self.x_axis.unzoom();
        self.y1_axis.unzoom();
        self.y2_axis.unzoom();
    }

    pub fn is_zoomed(&self) -> bool {
        self.x_axis.is_zoomed() || self.y1_axis.is_zoomed() || self.y2_axis.is_zoomed()
    }
}

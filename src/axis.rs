//! Axis engine: auto-scale, tick label generation, data↔pixel transform,
//! nearest-point search and bar-width sizing.
//!
//! Internal `min`/`max` hold log10 of the data bounds in log mode; every
//! entry point that touches raw sample values converts on the way in.

use tracing::debug;

use crate::data_types::{
    Annotation, AxisPosition, DataView, Dimension, Label, LabelFormat, Point, Rectangle, Scale,
    TooltipPlacement, MAX_VALUE,
};
use crate::format::{self, FR_DATE_FORMAT, HOUR, TIME_PRECS, YEAR, YEAR_FORMAT};
use crate::metrics::FontMetrics;
use crate::search::SearchResult;

/// Pixel saturation bound applied by the transform so the rasterizer never
/// sees coordinates that overflow its integer math.
const SATURATION: f64 = 32000.0;

/// Nearest-point queries further than this from the plot area return no
/// match.
const SEARCH_MARGIN: i32 = 5;

/// One scale of a chart: maps a numeric range to a pixel extent and owns
/// the views plotted against it.
#[derive(Clone, Debug)]
pub struct Axis {
    visible: bool,
    /// Working bounds (log10 of the data bounds in log mode).
    min: f64,
    max: f64,
    /// Explicit bounds, used verbatim when autoscale is off.
    minimum: f64,
    maximum: f64,
    auto_scale: bool,
    scale: Scale,
    annotation: Annotation,
    label_format: LabelFormat,
    labels: Vec<Label>,
    position: AxisPosition,
    /// Orientation at construction; `set_position` may move the axis but
    /// never flip it.
    d_position: AxisPosition,
    views: Vec<DataView>,
    name: String,
    inverted: bool,
    zero_always_visible: bool,
    date_format: String,
    /// Preferred visible duration for time axes, `MAX_VALUE` = unlimited.
    axis_duration: f64,
    percent_scrollback: f64,
    fit_to_duration: bool,
    /// Minimum spacing between primary ticks, pixels.
    min_tick_step: f64,
    tick_length: i32,
    subtick_length: i32,
    /// Published by the label pass: pixels between primary ticks (negative
    /// when inverted), and the sub-tick subdivision (0 none, -1 log table,
    /// n linear).
    tick_step: f64,
    sub_tick_step: i32,
    /// Time-annotation state carried from the precision lookup to the
    /// label loop.
    desired_prec: f64,
    use_format: String,
    bound_rect: Rectangle,
    csize: Dimension,
    font_over_width: i32,
    zoomed: bool,
    was_auto_scale: bool,
}

impl Axis {
    pub fn new(position: AxisPosition) -> Self {
        Self {
            visible: true,
            min: 0.0,
            max: 100.0,
            minimum: 0.0,
            maximum: 100.0,
            auto_scale: false,
            scale: Scale::Linear,
            annotation: Annotation::Value,
            label_format: LabelFormat::Auto,
            labels: Vec::new(),
            position,
            d_position: position,
            views: Vec::new(),
            name: String::new(),
            inverted: !position.is_horizontal(),
            zero_always_visible: false,
            date_format: FR_DATE_FORMAT.to_string(),
            axis_duration: MAX_VALUE,
            percent_scrollback: 0.0,
            fit_to_duration: true,
            min_tick_step: 50.0,
            tick_length: 6,
            subtick_length: 3,
            tick_step: 0.0,
            sub_tick_step: 0,
            desired_prec: 0.0,
            use_format: String::new(),
            bound_rect: Rectangle::default(),
            csize: Dimension::default(),
            font_over_width: 0,
            zoomed: false,
            was_auto_scale: false,
        }
    }

    // ------------------------------------------------------------------
    // Configuration

    pub fn is_horizontal(&self) -> bool {
        self.d_position.is_horizontal()
    }

    pub fn set_visible(&mut self, b: bool) {
        self.visible = b;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Working minimum (log10 in log mode).
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Working maximum (log10 in log mode).
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Sets the explicit minimum, ignored while autoscale is on. Values
    /// <= 0 are lifted to 1 in log mode.
    pub fn set_minimum(&mut self, d: f64) {
        self.minimum = d;
        if !self.auto_scale {
            match self.scale {
                Scale::Log => {
                    let d = if d <= 0.0 { 1.0 } else { d };
                    self.min = d.log10();
                }
                Scale::Linear => self.min = d,
            }
        }
    }

    /// Sets the explicit maximum, ignored while autoscale is on. Values
    /// <= 0 are lifted one decade above the minimum in log mode.
    pub fn set_maximum(&mut self, d: f64) {
        self.maximum = d;
        if !self.auto_scale {
            match self.scale {
                Scale::Log => {
                    let d = if d <= 0.0 {
                        if self.minimum > 0.0 {
                            self.minimum * 10.0
                        } else {
                            10.0
                        }
                    } else {
                        d
                    };
                    self.max = d.log10();
                }
                Scale::Linear => self.max = d,
            }
        }
    }

    pub fn set_explicit_range(&mut self, min: f64, max: f64) {
        self.set_minimum(min);
        self.set_maximum(max);
    }

    pub fn is_auto_scale(&self) -> bool {
        self.auto_scale
    }

    pub fn set_auto_scale(&mut self, b: bool) {
        self.auto_scale = b;
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Switches scale mode. A log axis with a non-positive explicit range
    /// resets it to [1, 10].
    pub fn set_scale(&mut self, s: Scale) {
        self.scale = s;
        if s == Scale::Log && (self.minimum <= 0.0 || self.maximum <= 0.0) {
            self.minimum = 1.0;
            self.maximum = 10.0;
        }
        match s {
            Scale::Log => {
                self.min = self.minimum.log10();
                self.max = self.maximum.log10();
            }
            Scale::Linear => {
                self.min = self.minimum;
                self.max = self.maximum;
            }
        }
    }

    pub fn annotation(&self) -> Annotation {
        self.annotation
    }

    pub fn set_annotation(&mut self, a: Annotation) {
        self.annotation = a;
    }

    pub fn label_format(&self) -> LabelFormat {
        self.label_format
    }

    pub fn set_label_format(&mut self, f: LabelFormat) {
        self.label_format = f;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, s: impl Into<String>) {
        self.name = s.into();
    }

    pub fn position(&self) -> AxisPosition {
        self.position
    }

    /// Moves the axis to another edge of the same orientation; requests to
    /// flip orientation are ignored.
    pub fn set_position(&mut self, p: AxisPosition) {
        if p.is_horizontal() == self.is_horizontal() {
            self.position = p;
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_inverted(&mut self, i: bool) {
        self.inverted = i;
    }

    pub fn is_zero_always_visible(&self) -> bool {
        self.zero_always_visible
    }

    pub fn set_zero_always_visible(&mut self, b: bool) {
        self.zero_always_visible = b;
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn set_date_format(&mut self, f: impl Into<String>) {
        self.date_format = f.into();
    }

    /// Preferred visible duration (seconds) for TIME-annotated X axes.
    pub fn set_axis_duration(&mut self, d: f64) {
        self.axis_duration = d;
    }

    /// Scrollback percentage [0..100]: free space kept ahead of the newest
    /// time sample so each append does not force a full repaint.
    pub fn set_percent_scrollback(&mut self, d: f64) {
        self.percent_scrollback = d / 100.0;
    }

    pub fn percent_scrollback(&self) -> f64 {
        self.percent_scrollback * 100.0
    }

    pub fn set_fit_to_duration(&mut self, b: bool) {
        self.fit_to_duration = b;
    }

    pub fn is_fit_to_duration(&self) -> bool {
        self.fit_to_duration
    }

    /// Minimum spacing between primary ticks, in pixels. Bounds the number
    /// of generated labels.
    pub fn tick_spacing(&self) -> f64 {
        self.min_tick_step
    }

    pub fn set_tick_spacing(&mut self, spacing: f64) {
        self.min_tick_step = spacing;
    }

    pub fn tick_length(&self) -> i32 {
        self.tick_length
    }

    pub fn set_tick_length(&mut self, l: i32) {
        self.tick_length = l;
        self.subtick_length = l / 2;
    }

    pub fn subtick_length(&self) -> i32 {
        self.subtick_length
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Pixels between primary ticks as published by the last label pass;
    /// negative when the axis is inverted, -1.0 when only extremities were
    /// emitted.
    pub fn tick_step(&self) -> f64 {
        self.tick_step
    }

    /// Sub-tick subdivision: 0 none, -1 logarithmic table, n linear steps.
    pub fn sub_tick_step(&self) -> i32 {
        self.sub_tick_step
    }

    pub fn bound_rect(&self) -> Rectangle {
        self.bound_rect
    }

    /// Plot-area rectangle this axis maps into. Assigned by the chart
    /// layout before transforms or searches are meaningful.
    pub fn set_bound_rect(&mut self, r: Rectangle) {
        self.bound_rect = r;
    }

    pub fn font_over_width(&self) -> i32 {
        self.font_over_width
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    // ------------------------------------------------------------------
    // Views

    /// Attaches a view. A horizontal axis holds at most one view and
    /// switches the chart to XY-correlated mode; the annotation falls back
    /// to plain values since x samples no longer carry time.
    pub fn add_view(&mut self, v: DataView) {
        if self.is_horizontal() {
            self.views.clear();
            self.views.push(v);
            self.annotation = Annotation::Value;
        } else {
            self.views.push(v);
        }
    }

    /// Detaches and returns the view at `index`. Detaching from the
    /// horizontal axis leaves XY mode: time annotation and linear scale
    /// are restored.
    pub fn remove_view(&mut self, index: usize) -> Option<DataView> {
        if index >= self.views.len() {
            return None;
        }
        let v = self.views.remove(index);
        if self.is_horizontal() {
            self.annotation = Annotation::Time;
            if self.scale != Scale::Linear {
                self.set_scale(Scale::Linear);
            }
        }
        Some(v)
    }

    pub fn clear_views(&mut self) {
        self.views.clear();
    }

    pub fn views(&self) -> &[DataView] {
        &self.views
    }

    pub fn view(&self, index: usize) -> Option<&DataView> {
        self.views.get(index)
    }

    pub fn view_mut(&mut self, index: usize) -> Option<&mut DataView> {
        self.views.get_mut(index)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// A horizontal axis is in XY-correlated mode when a view feeds it.
    pub fn is_xy(&self) -> bool {
        !self.views.is_empty()
    }

    // ------------------------------------------------------------------
    // Zoom

    /// Zooms to the pixel interval [x1, x2] (vertical axes read them as y
    /// coordinates). Disables autoscale; `unzoom` restores it.
    pub fn zoom(&mut self, x1: i32, x2: i32) {
        if !self.zoomed {
            self.was_auto_scale = self.auto_scale;
        }

        let r = self.bound_rect;
        let (nmin, nmax) = if self.is_horizontal() {
            let x1 = x1.max(r.x);
            let x2 = x2.min(r.x + r.width);
            if x2 - x1 < 10 {
                return;
            }
            let xr1 = f64::from(x1 - r.x) / f64::from(r.width);
            let xr2 = f64::from(x2 - r.x) / f64::from(r.width);
            (
                self.min + (self.max - self.min) * xr1,
                self.min + (self.max - self.min) * xr2,
            )
        } else {
            let x1 = x1.max(r.y);
            let x2 = x2.min(r.y + r.height);
            if x2 - x1 < 10 {
                return;
            }
            let yr1 = f64::from(r.y + r.height - x2) / f64::from(r.height);
            let yr2 = f64::from(r.y + r.height - x1) / f64::from(r.height);
            (
                self.min + (self.max - self.min) * yr1,
                self.min + (self.max - self.min) * yr2,
            )
        };

        // Reject degenerate spans
        if nmax - nmin < 1e-13 {
            return;
        }

        self.min = nmin;
        self.max = nmax;
        self.auto_scale = false;
        self.zoomed = true;
    }

    pub fn unzoom(&mut self) {
        self.auto_scale = self.was_auto_scale;
        if !self.was_auto_scale {
            self.set_minimum(self.minimum);
            self.set_maximum(self.maximum);
        }
        self.zoomed = false;
    }

    // ------------------------------------------------------------------
    // Auto-scaling

    fn compute_low_ten(d: f64) -> f64 {
        let p = d.log10().trunc() as i32;
        10f64.powi(p)
    }

    /// Recomputes [min, max] from the attached views. Transformed values
    /// are scanned when a view carries a non-identity transform; log mode
    /// excludes non-positive values, substituting the smallest positive
    /// sample. The final range is rounded outward to multiples of
    /// 10^trunc(log10(span)) (whole decades in log mode).
    pub fn compute_auto_scale(&mut self) {
        if !self.auto_scale || self.views.is_empty() {
            return;
        }

        self.min = MAX_VALUE;
        self.max = -MAX_VALUE;

        for v in &self.views {
            let (mut mi, mut ma) = if v.has_transform() {
                v.transformed_min_max()
            } else {
                (v.series().min_y(), v.series().max_y())
            };

            if self.scale == Scale::Log {
                if mi <= 0.0 {
                    mi = v.series().positive_min_y();
                }
                if mi != MAX_VALUE {
                    mi = mi.log10();
                }
                ma = if ma <= 0.0 { -MAX_VALUE } else { ma.log10() };
            }

            if ma > self.max {
                self.max = ma;
            }
            if mi < self.min {
                self.min = mi;
            }
        }

        if self.min == MAX_VALUE && self.max == -MAX_VALUE {
            // Only invalid data
            debug!(scale = ?self.scale, "autoscale found no valid sample, using default range");
            match self.scale {
                Scale::Log => {
                    self.min = 0.0;
                    self.max = 1.0;
                }
                Scale::Linear => {
                    self.min = 0.0;
                    self.max = 99.99;
                }
            }
        } else if self.zero_always_visible {
            if self.min < 0.0 && self.max < 0.0 {
                self.max = 0.0;
            } else if self.min > 0.0 && self.max > 0.0 {
                self.min = 0.0;
            }
        }

        if self.max - self.min < 1e-100 {
            self.max += 0.999;
            self.min -= 0.999;
        }

        let mut prec = Self::compute_low_ten(self.max - self.min);

        // Never label below one decade in log mode
        if self.scale == Scale::Log && prec < 1.0 {
            prec = 1.0;
        }

        self.min = (self.min / prec).floor() * prec;
        self.max = (self.max / prec).ceil() * prec;
    }

    /// Horizontal auto-scale over the views of all vertical axes. Normal
    /// mode reduces the raw x bounds (no nice rounding); XY mode falls
    /// back to the regular value autoscale on the X-source view.
    pub fn compute_x_scale(&mut self, views: &[&DataView]) {
        if !self.is_horizontal() || !self.auto_scale || views.is_empty() {
            return;
        }

        if self.is_xy() {
            self.compute_auto_scale();
            return;
        }

        self.min = MAX_VALUE;
        self.max = -MAX_VALUE;

        for v in views {
            let mut mi = v.series().min_x();
            let mut ma = v.series().max_x();

            if self.scale == Scale::Log {
                if mi <= 0.0 {
                    mi = match self.annotation {
                        Annotation::Value => v.series().positive_min_x(),
                        Annotation::Time => v.series().first_positive_x(),
                    };
                }
                if mi != MAX_VALUE {
                    mi = mi.log10();
                }
                ma = if ma <= 0.0 { -MAX_VALUE } else { ma.log10() };
            }

            if ma > self.max {
                self.max = ma;
            }
            if mi < self.min {
                self.min = mi;
            }
        }

        if self.min == MAX_VALUE && self.max == -MAX_VALUE {
            // Only empty views
            debug!("x autoscale found no valid sample, using default range");
            match (self.scale, self.annotation) {
                (Scale::Log, _) => {
                    self.min = 0.0;
                    self.max = 1.0;
                }
                (Scale::Linear, Annotation::Time) => {
                    let now = chrono::Utc::now().timestamp() as f64;
                    self.min = now - HOUR;
                    self.max = now;
                }
                (Scale::Linear, Annotation::Value) => {
                    self.min = 0.0;
                    self.max = 99.99;
                }
            }
        }

        if self.annotation == Annotation::Time {
            if self.axis_duration != MAX_VALUE && self.fit_to_duration {
                self.min = self.max - self.axis_duration;
            }
            self.max += (self.max - self.min) * self.percent_scrollback;
        }

        if self.max - self.min < 1e-100 {
            self.max += 0.999;
            self.min -= 0.999;
        }
    }

    // ------------------------------------------------------------------
    // Measurement

    /// Axis length along its own direction, pixels.
    pub fn length(&self) -> i32 {
        if self.is_horizontal() {
            self.csize.width
        } else {
            self.csize.height
        }
    }

    /// Axis thickness across its direction, pixels. Zero when hidden.
    pub fn thickness(&self) -> i32 {
        if self.visible {
            if self.is_horizontal() {
                self.csize.height
            } else {
                self.csize.width
            }
        } else {
            0
        }
    }

    /// Margin reserved for the label font (and the axis name when present).
    pub fn label_font_dimension(&self, metrics: &dyn FontMetrics) -> i32 {
        if !self.visible {
            return 5; // margin kept when the axis is hidden
        }
        let h_font = metrics.text_height();
        if self.is_horizontal() {
            if !self.name.is_empty()
                && matches!(
                    self.position,
                    AxisPosition::HorizontalDown | AxisPosition::HorizontalUp
                )
            {
                2 * h_font + 5
            } else {
                h_font + 5
            }
        } else if !self.name.is_empty() {
            h_font + 5
        } else {
            5
        }
    }

    /// Runs autoscale, regenerates labels for the desired extent and
    /// publishes the measured size. Returns the axis thickness the chart
    /// layout must reserve.
    pub fn measure(
        &mut self,
        desired_width: i32,
        desired_height: i32,
        metrics: &dyn FontMetrics,
    ) -> i32 {
        self.compute_auto_scale();

        if self.is_horizontal() {
            self.compute_labels(f64::from(desired_width), metrics);
        } else {
            self.compute_labels(f64::from(desired_height), metrics);
        }

        let mut max_width = 10; // minimum width
        let mut max_height = 0;
        for l in &self.labels {
            let lw = l.size.width + l.offset_x.abs();
            let lh = l.size.height + l.offset_y.abs();
            if lw > max_width {
                max_width = lw;
            }
            if lh > max_height {
                max_height = lh;
            }
        }

        self.font_over_width = max_width / 2 + 1;

        if self.is_horizontal() {
            self.csize = Dimension {
                width: desired_width,
                height: max_height,
            };
        } else {
            self.csize = Dimension {
                width: max_width + self.label_font_dimension(metrics),
                height: desired_height,
            };
        }

        self.thickness()
    }

    // ------------------------------------------------------------------
    // Label generation

    fn clear_labels(&mut self) {
        self.labels.clear();
    }

    fn add_label(&mut self, text: impl Into<String>, w: i32, h: i32, pos: f64, off_x: i32, off_y: i32) {
        self.labels.push(Label {
            text: text.into(),
            size: Dimension {
                width: w,
                height: h,
            },
            pos,
            offset_x: off_x,
            offset_y: off_y,
        });
    }

    fn format_value(&self, vt: f64, prec: f64) -> String {
        format::format_value(vt, prec, self.label_format, self.scale, &self.date_format)
    }

    /// Picks the coarsest nice duration labeling the range with at most
    /// `max_labels` ticks and the matching date format.
    fn compute_date_format(&mut self, max_labels: i32) {
        let span = self.max - self.min;
        for (prec, fmt) in TIME_PRECS {
            if (span / prec) as i64 <= i64::from(max_labels) {
                self.desired_prec = prec;
                self.use_format = fmt.to_string();
                return;
            }
        }
        self.desired_prec = 10.0 * YEAR;
        self.use_format = YEAR_FORMAT.to_string();
    }

    /// Rebuilds the label buffer for an axis of `length` pixels.
    pub fn compute_labels(&mut self, length: f64, metrics: &dyn FontMetrics) {
        self.clear_labels();
        if length <= 0.0 {
            return;
        }

        if self.max < self.min {
            std::mem::swap(&mut self.min, &mut self.max);
        }

        // Explicit ranges arrive unwidened; the step search below needs a
        // positive finite span
        if !(self.min.is_finite() && self.max.is_finite()) {
            debug!("non-finite axis range, using default range");
            self.min = 0.0;
            self.max = 99.99;
        }
        if self.max - self.min < 1e-100 {
            self.max += 0.999;
            self.min -= 0.999;
        }

        let sz = self.max - self.min;
        let lgth = length as i32;
        // One-pixel tolerance on range membership
        let prec_delta = sz / length;

        match self.annotation {
            Annotation::Time => {
                self.compute_time_labels(length, sz, prec_delta, lgth, metrics);
            }
            Annotation::Value => {
                self.compute_value_labels(length, sz, prec_delta, metrics);
            }
        }
    }

    fn compute_time_labels(
        &mut self,
        length: f64,
        sz: f64,
        prec_delta: f64,
        lgth: i32,
        metrics: &dyn FontMetrics,
    ) {
        // 10 labels maximum should be enough
        self.compute_date_format(10);

        // First label: next multiple of the precision above min
        let round = (self.min / self.desired_prec) as i64;
        let mut startx = (round + 1) as f64 * self.desired_prec;

        let pos = if self.inverted {
            length * (1.0 - (startx - self.min) / sz)
        } else {
            length * ((startx - self.min) / sz)
        };

        let text = format::format_time_value(startx, &self.use_format);
        let w = metrics.text_width(&text);
        let h = metrics.text_height();
        self.add_label(text, w, h, pos, 0, 0);

        // Widen the step until labels cannot overlap
        let mut min_step = f64::from(w) * 1.3;
        if min_step < self.min_tick_step {
            min_step = self.min_tick_step;
        }
        let min_prec = (min_step / length) * sz;
        let mut prec = self.desired_prec;
        while prec < min_prec {
            prec += self.desired_prec;
        }

        self.tick_step = length * prec / sz;
        if self.inverted {
            self.tick_step = -self.tick_step;
        }
        self.sub_tick_step = 0;
        startx += prec;

        while startx <= self.max + prec_delta {
            let pos = if self.inverted {
                (length * (1.0 - (startx - self.min) / sz) + 0.5).floor()
            } else {
                (length * ((startx - self.min) / sz) + 0.5).floor()
            };

            if pos > 0.0 && (pos as i32) < lgth {
                let text = format::format_time_value(startx, &self.use_format);
                let w = metrics.text_width(&text);
                self.add_label(text, w, h, pos, 0, 0);
            }

            startx += prec;
        }
    }

    fn compute_value_labels(
        &mut self,
        length: f64,
        sz: f64,
        prec_delta: f64,
        metrics: &dyn FontMetrics,
    ) {
        let font_ascent = f64::from(metrics.text_height());
        let mut prec = Self::compute_low_ten(sz);
        let mut extract_label = false;

        // Anticipate label overlap
        let mut nb_max_lab = if !self.is_horizontal() {
            (length / (2.0 * font_ascent)) as i32
        } else {
            // No way to know the widest label beforehand; estimate with
            // the two extremities
            let (min_t, max_t) = match self.scale {
                Scale::Log => (10f64.powf(self.min), 10f64.powf(self.max)),
                Scale::Linear => (self.min, self.max),
            };
            let mut mw = metrics.text_width(&self.format_value(min_t, prec));
            let w = metrics.text_width(&self.format_value(max_t, prec));
            if w > mw {
                mw = w;
            }
            let mw = 1.5 * f64::from(mw);
            (length / mw) as i32
        };

        let user_max_lab = (length / self.min_tick_step + 0.5) as i32;
        if user_max_lab < nb_max_lab {
            nb_max_lab = user_max_lab;
        }
        if nb_max_lab < 1 {
            nb_max_lab = 1; // at least 1 label
        }

        let mut startx;
        let mut sub_step;

        if self.scale == Scale::Log {
            prec = 1.0; // decade
            let mut st = -1; // logarithmic sub-ticks

            startx = if self.min < 0.0 {
                (self.min - 0.5).trunc()
            } else {
                (self.min + 0.5).trunc()
            };

            let mut n = ((self.max - self.min) / prec + 0.5) as i32;
            while n > nb_max_lab {
                prec *= 2.0;
                st = 2;
                n = ((self.max - self.min) / prec + 0.5) as i32;
                if n > nb_max_lab {
                    prec *= 5.0;
                    st = 10;
                    n = ((self.max - self.min) / prec + 0.5) as i32;
                }
            }

            sub_step = st;
        } else {
            // Linear scale: refine by {/2, /5} while labels still fit,
            // or widen by {*5, *2} while they overflow
            let mut st = 10;
            let mut n = (sz / prec + 0.5) as i32;

            if n <= nb_max_lab {
                n = (sz / (prec / 2.0) + 0.5) as i32;
                while n <= nb_max_lab {
                    prec /= 2.0;
                    st = 5;
                    n = (sz / (prec / 5.0) + 0.5) as i32;
                    if n <= nb_max_lab {
                        prec /= 5.0;
                        st = 10;
                        n = (sz / (prec / 2.0) + 0.5) as i32;
                    }
                }
            } else {
                while n > nb_max_lab {
                    prec *= 5.0;
                    st = 5;
                    n = (sz / prec + 0.5) as i32;
                    if n > nb_max_lab {
                        prec *= 2.0;
                        st = 10;
                        n = (sz / prec + 0.5) as i32;
                    }
                }
            }

            // Start on the last multiple of prec below min (may be
            // outside the visible range)
            startx = (self.min / prec).floor() * prec;

            // Count the labels actually visible
            let mut sx = startx;
            let mut nb_l = 0;
            while sx <= self.max + prec_delta {
                if sx >= self.min - prec_delta {
                    nb_l += 1;
                }
                sx += prec;
            }

            if nb_l <= 2 {
                // Too few labels; refine once more and emit only the two
                // extremities afterwards
                if st == 10 {
                    st = 5;
                    prec /= 2.0;
                } else {
                    st = 10;
                    prec /= 5.0;
                }
                extract_label = true;
            }

            // Widen sub-ticks that would land closer than 10 pixels
            let mut tick_spacing = (((prec / sz) * length) / f64::from(st)).abs();
            sub_step = st;
            while tick_spacing < 10.0 && sub_step > 1 {
                match sub_step {
                    10 => {
                        sub_step = 5;
                        tick_spacing *= 2.0;
                    }
                    5 => {
                        sub_step = 2;
                        tick_spacing *= 2.5;
                    }
                    _ => {
                        sub_step = 1;
                    }
                }
            }
        }

        self.tick_step = length * prec / sz;
        if self.inverted {
            self.tick_step = -self.tick_step;
        }
        self.sub_tick_step = sub_step;

        // Shift labels clear of inward-drawn ticks
        let mut off_x = 0;
        let mut off_y = 0;
        match self.d_position {
            AxisPosition::VerticalLeft => {
                off_x = if self.tick_length < 0 {
                    self.tick_length
                } else {
                    0
                };
            }
            AxisPosition::VerticalRight => {
                off_x = if self.tick_length < 0 {
                    -self.tick_length
                } else {
                    0
                };
            }
            _ => {
                off_y = if self.tick_length < 0 {
                    -self.tick_length
                } else {
                    0
                };
            }
        }

        // Build labels
        let h = metrics.text_height();
        let mut last_text = String::new();
        let mut last_diff = MAX_VALUE;
        let mut last_label: Option<usize> = None;

        while startx <= self.max + prec_delta {
            let pos = if self.inverted {
                (length * (1.0 - (startx - self.min) / sz) + 0.5).floor()
            } else {
                (length * ((startx - self.min) / sz) + 0.5).floor()
            };

            let vt = match self.scale {
                Scale::Log => 10f64.powf(startx),
                Scale::Linear => startx,
            };

            let candidate = self.format_value(vt, prec);

            // Floating formatting can collapse two neighboring ticks onto
            // the same text; keep the numerically closer one and blank the
            // other
            let diff = if !matches!(self.label_format, LabelFormat::Clock | LabelFormat::Date) {
                candidate
                    .parse::<f64>()
                    .map(|t| (t - vt).abs())
                    .unwrap_or(0.0)
            } else {
                0.0
            };

            let text = if candidate == last_text {
                if diff < last_diff {
                    if let Some(i) = last_label {
                        self.labels[i].text.clear();
                    }
                    candidate.clone()
                } else {
                    String::new()
                }
            } else {
                candidate.clone()
            };
            last_diff = diff;
            last_text = candidate;

            if startx >= self.min - prec_delta {
                let w = metrics.text_width(&text);
                self.add_label(text, w, h, pos, off_x, off_y);
                last_label = Some(self.labels.len() - 1);
            }

            startx += prec;
        }

        // Keep only the two extremities when the refined step produced too
        // few interior labels
        if extract_label && self.labels.len() > 2 {
            let n = self.labels.len();
            let last = self.labels[n - 1].clone();
            self.labels.truncate(2);
            self.labels[1] = last;
            self.tick_step = self.labels[1].pos - self.labels[0].pos;
            self.sub_tick_step = (n - 1) as i32;
        }

        // An un-inverted horizontal axis must always show its extremities
        let i_length = (length + 0.5) as i32;

        if self.is_horizontal() && self.labels.len() == 1 && !self.inverted {
            let only_pos = self.labels[0].pos;
            if only_pos == 0.0 {
                let vt = match self.scale {
                    Scale::Log => 10f64.powf(self.max),
                    Scale::Linear => self.max,
                };
                let text = self.format_value(vt, prec);
                let w = metrics.text_width(&text);
                self.add_label(text, w, h, f64::from(i_length), 0, 0);
                self.tick_step = -1.0;
            } else if only_pos == f64::from(i_length) {
                let vt = match self.scale {
                    Scale::Log => 10f64.powf(self.min),
                    Scale::Linear => self.min,
                };
                let text = self.format_value(vt, prec);
                let w = metrics.text_width(&text);
                self.add_label(text, w, h, 0.0, 0, 0);
                self.tick_step = -1.0;
            }
        }

        if self.is_horizontal() && self.labels.is_empty() && !self.inverted {
            let (min_v, max_v) = match self.scale {
                Scale::Log => (10f64.powf(self.min), 10f64.powf(self.max)),
                Scale::Linear => (self.min, self.max),
            };
            let text = self.format_value(max_v, prec);
            let w = metrics.text_width(&text);
            self.add_label(text, w, h, f64::from(i_length), 0, 0);
            let text = self.format_value(min_v, prec);
            let w = metrics.text_width(&text);
            self.add_label(text, w, h, 0.0, 0, 0);
            self.tick_step = -1.0;
        }
    }

    // ------------------------------------------------------------------
    // Coordinate transform

    /// Projects a data-space point to pixel space. `x_axis` supplies the
    /// horizontal mapping, `self` the vertical one. Returns `None` for NaN
    /// input, non-positive values on a log scale, or before the axes have
    /// been measured.
    pub fn transform(&self, x: f64, y: f64, x_axis: &Axis) -> Option<Point> {
        // The graph must have been measured before we can transform
        if self.csize.width <= 0 || self.csize.height <= 0 {
            return None;
        }
        if x.is_nan() || y.is_nan() {
            return None;
        }

        let vx = match x_axis.scale {
            Scale::Log => {
                if x <= 0.0 {
                    return None;
                }
                x.log10()
            }
            Scale::Linear => x,
        };

        let vy = match self.scale {
            Scale::Log => {
                if y <= 0.0 {
                    return None;
                }
                y.log10()
            }
            Scale::Linear => y,
        };

        let x_org = self.bound_rect.x;
        let y_org = self.bound_rect.y + self.length();

        let x_span = x_axis.max - x_axis.min;
        let xratio =
            ((vx - x_axis.min) / x_span * f64::from(x_axis.length())).clamp(-SATURATION, SATURATION);
        let yratio = (-(vy - self.min) / (self.max - self.min) * f64::from(self.length()))
            .clamp(-SATURATION, SATURATION);

        Some(Point::new(
            xratio.round() as i32 + x_org,
            yratio.round() as i32 + y_org,
        ))
    }

    /// Maps a pixel coordinate along this axis back to a data value.
    /// Inverse of the projection up to pixel rounding.
    pub fn inverse_transform(&self, pixel: i32) -> f64 {
        let len = self.length();
        if len <= 0 {
            return self.min;
        }
        let ratio = if self.is_horizontal() {
            f64::from(pixel - self.bound_rect.x) / f64::from(len)
        } else {
            f64::from(self.bound_rect.y + len - pixel) / f64::from(len)
        };
        let v = self.min + ratio * (self.max - self.min);
        match self.scale {
            Scale::Log => 10f64.powf(v),
            Scale::Linear => v,
        }
    }

    // ------------------------------------------------------------------
    // Nearest-point search

    fn placement_for(&self, p: Point) -> TooltipPlacement {
        let r = self.bound_rect;
        if p.x < r.x + r.width / 2 {
            if p.y < r.y + r.height / 2 {
                TooltipPlacement::BottomRight
            } else {
                TooltipPlacement::TopRight
            }
        } else if p.y < r.y + r.height / 2 {
            TooltipPlacement::BottomLeft
        } else {
            TooltipPlacement::TopLeft
        }
    }

    fn dist2(x1: i32, y1: i32, x2: i32, y2: i32) -> i64 {
        let dx = i64::from(x2 - x1);
        let dy = i64::from(y2 - y1);
        dx * dx + dy * dy
    }

    /// Finds the attached sample closest (in squared pixel distance) to
    /// the query point. Returns `None` when the query falls outside the
    /// plot area margin or nothing qualifies.
    pub fn search_nearest(&self, x: i32, y: i32, x_axis: &Axis) -> Option<SearchResult> {
        let r = self.bound_rect;
        if x <= r.x - SEARCH_MARGIN
            || x >= r.x + r.width + SEARCH_MARGIN
            || y <= r.y - SEARCH_MARGIN
            || y >= r.y + r.height + SEARCH_MARGIN
        {
            return None;
        }

        if x_axis.is_xy() {
            self.search_nearest_xy(x, y, x_axis)
        } else {
            self.search_nearest_normal(x, y, x_axis)
        }
    }

    fn search_nearest_normal(&self, x: i32, y: i32, x_axis: &Axis) -> Option<SearchResult> {
        let rect2 = self.bound_rect.grown(2);
        let mut best: Option<SearchResult> = None;

        for (vi, v) in self.views.iter().enumerate() {
            if !v.clickable {
                continue;
            }
            for (idx, s) in v.series().iter().enumerate() {
                let Some(p) = self.transform(s.x, v.transformed(s.y), x_axis) else {
                    continue;
                };
                if !rect2.contains(p) {
                    continue;
                }
                let d2 = Self::dist2(x, y, p.x, p.y);
                if best.as_ref().map_or(true, |b| d2 < b.dist2) {
                    best = Some(SearchResult {
                        point: p,
                        view_index: vi,
                        sample: *s,
                        sample_index: Some(idx),
                        dist2: d2,
                        placement: self.placement_for(p),
                        x_sample: None,
                    });
                }
            }
        }

        best
    }

    /// Correlated search: pairs each sample of a Y view with the X-source
    /// sample whose x ("position") value is closest below, approximating
    /// nearest-by-index correlation of two differently-sampled series.
    fn search_nearest_xy(&self, x: i32, y: i32, x_axis: &Axis) -> Option<SearchResult> {
        let w = x_axis.views().first()?;
        let d2s = w.series().samples();
        let rect2 = self.bound_rect.grown(2);
        let mut best: Option<SearchResult> = None;

        for (vi, v) in self.views.iter().enumerate() {
            if !v.clickable {
                continue;
            }
            let d1s = v.series().samples();
            if d1s.is_empty() || d2s.is_empty() {
                continue;
            }

            let mut i = 0usize;
            let mut j = 0usize;

            // Align the two walkers on a common starting position
            if d1s[0].x < d2s[0].x {
                while i < d1s.len() && d1s[i].x < d2s[j].x {
                    i += 1;
                }
            } else {
                while j + 1 < d2s.len() && d2s[j + 1].x < d1s[i].x {
                    j += 1;
                }
            }

            while i < d1s.len() {
                if let Some(p) =
                    self.transform(w.transformed(d2s[j].y), v.transformed(d1s[i].y), x_axis)
                {
                    if rect2.contains(p) {
                        let dist = Self::dist2(x, y, p.x, p.y);
                        if best.as_ref().map_or(true, |b| dist < b.dist2) {
                            best = Some(SearchResult {
                                point: p,
                                view_index: vi,
                                sample: d1s[i],
                                sample_index: None,
                                dist2: dist,
                                placement: self.placement_for(p),
                                x_sample: Some(d2s[j]),
                            });
                        }
                    }
                }

                i += 1;
                if i < d1s.len() {
                    while j + 1 < d2s.len() && d2s[j + 1].x <= d1s[i].x {
                        j += 1;
                    }
                }
            }
        }

        best
    }

    // ------------------------------------------------------------------
    // Bar sizing

    /// Bar width in pixels for `v` plotted against `x_axis`. Explicit
    /// widths win; otherwise the minimum consecutive sample gap is mapped
    /// to pixels, shrunk by a 2-pixel margin and floored to an even count.
    /// Auto-sizing is disabled on log X axes.
    pub fn compute_bar_width(&self, v: &DataView, x_axis: &Axis) -> i32 {
        const DEFAULT_WIDTH: i32 = 20;

        if v.bar_width > 0 {
            return v.bar_width;
        }
        if x_axis.scale == Scale::Log {
            return DEFAULT_WIDTH;
        }

        let min_gap = if x_axis.is_xy() {
            x_axis
                .views()
                .first()
                .map(|vx| vx.series().min_y_gap())
                .unwrap_or(MAX_VALUE)
        } else {
            v.series().min_x_gap()
        };

        if min_gap == MAX_VALUE {
            return DEFAULT_WIDTH;
        }

        let span = x_axis.max - x_axis.min;
        let mut bw = (min_gap / span * f64::from(x_axis.length())).floor() as i32 - 2;
        bw = bw / 2 * 2;
        bw.max(0)
    }
}

use serde::{Deserialize, Serialize};

use super::data::{DataSeries, MAX_VALUE};
use super::geometry::Color;

/// Facet tag: the view is not bound to any physical facet.
pub const FACET_NONE: i32 = -1;
/// Facet tag: the view is derived from a formula and not persisted.
pub const FACET_FORMULA: i32 = -2;

/// Marker drawn on each sample of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    #[default]
    None,
    Dot,
    Box,
    Triangle,
    Diamond,
    Star,
    VertLine,
    HorizLine,
    Cross,
    Circle,
    Square,
}

/// Dash pattern of a line stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dot,
    Dash,
    LongDash,
    DashDot,
}

/// Bar/area fill pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStyle {
    #[default]
    None,
    Solid,
    LargeRightHatch,
    LargeLeftHatch,
    LargeCrossHatch,
    SmallRightHatch,
    SmallLeftHatch,
    SmallCrossHatch,
    DotPattern1,
    DotPattern2,
    DotPattern3,
}

/// Where bar/area filling anchors on the y axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMethod {
    FromTop,
    FromZero,
    #[default]
    FromBottom,
}

/// Rendering style of a view. Closed set, so a tagged variant rather than
/// trait dispatch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ViewStyle {
    Line {
        color: Color,
        width: i32,
        style: LineStyle,
        marker: Marker,
        marker_color: Color,
        marker_size: i32,
    },
    Bar {
        color: Color,
        fill_color: Color,
        fill_style: FillStyle,
        fill_method: FillMethod,
        border_width: i32,
    },
    /// Markers only, no connecting stroke.
    Marker {
        marker: Marker,
        color: Color,
        size: i32,
    },
}

impl Default for ViewStyle {
    fn default() -> Self {
        ViewStyle::Line {
            color: Color::RED,
            width: 1,
            style: LineStyle::Solid,
            marker: Marker::None,
            marker_color: Color::RED,
            marker_size: 6,
        }
    }
}

impl ViewStyle {
    pub fn is_bar(&self) -> bool {
        matches!(self, ViewStyle::Bar { .. })
    }
}

/// A styled binding between one sample series and an axis.
///
/// Owns its series; the axis holds the view, not the other way around.
/// The quadratic transform `y' = a0 + a1*y + a2*y^2` defaults to identity
/// and is applied on the fly by range computation, painting and hit-testing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataView {
    series: DataSeries,
    pub name: String,
    pub unit: String,
    pub style: ViewStyle,
    /// Physical quantity/facet this view represents.
    pub facet: i32,
    /// Explicit bar width in pixels; 0 or negative requests auto-sizing.
    pub bar_width: i32,
    /// Whether nearest-point searches may land on this view.
    pub clickable: bool,
    pub label_visible: bool,
    a0: f64,
    a1: f64,
    a2: f64,
}

impl Default for DataView {
    fn default() -> Self {
        Self {
            series: DataSeries::new(),
            name: String::new(),
            unit: String::new(),
            style: ViewStyle::default(),
            facet: FACET_NONE,
            bar_width: 0,
            clickable: true,
            label_visible: true,
            a0: 0.0,
            a1: 1.0,
            a2: 0.0,
        }
    }
}

impl DataView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn series(&self) -> &DataSeries {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut DataSeries {
        &mut self.series
    }

    pub fn add(&mut self, x: f64, y: f64) {
        self.series.push(x, y);
    }

    pub fn set_data(&mut self, samples: impl IntoIterator<Item = (f64, f64)>) {
        self.series.set_data(samples);
    }

    pub fn reset(&mut self) {
        self.series.reset();
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Name extended with the unit, as shown in legends and exports.
    pub fn extended_name(&self) -> String {
        if self.unit.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.unit)
        }
    }

    pub fn set_transform(&mut self, a0: f64, a1: f64, a2: f64) {
        self.a0 = a0;
        self.a1 = a1;
        self.a2 = a2;
    }

    pub fn transform_coeffs(&self) -> (f64, f64, f64) {
        (self.a0, self.a1, self.a2)
    }

    pub fn has_transform(&self) -> bool {
        !(self.a0 == 0.0 && self.a1 == 1.0 && self.a2 == 0.0)
    }

    /// Value through the quadratic transform.
    pub fn transformed(&self, y: f64) -> f64 {
        self.a0 + self.a1 * y + self.a2 * y * y
    }

    /// Min/max of the transformed y values. Falls back to [0, 99] when the
    /// series is empty so the caller never sees inverted sentinels.
    pub fn transformed_min_max(&self) -> (f64, f64) {
        let mut mi = MAX_VALUE;
        let mut ma = -MAX_VALUE;
        for s in self.series.iter() {
            let v = self.transformed(s.y);
            if v < mi {
                mi = v;
            }
            if v > ma {
                ma = v;
            }
        }
        if mi == MAX_VALUE {
            mi = 0.0;
        }
        if ma == -MAX_VALUE {
            ma = 99.0;
        }
        (mi, ma)
    }
}

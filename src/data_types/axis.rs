use serde::{Deserialize, Serialize};

use super::geometry::Dimension;

/// Scale mode of an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    #[default]
    Linear,
    /// Internal bounds are kept as log10 of the data values.
    Log,
}

/// How the horizontal axis annotates its ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    /// Absolute date/time labels picked from the nice-duration table.
    Time,
    /// Plain formatted values.
    #[default]
    Value,
}

/// Label format, selectable independently of the scale mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    /// `%g`-style with trailing-zero stripping, scientific below 1e-4.
    #[default]
    Auto,
    /// x.xxEyy
    Scientific,
    /// xEyy with integer mantissa.
    ScientificInt,
    /// Seconds rendered as H:MM:SS.
    Clock,
    /// Rounded integer, decimal.
    DecInt,
    /// Rounded integer, hexadecimal.
    HexInt,
    /// Rounded integer, binary.
    BinInt,
    /// Seconds since epoch rendered through the axis date format.
    Date,
}

/// Axis placement. The first component fixes the orientation for the whole
/// life of the axis; `OrgX`/`OrgY` variants pin the axis to the zero line
/// of the opposite axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPosition {
    HorizontalDown,
    HorizontalUp,
    /// Horizontal axis drawn at y = 0 of Y1.
    HorizontalOrg1,
    /// Horizontal axis drawn at y = 0 of Y2.
    HorizontalOrg2,
    VerticalRight,
    VerticalLeft,
    /// Vertical axis drawn at x = 0.
    VerticalOrg,
}

impl AxisPosition {
    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            AxisPosition::HorizontalDown
                | AxisPosition::HorizontalUp
                | AxisPosition::HorizontalOrg1
                | AxisPosition::HorizontalOrg2
        )
    }
}

/// Screen quadrant (relative to the plot rectangle center) the winning
/// hit-test point falls in; tells the caller where to place the tooltip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipPlacement {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// One generated tick label. Rebuilt wholesale on every measure pass; the
/// buffer is owned by the axis and must not be retained across passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
    /// Formatted text; empty when the label was blanked by duplicate
    /// suppression (the tick is still drawn).
    pub text: String,
    /// Measured text extent.
    pub size: Dimension,
    /// Position along the axis, in pixels from the axis origin.
    pub pos: f64,
    pub offset_x: i32,
    pub offset_y: i32,
}

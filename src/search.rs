use crate::data_types::{Point, Sample, TooltipPlacement};

/// Outcome of a nearest-point hit-test.
///
/// `x_sample` is filled in XY-correlated mode only: it is the X-source
/// sample that was paired with `sample`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Pixel coordinates of the matched point.
    pub point: Point,
    /// Index of the winning view on the searched axis.
    pub view_index: usize,
    /// The matched sample (untransformed values).
    pub sample: Sample,
    /// Index of the sample within its series; unavailable in correlated
    /// mode where points are produced by pairing.
    pub sample_index: Option<usize>,
    /// Squared pixel distance from the query to the matched point.
    pub dist2: i64,
    /// Quadrant for tooltip placement.
    pub placement: TooltipPlacement,
    /// X-source sample paired with the match (XY-correlated mode).
    pub x_sample: Option<Sample>,
}

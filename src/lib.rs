//! simchart crate: axis engine for live simulation charts

pub mod axis;
pub mod chart;
pub mod data_types;
pub mod export;
pub mod format;
pub mod metrics;
pub mod search;

pub use axis::Axis;
pub use chart::{Chart, ChartSearchResult, YAxis};
pub use data_types::{
    Annotation, AxisPosition, DataSeries, DataView, LabelFormat, Sample, Scale, SharedSeries,
    ViewStyle, MAX_VALUE,
};
pub use metrics::{DialogFont, FontMetrics};
pub use search::SearchResult;

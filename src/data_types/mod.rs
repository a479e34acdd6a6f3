pub mod axis;
pub mod data;
pub mod geometry;
pub mod view;

// Re-export everything for compatibility
pub use axis::*;
pub use data::*;
pub use geometry::*;
pub use view::*;

//! Data models for annotation records and their geometry.

mod annotation;
mod polygon;

pub use annotation::AnnotationRecord;
pub use polygon::{BoundingBox, MIN_POLYGON_VERTICES, ParseError, Polygon};

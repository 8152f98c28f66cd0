//! OCR Overlay - review text-detection results on their source images
//!
//! Loads a CSV table of detected text regions (a polygon, an id and the
//! recognized text per row), selects the rows that belong to the current image
//! and draws each polygon outline with a labelled box on a copy of the image.
//! A [`Session`] holds the per-user state a host UI drives: the table, the
//! current image and whether boxes are shown.

pub mod config;
pub mod constants;
pub mod data;
pub mod format;
pub mod model;
pub mod render;
pub mod state;

pub use config::AppConfig;
pub use render::{OverlayRenderer, RenderOutput, RenderStyle};
pub use state::{AnnotationStatus, Session, SessionError};

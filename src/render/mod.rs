//! Overlay rendering.
//!
//! The renderer is a pure function of `(image, records, visible)` plus an
//! immutable style and font. It never caches a previous render.

mod font;
mod overlay;
mod style;
mod text_metrics;

pub use font::{FontError, load_font, load_font_file};
pub use overlay::{OverlayRenderer, RenderOutput, SkippedRecord};
pub use style::RenderStyle;
pub use text_metrics::{LabelBox, LabelMetrics};

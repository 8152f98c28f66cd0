//! Visual parameters of the overlay.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Colors and sizes used when drawing labels and outlines.
///
/// Every field has a default so a config file may set only what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Glyph size in pixels
    pub font_size: f32,
    /// Height of one label slot
    pub line_height: f32,
    /// Width of the label cell
    pub cell_width: f32,
    /// Offset of the label anchor from the polygon's top-left corner
    pub label_inset: f32,
    /// Horizontal padding around the label cell
    pub label_pad_x: f32,
    /// Vertical padding around the label cell
    pub label_pad_y: f32,
    /// RGBA fill of the label background
    pub label_fill: [u8; 4],
    /// RGBA color of label glyphs
    pub label_text: [u8; 4],
    /// RGBA color of polygon outlines
    pub outline_color: [u8; 4],
    /// Stroke width of polygon outlines
    pub outline_width: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_size: constants::LABEL_FONT_SIZE,
            line_height: constants::LABEL_LINE_HEIGHT,
            cell_width: constants::LABEL_CELL_WIDTH,
            label_inset: constants::LABEL_INSET,
            label_pad_x: constants::LABEL_PAD_X,
            label_pad_y: constants::LABEL_PAD_Y,
            label_fill: constants::LABEL_FILL_RGBA,
            label_text: constants::LABEL_TEXT_RGBA,
            outline_color: constants::OUTLINE_RGBA,
            outline_width: constants::OUTLINE_WIDTH,
        }
    }
}

//! Label size estimation.
//!
//! Labels are not measured with real font metrics. Every character of the
//! label, including the line break between id and text, occupies one slot of
//! fixed height stacked vertically, and the cell has a fixed width. Long
//! labels therefore produce tall, narrow boxes. This is the established look
//! of the review overlay and is kept as-is.

use crate::render::style::RenderStyle;

/// Fixed-cell metrics for label layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// Height of one character slot
    pub line_height: f32,
    /// Width of the cell
    pub cell_width: f32,
    /// Horizontal padding of the background box
    pub pad_x: f32,
    /// Vertical padding of the background box
    pub pad_y: f32,
}

/// Background rectangle as left/top/right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl LabelMetrics {
    pub fn from_style(style: &RenderStyle) -> Self {
        Self {
            line_height: style.line_height,
            cell_width: style.cell_width,
            pad_x: style.label_pad_x,
            pad_y: style.label_pad_y,
        }
    }

    /// Number of vertical slots a label occupies (one per character).
    pub fn slot_count(&self, label: &str) -> usize {
        label.chars().count()
    }

    /// Estimate the text block size `(width, height)`.
    pub fn measure(&self, label: &str) -> (f32, f32) {
        (
            self.cell_width,
            self.slot_count(label) as f32 * self.line_height,
        )
    }

    /// Background box for a label anchored at `(x, y)`.
    pub fn label_box(&self, x: f32, y: f32, label: &str) -> LabelBox {
        let (width, height) = self.measure(label);
        LabelBox {
            left: x - self.pad_x,
            top: y - self.pad_y,
            right: x + width + self.pad_x,
            bottom: y + height + self.pad_y,
        }
    }

    /// Each character with the top of its slot, for a label anchored at `y`.
    pub fn slots<'a>(&self, y: f32, label: &'a str) -> impl Iterator<Item = (char, f32)> + 'a {
        let line_height = self.line_height;
        label
            .chars()
            .enumerate()
            .map(move |(i, c)| (c, y + i as f32 * line_height))
    }
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self::from_style(&RenderStyle::default())
    }
}

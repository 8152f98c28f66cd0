//! Global constants for the overlay renderer and its host.

/// Font size used for label glyphs (pixels).
pub const LABEL_FONT_SIZE: f32 = 36.0;

/// Height of one label slot. Every character of a label gets its own slot.
pub const LABEL_LINE_HEIGHT: f32 = 36.0;

/// Width of the label cell, independent of the label content.
pub const LABEL_CELL_WIDTH: f32 = 36.0;

/// Offset of the label anchor from the polygon's top-left corner.
pub const LABEL_INSET: f32 = 5.0;

/// Horizontal padding of the label background around the label cell.
pub const LABEL_PAD_X: f32 = 5.0;

/// Vertical padding of the label background around the label cell.
pub const LABEL_PAD_Y: f32 = 2.0;

/// Label background fill, roughly 25% opacity.
pub const LABEL_FILL_RGBA: [u8; 4] = [100, 255, 255, 64];

/// Label glyph color.
pub const LABEL_TEXT_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Polygon outline color.
pub const OUTLINE_RGBA: [u8; 4] = [255, 0, 0, 255];

/// Polygon outline stroke width (pixels).
pub const OUTLINE_WIDTH: f32 = 2.0;

/// Where "save CSV" writes the current table unless configured otherwise.
pub const DEFAULT_EXPORT_PATH: &str = "./tmp/output.csv";

/// CSV column holding the string-encoded polygon.
pub const COLUMN_POLYGON: &str = "polygon";

/// CSV column holding the text identifier.
pub const COLUMN_TEXT_ID: &str = "text_id";

/// CSV column holding the recognized text.
pub const COLUMN_TEXT: &str = "text";

/// CSV column associating a row with an image.
pub const COLUMN_FILE_NAME: &str = "file_name";

//! Font loading for label glyphs.
//!
//! A configured font path wins. Otherwise a short list of well-known system
//! font locations is tried in order.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use thiserror::Error;

/// System font locations tried when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/crosextra/Carlito-Regular.ttf",
    "/usr/share/fonts/truetype/Carlito-Regular.ttf",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Errors that can occur while loading a font.
#[derive(Error, Debug)]
pub enum FontError {
    /// Could not read the font file
    #[error("Failed to read font {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a font ab_glyph can parse
    #[error("Failed to parse font {path:?}")]
    Invalid { path: PathBuf },

    /// None of the system candidates exist
    #[error("No system fonts found. Install DejaVu fonts or set `font_path` in the config.")]
    NoSystemFont,
}

/// Load a font from a file.
pub fn load_font_file(path: &Path) -> Result<FontArc, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(data).map_err(|_| FontError::Invalid {
        path: path.to_path_buf(),
    })
}

/// Load the configured font, falling back to system fonts.
pub fn load_font(configured: Option<&Path>) -> Result<FontArc, FontError> {
    if let Some(path) = configured {
        let font = load_font_file(path)?;
        log::info!("Loaded label font from {:?}", path);
        return Ok(font);
    }

    for candidate in SYSTEM_FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load_font_file(path) {
            Ok(font) => {
                log::info!("Loaded system label font {:?}", path);
                return Ok(font);
            }
            Err(e) => log::warn!("Skipping system font: {}", e),
        }
    }

    Err(FontError::NoSystemFont)
}

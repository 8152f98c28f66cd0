//! Loading source images and deriving their annotation key.
//!
//! The key used to match table rows to an image is the filename stem:
//! no directory, no extension. `scans/page_01.png` has key `page_01`.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

/// Supported image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp", "gif"];

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    /// Could not read the file
    #[error("Failed to read image {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded image together with the key used to filter annotations.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Decoded pixels, never modified after loading
    pub image: DynamicImage,
    /// Filename stem, if the image came from a named source
    pub key: Option<String>,
    /// Where the image was read from, if it was read from disk
    pub path: Option<PathBuf>,
}

impl LoadedImage {
    /// Wrap an in-memory image. `name` may be a bare filename or a full path.
    pub fn from_memory(image: DynamicImage, name: Option<&str>) -> Self {
        Self {
            image,
            key: name.and_then(|n| image_key(Path::new(n))),
            path: None,
        }
    }

    /// Decode an image from raw bytes.
    pub fn from_bytes(data: &[u8], name: Option<&str>) -> Result<Self, ImageLoadError> {
        let image = image::load_from_memory(data)?;
        Ok(Self::from_memory(image, name))
    }

    /// Read and decode an image file.
    pub fn from_path(path: &Path) -> Result<Self, ImageLoadError> {
        if !is_image_file(path) {
            log::debug!("{:?} has no known image extension, trying to decode anyway", path);
        }

        let data = std::fs::read(path).map_err(|source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&data)?;

        log::info!(
            "Loaded image {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );

        Ok(Self {
            image,
            key: image_key(path),
            path: Some(path.to_path_buf()),
        })
    }
}

/// Filename stem of a path, or `None` when the path has no usable file name.
pub fn image_key(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Check if a path has a supported image extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

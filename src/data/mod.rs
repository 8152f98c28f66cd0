//! Source image loading.

mod image_loader;

pub use image_loader::{IMAGE_EXTENSIONS, ImageLoadError, LoadedImage, image_key, is_image_file};

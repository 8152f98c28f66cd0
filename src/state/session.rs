//! One review session: the annotation table, the current image and the
//! overlay visibility, plus the actions a host UI triggers on them.
//!
//! The host owns the `Session` and calls one action at a time. Independent
//! sessions share nothing, so several can coexist in one process.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::DEFAULT_EXPORT_PATH;
use crate::data::{ImageLoadError, LoadedImage};
use crate::format::{AnnotationTable, CsvFormat, FormatError};
use crate::model::AnnotationRecord;
use crate::render::{OverlayRenderer, RenderOutput};
use crate::state::store::AnnotationStore;

/// Errors surfaced to the host by session actions.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The action needs state that has not been loaded yet
    #[error("Cannot {action}: {reason}")]
    NotReady {
        /// What was attempted
        action: &'static str,
        /// What is missing
        reason: &'static str,
    },

    /// Loading an annotation table failed; the previous table is kept
    #[error("Failed to load annotation table: {source}")]
    Load {
        #[source]
        source: FormatError,
    },

    /// Loading an image failed; the previous image is kept
    #[error(transparent)]
    Image(#[from] ImageLoadError),

    /// Writing the annotation table failed
    #[error("Failed to save annotation table to {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// How the loaded table relates to the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStatus {
    /// No table has been loaded
    NoTable,
    /// A table is loaded but none of its rows apply to the current image
    NoneForImage,
    /// This many rows apply to the current image
    Available(usize),
}

/// Per-session review state.
#[derive(Debug)]
pub struct Session {
    store: AnnotationStore,
    image: Option<LoadedImage>,
    boxes_visible: bool,
    renderer: OverlayRenderer,
    export_path: PathBuf,
}

impl Session {
    /// Create an empty session: no table, no image, boxes visible.
    pub fn new(renderer: OverlayRenderer) -> Self {
        Self {
            store: AnnotationStore::new(),
            image: None,
            boxes_visible: true,
            renderer,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    /// Set where `save_csv` writes the table.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn current_image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Key used to select table rows for the current image.
    pub fn current_image_key(&self) -> Option<&str> {
        self.image.as_ref().and_then(|img| img.key.as_deref())
    }

    pub fn boxes_visible(&self) -> bool {
        self.boxes_visible
    }

    // ---- image ----

    /// Replace the current image. Does not render.
    pub fn set_image(&mut self, image: LoadedImage) {
        log::debug!("Current image key is now {:?}", image.key);
        self.image = Some(image);
    }

    /// Read an image file and make it current. On failure the previous image stays.
    pub fn load_image(&mut self, path: &Path) -> Result<(), SessionError> {
        let image = LoadedImage::from_path(path)?;
        self.set_image(image);
        Ok(())
    }

    // ---- table ----

    /// Load a CSV file as the new table. On failure the previous table stays.
    pub fn load_csv(&mut self, path: &Path) -> Result<usize, SessionError> {
        let table = CsvFormat
            .import(path)
            .map_err(|source| SessionError::Load { source })?;
        Ok(self.install_table(table))
    }

    /// Load CSV content from a reader (e.g. an upload held in memory).
    pub fn load_csv_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, SessionError> {
        let table = CsvFormat
            .import_from_reader(reader)
            .map_err(|source| SessionError::Load { source })?;
        Ok(self.install_table(table))
    }

    fn install_table(&mut self, table: AnnotationTable) -> usize {
        let rows = table.len();
        self.store.load(table);
        rows
    }

    /// Swap in a table the user edited.
    pub fn update_table(&mut self, table: AnnotationTable) {
        self.store.update(table);
    }

    /// Rows of the table that apply to the current image, in row order, with
    /// their table row index.
    ///
    /// Re-derived from the store on every call.
    pub fn current_records(&self) -> impl Iterator<Item = (usize, &AnnotationRecord)> + '_ {
        self.store.filter_by_image(self.current_image_key())
    }

    pub fn annotation_status(&self) -> AnnotationStatus {
        if !self.store.is_loaded() {
            return AnnotationStatus::NoTable;
        }
        match self.current_records().count() {
            0 => AnnotationStatus::NoneForImage,
            n => AnnotationStatus::Available(n),
        }
    }

    // ---- rendering ----

    /// Render the current image with the current visibility and records.
    ///
    /// Returns `None` when no image is loaded. With no applicable rows the
    /// image is passed through unchanged.
    pub fn annotate(&self) -> Option<RenderOutput<'_>> {
        let Some(loaded) = &self.image else {
            log::info!("Nothing to annotate: no image loaded");
            return None;
        };

        match self.annotation_status() {
            AnnotationStatus::NoTable => log::info!("No annotation table loaded"),
            AnnotationStatus::NoneForImage => log::info!(
                "No annotations for image {:?}",
                self.current_image_key().unwrap_or_default()
            ),
            AnnotationStatus::Available(n) => {
                log::debug!("{} annotations apply to the current image", n)
            }
        }

        Some(
            self.renderer
                .render(&loaded.image, self.current_records(), self.boxes_visible),
        )
    }

    /// Flip box visibility and re-render the current image.
    pub fn toggle_boxes(&mut self) -> Option<RenderOutput<'_>> {
        self.boxes_visible = !self.boxes_visible;
        log::info!(
            "Bounding boxes {}",
            if self.boxes_visible { "shown" } else { "hidden" }
        );
        self.annotate()
    }

    pub fn set_boxes_visible(&mut self, visible: bool) {
        self.boxes_visible = visible;
    }

    // ---- saving ----

    /// Write the current table to the configured export path.
    pub fn save_csv(&self) -> Result<PathBuf, SessionError> {
        self.save_csv_to(&self.export_path)
    }

    /// Write the current table to `path`.
    pub fn save_csv_to(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let table = self.store.table().ok_or(SessionError::NotReady {
            action: "save annotation table",
            reason: "no table loaded",
        })?;

        CsvFormat
            .export(table, path)
            .map_err(|source| SessionError::Save {
                path: path.to_path_buf(),
                source,
            })
    }
}

//! The current annotation table and its typed records.

use crate::format::AnnotationTable;
use crate::model::AnnotationRecord;

/// Holds the annotation table of one session.
///
/// The table is always swapped as a whole; there is no per-row mutation.
/// "No table loaded" (`None`) is kept distinct from "a table with zero rows".
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    table: Option<AnnotationTable>,
    records: Vec<AnnotationRecord>,
}

impl AnnotationStore {
    /// Create an empty store with no table loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire record set with a freshly loaded table.
    pub fn load(&mut self, table: AnnotationTable) {
        log::info!("Loaded annotation table with {} rows", table.len());
        self.replace(table);
    }

    /// Replace the entire record set after the user edited the table.
    pub fn update(&mut self, table: AnnotationTable) {
        log::debug!("Annotation table edited, now {} rows", table.len());
        self.replace(table);
    }

    fn replace(&mut self, table: AnnotationTable) {
        self.records = table.to_records();
        self.table = Some(table);
    }

    /// Forget the loaded table.
    pub fn clear(&mut self) {
        self.table = None;
        self.records.clear();
    }

    /// Whether a table has been loaded (it may still have zero rows).
    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&AnnotationTable> {
        self.table.as_ref()
    }

    /// All records in row order.
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that apply to the image identified by `key`, in row order,
    /// each paired with its zero-based row index in the table.
    ///
    /// `None` or an empty key yields every record. Records without a source
    /// image are included for any key.
    pub fn filter_by_image<'a>(
        &'a self,
        key: Option<&'a str>,
    ) -> impl Iterator<Item = (usize, &'a AnnotationRecord)> + 'a {
        let key = key.unwrap_or_default();
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.matches_image(key))
    }
}

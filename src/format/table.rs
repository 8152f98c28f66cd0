//! In-memory annotation table.
//!
//! The table keeps every column it was loaded with, not only the ones the
//! renderer understands, so that saving an edited table writes back the same
//! row/column shape the user supplied.

use crate::constants::{COLUMN_FILE_NAME, COLUMN_POLYGON, COLUMN_TEXT, COLUMN_TEXT_ID};
use crate::format::error::FormatError;
use crate::model::AnnotationRecord;

/// Header plus string cells, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Column positions of the fields the renderer reads.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    polygon: usize,
    text_id: Option<usize>,
    text: Option<usize>,
    file_name: Option<usize>,
}

impl AnnotationTable {
    /// Build a table, checking that a `polygon` column exists and that
    /// every row has one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, FormatError> {
        let table = Self { headers, rows };
        table.column_map()?;

        let expected = table.headers.len();
        if let Some((row, cells)) = table
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(FormatError::RaggedRow {
                row,
                expected,
                found: cells.len(),
            });
        }

        Ok(table)
    }

    /// Build a table holding only the columns the renderer reads.
    pub fn from_records(records: &[AnnotationRecord]) -> Self {
        let headers = [COLUMN_POLYGON, COLUMN_TEXT_ID, COLUMN_TEXT, COLUMN_FILE_NAME]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.polygon.clone(),
                    r.text_id.clone().unwrap_or_default(),
                    r.text.clone().unwrap_or_default(),
                    r.source_image.clone().unwrap_or_default(),
                ]
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn column_map(&self) -> Result<ColumnMap, FormatError> {
        let polygon = self
            .column_index(COLUMN_POLYGON)
            .ok_or_else(|| FormatError::missing_column(COLUMN_POLYGON))?;

        Ok(ColumnMap {
            polygon,
            text_id: self.column_index(COLUMN_TEXT_ID),
            text: self.column_index(COLUMN_TEXT),
            file_name: self.column_index(COLUMN_FILE_NAME),
        })
    }

    /// Map every row into an annotation record. Empty optional cells become `None`.
    pub fn to_records(&self) -> Vec<AnnotationRecord> {
        // `new` guarantees the polygon column, but a default table has no header at all.
        let Ok(columns) = self.column_map() else {
            return Vec::new();
        };

        fn optional(cells: &[String], index: Option<usize>) -> Option<String> {
            index
                .and_then(|i| cells.get(i))
                .filter(|cell| !cell.is_empty())
                .cloned()
        }

        self.rows
            .iter()
            .map(|cells| AnnotationRecord {
                polygon: cells.get(columns.polygon).cloned().unwrap_or_default(),
                text_id: optional(cells, columns.text_id),
                text: optional(cells, columns.text),
                source_image: optional(cells, columns.file_name),
            })
            .collect()
    }
}

//! CSV import/export for annotation tables.
//!
//! The first row is the header. Every other row becomes one annotation,
//! mapped by column name. Columns the renderer does not use are carried
//! through untouched so an export writes back the same shape.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::format::table::AnnotationTable;

/// CSV annotation table format.
pub struct CsvFormat;

impl CsvFormat {
    /// Unique identifier for this format.
    pub fn id(&self) -> &'static str {
        "csv"
    }

    /// File extensions this format uses.
    pub fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    /// Read a table from a file.
    pub fn import(&self, path: &Path) -> Result<AnnotationTable, FormatError> {
        log::info!("Importing annotation table from {:?}", path);

        if !path.exists() {
            return Err(FormatError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = std::fs::File::open(path)?;
        let table = self.import_from_reader(file)?;

        log::info!(
            "Imported {} rows with {} columns",
            table.len(),
            table.headers().len()
        );

        Ok(table)
    }

    /// Read a table from any reader (used for in-memory uploads).
    pub fn import_from_reader<R: Read>(&self, reader: R) -> Result<AnnotationTable, FormatError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        AnnotationTable::new(headers, rows)
    }

    /// Write a table to `path`, creating parent directories as needed.
    pub fn export(&self, table: &AnnotationTable, path: &Path) -> Result<PathBuf, FormatError> {
        log::info!("Exporting annotation table to {:?}", path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = self.export_to_bytes(table)?;
        std::fs::write(path, &bytes)?;

        log::info!("Exported {} rows to {:?}", table.len(), path);

        Ok(path.to_path_buf())
    }

    /// Serialize a table to CSV bytes.
    pub fn export_to_bytes(&self, table: &AnnotationTable) -> Result<Vec<u8>, FormatError> {
        let mut buffer = Vec::new();
        self.export_to_writer(table, &mut buffer)?;
        Ok(buffer)
    }

    /// Serialize a table into any writer.
    pub fn export_to_writer<W: Write>(
        &self,
        table: &AnnotationTable,
        writer: W,
    ) -> Result<(), FormatError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(table.headers())?;
        for row in table.rows() {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

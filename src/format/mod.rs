//! Annotation table import/export.
//!
//! Tables are loaded wholesale from CSV, edited by the host as a whole, and
//! written back with the same header and row shape.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocr_overlay::format::CsvFormat;
//!
//! let table = CsvFormat.import(Path::new("detections.csv"))?;
//! let records = table.to_records();
//! CsvFormat.export(&table, Path::new("./tmp/output.csv"))?;
//! ```

mod csv_table;
mod error;
mod table;

#[cfg(test)]
mod tests;

pub use csv_table::CsvFormat;
pub use error::FormatError;
pub use table::AnnotationTable;

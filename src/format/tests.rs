//! Tests for CSV table import and export.

use crate::format::{CsvFormat, FormatError};

const SAMPLE: &str = "\
file_name,text_id,text,polygon,confidence
page_01.png,1,hello,\"[[10,10],[100,10],[100,60],[10,60]]\",0.98
page_01.png,2,world,\"[[120,10],[200,10],[200,60],[120,60]]\",0.87
page_02.png,3,\"multi, word\",\"[[5,5],[50,5],[50,20]]\",0.5
";

#[test]
fn test_csv_import_maps_columns() {
    let table = CsvFormat.import_from_reader(SAMPLE.as_bytes()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.headers(),
        &["file_name", "text_id", "text", "polygon", "confidence"]
    );

    let records = table.to_records();
    assert_eq!(records[0].polygon, "[[10,10],[100,10],[100,60],[10,60]]");
    assert_eq!(records[2].text.as_deref(), Some("multi, word"));
    assert_eq!(records[2].source_image.as_deref(), Some("page_02.png"));
}

#[test]
fn test_csv_export_preserves_shape() {
    let table = CsvFormat.import_from_reader(SAMPLE.as_bytes()).unwrap();
    let bytes = CsvFormat.export_to_bytes(&table).unwrap();

    let reimported = CsvFormat.import_from_reader(bytes.as_slice()).unwrap();
    assert_eq!(reimported, table);

    let text = String::from_utf8(bytes).unwrap();
    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line, "file_name,text_id,text,polygon,confidence");
}

#[test]
fn test_csv_import_keeps_malformed_polygons() {
    let csv = "polygon,text\nnot-a-polygon,x\n\"[[0,0],[1,1],[2,0]]\",y\n";
    let table = CsvFormat.import_from_reader(csv.as_bytes()).unwrap();
    let records = table.to_records();

    assert_eq!(records.len(), 2);
    assert!(records[0].parse_polygon().is_err());
    assert!(records[1].parse_polygon().is_ok());
}

#[test]
fn test_csv_import_missing_polygon_column() {
    let csv = "text_id,text\n1,hello\n";
    let err = CsvFormat.import_from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, FormatError::MissingColumn { .. }));
}

#[test]
fn test_csv_import_ragged_file_fails() {
    let csv = "polygon,text\n\"[[0,0]]\",a,extra\n";
    let err = CsvFormat.import_from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, FormatError::Csv(_)));
}

#[test]
fn test_csv_import_missing_file() {
    let path = std::env::temp_dir().join("ocr_overlay_does_not_exist.csv");
    let err = CsvFormat.import(&path).unwrap_err();
    assert!(matches!(err, FormatError::NotFound { .. }));
}

#[test]
fn test_csv_export_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("ocr_overlay_export_{}", std::process::id()));
    let path = dir.join("nested").join("output.csv");

    let table = CsvFormat.import_from_reader(SAMPLE.as_bytes()).unwrap();
    let written = CsvFormat.export(&table, &path).unwrap();

    assert_eq!(written, path);
    let reimported = CsvFormat.import(&path).unwrap();
    assert_eq!(reimported.len(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

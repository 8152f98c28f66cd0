//! Annotation records: one table row mapped into typed fields.

use crate::model::polygon::{ParseError, Polygon};

/// One text-detection annotation.
///
/// The polygon is kept in its raw string form and parsed on demand, so a
/// table with a malformed polygon cell still loads; the row is only rejected
/// when something tries to draw it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// String-encoded vertex list, e.g. `[[10,10],[50,10],[50,30]]`
    pub polygon: String,
    /// Identifier of the detected text
    pub text_id: Option<String>,
    /// Recognized text content
    pub text: Option<String>,
    /// Filename (or part of it) of the image this row belongs to
    pub source_image: Option<String>,
}

impl AnnotationRecord {
    /// Create a record with only a polygon.
    pub fn new(polygon: impl Into<String>) -> Self {
        Self {
            polygon: polygon.into(),
            ..Self::default()
        }
    }

    pub fn with_text_id(mut self, text_id: impl Into<String>) -> Self {
        self.text_id = Some(text_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_source_image(mut self, source_image: impl Into<String>) -> Self {
        self.source_image = Some(source_image.into());
        self
    }

    /// Parse the polygon cell.
    pub fn parse_polygon(&self) -> Result<Polygon, ParseError> {
        self.polygon.parse()
    }

    /// Two-line display label `"<text_id>\n<text>"`, absent fields rendered empty.
    pub fn label(&self) -> String {
        format!(
            "{}\n{}",
            self.text_id.as_deref().unwrap_or_default(),
            self.text.as_deref().unwrap_or_default()
        )
    }

    /// Whether this record applies to the image identified by `key`.
    ///
    /// An empty key matches everything. Otherwise the record's source image
    /// must contain the key (case-sensitive). Records without a source image
    /// apply to any image.
    pub fn matches_image(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        self.source_image
            .as_deref()
            .is_none_or(|source| source.contains(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_format() {
        let record = AnnotationRecord::new("[[0,0]]")
            .with_text_id("1")
            .with_text("hello");
        assert_eq!(record.label(), "1\nhello");
    }

    #[test]
    fn test_label_with_missing_fields() {
        let record = AnnotationRecord::new("[[0,0]]");
        assert_eq!(record.label(), "\n");

        let record = AnnotationRecord::new("[[0,0]]").with_text("only text");
        assert_eq!(record.label(), "\nonly text");
    }

    #[test]
    fn test_matches_image() {
        let record = AnnotationRecord::new("[[0,0]]").with_source_image("scans/page_01.png");
        assert!(record.matches_image("page_01"));
        assert!(record.matches_image(""));
        assert!(!record.matches_image("PAGE_01"));
        assert!(!record.matches_image("page_02"));

        let unassigned = AnnotationRecord::new("[[0,0]]");
        assert!(unassigned.matches_image(""));
        assert!(unassigned.matches_image("page_01"));
        assert!(unassigned.matches_image("anything"));
    }

    #[test]
    fn test_parse_polygon_is_lazy() {
        let record = AnnotationRecord::new("garbage");
        assert!(record.parse_polygon().is_err());
    }
}

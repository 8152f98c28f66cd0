//! Scenario tests for a review session: load, annotate, toggle, edit, save.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use image::{DynamicImage, Rgb, RgbImage};

use crate::data::LoadedImage;
use crate::format::AnnotationTable;
use crate::model::AnnotationRecord;
use crate::render::{OverlayRenderer, RenderStyle, load_font};
use crate::state::{AnnotationStatus, Session, SessionError};

const HELLO_CSV: &str = "\
text_id,text,polygon,file_name
1,hello,\"[[10,10],[100,10],[100,60],[10,60]]\",page_01.png
";

fn white_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

fn session() -> Session {
    Session::new(OverlayRenderer::new(RenderStyle::default(), None))
}

fn session_with_image(name: &str) -> Session {
    let mut session = session();
    session.set_image(LoadedImage::from_memory(white_image(400, 300), Some(name)));
    session
}

fn pixel_hash(image: &DynamicImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    image.as_bytes().hash(&mut hasher);
    hasher.finish()
}

fn is_red(px: &image::Rgba<u8>) -> bool {
    px[0] > 200 && px[1] < 100 && px[2] < 100
}

#[test]
fn test_end_to_end_hello() {
    let mut session = session_with_image("uploads/page_01.png");
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    let source_hash = pixel_hash(&session.current_image().unwrap().image);

    let first = session.annotate().unwrap();
    assert_eq!(first.drawn, 1);
    let rendered = first.into_image().to_rgba8();
    assert_eq!(rendered.dimensions(), (400, 300));

    // Outline edges outside the label box
    assert!(is_red(rendered.get_pixel(80, 10)));
    assert!(is_red(rendered.get_pixel(80, 60)));
    assert!(is_red(rendered.get_pixel(100, 35)));
    // Interior of the polygon to the right of the label box is untouched
    assert_eq!(rendered.get_pixel(80, 35).0, [255, 255, 255, 255]);
    // Label box starts just inside the top-left corner and is translucent cyan
    let tint = rendered.get_pixel(30, 150);
    assert!(tint[0] < 240 && tint[1] >= 250 && tint[2] >= 250, "got {:?}", tint);
    assert_eq!(rendered.get_pixel(5, 150).0, [255, 255, 255, 255]);

    // Toggle off: the original image comes back untouched
    let hidden = session.toggle_boxes().unwrap();
    assert!(hidden.is_identity());
    assert_eq!(pixel_hash(&hidden.image), source_hash);
    drop(hidden);
    assert!(!session.boxes_visible());

    // Toggle on: the same overlay again
    let shown = session.toggle_boxes().unwrap();
    assert_eq!(shown.into_image().to_rgba8(), rendered);

    // The source image was never modified
    assert_eq!(pixel_hash(&session.current_image().unwrap().image), source_hash);
}

#[test]
fn test_label_glyphs_drawn_when_font_available() {
    let Ok(font) = load_font(None) else {
        // No system font on this machine; glyph drawing cannot be checked.
        return;
    };

    let mut session = Session::new(OverlayRenderer::new(RenderStyle::default(), Some(font)));
    session.set_image(LoadedImage::from_memory(white_image(400, 300), Some("page_01.png")));
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    let rendered = session.annotate().unwrap().into_image().to_rgba8();

    // First slot holds "1": some dark pixels inside the cell at (15, 15)..(51, 51)
    let dark = (15..51)
        .flat_map(|x| (15..51).map(move |y| (x, y)))
        .filter(|&(x, y)| rendered.get_pixel(x, y)[0] < 80)
        .count();
    assert!(dark > 0);
}

#[test]
fn test_toggle_twice_restores_render() {
    let mut session = session_with_image("page_01");
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    let before = session.annotate().unwrap().into_image();
    let _ = session.toggle_boxes();
    let after = session.toggle_boxes().unwrap().into_image();

    assert_eq!(before.as_bytes(), after.as_bytes());
    assert!(session.boxes_visible());
}

#[test]
fn test_annotate_without_image() {
    let mut session = session();
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();
    assert!(session.annotate().is_none());
    assert!(session.toggle_boxes().is_none());
}

#[test]
fn test_annotate_without_table_is_identity() {
    let session = session_with_image("page_01.png");
    assert_eq!(session.annotation_status(), AnnotationStatus::NoTable);
    let out = session.annotate().unwrap();
    assert!(out.is_identity());
}

#[test]
fn test_no_annotations_for_other_image() {
    let mut session = session_with_image("page_02.png");
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    assert_eq!(session.annotation_status(), AnnotationStatus::NoneForImage);
    assert!(session.annotate().unwrap().is_identity());
}

#[test]
fn test_unnamed_image_uses_every_row() {
    let mut session = session();
    session.set_image(LoadedImage::from_memory(white_image(200, 100), None));
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    assert_eq!(session.current_image_key(), None);
    assert_eq!(session.annotation_status(), AnnotationStatus::Available(1));
    assert_eq!(session.annotate().unwrap().drawn, 1);
}

#[test]
fn test_rows_without_file_name_apply_to_any_image() {
    let csv = "text_id,text,polygon\n1,hello,\"[[10,10],[100,10],[100,60],[10,60]]\"\n";
    let mut session = session_with_image("uploads/page_01.png");
    session.load_csv_from_reader(csv.as_bytes()).unwrap();

    assert_eq!(session.annotation_status(), AnnotationStatus::Available(1));
    let out = session.annotate().unwrap();
    assert!(!out.is_identity());
    assert_eq!(out.drawn, 1);
}

#[test]
fn test_malformed_row_is_skipped() {
    let csv = "\
text_id,text,polygon
1,a,\"[[10,10],[60,10],[60,40]]\"
2,b,\"[[10,10],[60\"
3,c,\"[[100,100],[150,100],[150,140]]\"
";
    let mut session = session_with_image("anything.png");
    session.load_csv_from_reader(csv.as_bytes()).unwrap();

    let out = session.annotate().unwrap();
    assert_eq!(out.drawn, 2);
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].text_id.as_deref(), Some("2"));
    assert_eq!(out.skipped[0].row, 1);
}

#[test]
fn test_edit_is_reflected_on_next_render() {
    let mut session = session_with_image("page_01.png");
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();
    assert_eq!(session.annotate().unwrap().drawn, 1);

    let edited = AnnotationTable::from_records(&[
        AnnotationRecord::new("[[10,10],[50,10],[50,50]]").with_source_image("page_01.png"),
        AnnotationRecord::new("[[200,100],[250,100],[250,150]]").with_source_image("page_01.png"),
        AnnotationRecord::new("[[0,0],[5,0],[5,5]]").with_source_image("page_09.png"),
    ]);
    session.update_table(edited);

    assert_eq!(session.annotation_status(), AnnotationStatus::Available(2));
    assert_eq!(session.annotate().unwrap().drawn, 2);
}

#[test]
fn test_failed_reload_keeps_table() {
    let mut session = session_with_image("page_01.png");
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    let err = session
        .load_csv_from_reader("text_id,text\n1,no polygon column\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, SessionError::Load { .. }));

    assert_eq!(session.store().len(), 1);
    assert_eq!(session.annotation_status(), AnnotationStatus::Available(1));
}

#[test]
fn test_failed_image_load_keeps_image() {
    let mut session = session_with_image("page_01.png");
    let missing = std::env::temp_dir().join("ocr_overlay_no_such_image.png");

    let err = session.load_image(&missing).unwrap_err();
    assert!(matches!(err, SessionError::Image(_)));
    assert_eq!(session.current_image_key(), Some("page_01"));
}

#[test]
fn test_save_without_table_is_not_ready() {
    let session = session_with_image("page_01.png");
    let err = session.save_csv().unwrap_err();
    assert!(matches!(err, SessionError::NotReady { .. }));
}

#[test]
fn test_save_writes_current_table() {
    let path = std::env::temp_dir()
        .join(format!("ocr_overlay_session_{}", std::process::id()))
        .join("output.csv");
    let mut session = session().with_export_path(&path);
    session.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();

    let written = session.save_csv().unwrap();
    assert_eq!(written, path);

    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved.replace("\r\n", "\n"), HELLO_CSV);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn test_sessions_are_independent() {
    let mut a = session_with_image("page_01.png");
    let b = session_with_image("page_01.png");

    a.load_csv_from_reader(HELLO_CSV.as_bytes()).unwrap();
    let _ = a.toggle_boxes();

    assert!(b.boxes_visible());
    assert!(!b.store().is_loaded());
    assert!(!a.boxes_visible());
}

//! Burns annotation overlays into an image.
//!
//! All drawing goes onto a transparent layer the size of the source image.
//! The result is the source (converted to RGBA) with that layer alpha
//! composited on top. The source image itself is never touched: when there
//! is nothing to draw the renderer hands back a borrow of the input.

use std::borrow::Cow;

use ab_glyph::{Font, FontArc, PxScale, PxScaleFont, ScaleFont, point};
use image::{DynamicImage, Rgba, RgbaImage};
use tiny_skia::{BlendMode, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, Transform};

use crate::model::{AnnotationRecord, ParseError, Polygon};
use crate::render::style::RenderStyle;
use crate::render::text_metrics::{LabelBox, LabelMetrics};

/// A record that was left out of a render because its polygon did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Zero-based row index of the record in its table
    pub row: usize,
    /// The record's text id, for reporting
    pub text_id: Option<String>,
    /// Why the polygon was rejected
    pub error: ParseError,
}

/// Result of a render call.
#[derive(Debug)]
pub struct RenderOutput<'a> {
    /// The input itself when nothing was drawn, otherwise a new RGBA image
    pub image: Cow<'a, DynamicImage>,
    /// Number of records that produced an overlay
    pub drawn: usize,
    /// Records skipped because of malformed polygons
    pub skipped: Vec<SkippedRecord>,
}

impl<'a> RenderOutput<'a> {
    fn identity(image: &'a DynamicImage) -> Self {
        Self {
            image: Cow::Borrowed(image),
            drawn: 0,
            skipped: Vec::new(),
        }
    }

    /// Whether the output is the untouched input.
    pub fn is_identity(&self) -> bool {
        matches!(self.image, Cow::Borrowed(_))
    }

    /// Take ownership of the rendered image, cloning the input if it was passed through.
    pub fn into_image(self) -> DynamicImage {
        self.image.into_owned()
    }
}

/// Draws label boxes, label text and polygon outlines.
///
/// Holds only immutable style and font data, so one renderer can serve any
/// number of independent sessions.
#[derive(Clone)]
pub struct OverlayRenderer {
    style: RenderStyle,
    metrics: LabelMetrics,
    font: Option<FontArc>,
}

impl std::fmt::Debug for OverlayRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRenderer")
            .field("style", &self.style)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl OverlayRenderer {
    /// Create a renderer. Without a font, labels get their background box but no glyphs.
    pub fn new(style: RenderStyle, font: Option<FontArc>) -> Self {
        if font.is_none() {
            log::warn!("No label font available, overlay labels will be drawn without text");
        }
        Self {
            metrics: LabelMetrics::from_style(&style),
            style,
            font,
        }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render `records` onto `image`. Each record comes with its table row
    /// index, which is reported back for skipped rows.
    ///
    /// Returns the input unchanged when `visible` is false or `records` is
    /// empty. Records whose polygon fails to parse are skipped and listed in
    /// the output; they never abort the render.
    pub fn render<'a, 'r>(
        &self,
        image: &'a DynamicImage,
        records: impl IntoIterator<Item = (usize, &'r AnnotationRecord)>,
        visible: bool,
    ) -> RenderOutput<'a> {
        if !visible {
            log::debug!("Overlay hidden, returning source image");
            return RenderOutput::identity(image);
        }

        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            log::debug!("No annotations to draw, returning source image");
            return RenderOutput::identity(image);
        }

        let Some(mut layer) = Pixmap::new(image.width(), image.height()) else {
            log::warn!(
                "Cannot draw on a {}x{} image, returning it unchanged",
                image.width(),
                image.height()
            );
            return RenderOutput::identity(image);
        };

        let mut drawn = 0;
        let mut skipped = Vec::new();

        for (row, record) in records {
            let polygon = match record.parse_polygon() {
                Ok(polygon) => polygon,
                Err(error) => {
                    log::warn!("Skipping annotation in row {}: {}", row, error);
                    skipped.push(SkippedRecord {
                        row,
                        text_id: record.text_id.clone(),
                        error,
                    });
                    continue;
                }
            };

            self.draw_record(&mut layer, &polygon, &record.label());
            drawn += 1;
        }

        log::info!(
            "Rendered {} overlays ({} skipped) on {}x{} image",
            drawn,
            skipped.len(),
            image.width(),
            image.height()
        );

        let mut composite = image.to_rgba8();
        composite_over(&mut composite, &layer);

        RenderOutput {
            image: Cow::Owned(DynamicImage::ImageRgba8(composite)),
            drawn,
            skipped,
        }
    }

    fn draw_record(&self, layer: &mut Pixmap, polygon: &Polygon, label: &str) {
        let bbox = polygon.bounding_box();
        let anchor_x = bbox.min_x + self.style.label_inset;
        let anchor_y = bbox.min_y + self.style.label_inset;

        log::trace!(
            "Drawing {:?} at ({}, {}) with {} vertices",
            label,
            anchor_x,
            anchor_y,
            polygon.len()
        );

        let label_box = self.metrics.label_box(anchor_x, anchor_y, label);
        fill_box(layer, &label_box, self.style.label_fill);

        if let Some(font) = &self.font {
            let scaled = font.as_scaled(PxScale::from(self.style.font_size));
            for (c, slot_top) in self.metrics.slots(anchor_y, label) {
                if c.is_control() {
                    continue;
                }
                draw_glyph(
                    layer,
                    font,
                    &scaled,
                    c,
                    anchor_x,
                    slot_top,
                    self.style.label_text,
                );
            }
        }

        self.stroke_polygon(layer, polygon);
    }

    fn stroke_polygon(&self, layer: &mut Pixmap, polygon: &Polygon) {
        let vertices = polygon.vertices();
        let mut builder = PathBuilder::new();
        builder.move_to(vertices[0].0, vertices[0].1);
        for &(x, y) in &vertices[1..] {
            builder.line_to(x, y);
        }
        builder.close();

        let Some(path) = builder.finish() else {
            log::debug!("Polygon with {} vertex has no outline to draw", vertices.len());
            return;
        };

        let stroke = Stroke {
            width: self.style.outline_width,
            ..Stroke::default()
        };
        layer.stroke_path(
            &path,
            &solid_paint(self.style.outline_color),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn solid_paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn fill_box(layer: &mut Pixmap, label_box: &LabelBox, rgba: [u8; 4]) {
    // Boxes that hang off the image are clipped by tiny-skia.
    let Some(rect) = Rect::from_ltrb(
        label_box.left,
        label_box.top,
        label_box.right,
        label_box.bottom,
    ) else {
        return;
    };
    // Boxes replace what is under them on the layer, so overlapping labels
    // keep the fill's own alpha instead of stacking.
    let mut paint = solid_paint(rgba);
    paint.blend_mode = BlendMode::Source;
    paint.anti_alias = false;
    layer.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Rasterize one glyph with its top at `top`, blending it over the layer.
fn draw_glyph(
    layer: &mut Pixmap,
    font: &FontArc,
    scaled: &PxScaleFont<&FontArc>,
    c: char,
    left: f32,
    top: f32,
    rgba: [u8; 4],
) {
    let mut glyph = scaled.scaled_glyph(c);
    glyph.position = point(left, top + scaled.ascent());

    let Some(outlined) = font.outline_glyph(glyph) else {
        return;
    };

    let bounds = outlined.px_bounds();
    let width = layer.width() as i32;
    let height = layer.height() as i32;
    let pixels = layer.pixels_mut();

    outlined.draw(|gx, gy, coverage| {
        let x = bounds.min.x as i32 + gx as i32;
        let y = bounds.min.y as i32 + gy as i32;
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        let idx = (y * width + x) as usize;
        pixels[idx] = blend_over(pixels[idx], rgba, coverage);
    });
}

/// Source-over blend of a straight-alpha color, scaled by `coverage`, onto a
/// premultiplied destination pixel.
fn blend_over(dst: PremultipliedColorU8, rgba: [u8; 4], coverage: f32) -> PremultipliedColorU8 {
    let src_a = (f32::from(rgba[3]) / 255.0) * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - src_a;

    let channel = |src: u8, dst: u8| -> f32 { f32::from(src) * src_a + f32::from(dst) * inv };
    let a = (255.0 * src_a + f32::from(dst.alpha()) * inv).round().clamp(0.0, 255.0);
    let r = channel(rgba[0], dst.red()).round().clamp(0.0, a);
    let g = channel(rgba[1], dst.green()).round().clamp(0.0, a);
    let b = channel(rgba[2], dst.blue()).round().clamp(0.0, a);

    PremultipliedColorU8::from_rgba(r as u8, g as u8, b as u8, a as u8).unwrap_or(dst)
}

/// Alpha-composite the premultiplied layer over a straight-alpha image.
/// Pixels the layer leaves fully transparent are not touched.
fn composite_over(base: &mut RgbaImage, layer: &Pixmap) {
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        let src_a = src.alpha();
        if src_a == 0 {
            continue;
        }
        if src_a == 255 {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), 255]);
            continue;
        }

        let sa = f32::from(src_a) / 255.0;
        let da = f32::from(dst[3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let channel = |s: u8, d: u8| -> u8 {
            let premul = f32::from(s) / 255.0 + (f32::from(d) / 255.0) * da * (1.0 - sa);
            (premul / out_a * 255.0).round().clamp(0.0, 255.0) as u8
        };

        *dst = Rgba([
            channel(src.red(), dst[0]),
            channel(src.green(), dst[1]),
            channel(src.blue(), dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]);
    }
}

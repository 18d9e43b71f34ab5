//! Glyph outline geometry and the providers that supply it.
//!
//! [`OutlineProvider`] is the only thing the rasterizer knows about fonts:
//! given a character it hands back contours in font units (Y-up) plus the
//! horizontal advance. [`TtfOutlines`] is the `ttf-parser` backed provider
//! used by the CLI; tests plug in synthetic providers.

use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::RasterizeError;
use crate::font::Font;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// One outline drawing command, in font units with Y pointing up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    /// Control point, then end point.
    QuadTo(f32, f32, f32, f32),
    /// Two control points, then end point.
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// Tight bounding box of an outline, in font units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutlineBounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// Everything the rasterizer needs to know about one glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphOutline {
    /// Horizontal advance in font units.
    pub advance: f32,
    /// `None` for glyphs without contours (e.g. space).
    pub bounds: Option<OutlineBounds>,
    pub segments: Vec<Segment>,
}

// ── OutlineProvider ──────────────────────────────────────────────────────────

pub trait OutlineProvider {
    /// Factor converting font units to pixels so that the font's full line
    /// height (ascender minus descender) spans `pixel_size` pixels.
    fn scale_for_pixel_height(&self, pixel_size: f32) -> f32;

    /// Outline for `ch`, or [`RasterizeError::MissingGlyph`] if the font does
    /// not map it.
    fn outline(&self, ch: char) -> Result<GlyphOutline, RasterizeError>;

    /// Glyph to draw in place of unmapped characters, if the font has one.
    fn placeholder(&self) -> Option<GlyphOutline> {
        None
    }
}

// ── TtfOutlines ──────────────────────────────────────────────────────────────

/// Outline provider over a parsed TrueType/OpenType face.
pub struct TtfOutlines<'a> {
    face: Face<'a>,
}

impl<'a> TtfOutlines<'a> {
    /// Parse the first face in `font`. Table corruption is reported here,
    /// as a rasterization failure.
    pub fn new(font: &'a Font) -> Result<Self, RasterizeError> {
        let face = Face::parse(font.data(), 0)
            .map_err(|e| RasterizeError::InvalidFont(e.to_string()))?;
        log::debug!(
            "parsed face: {} glyphs, {} units/em, ascender {}, descender {}",
            face.number_of_glyphs(),
            face.units_per_em(),
            face.ascender(),
            face.descender()
        );
        Ok(Self { face })
    }

    fn glyph(&self, id: GlyphId) -> GlyphOutline {
        let advance = self.face.glyph_hor_advance(id).unwrap_or(0) as f32;
        let mut sink = SegmentSink::default();
        let bounds = self.face.outline_glyph(id, &mut sink).map(|r| OutlineBounds {
            x_min: r.x_min as f32,
            y_min: r.y_min as f32,
            x_max: r.x_max as f32,
            y_max: r.y_max as f32,
        });
        GlyphOutline { advance, bounds, segments: sink.0 }
    }
}

impl OutlineProvider for TtfOutlines<'_> {
    fn scale_for_pixel_height(&self, pixel_size: f32) -> f32 {
        let height = self.face.ascender() as f32 - self.face.descender() as f32;
        if height > 0.0 {
            pixel_size / height
        } else {
            pixel_size / self.face.units_per_em().max(1) as f32
        }
    }

    fn outline(&self, ch: char) -> Result<GlyphOutline, RasterizeError> {
        let id = self
            .face
            .glyph_index(ch)
            .ok_or(RasterizeError::MissingGlyph(ch as u32))?;
        Ok(self.glyph(id))
    }

    fn placeholder(&self) -> Option<GlyphOutline> {
        Some(self.glyph(GlyphId(0)))
    }
}

#[derive(Default)]
struct SegmentSink(Vec<Segment>);

impl OutlineBuilder for SegmentSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.push(Segment::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.push(Segment::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.push(Segment::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.push(Segment::CurveTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.0.push(Segment::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_tables_fail_as_rasterize_error() {
        // Valid signature, no table directory behind it.
        let font = Font::load(vec![0, 1, 0, 0, 0, 0]).unwrap();
        let err = TtfOutlines::new(&font).err().unwrap();
        assert!(matches!(err, RasterizeError::InvalidFont(_)), "got {err:?}");
    }

    #[test]
    fn sink_records_commands_in_order() {
        let mut sink = SegmentSink::default();
        sink.move_to(0.0, 0.0);
        sink.line_to(10.0, 0.0);
        sink.quad_to(10.0, 10.0, 0.0, 10.0);
        sink.close();
        assert_eq!(
            sink.0,
            vec![
                Segment::MoveTo(0.0, 0.0),
                Segment::LineTo(10.0, 0.0),
                Segment::QuadTo(10.0, 10.0, 0.0, 10.0),
                Segment::Close,
            ]
        );
    }
}

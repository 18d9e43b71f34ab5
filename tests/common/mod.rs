#![allow(dead_code)]

use glyph_atlas::RasterizeError;
use glyph_atlas::raster::{GlyphOutline, OutlineBounds, OutlineProvider, Segment};

/// Synthetic proportional "font": every printable ASCII glyph is a filled
/// box whose width varies with the codepoint. 1000 units per line height
/// (ascender 800, descender -200); every coordinate is a multiple of 20
/// units, so at 25px with 2×2 oversampling all edges fall on whole
/// oversampled pixels.
pub struct BoxFont;

impl BoxFont {
    pub fn advance(cp: u32) -> f32 {
        Self::box_width(cp) + 100.0
    }

    fn box_width(cp: u32) -> f32 {
        200.0 + 20.0 * ((cp * 7) % 25) as f32
    }

    fn vertical_extent(ch: char) -> (f32, f32) {
        let bottom = if "gjpqy,;".contains(ch) { -200.0 } else { 0.0 };
        let top = if ch.is_ascii_lowercase() { 500.0 } else { 700.0 };
        (bottom, top)
    }
}

impl OutlineProvider for BoxFont {
    fn scale_for_pixel_height(&self, pixel_size: f32) -> f32 {
        pixel_size / 1000.0
    }

    fn outline(&self, ch: char) -> Result<GlyphOutline, RasterizeError> {
        let cp = ch as u32;
        if !(33..=126).contains(&cp) {
            return if cp == 32 {
                Ok(GlyphOutline { advance: 250.0, bounds: None, segments: Vec::new() })
            } else {
                Err(RasterizeError::MissingGlyph(cp))
            };
        }
        let (y0, y1) = Self::vertical_extent(ch);
        let (x0, x1) = (40.0, 40.0 + Self::box_width(cp));
        Ok(GlyphOutline {
            advance: Self::advance(cp),
            bounds: Some(OutlineBounds { x_min: x0, y_min: y0, x_max: x1, y_max: y1 }),
            segments: vec![
                Segment::MoveTo(x0, y0),
                Segment::LineTo(x1, y0),
                Segment::LineTo(x1, y1),
                Segment::LineTo(x0, y1),
                Segment::Close,
            ],
        })
    }

    fn placeholder(&self) -> Option<GlyphOutline> {
        self.outline('?').ok()
    }
}

/// Deterministic pseudo-random sizes in `1..=max` (xorshift).
pub fn sizes(seed: u32, count: usize, max: u32) -> Vec<(u32, u32)> {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state % max + 1
    };
    (0..count).map(|_| (next(), next())).collect()
}

use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::raster::{MissingGlyph, Oversample, PRINTABLE_ASCII};

pub const DEFAULT_PIXEL_SIZE: f32 = 32.0;
pub const DEFAULT_OUTPUT: &str = "atlas.png";

// ── AtlasConfig ──────────────────────────────────────────────────────────────

/// Parameters of one atlas run.
///
/// - **width / height** fix the canvas; glyphs that do not fit fail the run.
/// - **pixel_size** is the full line height (ascender to descender) in pixels.
/// - **padding** empty pixels reserved above and left of every glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_size: f32,
    pub oversample: Oversample,
    pub padding: u32,
    /// Codepoints to pack, in ascending order.
    pub codepoints: RangeInclusive<u32>,
    pub missing_glyph: MissingGlyph,
    /// Rasterize glyphs on the rayon pool.
    pub parallel: bool,
}

impl Default for AtlasConfig {
    /// 512 × 512 canvas, 32 px, 2 × 2 oversampling, printable ASCII.
    fn default() -> Self {
        Self {
            width:         512,
            height:        512,
            pixel_size:    DEFAULT_PIXEL_SIZE,
            oversample:    Oversample::default(),
            padding:       1,
            codepoints:    PRINTABLE_ASCII,
            missing_glyph: MissingGlyph::Abort,
            parallel:      true,
        }
    }
}

impl AtlasConfig {
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: f32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    pub fn with_oversample(mut self, oversample: Oversample) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_codepoints(mut self, codepoints: RangeInclusive<u32>) -> Self {
        self.codepoints = codepoints;
        self
    }

    pub fn with_missing_glyph(mut self, missing_glyph: MissingGlyph) -> Self {
        self.missing_glyph = missing_glyph;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

// ── CLI positionals ──────────────────────────────────────────────────────────

/// Parse `arg` as a font size: a positive, finite number.
pub fn parse_pixel_size(arg: &str) -> Option<f32> {
    arg.trim_start()
        .parse::<f32>()
        .ok()
        .filter(|size| size.is_finite() && *size > 0.0)
}

/// Interpret the positionals that follow the font path as
/// `(pixel_size, output_path)`.
///
/// The first argument that parses as a size sets it; any other argument
/// becomes the output path, the last one winning. A non-numeric argument
/// before the size does not stop a later one from being read as the size.
pub fn resolve_positionals<S: AsRef<str>>(args: &[S]) -> (f32, PathBuf) {
    let mut size = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);

    for arg in args.iter().map(AsRef::as_ref) {
        match size {
            None => match parse_pixel_size(arg) {
                Some(parsed) => size = Some(parsed),
                None => output = PathBuf::from(arg),
            },
            Some(_) => output = PathBuf::from(arg),
        }
    }

    (size.unwrap_or(DEFAULT_PIXEL_SIZE), output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_512_square_at_32px() {
        let cfg = AtlasConfig::default();
        assert_eq!((cfg.width, cfg.height), (512, 512));
        assert_eq!(cfg.pixel_size, 32.0);
        assert_eq!(cfg.oversample, Oversample::new(2, 2));
        assert_eq!(cfg.codepoints.clone().count(), 95);
    }

    #[test]
    fn no_positionals_gives_defaults() {
        let (size, out) = resolve_positionals::<&str>(&[]);
        assert_eq!(size, 32.0);
        assert_eq!(out, PathBuf::from("atlas.png"));
    }

    #[test]
    fn size_then_output() {
        let (size, out) = resolve_positionals(&["48", "big.png"]);
        assert_eq!(size, 48.0);
        assert_eq!(out, PathBuf::from("big.png"));
    }

    #[test]
    fn output_only() {
        let (size, out) = resolve_positionals(&["glyphs.png"]);
        assert_eq!(size, 32.0);
        assert_eq!(out, PathBuf::from("glyphs.png"));
    }

    #[test]
    fn size_may_follow_output() {
        let (size, out) = resolve_positionals(&["glyphs.png", "20.5"]);
        assert_eq!(size, 20.5);
        assert_eq!(out, PathBuf::from("glyphs.png"));
    }

    #[test]
    fn rejected_sizes_become_output() {
        for bad in ["0", "-4", "inf", "NaN", "12px"] {
            let (size, out) = resolve_positionals(&[bad]);
            assert_eq!(size, 32.0, "{bad}");
            assert_eq!(out, PathBuf::from(bad));
        }
    }

    #[test]
    fn later_arguments_overwrite_output() {
        let (size, out) = resolve_positionals(&["16", "a.png", "b.png"]);
        assert_eq!(size, 16.0);
        assert_eq!(out, PathBuf::from("b.png"));
    }
}

use std::path::PathBuf;

use thiserror::Error;

// ── Stage errors ─────────────────────────────────────────────────────────────

/// The input does not start with a recognised font container signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("input is {0} bytes, too short for a font signature")]
    TooShort(usize),
    #[error("unrecognised font signature {0:02x?}")]
    UnknownSignature([u8; 4]),
}

/// The outline provider could not produce a glyph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterizeError {
    #[error("font tables could not be parsed: {0}")]
    InvalidFont(String),
    #[error("font has no glyph for codepoint {0}")]
    MissingGlyph(u32),
    #[error("codepoint {0:#x} is not a Unicode scalar value")]
    InvalidCodepoint(u32),
    #[error("oversampling factors must be positive, got {0}x{1}")]
    InvalidOversample(u32, u32),
    #[error("pixel size must be positive and finite, got {0}")]
    InvalidPixelSize(f32),
    #[error("glyph {codepoint} would need a {width}x{height} bitmap, too large to rasterize")]
    GlyphTooLarge { codepoint: u32, width: u32, height: u32 },
}

/// A rectangle could not be placed on the canvas.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rectangle #{index} ({w}x{h}) does not fit in {canvas_w}x{canvas_h} canvas")]
pub struct PackOverflow {
    /// Position of the offending rectangle in the input sequence.
    pub index: usize,
    pub w: u32,
    pub h: u32,
    pub canvas_w: u32,
    pub canvas_h: u32,
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

// ── Run-level error ──────────────────────────────────────────────────────────

/// Every way a run of the atlas pipeline can fail. All are fatal.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("{0}")]
    Usage(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid TTF/OTF font file: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Rasterize(#[from] RasterizeError),
    #[error("not all characters fit: {0}")]
    PackOverflow(#[from] PackOverflow),
    #[error("failed to write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl AtlasError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn encode(path: impl Into<PathBuf>, source: impl Into<EncodeError>) -> Self {
        Self::Encode { path: path.into(), source: source.into() }
    }
}

pub type Result<T, E = AtlasError> = std::result::Result<T, E>;

//! Glyph atlas generation: rasterize a font's printable ASCII glyphs with
//! supersampling, shelf-pack them into one fixed grayscale canvas, and
//! describe every glyph's placement and metrics as JSON.
//!
//! ```no_run
//! use glyph_atlas::{AtlasBuilder, AtlasConfig, Font, TtfOutlines};
//!
//! # fn main() -> Result<(), glyph_atlas::AtlasError> {
//! let font = Font::open("DejaVuSans.ttf")?;
//! let outlines = TtfOutlines::new(&font)?;
//! let out = AtlasBuilder::new(AtlasConfig::default()).build(&outlines)?;
//! glyph_atlas::writer::write(&out.atlas, "atlas.png")?;
//! print!("{}", glyph_atlas::metrics::export(&out.glyphs, "atlas.png", 512, 512, out.pixel_size));
//! # Ok(())
//! # }
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod font;
pub mod metrics;
pub mod packer;
pub mod raster;
pub mod writer;

pub use atlas::{Atlas, AtlasBuilder, AtlasOutput, PlacedGlyph};
pub use config::AtlasConfig;
pub use error::{AtlasError, EncodeError, FormatError, PackOverflow, RasterizeError};
pub use font::{Font, FontFormat};
pub use raster::{GlyphRasterizer, GlyphRequest, MissingGlyph, Oversample, RasterizedGlyph, TtfOutlines};

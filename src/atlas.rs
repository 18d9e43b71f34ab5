use crate::config::AtlasConfig;
use crate::error::{AtlasError, PackOverflow};
use crate::packer::{self, Placement};
use crate::raster::{GlyphRasterizer, GlyphRequest, OutlineProvider, RasterizedGlyph};

// ── Atlas ────────────────────────────────────────────────────────────────────

/// Single-channel canvas, row-major, one byte per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Atlas {
    /// A zero-filled `width × height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Raw pixel rows; the stride equals `width`.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Copy `glyph`'s bitmap row by row with its top-left corner at `(x, y)`.
    fn blit(&mut self, x: u32, y: u32, glyph: &RasterizedGlyph) {
        let stride = self.width as usize;
        let w = glyph.width as usize;
        for row in 0..glyph.height as usize {
            let dst = (y as usize + row) * stride + x as usize;
            self.pixels[dst..dst + w].copy_from_slice(&glyph.bitmap[row * w..(row + 1) * w]);
        }
    }
}

// ── PlacedGlyph ──────────────────────────────────────────────────────────────

/// Where a glyph landed in the atlas, plus the metrics needed to draw it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub codepoint: u32,
    /// Pixel bounds in the atlas, `x1`/`y1` exclusive.
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub xoff: f32,
    pub yoff: f32,
    pub xadvance: f32,
}

impl PlacedGlyph {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

// ── assemble ─────────────────────────────────────────────────────────────────

/// Pack `glyphs` in the given order and copy their bitmaps into a fresh
/// canvas.
///
/// Each glyph reserves `padding` extra pixels above and to its left; the
/// returned rectangles exclude that padding and every pixel outside them
/// stays zero. Empty glyphs still take a slot so the output lines up
/// one-to-one with the input.
pub fn assemble(
    width: u32,
    height: u32,
    padding: u32,
    glyphs: &[RasterizedGlyph],
) -> Result<(Atlas, Vec<PlacedGlyph>), PackOverflow> {
    let slots: Vec<(u32, u32)> = glyphs
        .iter()
        .map(|g| (g.width.saturating_add(padding), g.height.saturating_add(padding)))
        .collect();
    let placements = packer::pack(width, height, &slots)?;

    let mut atlas = Atlas::new(width, height);
    let placed = glyphs
        .iter()
        .zip(&placements)
        .map(|(glyph, slot)| {
            let Placement { x, y, .. } = *slot;
            let (x0, y0) = (x + padding, y + padding);
            atlas.blit(x0, y0, glyph);
            PlacedGlyph {
                codepoint: glyph.codepoint,
                x0,
                y0,
                x1: x0 + glyph.width,
                y1: y0 + glyph.height,
                xoff: glyph.xoff,
                yoff: glyph.yoff,
                xadvance: glyph.xadvance,
            }
        })
        .collect();

    Ok((atlas, placed))
}

// ── AtlasBuilder ─────────────────────────────────────────────────────────────

/// Everything a finished run produces.
#[derive(Clone, Debug)]
pub struct AtlasOutput {
    pub atlas: Atlas,
    pub glyphs: Vec<PlacedGlyph>,
    pub pixel_size: f32,
}

/// Owns the settings of one pipeline run; independent builders never share
/// state, so runs may proceed side by side.
#[derive(Clone, Debug, Default)]
pub struct AtlasBuilder {
    config: AtlasConfig,
}

impl AtlasBuilder {
    pub fn new(config: AtlasConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Rasterize the configured codepoints with `provider` and pack them.
    ///
    /// Glyph sizes are measured and packed first, so a run that cannot fit
    /// fails with [`PackOverflow`] before any bitmap is drawn.
    pub fn build<P>(&self, provider: &P) -> Result<AtlasOutput, AtlasError>
    where
        P: OutlineProvider + Sync + ?Sized,
    {
        let cfg = &self.config;
        let requests = GlyphRequest::range(cfg.codepoints.clone(), cfg.pixel_size);
        let rasterizer = GlyphRasterizer::new(provider)
            .with_oversample(cfg.oversample)
            .with_missing_glyph(cfg.missing_glyph)
            .with_parallel(cfg.parallel);

        let slots: Vec<(u32, u32)> = rasterizer
            .measure_all(&requests)?
            .into_iter()
            .map(|(w, h)| (w.saturating_add(cfg.padding), h.saturating_add(cfg.padding)))
            .collect();
        packer::pack(cfg.width, cfg.height, &slots)?;

        let glyphs = rasterizer.rasterize_all(&requests)?;
        log::debug!("rasterized {} glyphs at {}px", glyphs.len(), cfg.pixel_size);

        let (atlas, placed) = assemble(cfg.width, cfg.height, cfg.padding, &glyphs)?;
        let used = placed.iter().map(|g| g.y1).max().unwrap_or(0);
        log::info!(
            "packed {} glyphs into {}x{} ({} rows used)",
            placed.len(),
            cfg.width,
            cfg.height,
            used
        );

        Ok(AtlasOutput { atlas, glyphs: placed, pixel_size: cfg.pixel_size })
    }
}

//! Anti-aliased glyph rasterization.
//!
//! Each glyph is scan-converted at `pixel_size × oversample` into a float
//! coverage buffer, then box-filtered down by the oversampling factors.
//! Bearings and advance are reported in final (downsampled) pixels.

pub mod outline;

use ab_glyph_rasterizer::{Point, Rasterizer, point};
use rayon::prelude::*;

use crate::error::RasterizeError;

pub use outline::{GlyphOutline, OutlineBounds, OutlineProvider, Segment, TtfOutlines};

/// First and last codepoints of the printable ASCII set.
pub const PRINTABLE_ASCII: std::ops::RangeInclusive<u32> = 32..=126;

// ── Requests & results ───────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphRequest {
    pub codepoint: u32,
    pub pixel_size: f32,
}

impl GlyphRequest {
    /// One request per codepoint of `range`, in ascending order.
    pub fn range(range: std::ops::RangeInclusive<u32>, pixel_size: f32) -> Vec<Self> {
        range.map(|codepoint| Self { codepoint, pixel_size }).collect()
    }
}

/// Integer supersampling factors applied on each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Oversample {
    pub x: u32,
    pub y: u32,
}

impl Oversample {
    pub const NONE: Self = Self { x: 1, y: 1 };

    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Default for Oversample {
    fn default() -> Self {
        Self { x: 2, y: 2 }
    }
}

/// Final coverage bitmap plus metrics of one glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterizedGlyph {
    pub codepoint: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` bytes.
    pub bitmap: Vec<u8>,
    /// Offset from the pen origin to the bitmap's left edge.
    pub xoff: f32,
    /// Offset from the baseline to the bitmap's top edge (Y down).
    pub yoff: f32,
    pub xadvance: f32,
}

impl RasterizedGlyph {
    fn empty(codepoint: u32, xadvance: f32) -> Self {
        Self { codepoint, width: 0, height: 0, bitmap: Vec::new(), xoff: 0.0, yoff: 0.0, xadvance }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.bitmap[(y * self.width + x) as usize]
    }
}

/// What to do when the font does not map a requested codepoint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissingGlyph {
    /// Fail the run with [`RasterizeError::MissingGlyph`].
    #[default]
    Abort,
    /// Draw the font's `.notdef` glyph instead.
    Notdef,
}

// ── GlyphRasterizer ──────────────────────────────────────────────────────────

pub struct GlyphRasterizer<'a, P: ?Sized> {
    provider: &'a P,
    oversample: Oversample,
    missing: MissingGlyph,
    parallel: bool,
}

impl<'a, P: OutlineProvider + ?Sized> GlyphRasterizer<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            oversample: Oversample::default(),
            missing: MissingGlyph::Abort,
            parallel: false,
        }
    }

    pub fn with_oversample(mut self, oversample: Oversample) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_missing_glyph(mut self, missing: MissingGlyph) -> Self {
        self.missing = missing;
        self
    }

    /// Spread [`rasterize_all`](Self::rasterize_all) over the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rasterize(&self, request: GlyphRequest) -> Result<RasterizedGlyph, RasterizeError> {
        let (outline, scale) = self.resolve(request, true)?;
        render(request.codepoint, &outline, scale, self.oversample)
    }

    /// Final bitmap size of `request`, computed from the outline bounds
    /// alone. Nothing is scan-converted and no coverage buffer is
    /// allocated; sizes saturate at `u32::MAX`.
    pub fn measure(&self, request: GlyphRequest) -> Result<(u32, u32), RasterizeError> {
        let (outline, scale) = self.resolve(request, false)?;
        Ok(GlyphBox::new(outline.bounds, scale, self.oversample).map_or((0, 0), |b| (b.width, b.height)))
    }

    /// Rasterize every request. The result keeps the order of `requests`
    /// whether or not the work ran in parallel.
    pub fn rasterize_all(
        &self,
        requests: &[GlyphRequest],
    ) -> Result<Vec<RasterizedGlyph>, RasterizeError>
    where
        P: Sync,
    {
        if self.parallel {
            requests.par_iter().map(|r| self.rasterize(*r)).collect()
        } else {
            requests.iter().map(|r| self.rasterize(*r)).collect()
        }
    }

    /// [`measure`](Self::measure) every request, in order.
    pub fn measure_all(&self, requests: &[GlyphRequest]) -> Result<Vec<(u32, u32)>, RasterizeError>
    where
        P: Sync,
    {
        if self.parallel {
            requests.par_iter().map(|r| self.measure(*r)).collect()
        } else {
            requests.iter().map(|r| self.measure(*r)).collect()
        }
    }

    /// Validate `request` and fetch its outline under the missing glyph
    /// policy, together with the font-unit to pixel scale.
    fn resolve(&self, request: GlyphRequest, warn: bool) -> Result<(GlyphOutline, f32), RasterizeError> {
        let Oversample { x: ox, y: oy } = self.oversample;
        if ox == 0 || oy == 0 {
            return Err(RasterizeError::InvalidOversample(ox, oy));
        }
        if !request.pixel_size.is_finite() || request.pixel_size <= 0.0 {
            return Err(RasterizeError::InvalidPixelSize(request.pixel_size));
        }
        let ch = char::from_u32(request.codepoint)
            .ok_or(RasterizeError::InvalidCodepoint(request.codepoint))?;

        let outline = match self.provider.outline(ch) {
            Ok(outline) => outline,
            Err(RasterizeError::MissingGlyph(cp)) if self.missing == MissingGlyph::Notdef => {
                let placeholder = self
                    .provider
                    .placeholder()
                    .ok_or(RasterizeError::MissingGlyph(cp))?;
                if warn {
                    log::warn!("codepoint {cp} not in font; substituting .notdef");
                }
                placeholder
            }
            Err(e) => return Err(e),
        };

        Ok((outline, self.provider.scale_for_pixel_height(request.pixel_size)))
    }
}

/// Upper bound on the oversampled coverage buffer of a single glyph.
const MAX_SUPERSAMPLED_PIXELS: usize = 1 << 26;

/// Where a glyph's bitmap sits once scaled: the oversampled top-left corner
/// (Y down) and the final, downsampled size.
#[derive(Copy, Clone, Debug, PartialEq)]
struct GlyphBox {
    ix0: f32,
    iy0: f32,
    width: u32,
    height: u32,
}

impl GlyphBox {
    /// `None` when the glyph covers no pixel. Sizes saturate at `u32::MAX`
    /// rather than overflow.
    fn new(bounds: Option<OutlineBounds>, scale: f32, oversample: Oversample) -> Option<Self> {
        let b = bounds?;
        let (ox, oy) = (oversample.x, oversample.y);
        let (sx, sy) = (scale * ox as f32, scale * oy as f32);

        let ix0 = (b.x_min * sx).floor();
        let iy0 = (-b.y_max * sy).floor();
        let ix1 = (b.x_max * sx).ceil();
        let iy1 = (-b.y_min * sy).ceil();
        let (ow, oh) = (span(ix0, ix1), span(iy0, iy1));
        if ow == 0.0 || oh == 0.0 {
            return None;
        }

        Some(Self {
            ix0,
            iy0,
            width:  (ow / f64::from(ox)).ceil() as u32,
            height: (oh / f64::from(oy)).ceil() as u32,
        })
    }
}

/// Length of `lo..hi`; infinite when either end overflowed `f32`.
fn span(lo: f32, hi: f32) -> f64 {
    let d = f64::from(hi) - f64::from(lo);
    if d.is_nan() { f64::INFINITY } else { d.max(0.0) }
}

fn render(
    codepoint: u32,
    outline: &GlyphOutline,
    scale: f32,
    oversample: Oversample,
) -> Result<RasterizedGlyph, RasterizeError> {
    let (ox, oy) = (oversample.x, oversample.y);
    let (sx, sy) = (scale * ox as f32, scale * oy as f32);
    let xadvance = outline.advance * scale;

    let Some(GlyphBox { ix0, iy0, width, height }) = GlyphBox::new(outline.bounds, scale, oversample) else {
        return Ok(RasterizedGlyph::empty(codepoint, xadvance));
    };

    let too_large = RasterizeError::GlyphTooLarge { codepoint, width, height };
    let (sw, sh) = match (width.checked_mul(ox), height.checked_mul(oy)) {
        (Some(sw), Some(sh)) => (sw as usize, sh as usize),
        _ => return Err(too_large),
    };
    if sw.checked_mul(sh).is_none_or(|n| n > MAX_SUPERSAMPLED_PIXELS) {
        return Err(too_large);
    }

    let mut pen = Pen::new(Rasterizer::new(sw, sh), move |x, y| point(x * sx - ix0, -y * sy - iy0));
    for segment in &outline.segments {
        pen.apply(*segment);
    }
    let rasterizer = pen.finish();

    let mut coverage = vec![0.0f32; sw * sh];
    rasterizer.for_each_pixel(|i, alpha| coverage[i] = alpha.clamp(0.0, 1.0));

    Ok(RasterizedGlyph {
        codepoint,
        width,
        height,
        bitmap: downsample(&coverage, sw, ox as usize, oy as usize),
        xoff: ix0 / ox as f32,
        yoff: iy0 / oy as f32,
        xadvance,
    })
}

/// Box-filter a `stride`-wide coverage buffer by `ox × oy` blocks into
/// 8-bit intensities. Buffer dimensions must be multiples of the factors.
pub fn downsample(coverage: &[f32], stride: usize, ox: usize, oy: usize) -> Vec<u8> {
    let out_w = stride / ox;
    let out_h = coverage.len() / stride / oy;
    let norm = 255.0 / (ox * oy) as f32;

    let mut out = Vec::with_capacity(out_w * out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let mut sum = 0.0;
            for sy in y * oy..(y + 1) * oy {
                let row = &coverage[sy * stride + x * ox..sy * stride + (x + 1) * ox];
                sum += row.iter().sum::<f32>();
            }
            out.push((sum * norm).round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

// ── Pen ──────────────────────────────────────────────────────────────────────

/// Feeds outline segments into the scan converter, closing contours that
/// the outline leaves open.
struct Pen<F> {
    rasterizer: Rasterizer,
    transform: F,
    start: Point,
    last: Point,
}

impl<F: Fn(f32, f32) -> Point> Pen<F> {
    fn new(rasterizer: Rasterizer, transform: F) -> Self {
        let origin = point(0.0, 0.0);
        Self { rasterizer, transform, start: origin, last: origin }
    }

    fn apply(&mut self, segment: Segment) {
        let t = &self.transform;
        match segment {
            Segment::MoveTo(x, y) => {
                let p = t(x, y);
                self.close();
                self.start = p;
                self.last = p;
            }
            Segment::LineTo(x, y) => {
                let p = t(x, y);
                self.rasterizer.draw_line(self.last, p);
                self.last = p;
            }
            Segment::QuadTo(x1, y1, x, y) => {
                let (c, p) = (t(x1, y1), t(x, y));
                self.rasterizer.draw_quad(self.last, c, p);
                self.last = p;
            }
            Segment::CurveTo(x1, y1, x2, y2, x, y) => {
                let (c1, c2, p) = (t(x1, y1), t(x2, y2), t(x, y));
                self.rasterizer.draw_cubic(self.last, c1, c2, p);
                self.last = p;
            }
            Segment::Close => self.close(),
        }
    }

    fn close(&mut self) {
        if self.last != self.start {
            self.rasterizer.draw_line(self.last, self.start);
        }
        self.last = self.start;
    }

    fn finish(mut self) -> Rasterizer {
        self.close();
        self.rasterizer
    }
}

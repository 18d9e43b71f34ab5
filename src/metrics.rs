use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::atlas::PlacedGlyph;

// ── JSON string escaping ─────────────────────────────────────────────────────

/// Append `s` to `out` as a quoted JSON string.
///
/// `"` and `\` get a backslash, the five common control characters use their
/// short escapes, any other control character below 0x20 becomes `\u00XX`,
/// and everything else is copied through untouched.
pub fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

pub fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_json_string(&mut out, s);
    out
}

// ── export ───────────────────────────────────────────────────────────────────

/// Serialise the placed glyphs as the atlas metrics document.
///
/// Glyphs appear in the order given, keyed by decimal codepoint. Offsets
/// and advance carry two decimals, `size` one. The layout is fixed:
///
/// ```text
/// {
///   "texture": "atlas.png",
///   "width": 512,
///   "height": 512,
///   "size": 32.0,
///   "glyphs": {
///     "65": {"char": "A", "x": 1, "y": 1, "w": 14, "h": 17, "xoff": 0.50, "yoff": -17.00, "xadvance": 15.25}
///   }
/// }
/// ```
pub fn export(glyphs: &[PlacedGlyph], texture: &str, width: u32, height: u32, pixel_size: f32) -> String {
    let mut out = String::with_capacity(128 + glyphs.len() * 128);

    out.push_str("{\n  \"texture\": ");
    write_json_string(&mut out, texture);
    out.push_str(",\n");
    out.push_str(&format!(
        "  \"width\": {width},\n  \"height\": {height},\n  \"size\": {pixel_size:.1},\n"
    ));
    out.push_str("  \"glyphs\": {\n");

    for (i, g) in glyphs.iter().enumerate() {
        let mut buf = [0u8; 4];
        let text: &str = match g.char() {
            Some(ch) => ch.encode_utf8(&mut buf),
            None => "",
        };
        out.push_str(&format!("    \"{}\": {{\"char\": ", g.codepoint));
        write_json_string(&mut out, text);
        out.push_str(&format!(
            ", \"x\": {}, \"y\": {}, \"w\": {}, \"h\": {}, \"xoff\": {:.2}, \"yoff\": {:.2}, \"xadvance\": {:.2}}}",
            g.x0,
            g.y0,
            g.width(),
            g.height(),
            g.xoff,
            g.yoff,
            g.xadvance
        ));
        out.push_str(if i + 1 == glyphs.len() { "\n" } else { ",\n" });
    }

    out.push_str("  }\n}\n");
    out
}

// ── Reading metrics back ─────────────────────────────────────────────────────

/// One glyph entry of a metrics document.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub codepoint: u32,
    pub ch: char,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub xoff: f32,
    pub yoff: f32,
    pub xadvance: f32,
}

/// A metrics document as a renderer consumes it.
#[derive(Debug, Clone)]
pub struct AtlasMetrics {
    pub texture: String,
    pub width: u32,
    pub height: u32,
    pub size: f32,
    /// Glyphs keyed by codepoint.
    pub glyphs: BTreeMap<u32, GlyphMetrics>,
}

impl AtlasMetrics {
    /// Parse a document produced by [`export`].
    ///
    /// Entries whose key is not a decimal codepoint of a Unicode scalar value
    /// are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawMetrics = serde_json::from_str(json)?;

        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|(key, g)| {
                let codepoint = key.parse::<u32>().ok()?;
                let ch = char::from_u32(codepoint)?;
                Some((codepoint, GlyphMetrics {
                    codepoint,
                    ch,
                    x: g.x,
                    y: g.y,
                    w: g.w,
                    h: g.h,
                    xoff: g.xoff,
                    yoff: g.yoff,
                    xadvance: g.xadvance,
                }))
            })
            .collect();

        Ok(Self {
            texture: raw.texture,
            width: raw.width,
            height: raw.height,
            size: raw.size,
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&(ch as u32))
    }

    /// Returns (uv_min, uv_max) of `glyph` in normalised texture space.
    pub fn uv(&self, glyph: &GlyphMetrics) -> ([f32; 2], [f32; 2]) {
        let tw = self.width as f32;
        let th = self.height as f32;
        (
            [glyph.x as f32 / tw, glyph.y as f32 / th],
            [(glyph.x + glyph.w) as f32 / tw, (glyph.y + glyph.h) as f32 / th],
        )
    }
}

// ── Raw (JSON-facing) types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    xoff: f32,
    yoff: f32,
    xadvance: f32,
}

#[derive(Deserialize)]
struct RawMetrics {
    texture: String,
    width: u32,
    height: u32,
    size: f32,
    glyphs: HashMap<String, RawGlyph>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(codepoint: u32, x0: u32, y0: u32, w: u32, h: u32) -> PlacedGlyph {
        PlacedGlyph {
            codepoint,
            x0,
            y0,
            x1: x0 + w,
            y1: y0 + h,
            xoff: 0.5,
            yoff: -12.25,
            xadvance: 9.0,
        }
    }

    #[test]
    fn quote_and_newline_are_escaped() {
        assert_eq!(escape_json_string("a\"b\nc"), r#""a\"b\nc""#);
    }

    #[test]
    fn printable_ascii_passes_through() {
        let printable: String = (0x20u8..0x7f)
            .map(char::from)
            .filter(|c| *c != '"' && *c != '\\')
            .collect();
        assert_eq!(escape_json_string(&printable), format!("\"{printable}\""));
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(escape_json_string("\\"), r#""\\""#);
        assert_eq!(escape_json_string("\u{08}\u{0c}\r\t"), r#""\b\f\r\t""#);
        assert_eq!(escape_json_string("\u{01}\u{1f}"), r#""\u0001\u001f""#);
    }

    #[test]
    fn non_ascii_is_untouched() {
        assert_eq!(escape_json_string("é"), "\"é\"");
    }

    #[test]
    fn export_layout_is_exact() {
        let glyphs = [glyph(34, 1, 1, 4, 5), glyph(65, 6, 1, 7, 8)];
        let json = export(&glyphs, "out.png", 64, 32, 32.0);
        let expected = concat!(
            "{\n",
            "  \"texture\": \"out.png\",\n",
            "  \"width\": 64,\n",
            "  \"height\": 32,\n",
            "  \"size\": 32.0,\n",
            "  \"glyphs\": {\n",
            "    \"34\": {\"char\": \"\\\"\", \"x\": 1, \"y\": 1, \"w\": 4, \"h\": 5, \"xoff\": 0.50, \"yoff\": -12.25, \"xadvance\": 9.00},\n",
            "    \"65\": {\"char\": \"A\", \"x\": 6, \"y\": 1, \"w\": 7, \"h\": 8, \"xoff\": 0.50, \"yoff\": -12.25, \"xadvance\": 9.00}\n",
            "  }\n",
            "}\n",
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn export_with_no_glyphs_is_still_valid_json() {
        let json = export(&[], "a.png", 8, 8, 12.5);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["size"], 12.5);
        assert!(value["glyphs"].as_object().unwrap().is_empty());
    }

    #[test]
    fn texture_path_is_escaped() {
        let json = export(&[], "C:\\tmp\\a.png", 8, 8, 12.0);
        assert!(json.contains(r#""texture": "C:\\tmp\\a.png""#), "{json}");
    }

    #[test]
    fn control_character_in_texture_uses_unicode_escape() {
        let json = export(&[], "a\u{07}.png", 8, 8, 12.0);
        assert!(json.contains(r#""texture": "a\u0007.png""#), "{json}");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["texture"], "a\u{07}.png");
    }

    #[test]
    fn exported_document_reads_back() {
        let glyphs = [glyph(92, 1, 1, 4, 5), glyph(126, 6, 1, 7, 8)];
        let metrics = AtlasMetrics::from_json(&export(&glyphs, "x.png", 64, 64, 20.0)).unwrap();
        assert_eq!(metrics.texture, "x.png");
        assert_eq!(metrics.size, 20.0);
        let tilde = metrics.glyph('~').unwrap();
        assert_eq!((tilde.x, tilde.y, tilde.w, tilde.h), (6, 1, 7, 8));
        assert_eq!(metrics.glyph('\\').unwrap().ch, '\\');
    }

    #[test]
    fn uv_spans_glyph_rect() {
        let glyphs = [glyph(65, 16, 32, 16, 32)];
        let metrics = AtlasMetrics::from_json(&export(&glyphs, "x.png", 64, 64, 20.0)).unwrap();
        let (min, max) = metrics.uv(metrics.glyph('A').unwrap());
        assert_eq!(min, [0.25, 0.5]);
        assert_eq!(max, [0.5, 1.0]);
    }

    #[test]
    fn from_json_invalid_input_returns_error() {
        assert!(AtlasMetrics::from_json("not json").is_err());
    }
}

use std::path::Path;

use crate::error::{AtlasError, FormatError};

// ── FontFormat ───────────────────────────────────────────────────────────────

/// Container family recognised from the first four bytes of a font file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontFormat {
    /// `00 01 00 00`
    TrueType,
    /// `OTTO` — OpenType with CFF outlines.
    OpenType,
    /// `true` — legacy Apple TrueType.
    AppleTrueType,
    /// `typ1` — PostScript Type 1 wrapped in an sfnt container.
    Type1,
}

impl FontFormat {
    const SIGNATURES: [([u8; 4], FontFormat); 4] = [
        ([0x00, 0x01, 0x00, 0x00], FontFormat::TrueType),
        (*b"OTTO", FontFormat::OpenType),
        (*b"true", FontFormat::AppleTrueType),
        (*b"typ1", FontFormat::Type1),
    ];

    /// Match the leading signature of `bytes`.
    pub fn detect(bytes: &[u8]) -> Result<Self, FormatError> {
        let Some(head) = bytes.first_chunk::<4>() else {
            return Err(FormatError::TooShort(bytes.len()));
        };
        Self::SIGNATURES
            .iter()
            .find(|(sig, _)| sig == head)
            .map(|&(_, format)| format)
            .ok_or(FormatError::UnknownSignature(*head))
    }
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// Raw font bytes whose container signature has been checked.
///
/// Only the signature is validated here. Broken tables surface later, when
/// the outline provider parses the font (see [`crate::raster::TtfOutlines`]).
#[derive(Clone)]
pub struct Font {
    data: Vec<u8>,
    format: FontFormat,
}

impl Font {
    pub fn load(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let format = FontFormat::detect(&bytes)?;
        Ok(Self { data: bytes, format })
    }

    /// Read `path` fully and validate its signature.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| AtlasError::io(path, e))?;
        if bytes.is_empty() {
            return Err(AtlasError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "file is empty"),
            ));
        }
        let font = Self::load(bytes)?;
        log::debug!("loaded {} ({:?}, {} bytes)", path.display(), font.format, font.data.len());
        Ok(font)
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_every_signature_family() {
        assert_eq!(FontFormat::detect(&[0, 1, 0, 0, 9]), Ok(FontFormat::TrueType));
        assert_eq!(FontFormat::detect(b"OTTO...."), Ok(FontFormat::OpenType));
        assert_eq!(FontFormat::detect(b"true"), Ok(FontFormat::AppleTrueType));
        assert_eq!(FontFormat::detect(b"typ1\0\0"), Ok(FontFormat::Type1));
    }

    #[test]
    fn three_bytes_is_too_short() {
        assert_eq!(Font::load(vec![0, 1, 0]).unwrap_err(), FormatError::TooShort(3));
    }

    #[test]
    fn empty_input_is_too_short() {
        assert_eq!(Font::load(Vec::new()).unwrap_err(), FormatError::TooShort(0));
    }

    #[test]
    fn png_header_is_rejected() {
        let err = Font::load(b"\x89PNG\r\n\x1a\n".to_vec()).unwrap_err();
        assert_eq!(err, FormatError::UnknownSignature(*b"\x89PNG"));
    }

    #[test]
    fn load_keeps_bytes_untouched() {
        let bytes = b"OTTO\x00\x0a\x00\x80".to_vec();
        let font = Font::load(bytes.clone()).unwrap();
        assert_eq!(font.data(), bytes.as_slice());
        assert_eq!(font.format(), FontFormat::OpenType);
    }
}

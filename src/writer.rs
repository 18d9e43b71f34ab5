use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::atlas::Atlas;
use crate::error::{AtlasError, EncodeError};

/// Encode `atlas` as an 8-bit grayscale PNG (stride = width) into `out`.
pub fn encode_into<W: Write>(atlas: &Atlas, out: W) -> Result<(), EncodeError> {
    PngEncoder::new(out).write_image(atlas.as_raw(), atlas.width(), atlas.height(), ExtendedColorType::L8)?;
    Ok(())
}

/// PNG bytes of `atlas`, held in memory.
pub fn encode_png(atlas: &Atlas) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    encode_into(atlas, &mut bytes)?;
    Ok(bytes)
}

/// Write `atlas` to `path` as PNG, whatever the extension says.
pub fn write(atlas: &Atlas, path: impl AsRef<Path>) -> Result<(), AtlasError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AtlasError::encode(path, e))?;
    let mut out = BufWriter::new(file);
    encode_into(atlas, &mut out).map_err(|e| AtlasError::encode(path, e))?;
    out.flush().map_err(|e| AtlasError::encode(path, e))?;
    log::debug!("wrote {}x{} atlas to {}", atlas.width(), atlas.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_signature_and_size() {
        let bytes = encode_png(&Atlas::new(4, 3)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn write_to_missing_directory_is_encode_error() {
        let err = write(&Atlas::new(2, 2), "/nonexistent-dir/atlas.png").unwrap_err();
        assert!(matches!(err, AtlasError::Encode { .. }), "got {err:?}");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoded image — an owned pixel buffer produced by the source resolver and
// consumed by exactly one recognition call. Wraps `image::DynamicImage` and
// offers the re-encodings native engines ask for.

use image::{DynamicImage, ImageFormat, RgbImage};
use ocrbridge_core::error::OcrBridgeError;
use tracing::{debug, instrument};

/// A decoded image ready for recognition.
///
/// Owned by the call that decoded it; never shared between scans.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The decoded pixels.
    image: DynamicImage,
    /// Where the pixels came from (resolved path or frame label), for logs.
    origin: String,
}

impl DecodedImage {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, ...). The format is guessed from
    /// the content, not from any file extension.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], origin: impl Into<String>) -> Result<Self, OcrBridgeError> {
        let origin = origin.into();
        let img = image::load_from_memory(data).map_err(|err| {
            OcrBridgeError::DecodeFailure(format!("{origin}: {err}"))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img, origin })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage, origin: impl Into<String>) -> Self {
        Self {
            image,
            origin: origin.into(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    // -- Re-encodings ---------------------------------------------------------

    /// RGB8 copy of the pixels (the layout expected by `ocrs`).
    pub fn to_rgb8(&self) -> RgbImage {
        self.image.to_rgb8()
    }

    /// Encode as PNG. Used to hand pixels to platform decoders
    /// (`BitmapFactory`, `VNImageRequestHandler`) without lossy recompression.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, OcrBridgeError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, OcrBridgeError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        OcrBridgeError::EngineFailure(format!("image re-encoding failed: {err}"))
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn png_reencode_preserves_dimensions() {
        let decoded = DecodedImage::from_dynamic(checkerboard(12, 7), "test");
        let png = decoded.to_png_bytes().unwrap();
        let again = DecodedImage::from_bytes(&png, "again").unwrap();
        assert_eq!((again.width(), again.height()), (12, 7));
        assert_eq!(again.to_rgb8(), decoded.to_rgb8());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = DecodedImage::from_bytes(b"definitely not an image", "junk").unwrap_err();
        assert!(matches!(err, OcrBridgeError::DecodeFailure(_)));
        assert!(err.to_string().contains("junk"));
    }
}

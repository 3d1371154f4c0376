// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image source resolution — turns an `ImageReference` into a `DecodedImage`.
//
// File paths may carry a literal `file://` scheme (as handed over by camera
// and picker libraries); it is stripped before the filesystem lookup. No other
// scheme is interpreted. Frames carry a base64-encoded image file whose
// decoded size must match the declared dimensions.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ocrbridge_core::error::{OcrBridgeError, Result};
use ocrbridge_core::{FrameDescriptor, ImageReference};
use tracing::{debug, instrument};

use crate::image::DecodedImage;

/// Scheme prefix removed from incoming paths.
pub const FILE_SCHEME: &str = "file://";

/// Strip a single leading `file://` prefix. Anything else is left untouched.
pub fn strip_file_scheme(path: &str) -> &str {
    path.strip_prefix(FILE_SCHEME).unwrap_or(path)
}

/// Resolve any reference into decoded pixels.
pub fn resolve(reference: &ImageReference) -> Result<DecodedImage> {
    match reference {
        ImageReference::FilePath(path) => resolve_path(path),
        ImageReference::Frame(frame) => resolve_frame(frame),
    }
}

/// Load and decode an image file.
///
/// # Errors
///
/// - [`OcrBridgeError::ResourceNotFound`] when the (stripped) path does not
///   name an existing file.
/// - [`OcrBridgeError::DecodeFailure`] when the file exists but is not an
///   image.
#[instrument(skip_all, fields(path = %path))]
pub fn resolve_path(path: &str) -> Result<DecodedImage> {
    let clean = strip_file_scheme(path);
    let file = Path::new(clean);
    if !file.is_file() {
        return Err(OcrBridgeError::ResourceNotFound(clean.to_string()));
    }

    let bytes = std::fs::read(file).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => OcrBridgeError::ResourceNotFound(clean.to_string()),
        _ => OcrBridgeError::DecodeFailure(format!("{clean}: {err}")),
    })?;
    debug!(bytes = bytes.len(), "Image file read");

    DecodedImage::from_bytes(&bytes, clean)
}

/// Validate and decode a base64 frame.
///
/// Degenerate dimensions, empty or malformed payloads, undecodable bytes and
/// size mismatches are all reported as [`OcrBridgeError::InvalidFrame`].
#[instrument(skip_all, fields(width = frame.width, height = frame.height))]
pub fn resolve_frame(frame: &FrameDescriptor) -> Result<DecodedImage> {
    if frame.width == 0 || frame.height == 0 {
        return Err(OcrBridgeError::InvalidFrame(format!(
            "degenerate dimensions {}x{}",
            frame.width, frame.height
        )));
    }
    let payload = frame.payload.trim();
    if payload.is_empty() {
        return Err(OcrBridgeError::InvalidFrame("empty payload".into()));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| OcrBridgeError::InvalidFrame(format!("payload is not base64: {err}")))?;
    debug!(bytes = bytes.len(), "Frame payload decoded");

    let label = format!("frame {}x{}", frame.width, frame.height);
    let decoded = DecodedImage::from_bytes(&bytes, label).map_err(|err| match err {
        OcrBridgeError::DecodeFailure(detail) => OcrBridgeError::InvalidFrame(detail),
        other => other,
    })?;

    if decoded.width() != frame.width || decoded.height() != frame.height {
        return Err(OcrBridgeError::InvalidFrame(format!(
            "declared {}x{} but payload decodes to {}x{}",
            frame.width,
            frame.height,
            decoded.width(),
            decoded.height()
        )));
    }
    Ok(decoded)
}

/// Build a frame descriptor from encoded image bytes.
pub fn encode_frame(width: u32, height: u32, encoded_image: &[u8]) -> FrameDescriptor {
    FrameDescriptor {
        width,
        height,
        payload: STANDARD.encode(encoded_image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([200u8])));
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn strips_only_file_scheme() {
        assert_eq!(strip_file_scheme("file:///tmp/a.png"), "/tmp/a.png");
        assert_eq!(strip_file_scheme("/tmp/a.png"), "/tmp/a.png");
        assert_eq!(strip_file_scheme("content://media/1"), "content://media/1");
        assert_eq!(strip_file_scheme("file://file:///x"), "file:///x");
    }

    #[test]
    fn missing_path_is_resource_not_found() {
        let err = resolve_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, OcrBridgeError::ResourceNotFound(_)));
    }

    #[test]
    fn directory_is_resource_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, OcrBridgeError::ResourceNotFound(_)));
    }

    #[test]
    fn non_image_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "just some text").unwrap();
        let err = resolve_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, OcrBridgeError::DecodeFailure(_)));
    }

    #[test]
    fn prefixed_and_plain_paths_resolve_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, png_bytes(9, 4)).unwrap();
        let plain = path.to_str().unwrap().to_string();
        let prefixed = format!("file://{plain}");

        let a = resolve(&ImageReference::FilePath(plain)).unwrap();
        let b = resolve(&ImageReference::FilePath(prefixed)).unwrap();
        assert_eq!(a.origin(), b.origin());
        assert_eq!(a.to_rgb8(), b.to_rgb8());
    }

    #[test]
    fn valid_frame_decodes() {
        let frame = encode_frame(5, 3, &png_bytes(5, 3));
        let decoded = resolve_frame(&frame).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
    }

    #[test]
    fn frame_failures_are_invalid_frame() {
        let good = png_bytes(5, 3);
        let cases = [
            encode_frame(0, 3, &good),
            encode_frame(5, 0, &good),
            FrameDescriptor {
                width: 5,
                height: 3,
                payload: String::new(),
            },
            FrameDescriptor {
                width: 5,
                height: 3,
                payload: "%%% not base64 %%%".into(),
            },
            encode_frame(5, 3, b"plain bytes, no image"),
            encode_frame(6, 3, &good),
        ];
        for frame in &cases {
            let err = resolve_frame(frame).unwrap_err();
            assert!(
                matches!(err, OcrBridgeError::InvalidFrame(_)),
                "expected InvalidFrame, got {err:?}"
            );
        }
    }
}

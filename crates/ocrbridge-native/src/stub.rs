// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop/CI recognizer for hosts without a native OCR engine.
//
// With the `ocr` feature the `ocrs` engine is loaded once from the configured
// model directory. Without it (or when the models are missing) every call
// fails with `EngineFailure`; real mobile engines live in the `ios` and
// `android` modules.

use ocrbridge_core::error::{OcrBridgeError, Result};
use ocrbridge_core::{BridgeConfig, NormalizedRegion, TextObservation};
use ocrbridge_vision::DecodedImage;

use crate::traits::TextRecognizer;

/// Recognizer returned on non-mobile platforms.
pub struct DesktopRecognizer {
    #[cfg(feature = "ocr")]
    engine: Option<ocrbridge_vision::OcrEngine>,
    /// Why no engine is available, reported from every call.
    unavailable: Option<String>,
}

impl DesktopRecognizer {
    #[cfg(feature = "ocr")]
    pub fn new(config: &BridgeConfig) -> Self {
        let ocr_config = ocrbridge_vision::OcrConfig::from_optional_dir(config.model_dir.as_deref());
        match ocrbridge_vision::OcrEngine::new(ocr_config) {
            Ok(engine) => Self {
                engine: Some(engine),
                unavailable: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "desktop OCR engine unavailable");
                let reason = match err {
                    OcrBridgeError::EngineFailure(detail) => detail,
                    other => other.to_string(),
                };
                Self {
                    engine: None,
                    unavailable: Some(reason),
                }
            }
        }
    }

    #[cfg(not(feature = "ocr"))]
    pub fn new(_config: &BridgeConfig) -> Self {
        Self {
            unavailable: Some("no text recognition engine on this platform".into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }
}

impl TextRecognizer for DesktopRecognizer {
    fn platform_name(&self) -> &str {
        if self.is_available() {
            "Desktop (ocrs)"
        } else {
            "Desktop (stub)"
        }
    }

    fn recognize(
        &self,
        image: &DecodedImage,
        _region_hint: Option<&NormalizedRegion>,
    ) -> Result<Vec<TextObservation>> {
        #[cfg(feature = "ocr")]
        if let Some(engine) = &self.engine {
            return engine.recognize(image);
        }

        #[cfg(not(feature = "ocr"))]
        let _ = image;

        tracing::warn!("TextRecognizer::recognize called on stub recognizer");
        Err(OcrBridgeError::EngineFailure(
            self.unavailable
                .clone()
                .unwrap_or_else(|| "no text recognition engine".into()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrbridge_core::ErrorKind;

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn stub_reports_engine_failure() {
        let recognizer = DesktopRecognizer::new(&BridgeConfig::default());
        assert!(!recognizer.is_available());
        assert_eq!(recognizer.platform_name(), "Desktop (stub)");
        assert!(!recognizer.supports_region_hint());

        let image = DecodedImage::from_dynamic(image_stub(), "blank");
        let err = recognizer.recognize(&image, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn missing_models_report_engine_failure() {
        let config = BridgeConfig {
            model_dir: Some("/nonexistent/ocrbridge-models".into()),
            ..BridgeConfig::default()
        };
        let recognizer = DesktopRecognizer::new(&config);
        assert!(!recognizer.is_available());

        let image = DecodedImage::from_dynamic(image_stub(), "blank");
        let err = recognizer.recognize(&image, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
        assert!(err.to_string().contains("model not found"));
    }

    fn image_stub() -> image::DynamicImage {
        image::DynamicImage::new_rgb8(4, 4)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop OCR backend for ocrbridge.
//
// Phones use the engine the OS ships (Vision on iOS, ML Kit on Android). On
// desktop and CI hosts there is no such engine, so this module wraps the
// `ocrs` crate, a pure-Rust OCR engine backed by neural network models
// executed via `rten`, and reports its lines as `TextObservation`s.
//
// # Feature Gate
//
// Only available when the `ocr` feature is enabled:
//
// ```toml
// ocrbridge-vision = { path = "crates/ocrbridge-vision", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is the default lookup directory.

use std::path::{Path, PathBuf};

use ocrbridge_core::error::OcrBridgeError;
use ocrbridge_core::{NormalizedRect, TextObservation};
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams, TextItem};
use rten::Model;
use tracing::{debug, info, instrument};

use crate::image::DecodedImage;

/// Default directory for cached OCR model files.
///
/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs` when
/// `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Model locations for an [`OcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Both models inside `dir`, under their well-known filenames.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Use the configured directory when given, the cache default otherwise.
    pub fn from_optional_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<(), OcrBridgeError> {
        for (what, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(OcrBridgeError::EngineFailure(format!(
                    "{what} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Desktop OCR engine.
///
/// Model loading is the expensive step; build one engine and share it across
/// scans. Recognition takes `&self` and may run on several threads at once.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load both models and initialise the engine.
    ///
    /// # Errors
    ///
    /// Returns [`OcrBridgeError::EngineFailure`] if model files are missing
    /// or corrupt.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self, OcrBridgeError> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path)?;
        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            OcrBridgeError::EngineFailure(format!("failed to initialise OCR engine: {err}"))
        })?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Recognise every text line in the image.
    ///
    /// Lines are returned in the engine's reading order with their pixel
    /// bounding rects normalized against the image size. Blank lines are
    /// skipped.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize(&self, image: &DecodedImage) -> Result<Vec<TextObservation>, OcrBridgeError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            OcrBridgeError::EngineFailure(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;

        let input = self.engine.prepare_input(source).map_err(|err| {
            OcrBridgeError::EngineFailure(format!("OCR preprocessing failed: {err}"))
        })?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| OcrBridgeError::EngineFailure(format!("word detection failed: {err}")))?;
        debug!(word_count = word_rects.len(), "Words detected");

        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| OcrBridgeError::EngineFailure(format!("line recognition failed: {err}")))?;

        let mut observations = Vec::with_capacity(line_texts.len());
        for line in line_texts.iter().flatten() {
            let text = line.to_string();
            if text.trim().is_empty() {
                continue;
            }
            let rect = line.bounding_rect();
            let bounding_box = NormalizedRect::from_pixel_edges(
                f64::from(rect.left()),
                f64::from(rect.top()),
                f64::from(rect.right()),
                f64::from(rect.bottom()),
                width,
                height,
            );
            observations.push(TextObservation {
                text,
                bounding_box,
                confidence: None,
            });
        }

        debug!(lines = observations.len(), "OCR recognition complete");
        Ok(observations)
    }
}

fn load_model(path: &Path) -> Result<Model, OcrBridgeError> {
    Model::load_file(path).map_err(|err| {
        OcrBridgeError::EngineFailure(format!(
            "failed to load model from {}: {err}",
            path.display()
        ))
    })
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for native text recognition.
//
// Every backend (Vision, ML Kit, ocrs, test doubles) is reached through this
// one trait; the scan adapter never knows which engine it is driving.

use ocrbridge_core::error::Result;
use ocrbridge_core::{NormalizedRegion, TextObservation};
use ocrbridge_vision::DecodedImage;

/// A text recognition engine.
///
/// `recognize` blocks until the engine reports back; the adapter calls it from
/// a blocking worker thread, never from an async task. Implementations are
/// shared between concurrent scans, so they must either be reentrant or
/// serialize internally.
pub trait TextRecognizer: Send + Sync {
    /// Human-readable engine name (e.g. "Apple Vision", "ML Kit").
    fn platform_name(&self) -> &str;

    /// Whether `recognize` can restrict itself to a region natively.
    ///
    /// Purely an optimisation: results are region-filtered afterwards anyway.
    fn supports_region_hint(&self) -> bool {
        false
    }

    /// Recognize text in `image`.
    ///
    /// Observations come back in the engine's reading order with boxes in
    /// normalized top-left space. `region_hint` is only passed when
    /// [`supports_region_hint`](Self::supports_region_hint) is true and is
    /// already clamped to the unit square.
    ///
    /// # Errors
    ///
    /// [`OcrBridgeError::EngineFailure`](ocrbridge_core::OcrBridgeError::EngineFailure)
    /// when the engine fails or is unavailable. Never retried.
    fn recognize(
        &self,
        image: &DecodedImage,
        region_hint: Option<&NormalizedRegion>,
    ) -> Result<Vec<TextObservation>>;
}

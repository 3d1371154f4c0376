// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async scan adapter — the surface the application layer calls.
//
// Each scan is one unit of work on the tokio blocking pool:
// resolve → decode → recognize → filter → join. The outcome travels back
// through a oneshot channel, so every `PendingScan` resolves exactly once,
// with either the text or an error. There is no cancellation: dropping a
// `PendingScan` lets the worker finish and discards its result.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use ocrbridge_core::error::{OcrBridgeError, Result};
use ocrbridge_core::{BridgeConfig, FrameDescriptor, ImageReference, NormalizedRegion, ScanId};
use ocrbridge_vision::{collect_text, source};
use tokio::sync::oneshot;
use tracing::{debug, info, info_span, warn};

use crate::traits::TextRecognizer;

/// Entry point for scans. Cheap to clone; clones share the recognizer.
#[derive(Clone)]
pub struct OcrBridge {
    recognizer: Arc<dyn TextRecognizer>,
    config: Arc<BridgeConfig>,
}

impl OcrBridge {
    /// Bridge backed by the engine for the target operating system.
    pub fn new(config: BridgeConfig) -> Self {
        let recognizer = crate::platform_recognizer(&config);
        Self::with_recognizer(recognizer, config)
    }

    /// Bridge backed by an explicit recognizer.
    pub fn with_recognizer(recognizer: Arc<dyn TextRecognizer>, config: BridgeConfig) -> Self {
        info!(
            engine = recognizer.platform_name(),
            region_hint = recognizer.supports_region_hint() && config.use_region_hint,
            "OCR bridge ready"
        );
        Self {
            recognizer,
            config: Arc::new(config),
        }
    }

    pub fn platform_name(&self) -> &str {
        self.recognizer.platform_name()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Identity passthrough used by hosts to check the bridge is wired up.
    pub fn scan(&self, input: &str) -> String {
        input.to_owned()
    }

    /// Recognize text in a base64-encoded frame.
    pub fn scan_frame(&self, frame: FrameDescriptor) -> PendingScan {
        self.scan_reference(ImageReference::Frame(frame), None)
    }

    /// Recognize all text in an image file (`file://` prefix allowed).
    pub fn scan_image(&self, path: impl Into<String>) -> PendingScan {
        self.scan_reference(ImageReference::FilePath(path.into()), None)
    }

    /// Recognize the text of an image file that overlaps `region`.
    pub fn scan_image_with_region(
        &self,
        path: impl Into<String>,
        region: NormalizedRegion,
    ) -> PendingScan {
        self.scan_reference(ImageReference::FilePath(path.into()), Some(region))
    }

    /// Start a scan of any reference, optionally restricted to a region.
    ///
    /// Must be called from within a tokio runtime; outside one the returned
    /// scan resolves immediately with `EngineFailure`.
    pub fn scan_reference(
        &self,
        reference: ImageReference,
        region: Option<NormalizedRegion>,
    ) -> PendingScan {
        let id = ScanId::new();
        let (tx, rx) = oneshot::channel();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                warn!(scan_id = %id, error = %err, "scan started outside a tokio runtime");
                let _ = tx.send(Err(OcrBridgeError::EngineFailure(format!(
                    "no async runtime available: {err}"
                ))));
                return PendingScan { id, rx };
            }
        };

        let recognizer = Arc::clone(&self.recognizer);
        let use_hint = self.config.use_region_hint;
        let span = info_span!(
            "scan",
            scan_id = %id,
            source = %reference.describe(),
            region = region.is_some()
        );

        handle.spawn_blocking(move || {
            let _entered = span.enter();
            let outcome = run_pipeline(recognizer.as_ref(), &reference, region.as_ref(), use_hint);
            match &outcome {
                Ok(text) => info!(chars = text.len(), "scan resolved"),
                Err(err) => warn!(kind = %err.kind(), error = %err, "scan failed"),
            }
            // The caller may have dropped the PendingScan; nothing to do then.
            if tx.send(outcome).is_err() {
                debug!("scan result discarded, caller went away");
            }
        });

        PendingScan { id, rx }
    }
}

/// Run one scan synchronously on the current thread.
///
/// The decoded image and observation list live only inside this call.
pub fn run_pipeline(
    recognizer: &dyn TextRecognizer,
    reference: &ImageReference,
    region: Option<&NormalizedRegion>,
    use_region_hint: bool,
) -> Result<String> {
    let image = source::resolve(reference)?;

    let hint = region
        .filter(|_| use_region_hint && recognizer.supports_region_hint())
        .map(hint_band);
    let observations = recognizer.recognize(&image, hint.as_ref())?;
    drop(image);

    debug!(observations = observations.len(), "engine returned");
    Ok(collect_text(observations, region))
}

/// Smallest vertical padding added above and below a region hint.
const MIN_HINT_PADDING: f64 = 0.05;

/// The region of interest handed to engines that crop to it.
///
/// Spans the full image width so lines crossing the region's left or right
/// edge are recognized whole, and pads the region vertically by its own
/// height (at least [`MIN_HINT_PADDING`]) for lines crossing the top or
/// bottom edge. Lines taller than the padding can still be cut.
pub fn hint_band(region: &NormalizedRegion) -> NormalizedRegion {
    let region = region.clamped();
    let padding = region.height.max(MIN_HINT_PADDING);
    let top = (region.y - padding).max(0.0);
    let bottom = (region.bottom() + padding).min(1.0);
    NormalizedRegion::new(0.0, top, 1.0, bottom - top)
}

/// A scan in flight. Resolves exactly once with the recognized text or the
/// error that stopped it.
#[must_use = "a scan's result is only observable by awaiting it"]
pub struct PendingScan {
    id: ScanId,
    rx: oneshot::Receiver<Result<String>>,
}

impl PendingScan {
    /// Identifier of this scan, as recorded in logs.
    pub fn id(&self) -> ScanId {
        self.id
    }
}

impl Future for PendingScan {
    type Output = Result<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(outcome) => outcome,
            // Sender dropped without sending: the worker panicked.
            Err(_) => Err(OcrBridgeError::EngineFailure(
                "scan worker exited without a result".into(),
            )),
        })
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! ocrbridge — native OCR engine bridges.
//!
//! Defines the [`TextRecognizer`](traits::TextRecognizer) seam, selects the
//! engine for the target operating system at build time, and exposes the
//! asynchronous scan surface ([`OcrBridge`]) the application layer calls.
//!
//! | target  | engine                                   |
//! |---------|------------------------------------------|
//! | iOS     | Vision `VNRecognizeTextRequest` (objc2)   |
//! | Android | ML Kit Text Recognition (JNI)            |
//! | other   | `ocrs` with the `ocr` feature, else none |

pub mod bridge;
pub mod logging;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

use std::sync::Arc;

use ocrbridge_core::BridgeConfig;

pub use bridge::{OcrBridge, PendingScan};
pub use traits::TextRecognizer;

/// Build the recognizer for the target operating system.
///
/// Never fails: a backend that cannot start reports the reason from every
/// `recognize` call instead, so the scan surface stays uniform.
pub fn platform_recognizer(config: &BridgeConfig) -> Arc<dyn TextRecognizer> {
    #[cfg(target_os = "ios")]
    {
        // iOS: Vision, via objc2 message sends.
        Arc::new(ios::VisionRecognizer::new(config))
    }
    #[cfg(target_os = "android")]
    {
        // Android: ML Kit, via jni-rs calls into ART.
        Arc::new(android::MlKitRecognizer::new(config))
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: ocrs when compiled in, otherwise an engine-less stub.
        Arc::new(stub::DesktopRecognizer::new(config))
    }
}

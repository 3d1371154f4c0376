// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS text recognition via the Vision framework and objc2.
//
// Requires compilation with the iOS SDK (Xcode). The decoded image is handed
// to `VNImageRequestHandler` as PNG data and a `VNRecognizeTextRequest` is
// performed synchronously; `recognize` is only ever called from a blocking
// worker thread, never the main thread, so the synchronous perform is safe.
//
// ## Coordinate spaces
//
// Vision normalizes with the origin at the bottom-left. Observation boxes are
// additionally relative to `regionOfInterest` when one is set. Both are
// undone here so callers only ever see top-left, whole-image coordinates.
//
// ## Unsafe code
//
// Every `msg_send!` targets a documented Vision selector; argument and return
// types follow the SDK headers (`NSInteger`, `NSUInteger`, `CGRect`, `float`).

#![cfg(target_os = "ios")]

use objc2::rc::{Allocated, Retained, autoreleasepool};
use objc2::runtime::AnyObject;
use objc2::{class, msg_send};
use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use objc2_foundation::{NSArray, NSData, NSDictionary, NSError, NSString};

use ocrbridge_core::error::{OcrBridgeError, Result};
use ocrbridge_core::{BridgeConfig, NormalizedRect, NormalizedRegion, RecognitionLevel, TextObservation};
use ocrbridge_vision::DecodedImage;

use crate::traits::TextRecognizer;

// Vision.framework has no C symbols we call directly; this forces the link so
// `class!(VNRecognizeTextRequest)` resolves at runtime.
#[link(name = "Vision", kind = "framework")]
unsafe extern "C" {}

/// `VNRequestTextRecognitionLevelAccurate`.
const LEVEL_ACCURATE: isize = 0;
/// `VNRequestTextRecognitionLevelFast`.
const LEVEL_FAST: isize = 1;

/// iOS implementation of [`TextRecognizer`] on top of Vision.
///
/// Holds no Objective-C state; a fresh request and handler are created per
/// call, so concurrent scans never share Vision objects.
pub struct VisionRecognizer {
    level: RecognitionLevel,
    language_correction: bool,
}

impl VisionRecognizer {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            level: config.recognition_level,
            language_correction: config.language_correction,
        }
    }
}

impl TextRecognizer for VisionRecognizer {
    fn platform_name(&self) -> &str {
        "Apple Vision"
    }

    fn supports_region_hint(&self) -> bool {
        true
    }

    fn recognize(
        &self,
        image: &DecodedImage,
        region_hint: Option<&NormalizedRegion>,
    ) -> Result<Vec<TextObservation>> {
        let png = image.to_png_bytes()?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            bytes = png.len(),
            "Vision: performing text request"
        );

        // Vision rejects empty regions of interest; let the filter handle them.
        let roi = region_hint
            .filter(|r| r.width > 0.0 && r.height > 0.0)
            .copied();

        autoreleasepool(|_| self.perform(&png, roi))
    }
}

impl VisionRecognizer {
    fn perform(&self, png: &[u8], roi: Option<NormalizedRect>) -> Result<Vec<TextObservation>> {
        let data = NSData::with_bytes(png);
        let options = NSDictionary::<NSString, AnyObject>::new();

        // SAFETY: VNRecognizeTextRequest / VNImageRequestHandler selectors as
        // declared in <Vision/VNRecognizeTextRequest.h> and
        // <Vision/VNRequestHandler.h>; all objects are retained for the scope.
        unsafe {
            let request: Retained<AnyObject> = msg_send![class!(VNRecognizeTextRequest), new];

            let level = match self.level {
                RecognitionLevel::Accurate => LEVEL_ACCURATE,
                RecognitionLevel::Fast => LEVEL_FAST,
            };
            let _: () = msg_send![&*request, setRecognitionLevel: level];
            let _: () = msg_send![&*request, setUsesLanguageCorrection: self.language_correction];

            if let Some(region) = roi {
                let _: () = msg_send![&*request, setRegionOfInterest: to_vision_rect(&region)];
            }

            let handler: Allocated<AnyObject> = msg_send![class!(VNImageRequestHandler), alloc];
            let handler: Retained<AnyObject> =
                msg_send![handler, initWithData: &*data, options: &*options];

            let requests = NSArray::from_slice(&[&*request]);
            let performed: std::result::Result<(), Retained<NSError>> =
                msg_send![&*handler, performRequests: &*requests, error: _];
            if let Err(err) = performed {
                let reason = err.localizedDescription().to_string();
                tracing::warn!(error = %reason, "Vision: text request failed");
                return Err(OcrBridgeError::EngineFailure(reason));
            }

            let results: Option<Retained<NSArray<AnyObject>>> = msg_send![&*request, results];
            let Some(results) = results else {
                return Ok(Vec::new());
            };

            let mut observations = Vec::with_capacity(results.count());
            for observation in results.iter() {
                let candidates: Retained<NSArray<AnyObject>> =
                    msg_send![&*observation, topCandidates: 1usize];
                // Observations without a candidate carry no text; skip them.
                let Some(candidate) = candidates.firstObject() else {
                    continue;
                };
                let text: Retained<NSString> = msg_send![&*candidate, string];
                let confidence: f32 = msg_send![&*candidate, confidence];
                let bbox: CGRect = msg_send![&*observation, boundingBox];

                observations.push(TextObservation {
                    text: text.to_string(),
                    bounding_box: Some(from_vision_rect(&bbox, roi.as_ref())),
                    confidence: Some(confidence),
                });
            }
            tracing::debug!(count = observations.len(), "Vision: observations received");
            Ok(observations)
        }
    }
}

/// Top-left normalized rect → Vision's bottom-left normalized rect.
fn to_vision_rect(rect: &NormalizedRect) -> CGRect {
    let flipped = rect.flipped_vertically();
    CGRect::new(
        CGPoint::new(flipped.x, flipped.y),
        CGSize::new(flipped.width, flipped.height),
    )
}

/// Vision observation box (bottom-left, relative to the region of interest
/// when one was set) → top-left whole-image rect.
///
/// Flipping inside the ROI's local space and then mapping out is the same as
/// mapping out in Vision's space and flipping there.
fn from_vision_rect(bbox: &CGRect, roi: Option<&NormalizedRect>) -> NormalizedRect {
    let local =
        NormalizedRect::new(bbox.origin.x, bbox.origin.y, bbox.size.width, bbox.size.height)
            .flipped_vertically();
    match roi {
        Some(roi) => local.within(roi),
        None => local,
    }
}

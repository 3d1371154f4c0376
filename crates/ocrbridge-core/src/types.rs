// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for ocrbridge.
//
// All geometry is expressed in one normalized coordinate space: fractions of
// the image width/height with the origin at the top-left corner and `y`
// growing downward. Backends whose engine reports in another space convert
// before handing observations back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single scan invocation (used for log correlation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned rectangle in normalized (0–1) image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Caller-supplied region of interest. Same space as observation boxes.
pub type NormalizedRegion = NormalizedRect;

impl NormalizedRect {
    pub const UNIT: NormalizedRect = NormalizedRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized rect from a pixel rectangle given as edges.
    ///
    /// Returns `None` when the image has a zero dimension.
    pub fn from_pixel_edges(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let (w, h) = (f64::from(image_width), f64::from(image_height));
        Some(Self {
            x: left / w,
            y: top / h,
            width: (right - left) / w,
            height: (bottom - top) / h,
        })
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Intersect with the unit square. Edges outside [0, 1] are pulled in;
    /// a rect entirely outside collapses to zero area. Non-finite input
    /// collapses to a zero-area rect at the origin.
    pub fn clamped(&self) -> Self {
        if !self.is_finite() {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let left = self.x.clamp(0.0, 1.0);
        let top = self.y.clamp(0.0, 1.0);
        let right = self.right().clamp(0.0, 1.0);
        let bottom = self.bottom().clamp(0.0, 1.0);
        Self {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// True when the two rectangles share a positive-area overlap.
    ///
    /// Touching edges (zero-width or zero-height overlap) do not count.
    /// Any non-finite coordinate on either side yields `false`.
    pub fn intersects(&self, other: &NormalizedRect) -> bool {
        if !self.is_finite() || !other.is_finite() {
            return false;
        }
        let overlap_w = self.right().min(other.right()) - self.x.max(other.x);
        let overlap_h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        overlap_w > 0.0 && overlap_h > 0.0
    }

    /// Map a rect expressed relative to `outer` (where `outer` spans 0..1)
    /// back into the space `outer` itself lives in.
    pub fn within(&self, outer: &NormalizedRect) -> Self {
        Self {
            x: outer.x + self.x * outer.width,
            y: outer.y + self.y * outer.height,
            width: self.width * outer.width,
            height: self.height * outer.height,
        }
    }

    /// Express this rect relative to `outer`. Inverse of [`Self::within`];
    /// `None` when `outer` has zero area.
    pub fn relative_to(&self, outer: &NormalizedRect) -> Option<Self> {
        if outer.width <= 0.0 || outer.height <= 0.0 {
            return None;
        }
        Some(Self {
            x: (self.x - outer.x) / outer.width,
            y: (self.y - outer.y) / outer.height,
            width: self.width / outer.width,
            height: self.height / outer.height,
        })
    }

    /// Mirror across the horizontal centre line, converting between a
    /// top-left origin and a bottom-left origin (as used by Apple Vision).
    pub fn flipped_vertically(&self) -> Self {
        Self {
            x: self.x,
            y: 1.0 - self.y - self.height,
            width: self.width,
            height: self.height,
        }
    }
}

/// In-memory frame handed across the bridge.
///
/// `payload` is the standard-alphabet base64 encoding of an encoded image
/// file (PNG, JPEG, ...). `width`/`height` must match the decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub width: u32,
    pub height: u32,
    pub payload: String,
}

/// What the caller asked us to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageReference {
    /// Filesystem path, optionally prefixed with `file://`.
    FilePath(String),
    /// Base64-encoded frame.
    Frame(FrameDescriptor),
}

impl ImageReference {
    /// Short label for logs; never includes frame payloads.
    pub fn describe(&self) -> String {
        match self {
            ImageReference::FilePath(path) => path.clone(),
            ImageReference::Frame(frame) => format!("frame {}x{}", frame.width, frame.height),
        }
    }
}

/// One engine-reported block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Recognized text, exactly as the engine reported it.
    pub text: String,
    /// Bounding box in normalized top-left space. Some engines omit it.
    pub bounding_box: Option<NormalizedRect>,
    /// Engine confidence in [0, 1], when reported.
    pub confidence: Option<f32>,
}

impl TextObservation {
    pub fn new(text: impl Into<String>, bounding_box: NormalizedRect) -> Self {
        Self {
            text: text.into(),
            bounding_box: Some(bounding_box),
            confidence: None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_box_intersects() {
        let region = NormalizedRect::new(0.1, 0.3, 0.8, 0.2);
        let inside = NormalizedRect::new(0.15, 0.32, 0.2, 0.05);
        let outside = NormalizedRect::new(0.0, 0.0, 0.05, 0.05);
        assert!(region.intersects(&inside));
        assert!(inside.intersects(&region));
        assert!(!region.intersects(&outside));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = NormalizedRect::new(0.0, 0.0, 0.5, 0.5);
        let right = NormalizedRect::new(0.5, 0.0, 0.5, 0.5);
        let below = NormalizedRect::new(0.0, 0.5, 0.5, 0.5);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn zero_area_region_matches_nothing() {
        let line = NormalizedRect::new(0.5, 0.0, 0.0, 1.0);
        let block = NormalizedRect::new(0.4, 0.4, 0.2, 0.2);
        assert!(!line.intersects(&block));
    }

    #[test]
    fn nan_never_intersects() {
        let nan = NormalizedRect::new(f64::NAN, 0.0, 1.0, 1.0);
        let block = NormalizedRect::new(0.1, 0.1, 0.2, 0.2);
        assert!(!nan.intersects(&NormalizedRect::UNIT));
        assert!(!nan.intersects(&block));
        assert!(!block.intersects(&nan));
        assert!(!nan.clamped().intersects(&block));
    }

    #[test]
    fn infinite_coordinates_never_intersect() {
        let block = NormalizedRect::new(0.1, 0.1, 0.2, 0.2);
        let wide = NormalizedRect::new(f64::NEG_INFINITY, 0.0, f64::INFINITY, 1.0);
        let tall = NormalizedRect::new(0.0, 0.0, 1.0, f64::INFINITY);
        assert!(!wide.intersects(&block));
        assert!(!tall.intersects(&block));

        let collapsed = tall.clamped();
        assert_eq!((collapsed.width, collapsed.height), (0.0, 0.0));
        assert!(collapsed.is_finite());
    }

    #[test]
    fn clamp_pulls_edges_into_unit_square() {
        let r = NormalizedRect::new(-0.5, 0.8, 1.0, 0.5).clamped();
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, 0.8);
        assert!((r.width - 0.5).abs() < 1e-12);
        assert!((r.height - 0.2).abs() < 1e-12);

        let gone = NormalizedRect::new(2.0, 2.0, 1.0, 1.0).clamped();
        assert_eq!(gone.width, 0.0);
        assert_eq!(gone.height, 0.0);
    }

    #[test]
    fn vertical_flip_round_trips() {
        let r = NormalizedRect::new(0.1, 0.2, 0.3, 0.4);
        let flipped = r.flipped_vertically();
        assert!((flipped.y - 0.4).abs() < 1e-12);
        let back = flipped.flipped_vertically();
        assert!((back.y - r.y).abs() < 1e-12);
    }

    #[test]
    fn relative_rects_map_back_into_outer_space() {
        let outer = NormalizedRect::new(0.0, 0.25, 1.0, 0.5);
        let inner = NormalizedRect::new(0.1, 0.3, 0.4, 0.1);
        let local = inner.relative_to(&outer).unwrap();
        assert!((local.y - 0.1).abs() < 1e-12);
        assert!((local.height - 0.2).abs() < 1e-12);

        let back = local.within(&outer);
        assert!((back.x - inner.x).abs() < 1e-12);
        assert!((back.y - inner.y).abs() < 1e-12);
        assert!((back.width - inner.width).abs() < 1e-12);
        assert!((back.height - inner.height).abs() < 1e-12);

        assert!(inner.relative_to(&NormalizedRect::new(0.2, 0.2, 0.0, 0.5)).is_none());
    }

    #[test]
    fn pixel_edges_normalize_against_dimensions() {
        let r = NormalizedRect::from_pixel_edges(10.0, 20.0, 60.0, 40.0, 100, 200).unwrap();
        assert!((r.x - 0.1).abs() < 1e-12);
        assert!((r.y - 0.1).abs() < 1e-12);
        assert!((r.width - 0.5).abs() < 1e-12);
        assert!((r.height - 0.1).abs() < 1e-12);
        assert!(NormalizedRect::from_pixel_edges(0.0, 0.0, 1.0, 1.0, 0, 10).is_none());
    }

    #[test]
    fn frame_description_omits_payload() {
        let reference = ImageReference::Frame(FrameDescriptor {
            width: 640,
            height: 480,
            payload: "aGVsbG8=".into(),
        });
        assert_eq!(reference.describe(), "frame 640x480");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrbridge-vision — the engine-independent half of a scan.
//
// Resolves image references into decoded pixels, filters engine observations
// by region of interest, and joins the survivors into the result string. The
// optional `ocr` feature adds a pure-Rust recognition engine for hosts that
// have no native one.

pub mod aggregate;
pub mod image;
pub mod region;
pub mod scan;
pub mod source;

pub use aggregate::{collect_text, join_observations};
pub use crate::image::DecodedImage;
pub use region::filter_observations;
pub use source::{resolve, strip_file_scheme};

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrConfig, OcrEngine};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrbridge — Core types, errors and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BridgeConfig, RecognitionLevel};
pub use error::{ErrorKind, OcrBridgeError};
pub use types::*;

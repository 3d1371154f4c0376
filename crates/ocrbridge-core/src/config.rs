// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OcrBridgeError, Result};

/// Speed/accuracy trade-off requested from engines that expose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionLevel {
    #[default]
    Accurate,
    Fast,
}

/// Settings for an `OcrBridge` and the recognizer it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Recognition level for engines that support one (Vision).
    pub recognition_level: RecognitionLevel,
    /// Let the engine apply language-model correction (Vision).
    pub language_correction: bool,
    /// Forward a widened band around the region to engines that accept a
    /// region of interest natively. Results are filtered afterwards either
    /// way. Off by default: an engine that crops to the band can still cut a
    /// line taller than the band padding.
    pub use_region_hint: bool,
    /// Directory holding the desktop OCR models. `None` uses the cache default.
    pub model_dir: Option<PathBuf>,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            recognition_level: RecognitionLevel::Accurate,
            language_correction: true,
            use_region_hint: false,
            model_dir: None,
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Load a config from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(OcrBridgeError::Config("log_filter must not be empty".into()));
        }
        Ok(())
    }
}

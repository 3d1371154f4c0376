// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ocrbridge.

use thiserror::Error;

/// Top-level error type for all ocrbridge operations.
///
/// The `Display` output is the human-readable message handed back to the
/// calling application layer when a scan is rejected.
#[derive(Debug, Error)]
pub enum OcrBridgeError {
    // -- Scan errors --
    #[error("could not load image from path: {0}")]
    ResourceNotFound(String),

    #[error("could not decode image: {0}")]
    DecodeFailure(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("text recognition failed: {0}")]
    EngineFailure(String),

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of an [`OcrBridgeError`], for callers that need to
/// branch on the failure without matching message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ResourceNotFound,
    DecodeFailure,
    InvalidFrame,
    EngineFailure,
    Config,
}

impl ErrorKind {
    /// Stable identifier sent across the native call boundary.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ResourceNotFound => "ResourceNotFound",
            ErrorKind::DecodeFailure => "DecodeFailure",
            ErrorKind::InvalidFrame => "InvalidFrame",
            ErrorKind::EngineFailure => "EngineFailure",
            ErrorKind::Config => "Config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl OcrBridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrBridgeError::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
            OcrBridgeError::DecodeFailure(_) => ErrorKind::DecodeFailure,
            OcrBridgeError::InvalidFrame(_) => ErrorKind::InvalidFrame,
            OcrBridgeError::EngineFailure(_) => ErrorKind::EngineFailure,
            OcrBridgeError::Config(_)
            | OcrBridgeError::Io(_)
            | OcrBridgeError::Serialization(_) => ErrorKind::Config,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OcrBridgeError>;

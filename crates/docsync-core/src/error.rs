//! Conversion errors.
//!
//! Only genuinely failed conversions surface here. Degenerate input (short
//! tables, missing font sizes, unknown fence languages, unterminated fences)
//! always resolves to a fallback rendering instead.

use thiserror::Error;

/// Error kinds for categorizing conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertErrorKind {
    /// The decoder for this document kind is not compiled in.
    CapabilityUnavailable,
    /// Text input was not valid UTF-8.
    InvalidUtf8,
    /// The binary document could not be decoded.
    Malformed,
}

/// A failed conversion of one document.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Decoding was requested for a format this build cannot read.
    #[error("{format} decoding is not available in this build (enable the `{feature}` feature)")]
    CapabilityUnavailable {
        /// Human-readable format name.
        format: &'static str,
        /// Cargo feature that provides the decoder.
        feature: &'static str,
    },

    /// Markup or plain-text input was not UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The binary document was structurally broken.
    #[error("malformed {format} document: {reason}")]
    Malformed {
        /// Human-readable format name.
        format: &'static str,
        /// What went wrong.
        reason: String,
    },
}

impl ConvertError {
    /// Create an error for a missing decoder.
    pub fn capability_unavailable(format: &'static str, feature: &'static str) -> Self {
        Self::CapabilityUnavailable { format, feature }
    }

    /// Create an error for an undecodable document.
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ConvertErrorKind {
        match self {
            Self::CapabilityUnavailable { .. } => ConvertErrorKind::CapabilityUnavailable,
            Self::InvalidUtf8(_) => ConvertErrorKind::InvalidUtf8,
            Self::Malformed { .. } => ConvertErrorKind::Malformed,
        }
    }

    /// Check if this error means the decoder is missing from the build.
    pub fn is_capability_unavailable(&self) -> bool {
        self.kind() == ConvertErrorKind::CapabilityUnavailable
    }
}

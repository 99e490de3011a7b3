//! Conversion entry point.
//!
//! Every call is a pure function of (content, kind, options); nothing is
//! cached or shared between calls, so independent documents can be
//! converted in parallel.

use std::path::Path;

use crate::error::ConvertError;
use crate::html;
use crate::options::RenderOptions;
use crate::parser::Parser;
use crate::richtext::{self, RichDocument};

/// The kind of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Lightweight markup (`.md`).
    Markup,
    /// Plain text (`.txt`); rendered through the markup path.
    PlainText,
    /// Binary rich-text package (`.docx`).
    RichText,
}

impl DocumentKind {
    /// Detect the kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markup),
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::RichText),
            _ => None,
        }
    }

    /// Detect the kind from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Convert raw document bytes to an HTML fragment.
pub fn convert(
    kind: DocumentKind,
    bytes: &[u8],
    options: &RenderOptions,
) -> Result<String, ConvertError> {
    match kind {
        DocumentKind::Markup | DocumentKind::PlainText => {
            let text = std::str::from_utf8(bytes)?;
            Ok(render_markup(text, options))
        }
        DocumentKind::RichText => {
            let doc = decode_rich_text(bytes)?;
            Ok(render_rich(&doc, options))
        }
    }
}

/// Render markup text to an HTML fragment.
pub fn render_markup(input: &str, options: &RenderOptions) -> String {
    let doc = Parser::new(options).parse(input);
    html::render(&doc, options)
}

/// Render an already decoded rich-text document to an HTML fragment.
pub fn render_rich(doc: &RichDocument, options: &RenderOptions) -> String {
    html::render(&richtext::to_document(doc), options)
}

#[cfg(feature = "docx")]
fn decode_rich_text(bytes: &[u8]) -> Result<RichDocument, ConvertError> {
    crate::docx::decode(bytes)
}

#[cfg(not(feature = "docx"))]
fn decode_rich_text(_bytes: &[u8]) -> Result<RichDocument, ConvertError> {
    Err(missing_rich_text_decoder())
}

/// The error reported for rich text when the `docx` feature is off.
#[cfg_attr(feature = "docx", allow(dead_code))]
fn missing_rich_text_decoder() -> ConvertError {
    ConvertError::capability_unavailable("docx", "docx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertErrorKind;

    #[test]
    fn missing_decoder_is_a_capability_error() {
        let err = missing_rich_text_decoder();
        assert_eq!(err.kind(), ConvertErrorKind::CapabilityUnavailable);
        assert!(err.to_string().contains("docx"));
    }
}

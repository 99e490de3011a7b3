//! # docsync Core
//!
//! Converts lightweight-markup text and rich-text (`.docx`) documents into
//! semantic HTML fragments for static publishing.
//!
//! ## Quick Start
//!
//! ```rust
//! use docsync_core::{render_markup, RenderOptions};
//!
//! let html = render_markup("# Hello\n\nSome **bold** text.", &RenderOptions::bare());
//! assert_eq!(html, "<h1>Hello</h1>\n<br>\n<p>Some <strong>bold</strong> text.</p>");
//! ```
//!
//! ## Document kinds
//!
//! ```rust
//! use docsync_core::{convert, DocumentKind, RenderOptions};
//!
//! let options = RenderOptions::default();
//! let html = convert(DocumentKind::Markup, b"- a\n- b", &options).unwrap();
//! assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
//! ```
//!
//! Markup and plain text go through the line-oriented block renderer.
//! Rich-text packages are decoded into paragraphs and their headings are
//! inferred from font sizes; that path needs the `docx` feature (on by
//! default) and reports [`ConvertError::CapabilityUnavailable`] otherwise.

pub mod ast;
pub mod convert;
#[cfg(feature = "docx")]
pub mod docx;
pub mod error;
pub mod html;
pub mod inline;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod richtext;
pub mod table;

pub use ast::{Block, Document};
pub use convert::{convert, render_markup, render_rich, DocumentKind};
pub use error::{ConvertError, ConvertErrorKind};
pub use options::RenderOptions;
pub use parser::Parser;
pub use richtext::{FontProfile, RichDocument, RichParagraph, Run};

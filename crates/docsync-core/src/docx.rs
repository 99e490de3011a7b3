//! Word-processing package (`.docx`) decoding.
//!
//! Reads `word/document.xml` out of the zip container and streams it into a
//! [`RichDocument`]. Only body-level paragraphs are collected; paragraphs
//! inside tables and text boxes are skipped. Run sizes come from `w:rPr/w:sz`, which stores
//! half-points.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ConvertError;
use crate::richtext::{RichDocument, RichParagraph, Run};

const FORMAT: &str = "docx";
const DOCUMENT_PART: &str = "word/document.xml";

/// Decode a `.docx` package into its paragraph stream.
pub fn decode(bytes: &[u8]) -> Result<RichDocument, ConvertError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ConvertError::malformed(FORMAT, format!("not a zip package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ConvertError::malformed(FORMAT, format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ConvertError::malformed(FORMAT, format!("{DOCUMENT_PART}: {e}")))?;

    parse_document_xml(&xml)
}

/// Parse the main document part.
pub fn parse_document_xml(xml: &str) -> Result<RichDocument, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut state = State::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ConvertError::malformed(
                FORMAT,
                format!("xml error at byte {}: {e}", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => state.open(&e)?,
            Event::Empty(e) => {
                state.open(&e)?;
                state.close(e.name().as_ref());
            }
            Event::End(e) => state.close(e.name().as_ref()),
            Event::Text(t) if state.in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ConvertError::malformed(FORMAT, e.to_string()))?;
                state.push_text(&text);
            }
            Event::CData(t) if state.in_text => {
                state.push_text(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("decoded {} paragraphs", state.paragraphs.len());
    Ok(RichDocument::new(state.paragraphs))
}

/// Streaming state for the document part.
#[derive(Default)]
struct State {
    paragraphs: Vec<RichParagraph>,
    paragraph: Option<RichParagraph>,
    run: Option<Run>,
    table_depth: usize,
    nested_depth: usize,
    in_run_props: bool,
    in_text: bool,
}

impl State {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), ConvertError> {
        let name = e.name();
        if is_nested_content(name.as_ref()) {
            self.nested_depth += 1;
        }
        if self.nested_depth > 0 {
            return Ok(());
        }
        match name.as_ref() {
            b"w:tbl" => self.table_depth += 1,
            b"w:p" if self.table_depth == 0 => self.paragraph = Some(RichParagraph::default()),
            b"w:r" if self.paragraph.is_some() => self.run = Some(Run::default()),
            b"w:rPr" if self.run.is_some() => self.in_run_props = true,
            b"w:sz" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.size = half_points(e)?;
                }
            }
            b"w:t" if self.run.is_some() => self.in_text = true,
            b"w:tab" if self.run.is_some() && !self.in_run_props => self.push_text("\t"),
            b"w:br" | b"w:cr" if self.run.is_some() => self.push_text("\n"),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if is_nested_content(name) {
            self.nested_depth = self.nested_depth.saturating_sub(1);
            return;
        }
        if self.nested_depth > 0 {
            return;
        }
        match name {
            b"w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            b"w:p" if self.table_depth == 0 => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.paragraphs.push(paragraph);
                }
            }
            b"w:r" => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
                self.in_run_props = false;
            }
            b"w:rPr" => self.in_run_props = false,
            b"w:t" => self.in_text = false,
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }
}

/// Text-box content: its paragraphs sit inside a run of the enclosing one.
fn is_nested_content(name: &[u8]) -> bool {
    name == b"w:txbxContent"
}

/// Read `w:val` from a `w:sz` element and convert half-points to points.
fn half_points(e: &BytesStart<'_>) -> Result<Option<f32>, ConvertError> {
    let attr = e
        .try_get_attribute("w:val")
        .map_err(|err| ConvertError::malformed(FORMAT, err.to_string()))?;

    let Some(attr) = attr else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| ConvertError::malformed(FORMAT, err.to_string()))?;

    Ok(value.trim().parse::<f32>().ok().map(|half| half / 2.0))
}

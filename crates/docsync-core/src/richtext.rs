//! Rich-text documents and heading-level inference.
//!
//! Rich-text input carries no explicit heading markup, only per-run font
//! sizes. Each paragraph is represented by the size of its first sized run;
//! the mean of those sizes across the document is the baseline, and a
//! paragraph whose size clears the baseline by more than 3, 2 or 1 points
//! becomes a level 1, 2 or 3 heading. A uniformly sized document therefore
//! renders as body text only.

use std::borrow::Cow;

use crate::ast::{Block, CowStr, Document, Heading, List, ListKind, Paragraph};
use crate::inline::escape;

/// Fallback size range when a document carries no size metadata at all.
const DEFAULT_MIN_POINTS: f32 = 12.0;
const DEFAULT_MAX_POINTS: f32 = 24.0;

/// A decoded rich-text document: an ordered paragraph stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichDocument {
    /// Paragraphs in document order.
    pub paragraphs: Vec<RichParagraph>,
}

/// One paragraph made of runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichParagraph {
    /// Runs in order.
    pub runs: Vec<Run>,
}

/// A run of text sharing one set of character properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    /// Run text.
    pub text: String,
    /// Explicit font size in points, if the run sets one.
    pub size: Option<f32>,
}

impl Run {
    /// Create a run with an explicit font size.
    pub fn sized(text: impl Into<String>, points: f32) -> Self {
        Self {
            text: text.into(),
            size: Some(points),
        }
    }

    /// Create a run that inherits its font size.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: None,
        }
    }
}

impl RichParagraph {
    /// Create a paragraph from runs.
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// The representative size: the first sized run's size.
    pub fn size(&self) -> Option<f32> {
        self.runs.iter().find_map(|run| run.size)
    }
}

impl RichDocument {
    /// Create a document from paragraphs.
    pub fn new(paragraphs: Vec<RichParagraph>) -> Self {
        Self { paragraphs }
    }

    /// Collect one size sample per paragraph that has a sized run.
    pub fn size_samples(&self) -> Vec<FontSizeSample> {
        self.paragraphs
            .iter()
            .enumerate()
            .filter_map(|(paragraph, p)| {
                p.size().map(|points| FontSizeSample { paragraph, points })
            })
            .collect()
    }
}

/// The representative font size observed for one paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizeSample {
    /// Paragraph index.
    pub paragraph: usize,
    /// Size in points.
    pub points: f32,
}

/// Size statistics used to classify headings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontProfile {
    /// Smallest observed size.
    pub min: f32,
    /// Largest observed size.
    pub max: f32,
    /// Mean of the observed sizes.
    pub mean: f32,
}

impl FontProfile {
    /// Build a profile from size samples.
    ///
    /// With no samples the profile falls back to a 12-24pt range so the
    /// mean is always defined.
    pub fn from_samples(samples: &[FontSizeSample]) -> Self {
        if samples.is_empty() {
            return Self {
                min: DEFAULT_MIN_POINTS,
                max: DEFAULT_MAX_POINTS,
                mean: (DEFAULT_MIN_POINTS + DEFAULT_MAX_POINTS) / 2.0,
            };
        }

        let (min, max, sum) = samples.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0_f32),
            |(min, max, sum), s| (min.min(s.points), max.max(s.points), sum + s.points),
        );

        Self {
            min,
            max,
            mean: sum / samples.len() as f32,
        }
    }

    /// Heading level for a paragraph of the given size, or `None` for body
    /// text. Unsized paragraphs are never headings.
    pub fn heading_level(&self, size: Option<f32>) -> Option<u8> {
        let size = size?;
        if size > self.mean + 3.0 {
            Some(1)
        } else if size > self.mean + 2.0 {
            Some(2)
        } else if size > self.mean + 1.0 {
            Some(3)
        } else {
            None
        }
    }
}

/// Classify every paragraph and build the block sequence.
///
/// Unsized paragraphs starting with `-` become list items; consecutive ones
/// share one list.
pub fn to_document(doc: &RichDocument) -> Document<'static> {
    let profile = FontProfile::from_samples(&doc.size_samples());
    log::debug!(
        "rich-text profile: {} paragraphs, min {}pt, max {}pt, mean {:.2}pt",
        doc.paragraphs.len(),
        profile.min,
        profile.max,
        profile.mean
    );

    let mut blocks: Vec<Block<'static>> = Vec::with_capacity(doc.paragraphs.len());

    for paragraph in &doc.paragraphs {
        let text = paragraph.text();
        let text = text.trim();

        if text.is_empty() {
            blocks.push(Block::Blank);
            continue;
        }

        let size = paragraph.size();
        if let Some(level) = profile.heading_level(size) {
            blocks.push(Block::Heading(Heading {
                level,
                html: escaped(text),
            }));
            continue;
        }

        match text.strip_prefix('-') {
            Some(item) if size.is_none() => push_list_item(&mut blocks, escaped(item.trim())),
            _ => blocks.push(Block::Paragraph(Paragraph {
                html: escaped(text),
            })),
        }
    }

    Document { blocks }
}

fn escaped(text: &str) -> CowStr<'static> {
    Cow::Owned(escape(text).into_owned())
}

fn push_list_item(blocks: &mut Vec<Block<'static>>, item: CowStr<'static>) {
    if let Some(Block::List(list)) = blocks.last_mut() {
        list.items.push(item);
        return;
    }
    blocks.push(Block::List(List {
        kind: ListKind::Unordered,
        items: vec![item],
    }));
}

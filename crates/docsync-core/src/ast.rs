//! Block types produced by the renderers.
//!
//! A [`Document`] is an ordered sequence of [`Block`]s built once per
//! conversion call. Text that has already gone through the inline span
//! processor (headings, paragraphs, list items, quote lines) is stored as
//! HTML-safe markup; raw text that is escaped at render time (code lines,
//! diagram lines, table cells) borrows from the input where possible.

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document<'a> {
    /// Content blocks in source order.
    pub blocks: Vec<Block<'a>>,
}

/// Block-level nodes.
///
/// Multi-line constructs (fences, quote runs, list runs, table runs) are
/// always consumed greedily into a single block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    /// Section heading (levels 1-3).
    Heading(Heading<'a>),
    /// Single-line paragraph.
    Paragraph(Paragraph<'a>),
    /// Ordered or unordered list.
    List(List<'a>),
    /// Pipe table with per-column alignment.
    Table(Table<'a>),
    /// Fenced code block with language tag.
    CodeBlock(CodeBlock<'a>),
    /// Fenced diagram block handed to a client-side diagram renderer.
    Diagram(Diagram<'a>),
    /// Run of `> ` lines.
    Quote(Quote<'a>),
    /// Horizontal rule.
    Divider,
    /// Blank line.
    Blank,
}

/// Section heading with its rendered inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    /// Heading level (1-3).
    pub level: u8,
    /// HTML-safe content.
    pub html: CowStr<'a>,
}

/// Paragraph with its rendered inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph<'a> {
    /// HTML-safe content.
    pub html: CowStr<'a>,
}

/// List ordering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Numbered list (1. 2. 3.).
    Ordered,
    /// Bulleted list (-).
    Unordered,
}

/// A list block; items are kept in source order with their markers stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct List<'a> {
    /// Ordered or unordered.
    pub kind: ListKind,
    /// HTML-safe item contents.
    pub items: Vec<CowStr<'a>>,
}

/// Column alignment derived from a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// No alignment style.
    #[default]
    None,
    /// `text-align:left`.
    Left,
    /// `text-align:center`.
    Center,
    /// `text-align:right`.
    Right,
}

impl Alignment {
    /// The CSS `text-align` value, if any.
    pub fn css(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// Table with header, per-column alignment and body rows.
///
/// Rows may have unequal lengths; cells beyond the header's column count
/// carry no alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    /// Header cells (raw text, escaped at render time).
    pub header: Vec<CowStr<'a>>,
    /// One alignment per header cell.
    pub alignments: Vec<Alignment>,
    /// Body rows (separator row already removed).
    pub rows: Vec<Vec<CowStr<'a>>>,
}

/// Fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock<'a> {
    /// Language tag after the opening fence (may be empty).
    pub lang: CowStr<'a>,
    /// Raw body lines, escaped independently at render time.
    pub lines: Vec<CowStr<'a>>,
}

/// Fenced diagram block.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram<'a> {
    /// Raw diagram source; the first line is the diagram directive when the
    /// fence tag carried one.
    pub lines: Vec<CowStr<'a>>,
}

/// Block quotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote<'a> {
    /// HTML-safe content of each quoted line.
    pub lines: Vec<CowStr<'a>>,
}

/// Borrowed or owned string type.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

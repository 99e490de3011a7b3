//! Block renderer.
//!
//! The parser walks an immutable line sequence with a local cursor. At each
//! position the trimmed line is tested against an ordered table of block
//! rules; the first rule whose predicate matches consumes one or more lines
//! and returns the block together with the new cursor position. The last
//! rule (paragraph) matches everything, so classification never fails.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{
    Block, CodeBlock, CowStr, Diagram, Document, Heading, List, ListKind, Paragraph, Quote,
};
use crate::inline;
use crate::lexer::{Line, Lines};
use crate::options::RenderOptions;
use crate::table;

/// Consumes lines starting at a cursor and returns the block plus the
/// cursor position after it.
type Consume = for<'a> fn(&Lines<'a>, usize, &RenderOptions) -> (Block<'a>, usize);

/// A predicate on the trimmed current line paired with its consumer.
struct BlockRule {
    name: &'static str,
    matches: fn(&str) -> bool,
    consume: Consume,
}

/// Block rules in priority order.
static RULES: [BlockRule; 9] = [
    BlockRule {
        name: "heading",
        matches: is_heading,
        consume: consume_heading,
    },
    BlockRule {
        name: "divider",
        matches: |t| t == "---",
        consume: |_, at, _| (Block::Divider, at + 1),
    },
    BlockRule {
        name: "quote",
        matches: |t| t.starts_with("> "),
        consume: consume_quote,
    },
    BlockRule {
        name: "fence",
        matches: |t| t.starts_with("```"),
        consume: consume_fence,
    },
    BlockRule {
        name: "unordered-list",
        matches: |t| t.starts_with("- "),
        consume: consume_unordered,
    },
    BlockRule {
        name: "ordered-list",
        matches: |t| ordered_marker().is_match(t),
        consume: consume_ordered,
    },
    BlockRule {
        name: "table",
        matches: |t| t.starts_with('|'),
        consume: consume_table,
    },
    BlockRule {
        name: "blank",
        matches: str::is_empty,
        consume: |_, at, _| (Block::Blank, at + 1),
    },
    BlockRule {
        name: "paragraph",
        matches: |_| true,
        consume: consume_paragraph,
    },
];

/// Markup parser producing a [`Document`].
///
/// Holds no state between calls; every `parse` builds its own line
/// sequence and cursor.
pub struct Parser<'o> {
    options: &'o RenderOptions,
}

impl<'o> Parser<'o> {
    /// Create a parser that renders inline content with `options`.
    #[inline]
    pub fn new(options: &'o RenderOptions) -> Self {
        Self { options }
    }

    /// Parse markup into blocks.
    pub fn parse<'a>(&self, input: &'a str) -> Document<'a> {
        let lines = Lines::new(input);
        let mut blocks = Vec::with_capacity(lines.len() / 2 + 1);
        let mut at = 0;

        while at < lines.len() {
            let (block, next) = self.parse_block(&lines, at);
            debug_assert!(next > at, "block consumers must advance the cursor");
            blocks.push(block);
            at = next;
        }

        Document { blocks }
    }

    fn parse_block<'a>(&self, lines: &Lines<'a>, at: usize) -> (Block<'a>, usize) {
        let trimmed = line_at(lines, at).trimmed();
        let rule = RULES
            .iter()
            .find(|rule| (rule.matches)(trimmed))
            .unwrap_or(&RULES[RULES.len() - 1]);

        log::trace!("line {}: {}", at, rule.name);
        (rule.consume)(lines, at, self.options)
    }
}

/// Check whether a fence tag selects the diagram renderer.
pub fn is_diagram_tag(tag: &str) -> bool {
    tag == "mermaid"
        || tag.starts_with("gantt")
        || tag.starts_with("flowchart")
        || tag.starts_with("graph")
}

#[inline]
fn line_at<'a>(lines: &Lines<'a>, at: usize) -> Line<'a> {
    lines.as_slice()[at]
}

fn ordered_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^\d+\.\s").expect("invalid ordered list pattern"))
}

fn ordered_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("invalid ordered list pattern"))
}

fn is_heading(trimmed: &str) -> bool {
    trimmed.starts_with("# ") || trimmed.starts_with("## ") || trimmed.starts_with("### ")
}

fn consume_heading<'a>(
    lines: &Lines<'a>,
    at: usize,
    options: &RenderOptions,
) -> (Block<'a>, usize) {
    let trimmed = line_at(lines, at).trimmed();
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    let text = &trimmed[level + 1..];

    let heading = Heading {
        level: level as u8,
        html: Cow::Owned(inline::process(text, options)),
    };
    (Block::Heading(heading), at + 1)
}

fn consume_quote<'a>(
    lines: &Lines<'a>,
    at: usize,
    options: &RenderOptions,
) -> (Block<'a>, usize) {
    let end = lines.run_end(at, |line| line.starts_with("> "));
    let quoted = lines.as_slice()[at..end]
        .iter()
        .map(|line| Cow::Owned(inline::process(&line.trimmed()[2..], options)))
        .collect();

    (Block::Quote(Quote { lines: quoted }), end)
}

fn consume_fence<'a>(
    lines: &Lines<'a>,
    at: usize,
    _options: &RenderOptions,
) -> (Block<'a>, usize) {
    let tag = line_at(lines, at).trimmed()[3..].trim();
    let body_start = at + 1;

    // Closing fences are recognized without leading indentation only.
    let close = lines.as_slice()[body_start..]
        .iter()
        .position(|line| line.text.trim_end().starts_with("```"))
        .map(|offset| body_start + offset);

    let body_end = close.unwrap_or(lines.len());
    let next = close.map_or(lines.len(), |close| close + 1);
    if close.is_none() {
        log::debug!("unterminated fence at line {} runs to end of input", at);
    }

    let body = lines.as_slice()[body_start..body_end]
        .iter()
        .map(|line| Cow::Borrowed(line.text));

    let block = if is_diagram_tag(tag) {
        let mut content: Vec<CowStr<'a>> = Vec::with_capacity(body_end - body_start + 1);
        // A directive written as the fence tag is not part of the body.
        if tag != "mermaid" {
            content.push(Cow::Borrowed(tag));
        }
        content.extend(body);
        Block::Diagram(Diagram { lines: content })
    } else {
        Block::CodeBlock(CodeBlock {
            lang: Cow::Borrowed(tag),
            lines: body.collect(),
        })
    };

    (block, next)
}

fn consume_unordered<'a>(
    lines: &Lines<'a>,
    at: usize,
    options: &RenderOptions,
) -> (Block<'a>, usize) {
    let end = lines.run_end(at, |line| line.starts_with("- "));
    let items = lines.as_slice()[at..end]
        .iter()
        .map(|line| Cow::Owned(inline::process(&line.trimmed()[2..], options)))
        .collect();

    let list = List {
        kind: ListKind::Unordered,
        items,
    };
    (Block::List(list), end)
}

fn consume_ordered<'a>(
    lines: &Lines<'a>,
    at: usize,
    options: &RenderOptions,
) -> (Block<'a>, usize) {
    let end = lines.run_end(at, |line| ordered_marker().is_match(line.trimmed()));
    let items = lines.as_slice()[at..end]
        .iter()
        .map(|line| {
            let trimmed = line.trimmed();
            let text = ordered_prefix()
                .find(trimmed)
                .map_or(trimmed, |m| &trimmed[m.end()..]);
            Cow::Owned(inline::process(text, options))
        })
        .collect();

    let list = List {
        kind: ListKind::Ordered,
        items,
    };
    (Block::List(list), end)
}

fn consume_table<'a>(
    lines: &Lines<'a>,
    at: usize,
    _options: &RenderOptions,
) -> (Block<'a>, usize) {
    let end = lines.run_end(at, |line| line.starts_with("|"));
    (table::consume(&lines.as_slice()[at..end]), end)
}

fn consume_paragraph<'a>(
    lines: &Lines<'a>,
    at: usize,
    options: &RenderOptions,
) -> (Block<'a>, usize) {
    let html = inline::process(line_at(lines, at).trimmed(), options);
    let paragraph = Paragraph {
        html: Cow::Owned(html),
    };
    (Block::Paragraph(paragraph), at + 1)
}

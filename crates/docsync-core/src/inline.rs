//! Inline span processor.
//!
//! Turns one line of raw text into an HTML-safe fragment. The line is
//! escaped first, then each span kind is recognized in a fixed precedence
//! order over the escaped text:
//!
//! 1. `**strong**`
//! 2. `*emphasis*`
//! 3. `` `code` ``
//! 4. `[text](href)`
//! 5. bare `http(s)://` URLs
//! 6. `![alt](src)`
//!
//! Each kind runs exactly once over the line; output of one kind is never
//! rescanned for the same kind, so `**a*b**` keeps its literal asterisk.

use std::borrow::Cow;
use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::{Captures, Regex};

use crate::options::RenderOptions;

/// Inline span kinds, besides plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// `<strong>`
    Strong,
    /// `<em>`
    Emphasis,
    /// `<code>`
    Code,
    /// `<a href>` from bracket-paren syntax.
    Link,
    /// `<a href>` around a bare URL.
    AutoLink,
    /// `<img src alt>`
    Image,
}

/// The order in which span kinds are applied. Reordering changes output.
pub const PRECEDENCE: [SpanKind; 6] = [
    SpanKind::Strong,
    SpanKind::Emphasis,
    SpanKind::Code,
    SpanKind::Link,
    SpanKind::AutoLink,
    SpanKind::Image,
];

/// Process one line of raw text into an HTML-safe fragment.
pub fn process(text: &str, options: &RenderOptions) -> String {
    let target = target_attr(options);
    let mut html = encode_text(text).into_owned();

    for kind in PRECEDENCE {
        let next = match kind.apply(&html, &target) {
            Cow::Owned(next) => next,
            Cow::Borrowed(_) => continue,
        };
        html = next;
    }

    html
}

/// Escape raw text without recognizing any spans.
#[inline]
pub fn escape(text: &str) -> Cow<'_, str> {
    encode_text(text)
}

/// Render the ` target="..."` attribute, or nothing.
fn target_attr(options: &RenderOptions) -> String {
    match options.link_target.as_deref() {
        Some(target) => format!(" target=\"{}\"", encode_double_quoted_attribute(target)),
        None => String::new(),
    }
}

impl SpanKind {
    fn pattern(self) -> &'static Regex {
        static STRONG: OnceLock<Regex> = OnceLock::new();
        static EMPHASIS: OnceLock<Regex> = OnceLock::new();
        static CODE: OnceLock<Regex> = OnceLock::new();
        static LINK: OnceLock<Regex> = OnceLock::new();
        static AUTOLINK: OnceLock<Regex> = OnceLock::new();
        static IMAGE: OnceLock<Regex> = OnceLock::new();

        match self {
            SpanKind::Strong => compiled(&STRONG, r"\*\*([^*]+)\*\*"),
            SpanKind::Emphasis => compiled(&EMPHASIS, r"\*([^*]+)\*"),
            SpanKind::Code => compiled(&CODE, r"`([^`]+)`"),
            // The optional `!` is captured so image syntax is left for the
            // image pass instead of being claimed as a link.
            SpanKind::Link => compiled(&LINK, r"(!?)\[([^\]]+)\]\(([^)]+)\)"),
            SpanKind::AutoLink => compiled(&AUTOLINK, r#"https?://[^\s<">]+"#),
            SpanKind::Image => compiled(&IMAGE, r"!\[([^\]]*)\]\(([^)]+)\)"),
        }
    }

    /// Apply this span kind to already-escaped text.
    fn apply<'t>(self, html: &'t str, target: &str) -> Cow<'t, str> {
        let re = self.pattern();
        match self {
            SpanKind::Strong => re.replace_all(html, "<strong>${1}</strong>"),
            SpanKind::Emphasis => re.replace_all(html, "<em>${1}</em>"),
            SpanKind::Code => re.replace_all(html, "<code>${1}</code>"),
            SpanKind::Link => re.replace_all(html, |caps: &Captures| {
                if &caps[1] == "!" {
                    caps[0].to_string()
                } else {
                    format!(
                        "<a href=\"{}\"{}>{}</a>",
                        quote_attr(&caps[3]),
                        target,
                        &caps[2]
                    )
                }
            }),
            SpanKind::AutoLink => autolink(re, html, target),
            SpanKind::Image => re.replace_all(html, |caps: &Captures| {
                format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    quote_attr(&caps[2]),
                    quote_attr(&caps[1])
                )
            }),
        }
    }
}

/// Make already-escaped text safe inside a double-quoted attribute.
///
/// `& < >` were handled by the text escape, so only `"` is left.
fn quote_attr(escaped: &str) -> Cow<'_, str> {
    if escaped.contains('"') {
        Cow::Owned(escaped.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(escaped)
    }
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid inline pattern"))
}

/// Wrap bare URLs, skipping those directly after `(` or `"` (link targets
/// and attribute values produced by earlier passes).
fn autolink<'t>(re: &Regex, html: &'t str, target: &str) -> Cow<'t, str> {
    let mut out = String::new();
    let mut last = 0;
    let mut replaced = false;

    for m in re.find_iter(html) {
        if matches!(html.as_bytes()[..m.start()].last().copied(), Some(b'(' | b'"')) {
            continue;
        }
        out.push_str(&html[last..m.start()]);
        out.push_str(&format!(
            "<a href=\"{url}\"{target}>{url}</a>",
            url = m.as_str()
        ));
        last = m.end();
        replaced = true;
    }

    if !replaced {
        return Cow::Borrowed(html);
    }
    out.push_str(&html[last..]);
    Cow::Owned(out)
}

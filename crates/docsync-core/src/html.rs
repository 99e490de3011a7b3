//! HTML fragment output.
//!
//! Each block renders independently; blocks are joined by a newline in
//! document order. No document wrapper is emitted.

use crate::ast::{Block, Document, ListKind};
use crate::inline::escape;
use crate::options::RenderOptions;
use crate::table;

/// Render a document to an HTML fragment.
pub fn render(doc: &Document<'_>, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(doc.blocks.len() * 64);

    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_block(block, options, &mut out);
    }

    out
}

/// Render a single block, appending to `out`.
pub fn render_block(block: &Block<'_>, options: &RenderOptions, out: &mut String) {
    match block {
        Block::Heading(h) => {
            out.push_str(&format!("<h{0}>{1}</h{0}>", h.level, h.html));
        }
        Block::Paragraph(p) => {
            out.push_str("<p>");
            out.push_str(&p.html);
            out.push_str("</p>");
        }
        Block::List(list) => {
            let tag = match list.kind {
                ListKind::Ordered => "ol",
                ListKind::Unordered => "ul",
            };
            out.push_str(&format!("<{tag}>"));
            for item in &list.items {
                out.push_str("<li>");
                out.push_str(item);
                out.push_str("</li>");
            }
            out.push_str(&format!("</{tag}>"));
        }
        Block::Table(t) => table::render(t, options, out),
        Block::CodeBlock(code) => {
            out.push_str(&format!(
                "<pre><code class=\"language-{}\">",
                html_escape::encode_double_quoted_attribute(&code.lang)
            ));
            for (i, line) in code.lines.iter().enumerate() {
                if i > 0 {
                    out.push_str("<br>");
                }
                out.push_str(&escape(line));
            }
            out.push_str("</code></pre>");
        }
        Block::Diagram(diagram) => {
            let source = diagram.lines.join("\n");
            out.push_str("<div class=\"mermaid\">");
            out.push_str(&escape(source.trim()));
            out.push_str("</div>");
        }
        Block::Quote(quote) => {
            out.push_str("<blockquote>");
            out.push_str(&quote.lines.join("<br>"));
            out.push_str("</blockquote>");
        }
        Block::Divider => out.push_str("<hr>"),
        Block::Blank => out.push_str("<br>"),
    }
}

//! Integration tests for markup and rich-text rendering

use docsync_core::{
    convert, render_markup, render_rich, ConvertErrorKind, DocumentKind, RenderOptions,
    RichDocument, RichParagraph, Run,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn bare(input: &str) -> String {
    render_markup(input, &RenderOptions::bare())
}

// ============================================================================
// Escaping Tests
// ============================================================================

#[test]
fn test_text_is_escaped() {
    assert_eq!(bare("a <b> & c"), "<p>a &lt;b&gt; &amp; c</p>");
}

#[test]
fn test_raw_html_never_passes_through() {
    let html = bare("# <script>alert(1)</script>\n> <img src=x>\n- <b>x</b>");
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img src=x>"));
    assert!(!html.contains("<b>"));
}

#[rstest]
#[case::paragraph("a <x> & y")]
#[case::heading("## a <x> & y")]
#[case::quote("> a <x> & y")]
#[case::unordered_list("- a <x> & y")]
#[case::ordered_list("1. a <x> & y")]
#[case::table_header("| a <x> & y | b |\n|---|---|\n| c | d |")]
#[case::table_cell("| h | i |\n|---|---|\n| a <x> & y | d |")]
#[case::code_block("```\na <x> & y\n```")]
#[case::diagram("```mermaid\na <x> & y\n```")]
#[case::diagram_tag("```flowchart\na <x> & y\n```")]
fn test_every_block_kind_escapes_text(#[case] input: &str) {
    let html = bare(input);
    assert!(html.contains("a &lt;x&gt; &amp; y"), "{html}");
    assert!(!html.contains("<x>"), "{html}");
    assert!(!html.contains(" & "), "{html}");
}

#[test]
fn test_code_block_content_is_escaped() {
    let html = bare("```html\n<div>&nbsp;</div>\n```");
    assert_eq!(
        html,
        "<pre><code class=\"language-html\">&lt;div&gt;&amp;nbsp;&lt;/div&gt;</code></pre>"
    );
}

// ============================================================================
// Heading Tests
// ============================================================================

#[rstest]
#[case("# Title", "<h1>Title</h1>")]
#[case("## Title", "<h2>Title</h2>")]
#[case("### Title", "<h3>Title</h3>")]
#[case("#### Title", "<p>#### Title</p>")]
#[case("#Title", "<p>#Title</p>")]
#[case("   ## Indented", "<h2>Indented</h2>")]
fn test_heading_levels(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(bare(input), expected);
}

#[test]
fn test_heading_inline_spans() {
    assert_eq!(bare("## The *quick* fox"), "<h2>The <em>quick</em> fox</h2>");
}

// ============================================================================
// Paragraph and Blank Line Tests
// ============================================================================

#[test]
fn test_each_line_is_its_own_paragraph() {
    assert_eq!(bare("one\ntwo"), "<p>one</p>\n<p>two</p>");
}

#[test]
fn test_blank_line_is_a_break() {
    assert_eq!(bare("a\n\nb"), "<p>a</p>\n<br>\n<p>b</p>");
}

#[test]
fn test_trailing_newline_adds_nothing() {
    assert_eq!(bare("para\n"), "<p>para</p>");
}

#[test]
fn test_empty_input() {
    assert_eq!(bare(""), "");
}

#[test]
fn test_crlf_input() {
    assert_eq!(bare("# T\r\nbody\r\n"), "<h1>T</h1>\n<p>body</p>");
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_ordered_list_single_container() {
    assert_eq!(
        bare("1. one\n2. two\n3. three"),
        "<ol><li>one</li><li>two</li><li>three</li></ol>"
    );
}

#[test]
fn test_unordered_list_ends_at_other_line() {
    assert_eq!(
        bare("- a\n- b\ntext"),
        "<ul><li>a</li><li>b</li></ul>\n<p>text</p>"
    );
}

#[test]
fn test_adjacent_lists_of_different_kinds() {
    assert_eq!(
        bare("- a\n1. b"),
        "<ul><li>a</li></ul>\n<ol><li>b</li></ol>"
    );
}

#[test]
fn test_indented_list_items() {
    assert_eq!(bare("  - a\n    - b"), "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn test_list_items_get_inline_spans() {
    assert_eq!(bare("- `x` and **y**"), "<ul><li><code>x</code> and <strong>y</strong></li></ul>");
}

// ============================================================================
// Quote and Divider Tests
// ============================================================================

#[test]
fn test_blockquote_joins_lines() {
    assert_eq!(bare("> a\n> *b*"), "<blockquote>a<br><em>b</em></blockquote>");
}

#[test]
fn test_divider() {
    assert_eq!(bare("a\n---\nb"), "<p>a</p>\n<hr>\n<p>b</p>");
}

// ============================================================================
// Fenced Block Tests
// ============================================================================

#[test]
fn test_code_fence_with_language() {
    assert_eq!(
        bare("```foo\nlet a = 1;\nlet b = 2;\n```"),
        "<pre><code class=\"language-foo\">let a = 1;<br>let b = 2;</code></pre>"
    );
}

#[test]
fn test_code_fence_keeps_indentation_and_markup() {
    assert_eq!(
        bare("```\n  # not a heading\n```"),
        "<pre><code class=\"language-\">  # not a heading</code></pre>"
    );
}

#[test]
fn test_unterminated_fence_runs_to_end() {
    assert_eq!(
        bare("```rust\nfn main() {}\n- still code"),
        "<pre><code class=\"language-rust\">fn main() {}<br>- still code</code></pre>"
    );
}

#[test]
fn test_diagram_tag_is_kept_as_first_line() {
    let html = bare("```flowchart TD\nA --> B\n```");
    assert!(html.starts_with("<div class=\"mermaid\">flowchart TD"));
    assert_eq!(html, "<div class=\"mermaid\">flowchart TD\nA --&gt; B</div>");
}

#[test]
fn test_mermaid_fence_body_only() {
    assert_eq!(
        bare("```mermaid\ngraph LR\n```\nafter"),
        "<div class=\"mermaid\">graph LR</div>\n<p>after</p>"
    );
}

#[rstest]
#[case("mermaid", true)]
#[case("gantt", true)]
#[case("flowchart LR", true)]
#[case("graph TD", true)]
#[case("rust", false)]
#[case("", false)]
fn test_diagram_tags(#[case] tag: &str, #[case] expected: bool) {
    assert_eq!(docsync_core::parser::is_diagram_tag(tag), expected);
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_with_separator() {
    assert_eq!(
        bare("| A | B |\n|---|---|\n| 1 | 2 |"),
        "<table>\n<thead><tr>\n<th>A</th>\n<th>B</th>\n</tr></thead>\n\
         <tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>"
    );
}

#[test]
fn test_three_line_table_has_one_body_row() {
    let html = bare("| A | B |\n| - | - |\n| 1 | 2 |");
    assert_eq!(html.matches("<thead>").count(), 1);
    assert_eq!(html.matches("<tr>").count(), 2);
    assert_eq!(html.matches("<td>").count(), 2);
}

#[test]
fn test_single_pipe_line_is_not_a_table() {
    let html = bare("| just one |");
    assert!(!html.contains("<table"));
    assert_eq!(html, "<p>| just one |</p>");
}

#[test]
fn test_table_without_separator_keeps_second_row() {
    let html = bare("| h |\n| row |");
    assert_eq!(html.matches("<td>").count(), 1);
    assert!(html.contains("<td>row</td>"));
}

#[test]
fn test_numeric_second_row_counts_as_separator() {
    let html = bare("| n |\n| 1 |\n| 2 |");
    assert!(!html.contains("<td>1</td>"));
    assert!(html.contains("<td>2</td>"));
}

#[test]
fn test_header_only_table_has_no_body() {
    let html = bare("| **x** |\n|---|");
    assert!(!html.contains("<tbody>"));
    assert!(html.contains("<th>**x**</th>"));
}

#[test]
fn test_table_alignment_from_header_colons() {
    let html = bare("| :a: | b: | :c | d |\n|---|---|---|---|\n| 1 | 2 | 3 | 4 | 5 |");
    assert!(html.contains("<th style=\"text-align:center\">:a:</th>"));
    assert!(html.contains("<th style=\"text-align:left\">b:</th>"));
    assert!(html.contains("<th style=\"text-align:right\">:c</th>"));
    assert!(html.contains("<th>d</th>"));
    assert!(html.contains("<td style=\"text-align:center\">1</td>"));
    // Cells beyond the header get no alignment.
    assert!(html.contains("<td>5</td>"));
}

#[test]
fn test_table_cells_are_escaped() {
    let html = bare("| <a> |\n|---|\n| x & y |");
    assert!(html.contains("<th>&lt;a&gt;</th>"));
    assert!(html.contains("<td>x &amp; y</td>"));
}

// ============================================================================
// Inline Span Tests
// ============================================================================

#[rstest]
#[case("**b**", "<p><strong>b</strong></p>")]
#[case("*i*", "<p><em>i</em></p>")]
#[case("`c`", "<p><code>c</code></p>")]
#[case("[t](u.html)", "<p><a href=\"u.html\">t</a></p>")]
#[case("![alt](p.png)", "<p><img src=\"p.png\" alt=\"alt\"></p>")]
#[case(
    "go to https://example.com/x today",
    "<p>go to <a href=\"https://example.com/x\">https://example.com/x</a> today</p>"
)]
fn test_inline_spans(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(bare(input), expected);
}

#[test]
fn test_unmatched_markers_stay_literal() {
    assert_eq!(bare("2 * 3 and `open"), "<p>2 * 3 and `open</p>");
}

// ============================================================================
// Render Options Tests
// ============================================================================

#[test]
fn test_default_options_add_target_and_class() {
    let options = RenderOptions::default();
    let link = render_markup("[t](u)", &options);
    assert_eq!(link, "<p><a href=\"u\" target=\"_blank\">t</a></p>");

    let table = render_markup("| a |\n|---|", &options);
    assert!(table.starts_with("<table class=\"md-table\">"));
}

#[test]
fn test_custom_options() {
    let options = RenderOptions::bare()
        .with_link_target("_self")
        .with_table_class("grid");
    let html = render_markup("https://x.io\n| a |\n|---|", &options);
    assert!(html.contains("<a href=\"https://x.io\" target=\"_self\">"));
    assert!(html.contains("<table class=\"grid\">"));
}

// ============================================================================
// Rich-Text Tests
// ============================================================================

fn sized(text: &str, points: f32) -> RichParagraph {
    RichParagraph::new(vec![Run::sized(text, points)])
}

#[test]
fn test_font_size_heading_inference() {
    let doc = RichDocument::new(vec![
        sized("one", 10.0),
        sized("two", 10.0),
        sized("three", 10.0),
        sized("Title", 20.0),
    ]);
    assert_eq!(
        render_rich(&doc, &RenderOptions::bare()),
        "<p>one</p>\n<p>two</p>\n<p>three</p>\n<h1>Title</h1>"
    );
}

#[test]
fn test_uniform_sizes_are_body_text() {
    let doc = RichDocument::new(vec![sized("a", 14.0), sized("b", 14.0)]);
    let html = render_rich(&doc, &RenderOptions::bare());
    assert!(!html.contains("<h"));
}

#[test]
fn test_rich_text_is_escaped_not_span_processed() {
    let doc = RichDocument::new(vec![RichParagraph::new(vec![Run::plain("**a** <b>")])]);
    assert_eq!(
        render_rich(&doc, &RenderOptions::bare()),
        "<p>**a** &lt;b&gt;</p>"
    );
}

#[test]
fn test_rich_text_dash_items_and_blanks() {
    let doc = RichDocument::new(vec![
        RichParagraph::new(vec![Run::plain("- first")]),
        RichParagraph::new(vec![Run::plain("- second")]),
        RichParagraph::default(),
        RichParagraph::new(vec![Run::plain("end")]),
    ]);
    assert_eq!(
        render_rich(&doc, &RenderOptions::bare()),
        "<ul><li>first</li><li>second</li></ul>\n<br>\n<p>end</p>"
    );
}

// ============================================================================
// Conversion Entry Point Tests
// ============================================================================

#[rstest]
#[case("md", Some(DocumentKind::Markup))]
#[case("MD", Some(DocumentKind::Markup))]
#[case("markdown", Some(DocumentKind::Markup))]
#[case("txt", Some(DocumentKind::PlainText))]
#[case("docx", Some(DocumentKind::RichText))]
#[case("pdf", None)]
fn test_kind_from_extension(#[case] ext: &str, #[case] expected: Option<DocumentKind>) {
    assert_eq!(DocumentKind::from_extension(ext), expected);
}

#[test]
fn test_kind_from_path() {
    let path = std::path::Path::new("notes/guide.md");
    assert_eq!(DocumentKind::from_path(path), Some(DocumentKind::Markup));
    assert_eq!(DocumentKind::from_path(std::path::Path::new("Makefile")), None);
}

#[test]
fn test_plain_text_uses_markup_rules() {
    let options = RenderOptions::bare();
    let html = convert(DocumentKind::PlainText, b"# T\n- a", &options).unwrap();
    assert_eq!(html, "<h1>T</h1>\n<ul><li>a</li></ul>");
}

#[test]
fn test_invalid_utf8_is_an_error() {
    let err = convert(DocumentKind::Markup, &[0xff, 0xfe, 0x00], &RenderOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ConvertErrorKind::InvalidUtf8);
}

#[cfg(feature = "docx")]
#[test]
fn test_garbage_rich_text_is_malformed() {
    let err = convert(DocumentKind::RichText, b"PK nope", &RenderOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ConvertErrorKind::Malformed);
}

#[cfg(not(feature = "docx"))]
#[test]
fn test_rich_text_without_decoder() {
    let err = convert(DocumentKind::RichText, b"", &RenderOptions::default()).unwrap_err();
    assert!(err.is_capability_unavailable());
}

#[test]
fn test_conversion_is_deterministic() {
    let input = "# A\n| x | y |\n|:-|-:|\n| 1 | 2 |\n```mermaid\ngraph TD\n```\n- [l](https://a.b)";
    let options = RenderOptions::default();
    let first = render_markup(input, &options);
    let second = render_markup(input, &options);
    assert_eq!(first, second);
}

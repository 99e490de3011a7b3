//! Benchmarks comparing docsync rendering vs pulldown-cmark (Markdown)
//!
//! Run with: cargo bench -p docsync-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docsync_core::{render_markup, render_rich, RenderOptions, RichDocument, RichParagraph, Run};
use pulldown_cmark::{html::push_html, Options, Parser as MdParser};

const SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, and `inline code`.
See https://example.com or [the guide](guide.html) for details.

## Lists

- First item with some content
- Second item with more content
- Third item concluding the list

1. Step one of the process
2. Step two continues
3. Step three completes

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

```mermaid
graph TD
    A --> B
```

## Table

| Name    | Speed   | Memory |
| :------ | ------: | :----: |
| Fast    | 100ms   | 10MB   |
| Medium  | 500ms   | 50MB   |
| Slow    | 1000ms  | 100MB  |

## Quote

> The best code is no code at all.
> Every line of code you write is a liability.

---

End of document.
"#;

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = RenderOptions::default();

    group.throughput(Throughput::Bytes(SAMPLE.len() as u64));

    group.bench_function("docsync", |b| {
        b.iter(|| black_box(render_markup(black_box(SAMPLE), &options).len()))
    });

    group.bench_function("markdown_pulldown", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(SAMPLE), Options::all());
            let mut out = String::new();
            push_html(&mut out, parser);
            black_box(out.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let options = RenderOptions::default();

    for size in [1, 5, 10, 20].iter() {
        let content: String = SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("docsync", size), &content, |b, content| {
            b.iter(|| black_box(render_markup(black_box(content), &options).len()))
        });

        group.bench_with_input(BenchmarkId::new("markdown", size), &content, |b, content| {
            b.iter(|| {
                let parser = MdParser::new_ext(black_box(content), Options::all());
                let mut out = String::new();
                push_html(&mut out, parser);
                black_box(out.len())
            })
        });
    }

    group.finish();
}

fn bench_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");
    let options = RenderOptions::default();
    let line = "This has *emphasis*, **strong**, `code`, [link](https://example.com), and https://bare.example.org.";

    group.bench_function("docsync_inline", |b| {
        b.iter(|| black_box(docsync_core::inline::process(black_box(line), &options).len()))
    });

    group.finish();
}

fn bench_rich_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("rich_text");
    let options = RenderOptions::default();

    let paragraphs = (0..500)
        .map(|i| match i % 25 {
            0 => RichParagraph::new(vec![Run::sized(format!("Section {i}"), 20.0)]),
            5 => RichParagraph::new(vec![Run::plain("- bullet point")]),
            _ => RichParagraph::new(vec![Run::sized("Body text & more body text.", 11.0)]),
        })
        .collect();
    let doc = RichDocument::new(paragraphs);

    group.bench_function("render_rich", |b| {
        b.iter(|| black_box(render_rich(black_box(&doc), &options).len()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_scaling,
    bench_inline,
    bench_rich_text
);
criterion_main!(benches);

//! docsync CLI - Convert documents and publish them as static HTML fragments
//!
//! Usage:
//!   docsync [OPTIONS] <COMMAND>
//!
//! Commands:
//!   convert   Convert one document to an HTML fragment
//!   blocks    Show the block structure of a markup document
//!   stats     Show document statistics
//!   sync      Publish the source tree into the reader site

mod config;
mod exclude;
mod index;
mod sync;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser as ClapParser, Subcommand};
use docsync_core::ast::{Alignment, ListKind};
use docsync_core::{convert, Block, Document, DocumentKind, Parser, RenderOptions};
use serde::Serialize;

use config::SiteConfig;
use exclude::ExcludeRules;
use sync::SyncPaths;

/// docsync - publish markup and rich-text documents as HTML fragments
#[derive(ClapParser)]
#[command(name = "docsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one document (kind from extension) to an HTML fragment
    Convert {
        file: PathBuf,

        /// Write the fragment here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Show the parsed block structure of a markup document
    Blocks {
        file: PathBuf,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show document statistics
    Stats { file: PathBuf },

    /// Publish the source tree into the reader site
    Sync {
        /// Site root containing the source directory and `reader/`
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Site configuration (default: <root>/reader/config.json)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Reconvert files even if the output is up to date
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Convert { file, output } => cmd_convert(&file, output.as_deref()),
        Command::Blocks { file, json } => cmd_blocks(&file, json),
        Command::Stats { file } => cmd_stats(&file),
        Command::Sync {
            root,
            config,
            force,
        } => cmd_sync(&root, config.as_deref(), force),
    }
}

// =============================================================================
// Convert Command
// =============================================================================

fn cmd_convert(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let Some(kind) = DocumentKind::from_path(file) else {
        bail!("unsupported document type: {}", file.display());
    };

    let bytes = fs::read(file).with_context(|| format!("failed to read '{}'", file.display()))?;
    let html = convert(kind, &bytes, &RenderOptions::default())
        .with_context(|| format!("failed to convert '{}'", file.display()))?;

    match output {
        Some(out) => fs::write(out, html)
            .with_context(|| format!("failed to write '{}'", out.display()))?,
        None => println!("{}", html),
    }
    Ok(())
}

// =============================================================================
// Blocks Command
// =============================================================================

fn read_markup(file: &Path) -> anyhow::Result<String> {
    match DocumentKind::from_path(file) {
        Some(DocumentKind::Markup | DocumentKind::PlainText) => {}
        _ => bail!("not a markup document: {}", file.display()),
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file.display()))
}

fn cmd_blocks(file: &Path, json: bool) -> anyhow::Result<()> {
    let input = read_markup(file)?;
    let options = RenderOptions::default();
    let doc = Parser::new(&options).parse(&input);

    if json {
        let blocks: Vec<JsonBlock> = doc.blocks.iter().map(convert_block).collect();
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        println!("Blocks: {}", doc.blocks.len());
        for (i, block) in doc.blocks.iter().enumerate() {
            println!("  [{}] {}", i + 1, describe_block(block));
        }
    }
    Ok(())
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {})", h.level),
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::List(l) => format!("List ({:?}, {} items)", l.kind, l.items.len()),
        Block::Table(t) => format!(
            "Table ({} columns, {} rows)",
            t.header.len(),
            t.rows.len()
        ),
        Block::CodeBlock(c) => format!("CodeBlock (lang: {})", c.lang),
        Block::Diagram(d) => format!("Diagram ({} lines)", d.lines.len()),
        Block::Quote(q) => format!("Quote ({} lines)", q.lines.len()),
        Block::Divider => "Divider".to_string(),
        Block::Blank => "Blank".to_string(),
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(file: &Path) -> anyhow::Result<()> {
    let input = read_markup(file)?;
    let options = RenderOptions::default();
    let doc = Parser::new(&options).parse(&input);
    let stats = DocumentStats::from_document(&doc, &input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Lists:          {}", stats.lists);
    println!("  List items:     {}", stats.list_items);
    println!("  Tables:         {}", stats.tables);
    println!("  Code blocks:    {}", stats.code_blocks);
    println!("  Diagrams:       {}", stats.diagrams);
    println!("  Quotes:         {}", stats.quotes);
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    lists: usize,
    list_items: usize,
    tables: usize,
    code_blocks: usize,
    diagrams: usize,
    quotes: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        for block in &doc.blocks {
            if !matches!(block, Block::Blank) {
                stats.total_blocks += 1;
            }
            match block {
                Block::Heading(_) => stats.headings += 1,
                Block::Paragraph(_) => stats.paragraphs += 1,
                Block::List(l) => {
                    stats.lists += 1;
                    stats.list_items += l.items.len();
                }
                Block::Table(_) => stats.tables += 1,
                Block::CodeBlock(_) => stats.code_blocks += 1,
                Block::Diagram(_) => stats.diagrams += 1,
                Block::Quote(_) => stats.quotes += 1,
                Block::Divider | Block::Blank => {}
            }
        }
        stats
    }
}

// =============================================================================
// Sync Command
// =============================================================================

fn cmd_sync(root: &Path, config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| SiteConfig::default_path(root));
    let config = SiteConfig::load_or_default(&config_path);
    let rules = ExcludeRules::from_config(&config)?;
    let paths = SyncPaths::new(root, &config);

    let report = sync::run(&paths, &config.render, &rules, force)?;

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.path, failure.error);
        }
        bail!("{} document(s) failed to convert", report.failed());
    }
    Ok(())
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        html: &'a str,
    },
    Paragraph {
        html: &'a str,
    },
    List {
        kind: &'a str,
        items: Vec<&'a str>,
    },
    Table {
        header: Vec<&'a str>,
        alignments: Vec<&'a str>,
        rows: Vec<Vec<&'a str>>,
    },
    CodeBlock {
        lang: &'a str,
        lines: Vec<&'a str>,
    },
    Diagram {
        lines: Vec<&'a str>,
    },
    Quote {
        lines: Vec<&'a str>,
    },
    Divider,
    Blank,
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            html: &h.html,
        },
        Block::Paragraph(p) => JsonBlock::Paragraph { html: &p.html },
        Block::List(l) => JsonBlock::List {
            kind: match l.kind {
                ListKind::Ordered => "ordered",
                ListKind::Unordered => "unordered",
            },
            items: l.items.iter().map(|item| &**item).collect(),
        },
        Block::Table(t) => JsonBlock::Table {
            header: t.header.iter().map(|cell| &**cell).collect(),
            alignments: t.alignments.iter().map(|a| alignment_name(*a)).collect(),
            rows: t
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| &**cell).collect())
                .collect(),
        },
        Block::CodeBlock(c) => JsonBlock::CodeBlock {
            lang: &c.lang,
            lines: c.lines.iter().map(|line| &**line).collect(),
        },
        Block::Diagram(d) => JsonBlock::Diagram {
            lines: d.lines.iter().map(|line| &**line).collect(),
        },
        Block::Quote(q) => JsonBlock::Quote {
            lines: q.lines.iter().map(|line| &**line).collect(),
        },
        Block::Divider => JsonBlock::Divider,
        Block::Blank => JsonBlock::Blank,
    }
}

fn alignment_name(alignment: Alignment) -> &'static str {
    alignment.css().unwrap_or("none")
}

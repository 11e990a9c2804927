//! Lofi CLI - Parse Lofi documents and inspect the result
//!
//! Usage:
//!   lofi [OPTIONS] <COMMAND>
//!
//! Commands:
//!   parse     Print the parsed tree as an outline or JSON
//!   stats     Show document statistics

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lofi_core::{
    parse_element, parse_section, parse_sections, Content, DocumentStats, Element, KeyPath,
    TagValue,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lofi")]
#[command(version, about = "Lofi microformat parser", long_about = None)]
struct Cli {
    /// Log parser activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print the tree
    Parse {
        /// Input file ('-' reads stdin)
        file: PathBuf,

        /// Output JSON instead of an outline
        #[arg(short, long)]
        json: bool,

        /// How much structure to read from the input
        #[arg(short, long, value_enum, default_value_t = Mode::Document)]
        mode: Mode,
    },
    /// Show document statistics
    Stats {
        /// Input file ('-' reads stdin)
        file: PathBuf,

        /// Output JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Blank lines separate sections
    Document,
    /// The whole input is one section
    Section,
    /// Every non-blank line is a separate element, no nesting
    Element,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "lofi=debug" } else { "lofi=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Parse { file, json, mode } => {
            let input = read_input(&file)?;
            cmd_parse(&input, mode, json)
        }
        Commands::Stats { file, json } => {
            let input = read_input(&file)?;
            cmd_stats(&input, json)
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }

    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    debug!(path = %path.display(), bytes = input.len(), "read input");
    Ok(input)
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(input: &str, mode: Mode, json: bool) -> Result<()> {
    match mode {
        Mode::Document => {
            let document = parse_sections(input);
            if json {
                let view: Vec<Vec<JsonElement>> = document
                    .iter()
                    .map(|section| section.iter().map(JsonElement::from).collect())
                    .collect();
                print_json(&view)?;
            } else {
                for (i, section) in document.iter().enumerate() {
                    println!("Section {}:", i + 1);
                    print_elements(section, 1);
                }
            }
        }
        Mode::Section => {
            let section = parse_section(input);
            if json {
                let view: Vec<JsonElement> = section.iter().map(JsonElement::from).collect();
                print_json(&view)?;
            } else {
                print_elements(&section, 0);
            }
        }
        Mode::Element => {
            let elements: Vec<Element> = input
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(parse_element)
                .collect();
            if json {
                let view: Vec<JsonElement> = elements.iter().map(JsonElement::from).collect();
                print_json(&view)?;
            } else {
                print_elements(&elements, 0);
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize tree")?;
    println!("{}", out);
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(input: &str, json: bool) -> Result<()> {
    let document = parse_sections(input);
    let stats = DocumentStats::from_document(&document);

    if json {
        let view = serde_json::json!({
            "sections": stats.sections,
            "elements": stats.elements,
            "children": stats.children,
            "introductions": stats.introductions,
            "mentions": stats.mentions,
            "flag_tags": stats.flag_tags,
            "content_tags": stats.content_tags,
            "bytes": input.len(),
            "lines": input.lines().count(),
        });
        return print_json(&view);
    }

    println!("Document Statistics");
    println!("-------------------");
    println!("Sections:       {}", stats.sections);
    println!("Elements:       {}", stats.elements);
    println!("Children:       {}", stats.children);
    println!("Introductions:  {}", stats.introductions);
    println!("Mentions:       {}", stats.mentions);
    println!();
    println!("Tags:");
    println!("  Flags:        {}", stats.flag_tags);
    println!("  With values:  {}", stats.content_tags);
    println!();
    println!("Size:");
    println!("  Bytes:        {}", input.len());
    println!("  Lines:        {}", input.lines().count());

    Ok(())
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonElement<'a> {
    introducing: Option<&'a str>,
    texts: Vec<&'a str>,
    mentions: Vec<Vec<&'a str>>,
    tags_path: Vec<&'a str>,
    tags_hash: BTreeMap<&'a str, JsonTagValue<'a>>,
    children: Vec<JsonElement<'a>>,
}

/// Flags serialize as `true`, values as `{ "texts": .., "mentions": .. }`.
#[derive(Serialize)]
#[serde(untagged)]
enum JsonTagValue<'a> {
    Flag(bool),
    Content {
        texts: Vec<&'a str>,
        mentions: Vec<Vec<&'a str>>,
    },
}

impl<'a> From<&'a Element<'_>> for JsonElement<'a> {
    fn from(element: &'a Element<'_>) -> Self {
        JsonElement {
            introducing: element.introducing.as_deref(),
            texts: element.texts.iter().map(|t| t.as_ref()).collect(),
            mentions: element.mentions.iter().map(|m| convert_path(m)).collect(),
            tags_path: element.tags_path.iter().map(|t| t.as_ref()).collect(),
            tags_hash: element
                .tags_hash
                .iter()
                .map(|(k, v)| (k.as_ref(), JsonTagValue::from(v)))
                .collect(),
            children: element.children.iter().map(JsonElement::from).collect(),
        }
    }
}

impl<'a> From<&'a TagValue<'_>> for JsonTagValue<'a> {
    fn from(value: &'a TagValue<'_>) -> Self {
        match value {
            TagValue::Flag => JsonTagValue::Flag(true),
            TagValue::Content(content) => JsonTagValue::Content {
                texts: content.texts.iter().map(|t| t.as_ref()).collect(),
                mentions: content.mentions.iter().map(|m| convert_path(m)).collect(),
            },
        }
    }
}

fn convert_path<'a>(path: &'a KeyPath<'_>) -> Vec<&'a str> {
    path.iter().map(|s| s.as_ref()).collect()
}

// =============================================================================
// Text Output
// =============================================================================

fn print_elements(elements: &[Element], indent: usize) {
    for element in elements {
        print_element(element, indent, "");
        for child in &element.children {
            print_element(child, indent + 1, "- ");
        }
    }
}

fn print_element(element: &Element, indent: usize, marker: &str) {
    let prefix = "  ".repeat(indent);

    let mut line = String::new();
    if let Some(name) = &element.introducing {
        line.push('@');
        line.push_str(name);
        line.push_str(": ");
    }
    line.push_str(&format_content(&element.texts, &element.mentions));
    println!("{}{}{}", prefix, marker, line);

    if !element.tags_hash.is_empty() {
        let tags: Vec<String> = element
            .tags_hash
            .iter()
            .map(|(key, value)| match value {
                TagValue::Flag => format!("#{}", key),
                TagValue::Content(Content { texts, mentions }) => {
                    format!("#{}: {}", key, format_content(texts, mentions))
                }
            })
            .collect();
        println!("{}{}  [{}]", prefix, " ".repeat(marker.len()), tags.join(" "));
    }
}

/// Interleave texts and mentions back into `text @a.b text` form.
fn format_content(texts: &[lofi_core::CowStr], mentions: &[KeyPath]) -> String {
    let mut result = String::new();
    for (i, text) in texts.iter().enumerate() {
        result.push_str(text);
        if let Some(path) = mentions.get(i) {
            result.push('@');
            result.push_str(&path.join("."));
        }
    }
    result
}

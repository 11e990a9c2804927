//! Element assembly and line folding.
//!
//! Lines become elements, elements fold into sections (one level of `-`
//! nesting), and empty-line-delimited blocks become the sections of a
//! document. Parsing is total: any input produces a tree.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::ast::{Content, Document, Element, Section};
use crate::lexer::{Blocks, Lexer};
use crate::scan::{scan_tags, split_introduction, strip_tags, tokenize};

/// Parse a single line into an [`Element`].
///
/// The line is trimmed, a leading `@name:` binding is split off, then tags
/// and mentions are read from what remains. `children` is always empty.
pub fn parse_element(line: &str) -> Element<'_> {
    let (introducing, remainder) = split_introduction(line.trim());
    let (tags_path, tags_hash) = scan_tags(remainder);
    let Content { texts, mentions } = tokenize(strip_tags(remainder));

    Element {
        introducing: introducing.map(Cow::Borrowed),
        texts,
        mentions,
        tags_path,
        tags_hash,
        children: Vec::new(),
    }
}

/// Parse one block of lines into a [`Section`].
///
/// The block is trimmed, then split into lines; empty lines are skipped.
/// A line of whitespace is not empty and yields an empty element. Lines
/// starting with `-` (after indentation) are list items and become children
/// of the closest preceding top-level line. Items that come before any
/// top-level line hang off an empty host element.
pub fn parse_section(text: &str) -> Section<'_> {
    let mut section = Vec::new();
    let mut current: Option<Element<'_>> = None;

    for line in Lexer::new(text.trim()).filter(|line| !line.is_empty()) {
        match list_item(line.text) {
            Some(item) => {
                let host = current.get_or_insert_with(|| {
                    trace!(line = line.start, "list item before any top-level line");
                    Element::default()
                });
                host.children.push(parse_element(item));
            }
            None => {
                if let Some(done) = current.replace(parse_element(line.text)) {
                    section.push(done);
                }
            }
        }
    }
    section.extend(current);

    debug!(elements = section.len(), "parsed section");
    section
}

/// Parse a whole document: the trimmed input is split at empty lines and
/// every block is folded independently into its own [`Section`]. Blocks of
/// whitespace only carry no lines and are dropped.
pub fn parse_sections(text: &str) -> Document<'_> {
    let document: Document<'_> = Blocks::new(text.trim())
        .filter(|block| !block.trim().is_empty())
        .map(parse_section)
        .collect();
    debug!(
        sections = document.len(),
        bytes = text.len(),
        "parsed document"
    );
    document
}

/// Content of a `- item` line, or `None` for a top-level line.
#[inline]
fn list_item(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('-')
}

//! Single-line scanners: introductions, tags, mentions.
//!
//! Every scanner jumps between sigils with `memchr` and never revisits a
//! byte it has already consumed, so work is linear in the line length no
//! matter how many stray `#` or `@` characters the input contains.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Range;

use memchr::memchr;

use crate::ast::{Content, CowStr, KeyPath, TagValue};

/// Check whether a byte may appear in a key or mention segment.
#[inline(always)]
pub fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Length of the identifier run at the start of `bytes`.
#[inline]
pub fn identifier_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_identifier_byte(b)).count()
}

/// Split a leading `@name:` binding off a trimmed line.
///
/// Returns the bound name and the trimmed remainder, or `(None, line)`
/// untouched when the line does not start with a binding.
pub fn split_introduction(line: &str) -> (Option<&str>, &str) {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b'@') {
        return (None, line);
    }

    let len = identifier_len(&bytes[1..]);
    let colon = 1 + len;
    if len > 0 && bytes.get(colon) == Some(&b':') {
        (Some(&line[1..colon]), line[colon + 1..].trim())
    } else {
        (None, line)
    }
}

/// One `#key` or `#key: value` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Byte range of the whole annotation, value included.
    pub span: Range<usize>,
    pub key: &'a str,
    /// Raw value text after the colon, untrimmed.
    pub value: Option<&'a str>,
}

/// Left-to-right iterator over non-overlapping tag annotations.
pub struct TagMatches<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TagMatches<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }
}

impl<'a> Iterator for TagMatches<'a> {
    type Item = TagMatch<'a>;

    fn next(&mut self) -> Option<TagMatch<'a>> {
        while self.pos < self.bytes.len() {
            let start = self.pos + memchr(b'#', &self.bytes[self.pos..])?;
            let key_start = start + 1;
            let key_len = identifier_len(&self.bytes[key_start..]);
            if key_len == 0 {
                self.pos = key_start;
                continue;
            }

            let key_end = key_start + key_len;
            let key = &self.text[key_start..key_end];

            if self.bytes.get(key_end) != Some(&b':') {
                self.pos = key_end;
                return Some(TagMatch {
                    span: start..key_end,
                    key,
                    value: None,
                });
            }

            let value_start = key_end + 1;
            let value_end = memchr(b'#', &self.bytes[value_start..])
                .map_or(self.bytes.len(), |offset| value_start + offset);
            self.pos = value_end;
            return Some(TagMatch {
                span: start..value_end,
                key,
                value: Some(&self.text[value_start..value_end]),
            });
        }
        None
    }
}

/// Collect the tags of a line.
///
/// Returns the keys of flag tags in source order (one entry per
/// occurrence) and a map of every key to its value. A key that appears
/// more than once keeps the value of its last occurrence.
pub fn scan_tags(text: &str) -> (Vec<CowStr<'_>>, BTreeMap<CowStr<'_>, TagValue<'_>>) {
    let mut tags_path = Vec::new();
    let mut tags_hash = BTreeMap::new();

    for tag in TagMatches::new(text) {
        let value = match tag.value {
            None => {
                tags_path.push(Cow::Borrowed(tag.key));
                TagValue::Flag
            }
            Some(raw) => TagValue::Content(tokenize_str(raw.trim())),
        };
        tags_hash.insert(Cow::Borrowed(tag.key), value);
    }

    (tags_path, tags_hash)
}

/// Remove every tag annotation from `text` and trim the result.
///
/// Borrows from the input when there is nothing to remove.
pub fn strip_tags(text: &str) -> CowStr<'_> {
    let mut matches = TagMatches::new(text).peekable();
    if matches.peek().is_none() {
        return Cow::Borrowed(text.trim());
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for tag in matches {
        out.push_str(&text[last..tag.span.start]);
        last = tag.span.end;
    }
    out.push_str(&text[last..]);

    let trimmed = out.trim();
    if trimmed.len() == out.len() {
        Cow::Owned(out)
    } else {
        Cow::Owned(trimmed.to_string())
    }
}

/// Split text into plain-text segments and mentions.
///
/// Keeps borrowed input borrowed; owned input produces owned segments.
pub fn tokenize(text: CowStr<'_>) -> Content<'_> {
    match text {
        Cow::Borrowed(s) => tokenize_str(s),
        Cow::Owned(s) => tokenize_str(&s).into_owned(),
    }
}

/// Split borrowed text into plain-text segments and mentions.
pub fn tokenize_str(text: &str) -> Content<'_> {
    let bytes = text.as_bytes();
    let mut texts = Vec::new();
    let mut mentions = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'@', &bytes[pos..]) {
        let at = pos + offset;
        let end = mention_end(bytes, at + 1);
        if end == at + 1 {
            pos = at + 1;
            continue;
        }

        texts.push(Cow::Borrowed(&text[text_start..at]));
        mentions.push(key_path(&text[at + 1..end]));
        text_start = end;
        pos = end;
    }

    texts.push(Cow::Borrowed(&text[text_start..]));
    Content { texts, mentions }
}

/// End of a `key(.key)*` run starting at `start`, or `start` if none.
#[inline]
fn mention_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start + identifier_len(&bytes[start..]);
    if end == start {
        return start;
    }

    // A dot only extends the mention when an identifier follows it.
    while bytes.get(end) == Some(&b'.') {
        let segment = identifier_len(&bytes[end + 1..]);
        if segment == 0 {
            break;
        }
        end += 1 + segment;
    }
    end
}

#[inline]
fn key_path(mention: &str) -> KeyPath<'_> {
    mention.split('.').map(Cow::Borrowed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(content: &'a Content<'_>) -> Vec<&'a str> {
        content.texts.iter().map(|t| t.as_ref()).collect()
    }

    #[test]
    fn test_introduction_detected() {
        assert_eq!(split_introduction("@user: hello"), (Some("user"), "hello"));
        assert_eq!(split_introduction("@first-name:"), (Some("first-name"), ""));
        assert_eq!(split_introduction("@a_1:x  "), (Some("a_1"), "x"));
    }

    #[test]
    fn test_introduction_requires_colon_after_name() {
        assert_eq!(split_introduction("@user hello"), (None, "@user hello"));
        assert_eq!(split_introduction("@person.name: x"), (None, "@person.name: x"));
        assert_eq!(split_introduction("@: x"), (None, "@: x"));
        assert_eq!(split_introduction("hi @user: x"), (None, "hi @user: x"));
        assert_eq!(split_introduction(""), (None, ""));
    }

    #[test]
    fn test_tag_matches_spans() {
        let found: Vec<_> = TagMatches::new("a #b #c: d e #f").collect();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].key, "b");
        assert_eq!(found[0].span, 2..4);
        assert_eq!(found[1].key, "c");
        assert_eq!(found[1].value, Some(" d e "));
        assert_eq!(found[2].key, "f");
        assert_eq!(found[2].value, None);
    }

    #[test]
    fn test_bare_hash_is_not_a_tag() {
        assert_eq!(TagMatches::new("# ## #!").count(), 0);
        assert_eq!(strip_tags("issue # 4"), "issue # 4");
    }

    #[test]
    fn test_scan_tags_flags_and_content() {
        let (path, hash) = scan_tags("hello #button #variation: danger");
        assert_eq!(path, vec!["button"]);
        assert_eq!(hash.len(), 2);
        assert_eq!(hash["button"], TagValue::Flag);
        assert_eq!(hash["variation"], TagValue::Content(Content::plain("danger")));
    }

    #[test]
    fn test_tag_value_stops_at_next_hash() {
        let (path, hash) = scan_tags("#variation: danger #button");
        assert_eq!(path, vec!["button"]);
        assert_eq!(hash["variation"], TagValue::Content(Content::plain("danger")));
    }

    #[test]
    fn test_tag_value_is_tokenized_for_mentions() {
        let (_, hash) = scan_tags("#label: Hi @user.name!");
        let content = hash["label"].as_content().unwrap();
        assert_eq!(texts(content), vec!["Hi ", "!"]);
        assert_eq!(content.mentions, vec![vec!["user", "name"]]);
    }

    #[test]
    fn test_empty_tag_value() {
        let (path, hash) = scan_tags("#key:");
        assert!(path.is_empty());
        assert_eq!(hash["key"], TagValue::Content(Content::plain("")));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let (path, hash) = scan_tags("#key #key: value");
        assert_eq!(path, vec!["key"]);
        assert_eq!(hash["key"], TagValue::Content(Content::plain("value")));

        let (path, hash) = scan_tags("#key: value #key #key");
        assert_eq!(path, vec!["key", "key"]);
        assert_eq!(hash["key"], TagValue::Flag);
    }

    #[test]
    fn test_strip_tags_borrows_without_tags() {
        assert!(matches!(strip_tags("  plain  "), Cow::Borrowed("plain")));
        assert_eq!(strip_tags("hello #button"), "hello");
        assert_eq!(strip_tags("#a: x #b"), "");
        assert_eq!(strip_tags("a #b c"), "a  c");
    }

    #[test]
    fn test_tokenize_mentions() {
        let content = tokenize_str("hello @first-name @last-name");
        assert_eq!(texts(&content), vec!["hello ", " ", ""]);
        assert_eq!(content.mentions, vec![vec!["first-name"], vec!["last-name"]]);
    }

    #[test]
    fn test_tokenize_adjacent_and_dotted_mentions() {
        let content = tokenize_str("@a@b.c.d.");
        assert_eq!(texts(&content), vec!["", "", "."]);
        assert_eq!(content.mentions, vec![vec!["a"], vec!["b", "c", "d"]]);
    }

    #[test]
    fn test_tokenize_without_mentions() {
        assert_eq!(tokenize_str(""), Content::plain(""));
        assert_eq!(tokenize_str("a @ b @. c"), Content::plain("a @ b @. c"));
    }

    #[test]
    fn test_tokenize_owned_input() {
        let content = tokenize(Cow::Owned("x @y z".to_string()));
        assert_eq!(texts(&content), vec!["x ", " z"]);
        assert_eq!(content.mentions, vec![vec!["y"]]);
    }
}

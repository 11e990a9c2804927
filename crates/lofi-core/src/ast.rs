//! Tree types produced by the Lofi parser.
//!
//! The tree is deliberately small:
//!
//! - **Element**: one logical line (introduction, texts, mentions, tags, children)
//! - **Section**: the top-level elements of one empty-line-delimited block
//! - **Document**: every section of the input, in source order
//!
//! Strings are `Cow<'a, str>` so segments borrow from the input wherever the
//! input is not rewritten. Only text that had tags spliced out of it is owned.

use std::collections::BTreeMap;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// Dot-separated mention segments: `@person.name` is `["person", "name"]`.
pub type KeyPath<'a> = Vec<CowStr<'a>>;

/// Top-level elements of one block, in source order.
pub type Section<'a> = Vec<Element<'a>>;

/// All sections of the input, in source order.
pub type Document<'a> = Vec<Section<'a>>;

/// Plain text interleaved with mentions.
///
/// `texts` always holds exactly one more segment than `mentions`: text comes
/// first, then mention and text alternate. Segments may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content<'a> {
    /// Plain-text segments surrounding the mentions.
    pub texts: Vec<CowStr<'a>>,
    /// Mention key-paths, in source order.
    pub mentions: Vec<KeyPath<'a>>,
}

impl<'a> Content<'a> {
    /// Content with a single text segment and no mentions.
    pub fn plain(text: impl Into<CowStr<'a>>) -> Self {
        Self {
            texts: vec![text.into()],
            mentions: Vec::new(),
        }
    }

    /// True when there are no mentions.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Detach from the input lifetime.
    pub fn into_owned(self) -> Content<'static> {
        Content {
            texts: owned_strs(self.texts),
            mentions: self.mentions.into_iter().map(owned_strs).collect(),
        }
    }
}

impl Default for Content<'_> {
    fn default() -> Self {
        Self::plain("")
    }
}

/// Value of a `#key` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue<'a> {
    /// `#key` with no value.
    Flag,
    /// `#key: value`, the value tokenized into texts and mentions.
    Content(Content<'a>),
}

impl<'a> TagValue<'a> {
    #[inline]
    pub fn is_flag(&self) -> bool {
        matches!(self, TagValue::Flag)
    }

    #[inline]
    pub fn as_content(&self) -> Option<&Content<'a>> {
        match self {
            TagValue::Flag => None,
            TagValue::Content(content) => Some(content),
        }
    }

    pub fn into_owned(self) -> TagValue<'static> {
        match self {
            TagValue::Flag => TagValue::Flag,
            TagValue::Content(content) => TagValue::Content(content.into_owned()),
        }
    }
}

/// Parsed structure of one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Name bound by a leading `@name:` prefix.
    pub introducing: Option<CowStr<'a>>,
    /// Plain-text segments; always one longer than `mentions`.
    pub texts: Vec<CowStr<'a>>,
    /// Mention key-paths, in source order.
    pub mentions: Vec<KeyPath<'a>>,
    /// Keys of flag tags, one entry per occurrence, in source order.
    pub tags_path: Vec<CowStr<'a>>,
    /// Every tag key mapped to its value.
    pub tags_hash: BTreeMap<CowStr<'a>, TagValue<'a>>,
    /// Nested list items. Children never have children of their own.
    pub children: Vec<Element<'a>>,
}

impl<'a> Element<'a> {
    /// Check whether `#key` appears as a flag.
    pub fn has_flag(&self, key: &str) -> bool {
        matches!(self.tags_hash.get(key), Some(TagValue::Flag))
    }

    /// Look up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&TagValue<'a>> {
        self.tags_hash.get(key)
    }

    /// The line's text and mentions as a [`Content`] value.
    pub fn content(&self) -> Content<'a> {
        Content {
            texts: self.texts.clone(),
            mentions: self.mentions.clone(),
        }
    }

    /// True for an element that carries nothing: no introduction, no text,
    /// no mentions, no tags and no children.
    pub fn is_empty(&self) -> bool {
        self.introducing.is_none()
            && self.mentions.is_empty()
            && self.texts.iter().all(|t| t.is_empty())
            && self.tags_hash.is_empty()
            && self.children.is_empty()
    }

    /// Detach the whole subtree from the input lifetime.
    pub fn into_owned(self) -> Element<'static> {
        Element {
            introducing: self.introducing.map(|s| CowStr::Owned(s.into_owned())),
            texts: owned_strs(self.texts),
            mentions: self.mentions.into_iter().map(owned_strs).collect(),
            tags_path: owned_strs(self.tags_path),
            tags_hash: self
                .tags_hash
                .into_iter()
                .map(|(k, v)| (CowStr::Owned(k.into_owned()), v.into_owned()))
                .collect(),
            children: self.children.into_iter().map(Element::into_owned).collect(),
        }
    }
}

/// Same shape as parsing an empty line: a single empty text segment.
impl Default for Element<'_> {
    fn default() -> Self {
        Self {
            introducing: None,
            texts: vec![CowStr::Borrowed("")],
            mentions: Vec::new(),
            tags_path: Vec::new(),
            tags_hash: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

fn owned_strs(strs: Vec<CowStr<'_>>) -> Vec<CowStr<'static>> {
    strs.into_iter()
        .map(|s| CowStr::Owned(s.into_owned()))
        .collect()
}

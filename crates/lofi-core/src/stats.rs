//! Aggregate counts over a parsed document.

use crate::ast::{Document, Element, TagValue};

/// Element, mention and tag counts for a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub sections: usize,
    /// Top-level elements across all sections.
    pub elements: usize,
    /// Nested list items.
    pub children: usize,
    /// Elements carrying an `@name:` binding.
    pub introductions: usize,
    /// Mentions in element text and inside tag values.
    pub mentions: usize,
    pub flag_tags: usize,
    pub content_tags: usize,
}

impl DocumentStats {
    pub fn from_document(document: &Document<'_>) -> Self {
        let mut stats = Self {
            sections: document.len(),
            ..Self::default()
        };

        for element in document.iter().flatten() {
            stats.elements += 1;
            stats.count_element(element);
            for child in &element.children {
                stats.children += 1;
                stats.count_element(child);
            }
        }
        stats
    }

    fn count_element(&mut self, element: &Element<'_>) {
        if element.introducing.is_some() {
            self.introductions += 1;
        }
        self.mentions += element.mentions.len();
        for value in element.tags_hash.values() {
            match value {
                TagValue::Flag => self.flag_tags += 1,
                TagValue::Content(content) => {
                    self.content_tags += 1;
                    self.mentions += content.mentions.len();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_sections;

    #[test]
    fn test_counts() {
        let input = "@a: hi @b #x\n- @c.d #label: for @e\n- plain\n\n- orphan #x #y";
        let stats = DocumentStats::from_document(&parse_sections(input));
        assert_eq!(
            stats,
            DocumentStats {
                sections: 2,
                elements: 2,
                children: 3,
                introductions: 1,
                mentions: 3,
                flag_tags: 3,
                content_tags: 1,
            }
        );
    }
}

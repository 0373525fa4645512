// SPDX-License-Identifier: AGPL-3.0-or-later
//! Paragraph/text document tree
//!
//! A document is an ordered list of blocks, each holding an ordered list of
//! text runs and an attribute map. Positions address the flattened text
//! projection: every run of every block concatenated in order, no separators,
//! counted in characters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value (boolean flag or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    String(String),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bool(_) => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A run of plain text inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Block-level node (a paragraph)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub runs: Vec<TextRun>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Block {
    /// Paragraph with a single run (or no run for empty text)
    pub fn paragraph(text: &str) -> Self {
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::new(text)]
        };
        Self {
            runs,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.runs.iter().map(TextRun::char_count).sum()
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Whether the block text contains `word` as a substring
    pub fn contains_word(&self, word: &str) -> bool {
        self.text().contains(word)
    }
}

/// The root document node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub blocks: Vec<Block>,
}

impl DocumentTree {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Build a tree of single-run paragraphs
    pub fn from_paragraphs<'a>(paragraphs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            blocks: paragraphs.into_iter().map(Block::paragraph).collect(),
        }
    }

    /// Flattened text projection
    pub fn text(&self) -> String {
        self.blocks.iter().map(Block::text).collect()
    }

    /// Length of the flattened projection in characters
    pub fn text_len(&self) -> usize {
        self.blocks.iter().map(Block::char_count).sum()
    }

    /// `(index, start, end)` of every block in the flattened projection
    pub fn block_spans(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.blocks.iter().enumerate().scan(0usize, |offset, (index, block)| {
            let start = *offset;
            *offset += block.char_count();
            Some((index, start, *offset))
        })
    }

    /// `(block index, start, run)` of every text run in the flattened projection
    pub fn runs(&self) -> impl Iterator<Item = (usize, usize, &TextRun)> + '_ {
        self.block_spans().flat_map(move |(index, start, _)| {
            self.blocks[index]
                .runs
                .iter()
                .scan(start, move |offset, run| {
                    let run_start = *offset;
                    *offset += run.char_count();
                    Some((index, run_start, run))
                })
        })
    }

    /// Count words in the document
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.text().split_whitespace().count())
            .sum()
    }
}

/// Character offsets of every non-overlapping occurrence of `needle` in `haystack`
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }
    let needle_len = needle.chars().count();
    // Matches come in order, so count only the characters since the last one
    let mut chars_before = 0;
    let mut counted_to = 0;
    haystack
        .match_indices(needle)
        .map(|(byte_index, _)| {
            chars_before += haystack[counted_to..byte_index].chars().count();
            counted_to = byte_index;
            (chars_before, chars_before + needle_len)
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Strategy for generating simple text (no special characters for JSON safety)
    fn simple_text_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ]{0,40}"
    }

    fn block_strategy() -> impl Strategy<Value = Block> {
        (
            prop::collection::vec(simple_text_strategy(), 0..4),
            proptest::option::of(proptest::bool::ANY),
        )
            .prop_map(|(runs, highlight)| {
                let mut block = Block {
                    runs: runs.into_iter().map(TextRun::new).collect(),
                    attrs: BTreeMap::new(),
                };
                if let Some(h) = highlight {
                    block.attrs.insert("highlight".to_string(), AttrValue::Bool(h));
                }
                block
            })
    }

    fn document_strategy() -> impl Strategy<Value = DocumentTree> {
        prop::collection::vec(block_strategy(), 0..6).prop_map(DocumentTree::new)
    }

    proptest! {
        // Property: block spans tile the flattened projection
        #[test]
        fn prop_block_spans_tile_projection(doc in document_strategy()) {
            let mut expected_start = 0;
            for (_, start, end) in doc.block_spans() {
                prop_assert_eq!(start, expected_start);
                prop_assert!(start <= end);
                expected_start = end;
            }
            prop_assert_eq!(expected_start, doc.text_len());
        }

        // Property: text_len equals chars of the projection
        #[test]
        fn prop_text_len_matches_projection(doc in document_strategy()) {
            prop_assert_eq!(doc.text_len(), doc.text().chars().count());
        }

        // Property: Document serialization roundtrip
        #[test]
        fn prop_document_serde_roundtrip(doc in document_strategy()) {
            let json = serde_json::to_string(&doc).expect("serialize");
            let deserialized: DocumentTree = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(doc, deserialized);
        }
    }
}

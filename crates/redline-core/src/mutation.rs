// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document mutations
//!
//! Text ranges are half-open character ranges into the flattened projection
//! of the tree the mutation was computed against. `SetAttribute` addresses a
//! block by index and never shifts text offsets.

use crate::ast::{AttrValue, DocumentTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// A single atomic edit description
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    /// Remove the characters in `from..to`
    DeleteRange { from: usize, to: usize },

    /// Replace the characters in `from..to` with `text`
    ReplaceRange { from: usize, to: usize, text: String },

    /// Set an attribute on the block at `block_index`
    SetAttribute {
        block_index: usize,
        key: String,
        value: AttrValue,
    },
}

/// Why a mutation cannot be applied to a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMutationError {
    #[error("inverted range {from}..{to}")]
    InvertedRange { from: usize, to: usize },

    #[error("range {from}..{to} is past the end of the text (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },

    #[error("range {from}..{to} crosses a block boundary")]
    CrossesBlocks { from: usize, to: usize },

    #[error("block index {index} out of range ({count} blocks)")]
    NoSuchBlock { index: usize, count: usize },
}

impl Mutation {
    pub fn delete(from: usize, to: usize) -> Self {
        Self::DeleteRange { from, to }
    }

    pub fn replace(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self::ReplaceRange {
            from,
            to,
            text: text.into(),
        }
    }

    pub fn set_attribute(
        block_index: usize,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        Self::SetAttribute {
            block_index,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Text range touched by this mutation, `None` for attribute changes
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            Self::DeleteRange { from, to } | Self::ReplaceRange { from, to, .. } => {
                Some(*from..*to)
            }
            Self::SetAttribute { .. } => None,
        }
    }

    /// Net change in text length once applied
    pub fn length_delta(&self) -> isize {
        match self {
            Self::DeleteRange { from, to } => -(to.saturating_sub(*from) as isize),
            Self::ReplaceRange { from, to, text } => {
                text.chars().count() as isize - to.saturating_sub(*from) as isize
            }
            Self::SetAttribute { .. } => 0,
        }
    }

    /// Whether this is an empty-range replacement, i.e. a pure insertion
    pub fn is_insertion(&self) -> bool {
        matches!(self, Self::ReplaceRange { from, to, .. } if from == to)
    }

    /// Check that this mutation addresses real positions in `tree`.
    ///
    /// Measures the whole tree; use [`Mutation::validate_against`] with a
    /// shared [`BlockIndex`] when checking a batch.
    pub fn validate(&self, tree: &DocumentTree) -> Result<(), InvalidMutationError> {
        self.validate_against(&BlockIndex::new(tree))
    }

    pub fn validate_against(&self, index: &BlockIndex) -> Result<(), InvalidMutationError> {
        match self {
            Self::DeleteRange { from, to } | Self::ReplaceRange { from, to, .. } => {
                index.resolve(*from, *to).map(|_| ())
            }
            Self::SetAttribute { block_index, .. } => {
                if *block_index < index.block_count() {
                    Ok(())
                } else {
                    Err(InvalidMutationError::NoSuchBlock {
                        index: *block_index,
                        count: index.block_count(),
                    })
                }
            }
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteRange { from, to } => write!(f, "delete {from}..{to}"),
            Self::ReplaceRange { from, to, text } => write!(f, "replace {from}..{to} with {text:?}"),
            Self::SetAttribute {
                block_index,
                key,
                value,
            } => write!(f, "set block {block_index} {key}={value:?}"),
        }
    }
}

/// A text range resolved to block-local character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedRange {
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

/// Span of every block in the flattened projection of one tree.
///
/// Built once per batch so each lookup is a binary search instead of a walk
/// over the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIndex {
    spans: Vec<Range<usize>>,
}

impl BlockIndex {
    pub fn new(tree: &DocumentTree) -> Self {
        Self {
            spans: tree.block_spans().map(|(_, start, end)| start..end).collect(),
        }
    }

    pub fn block_count(&self) -> usize {
        self.spans.len()
    }

    /// Length of the flattened projection in characters
    pub fn text_len(&self) -> usize {
        self.spans.last().map_or(0, |span| span.end)
    }

    /// Locate the block holding `from..to`.
    ///
    /// An empty range on a block boundary belongs to the earlier block.
    pub(crate) fn resolve(&self, from: usize, to: usize) -> Result<ResolvedRange, InvalidMutationError> {
        if from > to {
            return Err(InvalidMutationError::InvertedRange { from, to });
        }
        let len = self.text_len();
        if to > len {
            return Err(InvalidMutationError::OutOfBounds { from, to, len });
        }
        // Spans are contiguous, so the first block reaching `to` is the only
        // one that can also start at or before `from`
        let block = self.spans.partition_point(|span| span.end < to);
        match self.spans.get(block) {
            Some(span) if span.start <= from => Ok(ResolvedRange {
                block,
                start: from - span.start,
                end: to - span.start,
            }),
            _ => Err(InvalidMutationError::CrossesBlocks { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Block;
    use pretty_assertions::assert_eq;

    fn tree() -> DocumentTree {
        DocumentTree::from_paragraphs(["hello", "world"])
    }

    #[test]
    fn test_validate_accepts_in_block_ranges() {
        let tree = tree();
        assert_eq!(Mutation::delete(0, 5).validate(&tree), Ok(()));
        assert_eq!(Mutation::replace(5, 10, "x").validate(&tree), Ok(()));
        assert_eq!(Mutation::replace(10, 10, "!").validate(&tree), Ok(()));
        assert_eq!(Mutation::set_attribute(1, "highlight", true).validate(&tree), Ok(()));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        assert_eq!(
            Mutation::delete(4, 2).validate(&tree()),
            Err(InvalidMutationError::InvertedRange { from: 4, to: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        assert_eq!(
            Mutation::delete(8, 11).validate(&tree()),
            Err(InvalidMutationError::OutOfBounds {
                from: 8,
                to: 11,
                len: 10
            })
        );
    }

    #[test]
    fn test_validate_rejects_cross_block_range() {
        assert_eq!(
            Mutation::delete(3, 7).validate(&tree()),
            Err(InvalidMutationError::CrossesBlocks { from: 3, to: 7 })
        );
    }

    #[test]
    fn test_validate_rejects_missing_block() {
        assert_eq!(
            Mutation::set_attribute(2, "highlight", true).validate(&tree()),
            Err(InvalidMutationError::NoSuchBlock { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_boundary_insertion_resolves_to_earlier_block() {
        let index = BlockIndex::new(&tree());
        let resolved = index.resolve(5, 5).expect("resolve");
        assert_eq!(resolved, ResolvedRange { block: 0, start: 5, end: 5 });
        let resolved = index.resolve(5, 6).expect("resolve");
        assert_eq!(resolved, ResolvedRange { block: 1, start: 0, end: 1 });
    }

    #[test]
    fn test_empty_block_between() {
        let tree = DocumentTree::new(vec![
            Block::paragraph("ab"),
            Block::paragraph(""),
            Block::paragraph("cd"),
        ]);
        let index = BlockIndex::new(&tree);
        assert_eq!(index.resolve(2, 3).expect("resolve").block, 2);
        assert_eq!(index.resolve(2, 2).expect("resolve").block, 0);
    }

    #[test]
    fn test_empty_tree_has_no_positions() {
        let index = BlockIndex::new(&DocumentTree::default());
        assert_eq!(index.text_len(), 0);
        assert_eq!(
            index.resolve(0, 0),
            Err(InvalidMutationError::CrossesBlocks { from: 0, to: 0 })
        );
    }

    #[test]
    fn test_is_insertion() {
        assert!(Mutation::replace(3, 3, "x").is_insertion());
        assert!(!Mutation::replace(3, 4, "x").is_insertion());
        assert!(!Mutation::delete(3, 3).is_insertion());
        assert!(!Mutation::set_attribute(0, "k", true).is_insertion());
    }

    #[test]
    fn test_length_delta() {
        assert_eq!(Mutation::delete(2, 6).length_delta(), -4);
        assert_eq!(Mutation::replace(0, 4, "bark!").length_delta(), 1);
        assert_eq!(Mutation::set_attribute(0, "k", "v").length_delta(), 0);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Mutation::replace(6, 10, "bark")).expect("serialize");
        assert_eq!(json, r#"{"type":"replace_range","from":6,"to":10,"text":"bark"}"#);
        let negative: Result<Mutation, _> =
            serde_json::from_str(r#"{"type":"delete_range","from":-1,"to":2}"#);
        assert!(negative.is_err());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Applying a batch of mutations to a tree
//!
//! Every range in a batch is relative to the input tree. Ranges are resolved
//! against the input first, then each touched block is rebuilt in a single
//! pass over its text. Attribute changes go last.

use crate::ast::{Block, DocumentTree, TextRun};
use crate::mutation::{BlockIndex, InvalidMutationError, Mutation, ResolvedRange};
use std::ops::Range;
use thiserror::Error;

/// Two mutations in one batch touch the same characters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mutations overlap: {first:?} and {second:?}")]
pub struct OverlapError {
    pub first: Range<usize>,
    pub second: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error("invalid mutation `{mutation}`: {source}")]
    Invalid {
        mutation: Mutation,
        #[source]
        source: InvalidMutationError,
    },
}

/// Half-open ranges overlap when each starts before the other ends. An empty
/// range only conflicts with a range strictly around it.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Reject a batch whose text ranges overlap, returning the text mutations
/// ordered by `(from, to)`. Ties keep emission order.
pub fn sort_and_check(mutations: &[Mutation]) -> Result<Vec<&Mutation>, OverlapError> {
    let mut text: Vec<(Range<usize>, &Mutation)> = mutations
        .iter()
        .filter_map(|m| m.range().map(|r| (r, m)))
        .collect();
    text.sort_by_key(|(r, _)| (r.start, r.end));

    // Accepted non-empty ranges are disjoint, so the last one reaches furthest
    let mut last: Option<Range<usize>> = None;
    for (range, _) in &text {
        if let Some(prev) = &last {
            if overlaps(prev, range) {
                return Err(OverlapError {
                    first: prev.clone(),
                    second: range.clone(),
                });
            }
        }
        if !range.is_empty() {
            last = Some(range.clone());
        }
    }
    Ok(text.into_iter().map(|(_, m)| m).collect())
}

/// Apply a batch of mutations, producing a new tree.
///
/// The input is never modified; on error nothing is applied.
pub fn apply_mutations(tree: &DocumentTree, mutations: &[Mutation]) -> Result<DocumentTree, ApplyError> {
    if mutations.is_empty() {
        return Ok(tree.clone());
    }

    let index = BlockIndex::new(tree);
    let invalid = |mutation: &Mutation, source| ApplyError::Invalid {
        mutation: mutation.clone(),
        source,
    };
    for mutation in mutations {
        mutation
            .validate_against(&index)
            .map_err(|source| invalid(mutation, source))?;
    }

    let text = sort_and_check(mutations)?;

    // Sorted by position, so edits come out grouped by block
    let mut edits = Vec::with_capacity(text.len());
    for mutation in text {
        let (range, insert) = match mutation {
            Mutation::DeleteRange { from, to } => (*from..*to, ""),
            Mutation::ReplaceRange { from, to, text } => (*from..*to, text.as_str()),
            Mutation::SetAttribute { .. } => continue,
        };
        let target = index
            .resolve(range.start, range.end)
            .map_err(|source| invalid(mutation, source))?;
        edits.push((target, insert));
    }

    let mut out = tree.clone();
    let mut rest = edits.as_slice();
    while let Some((first, _)) = rest.first() {
        let block = first.block;
        let split = rest
            .iter()
            .position(|(target, _)| target.block != block)
            .unwrap_or(rest.len());
        let (in_block, tail) = rest.split_at(split);
        splice_block(&mut out.blocks[block], in_block);
        rest = tail;
    }

    for mutation in mutations {
        if let Mutation::SetAttribute {
            block_index,
            key,
            value,
        } = mutation
        {
            out.blocks[*block_index]
                .attrs
                .insert(key.clone(), value.clone());
        }
    }

    Ok(out)
}

/// Apply sorted, non-overlapping block-local edits in one pass over the block.
///
/// Inserted text joins the run the edit starts in; edits at the very end of
/// the block join the last run. Runs left empty are dropped.
fn splice_block(block: &mut Block, edits: &[(ResolvedRange, &str)]) {
    if block.runs.is_empty() {
        let text: String = edits.iter().map(|(_, insert)| *insert).collect();
        if !text.is_empty() {
            block.runs.push(TextRun::new(text));
        }
        return;
    }

    let mut pending = edits.iter().peekable();
    let mut offset = 0;
    let mut deleted_until = 0;
    let last = block.runs.len() - 1;
    for (index, run) in block.runs.iter_mut().enumerate() {
        let mut text = String::with_capacity(run.text.len());
        for ch in run.text.chars() {
            while let Some((target, insert)) = pending.next_if(|edit| edit.0.start == offset) {
                text.push_str(insert);
                deleted_until = deleted_until.max(target.end);
            }
            if offset >= deleted_until {
                text.push(ch);
            }
            offset += 1;
        }
        if index == last {
            for (_, insert) in pending.by_ref() {
                text.push_str(insert);
            }
        }
        run.text = text;
    }

    block.runs.retain(|run| !run.text.is_empty());
}

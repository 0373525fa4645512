// SPDX-License-Identifier: AGPL-3.0-or-later
//! Delete a trigger word wherever a block contains it

use crate::rule::Rule;
use redline_core::{find_occurrences, DocumentTree, Mutation};

#[derive(Debug, Clone)]
pub struct TriggerDeleteRule {
    trigger: String,
}

impl TriggerDeleteRule {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
        }
    }
}

impl Rule for TriggerDeleteRule {
    fn name(&self) -> &str {
        "trigger-delete"
    }

    fn evaluate(&self, tree: &DocumentTree) -> Vec<Mutation> {
        // Matched on block text so a trigger split across runs is still found
        tree.block_spans()
            .flat_map(|(index, start, _)| {
                find_occurrences(&tree.blocks[index].text(), &self.trigger)
                    .into_iter()
                    .map(move |(from, to)| Mutation::delete(start + from, start + to))
            })
            .collect()
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Keep a boolean block attribute in sync with whether the block mentions a word

use crate::rule::Rule;
use redline_core::{AttrValue, DocumentTree, Mutation};

pub const DEFAULT_KEY: &str = "highlight";

#[derive(Debug, Clone)]
pub struct AttributeSyncRule {
    word: String,
    key: String,
}

impl AttributeSyncRule {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            key: DEFAULT_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl Rule for AttributeSyncRule {
    fn name(&self) -> &str {
        "attribute-sync"
    }

    fn evaluate(&self, tree: &DocumentTree) -> Vec<Mutation> {
        tree.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| {
                let wanted = !self.word.is_empty() && block.contains_word(&self.word);
                // Absent attribute reads as false
                let current = block.attr(&self.key).cloned().unwrap_or(AttrValue::Bool(false));
                (current != AttrValue::Bool(wanted))
                    .then(|| Mutation::set_attribute(index, self.key.clone(), wanted))
            })
            .collect()
    }
}

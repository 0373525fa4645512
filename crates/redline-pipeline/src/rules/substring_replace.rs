// SPDX-License-Identifier: AGPL-3.0-or-later
//! Replace every occurrence of a word inside each text run

use crate::rule::Rule;
use redline_core::{find_occurrences, DocumentTree, Mutation};

#[derive(Debug, Clone)]
pub struct SubstringReplaceRule {
    from: String,
    to: String,
}

impl SubstringReplaceRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Rule for SubstringReplaceRule {
    fn name(&self) -> &str {
        "substring-replace"
    }

    fn evaluate(&self, tree: &DocumentTree) -> Vec<Mutation> {
        tree.runs()
            .flat_map(|(_, start, run)| {
                find_occurrences(&run.text, &self.from)
                    .into_iter()
                    .map(move |(from, to)| Mutation::replace(start + from, start + to, self.to.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::{Block, TextRun};
    use std::collections::BTreeMap;

    #[test]
    fn test_replaces_all_occurrences() {
        let tree = DocumentTree::from_paragraphs(["I say woof woof"]);
        assert_eq!(
            SubstringReplaceRule::new("woof", "bark").evaluate(&tree),
            vec![Mutation::replace(6, 10, "bark"), Mutation::replace(11, 15, "bark")]
        );
    }

    #[test]
    fn test_offsets_span_blocks_and_runs() {
        let tree = DocumentTree::new(vec![
            Block::paragraph("woof"),
            Block {
                runs: vec![TextRun::new("ab"), TextRun::new("woof")],
                attrs: BTreeMap::new(),
            },
        ]);
        assert_eq!(
            SubstringReplaceRule::new("woof", "bark").evaluate(&tree),
            vec![Mutation::replace(0, 4, "bark"), Mutation::replace(6, 10, "bark")]
        );
    }

    #[test]
    fn test_match_split_across_runs_is_ignored() {
        let tree = DocumentTree::new(vec![Block {
            runs: vec![TextRun::new("wo"), TextRun::new("of")],
            attrs: BTreeMap::new(),
        }]);
        assert!(SubstringReplaceRule::new("woof", "bark").evaluate(&tree).is_empty());
    }

    #[test]
    fn test_empty_source_matches_nothing() {
        let tree = DocumentTree::from_paragraphs(["woof"]);
        assert!(SubstringReplaceRule::new("", "bark").evaluate(&tree).is_empty());
    }
}

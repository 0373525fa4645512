// SPDX-License-Identifier: AGPL-3.0-or-later
//! The rule trait

use redline_core::{DocumentTree, Mutation};
use std::fmt;

/// A pure function from a tree to the mutations it wants applied.
///
/// Offsets in the returned mutations are relative to `tree`. A rule at rest
/// returns an empty list.
pub trait Rule: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Inspect the tree and emit mutations
    fn evaluate(&self, tree: &DocumentTree) -> Vec<Mutation>;
}

/// Rule backed by a closure
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&DocumentTree) -> Vec<Mutation> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&DocumentTree) -> Vec<Mutation> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, tree: &DocumentTree) -> Vec<Mutation> {
        (self.f)(tree)
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_rule_delegates() {
        let rule = FnRule::new("drop-first", |tree: &DocumentTree| {
            if tree.text_len() > 0 {
                vec![Mutation::delete(0, 1)]
            } else {
                Vec::new()
            }
        });

        assert_eq!(rule.name(), "drop-first");
        assert_eq!(
            rule.evaluate(&DocumentTree::from_paragraphs(["ab"])),
            vec![Mutation::delete(0, 1)]
        );
        assert!(rule.evaluate(&DocumentTree::default()).is_empty());
    }
}

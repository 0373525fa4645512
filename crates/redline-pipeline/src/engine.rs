// SPDX-License-Identifier: AGPL-3.0-or-later
//! The rule engine
//!
//! One `run` evaluates every rule against the same input tree, merges their
//! mutations in registration order and applies them as a single batch.
//! `run_to_fixpoint` repeats that until the rules go quiet.

use crate::config::{ConfigError, EngineConfig, DEFAULT_MAX_ITERATIONS};
use crate::report::{DroppedMutation, MutationReporter, TracingReporter};
use crate::rule::Rule;
use crate::{EngineError, NonConvergingRulesError, Result};
use redline_core::{apply_mutations, BlockIndex, DocumentTree, Mutation};
use std::collections::HashSet;
use tracing::{debug, instrument, trace, warn};

/// Result of a single `run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub tree: DocumentTree,
    /// Whether `tree` differs from the input
    pub changed: bool,
}

/// Result of a converged `run_to_fixpoint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixpoint {
    pub tree: DocumentTree,
    /// Number of `run` calls that changed the tree
    pub passes: usize,
}

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
    max_iterations: usize,
    reporter: Box<dyn MutationReporter>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            reporter: Box::new(TracingReporter),
        }
    }

    /// Build the rules named in `config`, in order
    pub fn from_config(config: &EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.rules.iter().map(|spec| spec.build()).collect();
        Ok(Self::new(rules).with_max_iterations(config.max_iterations))
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// At least one call is always made
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_reporter(mut self, reporter: impl MutationReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// Evaluate every rule against `tree` and merge their output.
    ///
    /// Repeated mutations collapse onto their first emission, except
    /// insertions, which each add text. Malformed mutations are reported once
    /// and dropped.
    pub fn collect(&self, tree: &DocumentTree) -> Vec<Mutation> {
        let index = BlockIndex::new(tree);
        let mut seen = HashSet::new();
        let mut batch = Vec::new();

        for rule in &self.rules {
            let emitted = rule.evaluate(tree);
            debug!(rule = rule.name(), mutations = emitted.len(), "rule evaluated");

            for mutation in emitted {
                if !mutation.is_insertion() && !seen.insert(mutation.clone()) {
                    trace!(rule = rule.name(), %mutation, "duplicate mutation skipped");
                    continue;
                }
                if let Err(error) = mutation.validate_against(&index) {
                    self.reporter.report(&DroppedMutation {
                        rule: rule.name().to_string(),
                        mutation,
                        error,
                    });
                    continue;
                }
                batch.push(mutation);
            }
        }

        batch
    }

    /// One evaluate-and-apply cycle. On error the input is left as it was.
    #[instrument(skip_all, fields(blocks = tree.blocks.len()))]
    pub fn run(&self, tree: &DocumentTree) -> Result<RunOutcome> {
        let batch = self.collect(tree);
        let next = apply_mutations(tree, &batch)?;
        let changed = next != *tree;
        debug!(mutations = batch.len(), changed, "cycle applied");
        Ok(RunOutcome {
            tree: next,
            changed,
        })
    }

    /// Call `run` until the tree stops changing.
    ///
    /// Fails with `NonConvergingRulesError` after `max_iterations` calls that
    /// all changed the tree, or as soon as a tree seen earlier in this run
    /// comes back.
    #[instrument(skip_all, fields(max_iterations = self.max_iterations))]
    pub fn run_to_fixpoint(&self, tree: DocumentTree) -> Result<Fixpoint> {
        let mut history = vec![tree.clone()];
        let mut current = tree;
        let mut passes = 0;

        for iteration in 1..=self.max_iterations {
            let outcome = self.run(&current)?;
            if !outcome.changed {
                debug!(iteration, passes, "fixpoint reached");
                return Ok(Fixpoint {
                    tree: outcome.tree,
                    passes,
                });
            }
            passes += 1;

            if history.contains(&outcome.tree) {
                warn!(iteration, "rules oscillate between trees");
                return Err(EngineError::NonConverging(NonConvergingRulesError {
                    iterations: iteration,
                    last_tree: Box::new(outcome.tree),
                    oscillating: true,
                }));
            }
            history.push(outcome.tree.clone());
            current = outcome.tree;
        }

        warn!(iterations = self.max_iterations, "rules did not converge");
        Err(EngineError::NonConverging(NonConvergingRulesError {
            iterations: self.max_iterations,
            last_tree: Box::new(current),
            oscillating: false,
        }))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

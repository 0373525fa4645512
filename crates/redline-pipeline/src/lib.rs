// SPDX-License-Identifier: AGPL-3.0-or-later
//! Redline Pipeline - rule engine for document edits
//!
//! After each edit the host hands the tree to a [`RuleEngine`]:
//! - Rules: pure functions from a tree to mutations, run in registration order
//! - Cycle: all mutations of one pass are applied as a single batch
//! - Fixpoint: passes repeat until no rule changes the tree, bounded by
//!   `max_iterations`

pub mod config;
pub mod engine;
pub mod report;
pub mod rule;
pub mod rules;

use redline_core::{ApplyError, DocumentTree, InvalidMutationError, Mutation, OverlapError};
use thiserror::Error;

pub use config::{ConfigError, EngineConfig, RuleSpec};
pub use engine::{Fixpoint, RuleEngine, RunOutcome};
pub use report::{CollectingReporter, DroppedMutation, MutationReporter, TracingReporter};
pub use rule::{FnRule, Rule};
pub use rules::{AttributeSyncRule, SubstringReplaceRule, TriggerDeleteRule};

/// The rules kept changing the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rules did not converge after {iterations} iterations (oscillating: {oscillating})")]
pub struct NonConvergingRulesError {
    pub iterations: usize,
    /// Tree produced by the last pass
    pub last_tree: Box<DocumentTree>,
    /// A tree from an earlier pass came back
    pub oscillating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error(transparent)]
    NonConverging(#[from] NonConvergingRulesError),

    #[error("invalid mutation `{mutation}`: {source}")]
    InvalidMutation {
        mutation: Mutation,
        #[source]
        source: InvalidMutationError,
    },
}

impl From<ApplyError> for EngineError {
    fn from(e: ApplyError) -> Self {
        match e {
            ApplyError::Overlap(overlap) => Self::Overlap(overlap),
            ApplyError::Invalid { mutation, source } => Self::InvalidMutation { mutation, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

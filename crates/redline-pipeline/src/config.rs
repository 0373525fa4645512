// SPDX-License-Identifier: AGPL-3.0-or-later
//! Engine configuration
//!
//! ```toml
//! max_iterations = 10
//!
//! [[rules]]
//! kind = "substring_replace"
//! from = "woof"
//! to = "bark"
//! ```

use crate::rule::Rule;
use crate::rules::{attribute_sync, AttributeSyncRule, SubstringReplaceRule, TriggerDeleteRule};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A built-in rule as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    TriggerDelete {
        trigger: String,
    },
    AttributeSync {
        word: String,
        #[serde(default = "default_key")]
        key: String,
    },
    SubstringReplace {
        from: String,
        to: String,
    },
}

fn default_key() -> String {
    attribute_sync::DEFAULT_KEY.to_string()
}

impl RuleSpec {
    pub fn build(&self) -> Box<dyn Rule> {
        match self {
            Self::TriggerDelete { trigger } => Box::new(TriggerDeleteRule::new(trigger.as_str())),
            Self::AttributeSync { word, key } => {
                Box::new(AttributeSyncRule::new(word.as_str()).with_key(key.as_str()))
            }
            Self::SubstringReplace { from, to } => {
                Box::new(SubstringReplaceRule::new(from.as_str(), to.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cap on `run` calls in one fixpoint run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Rules in registration order
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Host commands: load, run rules, render

use redline_core::{
    handler_for, ConversionError, DocumentTree, Parser, RenderConfig, Renderer, TreeFormat,
};
use redline_pipeline::{ConfigError, EngineConfig, EngineError, RuleEngine};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub path: Option<String>,
    pub format: TreeFormat,
    pub blocks: usize,
    pub word_count: usize,
    pub char_count: usize,
}

impl DocumentMeta {
    fn describe(path: Option<&Path>, format: TreeFormat, tree: &DocumentTree) -> Self {
        Self {
            path: path.map(|p| p.display().to_string()),
            format,
            blocks: tree.blocks.len(),
            word_count: tree.word_count(),
            char_count: tree.text_len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentData {
    pub tree: DocumentTree,
    pub meta: DocumentMeta,
}

/// What a fixpoint run did to a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub rules: Vec<String>,
    pub passes: usize,
    pub changed: bool,
    pub before: DocumentMeta,
    pub after: DocumentMeta,
}

/// Load a document from the filesystem, picking the format from the extension
pub fn load_document(path: &Path) -> Result<DocumentData, HostError> {
    let content = std::fs::read_to_string(path).map_err(|source| HostError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = TreeFormat::from_path(path);
    let tree = handler_for(format).parse(&content)?;
    tracing::debug!(path = %path.display(), ?format, blocks = tree.blocks.len(), "document loaded");

    Ok(DocumentData {
        meta: DocumentMeta::describe(Some(path), format, &tree),
        tree,
    })
}

/// Load an engine configuration, or the default one when no path is given
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, HostError> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Drive the document to a fixpoint
pub fn apply_rules(
    document: DocumentData,
    engine: &RuleEngine,
) -> Result<(DocumentData, RunSummary), HostError> {
    let before = document.meta.clone();
    let original = document.tree.clone();
    let fixpoint = engine.run_to_fixpoint(document.tree)?;

    let after = DocumentMeta::describe(None, before.format, &fixpoint.tree);
    let summary = RunSummary {
        rules: engine.rule_names().map(str::to_string).collect(),
        passes: fixpoint.passes,
        changed: fixpoint.tree != original,
        before,
        after: after.clone(),
    };
    tracing::info!(passes = summary.passes, changed = summary.changed, "rules settled");

    Ok((
        DocumentData {
            tree: fixpoint.tree,
            meta: after,
        },
        summary,
    ))
}

/// Render a tree in the requested format
pub fn render_document(tree: &DocumentTree, format: TreeFormat) -> Result<String, HostError> {
    Ok(handler_for(format).render(tree, &RenderConfig::default())?)
}

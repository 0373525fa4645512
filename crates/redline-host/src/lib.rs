// SPDX-License-Identifier: AGPL-3.0-or-later
//! Redline Host - thin host around the rule engine
//!
//! Loads a document, runs the configured rules to a fixpoint and renders the
//! result. Rendering and persistence stay on this side of the engine.

pub mod commands;

pub use commands::{
    apply_rules, load_config, load_document, render_document, DocumentData, DocumentMeta,
    HostError, RunSummary,
};

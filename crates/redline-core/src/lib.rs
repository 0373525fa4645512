// SPDX-License-Identifier: AGPL-3.0-or-later
//! Redline Core - paragraph/text document tree and mutations
//!
//! This crate provides:
//! - An immutable tree of blocks and text runs addressed by character offsets
//! - The mutation vocabulary rules emit (delete, replace, set attribute)
//! - Batch application with overlap rejection
//! - Plain text and JSON format handlers

pub mod apply;
pub mod ast;
pub mod formats;
pub mod mutation;
pub mod traits;

pub use apply::{apply_mutations, ApplyError, OverlapError};
pub use ast::{find_occurrences, AttrValue, Block, DocumentTree, TextRun};
pub use mutation::{BlockIndex, InvalidMutationError, Mutation};
pub use traits::{handler_for, ConversionError, Parser, RenderConfig, Renderer, Result, TreeFormat};

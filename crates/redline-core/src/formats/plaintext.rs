// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plain text format handler

use crate::ast::{Block, DocumentTree};
use crate::traits::{Parser, RenderConfig, Renderer, Result, TreeFormat};

/// Plain text format handler.
///
/// Paragraphs are separated by blank lines. Blocks with no text are not
/// rendered, since parsing would drop them anyway.
pub struct PlainTextHandler;

impl PlainTextHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PlainTextHandler {
    fn format(&self) -> TreeFormat {
        TreeFormat::PlainText
    }

    fn parse(&self, input: &str) -> Result<DocumentTree> {
        // Split into paragraphs on blank lines
        let blocks: Vec<Block> = input
            .replace("\r\n", "\n")
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .map(|p| Block::paragraph(p.trim()))
            .collect();

        Ok(DocumentTree::new(blocks))
    }
}

impl Renderer for PlainTextHandler {
    fn format(&self) -> TreeFormat {
        TreeFormat::PlainText
    }

    fn render(&self, tree: &DocumentTree, config: &RenderConfig) -> Result<String> {
        let mut output = String::new();

        let blocks = tree.blocks.iter().filter(|block| block.char_count() > 0);
        for (i, block) in blocks.enumerate() {
            if i > 0 {
                output.push_str(&config.paragraph_separator);
            }
            for run in &block.runs {
                output.push_str(&run.text);
            }
        }

        Ok(output)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! JSON format handler (serde form of the tree)

use crate::ast::DocumentTree;
use crate::traits::{ConversionError, Parser, RenderConfig, Renderer, Result, TreeFormat};

pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for JsonHandler {
    fn format(&self) -> TreeFormat {
        TreeFormat::Json
    }

    fn parse(&self, input: &str) -> Result<DocumentTree> {
        serde_json::from_str(input).map_err(|e| ConversionError::ParseError {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })
    }
}

impl Renderer for JsonHandler {
    fn format(&self) -> TreeFormat {
        TreeFormat::Json
    }

    fn render(&self, tree: &DocumentTree, config: &RenderConfig) -> Result<String> {
        let output = if config.pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        };
        output.map_err(|e| ConversionError::SerializationError(e.to_string()))
    }
}

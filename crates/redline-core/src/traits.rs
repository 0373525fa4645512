// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser and Renderer traits for document formats

use crate::ast::DocumentTree;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// Error type for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// On-disk representation of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeFormat {
    /// Paragraphs separated by blank lines; attributes are not kept
    PlainText,
    /// The serde form of `DocumentTree`
    Json,
}

impl TreeFormat {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Json => "json",
        }
    }

    /// Pick a format from a path's extension, plain text by default
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::PlainText,
        }
    }
}

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Pretty-print structured output
    pub pretty: bool,
    /// Separator between paragraphs in plain text (default: blank line)
    pub paragraph_separator: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            paragraph_separator: "\n\n".to_string(),
        }
    }
}

/// Parser trait: convert source text to a tree
pub trait Parser: Send + Sync {
    /// The format this parser handles
    fn format(&self) -> TreeFormat;

    /// Parse a string into a tree
    fn parse(&self, input: &str) -> Result<DocumentTree>;
}

/// Renderer trait: convert a tree to text
pub trait Renderer: Send + Sync {
    /// The format this renderer produces
    fn format(&self) -> TreeFormat;

    /// Render a tree to a string
    fn render(&self, tree: &DocumentTree, config: &RenderConfig) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait ParserExt: Parser {
    /// Parse from a reader
    fn parse_reader<R: Read>(&self, reader: R) -> Result<DocumentTree> {
        let mut input = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut input)?;
        self.parse(&input)
    }
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        tree: &DocumentTree,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(tree, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

// Blanket implementations
impl<T: Parser> ParserExt for T {}
impl<T: Renderer> RendererExt for T {}

/// Combined parser + renderer for a format
pub trait FormatHandler: Parser + Renderer {}

impl<T: Parser + Renderer> FormatHandler for T {}

/// Handler for a given format
pub fn handler_for(format: TreeFormat) -> Box<dyn FormatHandler> {
    match format {
        TreeFormat::PlainText => Box::new(crate::formats::PlainTextHandler::new()),
        TreeFormat::Json => Box::new(crate::formats::JsonHandler::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(TreeFormat::from_path(Path::new("doc.json")), TreeFormat::Json);
        assert_eq!(TreeFormat::from_path(Path::new("doc.txt")), TreeFormat::PlainText);
        assert_eq!(TreeFormat::from_path(Path::new("README")), TreeFormat::PlainText);
    }

    #[test]
    fn test_handler_for_matches_format() {
        for format in [TreeFormat::PlainText, TreeFormat::Json] {
            let handler = handler_for(format);
            assert_eq!(Parser::format(handler.as_ref()), format);
            assert_eq!(Renderer::format(handler.as_ref()), format);
        }
    }

    #[test]
    fn test_reader_writer_roundtrip() {
        let handler = crate::formats::PlainTextHandler::new();
        let tree = handler.parse_reader("one\n\ntwo".as_bytes()).unwrap();
        let mut out = Vec::new();
        handler
            .render_writer(&tree, &mut out, &RenderConfig::default())
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "one\n\ntwo");
    }
}

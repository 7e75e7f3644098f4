//! Top-level parse driver and the full-document AST.

use crate::ParseError;
use crate::block::parse_block;
use crate::cursor::Cursor;
use crate::metadata::PageMetadata;
use crate::node::{Block, Node, render_all};
use crate::resolve::LinkResolver;

/// Parse a whole markdown source into its ordered block sequence.
///
/// # Examples
///
/// ```
/// use mdsite_markdown::{Block, parse_document};
///
/// let blocks = parse_document("# Title\n\nBody text.").unwrap();
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
/// ```
pub fn parse_document(source: &str) -> Result<Vec<Block>, ParseError> {
    let mut cur = Cursor::new(source);
    let mut blocks = Vec::new();
    while let Some(block) = parse_block(&mut cur)? {
        blocks.push(block);
    }
    Ok(blocks)
}

/// A parsed markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Parse markdown source.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            blocks: parse_document(source)?,
        })
    }

    /// Generate HTML for every block, concatenated.
    pub fn render<R: LinkResolver>(&self, resolver: &R) -> Result<String, R::Error> {
        render_all(&self.blocks, resolver)
    }

    /// Indented tree dump of every block, for debugging.
    #[must_use]
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.write_tree(0, &mut out);
        }
        out
    }

    /// Page metadata with `default_title` as the fallback title.
    #[must_use]
    pub fn metadata(&self, default_title: impl Into<String>) -> PageMetadata {
        PageMetadata::collect(default_title, &self.blocks)
    }
}

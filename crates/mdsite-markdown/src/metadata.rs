//! Page metadata extracted from a parsed document.

use crate::node::{Block, text_of};

/// Page-level values derived from a document after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Page title. Defaults to the source path.
    pub title: String,
}

impl PageMetadata {
    /// Fold a block sequence into metadata.
    ///
    /// Every level-1 heading overwrites the title in document order, so the
    /// last one wins. Without a level-1 heading the title stays
    /// `default_title`.
    pub fn collect(default_title: impl Into<String>, blocks: &[Block]) -> Self {
        let title = blocks
            .iter()
            .rev()
            .find_map(|block| match block {
                Block::Heading { level: 1, children } => Some(text_of(children)),
                _ => None,
            })
            .unwrap_or_else(|| default_title.into());
        Self { title }
    }
}

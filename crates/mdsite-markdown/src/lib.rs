//! Markdown-to-HTML compiler core for mdsite.
//!
//! A hand-written recursive-descent parser turns markdown text into a typed
//! document tree, which then renders itself to HTML.
//!
//! # Architecture
//!
//! - [`Cursor`]: bounds-checked position over the source text
//! - [`parse_block`] / [`parse_inline`]: mutually recursive dispatchers; block
//!   nodes collect raw text and hand it to the inline parser
//! - [`Block`] / [`Inline`]: closed node enums implementing [`Node`]
//! - [`LinkResolver`]: supplies asset resolution during generation
//! - [`PageMetadata`]: values folded from the parsed tree (page title)
//!
//! # Example
//!
//! ```
//! use mdsite_markdown::{Document, NoAssets};
//!
//! let doc = Document::parse("# Hello\n\n**Bold** text").unwrap();
//! let html = doc.render(&NoAssets).unwrap();
//! assert_eq!(html, "<h1>Hello</h1><p><strong>Bold</strong> text</p>");
//! assert_eq!(doc.metadata("hello.md").title, "Hello");
//! ```

mod block;
mod cursor;
mod document;
mod error;
mod html;
mod inline;
mod metadata;
mod node;
mod resolve;

pub use block::parse_block;
pub use cursor::Cursor;
pub use document::{Document, parse_document};
pub use error::ParseError;
pub use html::{escape_angle_brackets, indent, tag, write_tag};
pub use inline::{parse_inline, parse_inlines};
pub use metadata::PageMetadata;
pub use node::{Block, EmphasisKind, Inline, List, ListEntry, ListItem, Node, render_all, text_of};
pub use resolve::{ASSET_SCHEME, LinkResolver, NoAssets, resolve_href, resolve_src};

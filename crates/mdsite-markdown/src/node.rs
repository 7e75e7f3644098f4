//! Document tree: block and inline node variants and the [`Node`] contract.
//!
//! Container nodes own their children exclusively; the tree has no
//! back-references.

use std::fmt::Write;

use crate::html::{escape_angle_brackets, indent, write_tag};
use crate::resolve::{LinkResolver, resolve_href, resolve_src};

/// Operations shared by every node in the document tree.
pub trait Node {
    /// Plain-text content (concatenated descendants' text).
    fn text(&self) -> String;

    /// Append this node's HTML to `out`.
    fn render<R: LinkResolver>(&self, resolver: &R, out: &mut String) -> Result<(), R::Error>;

    /// Append the indented debug representation of this node to `out`.
    fn write_tree(&self, depth: usize, out: &mut String);
}

/// Inline emphasis flavors. All three wrap recursively parsed children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    /// `**text**` or `__text__`
    Bold,
    /// `*text*` or `_text_`
    Italic,
    /// `~~text~~`
    StrikeOut,
}

impl EmphasisKind {
    /// Length of the opening (and closing) delimiter.
    #[must_use]
    pub fn delimiter_len(self) -> usize {
        match self {
            Self::Bold | Self::StrikeOut => 2,
            Self::Italic => 1,
        }
    }

    /// HTML element emitted for this emphasis.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "strong",
            Self::Italic => "i",
            Self::StrikeOut => "del",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::StrikeOut => "StrikeOut",
        }
    }
}

/// Span-level node inside a block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Run of plain text with whitespace runs collapsed to single spaces.
    Text(String),
    /// Bold, italic or strike-out wrapper.
    Emphasis {
        kind: EmphasisKind,
        children: Vec<Inline>,
    },
    /// Inline code; raw content, never inline-parsed.
    Code(String),
    /// Link with parsed link text.
    Anchor { href: String, children: Vec<Inline> },
    /// Image (leaf).
    Image {
        src: String,
        alt: Option<String>,
        title: Option<String>,
    },
}

/// One entry of a [`List`]: a regular item or a deeper nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Item(ListItem),
    Nested(List),
}

/// A single list item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub children: Vec<Inline>,
}

/// Ordered or unordered list whose items sit at `depth` columns of indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub depth: usize,
    pub entries: Vec<ListEntry>,
}

/// Top-level structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, children: Vec<Inline> },
    Paragraph(Vec<Inline>),
    HorizontalRule,
    List(List),
    BlockQuote(Vec<Inline>),
    CodeBlock { fenced: bool, content: String },
}

/// Concatenated plain text of a node sequence.
pub fn text_of<N: Node>(nodes: &[N]) -> String {
    nodes.iter().map(Node::text).collect()
}

/// Render a node sequence into a fresh string.
pub fn render_all<N: Node, R: LinkResolver>(nodes: &[N], resolver: &R) -> Result<String, R::Error> {
    let mut out = String::new();
    for node in nodes {
        node.render(resolver, &mut out)?;
    }
    Ok(out)
}

fn write_children<N: Node>(header: &str, children: &[N], depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{header}:", indent(depth));
    for child in children {
        child.write_tree(depth + 1, out);
    }
}

impl Node for Inline {
    fn text(&self) -> String {
        match self {
            Self::Text(text) | Self::Code(text) => text.clone(),
            Self::Emphasis { children, .. } | Self::Anchor { children, .. } => text_of(children),
            Self::Image { alt, .. } => alt.clone().unwrap_or_default(),
        }
    }

    fn render<R: LinkResolver>(&self, resolver: &R, out: &mut String) -> Result<(), R::Error> {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Emphasis { kind, children } => {
                let inner = render_all(children, resolver)?;
                write_tag(out, kind.tag(), &[], &inner);
            }
            Self::Code(code) => write_tag(out, "code", &[], &escape_angle_brackets(code)),
            Self::Anchor { href, children } => {
                let inner = render_all(children, resolver)?;
                match resolve_href(href, resolver)? {
                    Some(href) => write_tag(out, "a", &[("href", href.as_str())], &inner),
                    None => write_tag(out, "a", &[], &inner),
                }
            }
            Self::Image { src, alt, title } => {
                let src = resolve_src(src, resolver)?;
                let mut attrs = Vec::with_capacity(3);
                if let Some(src) = &src {
                    attrs.push(("src", src.as_str()));
                }
                if let Some(alt) = alt {
                    attrs.push(("alt", alt.as_str()));
                }
                if let Some(title) = title {
                    attrs.push(("title", title.as_str()));
                }
                write_tag(out, "img", &attrs, "");
            }
        }
        Ok(())
    }

    fn write_tree(&self, depth: usize, out: &mut String) {
        let pad = indent(depth);
        match self {
            Self::Text(text) => {
                let _ = writeln!(out, "{pad}Plain({text:?})");
            }
            Self::Emphasis { kind, children } => write_children(kind.name(), children, depth, out),
            Self::Code(code) => {
                let _ = writeln!(out, "{pad}Code({code:?})");
            }
            Self::Anchor { href, children } => {
                write_children(&format!("Anchor(href={href:?})"), children, depth, out);
            }
            Self::Image { src, alt, title } => {
                let _ = write!(out, "{pad}Image(src={src:?}");
                if let Some(alt) = alt {
                    let _ = write!(out, ", alt={alt:?}");
                }
                if let Some(title) = title {
                    let _ = write!(out, ", title={title:?}");
                }
                out.push_str(")\n");
            }
        }
    }
}

impl Node for ListItem {
    fn text(&self) -> String {
        text_of(&self.children)
    }

    fn render<R: LinkResolver>(&self, resolver: &R, out: &mut String) -> Result<(), R::Error> {
        let inner = render_all(&self.children, resolver)?;
        write_tag(out, "li", &[], inner.trim_end());
        Ok(())
    }

    fn write_tree(&self, depth: usize, out: &mut String) {
        write_children("ListItem", &self.children, depth, out);
    }
}

impl Node for List {
    fn text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                ListEntry::Item(item) => item.text(),
                ListEntry::Nested(list) => list.text(),
            })
            .collect()
    }

    /// Nested lists are emitted inside the `<li>` of the item they follow.
    fn render<R: LinkResolver>(&self, resolver: &R, out: &mut String) -> Result<(), R::Error> {
        let mut inner = String::new();
        // Body of the last `<li>`, kept open so following nested lists land inside it.
        let mut open_item: Option<String> = None;

        for entry in &self.entries {
            match entry {
                ListEntry::Item(item) => {
                    if let Some(body) = open_item.take() {
                        write_tag(&mut inner, "li", &[], &body);
                    }
                    let body = render_all(&item.children, resolver)?;
                    open_item = Some(body.trim_end().to_owned());
                }
                ListEntry::Nested(list) => match open_item.as_mut() {
                    Some(body) => list.render(resolver, body)?,
                    None => {
                        let mut body = String::new();
                        list.render(resolver, &mut body)?;
                        write_tag(&mut inner, "li", &[], &body);
                    }
                },
            }
        }
        if let Some(body) = open_item {
            write_tag(&mut inner, "li", &[], &body);
        }

        write_tag(out, if self.ordered { "ol" } else { "ul" }, &[], &inner);
        Ok(())
    }

    fn write_tree(&self, depth: usize, out: &mut String) {
        let _ = writeln!(
            out,
            "{}List(ordered={}, depth={}):",
            indent(depth),
            self.ordered,
            self.depth
        );
        for entry in &self.entries {
            match entry {
                ListEntry::Item(item) => item.write_tree(depth + 1, out),
                ListEntry::Nested(list) => list.write_tree(depth + 1, out),
            }
        }
    }
}

impl Node for Block {
    fn text(&self) -> String {
        match self {
            Self::Heading { children, .. } | Self::Paragraph(children) | Self::BlockQuote(children) => {
                text_of(children)
            }
            Self::HorizontalRule => String::new(),
            Self::List(list) => list.text(),
            Self::CodeBlock { content, .. } => content.clone(),
        }
    }

    fn render<R: LinkResolver>(&self, resolver: &R, out: &mut String) -> Result<(), R::Error> {
        match self {
            Self::Heading { level, children } => {
                let inner = render_all(children, resolver)?;
                write_tag(out, &format!("h{level}"), &[], &inner);
            }
            Self::Paragraph(children) => {
                let inner = render_all(children, resolver)?;
                write_tag(out, "p", &[], inner.trim_end());
            }
            Self::HorizontalRule => write_tag(out, "hr", &[], ""),
            Self::List(list) => list.render(resolver, out)?,
            Self::BlockQuote(children) => {
                let inner = render_all(children, resolver)?;
                write_tag(out, "blockquote", &[], &inner);
            }
            Self::CodeBlock { content, .. } => {
                let pre = crate::html::tag("pre", &[], &escape_angle_brackets(content));
                write_tag(out, "code", &[], &pre);
            }
        }
        Ok(())
    }

    fn write_tree(&self, depth: usize, out: &mut String) {
        match self {
            Self::Heading { level, children } => {
                write_children(&format!("Heading(level={level})"), children, depth, out);
            }
            Self::Paragraph(children) => write_children("Paragraph", children, depth, out),
            Self::HorizontalRule => {
                let _ = writeln!(out, "{}HorizontalRule", indent(depth));
            }
            Self::List(list) => list.write_tree(depth, out),
            Self::BlockQuote(children) => write_children("BlockQuote", children, depth, out),
            Self::CodeBlock { fenced, content } => {
                let _ = writeln!(
                    out,
                    "{}CodeBlock(fenced={fenced}, {content:?})",
                    indent(depth)
                );
            }
        }
    }
}

//! Inline parsing.
//!
//! [`parse_inline`] looks at the next characters and produces exactly one
//! [`Inline`] node, recursing into itself for wrapped spans. Triggers are
//! checked longest first:
//!
//! | Prefix          | Node              |
//! |-----------------|-------------------|
//! | `**` / `__`     | bold              |
//! | `~~`            | strike-out        |
//! | `![`            | image             |
//! | `*` / `_`       | italic            |
//! | `` ` ``         | inline code       |
//! | `[`             | anchor            |
//! | anything else   | plain text run    |

use crate::ParseError;
use crate::cursor::Cursor;
use crate::node::{EmphasisKind, Inline};

/// Parse a whole block's raw text into its inline children.
pub fn parse_inlines(text: &str) -> Result<Vec<Inline>, ParseError> {
    let mut cur = Cursor::new(text);
    let mut nodes = Vec::new();
    while !cur.eof() {
        nodes.push(parse_inline(&mut cur)?);
    }
    Ok(nodes)
}

/// Parse one inline node at the cursor.
pub fn parse_inline(cur: &mut Cursor<'_>) -> Result<Inline, ParseError> {
    if cur.starts_with("**") || cur.starts_with("__") {
        parse_emphasis(cur, EmphasisKind::Bold)
    } else if cur.starts_with("~~") {
        parse_emphasis(cur, EmphasisKind::StrikeOut)
    } else if cur.starts_with("![") {
        parse_image(cur)
    } else if cur.starts_with("*") || cur.starts_with("_") {
        parse_emphasis(cur, EmphasisKind::Italic)
    } else if cur.starts_with("`") {
        parse_code(cur)
    } else if cur.starts_with("[") {
        parse_anchor(cur)
    } else {
        Ok(parse_text(cur))
    }
}

fn at_trigger(cur: &Cursor<'_>) -> bool {
    matches!(cur.peek(), Some('*' | '_' | '`' | '[' | ']')) || cur.starts_with("![") || cur.starts_with("~~")
}

fn parse_text(cur: &mut Cursor<'_>) -> Inline {
    let mut text = String::new();
    // A `]` outside a link closes nothing and stays literal.
    if cur.peek() == Some(']') {
        cur.bump();
        text.push(']');
    }
    while !cur.eof() && !at_trigger(cur) {
        let Some(c) = cur.bump() else { break };
        if c.is_whitespace() {
            if !text.ends_with(' ') {
                text.push(' ');
            }
        } else {
            text.push(c);
        }
    }
    Inline::Text(text)
}

/// Parse a wrapper span. An unclosed wrapper runs to the end of the text.
fn parse_emphasis(cur: &mut Cursor<'_>, kind: EmphasisKind) -> Result<Inline, ParseError> {
    let len = kind.delimiter_len();
    let delimiter = &cur.rest()[..len];
    cur.bump_n(len);

    let mut children = Vec::new();
    while !cur.eof() {
        if cur.starts_with(delimiter) {
            cur.bump_n(len);
            break;
        }
        children.push(parse_inline(cur)?);
    }
    Ok(Inline::Emphasis { kind, children })
}

fn parse_code(cur: &mut Cursor<'_>) -> Result<Inline, ParseError> {
    cur.bump_n(1);
    let mut code = String::new();
    loop {
        match cur.expect("inline code")? {
            '`' => break,
            c => code.push(c),
        }
    }
    Ok(Inline::Code(code))
}

/// `[text](href)`: link text is inline-parsed, the target is raw.
fn parse_anchor(cur: &mut Cursor<'_>) -> Result<Inline, ParseError> {
    cur.bump_n(1);
    let mut children = Vec::new();
    loop {
        match cur.peek() {
            None => {
                return Err(ParseError::UnexpectedEnd {
                    construct: "link text",
                    offset: cur.pos(),
                });
            }
            Some(']') => {
                cur.bump();
                break;
            }
            Some(_) => children.push(parse_inline(cur)?),
        }
    }
    // The `(` opening the target.
    cur.expect("link target")?;

    let mut href = String::new();
    loop {
        match cur.expect("link target")? {
            ')' => break,
            c => href.push(c),
        }
    }
    Ok(Inline::Anchor { href, children })
}

/// `![alt](src "title")`.
///
/// Whitespace in the target is insignificant; anything after the closing
/// title quote is ignored.
fn parse_image(cur: &mut Cursor<'_>) -> Result<Inline, ParseError> {
    cur.bump_n(2);
    let mut alt: Option<String> = None;
    loop {
        match cur.expect("image alt text")? {
            ']' => break,
            c => alt.get_or_insert_with(String::new).push(c),
        }
    }
    cur.expect("image target")?;

    let mut src = String::new();
    let mut title: Option<String> = None;
    let mut in_title = false;
    let mut after_title = false;
    loop {
        let c = cur.expect("image target")?;
        if in_title {
            if c == '"' {
                in_title = false;
                after_title = true;
            } else {
                title.get_or_insert_with(String::new).push(c);
            }
        } else if c == ')' {
            break;
        } else if c == '"' {
            in_title = true;
        } else if !after_title && !c.is_whitespace() {
            src.push(c);
        }
    }
    Ok(Inline::Image { src, alt, title })
}

//! Block parsing.
//!
//! [`parse_block`] skips leading blank space and dispatches on the line-start
//! pattern, producing one [`Block`] and leaving the cursor at the start of the
//! next block. Text-bearing blocks collect their raw text first and then run
//! the inline parser over it.

use crate::ParseError;
use crate::cursor::Cursor;
use crate::inline::parse_inlines;
use crate::node::{Block, List, ListEntry, ListItem};

const CODE_INDENT: &str = "    ";
const FENCE: &str = "```";

/// Position just past a paragraph break at the cursor, if there is one.
///
/// A break is a newline followed by a line holding only non-newline
/// whitespace and then another newline.
pub(crate) fn paragraph_break(cur: &Cursor<'_>) -> Option<usize> {
    let after_newline = cur.rest().strip_prefix('\n')?;
    let blank = after_newline.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
    let skipped = after_newline.len() - blank.len();
    blank
        .starts_with('\n')
        .then_some(cur.pos() + 1 + skipped + 1)
}

/// Detect a list item marker (`* `, `- ` or `<digits>. `) after optional spaces.
///
/// Returns whether the list is ordered.
pub(crate) fn list_marker(rest: &str) -> Option<bool> {
    let s = rest.trim_start_matches(' ');
    if s.starts_with("* ") || s.starts_with("- ") {
        return Some(false);
    }
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    (digits > 0 && s[digits..].starts_with(". ")).then_some(true)
}

fn heading_level(rest: &str) -> Option<u8> {
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    if (1..=6).contains(&hashes) && rest[hashes..].starts_with(' ') {
        u8::try_from(hashes).ok()
    } else {
        None
    }
}

/// Parse one block, or `None` when only whitespace is left.
pub fn parse_block(cur: &mut Cursor<'_>) -> Result<Option<Block>, ParseError> {
    while cur.peek().is_some_and(char::is_whitespace) && !cur.starts_with(CODE_INDENT) {
        cur.bump();
    }
    if cur.eof() {
        return Ok(None);
    }

    let rest = cur.rest();
    let block = if let Some(ordered) = list_marker(rest) {
        Block::List(parse_list(cur, ordered, 0)?)
    } else if let Some(level) = heading_level(rest) {
        parse_heading(cur, level)?
    } else if rest.starts_with("---") {
        cur.skip_while(|c| c == '-');
        Block::HorizontalRule
    } else if rest.starts_with("> ") {
        parse_block_quote(cur)?
    } else if rest.starts_with(CODE_INDENT) {
        parse_indented_code(cur)
    } else if rest.starts_with(FENCE) {
        parse_fenced_code(cur)?
    } else {
        parse_paragraph(cur)?
    };
    Ok(Some(block))
}

fn parse_heading(cur: &mut Cursor<'_>, level: u8) -> Result<Block, ParseError> {
    cur.bump_n(usize::from(level));
    // separator
    cur.bump();
    let start = cur.pos();
    cur.skip_to_line_end();
    Ok(Block::Heading {
        level,
        children: parse_inlines(cur.slice_from(start))?,
    })
}

fn parse_paragraph(cur: &mut Cursor<'_>) -> Result<Block, ParseError> {
    let start = cur.pos();
    while !cur.eof() {
        if let Some(next) = paragraph_break(cur) {
            let text = cur.slice_from(start);
            cur.seek(next);
            return Ok(Block::Paragraph(parse_inlines(text)?));
        }
        cur.bump();
    }
    Ok(Block::Paragraph(parse_inlines(cur.slice_from(start))?))
}

/// Parse list items sitting at `depth` spaces of indentation.
///
/// Deeper items open a nested list; shallower items or a change of list kind
/// end this one. Only a top-level list consumes the paragraph break that ends
/// it, so enclosing lists see the break too.
fn parse_list(cur: &mut Cursor<'_>, ordered: bool, depth: usize) -> Result<List, ParseError> {
    let mut entries = Vec::new();
    loop {
        if let Some(next) = paragraph_break(cur) {
            if depth == 0 {
                cur.seek(next);
            }
            break;
        }

        let rest = cur.rest();
        let Some(item_ordered) = list_marker(rest) else {
            break;
        };
        let item_depth = rest.len() - rest.trim_start_matches(' ').len();

        if item_depth > depth {
            let nested = parse_list(cur, item_ordered, item_depth)?;
            entries.push(ListEntry::Nested(nested));
            continue;
        }
        if item_depth < depth || item_ordered != ordered {
            break;
        }

        cur.bump_n(item_depth);
        if ordered {
            cur.skip_while(|c| c.is_ascii_digit());
        }
        // marker character (`*`, `-` or `.`) and the space after it
        cur.bump_n(2);
        entries.push(ListEntry::Item(parse_list_item(cur)?));
    }
    Ok(List {
        ordered,
        depth,
        entries,
    })
}

/// Item text runs until a paragraph break or the next marker, which may sit
/// mid-line: `- a - b` is an item `a` followed by a nested item `b`.
fn parse_list_item(cur: &mut Cursor<'_>) -> Result<ListItem, ParseError> {
    let start = cur.pos();
    while !cur.eof() {
        if cur.pos() > start && list_marker(cur.rest()).is_some() {
            break;
        }
        if paragraph_break(cur).is_some() {
            break;
        }
        cur.bump();
    }
    Ok(ListItem {
        children: parse_inlines(cur.slice_from(start))?,
    })
}

/// `> ` lines. A following `\n> ` continues the quote: the marker is dropped but
/// the line break is kept, so the joined lines read as one soft-wrapped
/// paragraph. Any other newline ends the quote.
fn parse_block_quote(cur: &mut Cursor<'_>) -> Result<Block, ParseError> {
    cur.bump_n(2);
    let mut text = String::new();
    while let Some(c) = cur.peek() {
        if cur.starts_with("\n> ") {
            cur.bump_n(3);
            text.push('\n');
            continue;
        }
        if c == '\n' {
            break;
        }
        text.push(c);
        cur.bump();
    }
    Ok(Block::BlockQuote(parse_inlines(&text)?))
}

/// Lines indented by four spaces. End of input ends the last line.
fn parse_indented_code(cur: &mut Cursor<'_>) -> Block {
    cur.bump_n(CODE_INDENT.len());
    let mut content = String::new();
    loop {
        let start = cur.pos();
        cur.skip_to_line_end();
        content.push_str(cur.slice_from(start));
        if cur.eof() {
            break;
        }
        // newline
        cur.bump();
        if !cur.starts_with(CODE_INDENT) {
            break;
        }
        cur.bump_n(CODE_INDENT.len());
        content.push('\n');
    }
    Block::CodeBlock {
        fenced: false,
        content,
    }
}

/// Fenced block. The info string after the opening fence is ignored and the
/// block ends at a line starting with a fence.
fn parse_fenced_code(cur: &mut Cursor<'_>) -> Result<Block, ParseError> {
    cur.skip_to_line_end();
    cur.expect("code fence")?;

    let start = cur.pos();
    while !(cur.at_line_start() && cur.starts_with(FENCE)) {
        cur.expect("code fence")?;
    }
    let raw = cur.slice_from(start);
    let content = raw.strip_suffix('\n').unwrap_or(raw).to_owned();

    cur.bump_n(FENCE.len());
    cur.skip_to_line_end();
    Ok(Block::CodeBlock {
        fenced: true,
        content,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::{EmphasisKind, Inline};

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    fn item(s: &str) -> ListEntry {
        ListEntry::Item(ListItem {
            children: vec![text(s)],
        })
    }

    fn one_block(source: &str) -> Block {
        let mut cur = Cursor::new(source);
        parse_block(&mut cur).unwrap().unwrap()
    }

    #[test]
    fn test_paragraph_break_detection() {
        let cur = Cursor::new("\n  \t\nnext");
        assert_eq!(paragraph_break(&cur), Some(5));
        assert_eq!(paragraph_break(&Cursor::new("\nnext")), None);
        assert_eq!(paragraph_break(&Cursor::new("x\n\n")), None);
        assert_eq!(paragraph_break(&Cursor::new("\n   ")), None);
    }

    #[test]
    fn test_list_marker_detection() {
        assert_eq!(list_marker("- a"), Some(false));
        assert_eq!(list_marker("  * a"), Some(false));
        assert_eq!(list_marker("12. a"), Some(true));
        assert_eq!(list_marker("-a"), None);
        assert_eq!(list_marker("1.5"), None);
        assert_eq!(list_marker("word"), None);
        assert_eq!(list_marker(""), None);
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let source = format!("{} Title", "#".repeat(level.into()));
            assert_eq!(
                one_block(&source),
                Block::Heading {
                    level,
                    children: vec![text("Title")],
                }
            );
        }
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert!(matches!(one_block("####### no"), Block::Paragraph(_)));
        assert!(matches!(one_block("#tag"), Block::Paragraph(_)));
    }

    #[test]
    fn test_heading_stops_at_line_end() {
        let mut cur = Cursor::new("# One\nTwo");
        let block = parse_block(&mut cur).unwrap().unwrap();
        assert_eq!(
            block,
            Block::Heading {
                level: 1,
                children: vec![text("One")],
            }
        );
        assert_eq!(cur.rest(), "\nTwo");
    }

    #[test]
    fn test_paragraph_consumes_break() {
        let mut cur = Cursor::new("Hello **world**!\n\nNext");
        let block = parse_block(&mut cur).unwrap().unwrap();
        assert_eq!(
            block,
            Block::Paragraph(vec![
                text("Hello "),
                Inline::Emphasis {
                    kind: EmphasisKind::Bold,
                    children: vec![text("world")],
                },
                text("!"),
            ])
        );
        assert_eq!(cur.rest(), "Next");
    }

    #[test]
    fn test_horizontal_rule() {
        let mut cur = Cursor::new("-----\nafter");
        assert_eq!(parse_block(&mut cur).unwrap(), Some(Block::HorizontalRule));
        assert_eq!(cur.rest(), "\nafter");
    }

    #[test]
    fn test_nested_unordered_list() {
        assert_eq!(
            one_block("- a\n  - b\n- c"),
            Block::List(List {
                ordered: false,
                depth: 0,
                entries: vec![
                    item("a "),
                    ListEntry::Nested(List {
                        ordered: false,
                        depth: 2,
                        entries: vec![item("b ")],
                    }),
                    item("c"),
                ],
            })
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            one_block("1. one\n2. two\n10. ten"),
            Block::List(List {
                ordered: true,
                depth: 0,
                entries: vec![item("one "), item("two "), item("ten")],
            })
        );
    }

    #[test]
    fn test_list_kind_change_ends_list() {
        let mut cur = Cursor::new("- a\n1. b");
        let first = parse_block(&mut cur).unwrap().unwrap();
        assert_eq!(
            first,
            Block::List(List {
                ordered: false,
                depth: 0,
                entries: vec![item("a ")],
            })
        );
        assert_eq!(cur.rest(), "1. b");
    }

    #[test]
    fn test_list_ends_at_paragraph_break() {
        let mut cur = Cursor::new("- a\n  - b\n\nPara");
        let list = parse_block(&mut cur).unwrap().unwrap();
        let Block::List(list) = list else {
            panic!("expected list");
        };
        assert_eq!(list.entries.len(), 2);
        assert_eq!(cur.rest(), "Para");
    }

    #[test]
    fn test_marker_mid_line_starts_nested_list() {
        assert_eq!(
            one_block("- a - b"),
            Block::List(List {
                ordered: false,
                depth: 0,
                entries: vec![
                    item("a"),
                    ListEntry::Nested(List {
                        ordered: false,
                        depth: 1,
                        entries: vec![item("b")],
                    }),
                ],
            })
        );
    }

    #[test]
    fn test_list_item_lazy_continuation() {
        assert_eq!(
            one_block("- first\nstill first"),
            Block::List(List {
                ordered: false,
                depth: 0,
                entries: vec![item("first still first")],
            })
        );
    }

    #[test]
    fn test_block_quote_continuation() {
        assert_eq!(
            one_block("> one\n> two\nafter"),
            Block::BlockQuote(vec![text("one two")])
        );
    }

    #[test]
    fn test_block_quote_keeps_line_break_between_words() {
        let mut cur = Cursor::new("> one\n> two\nafter");
        assert_eq!(
            parse_block(&mut cur).unwrap(),
            Some(Block::BlockQuote(vec![text("one two")]))
        );
        assert_eq!(cur.rest(), "\nafter");
    }

    #[test]
    fn test_fenced_code_block() {
        let mut cur = Cursor::new("```rust\nfn main() {}\nlet a = 1;\n```\nafter");
        assert_eq!(
            parse_block(&mut cur).unwrap(),
            Some(Block::CodeBlock {
                fenced: true,
                content: "fn main() {}\nlet a = 1;".to_owned(),
            })
        );
        assert_eq!(cur.rest(), "\nafter");
    }

    #[test]
    fn test_empty_fenced_code_block() {
        assert_eq!(
            one_block("```\n```"),
            Block::CodeBlock {
                fenced: true,
                content: String::new(),
            }
        );
    }

    #[test]
    fn test_unterminated_fence_is_error() {
        let mut cur = Cursor::new("```\ncode");
        assert!(matches!(
            parse_block(&mut cur),
            Err(ParseError::UnexpectedEnd {
                construct: "code fence",
                ..
            })
        ));
    }

    #[test]
    fn test_indented_code_block() {
        let mut cur = Cursor::new("    a < b\n    c\nafter");
        assert_eq!(
            parse_block(&mut cur).unwrap(),
            Some(Block::CodeBlock {
                fenced: false,
                content: "a < b\nc".to_owned(),
            })
        );
        assert_eq!(cur.rest(), "after");
    }

    #[test]
    fn test_indented_code_block_at_end_of_input() {
        assert_eq!(
            one_block("    last line"),
            Block::CodeBlock {
                fenced: false,
                content: "last line".to_owned(),
            }
        );
        assert_eq!(
            one_block("    last line\n"),
            Block::CodeBlock {
                fenced: false,
                content: "last line".to_owned(),
            }
        );
    }

    #[test]
    fn test_only_whitespace_yields_no_block() {
        let mut cur = Cursor::new("\n\n  \n");
        assert_eq!(parse_block(&mut cur).unwrap(), None);
        assert!(cur.eof());
    }
}

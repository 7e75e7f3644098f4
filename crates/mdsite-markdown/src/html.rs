//! Text utilities: debug-tree indentation and HTML tag emission.

use std::borrow::Cow;

/// Elements emitted without content or closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "hr", "meta", "link"];

/// Indentation for one level of the debug tree dump (four spaces per level).
#[must_use]
pub fn indent(depth: usize) -> String {
    " ".repeat(4 * depth)
}

/// Append an HTML element to `out`.
///
/// Void elements (`img`, `hr`, `meta`, `link`) are written as a bare opening
/// tag and `content` is ignored. Attribute values are quoted and escaped.
pub fn write_tag(out: &mut String, tag: &str, attrs: &[(&str, &str)], content: &str) {
    out.push('<');
    out.push_str(tag);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }

    out.push_str(content);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Build an HTML element as a new string. See [`write_tag`].
///
/// # Examples
///
/// ```
/// use mdsite_markdown::tag;
///
/// assert_eq!(tag("p", &[], "hi"), "<p>hi</p>");
/// assert_eq!(tag("hr", &[], ""), "<hr>");
/// assert_eq!(tag("a", &[("href", "x.html")], "x"), r#"<a href="x.html">x</a>"#);
/// ```
#[must_use]
pub fn tag(tag: &str, attrs: &[(&str, &str)], content: &str) -> String {
    let mut out = String::new();
    write_tag(&mut out, tag, attrs, content);
    out
}

/// Replace `<` and `>` with entities. Used for code content only.
#[must_use]
pub fn escape_angle_brackets(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('<', "&lt;").replace('>', "&gt;"))
}

/// Escape text for use inside a double-quoted attribute value.
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('&', "&amp;").replace('"', "&quot;"))
}

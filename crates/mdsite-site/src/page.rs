//! HTML document shell around a rendered page.

use std::borrow::Cow;

/// Wrap page markup in a complete HTML document.
pub(crate) fn render_page(title: &str, styles: &str, body: &str) -> String {
    let title = escape_text(title);
    let mut html = String::with_capacity(body.len() + styles.len() + title.len() + 96);
    html.push_str("<!doctype html><html><head><title>");
    html.push_str(&title);
    html.push_str("</title><meta charset=\"utf-8\">");
    html.push_str(styles);
    html.push_str("</head><body>");
    html.push_str(body);
    html.push_str("</body></html>");
    html
}

fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_page_shell() {
        assert_eq!(
            render_page("Home", "<link>", "<p>x</p>"),
            "<!doctype html><html><head><title>Home</title><meta charset=\"utf-8\"><link></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_page("a < b & c", "", "");
        assert!(html.contains("<title>a &lt; b &amp; c</title>"));
    }
}

//! Markdown-lite: the restricted five-rule substitution scheme used for
//! assistant replies. Not a markdown parser; each rule is a straight
//! regex substitution and the order is load-bearing (bold must run before
//! italic, headings before line breaks).

use std::sync::LazyLock;

use regex::Regex;

static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|(.+)\|").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,3} (.+)$").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Escape HTML-significant characters so raw reply text can never smuggle
/// live markup past the substitutions below. This makes the renderer the
/// single sanitization point for the transcript export.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one message's content to an HTML fragment. Applied exactly once
/// per message; the output is final markup for the export surface.
pub fn render_html(content: &str) -> String {
    let escaped = escape_html(content);
    let with_tables = TABLE_ROW_RE.replace_all(&escaped, "<span class=\"table-row\">${0}</span>");
    let with_bold = BOLD_RE.replace_all(&with_tables, "<strong>${1}</strong>");
    let with_italic = ITALIC_RE.replace_all(&with_bold, "<em>${1}</em>");
    let with_headings = HEADING_RE.replace_all(&with_italic, "<span class=\"heading\">${1}</span>");
    let with_links = LINK_RE.replace_all(
        &with_headings,
        "<a href=\"${2}\" target=\"_blank\" rel=\"noopener noreferrer\">${1}</a>",
    );
    with_links.replace('\n', "<br />")
}

/// Inline emphasis segments of a single line, for the terminal transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Plain(String),
    Bold(String),
    Italic(String),
    Link { label: String, url: String },
}

/// Structural shape of a single line of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading(String),
    TableRow(String),
    Text(Vec<Inline>),
}

/// Classify one line and split out inline emphasis, mirroring the HTML
/// rule order: table rows and headings claim the whole line, then links,
/// then bold before italic.
pub fn parse_line(line: &str) -> LineKind {
    if let Some(caps) = HEADING_RE.captures(line) {
        return LineKind::Heading(caps[1].to_string());
    }
    if TABLE_ROW_RE.is_match(line) {
        return LineKind::TableRow(line.to_string());
    }
    LineKind::Text(parse_inline(line))
}

fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in LINK_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > cursor {
            parse_emphasis(&text[cursor..whole.start()], &mut out);
        }
        out.push(Inline::Link {
            label: caps[1].to_string(),
            url: caps[2].to_string(),
        });
        cursor = whole.end();
    }
    if cursor < text.len() {
        parse_emphasis(&text[cursor..], &mut out);
    }
    out
}

fn parse_emphasis(text: &str, out: &mut Vec<Inline>) {
    let mut cursor = 0;
    for caps in BOLD_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > cursor {
            parse_italic(&text[cursor..whole.start()], out);
        }
        out.push(Inline::Bold(caps[1].to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        parse_italic(&text[cursor..], out);
    }
}

fn parse_italic(text: &str, out: &mut Vec<Inline>) {
    let mut cursor = 0;
    for caps in ITALIC_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > cursor {
            out.push(Inline::Plain(text[cursor..whole.start()].to_string()));
        }
        out.push(Inline::Italic(caps[1].to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        out.push(Inline::Plain(text[cursor..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_then_italic_in_order() {
        let html = render_html("**Go** to *Paris*");
        assert_eq!(html, "<strong>Go</strong> to <em>Paris</em>");
        let bold_at = html.find("<strong>Go</strong>").unwrap();
        let italic_at = html.find("<em>Paris</em>").unwrap();
        assert!(bold_at < italic_at);
    }

    #[test]
    fn bold_is_not_eaten_by_italic() {
        assert_eq!(render_html("**x**"), "<strong>x</strong>");
        assert_eq!(render_html("*x*"), "<em>x</em>");
    }

    #[test]
    fn heading_then_line_break() {
        assert_eq!(
            render_html("# Plan\nDetails"),
            "<span class=\"heading\">Plan</span><br />Details"
        );
    }

    #[test]
    fn heading_strips_up_to_three_markers() {
        assert_eq!(
            render_html("### Day 3"),
            "<span class=\"heading\">Day 3</span>"
        );
    }

    #[test]
    fn link_opens_a_safe_new_context() {
        assert_eq!(
            render_html("[here](https://x)"),
            "<a href=\"https://x\" target=\"_blank\" rel=\"noopener noreferrer\">here</a>"
        );
    }

    #[test]
    fn table_row_is_wrapped_whole() {
        assert_eq!(
            render_html("| a | b |"),
            "<span class=\"table-row\">| a | b |</span>"
        );
    }

    #[test]
    fn raw_markup_is_escaped_before_substitution() {
        let html = render_html("<script>alert('hi')</script> & **bold**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(render_html("a\nb\nc"), "a<br />b<br />c");
    }

    #[test]
    fn parse_line_classifies_structure() {
        assert_eq!(
            parse_line("## Budget"),
            LineKind::Heading("Budget".to_string())
        );
        assert_eq!(
            parse_line("| day | cost |"),
            LineKind::TableRow("| day | cost |".to_string())
        );
        assert_eq!(
            parse_line("**Go** to *Paris* via [here](https://x)"),
            LineKind::Text(vec![
                Inline::Bold("Go".to_string()),
                Inline::Plain(" to ".to_string()),
                Inline::Italic("Paris".to_string()),
                Inline::Plain(" via ".to_string()),
                Inline::Link {
                    label: "here".to_string(),
                    url: "https://x".to_string(),
                },
            ])
        );
    }
}

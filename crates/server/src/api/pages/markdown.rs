use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Renders post text as Markdown. Raw HTML in the source is escaped rather
/// than passed through, and links or images with a scriptable scheme point
/// at `#` instead.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Keeps relative destinations and http(s)/mailto URLs.
fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    // browsers drop whitespace and control characters inside a scheme
    let compact: String = dest
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_control())
        .collect();
    let scheme_end = compact.find(':');
    let path_start = compact.find(['/', '?', '#']);

    let allowed = match (scheme_end, path_start) {
        (None, _) => true,
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = compact[..colon].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
    };

    if allowed { dest } else { CowStr::Borrowed("#") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Hello\n\nThis is **bold** text.");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("Hi <script>alert(1)</script>\n\n<div>block</div>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<div>"));
    }

    #[test]
    fn test_script_links_are_neutralized() {
        let html = render_markdown("[click](javascript:alert(document.cookie))");
        assert_eq!(html, "<p><a href=\"#\">click</a></p>\n");

        let html = render_markdown("[x](JavaScript:alert(1)) ![img](data:text/html;base64,AAAA)");
        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(!html.contains("data:"));
    }

    #[test]
    fn test_web_and_relative_links_are_kept() {
        let html = render_markdown(
            "[a](https://example.com/x) [b](/startup/jambon/) [c](mailto:team@example.com) [d](page?q=a:b)",
        );
        assert!(html.contains(r#"href="https://example.com/x""#));
        assert!(html.contains(r#"href="/startup/jambon/""#));
        assert!(html.contains(r#"href="mailto:team@example.com""#));
        assert!(html.contains(r#"href="page?q=a:b""#));
    }
}

use std::sync::OnceLock;

use regex::Regex;

/// A piece of message content: either plain text or a detected link.
///
/// `text` is always the token exactly as the user or the bot wrote it;
/// `href` is the navigable target (`www.` tokens get `http://` prepended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { href: String, text: String },
}

// Bare URL tokens: http(s) or www.-prefixed, up to whitespace or a quoting
// character.
fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r#"(?:https?://|www\.)[^\s<>"']+"#).expect("url pattern compiles"))
}

/// Split message content into plain-text and link segments.
///
/// Non-URL text passes through untouched; it never produces a link segment.
pub fn linkify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in url_pattern().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }

        let token = m.as_str();
        let href = if token.starts_with("www.") {
            format!("http://{}", token)
        } else {
            token.to_string()
        };
        segments.push(Segment::Link {
            href,
            text: token.to_string(),
        });

        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str, text: &str) -> Segment {
        Segment::Link {
            href: href.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn plain_text_has_no_links() {
        let segments = linkify("just a normal sentence, no address here.");
        assert_eq!(
            segments,
            vec![Segment::Text(
                "just a normal sentence, no address here.".to_string()
            )]
        );
    }

    #[test]
    fn https_token_becomes_link_embedded_in_text() {
        let segments = linkify("check https://example.com/x please");
        assert_eq!(
            segments,
            vec![
                Segment::Text("check ".to_string()),
                link("https://example.com/x", "https://example.com/x"),
                Segment::Text(" please".to_string()),
            ]
        );
    }

    #[test]
    fn www_token_gets_http_href_but_keeps_visible_text() {
        let segments = linkify("see www.example.org/docs");
        assert_eq!(
            segments,
            vec![
                Segment::Text("see ".to_string()),
                link("http://www.example.org/docs", "www.example.org/docs"),
            ]
        );
    }

    #[test]
    fn http_token_is_kept_as_is() {
        let segments = linkify("http://example.com");
        assert_eq!(segments, vec![link("http://example.com", "http://example.com")]);
    }

    #[test]
    fn quoting_characters_terminate_the_token() {
        let segments = linkify(r#"go to "https://example.com/a"now"#);
        assert_eq!(
            segments,
            vec![
                Segment::Text("go to \"".to_string()),
                link("https://example.com/a", "https://example.com/a"),
                Segment::Text("\"now".to_string()),
            ]
        );
    }

    #[test]
    fn multiple_links_in_one_line() {
        let segments = linkify("a https://one.test b www.two.test c");
        assert_eq!(
            segments,
            vec![
                Segment::Text("a ".to_string()),
                link("https://one.test", "https://one.test"),
                Segment::Text(" b ".to_string()),
                link("http://www.two.test", "www.two.test"),
                Segment::Text(" c".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(linkify("").is_empty());
    }
}

use scraper::{ElementRef, Html};
use std::borrow::Cow;

/// Elements whose boundaries become line breaks in a plain-text snippet.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote", "pre",
];

/// Elements whose content never belongs in a snippet.
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
}

/// Returns true if `s` contains an ASCII control character other than tab,
/// newline or carriage return.
pub fn contains_control_chars(s: &str) -> bool {
    s.bytes().any(is_stripped_control)
}

/// Removes ASCII control characters (keeping tab, newline, CR).
///
/// Returns `Cow::Borrowed` when there is nothing to strip, which is the common case
/// for feed text.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !contains_control_chars(s) {
        return Cow::Borrowed(s);
    }
    // Control bytes are ASCII, so filtering by char never splits a codepoint
    Cow::Owned(
        s.chars()
            .filter(|&c| !(c.is_ascii() && is_stripped_control(c as u8)))
            .collect(),
    )
}

/// Converts an HTML fragment from a feed body into a plain-text snippet.
///
/// The fragment is parsed with `scraper`, so every HTML entity is decoded and
/// comments, `<script>` and `<style>` bodies are dropped. Block-level elements
/// become line breaks; control characters are removed and the result trimmed.
/// Text without markup or entities passes through unchanged apart from trimming.
///
/// # Examples
///
/// ```
/// use jobfeed::util::html_to_snippet;
///
/// assert_eq!(html_to_snippet("<p>Rust &amp; Go</p>"), "Rust & Go");
/// assert_eq!(html_to_snippet("  plain  "), "plain");
/// ```
pub fn html_to_snippet(html: &str) -> String {
    let html = strip_control_chars(html);
    if !html.contains(['<', '&']) {
        return html.trim().to_string();
    }

    let fragment = Html::parse_fragment(&html);
    let mut out = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut out);
    strip_control_chars(&out).trim().to_string()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        if SKIPPED_TAGS.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = BLOCK_TAGS.contains(&name);
        if block {
            out.push('\n');
        }
        collect_text(child, out);
        if block {
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(html_to_snippet("Remote Rust role"), "Remote Rust role");
    }

    #[test]
    fn test_inline_tags_removed() {
        assert_eq!(
            html_to_snippet("We use <strong>Rust</strong> and <a href=\"x\">Go</a>"),
            "We use Rust and Go"
        );
    }

    #[test]
    fn test_block_tags_become_newlines() {
        assert_eq!(html_to_snippet("<p>One</p><p>Two</p>"), "One\n\nTwo");
        assert_eq!(html_to_snippet("a<br/>b<BR>c"), "a\nb\nc");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            html_to_snippet("R&amp;D &lt;team&gt; &quot;hi&quot; &#39;x&#39; &#x41;"),
            "R&D <team> \"hi\" 'x' A"
        );
    }

    #[test]
    fn test_named_entities_decoded() {
        assert_eq!(
            html_to_snippet("Caf&eacute; &ndash; we&rsquo;re hiring &hellip;"),
            "Café – we’re hiring …"
        );
    }

    #[test]
    fn test_comments_and_scripts_dropped() {
        assert_eq!(
            html_to_snippet("<!-- tracking --><p>Apply now</p><script>var x = '<b>';</script>"),
            "Apply now"
        );
    }

    #[test]
    fn test_angle_bracket_inside_attribute() {
        assert_eq!(
            html_to_snippet(r#"<a title="a > b" href="x">Details</a> inside"#),
            "Details inside"
        );
    }

    #[test]
    fn test_unknown_entity_left_alone() {
        assert_eq!(html_to_snippet("AT&T &bogus; ok"), "AT&T &bogus; ok");
    }

    #[test]
    fn test_unterminated_tag_kept() {
        assert_eq!(html_to_snippet("salary < 100k"), "salary < 100k");
    }

    #[test]
    fn test_control_chars_removed() {
        assert_eq!(html_to_snippet("he\x00llo\x07"), "hello");
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "line1\nline2\ttabbed\r\n";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_removes_del_and_nul() {
        assert_eq!(strip_control_chars("de\x7fle\x00te"), "delete");
    }

    #[test]
    fn test_contains_control_chars() {
        assert!(contains_control_chars("bad\x1bquery"));
        assert!(!contains_control_chars("react developer"));
        assert!(!contains_control_chars("日本語"));
    }
}

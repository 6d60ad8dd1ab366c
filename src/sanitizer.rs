use std::collections::{HashMap, HashSet};
use std::fmt;

use ammonia::Builder;

use crate::{Tainted, Verified};

/// Elements that survive sanitization. Everything else is unwrapped: the
/// element goes, its text stays.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "b", "br", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "i", "img", "li", "ol", "p", "pre", "q", "s", "small", "strike", "span",
    "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt", "u", "ul",
];

/// Attributes that survive sanitization, per element. Elements not listed
/// here keep no attributes at all.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "title"]),
    ("img", &["src", "alt", "width", "height"]),
];

// Stripping a container can leave markup that the HTML parser restructures
// on the next parse (a `div` promoted into a `p`, say). Re-cleaning settles
// it; two passes are enough in practice.
const MAX_PASSES: usize = 4;

/// Trait for turning tainted rich text into verified, safe-to-render text.
///
/// Sanitizers never fail: the worst case is maximal stripping down to plain
/// text. Implementations must be deterministic and idempotent.
///
/// # Examples
///
/// ```
/// use blog_policy::{HtmlSanitizer, Sanitizer, Tainted};
///
/// let sanitizer = HtmlSanitizer::new();
/// let body = Tainted::new("<p onclick=\"x()\">Hi</p>".to_string());
///
/// let verified = sanitizer.sanitize(body);
/// assert_eq!(verified.as_ref(), "<p>Hi</p>");
/// ```
pub trait Sanitizer<T> {
    /// Sanitizes a tainted value.
    fn sanitize(&self, input: Tainted<T>) -> Verified<T>;
}

/// Allow-list HTML sanitizer for post bodies and comments.
///
/// Built on [`ammonia`], configured so that:
/// - only [`ALLOWED_TAGS`] and [`ALLOWED_ATTRIBUTES`] survive
/// - disallowed elements are unwrapped, keeping their inner text (including
///   the text of `<script>` and `<style>`, which is escaped)
/// - no `rel` attribute is injected into links
/// - comments are removed and link/image URLs keep only safe schemes
///
/// `HtmlSanitizer` holds no mutable state and is `Send + Sync`.
pub struct HtmlSanitizer {
    cleaner: Builder<'static>,
}

impl HtmlSanitizer {
    /// Creates a sanitizer with the blog's allow-list.
    pub fn new() -> Self {
        let tags: HashSet<&'static str> = ALLOWED_TAGS.iter().copied().collect();
        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
            .collect();

        let mut cleaner = Builder::default();
        cleaner
            .tags(tags)
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            .clean_content_tags(HashSet::new())
            .link_rel(None)
            .strip_comments(true);

        Self { cleaner }
    }

    /// Sanitizes a raw string.
    pub fn clean(&self, raw: &str) -> String {
        let mut current = self.cleaner.clean(raw).to_string();
        for _ in 1..MAX_PASSES {
            let next = self.cleaner.clean(&current).to_string();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlSanitizer")
            .field("tags", &ALLOWED_TAGS.len())
            .finish()
    }
}

impl Sanitizer<String> for HtmlSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Verified<String> {
        let raw = input.into_inner();
        let cleaned = self.clean(&raw);
        if cleaned.len() != raw.len() {
            tracing::trace!(
                raw_len = raw.len(),
                clean_len = cleaned.len(),
                "sanitizer stripped markup"
            );
        }
        Verified::new_unchecked(cleaned)
    }
}

/// Sanitizes `raw` with the blog allow-list.
///
/// # Examples
///
/// ```
/// use blog_policy::sanitize;
///
/// assert_eq!(
///     sanitize("<p>Hello <script>alert(1)</script> <b>world</b></p>"),
///     "<p>Hello alert(1) <b>world</b></p>",
/// );
/// ```
pub fn sanitize(raw: &str) -> String {
    HtmlSanitizer::new().clean(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_unwrapped_keeping_text() {
        assert_eq!(
            sanitize("<p>Hello <script>alert(1)</script> <b>world</b></p>"),
            "<p>Hello alert(1) <b>world</b></p>"
        );
    }

    #[test]
    fn event_handler_attribute_is_stripped() {
        assert_eq!(
            sanitize(r#"<a href="http://x.com" onclick="evil()">link</a>"#),
            r#"<a href="http://x.com">link</a>"#
        );
    }

    #[test]
    fn link_attributes_are_kept() {
        let out = sanitize(r#"<a href="https://blog.example/" target="_blank" title="home">x</a>"#);
        assert!(out.contains(r#"href="https://blog.example/""#));
        assert!(out.contains(r#"target="_blank""#));
        assert!(out.contains(r#"title="home""#));
        assert!(!out.contains("rel="));
    }

    #[test]
    fn image_attributes_are_kept_and_handlers_dropped() {
        let out = sanitize(r#"<img src="/cat.png" alt="cat" width="10" height="20" onerror="x()">"#);
        assert!(out.starts_with("<img"));
        assert!(out.contains(r#"src="/cat.png""#));
        assert!(out.contains(r#"alt="cat""#));
        assert!(out.contains(r#"width="10""#));
        assert!(out.contains(r#"height="20""#));
        assert!(!out.contains("onerror"));
    }

    #[test]
    fn attributes_on_other_allowed_elements_are_dropped() {
        assert_eq!(
            sanitize(r#"<p class="lead" style="color:red" title="t">x</p>"#),
            "<p>x</p>"
        );
        assert_eq!(sanitize(r#"<span id="s">y</span>"#), "<span>y</span>");
    }

    #[test]
    fn unknown_elements_are_unwrapped() {
        assert_eq!(
            sanitize("<article><section>Deep <b>text</b></section></article>"),
            "Deep <b>text</b>"
        );
    }

    #[test]
    fn javascript_urls_are_dropped() {
        assert_eq!(
            sanitize(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
    }

    #[test]
    fn comments_are_removed() {
        assert_eq!(sanitize("a<!-- secret -->b"), "ab");
    }

    #[test]
    fn malformed_markup_degrades_to_text() {
        let out = sanitize("<p>unclosed <b>bold");
        assert_eq!(out, "<p>unclosed <b>bold</b></p>");

        let out = sanitize("1 < 2 & 3 > 2");
        assert_eq!(out, "1 &lt; 2 &amp; 3 &gt; 2");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(sanitize("just words"), "just words");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn every_allowed_tag_survives() {
        for tag in ALLOWED_TAGS {
            let input = match *tag {
                "br" | "hr" | "img" => format!("<{tag}>"),
                "table" | "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" => continue,
                _ => format!("<{tag}>x</{tag}>"),
            };
            let out = sanitize(&input);
            assert!(out.contains(&format!("<{tag}")), "{tag} was stripped: {out}");
        }
    }

    #[test]
    fn tables_survive() {
        let input = "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>d</td></tr></tbody><tfoot><tr><td>f</td></tr></tfoot></table>";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn promoted_block_settles_on_first_call() {
        let once = sanitize("<p><object><div>x</div></object></p>");
        assert_eq!(sanitize(&once), once);
        assert!(!once.contains("object"));
    }

    #[test]
    fn sanitizer_trait_wraps_verified() {
        let sanitizer = HtmlSanitizer::default();
        let verified = sanitizer.sanitize(Tainted::new("<iframe>x</iframe>".to_string()));
        assert_eq!(verified.into_inner(), "x");
    }

    #[test]
    fn sanitizer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HtmlSanitizer>();
    }
}

use crate::utils::{collapse_whitespace, truncate_chars};
use regex::Regex;
use std::sync::LazyLock;

/// Default cap on page text handed to analysis
pub const DEFAULT_PAGE_TEXT_CAP: usize = 3000;

static HTML_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static HEADING_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#[ \t]+(.+?)[ \t#]*$").unwrap());

static NON_CONTENT_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<head\b.*?</head>",
    )
    .unwrap()
});

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```|~~~.*?~~~").unwrap());

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]*`").unwrap());

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]*").unwrap());

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>+[ \t]?").unwrap());

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([-*_][ \t]*){3,}$").unwrap());

static BOLD_STARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static BOLD_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());

static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+)_\b").unwrap());

/// `&amp;` goes last so decoded text is never decoded twice
const ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// First `<title>` element, else the first `# Heading` line
pub fn extract_title(source: &str) -> Option<String> {
    if let Some(caps) = HTML_TITLE.captures(source) {
        let title = collapse_whitespace(&decode_entities(&caps[1]));
        if !title.is_empty() {
            return Some(title);
        }
    }

    // Comment lines inside code blocks look like headings
    let prose = FENCED_CODE.replace_all(source, " ");
    HEADING_TITLE
        .captures(&prose)
        .map(|caps| collapse_whitespace(&caps[1]))
        .filter(|t| !t.is_empty())
}

/// Reduces markdown or markup to plain text, keeping the inner text of
/// formatting markers and dropping code and script blocks
pub fn clean_text(source: &str) -> String {
    let text = NON_CONTENT_BLOCKS.replace_all(source, " ");
    let text = FENCED_CODE.replace_all(&text, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = IMAGE.replace_all(&text, "${1}");
    let text = LINK.replace_all(&text, "${1}");
    let text = TAG.replace_all(&text, " ");
    let text = HORIZONTAL_RULE.replace_all(&text, " ");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = BOLD_STARS.replace_all(&text, "${1}");
    let text = BOLD_UNDERSCORES.replace_all(&text, "${1}");
    let text = ITALIC_STAR.replace_all(&text, "${1}");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "${1}");

    collapse_whitespace(&decode_entities(&text))
}

/// Decodes the handful of entities that show up in rendered markdown
pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, decoded)| {
            acc.replace(entity, decoded)
        })
}

/// Caps text at `cap` characters, appending `...` when it was longer
pub fn bound_text(text: &str, cap: usize) -> String {
    truncate_chars(text, cap)
}

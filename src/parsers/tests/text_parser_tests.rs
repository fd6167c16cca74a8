use crate::parsers::text;

#[test]
fn test_title_from_html_title_element() {
    let source = "<html><head><TITLE>Docs &amp; Guides</TITLE></head><body># Not this</body></html>";
    assert_eq!(text::extract_title(source).as_deref(), Some("Docs & Guides"));
}

#[test]
fn test_title_from_heading_line() {
    let source = "Intro paragraph\n\n# Main Heading #\n\n## Sub heading";
    assert_eq!(text::extract_title(source).as_deref(), Some("Main Heading"));
}

#[test]
fn test_title_skips_comments_in_code_blocks() {
    let source = "```sh\n# install the toolchain\ncurl example.com | sh\n```\n\n# Getting Started\n";
    assert_eq!(text::extract_title(source).as_deref(), Some("Getting Started"));

    let source = "~~~python\n# not a title\n~~~\nNo heading outside the block";
    assert_eq!(text::extract_title(source), None);
}

#[test]
fn test_title_absent() {
    assert_eq!(text::extract_title("No heading here\n## Only level two"), None);
    assert_eq!(text::extract_title("#hashtag is not a heading"), None);
    assert_eq!(text::extract_title("<title>   </title>"), None);
}

#[test]
fn test_clean_text_strips_code() {
    let source = "Before\n```rust\nfn main() {}\n```\nafter `inline()` end";
    assert_eq!(text::clean_text(source), "Before after end");
}

#[test]
fn test_clean_text_strips_scripts_and_tags() {
    let source =
        "<div>Hello <em>there</em></div><script>alert('x')</script><style>p{}</style><p>World</p>";
    assert_eq!(text::clean_text(source), "Hello there World");
}

#[test]
fn test_clean_text_keeps_inner_text_of_markers() {
    let source = "## Section\n\n> quoted **bold** and *italic* and __strong__ and _em_\n\n---\n\n![diagram](/d.png) see [the guide](https://example.com/guide)";
    assert_eq!(
        text::clean_text(source),
        "Section quoted bold and italic and strong and em diagram see the guide"
    );
}

#[test]
fn test_clean_text_keeps_snake_case() {
    assert_eq!(text::clean_text("call max_links_per_page"), "call max_links_per_page");
}

#[test]
fn test_decode_entities() {
    assert_eq!(
        text::decode_entities("a &lt;b&gt; &quot;c&quot; &#39;d&apos;&nbsp;&amp;"),
        "a <b> \"c\" 'd' &"
    );
    // Decoding happens once
    assert_eq!(text::decode_entities("&amp;lt;"), "&lt;");
}

#[test]
fn test_bound_text() {
    assert_eq!(text::bound_text("short", 3000), "short");
    let long = "a".repeat(3001);
    let bounded = text::bound_text(&long, 3000);
    assert_eq!(bounded.len(), 3003);
    assert!(bounded.ends_with("..."));
}

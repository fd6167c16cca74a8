use crate::filter::UrlFilter;
use crate::parsers::links::{LinkSet, classify, display_text_from_url, from_url_list};
use crate::results::LinkType;
use url::Url;

fn base() -> Url {
    Url::parse("https://www.example.com/docs/intro").unwrap()
}

#[test]
fn test_display_text_from_path_segment() {
    assert_eq!(
        display_text_from_url("https://example.com/docs/getting-started.html"),
        "Getting Started"
    );
    assert_eq!(
        display_text_from_url("https://example.com/api_reference/"),
        "Api Reference"
    );
    assert_eq!(
        display_text_from_url("https://example.com/blog/2024/rust-async_tips?page=2"),
        "Rust Async Tips"
    );
}

#[test]
fn test_display_text_falls_back_to_host() {
    assert_eq!(display_text_from_url("https://www.example.com/"), "example.com");
    assert_eq!(display_text_from_url("https://docs.rs"), "docs.rs");
}

#[test]
fn test_display_text_for_unparseable_url() {
    assert_eq!(display_text_from_url("not a url"), "not a url");

    let long = format!("relative/{}", "x".repeat(80));
    let text = display_text_from_url(&long);
    assert_eq!(text.chars().count(), 53);
    assert!(text.starts_with("relative/xxx"));
    assert!(text.ends_with("..."));
}

#[test]
fn test_from_url_list_filters_resolves_and_dedups() {
    let urls = vec![
        "/pricing".to_string(),
        "https://www.example.com/pricing".to_string(),
        "#top".to_string(),
        "tel:123".to_string(),
        "/downloads/manual.pdf".to_string(),
        "tutorial".to_string(),
        "https://github.com/example/repo".to_string(),
        "https://example.com/about".to_string(),
        "   ".to_string(),
    ];
    let links = from_url_list(&urls, &base(), &UrlFilter::default());

    let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://www.example.com/pricing",
            "https://www.example.com/docs/tutorial",
            "https://github.com/example/repo",
            "https://example.com/about",
        ]
    );

    assert_eq!(links[0].link_type, LinkType::Internal);
    assert_eq!(links[1].link_type, LinkType::Internal);
    assert_eq!(links[2].link_type, LinkType::External);
    // `example.com` is not `www.example.com`
    assert_eq!(links[3].link_type, LinkType::External);

    assert_eq!(links[1].text, "Tutorial");
    assert_eq!(links[2].text, "Repo");
}

#[test]
fn test_link_set_first_occurrence_wins() {
    let mut set = LinkSet::new(&base());

    assert!(set.push("https://www.example.com/a".to_string(), "First".to_string()));
    assert!(!set.push("https://www.example.com/a".to_string(), "Second".to_string()));
    assert!(set.push("https://www.example.com/b".to_string(), "B".to_string()));
    assert!(!set.push("not absolute".to_string(), "Bad".to_string()));

    let links = set.into_links();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].text, "First");
}

#[test]
fn test_classify() {
    let url = Url::parse("https://example.com/x").unwrap();
    assert_eq!(classify(&url, Some("example.com")), LinkType::Internal);
    assert_eq!(classify(&url, Some("blog.example.com")), LinkType::External);
    assert_eq!(classify(&url, None), LinkType::External);
}

use crate::config::AnalyzerConfig;
use crate::results::{ExtractedContent, Link};
use crate::utils::truncate_chars;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = r#"You are an expert web content analyst. You help users find the links on a web page that best answer their question.

Your role:
- Understand what the user is actually looking for, including implied intent
- Judge each link by its text, its URL and the context of the page
- Prefer links that lead directly to the requested information
- Be strict: navigation, legal and social links are rarely relevant

Always respond with valid JSON only. Do not add commentary before or after the JSON."#;

/// Builds the user prompt enumerating the bounded links for scoring
pub fn build_prompt(
    query: &str,
    content: &ExtractedContent,
    links: &[Link],
    config: &AnalyzerConfig,
) -> String {
    let mut prompt = String::with_capacity(2048 + links.len() * 128);

    let _ = writeln!(prompt, "USER QUERY: \"{}\"", query);
    prompt.push('\n');

    prompt.push_str("PAGE CONTEXT:\n");
    let _ = writeln!(
        prompt,
        "- Title: {}",
        content.title.as_deref().unwrap_or("Untitled")
    );
    let _ = writeln!(
        prompt,
        "- Content excerpt: {}",
        truncate_chars(&content.page_text, config.excerpt_chars)
    );
    let _ = writeln!(prompt, "- Total links on page: {}", content.links.len());
    prompt.push('\n');

    prompt.push_str("LINKS TO ANALYZE:\n");
    for (i, link) in links.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. [{}] {}\n   URL: {}",
            i + 1,
            link.link_type.as_str(),
            link.text,
            link.url
        );
    }
    prompt.push('\n');

    let _ = write!(
        prompt,
        r#"INSTRUCTIONS:
Score every link above for how well it answers the user query.

Scoring guide:
- 0.9-1.0: Perfect match, leads directly to what the user wants
- 0.7-0.8: Highly relevant, very likely to contain the answer
- 0.5-0.6: Moderately relevant, related to the topic
- 0.3-0.4: Somewhat relevant, tangential connection
- 0.0-0.2: Not relevant

Rules:
- Only include links with relevanceScore >= 0.3. If very few links qualify, you may include links scoring >= 0.2.
- Return at most {max_links} links, sorted by relevanceScore from highest to lowest.
- Keep each reasoning under {words} words.
- Use the link numbers above as "index".

Respond with JSON only, in exactly this format:
{{
  "queryInterpretation": "One sentence describing what the user is looking for",
  "links": [
    {{ "index": 1, "relevanceScore": 0.95, "reasoning": "Why this link is relevant" }}
  ]
}}"#,
        max_links = config.max_returned_links,
        words = config.reasoning_words,
    );

    prompt
}

use crate::results::{AnalyzedLink, Link, LinkAnalysisResult, sort_by_score};

/// Added for each query token found in the link text
const TEXT_TOKEN_WEIGHT: f64 = 0.4;
/// Added for each query token found in the URL
const URL_TOKEN_WEIGHT: f64 = 0.3;
/// Added when the whole query appears in the link text
const TEXT_PHRASE_BONUS: f64 = 0.3;
/// Added when the whole query appears in the URL
const URL_PHRASE_BONUS: f64 = 0.2;
/// Tokens this short or shorter are ignored
const MIN_TOKEN_CHARS: usize = 2;

pub const MATCH_REASONING: &str = "Text match found in link text or URL";
pub const NO_MATCH_REASONING: &str = "No direct text match found";

/// Interpretation attached to every text-matching result
pub fn interpretation(query: &str) -> String {
    format!("Fallback text analysis for: \"{}\"", query)
}

/// Lower-cased query tokens longer than two characters
pub fn tokenize(query_lower: &str) -> Vec<&str> {
    query_lower
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .collect()
}

/// Substring score of one link against a lower-cased query, capped at 1.0
pub fn score_link(link: &Link, query_lower: &str, tokens: &[&str]) -> f64 {
    let text = link.text.to_lowercase();
    let url = link.url.to_lowercase();
    let mut score = 0.0;

    for token in tokens {
        if text.contains(token) {
            score += TEXT_TOKEN_WEIGHT;
        }
        if url.contains(token) {
            score += URL_TOKEN_WEIGHT;
        }
    }

    if !query_lower.is_empty() {
        if text.contains(query_lower) {
            score += TEXT_PHRASE_BONUS;
        }
        if url.contains(query_lower) {
            score += URL_PHRASE_BONUS;
        }
    }

    f64::min(score, 1.0)
}

/// Deterministic text-matching analysis keeping links scoring above `threshold`
pub fn analyze(links: &[Link], query: &str, threshold: f64) -> LinkAnalysisResult {
    let query_lower = query.trim().to_lowercase();
    let tokens = tokenize(&query_lower);

    let mut relevant_links: Vec<AnalyzedLink> = links
        .iter()
        .filter_map(|link| {
            let score = score_link(link, &query_lower, &tokens);
            let reasoning = if score > 0.0 {
                MATCH_REASONING
            } else {
                NO_MATCH_REASONING
            };
            let analyzed = AnalyzedLink::new(link.clone(), score, reasoning.to_string());
            (analyzed.relevance_score > threshold).then_some(analyzed)
        })
        .collect();
    sort_by_score(&mut relevant_links);

    ::log::debug!(
        "Text matching kept {} of {} links above {}",
        relevant_links.len(),
        links.len(),
        threshold
    );

    LinkAnalysisResult {
        relevant_links,
        total_analyzed: links.len(),
        query_interpretation: interpretation(query.trim()),
    }
}

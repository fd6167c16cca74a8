use crate::results::{AnalyzedLink, LinkAnalysisResult};
use std::fmt::Write;

/// Minimum score for the high relevance tier
pub const HIGH_RELEVANCE: f64 = 0.8;
/// Minimum score for the medium relevance tier
pub const MEDIUM_RELEVANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn of(score: f64) -> Self {
        if score >= HIGH_RELEVANCE {
            Tier::High
        } else if score >= MEDIUM_RELEVANCE {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Tier::High => "High Relevance",
            Tier::Medium => "Medium Relevance",
            Tier::Low => "Low Relevance",
        }
    }
}

/// Renders an analysis as a markdown report grouped by relevance tier
pub fn format_report(
    url: &str,
    title: Option<&str>,
    query: &str,
    analysis: &LinkAnalysisResult,
) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "# Relevant links for \"{}\"", query);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Page:** {}", title.unwrap_or(url));
    let _ = writeln!(out, "- **URL:** {}", url);
    let _ = writeln!(out, "- **Interpretation:** {}", analysis.query_interpretation);
    let _ = writeln!(
        out,
        "- **Matches:** {} of {} links analyzed",
        analysis.relevant_links.len(),
        analysis.total_analyzed
    );

    if analysis.relevant_links.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No relevant links found.");
        return out;
    }

    for tier in [Tier::High, Tier::Medium, Tier::Low] {
        let links: Vec<&AnalyzedLink> = analysis
            .relevant_links
            .iter()
            .filter(|l| Tier::of(l.relevance_score) == tier)
            .collect();
        if links.is_empty() {
            continue;
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "## {} ({})", tier.heading(), links.len());
        let _ = writeln!(out);
        for link in links {
            write_link(&mut out, link);
        }
    }

    out
}

fn write_link(out: &mut String, link: &AnalyzedLink) {
    let _ = writeln!(
        out,
        "- [{}]({}) `{:.2}` _{}_",
        link.link.text,
        link.link.url,
        link.relevance_score,
        link.link.link_type.as_str()
    );
    let _ = writeln!(out, "  {}", link.reasoning);
}

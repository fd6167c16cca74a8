//! Relevance analysis: ranks extracted links against a free-text query.
//!
//! Analysis runs as a small state machine. The model-based primary stage is
//! tried first; any failure moves to deterministic text matching, and a short
//! query that the model found nothing for gets a second look through text
//! matching at a lower threshold. [`LinkAnalyzer::analyze`] never fails: the
//! `query_interpretation` of the result is the only sign of degradation.

pub mod fallback;
pub mod prompt;
pub mod repair;


use crate::config::AnalyzerConfig;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::results::{
    AnalyzedLink, ExtractedContent, Link, LinkAnalysisResult, clamp_score, sort_by_score,
};
use crate::utils::word_count;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

pub const EMPTY_QUERY: &str = "Empty query provided";
pub const NO_LINKS: &str = "No links found on the page to analyze";
pub const MISSING_INTERPRETATION: &str = "Query interpretation not available";
pub const MISSING_REASONING: &str = "No reasoning provided";
pub const TEXT_MATCH_SUFFIX: &str = " (enhanced with text matching)";

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("no language model configured")]
    ModelUnavailable,

    #[error("model request failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Stages of a single analysis
enum Stage {
    /// Score with the language model
    Primary,
    /// Short query with nothing admitted by the model; retry with text matching
    Augment(LinkAnalysisResult),
    /// Text matching at the given threshold
    Fallback(f64),
    Done(LinkAnalysisResult),
}

/// Scores links against a query, model first with a text-matching fallback
pub struct LinkAnalyzer {
    llm: Option<Arc<dyn LlmClient>>,
    config: AnalyzerConfig,
}

impl LinkAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>, config: AnalyzerConfig) -> Self {
        Self {
            llm: Some(llm),
            config,
        }
    }

    /// An analyzer with no model; every analysis degrades to text matching
    pub fn text_only(config: AnalyzerConfig) -> Self {
        Self { llm: None, config }
    }

    pub fn has_model(&self) -> bool {
        self.llm.is_some()
    }

    /// Ranks the first `max_links` links of `content` against `query`
    pub async fn analyze(
        &self,
        content: &ExtractedContent,
        query: &str,
        max_links: usize,
    ) -> LinkAnalysisResult {
        let query = query.trim();
        if query.is_empty() {
            return LinkAnalysisResult::empty(EMPTY_QUERY);
        }

        let links = &content.links[..content.links.len().min(max_links)];
        if links.is_empty() {
            return LinkAnalysisResult::empty(NO_LINKS);
        }

        let short_query = word_count(query) <= self.config.short_query_words;
        let mut stage = Stage::Primary;

        loop {
            stage = match stage {
                Stage::Primary => match self.score_with_model(content, links, query).await {
                    Ok(result) if result.relevant_links.is_empty() && short_query => {
                        Stage::Augment(result)
                    }
                    Ok(result) => Stage::Done(result),
                    Err(err) => {
                        ::log::warn!("Model analysis failed, using text matching: {}", err);
                        Stage::Fallback(self.degraded_threshold(short_query))
                    }
                },
                Stage::Augment(primary) => {
                    let matched =
                        fallback::analyze(links, query, self.config.short_query_threshold);
                    if matched.relevant_links.is_empty() {
                        Stage::Done(primary)
                    } else {
                        ::log::info!(
                            "Text matching found {} links for short query the model missed",
                            matched.relevant_links.len()
                        );
                        Stage::Done(LinkAnalysisResult {
                            query_interpretation: format!(
                                "{}{}",
                                matched.query_interpretation, TEXT_MATCH_SUFFIX
                            ),
                            ..matched
                        })
                    }
                }
                Stage::Fallback(threshold) => {
                    Stage::Done(fallback::analyze(links, query, threshold))
                }
                Stage::Done(result) => return result,
            };
        }
    }

    /// Text-matching threshold used when the model cannot be used
    fn degraded_threshold(&self, short_query: bool) -> f64 {
        if short_query {
            self.config.short_query_threshold
        } else {
            self.config.fallback_threshold
        }
    }

    async fn score_with_model(
        &self,
        content: &ExtractedContent,
        links: &[Link],
        query: &str,
    ) -> Result<LinkAnalysisResult, AnalysisError> {
        let llm = self.llm.as_ref().ok_or(AnalysisError::ModelUnavailable)?;

        let request = CompletionRequest {
            system: prompt::SYSTEM_PROMPT.to_string(),
            prompt: prompt::build_prompt(query, content, links, &self.config),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = llm.complete(&request).await?;
        ::log::debug!(
            "Model {} returned {} characters",
            llm.model_name(),
            response.len()
        );

        let value = repair::parse_model_json(&response)?;
        self.admit(&value, links)
    }

    /// Validates model output entry by entry and keeps links above the score floor
    fn admit(&self, value: &Value, links: &[Link]) -> Result<LinkAnalysisResult, AnalysisError> {
        let object = value.as_object().ok_or_else(|| {
            AnalysisError::MalformedResponse("response is not a JSON object".to_string())
        })?;

        let entries: &[Value] = match object.get("links") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(AnalysisError::MalformedResponse(
                    "`links` is not an array".to_string(),
                ));
            }
        };

        let mut seen = HashSet::new();
        let mut relevant_links = Vec::new();

        for entry in entries {
            let (Some(index), Some(score)) = (
                entry.get("index").and_then(Value::as_f64),
                entry.get("relevanceScore").and_then(Value::as_f64),
            ) else {
                ::log::debug!("Skipping model entry without numeric index/score: {}", entry);
                continue;
            };

            if index.fract() != 0.0 || index < 1.0 || index > links.len() as f64 {
                ::log::debug!("Skipping model entry with out-of-range index {}", index);
                continue;
            }
            let position = index as usize - 1;
            if !seen.insert(position) {
                continue;
            }

            let score = clamp_score(score);
            if score < self.config.min_score {
                continue;
            }

            let reasoning = entry
                .get("reasoning")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(MISSING_REASONING);

            relevant_links.push(AnalyzedLink::new(
                links[position].clone(),
                score,
                reasoning.to_string(),
            ));
        }
        sort_by_score(&mut relevant_links);

        let query_interpretation = object
            .get("queryInterpretation")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(MISSING_INTERPRETATION)
            .to_string();

        ::log::debug!(
            "Model admitted {} of {} returned entries",
            relevant_links.len(),
            entries.len()
        );

        Ok(LinkAnalysisResult {
            relevant_links,
            total_analyzed: links.len(),
            query_interpretation,
        })
    }
}

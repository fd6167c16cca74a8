use crate::analysis::AnalysisError;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").unwrap());

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());

static BARE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*([A-Za-z_][A-Za-z0-9_]*)\s*([,}\]])").unwrap());

/// Parses the JSON object embedded in a model response.
///
/// The object is located first (fenced block preferred, then the first
/// balanced `{...}`); if it does not parse, one round of textual repairs is
/// applied and parsing is retried once.
pub fn parse_model_json(response: &str) -> Result<Value, AnalysisError> {
    let candidate = locate_json(response).ok_or_else(|| {
        AnalysisError::MalformedResponse("no JSON object found in response".to_string())
    })?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            ::log::debug!("Model JSON did not parse ({}), attempting repair", first);
            let repaired = repair_json(candidate);
            serde_json::from_str::<Value>(&repaired).map_err(|second| {
                AnalysisError::MalformedResponse(format!(
                    "{}; after repair: {}",
                    first, second
                ))
            })
        }
    }
}

/// Finds the JSON object in free text, preferring a fenced code block
pub fn locate_json(text: &str) -> Option<&str> {
    if let Some(m) = FENCED_JSON.captures(text).and_then(|caps| caps.get(1)) {
        return Some(m.as_str());
    }
    balanced_object(text)
}

/// First `{...}` span with balanced braces, ignoring braces inside strings.
/// An unbalanced object runs to the last `}` in the text.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Fixes the syntax slips models commonly make: trailing commas, bare keys
/// and bare identifier values. String literals are copied through untouched.
pub fn repair_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;

    while let Some(quote) = rest.find('"') {
        out.push_str(&repair_structure(&rest[..quote]));
        let literal_len = string_literal_len(&rest[quote..]);
        out.push_str(&rest[quote..quote + literal_len]);
        rest = &rest[quote + literal_len..];
    }
    out.push_str(&repair_structure(rest));
    out
}

/// Byte length of the string literal at the start of `text`, quotes included.
/// An unterminated literal runs to the end.
fn string_literal_len(text: &str) -> usize {
    let mut escaped = false;
    for (offset, ch) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return offset + 1;
        }
    }
    text.len()
}

/// Applies the repairs to a span that lies outside any string literal
fn repair_structure(span: &str) -> String {
    let span = TRAILING_COMMA.replace_all(span, "${1}");
    let span = BARE_KEY.replace_all(&span, "${1}\"${2}\":");
    let span = BARE_VALUE.replace_all(&span, |caps: &Captures| match &caps[1] {
        "true" | "false" | "null" => caps[0].to_string(),
        word => format!(": \"{}\"{}", word, &caps[2]),
    });
    span.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_fenced_block() {
        let text = "Here is {not this} the answer:\n```json\n{\"links\": []}\n```\nDone.";
        assert_eq!(locate_json(text), Some("{\"links\": []}"));
    }

    #[test]
    fn test_locate_balanced_object_in_prose() {
        let text = r#"Sure! {"a": {"b": "}"}, "c": 1} and then {"d": 2}"#;
        assert_eq!(locate_json(text), Some(r#"{"a": {"b": "}"}, "c": 1}"#));
    }

    #[test]
    fn test_locate_handles_escaped_quotes() {
        let text = r#"{"reasoning": "says \"hi {\" here", "x": 1} trailing"#;
        assert_eq!(
            locate_json(text),
            Some(r#"{"reasoning": "says \"hi {\" here", "x": 1}"#)
        );
    }

    #[test]
    fn test_locate_none_without_object() {
        assert_eq!(locate_json("no json here"), None);
    }

    #[test]
    fn test_repair_trailing_commas_and_bare_keys() {
        let repaired = repair_json(r#"{links:[{index:1,relevanceScore:0.9,reasoning:"match"},]}"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["links"][0]["index"], 1);
        assert_eq!(value["links"][0]["relevanceScore"], 0.9);
        assert_eq!(value["links"][0]["reasoning"], "match");
    }

    #[test]
    fn test_repair_bare_values_keep_literals() {
        let repaired = repair_json(r#"{"queryInterpretation": pricing, "ok": true, "x": null,}"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["queryInterpretation"], "pricing");
        assert_eq!(value["ok"], true);
        assert!(value["x"].is_null());
    }

    #[test]
    fn test_repair_leaves_string_contents_alone() {
        let repaired = repair_json(
            r#"{links:[{index:2,reasoning:"Lists prices, plans: and tiers, see: faq}"},]}"#,
        );
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(
            value["links"][0]["reasoning"],
            "Lists prices, plans: and tiers, see: faq}"
        );
    }

    #[test]
    fn test_repair_handles_escaped_quotes() {
        let repaired = repair_json(r#"{reasoning:"the \"plans, pricing:\" page",}"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["reasoning"], "the \"plans, pricing:\" page");
    }

    #[test]
    fn test_parse_model_json_repairs_once() {
        let response = "```json\n{links:[{index:2,relevanceScore:0.5,},],}\n```";
        let value = parse_model_json(response).unwrap();
        assert_eq!(value["links"][0]["index"], 2);
    }

    #[test]
    fn test_parse_model_json_gives_up() {
        let err = parse_model_json("{\"links\": [1, 2,, 3]").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));

        let err = parse_model_json("I could not find anything relevant.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }
}

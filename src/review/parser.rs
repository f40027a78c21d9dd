use serde_json::Value;

/// Category used when the raw output cannot be parsed into structured pairs.
pub const FALLBACK_CATEGORY: &str = "General Feedback";

/// Best-effort extraction of `(category, message)` pairs from raw LLM output.
///
/// Looks for a JSON array anywhere in the text (first `[` through last `]`),
/// keeps elements that carry non-empty string `category` and `message`
/// fields, and otherwise wraps the entire raw text as a single
/// "General Feedback" entry. Never fails, never returns an empty list.
pub fn parse_review_output(raw: &str) -> Vec<(String, String)> {
    extract_categories(raw)
        .unwrap_or_else(|| vec![(FALLBACK_CATEGORY.to_string(), raw.to_string())])
}

fn extract_categories(raw: &str) -> Option<Vec<(String, String)>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }

    let elements: Vec<Value> = serde_json::from_str(&raw[start..=end]).ok()?;

    let pairs: Vec<(String, String)> = elements
        .iter()
        .filter_map(|element| {
            let category = element.get("category")?.as_str()?;
            let message = element.get("message")?.as_str()?;
            if category.is_empty() || message.is_empty() {
                return None;
            }
            Some((category.to_string(), message.to_string()))
        })
        .collect();

    if pairs.is_empty() { None } else { Some(pairs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_json_array() {
        let raw = r#"Here is my review:
[
  {"category": "Security", "message": "Unchecked input."},
  {"category": "Performance", "message": "Quadratic loop."}
]
Hope that helps!"#;

        let pairs = parse_review_output(raw);
        assert_eq!(
            pairs,
            vec![
                ("Security".to_string(), "Unchecked input.".to_string()),
                ("Performance".to_string(), "Quadratic loop.".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_output_falls_back_to_single_entry() {
        for raw in [
            "no structure at all",
            "[not json",
            "[]",
            r#"[{"category": "Security"}]"#,
            r#"[{"category": "", "message": ""}]"#,
            "",
        ] {
            let pairs = parse_review_output(raw);
            assert_eq!(pairs.len(), 1, "raw: {raw:?}");
            assert_eq!(pairs[0].0, FALLBACK_CATEGORY);
            assert_eq!(pairs[0].1, raw);
        }
    }

    #[test]
    fn skips_elements_missing_fields() {
        let raw = r#"[{"category": "Security", "message": "ok"}, {"note": "ignored"}]"#;
        let pairs = parse_review_output(raw);
        assert_eq!(pairs, vec![("Security".to_string(), "ok".to_string())]);
    }

    #[test]
    fn non_array_json_falls_back() {
        let raw = r#"{"category": "Security", "message": "ok"}"#;
        let pairs = parse_review_output(raw);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, FALLBACK_CATEGORY);
    }
}

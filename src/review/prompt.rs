use std::fmt::Write as _;

/// Builds the instruction text sent to the engine.
///
/// Asks for a JSON array of `{category, message}` objects restricted to the
/// configured category names, so the parser has a fighting chance.
pub fn build_review_prompt(
    language: &str,
    source_code: &str,
    diff: Option<&str>,
    categories: &[String],
) -> String {
    let mut prompt = format!("Please review the following {language} code:\n\n{source_code}\n");

    if let Some(diff) = diff {
        let _ = write!(prompt, "\nDiff:\n{diff}\n");
    }

    let category_list = categories.join(", ");
    let _ = write!(
        prompt,
        "\nRespond with a JSON array of objects, each shaped as \
         {{\"category\": \"...\", \"message\": \"...\"}}. \
         Use only these categories: {category_list}."
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<String> {
        vec!["Security".to_string(), "Performance".to_string()]
    }

    #[test]
    fn includes_language_source_and_categories() {
        let prompt = build_review_prompt("Rust", "fn main() {}", None, &cats());
        assert!(prompt.contains("Rust code"));
        assert!(prompt.contains("fn main() {}"));
        assert!(prompt.contains("Security, Performance"));
        assert!(!prompt.contains("Diff:"));
    }

    #[test]
    fn includes_diff_when_present() {
        let prompt = build_review_prompt("Python", "print(1)", Some("+print(1)"), &cats());
        assert!(prompt.contains("Diff:\n+print(1)"));
    }
}

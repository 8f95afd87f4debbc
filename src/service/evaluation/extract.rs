//! Structured-payload extraction from raw model output
//!
//! Models are instructed to return bare JSON but routinely wrap it in
//! markdown code fences anyway. This is a pure text transform with no
//! semantic validation.

use super::error::EvaluationError;

/// Reduce raw model output to a JSON candidate string
///
/// Trims surrounding whitespace and strips one layer of triple-backtick
/// fences (optionally labeled `json`), leaving the inner content untouched.
/// Idempotent: stripping already-stripped text is a no-op. An empty result
/// is a malformed response, never a silent empty payload.
pub fn extract_structured_payload(raw: &str) -> Result<String, EvaluationError> {
    let cleaned = strip_fences(raw);

    if cleaned.is_empty() {
        return Err(EvaluationError::MalformedResponse {
            detail: "response is empty after stripping fences and whitespace".to_string(),
            raw: raw.to_string(),
        });
    }

    Ok(cleaned.to_string())
}

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Optional language label directly after the opening fence
    let rest = if rest
        .get(..4)
        .is_some_and(|label| label.eq_ignore_ascii_case("json"))
    {
        &rest[4..]
    } else {
        rest
    };

    let rest = rest.strip_suffix("```").unwrap_or(rest);

    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfenced_text_is_only_trimmed() {
        let payload = extract_structured_payload("  {\"totalScore\": 8}\n").unwrap();
        assert_eq!(payload, "{\"totalScore\": 8}");
    }

    #[test]
    fn labeled_fences_are_stripped() {
        let raw = "```json\n{\"totalScore\": 8}\n```";
        assert_eq!(extract_structured_payload(raw).unwrap(), "{\"totalScore\": 8}");
    }

    #[test]
    fn unlabeled_fences_are_stripped() {
        let raw = "```\n{\"totalScore\": 8}\n```";
        assert_eq!(extract_structured_payload(raw).unwrap(), "{\"totalScore\": 8}");
    }

    #[test]
    fn uppercase_label_is_stripped() {
        let raw = "```JSON\n{}\n```";
        assert_eq!(extract_structured_payload(raw).unwrap(), "{}");
    }

    #[test]
    fn missing_closing_fence_still_yields_content() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract_structured_payload(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extraction_is_idempotent() {
        let raw = "```json\n{\"totalScore\": 8, \"feedback\": \"ok\"}\n```";
        let once = extract_structured_payload(raw).unwrap();
        let twice = extract_structured_payload(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn inner_content_is_untouched() {
        // Backticks inside the payload survive; only the outer layer goes
        let raw = "```json\n{\"feedback\": \"use `map` here\"}\n```";
        assert_eq!(
            extract_structured_payload(raw).unwrap(),
            "{\"feedback\": \"use `map` here\"}"
        );
    }

    #[test]
    fn empty_after_stripping_is_malformed() {
        for raw in ["", "   \n  ", "```json\n```", "``````"] {
            let err = extract_structured_payload(raw).unwrap_err();
            assert!(matches!(err, EvaluationError::MalformedResponse { .. }));
        }
    }
}

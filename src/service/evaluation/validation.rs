//! Validation of model grading output
//!
//! Turns the extracted JSON candidate into a typed, structurally-guaranteed
//! report. Checks run in a fixed order and short-circuit on the first
//! failure; a report is either fully valid or not produced at all.

use std::collections::{HashMap, HashSet};

use crate::model::evaluation::RawEvaluation;
use crate::model::{EvaluationReport, ScoreResult};

use super::error::EvaluationError;

/// Maximum tolerated difference between the model's stated aggregate and the
/// mean of its per-question scores
const AGGREGATE_TOLERANCE: f64 = 0.01;

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 10.0;

/// Parse and validate an extracted payload against the interview's question
/// identifiers
///
/// Validation order: JSON object parse, required fields and types, score
/// ranges, exact question coverage, non-empty feedback. The aggregate score
/// is then recomputed as the mean of the per-question scores; when the model's
/// stated aggregate disagrees by more than the tolerance, the recomputed value
/// wins and the discrepancy is logged. Question identifiers are matched
/// exactly; any casing or whitespace deviation is a coverage mismatch.
///
/// The returned report's scores are reordered to `expected_question_ids`
/// order (matched by identifier, not by the model's ordering).
pub fn parse_and_validate(
    payload: &str,
    expected_question_ids: &[String],
) -> Result<EvaluationReport, EvaluationError> {
    // 1. Must parse as a JSON object
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| EvaluationError::MalformedResponse {
            detail: e.to_string(),
            raw: payload.to_string(),
        })?;

    if !value.is_object() {
        return Err(EvaluationError::MalformedResponse {
            detail: "top-level JSON value is not an object".to_string(),
            raw: payload.to_string(),
        });
    }

    // 2. Required fields, correctly typed
    let raw: RawEvaluation =
        serde_json::from_value(value).map_err(|e| EvaluationError::SchemaViolation {
            detail: e.to_string(),
            raw: payload.to_string(),
        })?;

    // 3. Aggregate and every per-question score finite and within range
    check_score_range(raw.total_score, "totalScore", payload)?;
    for score in &raw.scores {
        check_score_range(
            score.score,
            &format!("score for question '{}'", score.question_id),
            payload,
        )?;
    }

    // 4. Exact coverage: no duplicates, no missing, no extra
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.scores.len());
    for score in &raw.scores {
        if !seen.insert(score.question_id.as_str()) {
            return Err(EvaluationError::QuestionCoverageMismatch {
                detail: format!("duplicate question id '{}'", score.question_id),
                raw: payload.to_string(),
            });
        }
    }

    let expected: HashSet<&str> = expected_question_ids.iter().map(String::as_str).collect();

    if let Some(extra) = seen.iter().find(|id| !expected.contains(*id)) {
        return Err(EvaluationError::QuestionCoverageMismatch {
            detail: format!("unexpected question id '{}'", extra),
            raw: payload.to_string(),
        });
    }

    if let Some(missing) = expected.iter().find(|id| !seen.contains(*id)) {
        return Err(EvaluationError::QuestionCoverageMismatch {
            detail: format!("missing question id '{}'", missing),
            raw: payload.to_string(),
        });
    }

    // 5. Non-empty feedback throughout
    if raw.feedback.trim().is_empty() {
        return Err(EvaluationError::SchemaViolation {
            detail: "overall feedback is empty".to_string(),
            raw: payload.to_string(),
        });
    }

    for score in &raw.scores {
        if score.feedback.trim().is_empty() {
            return Err(EvaluationError::SchemaViolation {
                detail: format!("feedback for question '{}' is empty", score.question_id),
                raw: payload.to_string(),
            });
        }
    }

    // 6. Recompute the aggregate; the model's arithmetic is not load-bearing
    let total_score = if raw.scores.is_empty() {
        raw.total_score
    } else {
        let mean = raw.scores.iter().map(|s| s.score).sum::<f64>() / raw.scores.len() as f64;
        if (mean - raw.total_score).abs() > AGGREGATE_TOLERANCE {
            tracing::warn!(
                stated = raw.total_score,
                recomputed = mean,
                "Aggregate score disagrees with per-question mean, using recomputed value"
            );
            mean
        } else {
            raw.total_score
        }
    };

    // Reorder to input order, matching by identifier
    let mut by_id: HashMap<String, _> = raw
        .scores
        .into_iter()
        .map(|s| (s.question_id.clone(), s))
        .collect();

    let mut scores = Vec::with_capacity(expected_question_ids.len());
    for id in expected_question_ids {
        let score = by_id
            .remove(id)
            .ok_or_else(|| EvaluationError::QuestionCoverageMismatch {
                detail: format!("missing question id '{}'", id),
                raw: payload.to_string(),
            })?;

        scores.push(ScoreResult {
            question_id: score.question_id,
            score: score.score,
            feedback: score.feedback,
        });
    }

    Ok(EvaluationReport {
        total_score,
        feedback: raw.feedback,
        scores,
    })
}

fn check_score_range(score: f64, what: &str, payload: &str) -> Result<(), EvaluationError> {
    if !score.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(EvaluationError::ScoreOutOfRange {
            detail: format!("{} is {}, expected a finite number in [0, 10]", what, score),
            raw: payload.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn well_formed_response_round_trips() {
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"Q1","score":8,"feedback":"good"}]}"#;

        let report = parse_and_validate(payload, &ids(&["Q1"])).unwrap();

        assert_eq!(report.total_score, 8.0);
        assert_eq!(report.feedback, "ok");
        assert_eq!(report.scores.len(), 1);
        assert_eq!(report.scores[0].question_id, "Q1");
        assert_eq!(report.scores[0].score, 8.0);
    }

    #[test]
    fn scores_are_reordered_to_input_order() {
        let payload = r#"{
            "totalScore": 6.0,
            "feedback": "mixed",
            "scores": [
                {"questionId": "B", "score": 4.0, "feedback": "weak"},
                {"questionId": "A", "score": 8.0, "feedback": "strong"}
            ]
        }"#;

        let report = parse_and_validate(payload, &ids(&["A", "B"])).unwrap();

        assert_eq!(report.scores[0].question_id, "A");
        assert_eq!(report.scores[1].question_id, "B");
    }

    #[test]
    fn non_json_text_is_malformed() {
        let err = parse_and_validate("the candidate did great!", &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse { .. }));
    }

    #[test]
    fn top_level_array_is_malformed() {
        let err = parse_and_validate("[1, 2, 3]", &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_required_field_violates_schema() {
        // No feedback field
        let payload = r#"{"totalScore":8,"scores":[{"questionId":"Q1","score":8,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::SchemaViolation { .. }));
    }

    #[test]
    fn non_numeric_score_violates_schema() {
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"Q1","score":"high","feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::SchemaViolation { .. }));
    }

    #[test]
    fn score_above_range_is_rejected() {
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"Q1","score":11,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::ScoreOutOfRange { .. }));
    }

    #[test]
    fn negative_aggregate_is_rejected() {
        let payload = r#"{"totalScore":-1,"feedback":"ok","scores":[{"questionId":"Q1","score":8,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::ScoreOutOfRange { .. }));
    }

    #[test]
    fn duplicate_question_id_is_coverage_mismatch() {
        let payload = r#"{
            "totalScore": 8,
            "feedback": "ok",
            "scores": [
                {"questionId": "Q1", "score": 8, "feedback": "good"},
                {"questionId": "Q1", "score": 7, "feedback": "again"}
            ]
        }"#;
        let err = parse_and_validate(payload, &ids(&["Q1", "Q2"])).unwrap_err();
        assert!(matches!(err, EvaluationError::QuestionCoverageMismatch { .. }));
    }

    #[test]
    fn missing_question_id_is_coverage_mismatch() {
        // Two questions asked, only one graded
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"Q1","score":8,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1", "Q2"])).unwrap_err();
        assert!(matches!(err, EvaluationError::QuestionCoverageMismatch { .. }));
    }

    #[test]
    fn unexpected_question_id_is_coverage_mismatch() {
        let payload = r#"{
            "totalScore": 8,
            "feedback": "ok",
            "scores": [
                {"questionId": "Q1", "score": 8, "feedback": "good"},
                {"questionId": "Q9", "score": 8, "feedback": "invented"}
            ]
        }"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::QuestionCoverageMismatch { .. }));
    }

    #[test]
    fn inexact_question_id_is_coverage_mismatch() {
        // Casing and whitespace deviations are never fuzzy-matched
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"q1 ","score":8,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::QuestionCoverageMismatch { .. }));
    }

    #[test]
    fn empty_overall_feedback_violates_schema() {
        let payload = r#"{"totalScore":8,"feedback":"   ","scores":[{"questionId":"Q1","score":8,"feedback":"good"}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::SchemaViolation { .. }));
    }

    #[test]
    fn empty_per_question_feedback_violates_schema() {
        let payload = r#"{"totalScore":8,"feedback":"ok","scores":[{"questionId":"Q1","score":8,"feedback":""}]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert!(matches!(err, EvaluationError::SchemaViolation { .. }));
    }

    #[test]
    fn disagreeing_aggregate_is_recomputed_from_scores() {
        let payload = r#"{
            "totalScore": 5,
            "feedback": "ok",
            "scores": [
                {"questionId": "Q1", "score": 7.0, "feedback": "good"},
                {"questionId": "Q2", "score": 8.0, "feedback": "better"}
            ]
        }"#;

        let report = parse_and_validate(payload, &ids(&["Q1", "Q2"])).unwrap();

        assert!((report.total_score - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_within_tolerance_is_kept_verbatim() {
        let payload = r#"{
            "totalScore": 7.5,
            "feedback": "ok",
            "scores": [
                {"questionId": "Q1", "score": 7.0, "feedback": "good"},
                {"questionId": "Q2", "score": 8.0, "feedback": "better"}
            ]
        }"#;

        let report = parse_and_validate(payload, &ids(&["Q1", "Q2"])).unwrap();

        assert_eq!(report.total_score, 7.5);
    }

    #[test]
    fn validation_failures_carry_the_offending_payload() {
        let payload = r#"{"totalScore":11,"feedback":"ok","scores":[]}"#;
        let err = parse_and_validate(payload, &ids(&["Q1"])).unwrap_err();
        assert_eq!(err.raw_payload(), Some(payload));
    }
}

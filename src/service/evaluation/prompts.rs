//! Prompts for interview evaluation

use crate::model::ResponsePair;

/// System prompt for interview evaluation
pub const EVALUATION_SYSTEM_PROMPT: &str = r#"You are an expert technical interviewer evaluating a candidate's spoken answers.

Score each answer on relevance, technical accuracy, depth, use of examples,
and communication quality. Be specific and constructive in feedback: name
strengths, weaknesses, and concrete improvements.

You must:
- Base every judgment only on the transcript provided
- Treat an empty or off-topic transcript as a weak answer, not a missing one
- Keep feedback professional and actionable

Your output must be a single JSON object and nothing else."#;

/// Build the grading prompt from a candidate's answers
///
/// Pure function: enumerates every pair in input order with question text and
/// transcript verbatim, states the score range, and pins the exact JSON shape
/// the model must return.
pub fn build_evaluation_prompt(candidate_name: &str, pairs: &[ResponsePair]) -> String {
    let mut responses = String::new();
    for (i, pair) in pairs.iter().enumerate() {
        responses.push_str(&format!(
            "Question {number} (id: {id}): {question}\nCandidate's Answer: {transcript}\n\n",
            number = i + 1,
            id = pair.question_id,
            question = pair.question,
            transcript = pair.transcript,
        ));
    }

    let question_ids = pairs
        .iter()
        .map(|p| p.question_id.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Evaluate the following technical interview.

Candidate: {candidate_name}

Interview Responses:
{responses}
Respond with ONLY a JSON object in the following format (no markdown, no code blocks, no additional text):
{{
  "totalScore": 8.5,
  "feedback": "Comprehensive overall evaluation here",
  "scores": [
    {{
      "questionId": "exact question id string",
      "score": 8.5,
      "feedback": "Specific constructive feedback for this answer"
    }}
  ]
}}

Evaluation Guidelines:
- Score each answer from 0 to 10 inclusive; fractional scores are allowed
- The scores array must contain exactly one entry for each of these question ids, copied verbatim: {question_ids}
- The totalScore must be the arithmetic average of all individual scores
- Provide non-empty feedback for every answer and a non-empty overall summary
- Do not include any text outside the JSON object

Remember: Return ONLY the JSON object, with no markdown formatting or additional text."#,
        candidate_name = candidate_name,
        responses = responses,
        question_ids = question_ids,
    )
}

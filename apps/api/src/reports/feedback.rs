use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill, json_system};
use crate::llm_client::LlmClient;
use crate::models::evaluation::TranscriptFeedback;
use crate::models::interview::TranscriptEntry;
use crate::reports::prompts::{FEEDBACK_PROMPT, FEEDBACK_SYSTEM};

/// Clamps model scores into their documented ranges: overall 0–100, per question 0–10.
pub fn normalize_feedback(mut feedback: TranscriptFeedback) -> TranscriptFeedback {
    feedback.overall_score = feedback.overall_score.clamp(0.0, 100.0);
    for item in &mut feedback.per_question {
        item.score = item.score.clamp(0.0, 10.0);
    }
    feedback
}

/// Asks the model for a feedback report over the transcript.
/// Unparseable output surfaces as a 500 carrying the raw model text.
pub async fn generate_feedback(
    llm: &LlmClient,
    role: &str,
    candidate_id: Uuid,
    transcript: &[TranscriptEntry],
) -> Result<TranscriptFeedback, AppError> {
    let transcript_json = serde_json::to_string_pretty(transcript)
        .map_err(|e| anyhow::anyhow!("Failed to serialize transcript: {e}"))?;
    let candidate = candidate_id.to_string();
    let prompt = fill(
        FEEDBACK_PROMPT,
        &[
            ("role", role),
            ("candidate_id", candidate.as_str()),
            ("transcript", transcript_json.as_str()),
        ],
    );
    let feedback: TranscriptFeedback = llm
        .call_json(&json_system(FEEDBACK_SYSTEM), &prompt, 0.3)
        .await
        .map_err(|e| AppError::from_llm("Feedback report generation failed", e))?;
    Ok(normalize_feedback(feedback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_text;
    use crate::models::evaluation::HireRecommendation;

    #[test]
    fn test_scores_are_clamped() {
        let raw = r#"{
            "overall_score": 140,
            "summary": "Solid",
            "strengths": ["Rust"],
            "improvements": [],
            "hire_recommendation": "YES",
            "per_question": [{"question": "Q", "answer": "A", "score": 12, "comment": "c"}]
        }"#;
        let feedback = normalize_feedback(parse_json_text::<TranscriptFeedback>(raw).unwrap());
        assert_eq!(feedback.overall_score, 100.0);
        assert_eq!(feedback.per_question[0].score, 10.0);
        assert_eq!(feedback.hire_recommendation, HireRecommendation::Yes);
    }

    #[test]
    fn test_fenced_feedback_parses() {
        let raw = "```json\n{\"overall_score\": 55, \"hire_recommendation\": \"MAYBE\"}\n```";
        let feedback: TranscriptFeedback = parse_json_text(raw).unwrap();
        assert_eq!(feedback.overall_score, 55.0);
        assert!(feedback.per_question.is_empty());
    }
}

//! The model-facing half of the interview loop.
//!
//! `AppState` holds an `Arc<dyn Interviewer>`. `LlmInterviewer` is the production
//! backend; tests drive the turn logic with a scripted implementation.
//!
//! Implementations report unparseable model output as
//! `AppError::MalformedModelOutput`; the turn logic decides on fallbacks.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::interviews::prompts::{
    FINAL_EVALUATION_PROMPT, FINAL_EVALUATION_SYSTEM, NEXT_QUESTION_PROMPT, NEXT_QUESTION_SYSTEM,
    OPENING_PROMPT, OPENING_SYSTEM, SCORE_PROMPT, SCORE_SYSTEM,
};
use crate::interviews::turn::MAX_QUESTIONS;
use crate::llm_client::prompts::{fill, json_system, or_not_specified};
use crate::llm_client::LlmClient;
use crate::models::evaluation::FinalEvaluation;
use crate::models::interview::{AnswerEvaluation, TranscriptEntry};
use crate::models::job::Job;

#[async_trait]
pub trait Interviewer: Send + Sync {
    /// Opening question for a fresh interview.
    async fn opening_question(
        &self,
        job: &Job,
        candidate_background: Option<&str>,
    ) -> Result<String, AppError>;

    /// Scores one answer on a 1–10 scale with qualitative feedback.
    async fn score_answer(
        &self,
        job: &Job,
        question: &str,
        answer: &str,
    ) -> Result<AnswerEvaluation, AppError>;

    /// Next question given the transcript so far, including the turn just scored.
    async fn next_question(
        &self,
        job: &Job,
        history: &[TranscriptEntry],
        overall_score: f64,
    ) -> Result<String, AppError>;

    /// Hire/maybe/reject synthesis over the full transcript.
    async fn final_evaluation(
        &self,
        candidate_name: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<FinalEvaluation, AppError>;
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
}

/// Question text, or malformed-output when the model sent an empty one.
fn non_empty_question(generated: GeneratedQuestion, raw_context: &str) -> Result<String, AppError> {
    let question = generated.question.trim();
    if question.is_empty() {
        return Err(AppError::MalformedModelOutput {
            message: format!("{raw_context}: empty question"),
            raw: String::new(),
        });
    }
    Ok(question.to_string())
}

fn job_vars(job: &Job) -> [(&'static str, &str); 4] {
    let description = if job.description.trim().is_empty() {
        "No specific description provided"
    } else {
        job.description.as_str()
    };
    [
        ("title", job.title.as_str()),
        ("description", description),
        ("department", or_not_specified(job.department.as_deref())),
        ("location", or_not_specified(job.location.as_deref())),
    ]
}

/// Q/A/score block fed to the next-question prompt.
pub fn format_history(history: &[TranscriptEntry]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let score = entry
                .evaluation
                .as_ref()
                .map(|e| e.score.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "Q{n}: {q}\nA{n}: {a}\nScore: {score}/10\n",
                n = idx + 1,
                q = entry.question,
                a = entry.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transcript block fed to the final evaluation prompt.
pub fn format_transcript(transcript: &[TranscriptEntry]) -> String {
    transcript
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (score, feedback) = match &entry.evaluation {
                Some(e) => (e.score.to_string(), e.feedback.as_str()),
                None => ("N/A".to_string(), "No feedback"),
            };
            format!(
                "Q{n}: {q}\nA{n}: {a}\nIndividual Score: {score}/10\nFeedback: {feedback}\n\n",
                n = idx + 1,
                q = entry.question,
                a = entry.answer
            )
        })
        .collect()
}

/// Default interviewer backed by the chat-completions API.
pub struct LlmInterviewer {
    llm: LlmClient,
}

impl LlmInterviewer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Interviewer for LlmInterviewer {
    async fn opening_question(
        &self,
        job: &Job,
        candidate_background: Option<&str>,
    ) -> Result<String, AppError> {
        let system = json_system(&fill(OPENING_SYSTEM, &job_vars(job)));
        let background = candidate_background
            .map(|b| format!("Brief candidate background: {b}"))
            .unwrap_or_default();
        let prompt = fill(
            OPENING_PROMPT,
            &[("title", job.title.as_str()), ("background", background.as_str())],
        );
        let generated: GeneratedQuestion = self
            .llm
            .call_json(&system, &prompt, 0.7)
            .await
            .map_err(|e| AppError::from_llm("Opening question generation failed", e))?;
        non_empty_question(generated, "Opening question generation failed")
    }

    async fn score_answer(
        &self,
        job: &Job,
        question: &str,
        answer: &str,
    ) -> Result<AnswerEvaluation, AppError> {
        let system = json_system(&fill(SCORE_SYSTEM, &job_vars(job)));
        let prompt = fill(SCORE_PROMPT, &[("question", question), ("answer", answer)]);
        let mut evaluation: AnswerEvaluation = self
            .llm
            .call_json(&system, &prompt, 0.3)
            .await
            .map_err(|e| AppError::from_llm("Answer scoring failed", e))?;
        evaluation.score = evaluation.score.clamp(1.0, 10.0);
        Ok(evaluation)
    }

    async fn next_question(
        &self,
        job: &Job,
        history: &[TranscriptEntry],
        overall_score: f64,
    ) -> Result<String, AppError> {
        let system = json_system(&fill(NEXT_QUESTION_SYSTEM, &job_vars(job)));
        let history_block = format_history(history);
        let overall = format!("{overall_score:.1}");
        let count = history.len().to_string();
        let max = MAX_QUESTIONS.to_string();
        let prompt = fill(
            NEXT_QUESTION_PROMPT,
            &[
                ("history", history_block.as_str()),
                ("overall_score", overall.as_str()),
                ("count", count.as_str()),
                ("max", max.as_str()),
            ],
        );
        let generated: GeneratedQuestion = self
            .llm
            .call_json(&system, &prompt, 0.7)
            .await
            .map_err(|e| AppError::from_llm("Next question generation failed", e))?;
        non_empty_question(generated, "Next question generation failed")
    }

    async fn final_evaluation(
        &self,
        candidate_name: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<FinalEvaluation, AppError> {
        let transcript_block = format_transcript(transcript);
        let prompt = fill(
            FINAL_EVALUATION_PROMPT,
            &[
                ("candidate", candidate_name),
                ("transcript", transcript_block.as_str()),
            ],
        );
        self.llm
            .call_json(&json_system(FINAL_EVALUATION_SYSTEM), &prompt, 0.3)
            .await
            .map_err(|e| AppError::from_llm("Final evaluation failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, answer: &str, score: Option<f64>) -> TranscriptEntry {
        TranscriptEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            evaluation: score.map(|score| AnswerEvaluation {
                score,
                feedback: "Clear".to_string(),
                strengths: vec![],
                improvements: vec![],
                is_good_answer: None,
            }),
        }
    }

    #[test]
    fn test_format_history_numbers_turns() {
        let history = vec![entry("Why Rust?", "Safety", Some(8.0)), entry("Why not Go?", "GC", None)];
        let block = format_history(&history);
        assert!(block.contains("Q1: Why Rust?\nA1: Safety\nScore: 8/10"));
        assert!(block.contains("Q2: Why not Go?\nA2: GC\nScore: N/A/10"));
    }

    #[test]
    fn test_format_transcript_includes_feedback() {
        let block = format_transcript(&[entry("Q", "A", Some(6.5))]);
        assert_eq!(block, "Q1: Q\nA1: A\nIndividual Score: 6.5/10\nFeedback: Clear\n\n");
    }

    #[test]
    fn test_empty_generated_question_is_malformed() {
        let err = non_empty_question(
            GeneratedQuestion {
                question: "   ".to_string(),
            },
            "ctx",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedModelOutput { .. }));
    }
}

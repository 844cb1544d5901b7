//! One turn of the interview: score the answer, extend the transcript, decide
//! whether to continue and, if so, produce the next question.
//!
//! The loop is a plain counter: the interview completes once the transcript
//! holds [`MAX_QUESTIONS`] answers. There is no early exit on score.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interviews::interviewer::Interviewer;
use crate::jobs::questions::unasked_questions;
use crate::models::interview::{AnswerEvaluation, InterviewRow, TranscriptEntry};
use crate::models::job::{Job, JobQuestion};

pub const MAX_QUESTIONS: usize = 8;

/// Score assumed for an answer that has no usable evaluation.
pub const NEUTRAL_SCORE: f64 = 5.0;

pub const STALE_VERSION: &str = "Interview was updated by another request; reload and retry";

pub const FALLBACK_NEXT_QUESTION: &str =
    "Tell me about a challenging project you've worked on recently.";

pub fn fallback_opening_question(job_title: &str) -> String {
    format!(
        "Hi! Thank you for joining us today. To get started, could you please tell me about \
         yourself and what interests you about the {job_title} position?"
    )
}

pub fn neutral_evaluation() -> AnswerEvaluation {
    AnswerEvaluation {
        score: NEUTRAL_SCORE,
        feedback: "Unable to evaluate".to_string(),
        strengths: Vec::new(),
        improvements: Vec::new(),
        is_good_answer: None,
    }
}

pub fn entry_score(entry: &TranscriptEntry) -> f64 {
    entry
        .evaluation
        .as_ref()
        .map(|e| e.score)
        .unwrap_or(NEUTRAL_SCORE)
}

/// Running mean over the transcript; unscored entries count as neutral. 0 when empty.
pub fn mean_score(history: &[TranscriptEntry]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(entry_score).sum::<f64>() / history.len() as f64
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn should_continue(answered: usize) -> bool {
    answered < MAX_QUESTIONS
}

/// Guards a turn submission: completed interviews are never reopened, and a
/// client that read an older version must reload first. Both are 409s.
pub fn check_open(row: &InterviewRow, client_version: Option<i32>) -> Result<(), AppError> {
    if row.completed || row.responses.len() >= MAX_QUESTIONS {
        return Err(AppError::Conflict("Interview already completed".to_string()));
    }
    if client_version.is_some_and(|v| v != row.version) {
        return Err(AppError::Conflict(STALE_VERSION.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_count: usize,
    pub max_questions: usize,
    /// Mean score rounded to one decimal.
    pub overall_score: f64,
}

impl Progress {
    pub fn of(history: &[TranscriptEntry]) -> Self {
        Self {
            current_count: history.len(),
            max_questions: MAX_QUESTIONS,
            overall_score: round_one_decimal(mean_score(history)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub evaluation: AnswerEvaluation,
    /// Transcript including this turn.
    pub history: Vec<TranscriptEntry>,
    pub next_question: Option<String>,
    /// Job bank questions not asked yet. Empty once the interview is complete.
    pub custom_questions: Vec<JobQuestion>,
    pub should_continue: bool,
    pub progress: Progress,
}

/// Opening question, falling back to a fixed greeting on malformed model output.
pub async fn opening_question(
    interviewer: &dyn Interviewer,
    job: &Job,
    candidate_background: Option<&str>,
) -> Result<String, AppError> {
    match interviewer.opening_question(job, candidate_background).await {
        Ok(question) => Ok(question),
        Err(AppError::MalformedModelOutput { message, .. }) => {
            warn!("Using fallback opening question: {message}");
            Ok(fallback_opening_question(&job.title))
        }
        Err(e) => Err(e),
    }
}

/// Runs one turn against `history` (the stored transcript before this answer).
pub async fn conduct_turn(
    interviewer: &dyn Interviewer,
    job: &Job,
    mut history: Vec<TranscriptEntry>,
    question: &str,
    answer: &str,
) -> Result<TurnOutcome, AppError> {
    let evaluation = match interviewer.score_answer(job, question, answer).await {
        Ok(evaluation) => evaluation,
        Err(AppError::MalformedModelOutput { message, .. }) => {
            warn!("Scoring output unusable, recording neutral score: {message}");
            neutral_evaluation()
        }
        Err(e) => return Err(e),
    };

    history.push(TranscriptEntry {
        question: question.to_string(),
        answer: answer.to_string(),
        evaluation: Some(evaluation.clone()),
    });

    let progress = Progress::of(&history);
    let should_continue = should_continue(history.len());
    info!(
        "Interview progress: {}/{}, continue: {}, overall score: {:.1}",
        progress.current_count, MAX_QUESTIONS, should_continue, progress.overall_score
    );

    let (next_question, custom_questions) = if should_continue {
        let next = match interviewer
            .next_question(job, &history, mean_score(&history))
            .await
        {
            Ok(next) => next,
            Err(AppError::MalformedModelOutput { message, .. }) => {
                warn!("Using fallback next question: {message}");
                FALLBACK_NEXT_QUESTION.to_string()
            }
            Err(e) => return Err(e),
        };
        let asked = history.iter().map(|entry| entry.question.as_str());
        (Some(next), unasked_questions(&job.questions, asked))
    } else {
        (None, Vec::new())
    };

    Ok(TurnOutcome {
        evaluation,
        history,
        next_question,
        custom_questions,
        should_continue,
        progress,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;
    use crate::models::evaluation::FinalEvaluation;

    /// Scripted interviewer: pops one scoring result per turn.
    /// `None` in the script stands for malformed model output.
    pub(crate) struct ScriptedInterviewer {
        pub scores: Mutex<VecDeque<Option<f64>>>,
        pub next_question: Option<String>,
        pub final_evaluation: Option<FinalEvaluation>,
    }

    impl ScriptedInterviewer {
        pub(crate) fn new(scores: &[Option<f64>]) -> Self {
            Self {
                scores: Mutex::new(scores.iter().copied().collect()),
                next_question: Some("What did you learn from it?".to_string()),
                final_evaluation: None,
            }
        }
    }

    fn malformed() -> AppError {
        AppError::MalformedModelOutput {
            message: "scripted".to_string(),
            raw: "not json".to_string(),
        }
    }

    #[async_trait]
    impl Interviewer for ScriptedInterviewer {
        async fn opening_question(
            &self,
            _job: &Job,
            _candidate_background: Option<&str>,
        ) -> Result<String, AppError> {
            self.next_question.clone().ok_or_else(malformed)
        }

        async fn score_answer(
            &self,
            _job: &Job,
            _question: &str,
            _answer: &str,
        ) -> Result<AnswerEvaluation, AppError> {
            let next = self.scores.lock().unwrap().pop_front().flatten();
            next.map(|score| AnswerEvaluation {
                score,
                feedback: "ok".to_string(),
                strengths: vec![],
                improvements: vec![],
                is_good_answer: Some(score >= 7.0),
            })
            .ok_or_else(malformed)
        }

        async fn next_question(
            &self,
            _job: &Job,
            _history: &[TranscriptEntry],
            _overall_score: f64,
        ) -> Result<String, AppError> {
            self.next_question.clone().ok_or_else(malformed)
        }

        async fn final_evaluation(
            &self,
            _candidate_name: &str,
            _transcript: &[TranscriptEntry],
        ) -> Result<FinalEvaluation, AppError> {
            self.final_evaluation.clone().ok_or_else(malformed)
        }
    }

    pub(crate) fn job_with_questions(questions: &[&str]) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            department: Some("Platform".to_string()),
            location: None,
            employment_type: Some("Full-time".to_string()),
            salary: None,
            description: "Build APIs in Rust".to_string(),
            questions: Json(
                questions
                    .iter()
                    .map(|q| JobQuestion {
                        question: q.to_string(),
                        expected_answer: String::new(),
                    })
                    .collect(),
            ),
            created_at: Utc::now(),
        }
    }

    pub(crate) fn scored(question: &str, score: f64) -> TranscriptEntry {
        TranscriptEntry {
            question: question.to_string(),
            answer: "answer".to_string(),
            evaluation: Some(AnswerEvaluation {
                score,
                feedback: String::new(),
                strengths: vec![],
                improvements: vec![],
                is_good_answer: None,
            }),
        }
    }

    fn open_row(responses: Vec<TranscriptEntry>, completed: bool, version: i32) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            job_id: None,
            responses: Json(responses),
            completed,
            version,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_interview_accepts_matching_or_absent_version() {
        let row = open_row(vec![scored("a", 7.0)], false, 3);
        assert!(check_open(&row, Some(3)).is_ok());
        assert!(check_open(&row, None).is_ok());
    }

    #[test]
    fn test_completed_interview_is_not_reopened() {
        let row = open_row(vec![scored("a", 7.0)], true, 9);
        let err = check_open(&row, Some(9)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Interview already completed"));
    }

    #[test]
    fn test_full_transcript_counts_as_completed() {
        let row = open_row(vec![scored("a", 7.0); MAX_QUESTIONS], false, 8);
        assert!(matches!(check_open(&row, None), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_stale_client_version_conflicts() {
        let row = open_row(vec![], false, 4);
        let err = check_open(&row, Some(3)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == STALE_VERSION));
    }

    #[test]
    fn test_mean_counts_unscored_entries_as_neutral() {
        let mut unscored = scored("b", 0.0);
        unscored.evaluation = None;
        let history = vec![scored("a", 9.0), unscored];
        assert_eq!(mean_score(&history), 7.0);
        assert_eq!(mean_score(&[]), 0.0);
    }

    #[test]
    fn test_progress_rounds_to_one_decimal() {
        let history = vec![scored("a", 7.0), scored("b", 8.0), scored("c", 8.0)];
        let progress = Progress::of(&history);
        assert_eq!(progress.overall_score, 7.7);
        assert_eq!(progress.current_count, 3);
        assert_eq!(progress.max_questions, MAX_QUESTIONS);
    }

    #[test]
    fn test_fallback_opening_mentions_title() {
        assert!(fallback_opening_question("SRE").contains("the SRE position"));
    }

    #[tokio::test]
    async fn test_turn_appends_and_continues() {
        let interviewer = ScriptedInterviewer::new(&[Some(8.0)]);
        let job = job_with_questions(&["Describe a failure", "Why Rust?"]);
        let outcome = conduct_turn(
            &interviewer,
            &job,
            vec![scored("why rust?", 6.0)],
            "Tell me about yourself",
            "I build services",
        )
        .await
        .unwrap();

        assert_eq!(outcome.history.len(), 2);
        assert!(outcome.should_continue);
        assert_eq!(outcome.next_question.as_deref(), Some("What did you learn from it?"));
        assert_eq!(outcome.progress.overall_score, 7.0);
        assert_eq!(outcome.custom_questions.len(), 1);
        assert_eq!(outcome.custom_questions[0].question, "Describe a failure");
    }

    #[tokio::test]
    async fn test_malformed_score_records_neutral_evaluation() {
        let interviewer = ScriptedInterviewer::new(&[None]);
        let job = job_with_questions(&[]);
        let outcome = conduct_turn(&interviewer, &job, vec![], "Q", "A").await.unwrap();
        assert_eq!(outcome.evaluation, neutral_evaluation());
        assert_eq!(outcome.history[0].evaluation.as_ref().unwrap().score, NEUTRAL_SCORE);
    }

    #[tokio::test]
    async fn test_malformed_next_question_uses_fallback() {
        let mut interviewer = ScriptedInterviewer::new(&[Some(6.0)]);
        interviewer.next_question = None;
        let job = job_with_questions(&[]);
        let outcome = conduct_turn(&interviewer, &job, vec![], "Q", "A").await.unwrap();
        assert_eq!(outcome.next_question.as_deref(), Some(FALLBACK_NEXT_QUESTION));
    }

    #[tokio::test]
    async fn test_eighth_answer_completes_interview() {
        let interviewer = ScriptedInterviewer::new(&[Some(7.0); MAX_QUESTIONS]);
        let job = job_with_questions(&["Bank question"]);
        let mut history = Vec::new();
        let mut last = None;

        for turn in 0..MAX_QUESTIONS {
            let outcome = conduct_turn(&interviewer, &job, history, &format!("Q{turn}"), "A")
                .await
                .unwrap();
            assert_eq!(outcome.should_continue, turn + 1 < MAX_QUESTIONS);
            history = outcome.history.clone();
            last = Some(outcome);
        }

        let last = last.unwrap();
        assert_eq!(last.history.len(), MAX_QUESTIONS);
        assert!(!last.should_continue);
        assert!(last.next_question.is_none());
        assert!(last.custom_questions.is_empty());
    }

    #[tokio::test]
    async fn test_opening_question_falls_back_on_malformed_output() {
        let mut interviewer = ScriptedInterviewer::new(&[]);
        interviewer.next_question = None;
        let job = job_with_questions(&[]);
        let question = opening_question(&interviewer, &job, None).await.unwrap();
        assert_eq!(question, fallback_opening_question("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_transport_errors_are_not_swallowed() {
        struct Offline;

        #[async_trait]
        impl Interviewer for Offline {
            async fn opening_question(&self, _: &Job, _: Option<&str>) -> Result<String, AppError> {
                Err(AppError::Llm("offline".into()))
            }
            async fn score_answer(
                &self,
                _: &Job,
                _: &str,
                _: &str,
            ) -> Result<AnswerEvaluation, AppError> {
                Err(AppError::Llm("offline".into()))
            }
            async fn next_question(
                &self,
                _: &Job,
                _: &[TranscriptEntry],
                _: f64,
            ) -> Result<String, AppError> {
                Err(AppError::Llm("offline".into()))
            }
            async fn final_evaluation(
                &self,
                _: &str,
                _: &[TranscriptEntry],
            ) -> Result<FinalEvaluation, AppError> {
                Err(AppError::Llm("offline".into()))
            }
        }

        let job = job_with_questions(&[]);
        let result = conduct_turn(&Offline, &job, vec![], "Q", "A").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}

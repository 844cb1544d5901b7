use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::interviews::interviewer::Interviewer;
use crate::interviews::turn::{mean_score, round_one_decimal};
use crate::models::evaluation::{DetailedFeedback, FinalEvaluation, Recommendation};
use crate::models::interview::TranscriptEntry;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStats {
    pub total_questions: usize,
    pub average_score: f64,
    pub completion_time: DateTime<Utc>,
}

pub fn interview_stats(transcript: &[TranscriptEntry], now: DateTime<Utc>) -> InterviewStats {
    InterviewStats {
        total_questions: transcript.len(),
        average_score: mean_score(transcript),
        completion_time: now,
    }
}

/// Deterministic evaluation derived from the mean answer score, used when the
/// model's synthesis cannot be parsed.
pub fn fallback_evaluation(transcript: &[TranscriptEntry]) -> FinalEvaluation {
    let mean = mean_score(transcript);
    FinalEvaluation {
        overall_score: round_one_decimal(mean),
        recommendation: Recommendation::from_score(mean),
        summary: "Interview completed successfully. Detailed analysis available.".to_string(),
        detailed_feedback: DetailedFeedback {
            strengths: vec!["Participated in interview".to_string()],
            weaknesses: vec!["Areas for improvement identified".to_string()],
            technical_skills: vec!["Technical assessment completed".to_string()],
            communication_skills: "Communication assessed during interview".to_string(),
            problem_solving: "Problem-solving approach observed".to_string(),
        },
        next_steps: "Review with hiring team".to_string(),
        improvement_areas: vec!["Continue professional development".to_string()],
        standout_moments: vec!["Engaged throughout interview process".to_string()],
    }
}

/// Final evaluation from the interviewer, or [`fallback_evaluation`] on malformed output.
pub async fn synthesize_evaluation(
    interviewer: &dyn Interviewer,
    candidate_name: &str,
    transcript: &[TranscriptEntry],
) -> Result<FinalEvaluation, AppError> {
    match interviewer.final_evaluation(candidate_name, transcript).await {
        Ok(evaluation) => Ok(evaluation),
        Err(AppError::MalformedModelOutput { message, .. }) => {
            warn!("Final evaluation unusable, deriving from scores: {message}");
            Ok(fallback_evaluation(transcript))
        }
        Err(e) => Err(e),
    }
}

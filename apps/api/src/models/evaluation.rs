use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    #[serde(alias = "Hire", alias = "HIRE")]
    Hire,
    #[serde(alias = "Maybe", alias = "MAYBE")]
    Maybe,
    #[serde(alias = "Reject", alias = "REJECT")]
    Reject,
}

impl Recommendation {
    /// Verdict derived from a mean 1–10 score.
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            Recommendation::Hire
        } else if score >= 5.0 {
            Recommendation::Maybe
        } else {
            Recommendation::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Hire => "hire",
            Recommendation::Maybe => "maybe",
            Recommendation::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub communication_skills: String,
    #[serde(default)]
    pub problem_solving: String,
}

/// Final hire/no-hire verdict synthesized once from a completed transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalEvaluation {
    pub overall_score: f64,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detailed_feedback: DetailedFeedback,
    #[serde(default)]
    pub next_steps: String,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub standout_moments: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HireRecommendation {
    Yes,
    No,
    Maybe,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionFeedback {
    pub question: String,
    pub answer: String,
    /// 0 – 10
    pub score: f64,
    #[serde(default)]
    pub comment: String,
}

/// Transcript feedback report. Field names follow the report contract (snake_case).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptFeedback {
    /// 0 – 100
    pub overall_score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub hire_recommendation: HireRecommendation,
    #[serde(default)]
    pub per_question: Vec<QuestionFeedback>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRow {
    pub candidate_id: Uuid,
    pub evaluation: Json<FinalEvaluation>,
    pub report_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub feedback: Json<TranscriptFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(7.0), Recommendation::Hire);
        assert_eq!(Recommendation::from_score(6.9), Recommendation::Maybe);
        assert_eq!(Recommendation::from_score(5.0), Recommendation::Maybe);
        assert_eq!(Recommendation::from_score(4.9), Recommendation::Reject);
    }

    #[test]
    fn test_final_evaluation_deserializes_model_output() {
        let json = r#"{
            "overallScore": 8,
            "recommendation": "Hire",
            "summary": "Strong systems background.",
            "detailedFeedback": {
                "strengths": ["ownership"],
                "weaknesses": [],
                "technicalSkills": ["Rust", "Postgres"],
                "communicationSkills": "Clear",
                "problemSolving": "Structured"
            },
            "nextSteps": "Schedule onsite",
            "improvementAreas": ["testing"],
            "standoutMoments": ["explained backpressure well"]
        }"#;
        let eval: FinalEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.recommendation, Recommendation::Hire);
        assert_eq!(eval.overall_score, 8.0);
        assert_eq!(eval.detailed_feedback.technical_skills.len(), 2);
    }

    #[test]
    fn test_final_evaluation_tolerates_missing_narrative_fields() {
        let json = r#"{"overallScore": 4.5, "recommendation": "reject"}"#;
        let eval: FinalEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.recommendation, Recommendation::Reject);
        assert!(eval.summary.is_empty());
        assert!(eval.detailed_feedback.strengths.is_empty());
    }

    #[test]
    fn test_transcript_feedback_contract() {
        let json = r#"{
            "overall_score": 72,
            "summary": "Solid.",
            "strengths": ["clarity"],
            "improvements": ["depth"],
            "hire_recommendation": "MAYBE",
            "per_question": [
                {"question": "Q1", "answer": "A1", "score": 7, "comment": "ok"}
            ]
        }"#;
        let feedback: TranscriptFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.hire_recommendation, HireRecommendation::Maybe);
        assert_eq!(feedback.per_question.len(), 1);
        let back = serde_json::to_value(&feedback).unwrap();
        assert_eq!(back["hire_recommendation"], "MAYBE");
    }
}

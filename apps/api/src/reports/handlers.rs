//! Axum route handlers for candidate reports.

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::candidates::store::get_candidate;
use crate::errors::AppError;
use crate::extractors::{AppPath, AppQuery};
use crate::interviews::handlers::InterviewResponse;
use crate::interviews::store::{get_evaluation, get_interview};
use crate::jobs::store::get_job;
use crate::models::candidate::Candidate;
use crate::models::evaluation::{FinalEvaluation, TranscriptFeedback};
use crate::reports::feedback::generate_feedback;
use crate::reports::store::{get_feedback, upsert_feedback};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReportResponse {
    pub candidate: Candidate,
    pub interview: InterviewResponse,
    pub evaluation: Option<FinalEvaluation>,
    pub report_key: Option<String>,
    pub feedback: Option<TranscriptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub report: TranscriptFeedback,
    pub cached: bool,
}

/// GET /api/reports/:candidate_id
pub async fn handle_get_report(
    State(state): State<AppState>,
    AppPath(candidate_id): AppPath<Uuid>,
) -> Result<Json<CandidateReportResponse>, AppError> {
    let candidate = get_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    let interview = get_interview(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;

    let stored = get_evaluation(&state.db, candidate_id).await?;
    let (evaluation, report_key) = match stored {
        Some(row) => (Some(row.evaluation.0), row.report_key),
        None => (None, None),
    };
    let feedback = get_feedback(&state.db, candidate_id).await?;

    Ok(Json(CandidateReportResponse {
        candidate,
        interview: interview.into(),
        evaluation,
        report_key,
        feedback,
    }))
}

/// GET /api/reports/:candidate_id/feedback[?refresh=true]
///
/// Served from the cache unless `refresh` is set or nothing is cached yet.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    AppPath(candidate_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<FeedbackQuery>,
) -> Result<Json<FeedbackResponse>, AppError> {
    if !query.refresh {
        if let Some(report) = get_feedback(&state.db, candidate_id).await? {
            return Ok(Json(FeedbackResponse {
                report,
                cached: true,
            }));
        }
    }

    let interview = get_interview(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    if interview.responses.is_empty() {
        return Err(AppError::NotFound(
            "No stored responses for this candidate".to_string(),
        ));
    }

    let role = match interview.job_id {
        Some(job_id) => get_job(&state.db, job_id).await?.map(|job| job.title),
        None => None,
    }
    .unwrap_or_else(|| "Unknown Role".to_string());

    let report = generate_feedback(&state.llm, &role, candidate_id, &interview.responses).await?;
    upsert_feedback(&state.db, candidate_id, &report).await?;
    info!(
        "Generated feedback report for {candidate_id} ({:?}, {:.0}/100)",
        report.hire_recommendation, report.overall_score
    );

    Ok(Json(FeedbackResponse {
        report,
        cached: false,
    }))
}

//! Axum route handlers for the interview loop and final evaluation.

use axum::{
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::candidates::store::{get_candidate, get_resume};
use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::interviews::evaluation::{interview_stats, synthesize_evaluation, InterviewStats};
use crate::interviews::store::{
    get_evaluation, get_interview, reset_interview, save_turn, upsert_evaluation,
};
use crate::interviews::turn::{
    self, check_open, conduct_turn, Progress, MAX_QUESTIONS, STALE_VERSION,
};
use crate::jobs::store::get_job;
use crate::models::evaluation::FinalEvaluation;
use crate::models::interview::{AnswerEvaluation, InterviewRow, TranscriptEntry};
use crate::models::job::{Job, JobQuestion};
use crate::reports::render::{archive_report, render_report_markdown};
use crate::resume::blob::decode_resume;
use crate::resume::extract::resume_excerpt;
use crate::state::AppState;

/// Resume text given to the opening-question prompt.
const BACKGROUND_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewRequest {
    pub candidate_id: Option<Uuid>,
    pub job_profile_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct JobProfileSummary {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewResponse {
    pub initial_question: String,
    pub custom_questions: Vec<JobQuestion>,
    pub max_questions: usize,
    pub job_profile: JobProfileSummary,
    pub version: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerRequest {
    pub candidate_id: Option<Uuid>,
    pub job_profile_id: Option<Uuid>,
    pub current_question: Option<String>,
    pub current_answer: Option<String>,
    /// Version the client last saw; checked before any scoring happens.
    pub version: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerResponse {
    pub evaluation: AnswerEvaluation,
    pub next_question: Option<String>,
    pub custom_questions: Vec<JobQuestion>,
    pub should_continue: bool,
    pub progress: Progress,
    pub interview_complete: bool,
    pub version: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub candidate_id: Uuid,
    pub job_id: Option<Uuid>,
    pub responses: Vec<TranscriptEntry>,
    pub completed: bool,
    pub version: i32,
    pub progress: Progress,
    pub updated_at: DateTime<Utc>,
}

impl From<InterviewRow> for InterviewResponse {
    fn from(row: InterviewRow) -> Self {
        let progress = Progress::of(&row.responses);
        Self {
            candidate_id: row.candidate_id,
            job_id: row.job_id,
            responses: row.responses.0,
            completed: row.completed,
            version: row.version,
            progress,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEvaluationRequest {
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEvaluationQuery {
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEvaluationResponse {
    pub success: bool,
    pub evaluation: FinalEvaluation,
    pub interview_stats: InterviewStats,
    pub report_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoredEvaluationResponse {
    pub evaluation: Option<FinalEvaluation>,
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

async fn load_job(state: &AppState, job_id: Uuid) -> Result<Job, AppError> {
    get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// Resume excerpt for prompt context. Any failure just means no background.
async fn candidate_background(state: &AppState, candidate_id: Uuid) -> Option<String> {
    let blob = match get_resume(&state.db, candidate_id).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            warn!("Could not load resume for candidate {candidate_id}: {e}");
            return None;
        }
    };
    let bytes = decode_resume(&blob.resume).ok()?;
    resume_excerpt(&bytes, BACKGROUND_CHARS)
        .await
        .filter(|text| !text.is_empty())
}

/// POST /api/interviews/start
pub async fn handle_start_interview(
    State(state): State<AppState>,
    AppJson(request): AppJson<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let candidate_id = required(request.candidate_id, "candidateId")?;
    let job_id = required(request.job_profile_id, "jobProfileId")?;

    let job = load_job(&state, job_id).await?;
    if get_candidate(&state.db, candidate_id).await?.is_none() {
        return Err(AppError::NotFound("Candidate not found".to_string()));
    }

    let background = candidate_background(&state, candidate_id).await;
    let initial_question =
        turn::opening_question(state.interviewer.as_ref(), &job, background.as_deref()).await?;

    let row = reset_interview(&state.db, candidate_id, job_id).await?;
    info!(
        "Started interview for candidate {candidate_id} on job {job_id} (version {})",
        row.version
    );

    Ok(Json(StartInterviewResponse {
        initial_question,
        custom_questions: job.questions.0.clone(),
        max_questions: MAX_QUESTIONS,
        job_profile: JobProfileSummary {
            title: job.title,
            description: job.description,
        },
        version: row.version,
    }))
}

/// POST /api/interviews/evaluate
///
/// Scores one answer and advances the interview. The write is conditional on the
/// version read at the start of the request, so a concurrent or repeated
/// submission gets a 409 instead of being counted twice.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    AppJson(request): AppJson<EvaluateAnswerRequest>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    let candidate_id = required(request.candidate_id, "candidateId")?;
    let question = request
        .current_question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("currentQuestion is required".to_string()))?;
    let answer = required(request.current_answer, "currentAnswer")?;

    let row = get_interview(&state.db, candidate_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Interview not found. Start the interview first.".to_string())
        })?;
    check_open(&row, request.version)?;

    let job_id = request
        .job_profile_id
        .or(row.job_id)
        .ok_or_else(|| AppError::Validation("jobProfileId is required".to_string()))?;
    let job = load_job(&state, job_id).await?;

    let outcome = conduct_turn(
        state.interviewer.as_ref(),
        &job,
        row.responses.0,
        &question,
        &answer,
    )
    .await?;

    let saved = save_turn(
        &state.db,
        candidate_id,
        row.version,
        &outcome.history,
        !outcome.should_continue,
    )
    .await?
    .ok_or_else(|| AppError::Conflict(STALE_VERSION.to_string()))?;

    if !outcome.should_continue {
        info!("Interview for candidate {candidate_id} completed");
    }

    Ok(Json(EvaluateAnswerResponse {
        evaluation: outcome.evaluation,
        next_question: outcome.next_question,
        custom_questions: outcome.custom_questions,
        should_continue: outcome.should_continue,
        progress: outcome.progress,
        interview_complete: !outcome.should_continue,
        version: saved.version,
    }))
}

/// GET /api/interviews/:candidate_id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    AppPath(candidate_id): AppPath<Uuid>,
) -> Result<Json<InterviewResponse>, AppError> {
    let row = get_interview(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    Ok(Json(row.into()))
}

/// POST /api/interviews/final-evaluation
///
/// Synthesizes, stores and archives the final evaluation. Archiving is best effort.
pub async fn handle_final_evaluation(
    State(state): State<AppState>,
    AppJson(request): AppJson<FinalEvaluationRequest>,
) -> Result<Json<FinalEvaluationResponse>, AppError> {
    let candidate_id = required(request.candidate_id, "candidateId")?;

    let interview = get_interview(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;
    let transcript = interview.responses.0;
    if transcript.is_empty() {
        return Err(AppError::Validation(
            "Interview has no answers to evaluate".to_string(),
        ));
    }

    let candidate_name = get_candidate(&state.db, candidate_id)
        .await?
        .map(|c| c.full_name())
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;

    let evaluation =
        synthesize_evaluation(state.interviewer.as_ref(), &candidate_name, &transcript).await?;

    let now = Utc::now();
    let markdown = render_report_markdown(&candidate_name, &evaluation, &transcript, now);
    let report_key =
        match archive_report(&state.s3, &state.config.s3_bucket, candidate_id, markdown).await {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Evaluation report for {candidate_id} not archived: {e}");
                None
            }
        };

    upsert_evaluation(&state.db, candidate_id, &evaluation, report_key.as_deref()).await?;
    info!(
        "Final evaluation for {candidate_id}: {} ({:.1})",
        evaluation.recommendation.as_str(),
        evaluation.overall_score
    );

    Ok(Json(FinalEvaluationResponse {
        success: true,
        interview_stats: interview_stats(&transcript, now),
        evaluation,
        report_key,
    }))
}

/// GET /api/interviews/final-evaluation?candidateId=
pub async fn handle_get_final_evaluation(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FinalEvaluationQuery>,
) -> Result<Json<StoredEvaluationResponse>, AppError> {
    let candidate_id = required(query.candidate_id, "candidateId")?;
    let evaluation = get_evaluation(&state.db, candidate_id)
        .await?
        .map(|row| row.evaluation.0);
    Ok(Json(StoredEvaluationResponse { evaluation }))
}

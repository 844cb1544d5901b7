//! Axum route handlers for job profiles and their question banks.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath};
use crate::jobs::questions::{apply_question_update, clean_questions, QuestionInput, QuestionMode};
use crate::jobs::store::{get_job, insert_job, list_jobs, update_job, JobPatch, NewJob};
use crate::models::job::Job;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<QuestionInput>>,
    pub question_mode: Option<QuestionMode>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub job: Job,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = list_jobs(&state.db).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    let (Some(title), Some(description)) =
        (non_blank(&request.title), non_blank(&request.description))
    else {
        return Err(AppError::Validation(
            "Missing required fields: title and description are required".to_string(),
        ));
    };

    let questions = clean_questions(&request.questions);
    let job = insert_job(
        &state.db,
        &NewJob {
            title,
            department: request.department.as_deref(),
            location: request.location.as_deref(),
            employment_type: request.employment_type.as_deref(),
            salary: request.salary.as_deref(),
            description,
            questions: &questions,
        },
    )
    .await?;

    info!("Created job {} ({})", job.id, job.title);
    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            success: true,
            job_id: job.id,
            job,
        }),
    ))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

/// PATCH /api/jobs/:id
///
/// Absent fields keep their stored values. `questions` are merged into the bank
/// (`questionMode: "append"`, the default) or replace it (`"replace"`).
pub async fn handle_update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    if matches!(request.title.as_deref(), Some(t) if t.trim().is_empty()) {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if matches!(request.description.as_deref(), Some(d) if d.trim().is_empty()) {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let current = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let final_questions = request.questions.as_ref().map(|submitted| {
        apply_question_update(
            &current.questions,
            submitted,
            request.question_mode.unwrap_or_default(),
        )
    });

    let patch = JobPatch {
        title: request.title.as_deref().map(str::trim),
        department: request.department.as_deref(),
        location: request.location.as_deref(),
        employment_type: request.employment_type.as_deref(),
        salary: request.salary.as_deref(),
        description: request.description.as_deref(),
        questions: final_questions.as_deref(),
    };

    let job = update_job(&state.db, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    info!(
        "Updated job {} ({} questions)",
        job.id,
        job.questions.len()
    );
    Ok(Json(job))
}

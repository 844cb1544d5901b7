//! Axum route handlers for candidates.

use anyhow::anyhow;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::candidates::store::{
    delete_candidate, get_candidate, get_resume, insert_candidate, list_candidates,
    update_candidate,
};
use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath};
use crate::models::candidate::Candidate;
use crate::resume::blob::{
    attachment_header, content_type_for, decode_resume, encode_resume, text_resume_file_name,
};
use crate::resume::ingest::{
    extract_candidate_fields, extract_fields_from_text, field_error_response, summarize_resume,
    validate_fields, ContactFields, FieldError,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
pub struct CandidateResponse {
    pub candidate: Candidate,
}

#[derive(Debug, Serialize)]
pub struct CreateCandidateResponse {
    pub success: bool,
    pub candidate: Candidate,
}

/// Response for AI-assisted creation; echoes what the model extracted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCandidateResponse {
    pub success: bool,
    pub message: String,
    pub candidate: Candidate,
    pub extracted_info: ContactFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCreateRequest {
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeSummaryResponse {
    pub valid: bool,
    pub summary: String,
}

struct UploadedFile {
    file_name: String,
    bytes: Bytes,
}

#[derive(Default)]
struct CandidateForm {
    contact: ContactFields,
    resume: Option<UploadedFile>,
}

/// Reads the candidate multipart form. Unknown parts are ignored.
/// A resume larger than `max_file_bytes` is rejected with a 413.
async fn read_candidate_form(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<CandidateForm, AppError> {
    let mut form = CandidateForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "firstName" => form.contact.first_name = Some(field.text().await?),
            "lastName" => form.contact.last_name = Some(field.text().await?),
            "email" => form.contact.email = Some(field.text().await?),
            "phone" => form.contact.phone = Some(field.text().await?),
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field.bytes().await?;
                if bytes.len() > max_file_bytes {
                    return Err(AppError::PayloadTooLarge);
                }
                form.resume = Some(UploadedFile { file_name, bytes });
            }
            _ => {}
        }
    }
    Ok(form)
}

fn candidate_not_found() -> AppError {
    AppError::NotFound("Candidate not found".to_string())
}

fn submitted_field_error(err: FieldError) -> AppError {
    match err {
        FieldError::MissingRequired => {
            AppError::Validation("firstName, lastName and email are required".to_string())
        }
        FieldError::InvalidEmail => AppError::Validation("Invalid email address".to_string()),
    }
}

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let candidates = list_candidates(&state.db).await?;
    Ok(Json(CandidateListResponse { candidates }))
}

/// POST /api/candidates (multipart: firstName, lastName, email, phone?, resume)
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreateCandidateResponse>), AppError> {
    let form = read_candidate_form(multipart?, state.config.max_upload_bytes).await?;

    let resume = form.resume.filter(|file| !file.bytes.is_empty()).ok_or_else(|| {
        AppError::Validation(
            "firstName, lastName, email and a resume file are required".to_string(),
        )
    })?;
    let fields = validate_fields(&form.contact).map_err(|err| match err {
        FieldError::MissingRequired => AppError::Validation(
            "firstName, lastName, email and a resume file are required".to_string(),
        ),
        other => submitted_field_error(other),
    })?;

    let candidate = insert_candidate(
        &state.db,
        &fields,
        &encode_resume(&resume.bytes),
        &resume.file_name,
    )
    .await?;

    info!("Created candidate {} ({})", candidate.id, candidate.full_name());
    Ok((
        StatusCode::CREATED,
        Json(CreateCandidateResponse {
            success: true,
            candidate,
        }),
    ))
}

/// POST /api/candidates/smart (multipart: resume)
///
/// Contact fields are extracted from the resume by the model.
pub async fn handle_smart_create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ExtractedCandidateResponse>), AppError> {
    let form = read_candidate_form(multipart?, state.config.max_upload_bytes).await?;
    let resume = form
        .resume
        .filter(|file| !file.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;

    info!(
        "Smart create: {} ({:.1}KB)",
        resume.file_name,
        resume.bytes.len() as f64 / 1024.0
    );

    let extracted = extract_candidate_fields(&state.llm, &resume.bytes, &resume.file_name).await?;
    let fields = validate_fields(&extracted).map_err(|err| field_error_response(err, &extracted))?;

    let candidate = insert_candidate(
        &state.db,
        &fields,
        &encode_resume(&resume.bytes),
        &resume.file_name,
    )
    .await?;

    info!("Created candidate {} from resume upload", candidate.id);
    Ok((
        StatusCode::CREATED,
        Json(ExtractedCandidateResponse {
            success: true,
            message: "Candidate created successfully".to_string(),
            candidate,
            extracted_info: extracted,
        }),
    ))
}

/// POST /api/candidates/text
pub async fn handle_text_create(
    State(state): State<AppState>,
    AppJson(request): AppJson<TextCreateRequest>,
) -> Result<(StatusCode, Json<ExtractedCandidateResponse>), AppError> {
    let resume_text = request
        .resume_text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Resume text is required".to_string()))?;

    let extracted = extract_fields_from_text(&state.llm, &resume_text).await?;
    let fields = validate_fields(&extracted).map_err(|err| field_error_response(err, &extracted))?;

    let file_name = text_resume_file_name(Utc::now().timestamp_millis());
    let candidate = insert_candidate(
        &state.db,
        &fields,
        &encode_resume(resume_text.as_bytes()),
        &file_name,
    )
    .await?;

    info!("Created candidate {} from resume text", candidate.id);
    Ok((
        StatusCode::CREATED,
        Json(ExtractedCandidateResponse {
            success: true,
            message: "Candidate created successfully from resume text".to_string(),
            candidate,
            extracted_info: extracted,
        }),
    ))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CandidateResponse>, AppError> {
    let candidate = get_candidate(&state.db, id)
        .await?
        .ok_or_else(candidate_not_found)?;
    Ok(Json(CandidateResponse { candidate }))
}

/// PUT /api/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<ContactFields>,
) -> Result<Json<CandidateResponse>, AppError> {
    let fields = validate_fields(&request).map_err(submitted_field_error)?;
    let candidate = update_candidate(&state.db, id, &fields)
        .await?
        .ok_or_else(candidate_not_found)?;
    info!("Updated candidate {}", candidate.id);
    Ok(Json(CandidateResponse { candidate }))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_candidate(&state.db, id).await? {
        return Err(candidate_not_found());
    }
    info!("Deleted candidate {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_resume_bytes(state: &AppState, id: Uuid) -> Result<(Vec<u8>, String), AppError> {
    let blob = get_resume(&state.db, id)
        .await?
        .ok_or_else(candidate_not_found)?;
    if blob.resume.trim().is_empty() {
        return Err(AppError::NotFound(
            "No resume found for this candidate".to_string(),
        ));
    }
    let bytes = decode_resume(&blob.resume)
        .map_err(|e| anyhow!("Stored resume for candidate {id} is not valid base64: {e}"))?;
    Ok((bytes, blob.resume_file_name))
}

/// GET /api/candidates/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let (bytes, file_name) = load_resume_bytes(&state, id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&bytes).to_string()),
            (header::CONTENT_DISPOSITION, attachment_header(&file_name)),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/candidates/:id/summary
pub async fn handle_resume_summary(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ResumeSummaryResponse>, AppError> {
    let (bytes, _) = load_resume_bytes(&state, id).await?;
    let summary = summarize_resume(&state.llm, &bytes).await?;
    Ok(Json(ResumeSummaryResponse {
        valid: true,
        summary,
    }))
}

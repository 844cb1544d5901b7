pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::candidates::handlers as candidates;
use crate::interviews::handlers as interviews;
use crate::jobs::handlers as jobs;
use crate::reports::handlers as reports;
use crate::state::AppState;

/// Allowance on top of the file limit for multipart boundaries and text fields.
/// Oversized files are rejected by the upload handlers themselves.
pub const MULTIPART_ENVELOPE_BYTES: usize = 64 * 1024;

pub fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_add(MULTIPART_ENVELOPE_BYTES)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = body_limit(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Recruiter accounts
        .route("/api/user/signup", post(auth::handle_signup))
        .route("/api/user/login", post(auth::handle_login))
        .route("/api/user/me", get(auth::handle_me))
        .route("/api/user/logout", post(auth::handle_logout))
        // Candidates
        .route(
            "/api/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route("/api/candidates/smart", post(candidates::handle_smart_create))
        .route("/api/candidates/text", post(candidates::handle_text_create))
        .route(
            "/api/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        .route(
            "/api/candidates/:id/resume",
            get(candidates::handle_download_resume),
        )
        .route(
            "/api/candidates/:id/summary",
            get(candidates::handle_resume_summary),
        )
        // Job profiles
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job).patch(jobs::handle_update_job),
        )
        // Interviews
        .route("/api/interviews/start", post(interviews::handle_start_interview))
        .route(
            "/api/interviews/evaluate",
            post(interviews::handle_evaluate_answer),
        )
        .route(
            "/api/interviews/final-evaluation",
            post(interviews::handle_final_evaluation)
                .get(interviews::handle_get_final_evaluation),
        )
        .route(
            "/api/interviews/:candidate_id",
            get(interviews::handle_get_interview),
        )
        // Reports
        .route("/api/reports/:candidate_id", get(reports::handle_get_report))
        .route(
            "/api/reports/:candidate_id/feedback",
            get(reports::handle_get_feedback),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

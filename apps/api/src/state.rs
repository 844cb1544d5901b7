use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::interviews::interviewer::Interviewer;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Session token store.
    pub redis: RedisClient,
    /// Archive for rendered evaluation reports.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Question generation and scoring for the interview loop. Default: LlmInterviewer.
    pub interviewer: Arc<dyn Interviewer>,
}

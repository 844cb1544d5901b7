use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Candidate as returned by the API. The resume blob is served separately.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub resume_file_name: String,
    pub has_resume: bool,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Stored resume: base64 of the uploaded bytes plus the original filename.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeBlob {
    pub resume: String,
    pub resume_file_name: String,
}

/// Identity fields shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

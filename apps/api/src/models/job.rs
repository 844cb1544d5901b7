use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of a job's interview question bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobQuestion {
    pub question: String,
    #[serde(default)]
    pub expected_answer: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub department: Option<String>,
    pub location: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub questions: Json<Vec<JobQuestion>>,
    pub created_at: DateTime<Utc>,
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::with_retry;
use crate::models::candidate::{Candidate, CandidateFields, ResumeBlob};

/// The resume blob itself is never selected here; see [`get_resume`].
const CANDIDATE_COLUMNS: &str = "id, first_name, last_name, email, phone, resume_file_name, \
     (resume <> '') AS has_resume, created_at";

pub async fn list_candidates(pool: &PgPool) -> Result<Vec<Candidate>, sqlx::Error> {
    let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC");
    let sql = sql.as_str();
    with_retry("list_candidates", move || {
        sqlx::query_as::<_, Candidate>(sql).fetch_all(pool)
    })
    .await
}

pub async fn get_candidate(pool: &PgPool, id: Uuid) -> Result<Option<Candidate>, sqlx::Error> {
    let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
    let sql = sql.as_str();
    with_retry("get_candidate", move || {
        sqlx::query_as::<_, Candidate>(sql).bind(id).fetch_optional(pool)
    })
    .await
}

/// Inserts a candidate. `resume` is the base64 blob.
pub async fn insert_candidate(
    pool: &PgPool,
    fields: &CandidateFields,
    resume: &str,
    resume_file_name: &str,
) -> Result<Candidate, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO candidates (first_name, last_name, email, phone, resume, resume_file_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {CANDIDATE_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("insert_candidate", move || {
        sqlx::query_as::<_, Candidate>(sql)
            .bind(fields.first_name.as_str())
            .bind(fields.last_name.as_str())
            .bind(fields.email.as_str())
            .bind(fields.phone.as_str())
            .bind(resume)
            .bind(resume_file_name)
            .fetch_one(pool)
    })
    .await
}

/// Full-field update of the identity columns. Returns `None` when the candidate does not exist.
pub async fn update_candidate(
    pool: &PgPool,
    id: Uuid,
    fields: &CandidateFields,
) -> Result<Option<Candidate>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE candidates
        SET first_name = $2, last_name = $3, email = $4, phone = $5
        WHERE id = $1
        RETURNING {CANDIDATE_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("update_candidate", move || {
        sqlx::query_as::<_, Candidate>(sql)
            .bind(id)
            .bind(fields.first_name.as_str())
            .bind(fields.last_name.as_str())
            .bind(fields.email.as_str())
            .bind(fields.phone.as_str())
            .fetch_optional(pool)
    })
    .await
}

/// Deletes a candidate; interview, evaluation and feedback rows cascade.
/// Returns `false` when nothing was deleted.
pub async fn delete_candidate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = with_retry("delete_candidate", move || {
        sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(pool)
    })
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<Option<ResumeBlob>, sqlx::Error> {
    with_retry("get_resume", move || {
        sqlx::query_as::<_, ResumeBlob>(
            "SELECT resume, resume_file_name FROM candidates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
    })
    .await
}

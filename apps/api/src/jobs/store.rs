use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::with_retry;
use crate::models::job::{Job, JobQuestion};

const JOB_COLUMNS: &str =
    "id, title, department, location, type, salary, description, questions, created_at";

/// Column values for a new job.
pub struct NewJob<'a> {
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub location: Option<&'a str>,
    pub employment_type: Option<&'a str>,
    pub salary: Option<&'a str>,
    pub description: &'a str,
    pub questions: &'a [JobQuestion],
}

/// Partial update; `None` keeps the stored value.
#[derive(Default)]
pub struct JobPatch<'a> {
    pub title: Option<&'a str>,
    pub department: Option<&'a str>,
    pub location: Option<&'a str>,
    pub employment_type: Option<&'a str>,
    pub salary: Option<&'a str>,
    pub description: Option<&'a str>,
    pub questions: Option<&'a [JobQuestion]>,
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>, sqlx::Error> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC");
    let sql = sql.as_str();
    with_retry("list_jobs", move || {
        sqlx::query_as::<_, Job>(sql).fetch_all(pool)
    })
    .await
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
    let sql = sql.as_str();
    with_retry("get_job", move || {
        sqlx::query_as::<_, Job>(sql).bind(id).fetch_optional(pool)
    })
    .await
}

pub async fn insert_job(pool: &PgPool, job: &NewJob<'_>) -> Result<Job, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO jobs (title, department, location, type, salary, description, questions)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {JOB_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("insert_job", move || {
        sqlx::query_as::<_, Job>(sql)
            .bind(job.title)
            .bind(job.department)
            .bind(job.location)
            .bind(job.employment_type)
            .bind(job.salary)
            .bind(job.description)
            .bind(Json(job.questions))
            .fetch_one(pool)
    })
    .await
}

/// Applies `patch` with COALESCE so absent fields are left untouched.
/// Returns `None` when the job does not exist.
pub async fn update_job(
    pool: &PgPool,
    id: Uuid,
    patch: &JobPatch<'_>,
) -> Result<Option<Job>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE jobs
        SET
            title       = COALESCE($2, title),
            department  = COALESCE($3, department),
            location    = COALESCE($4, location),
            type        = COALESCE($5, type),
            salary      = COALESCE($6, salary),
            description = COALESCE($7, description),
            questions   = COALESCE($8, questions)
        WHERE id = $1
        RETURNING {JOB_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("update_job", move || {
        sqlx::query_as::<_, Job>(sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.department)
            .bind(patch.location)
            .bind(patch.employment_type)
            .bind(patch.salary)
            .bind(patch.description)
            .bind(patch.questions.map(Json))
            .fetch_optional(pool)
    })
    .await
}

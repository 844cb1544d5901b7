use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::with_retry;
use crate::models::evaluation::{FeedbackRow, TranscriptFeedback};

pub async fn get_feedback(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<TranscriptFeedback>, sqlx::Error> {
    let row = with_retry("get_feedback", move || {
        sqlx::query_as::<_, FeedbackRow>(
            "SELECT feedback FROM interview_feedback WHERE candidate_id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(pool)
    })
    .await?;
    Ok(row.map(|r| r.feedback.0))
}

pub async fn upsert_feedback(
    pool: &PgPool,
    candidate_id: Uuid,
    feedback: &TranscriptFeedback,
) -> Result<(), sqlx::Error> {
    with_retry("upsert_feedback", move || {
        sqlx::query(
            r#"
            INSERT INTO interview_feedback (candidate_id, feedback)
            VALUES ($1, $2)
            ON CONFLICT (candidate_id) DO UPDATE
            SET feedback = EXCLUDED.feedback, created_at = now()
            "#,
        )
        .bind(candidate_id)
        .bind(Json(feedback))
        .execute(pool)
    })
    .await?;
    Ok(())
}

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::with_retry;
use crate::models::evaluation::{EvaluationRow, FinalEvaluation};
use crate::models::interview::{InterviewRow, TranscriptEntry};

const INTERVIEW_COLUMNS: &str =
    "id, candidate_id, job_id, responses, completed, version, created_at, updated_at";

pub async fn get_interview(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<InterviewRow>, sqlx::Error> {
    let sql = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE candidate_id = $1");
    let sql = sql.as_str();
    with_retry("get_interview", move || {
        sqlx::query_as::<_, InterviewRow>(sql)
            .bind(candidate_id)
            .fetch_optional(pool)
    })
    .await
}

/// Creates the candidate's interview or resets an existing one to an empty,
/// open transcript. The version is bumped so stale turn submissions are rejected.
///
/// The previous run's final evaluation and cached feedback are deleted in the
/// same statement, so a report never pairs a fresh transcript with an old verdict.
pub async fn reset_interview(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<InterviewRow, sqlx::Error> {
    let sql = format!(
        r#"
        WITH
            cleared_evaluation AS (
                DELETE FROM interview_evaluations WHERE candidate_id = $1
            ),
            cleared_feedback AS (
                DELETE FROM interview_feedback WHERE candidate_id = $1
            )
        INSERT INTO interviews (candidate_id, job_id, responses, completed)
        VALUES ($1, $2, '[]'::jsonb, FALSE)
        ON CONFLICT (candidate_id) DO UPDATE
        SET
            job_id     = EXCLUDED.job_id,
            responses  = '[]'::jsonb,
            completed  = FALSE,
            version    = interviews.version + 1,
            updated_at = now()
        RETURNING {INTERVIEW_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("reset_interview", move || {
        sqlx::query_as::<_, InterviewRow>(sql)
            .bind(candidate_id)
            .bind(job_id)
            .fetch_one(pool)
    })
    .await
}

/// Writes a turn only if the row is still at `expected_version` and open.
/// Returns `None` when another write got there first or the interview completed.
pub async fn save_turn(
    pool: &PgPool,
    candidate_id: Uuid,
    expected_version: i32,
    responses: &[TranscriptEntry],
    completed: bool,
) -> Result<Option<InterviewRow>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE interviews
        SET
            responses  = $3,
            completed  = $4,
            version    = version + 1,
            updated_at = now()
        WHERE candidate_id = $1 AND version = $2 AND NOT completed
        RETURNING {INTERVIEW_COLUMNS}
        "#
    );
    let sql = sql.as_str();
    with_retry("save_turn", move || {
        sqlx::query_as::<_, InterviewRow>(sql)
            .bind(candidate_id)
            .bind(expected_version)
            .bind(Json(responses))
            .bind(completed)
            .fetch_optional(pool)
    })
    .await
}

pub async fn get_evaluation(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<EvaluationRow>, sqlx::Error> {
    with_retry("get_evaluation", move || {
        sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT candidate_id, evaluation, report_key, created_at
            FROM interview_evaluations
            WHERE candidate_id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(pool)
    })
    .await
}

/// Inserts or replaces the candidate's final evaluation.
pub async fn upsert_evaluation(
    pool: &PgPool,
    candidate_id: Uuid,
    evaluation: &FinalEvaluation,
    report_key: Option<&str>,
) -> Result<EvaluationRow, sqlx::Error> {
    with_retry("upsert_evaluation", move || {
        sqlx::query_as::<_, EvaluationRow>(
            r#"
            INSERT INTO interview_evaluations (candidate_id, evaluation, report_key)
            VALUES ($1, $2, $3)
            ON CONFLICT (candidate_id) DO UPDATE
            SET
                evaluation = EXCLUDED.evaluation,
                report_key = EXCLUDED.report_key,
                created_at = now()
            RETURNING candidate_id, evaluation, report_key, created_at
            "#,
        )
        .bind(candidate_id)
        .bind(Json(evaluation))
        .bind(report_key)
        .fetch_one(pool)
    })
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::candidates::store::insert_candidate;
    use crate::interviews::evaluation::fallback_evaluation;
    use crate::interviews::turn::tests::scored;
    use crate::jobs::store::{insert_job, NewJob};
    use crate::models::candidate::CandidateFields;
    use crate::models::evaluation::{HireRecommendation, TranscriptFeedback};
    use crate::reports::store::{get_feedback, upsert_feedback};

    /// Inserts one candidate and one job, returning their ids.
    pub(crate) async fn seed_candidate_and_job(pool: &PgPool) -> (Uuid, Uuid) {
        let candidate = insert_candidate(
            pool,
            &CandidateFields {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: String::new(),
            },
            "cmVzdW1l",
            "resume.txt",
        )
        .await
        .unwrap();
        let job = insert_job(
            pool,
            &NewJob {
                title: "Backend Engineer",
                department: None,
                location: None,
                employment_type: None,
                salary: None,
                description: "Build APIs in Rust",
                questions: &[],
            },
        )
        .await
        .unwrap();
        (candidate.id, job.id)
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_second_write_at_same_version_loses(pool: PgPool) {
        let (candidate_id, job_id) = seed_candidate_and_job(&pool).await;
        let started = reset_interview(&pool, candidate_id, job_id).await.unwrap();

        let first = save_turn(&pool, candidate_id, started.version, &[scored("Q1", 7.0)], false)
            .await
            .unwrap()
            .expect("first write wins");
        assert_eq!(first.version, started.version + 1);

        let second = save_turn(&pool, candidate_id, started.version, &[scored("Q1", 3.0)], false)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = get_interview(&pool, candidate_id).await.unwrap().unwrap();
        assert_eq!(stored.responses.len(), 1);
        assert_eq!(stored.responses[0].evaluation.as_ref().unwrap().score, 7.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_completed_interview_rejects_further_turns(pool: PgPool) {
        let (candidate_id, job_id) = seed_candidate_and_job(&pool).await;
        let started = reset_interview(&pool, candidate_id, job_id).await.unwrap();
        let done = save_turn(&pool, candidate_id, started.version, &[scored("Q1", 7.0)], true)
            .await
            .unwrap()
            .unwrap();

        let after = save_turn(&pool, candidate_id, done.version, &[], false)
            .await
            .unwrap();
        assert!(after.is_none());
        assert!(get_interview(&pool, candidate_id).await.unwrap().unwrap().completed);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_restart_clears_previous_verdict_and_feedback(pool: PgPool) {
        let (candidate_id, job_id) = seed_candidate_and_job(&pool).await;
        let first = reset_interview(&pool, candidate_id, job_id).await.unwrap();
        let transcript = vec![scored("Q1", 8.0)];
        save_turn(&pool, candidate_id, first.version, &transcript, true)
            .await
            .unwrap()
            .unwrap();
        upsert_evaluation(&pool, candidate_id, &fallback_evaluation(&transcript), None)
            .await
            .unwrap();
        let feedback = TranscriptFeedback {
            overall_score: 80.0,
            summary: "Solid".to_string(),
            strengths: vec![],
            improvements: vec![],
            hire_recommendation: HireRecommendation::Yes,
            per_question: vec![],
        };
        upsert_feedback(&pool, candidate_id, &feedback).await.unwrap();

        let restarted = reset_interview(&pool, candidate_id, job_id).await.unwrap();
        assert!(restarted.version > first.version);
        assert!(restarted.responses.is_empty());
        assert!(!restarted.completed);
        assert!(get_evaluation(&pool, candidate_id).await.unwrap().is_none());
        assert!(get_feedback(&pool, candidate_id).await.unwrap().is_none());
    }
}

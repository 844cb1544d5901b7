//! Markdown rendering and object-storage archiving of final evaluation reports.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::evaluation::FinalEvaluation;
use crate::models::interview::TranscriptEntry;

pub fn report_key(candidate_id: Uuid) -> String {
    format!("reports/{candidate_id}/evaluation.md")
}

fn push_list(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("### {heading}\n"));
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

/// Renders the evaluation and transcript as a standalone markdown document.
pub fn render_report_markdown(
    candidate_name: &str,
    evaluation: &FinalEvaluation,
    transcript: &[TranscriptEntry],
    generated_at: DateTime<Utc>,
) -> String {
    let mut md = format!("# Interview Evaluation: {candidate_name}\n\n");
    md.push_str(&format!(
        "- **Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!(
        "- **Overall score:** {:.1}/10\n",
        evaluation.overall_score
    ));
    md.push_str(&format!(
        "- **Recommendation:** {}\n\n",
        evaluation.recommendation.as_str()
    ));

    if !evaluation.summary.is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str(&evaluation.summary);
        md.push_str("\n\n");
    }

    let feedback = &evaluation.detailed_feedback;
    md.push_str("## Detailed Feedback\n\n");
    push_list(&mut md, "Strengths", &feedback.strengths);
    push_list(&mut md, "Weaknesses", &feedback.weaknesses);
    push_list(&mut md, "Technical Skills", &feedback.technical_skills);
    if !feedback.communication_skills.is_empty() {
        md.push_str(&format!(
            "- **Communication:** {}\n",
            feedback.communication_skills
        ));
    }
    if !feedback.problem_solving.is_empty() {
        md.push_str(&format!(
            "- **Problem solving:** {}\n",
            feedback.problem_solving
        ));
    }
    md.push('\n');

    push_list(&mut md, "Improvement Areas", &evaluation.improvement_areas);
    push_list(&mut md, "Standout Moments", &evaluation.standout_moments);
    if !evaluation.next_steps.is_empty() {
        md.push_str(&format!("**Next steps:** {}\n\n", evaluation.next_steps));
    }

    md.push_str("## Transcript\n\n");
    for (idx, entry) in transcript.iter().enumerate() {
        md.push_str(&format!("### Q{}: {}\n", idx + 1, entry.question));
        md.push_str(&format!("{}\n", entry.answer));
        if let Some(e) = &entry.evaluation {
            md.push_str(&format!("- **Score:** {}/10\n", e.score));
            if !e.feedback.is_empty() {
                md.push_str(&format!("- **Feedback:** {}\n", e.feedback));
            }
        }
        md.push('\n');
    }
    md
}

/// Uploads a rendered report and returns its key.
pub async fn archive_report(
    s3: &S3Client,
    bucket: &str,
    candidate_id: Uuid,
    markdown: String,
) -> Result<String, AppError> {
    let key = report_key(candidate_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(markdown.into_bytes()))
        .content_type("text/markdown")
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

    info!("Archived evaluation report to s3://{bucket}/{key}");
    Ok(key)
}

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill, json_system};
use crate::llm_client::LlmClient;
use crate::models::candidate::CandidateFields;
use crate::resume::extract::{extract_text, is_pdf, truncate_chars};
use crate::resume::prompts::{
    RESUME_PDF_PROMPT, RESUME_PDF_SYSTEM, RESUME_SCRAPED_PROMPT, RESUME_SCRAPED_SYSTEM,
    RESUME_SUMMARY_PROMPT, RESUME_SUMMARY_SYSTEM, RESUME_TEXT_PROMPT, RESUME_TEXT_SYSTEM,
};

/// Only the head of pasted resumes is sent to the model.
pub const MAX_PROMPT_RESUME_CHARS: usize = 8000;

/// Contact fields as returned by the model or submitted by a client.
/// Anything may be missing or null until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    MissingRequired,
    InvalidEmail,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email)
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

/// Normalises extracted fields for storage: names and phone trimmed, email
/// lower-cased. First name, last name and a well-formed email are required.
pub fn validate_fields(fields: &ContactFields) -> Result<CandidateFields, FieldError> {
    let first_name = trimmed(&fields.first_name);
    let last_name = trimmed(&fields.last_name);
    let email = trimmed(&fields.email).to_lowercase();

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
        return Err(FieldError::MissingRequired);
    }
    if !is_valid_email(&email) {
        return Err(FieldError::InvalidEmail);
    }

    Ok(CandidateFields {
        first_name,
        last_name,
        email,
        phone: trimmed(&fields.phone),
    })
}

/// Maps a validation failure to a 400 that echoes what the model found.
pub fn field_error_response(err: FieldError, fields: &ContactFields) -> AppError {
    let (message, hint) = match err {
        FieldError::MissingRequired => (
            "Could not extract required information (firstName, lastName, email)",
            "Make sure the resume contains clear contact information",
        ),
        FieldError::InvalidEmail => (
            "Invalid email address extracted",
            "Check the email address on the resume",
        ),
    };
    AppError::ValidationWithDetails {
        message: message.to_string(),
        details: json!({ "extractedInfo": fields, "hint": hint }),
    }
}

/// Extracts contact fields from an uploaded resume file.
///
/// PDFs are first sent to the model as a native file; if the upload or the call
/// fails, the text acquisition chain runs and the scraped text is sent instead.
pub async fn extract_candidate_fields(
    llm: &LlmClient,
    bytes: &[u8],
    file_name: &str,
) -> Result<ContactFields, AppError> {
    if is_pdf(bytes) {
        match extract_from_pdf_file(llm, bytes, file_name).await {
            Ok(fields) => return Ok(fields),
            Err(e) => warn!("Native PDF extraction failed for {file_name}, falling back to text: {e}"),
        }
    }

    let Some(extracted) = extract_text(bytes).await else {
        return Err(AppError::ValidationWithDetails {
            message: "Unable to automatically extract information from this PDF. \
                Please use the manual \"Create Candidate\" option instead."
                .to_string(),
            details: json!({
                "suggestion": "The PDF format is not compatible with automatic extraction. \
                    You can manually create the candidate by entering the information yourself.",
                "fileName": file_name,
            }),
        });
    };
    info!(
        "Recovered {} chars from {file_name} via {:?}",
        extracted.text.len(),
        extracted.method
    );

    let text = truncate_chars(&extracted.text, MAX_PROMPT_RESUME_CHARS);
    let prompt = fill(
        RESUME_SCRAPED_PROMPT,
        &[("file_name", file_name), ("text", &text)],
    );
    llm.call_json(&json_system(RESUME_SCRAPED_SYSTEM), &prompt, 0.1)
        .await
        .map_err(|e| AppError::from_llm("Resume field extraction failed", e))
}

async fn extract_from_pdf_file(
    llm: &LlmClient,
    bytes: &[u8],
    file_name: &str,
) -> Result<ContactFields, crate::llm_client::LlmError> {
    let file_id = llm.upload_file(bytes.to_vec(), file_name).await?;
    let prompt = fill(RESUME_PDF_PROMPT, &[("file_name", file_name)]);
    let result = llm
        .call_json_with_file(&json_system(RESUME_PDF_SYSTEM), &prompt, &file_id, 0.1)
        .await;

    // Cleanup is best effort; a leaked upload is not worth failing the request.
    if let Err(e) = llm.delete_file(&file_id).await {
        warn!("Failed to delete uploaded file {file_id}: {e}");
    }
    result
}

/// Extracts contact fields from pasted resume text.
pub async fn extract_fields_from_text(
    llm: &LlmClient,
    text: &str,
) -> Result<ContactFields, AppError> {
    let head = truncate_chars(text, MAX_PROMPT_RESUME_CHARS);
    let prompt = fill(RESUME_TEXT_PROMPT, &[("text", &head)]);
    llm.call_json(&json_system(RESUME_TEXT_SYSTEM), &prompt, 0.1)
        .await
        .map_err(|e| AppError::from_llm("Resume field extraction failed", e))
}

/// Short free-text summary of a stored resume.
pub async fn summarize_resume(llm: &LlmClient, bytes: &[u8]) -> Result<String, AppError> {
    let extracted = extract_text(bytes).await.ok_or_else(|| {
        AppError::Validation("Resume text could not be extracted".to_string())
    })?;
    let head = truncate_chars(&extracted.text, MAX_PROMPT_RESUME_CHARS);
    let prompt = fill(RESUME_SUMMARY_PROMPT, &[("text", &head)]);
    let summary = llm
        .call_text(RESUME_SUMMARY_SYSTEM, &prompt, 0.3)
        .await
        .map_err(|e| AppError::from_llm("Resume summary failed", e))?;
    if summary.is_empty() {
        Ok("No summary generated.".to_string())
    } else {
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(first: &str, last: &str, email: &str, phone: Option<&str>) -> ContactFields {
        ContactFields {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(email.to_string()),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_normalises_fields() {
        let valid = validate_fields(&fields(
            "  Jane ",
            " Doe",
            " Jane.Doe@Example.COM ",
            Some(" +1 555 0100 "),
        ))
        .unwrap();
        assert_eq!(
            valid,
            CandidateFields {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane.doe@example.com".into(),
                phone: "+1 555 0100".into(),
            }
        );
    }

    #[test]
    fn test_missing_phone_becomes_empty() {
        let valid = validate_fields(&fields("Jane", "Doe", "jane@example.com", None)).unwrap();
        assert_eq!(valid.phone, "");
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        assert_eq!(
            validate_fields(&fields("Jane", "   ", "jane@example.com", None)),
            Err(FieldError::MissingRequired)
        );
        assert_eq!(
            validate_fields(&ContactFields::default()),
            Err(FieldError::MissingRequired)
        );
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        assert_eq!(
            validate_fields(&fields("Jane", "Doe", "jane at example", None)),
            Err(FieldError::InvalidEmail)
        );
        assert_eq!(
            validate_fields(&fields("Jane", "Doe", "jane@example", None)),
            Err(FieldError::InvalidEmail)
        );
    }

    #[test]
    fn test_model_nulls_deserialize_as_missing() {
        let parsed: ContactFields =
            serde_json::from_str(r#"{"firstName":"Jane","lastName":null,"email":"j@x.io"}"#)
                .unwrap();
        assert_eq!(parsed.last_name, None);
        assert_eq!(parsed.phone, None);
    }

    #[test]
    fn test_field_error_response_carries_extracted_info() {
        let err = field_error_response(
            FieldError::MissingRequired,
            &fields("Jane", "", "", None),
        );
        match err {
            AppError::ValidationWithDetails { details, .. } => {
                assert_eq!(details["extractedInfo"]["firstName"], "Jane");
                assert!(details["hint"].is_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

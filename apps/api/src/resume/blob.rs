//! Stored resume blobs are base64 text in the `candidates.resume` column.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::extract::is_pdf;

pub fn encode_resume(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_resume(blob: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(blob.trim())
}

/// Content type served on download. Sniffs the bytes, not the filename.
pub fn content_type_for(bytes: &[u8]) -> &'static str {
    if is_pdf(bytes) {
        "application/pdf"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// `Content-Disposition` value with quotes and control characters stripped from the name.
pub fn attachment_header(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();
    let safe = if safe.trim().is_empty() {
        "resume".to_string()
    } else {
        safe
    };
    format!("attachment; filename=\"{safe}\"")
}

/// Filename recorded for candidates created from pasted text.
pub fn text_resume_file_name(now_millis: i64) -> String {
    format!("resume-text-{now_millis}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_decodes_to_original_bytes() {
        let bytes = b"%PDF-1.4 fake".to_vec();
        let blob = encode_resume(&bytes);
        assert_eq!(decode_resume(&blob).unwrap(), bytes);
    }

    #[test]
    fn test_invalid_blob_is_an_error() {
        assert!(decode_resume("not base64!!").is_err());
    }

    #[test]
    fn test_content_type_sniffs_pdf_magic() {
        assert_eq!(content_type_for(b"%PDF-1.7"), "application/pdf");
        assert_eq!(
            content_type_for(b"Jane Doe\njane@example.com"),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_attachment_header_strips_quotes() {
        assert_eq!(
            attachment_header("jane \"cv\".pdf"),
            "attachment; filename=\"jane cv.pdf\""
        );
        assert_eq!(attachment_header(""), "attachment; filename=\"resume\"");
    }

    #[test]
    fn test_text_resume_file_name() {
        assert_eq!(text_resume_file_name(1700000000000), "resume-text-1700000000000.txt");
    }
}

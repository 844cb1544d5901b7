//! Best-effort resume text acquisition.
//!
//! Order: plain text for non-PDF bytes; the `pdf-extract` library for PDFs;
//! byte-level scraping of the raw PDF when the library yields too little.
//! None of these guarantee recovery; callers treat `None` as "ask for manual entry".

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Library output shorter than this is treated as a failed parse.
const LIBRARY_MIN_CHARS: usize = 100;
/// Scraped text at least this long is accepted outright.
const SCRAPE_MIN_CHARS: usize = 50;
/// Otherwise scraped text needs more words than this (longer than 2 chars).
const SCRAPE_MIN_WORDS: usize = 5;
/// Cap on keyword-filtered words taken from the raw bytes.
const SCRAPE_MAX_WORDS: usize = 100;

const PDF_KEYWORDS: &[&str] = &[
    "obj",
    "endobj",
    "stream",
    "endstream",
    "xref",
    "trailer",
    "startxref",
    "pdf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PlainText,
    PdfLibrary,
    ByteScrape,
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Runs the acquisition chain. Returns `None` when every method fails.
pub async fn extract_text(bytes: &[u8]) -> Option<ExtractedText> {
    if !is_pdf(bytes) {
        let text = collapse_whitespace(&String::from_utf8_lossy(bytes));
        return (!text.is_empty()).then_some(ExtractedText {
            text,
            method: ExtractionMethod::PlainText,
        });
    }

    if let Some(text) = extract_with_library(bytes.to_vec()).await {
        if text.chars().count() >= LIBRARY_MIN_CHARS {
            debug!("pdf-extract recovered {} chars", text.len());
            return Some(ExtractedText {
                text,
                method: ExtractionMethod::PdfLibrary,
            });
        }
        debug!("pdf-extract output too short ({} chars), scraping bytes", text.len());
    }

    let scraped = scrape_pdf_bytes(bytes);
    if is_usable_scrape(&scraped) {
        debug!("Byte scrape recovered {} chars", scraped.len());
        Some(ExtractedText {
            text: scraped,
            method: ExtractionMethod::ByteScrape,
        })
    } else {
        None
    }
}

/// First `max_chars` characters of whatever text the chain recovers.
pub async fn resume_excerpt(bytes: &[u8], max_chars: usize) -> Option<String> {
    extract_text(bytes)
        .await
        .map(|extracted| truncate_chars(&extracted.text, max_chars))
}

/// The PDF parser can panic on malformed input; running it on the blocking pool
/// turns a panic into a `JoinError` instead of taking the worker down.
async fn extract_with_library(bytes: Vec<u8>) -> Option<String> {
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await {
        Ok(Ok(text)) => Some(collapse_whitespace(&text)),
        Ok(Err(e)) => {
            warn!("pdf-extract failed: {e}");
            None
        }
        Err(e) => {
            warn!("pdf-extract task aborted: {e}");
            None
        }
    }
}

fn text_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(((?:[^()\\]|\\.)*)\)").expect("valid regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?[1-9]?[0-9\s\-()]{7,15}").expect("valid regex"))
}

fn digit_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{3,}").expect("valid regex"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z]{2,}\b").expect("valid regex"))
}

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s@._-]").expect("valid regex"))
}

/// Scrapes readable fragments straight out of PDF bytes: literal string objects,
/// email and phone patterns, then plain words minus PDF syntax keywords.
pub fn scrape_pdf_bytes(bytes: &[u8]) -> String {
    // Latin-1 view: every byte maps to exactly one char.
    let binary: String = bytes.iter().map(|&b| b as char).collect();
    let mut parts: Vec<String> = Vec::new();

    for caps in text_object_re().captures_iter(&binary) {
        let literal = unescape_pdf_literal(&caps[1]);
        if literal.chars().filter(|c| c.is_ascii_alphanumeric()).count() >= 2 {
            parts.push(literal);
        }
    }

    parts.extend(email_re().find_iter(&binary).map(|m| m.as_str().to_string()));

    parts.extend(
        phone_re()
            .find_iter(&binary)
            .map(|m| m.as_str().trim())
            .filter(|p| digit_run_re().is_match(p))
            .map(str::to_string),
    );

    parts.extend(
        word_re()
            .find_iter(&binary)
            .map(|m| m.as_str())
            .filter(|w| w.len() > 2 && w.len() < 50)
            .filter(|w| !PDF_KEYWORDS.contains(&w.to_ascii_lowercase().as_str()))
            .take(SCRAPE_MAX_WORDS)
            .map(str::to_string),
    );

    let joined = parts.join(" ");
    collapse_whitespace(&noise_re().replace_all(&joined, " "))
}

/// Whether scraped text is worth sending to the model.
pub fn is_usable_scrape(text: &str) -> bool {
    if text.chars().count() >= SCRAPE_MIN_CHARS || text.contains('@') {
        return true;
    }
    text.split_whitespace().filter(|w| w.len() > 2).count() > SCRAPE_MIN_WORDS
}

fn unescape_pdf_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('r') | Some('t') => out.push(' '),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRAPABLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Length 120 >>\nstream\n\
BT /F1 12 Tf (Jane Doe) Tj (Senior Backend Engineer) Tj (jane.doe@example.com) Tj \
(Phone: 555 123 4567) Tj ET\nendstream\nendobj\ntrailer\n%%EOF";

    #[test]
    fn test_is_pdf_checks_magic() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"Jane Doe, engineer"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_scrape_recovers_text_objects_and_contacts() {
        let text = scrape_pdf_bytes(SCRAPABLE_PDF);
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Senior Backend Engineer"));
        assert!(text.contains("jane.doe@example.com"));
        assert!(text.contains("555 123 4567"));
    }

    #[test]
    fn test_scrape_drops_pdf_keywords_from_words() {
        let text = scrape_pdf_bytes(b"%PDF-1.4 obj endobj stream endstream xref trailer startxref");
        assert!(text
            .split_whitespace()
            .all(|w| !PDF_KEYWORDS.contains(&w.to_ascii_lowercase().as_str())));
        assert!(!is_usable_scrape(&text));
    }

    #[test]
    fn test_unescape_pdf_literal() {
        assert_eq!(unescape_pdf_literal(r"C\+\+ \(systems\)"), "C++ (systems)");
        assert_eq!(unescape_pdf_literal(r"line\nbreak"), "line break");
    }

    #[test]
    fn test_usable_scrape_thresholds() {
        assert!(is_usable_scrape("a@b.co"));
        assert!(is_usable_scrape("Rust Python Kafka Postgres Redis Tokio"));
        assert!(!is_usable_scrape("Rust Go Kafka"));
        assert!(is_usable_scrape(&"x".repeat(SCRAPE_MIN_CHARS)));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_plain_text_is_used_directly() {
        let extracted = extract_text(b"Jane Doe\n  jane@example.com  ").await.unwrap();
        assert_eq!(extracted.method, ExtractionMethod::PlainText);
        assert_eq!(extracted.text, "Jane Doe jane@example.com");
    }

    #[tokio::test]
    async fn test_empty_text_yields_none() {
        assert!(extract_text(b"   \n\t").await.is_none());
    }

    #[tokio::test]
    async fn test_broken_pdf_falls_back_to_byte_scrape() {
        let extracted = extract_text(SCRAPABLE_PDF).await.unwrap();
        assert_eq!(extracted.method, ExtractionMethod::ByteScrape);
        assert!(extracted.text.contains("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_yields_none() {
        assert!(extract_text(b"%PDF-1.4\n\x00\x01\x02\x03").await.is_none());
    }
}

// LLM prompt constants for resume ingestion.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role prompt for reading an uploaded PDF through native file input.
pub const RESUME_PDF_SYSTEM: &str = "You are an expert at analyzing resumes. \
    Extract candidate information from the provided PDF document.

Return a JSON object with this exact structure:
{
  \"firstName\": \"first name from resume\",
  \"lastName\": \"last name from resume\",
  \"email\": \"email address from resume\",
  \"phone\": \"phone number from resume\"
}

IMPORTANT:
- firstName, lastName, and email are REQUIRED and must not be empty
- If phone is not found, use empty string
- Look carefully for contact information in headers, footers, and contact sections
- Be precise with name extraction (avoid titles like Mr., Dr., etc.)";

/// User turn accompanying the attached PDF. Replace `{file_name}`.
pub const RESUME_PDF_PROMPT: &str =
    "Please analyze this resume PDF ({file_name}) and extract the candidate information:";

/// Role prompt for text scraped out of a PDF, which is often fragmented.
pub const RESUME_SCRAPED_SYSTEM: &str = "You are an expert resume parser. \
    Extract candidate information from the provided text that was extracted from a PDF resume.

EXTRACTION GUIDELINES:
1. Names: Look for capitalized words that could be first/last names, often at the beginning
2. Emails: Look for patterns with @ symbol and domain extensions
3. Phones: Look for digit sequences that could be phone numbers
4. Be flexible with fragmented text - piece together information intelligently
5. If filename contains a name (like \"resume_john_doe.pdf\"), use it as backup

Return a JSON object:
{
  \"firstName\": \"first name or empty string\",
  \"lastName\": \"last name or empty string\",
  \"email\": \"email address or empty string\",
  \"phone\": \"phone number or empty string\"
}";

/// Replace `{file_name}` and `{text}` before sending.
pub const RESUME_SCRAPED_PROMPT: &str = r#"Resume filename: {file_name}

Extracted text: "{text}"

Extract the candidate's firstName, lastName, email, and phone number. If the extracted text is fragmented, try to infer information from patterns and the filename."#;

/// Role prompt for pasted resume text.
pub const RESUME_TEXT_SYSTEM: &str = "Extract candidate information from resume text. \
    Return JSON with this exact structure:
{
  \"firstName\": \"first name\",
  \"lastName\": \"last name\",
  \"email\": \"email address\",
  \"phone\": \"phone number (include if found, empty string if not)\"
}
REQUIREMENTS:
- firstName, lastName, and email must not be empty
- If no phone number is found, return empty string
- Return only valid email addresses
- Names should be properly capitalized";

/// Replace `{text}` before sending.
pub const RESUME_TEXT_PROMPT: &str = "Extract information from this resume:\n\n{text}";

pub const RESUME_SUMMARY_SYSTEM: &str =
    "You are a helpful assistant that summarizes candidate resumes concisely.";

/// Replace `{text}` before sending.
pub const RESUME_SUMMARY_PROMPT: &str =
    "Please provide a concise summary (2-3 sentences) of the following resume content:\n\n{text}";

// LLM prompt constants for transcript feedback reports.

pub const FEEDBACK_SYSTEM: &str = "You are a strict technical interviewer evaluating a candidate.";

/// Replace `{role}`, `{candidate_id}` and `{transcript}` (pretty-printed JSON).
pub const FEEDBACK_PROMPT: &str = r#"Role: {role}
Candidate ID: {candidate_id}
Q&A:
{transcript}

Return JSON with:
{
  "overall_score": 0-100,
  "summary": "short paragraph",
  "strengths": ["..."],
  "improvements": ["..."],
  "hire_recommendation": "YES" | "NO" | "MAYBE",
  "per_question": [
    { "question": "...", "answer": "...", "score": 0-10, "comment": "..." }
  ]
}"#;

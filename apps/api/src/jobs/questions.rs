//! Question-bank maintenance for job profiles: cleaning, append-merge and replace.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::models::job::JobQuestion;

/// How submitted questions combine with the stored bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionMode {
    #[default]
    Append,
    Replace,
}

/// A question as submitted by the client, before cleaning.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub expected_answer: Option<String>,
}

fn dedup_key(question: &str) -> String {
    question.to_lowercase()
}

/// Trims question text, drops blanks and case-insensitive duplicates (first wins).
pub fn clean_questions(input: &[QuestionInput]) -> Vec<JobQuestion> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in input {
        let question = item.question.as_deref().unwrap_or("").trim();
        if question.is_empty() || !seen.insert(dedup_key(question)) {
            continue;
        }
        out.push(JobQuestion {
            question: question.to_string(),
            expected_answer: item.expected_answer.clone().unwrap_or_default(),
        });
    }
    out
}

/// Append-merge: existing order is kept, an incoming duplicate replaces the stored
/// entry in place, new questions go to the end. Never shrinks the bank.
pub fn merge_questions(existing: &[JobQuestion], incoming: &[JobQuestion]) -> Vec<JobQuestion> {
    let mut merged: Vec<JobQuestion> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in existing.iter().chain(incoming) {
        let key = dedup_key(&item.question);
        match index.get(&key) {
            Some(&pos) => merged[pos] = item.clone(),
            None => {
                index.insert(key, merged.len());
                merged.push(item.clone());
            }
        }
    }
    merged
}

/// Applies a question update according to `mode`.
pub fn apply_question_update(
    existing: &[JobQuestion],
    submitted: &[QuestionInput],
    mode: QuestionMode,
) -> Vec<JobQuestion> {
    let clean = clean_questions(submitted);
    match mode {
        QuestionMode::Replace => clean,
        QuestionMode::Append => merge_questions(existing, &clean),
    }
}

/// Questions from the bank that have not been asked yet (case-insensitive, trimmed).
pub fn unasked_questions<'b>(
    bank: &[JobQuestion],
    asked: impl IntoIterator<Item = &'b str>,
) -> Vec<JobQuestion> {
    let asked: HashSet<String> = asked
        .into_iter()
        .map(|q| dedup_key(q.trim()))
        .collect();
    bank.iter()
        .filter(|q| !asked.contains(&dedup_key(q.question.trim())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    impl QuestionInput {
        fn new(question: &str, expected_answer: &str) -> Self {
            Self {
                question: Some(question.to_string()),
                expected_answer: Some(expected_answer.to_string()),
            }
        }
    }

    fn q(question: &str, expected: &str) -> JobQuestion {
        JobQuestion {
            question: question.to_string(),
            expected_answer: expected.to_string(),
        }
    }

    #[test]
    fn test_clean_trims_and_drops_blanks() {
        let input = vec![
            QuestionInput::new("  What is ownership?  ", "moves"),
            QuestionInput::new("   ", "ignored"),
            QuestionInput::default(),
        ];
        let cleaned = clean_questions(&input);
        assert_eq!(cleaned, vec![q("What is ownership?", "moves")]);
    }

    #[test]
    fn test_clean_dedups_case_insensitively_first_wins() {
        let input = vec![
            QuestionInput::new("Explain borrowing", "first"),
            QuestionInput::new("EXPLAIN BORROWING", "second"),
        ];
        let cleaned = clean_questions(&input);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].expected_answer, "first");
    }

    #[test]
    fn test_missing_expected_answer_defaults_to_empty() {
        let input = vec![QuestionInput {
            question: Some("Why Rust?".into()),
            expected_answer: None,
        }];
        assert_eq!(clean_questions(&input)[0].expected_answer, "");
    }

    #[test]
    fn test_append_never_decreases_count() {
        let existing = vec![q("A", "1"), q("B", "2"), q("C", "3")];
        let incoming = vec![q("b", "updated")];
        let merged = merge_questions(&existing, &incoming);
        assert_eq!(merged.len(), existing.len());
        assert!(merged.len() >= existing.len());
    }

    #[test]
    fn test_append_overwrites_duplicate_in_place() {
        let existing = vec![q("Tell me about yourself", "intro"), q("Why us?", "fit")];
        let incoming = vec![q("WHY US?", "motivation"), q("Salary?", "range")];
        let merged = merge_questions(&existing, &incoming);
        assert_eq!(
            merged,
            vec![
                q("Tell me about yourself", "intro"),
                q("WHY US?", "motivation"),
                q("Salary?", "range"),
            ]
        );
    }

    #[test]
    fn test_replace_matches_cleaned_submission_exactly() {
        let existing = vec![q("Old", "x"), q("Older", "y")];
        let submitted = vec![
            QuestionInput::new(" New one ", "a"),
            QuestionInput::new("new ONE", "dup"),
            QuestionInput::new("Another", "b"),
        ];
        let result = apply_question_update(&existing, &submitted, QuestionMode::Replace);
        assert_eq!(result, vec![q("New one", "a"), q("Another", "b")]);
    }

    #[test]
    fn test_append_mode_is_default() {
        let mode: QuestionMode = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(mode, QuestionMode::default());
        let replace: QuestionMode = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(replace, QuestionMode::Replace);
    }

    #[test]
    fn test_append_with_empty_submission_keeps_bank() {
        let existing = vec![q("A", "1")];
        let result = apply_question_update(&existing, &[], QuestionMode::Append);
        assert_eq!(result, existing);
    }

    #[test]
    fn test_unasked_questions_filters_case_insensitively() {
        let bank = vec![q("Describe a failure", ""), q("What is a lifetime?", "")];
        let remaining = unasked_questions(&bank, ["describe a FAILURE "]);
        assert_eq!(remaining, vec![q("What is a lifetime?", "")]);
    }
}

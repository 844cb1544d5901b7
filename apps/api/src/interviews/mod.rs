// Interview loop: opening question, per-answer scoring, next-question generation,
// completion after a fixed number of answers, and the final evaluation.
// Model calls sit behind the `Interviewer` trait; `LlmInterviewer` is the default.

pub mod evaluation;
pub mod handlers;
pub mod interviewer;
pub mod prompts;
pub mod store;
pub mod turn;

// Reports: combined candidate report, cached transcript feedback, and the
// markdown rendering used to archive final evaluations.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod render;
pub mod store;

// Job profiles: CRUD plus the per-job interview question bank.

pub mod handlers;
pub mod questions;
pub mod store;

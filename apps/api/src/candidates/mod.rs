// Candidates: manual, AI-parsed and pasted-text creation plus CRUD and resume download.

pub mod handlers;
pub mod store;

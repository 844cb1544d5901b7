pub mod candidate;
pub mod evaluation;
pub mod interview;
pub mod job;
pub mod user;
